//! The inverter client and its session lifecycle.

use std::fmt;

use reqwest::Method;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::config::{ClientConfig, Scheme};
use crate::error::{ClientError, Result};
use crate::handshake;
use crate::transport::HttpTransport;

const ENDPOINT_LOGOUT: &str = "/api/v1/auth/logout";
const ENDPOINT_ME: &str = "/api/v1/auth/me";

/// A client for one inverter.
///
/// Holds the connection settings and, after [`login`](Self::login), the
/// session id that authorizes every further request. The session belongs
/// to this instance alone: the type is single-consumer, and the methods
/// that change the session take `&mut self`. Share it across tasks only
/// behind external synchronization.
pub struct InverterClient {
    scheme: Scheme,
    server: String,
    password: Zeroizing<String>,
    session_id: Option<String>,
    transport: HttpTransport,
}

impl InverterClient {
    /// A blank client with the default `http` scheme. Set the server and
    /// password before calling [`login`](Self::login).
    pub fn new() -> Result<Self> {
        Ok(Self {
            scheme: Scheme::Http,
            server: String::new(),
            password: Zeroizing::new(String::new()),
            session_id: None,
            transport: HttpTransport::new(false)?,
        })
    }

    /// A client from a complete [`ClientConfig`].
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        Ok(Self {
            scheme: config.scheme,
            server: config.server,
            password: Zeroizing::new(config.password),
            session_id: None,
            transport: HttpTransport::new(false)?,
        })
    }

    /// Skip TLS certificate verification for this instance.
    ///
    /// Inverters commonly present self-signed certificates on their local
    /// interface; this is an explicit opt-in, off by default.
    pub fn danger_accept_invalid_certs(&mut self, accept: bool) -> Result<()> {
        self.transport = HttpTransport::new(accept)?;
        Ok(())
    }

    /// Set the IP address or FQDN (optionally `host:port`) of the inverter.
    pub fn set_server(&mut self, server: impl Into<String>) {
        self.server = server.into();
    }

    /// Set the password of the plant-owner account.
    pub fn set_password(&mut self, password: impl Into<String>) {
        self.password = Zeroizing::new(password.into());
    }

    /// Set the scheme. Anything other than the exact literal `"https"`
    /// selects plain HTTP.
    pub fn set_scheme(&mut self, scheme: &str) {
        self.scheme = Scheme::parse(scheme);
    }

    /// The current session id, if logged in.
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Whether a session is active.
    pub fn is_logged_in(&self) -> bool {
        self.session_id.is_some()
    }

    fn base_url(&self) -> Result<String> {
        if self.server.is_empty() {
            return Err(ClientError::Config("server is not set".into()));
        }
        Ok(format!("{}://{}", self.scheme, self.server))
    }

    /// Run the authentication handshake and store the session id.
    ///
    /// Fails with [`ClientError::AlreadyAuthenticated`] when a session is
    /// already active; call [`logout`](Self::logout) first.
    pub async fn login(&mut self) -> Result<String> {
        if self.session_id.is_some() {
            return Err(ClientError::AlreadyAuthenticated);
        }
        let base_url = self.base_url()?;
        let session_id = handshake::login(&self.transport, &base_url, &self.password).await?;
        self.session_id = Some(session_id.clone());
        Ok(session_id)
    }

    /// End the current session.
    ///
    /// The local session is cleared even when the request fails, since the
    /// caller has already decided to stop using it; the error is still
    /// surfaced. Logging out with no active session is a no-op returning
    /// `Ok(true)`.
    pub async fn logout(&mut self) -> Result<bool> {
        let Some(session_id) = self.session_id.take() else {
            return Ok(true);
        };
        let url = format!("{}{ENDPOINT_LOGOUT}", self.base_url()?);
        let resp = self.transport.post_empty(&url, &session_id).await?;
        if !resp.status().is_success() {
            warn!(status = resp.status().as_u16(), "logout rejected by server");
            return Err(ClientError::Request(format!(
                "logout failed with HTTP {}",
                resp.status().as_u16()
            )));
        }
        debug!("session closed");
        Ok(true)
    }

    /// Information about the current user, as the server reports it.
    pub async fn me(&self) -> Result<Map<String, Value>> {
        self.authorized_request::<(), _>(Method::GET, ENDPOINT_ME, None)
            .await
    }

    /// Generic authenticated JSON request.
    ///
    /// The primitive all data endpoints are built on: attaches the session
    /// header, sends `body` as JSON when present, decodes the response.
    /// HTTP 401 surfaces as [`ClientError::SessionExpired`] so callers can
    /// re-authenticate.
    pub async fn authorized_request<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T> {
        let session_id = self.session_id.as_deref().ok_or(ClientError::NotAuthenticated)?;
        let url = format!("{}{path}", self.base_url()?);
        self.transport
            .send_authorized(method, &url, body, session_id)
            .await
    }
}

// Keeps the password out of debug output.
impl fmt::Debug for InverterClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InverterClient")
            .field("scheme", &self.scheme)
            .field("server", &self.server)
            .field("password", &"<redacted>")
            .field("session_id", &self.session_id)
            .finish()
    }
}
