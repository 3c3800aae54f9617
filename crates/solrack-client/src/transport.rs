//! HTTP transport adapter.
//!
//! A thin wrapper over [`reqwest::Client`] that owns the policy decisions
//! the rest of the crate relies on: request/connect timeouts, no redirects
//! across a scheme change, the `Authorization: Session <id>` header, and
//! normalization of transport failures into [`ClientError`]. There is no
//! built-in retry; transient errors surface to the caller.

use std::time::Duration;

use reqwest::{header, redirect, Client, Method, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};

use crate::error::{ClientError, Result};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub(crate) struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Build the underlying client.
    ///
    /// `accept_invalid_certs` exists because inverters ship self-signed
    /// certificates; it is off unless the caller opts in.
    pub(crate) fn new(accept_invalid_certs: bool) -> Result<Self> {
        // Redirects may not change the URL scheme.
        let policy = redirect::Policy::custom(|attempt| {
            if attempt.previous().len() >= 10 {
                return attempt.error("too many redirects");
            }
            let crosses_scheme = attempt
                .previous()
                .last()
                .is_some_and(|prev| prev.scheme() != attempt.url().scheme());
            if crosses_scheme {
                attempt.stop()
            } else {
                attempt.follow()
            }
        });

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .redirect(policy)
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        Ok(Self { client })
    }

    /// POST a JSON body, optionally under a session.
    pub(crate) async fn post_json<B: Serialize>(
        &self,
        url: &str,
        body: &B,
        session_id: Option<&str>,
    ) -> Result<Response> {
        let mut req = self.client.post(url).json(body);
        if let Some(id) = session_id {
            req = req.header(header::AUTHORIZATION, format!("Session {id}"));
        }
        Ok(req.send().await?)
    }

    /// POST with an empty body (logout).
    pub(crate) async fn post_empty(&self, url: &str, session_id: &str) -> Result<Response> {
        let req = self
            .client
            .post(url)
            .header(header::AUTHORIZATION, format!("Session {session_id}"));
        Ok(req.send().await?)
    }

    /// Generic authenticated JSON request used by everything after login.
    ///
    /// HTTP 401 is reported as [`ClientError::SessionExpired`] so callers
    /// can re-authenticate; other non-success statuses and undecodable
    /// bodies become [`ClientError::Request`].
    pub(crate) async fn send_authorized<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        body: Option<&B>,
        session_id: &str,
    ) -> Result<T> {
        let mut req = self
            .client
            .request(method, url)
            .header(header::AUTHORIZATION, format!("Session {session_id}"));
        if let Some(body) = body {
            req = req.json(body);
        }
        let resp = req.send().await?;
        Self::decode_authorized(resp).await
    }

    async fn decode_authorized<T: DeserializeOwned>(resp: Response) -> Result<T> {
        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(ClientError::SessionExpired);
        }
        if !status.is_success() {
            let msg = resp.text().await.unwrap_or_default();
            return Err(if msg.is_empty() {
                ClientError::Request(format!("HTTP {}", status.as_u16()))
            } else {
                ClientError::Request(format!("HTTP {}: {msg}", status.as_u16()))
            });
        }
        resp.json::<T>()
            .await
            .map_err(|e| ClientError::Request(format!("could not decode response: {e}")))
    }
}
