//! Connection settings for an inverter.

use std::fmt;

/// URL scheme used to reach the inverter.
///
/// The management interface speaks plain HTTP out of the box; HTTPS is
/// only selected when the caller passes the exact string `"https"`. Any
/// other spelling (including `"HTTPS"`) is coerced to HTTP, matching the
/// behavior of the vendor's own tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scheme {
    /// Plain HTTP on port 80.
    #[default]
    Http,
    /// HTTPS on port 443.
    Https,
}

impl Scheme {
    /// Parse a scheme string. Only the exact literal `"https"` yields
    /// [`Scheme::Https`]; everything else is [`Scheme::Http`].
    pub fn parse(scheme: &str) -> Self {
        if scheme == "https" {
            Self::Https
        } else {
            Self::Http
        }
    }

    /// The scheme as it appears in a URL.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Connection settings handed to [`crate::InverterClient::with_config`].
#[derive(Clone)]
pub struct ClientConfig {
    /// URL scheme; see [`Scheme::parse`] for the normalization rule.
    pub scheme: Scheme,
    /// Host or `host:port` of the inverter.
    pub server: String,
    /// Password of the plant-owner account.
    pub password: String,
}

impl ClientConfig {
    /// Build a configuration, normalizing the scheme string.
    pub fn new(scheme: &str, server: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            scheme: Scheme::parse(scheme),
            server: server.into(),
            password: password.into(),
        }
    }
}

// The password stays out of debug output.
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("scheme", &self.scheme)
            .field("server", &self.server)
            .field("password", &"<redacted>")
            .finish()
    }
}
