use std::fmt;

/// Everything that can go wrong while talking to the inverter.
///
/// Handshake failures carry no secrets: messages name the failing step but
/// never the password, the salt, or any derived key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    // Configuration
    Config(String),

    // Network
    ServerUnreachable,
    Timeout,
    Transport(String),

    // Handshake steps (request arrived, response body unreadable)
    AuthInitFailed,
    AuthFinishFailed,
    SessionCreationFailed,

    // Handshake protocol
    AuthProtocol(String),
    AuthenticationFailed,
    ServerSignatureMismatch,

    // Session lifecycle
    AlreadyAuthenticated,
    NotAuthenticated,
    SessionExpired,

    // Authorized requests
    Request(String),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "invalid configuration: {msg}"),
            Self::ServerUnreachable => write!(f, "cannot reach the inverter, check the server address"),
            Self::Timeout => write!(f, "request timed out"),
            Self::Transport(msg) => write!(f, "transport error: {msg}"),
            Self::AuthInitFailed => write!(f, "could not read the authentication start response"),
            Self::AuthFinishFailed => write!(f, "could not read the authentication finish response"),
            Self::SessionCreationFailed => write!(f, "the server did not return a session id"),
            Self::AuthProtocol(msg) => write!(f, "malformed handshake response: {msg}"),
            Self::AuthenticationFailed => write!(f, "authentication failed, check the password"),
            Self::ServerSignatureMismatch => {
                write!(f, "server signature verification failed, refusing to continue")
            }
            Self::AlreadyAuthenticated => {
                write!(f, "a session is already active, log out before logging in again")
            }
            Self::NotAuthenticated => write!(f, "not logged in"),
            Self::SessionExpired => write!(f, "the session has expired, log in again"),
            Self::Request(msg) => write!(f, "request failed: {msg}"),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<solrack_crypto::CryptoError> for ClientError {
    fn from(err: solrack_crypto::CryptoError) -> Self {
        Self::AuthProtocol(err.to_string())
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::ServerUnreachable
        } else {
            // reqwest redacts URLs containing credentials; ours never do.
            Self::Transport(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_the_step_without_secrets() {
        let msgs = [
            ClientError::AuthInitFailed.to_string(),
            ClientError::AuthProtocol("rounds is not an integer".into()).to_string(),
            ClientError::ServerSignatureMismatch.to_string(),
        ];
        for msg in msgs {
            assert!(!msg.is_empty());
            assert!(!msg.contains("password="));
        }
    }
}
