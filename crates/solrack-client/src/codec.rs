//! Wire envelopes of the three-step handshake, and the auth message.
//!
//! Each exchange is parsed once into a typed struct and the raw JSON is
//! discarded. Field names follow the server's camelCase spelling exactly.

use serde::{Deserialize, Serialize};

use crate::error::{ClientError, Result};

/// Account name of the plant owner. The server only ever authenticates
/// this fixed account; the name is not configurable.
pub(crate) const USERNAME: &str = "user";

/// First request: the client announces its nonce.
#[derive(Debug, Serialize)]
pub(crate) struct AuthStartRequest {
    pub nonce: String,
    pub username: &'static str,
}

/// First response: the server's challenge parameters.
#[derive(Debug, Deserialize)]
pub(crate) struct AuthStartResponse {
    pub nonce: String,
    /// Arrives as a JSON number; the server has been observed to send
    /// `29000.0`. Coerced through [`AuthStartResponse::rounds`]. A JSON
    /// string here fails parsing outright.
    rounds: f64,
    pub salt: String,
    #[serde(rename = "transactionId")]
    pub transaction_id: String,
}

impl AuthStartResponse {
    /// The PBKDF2 iteration count as an integer.
    ///
    /// Fractional values are a protocol error.
    pub fn rounds(&self) -> Result<u32> {
        if self.rounds.fract() != 0.0 || self.rounds < 1.0 || self.rounds > u32::MAX as f64 {
            return Err(ClientError::AuthProtocol(format!(
                "rounds is not a positive integer: {}",
                self.rounds
            )));
        }
        Ok(self.rounds as u32)
    }
}

/// Second request: the client proves knowledge of the password.
#[derive(Debug, Serialize)]
pub(crate) struct AuthFinishRequest {
    #[serde(rename = "transactionId")]
    pub transaction_id: String,
    pub proof: String,
}

/// Second response. `signature` and `token` are only present when the
/// proof was accepted; their absence is the server's "bad credentials"
/// signal, independent of the HTTP status.
#[derive(Debug, Deserialize)]
pub(crate) struct AuthFinishResponse {
    pub signature: Option<String>,
    pub token: Option<String>,
}

/// Third request: the token, wrapped under the protocol key.
#[derive(Debug, Serialize)]
pub(crate) struct CreateSessionRequest {
    #[serde(rename = "transactionId")]
    pub transaction_id: String,
    pub iv: String,
    pub tag: String,
    pub payload: String,
}

/// Third response.
#[derive(Debug, Deserialize)]
pub(crate) struct CreateSessionResponse {
    #[serde(rename = "sessionId")]
    pub session_id: Option<String>,
}

/// Format the SCRAM auth message both sides sign.
///
/// Every component is the verbatim wire string: the client nonce as the
/// base64 the client sent, the server nonce and salt exactly as received.
/// `c=biws` is `base64("n,,")`, the channel-binding-absent marker, and the
/// server nonce is repeated verbatim at the end.
pub(crate) fn auth_message(
    client_nonce_b64: &str,
    server_nonce: &str,
    server_salt_b64: &str,
    rounds: u32,
) -> String {
    format!(
        "n={USERNAME},r={client_nonce_b64},r={server_nonce},s={server_salt_b64},i={rounds},c=biws,r={server_nonce}"
    )
}
