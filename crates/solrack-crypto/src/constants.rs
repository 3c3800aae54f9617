//! Protocol constants shared by the handshake layers.

/// Output length of every key derivation in the protocol (SHA-256 width).
pub const KEY_LEN: usize = 32;

/// IV length the inverter expects for the GCM token wrap. The server fixes
/// this at 16 bytes rather than the usual 12.
pub const GCM_IV_LEN: usize = 16;

/// GCM authentication tag length.
pub const GCM_TAG_LEN: usize = 16;

/// Length of the random client nonce, in ASCII characters (pre-base64).
pub const CLIENT_NONCE_LEN: usize = 12;

/// HMAC label for the client key derivation.
pub const CLIENT_KEY_LABEL: &[u8] = b"Client Key";

/// HMAC label for the server key derivation.
pub const SERVER_KEY_LABEL: &[u8] = b"Server Key";

/// HMAC label for the protocol (token-wrap) key derivation.
pub const SESSION_KEY_LABEL: &[u8] = b"Session Key";
