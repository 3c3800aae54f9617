//! Error types for cryptographic operations.

use std::fmt;

/// Errors surfaced by this crate.
///
/// The primitives themselves never fail on well-formed inputs; the variants
/// cover malformed encodings and AEAD rejection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Base64 input could not be decoded.
    Decode(String),
    /// AEAD sealing failed (key setup rejected).
    Seal,
    /// AEAD opening failed (tag mismatch or corrupted ciphertext).
    Open,
}

impl fmt::Display for CryptoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decode(msg) => write!(f, "base64 decode failed: {msg}"),
            Self::Seal => write!(f, "AEAD seal failed"),
            Self::Open => write!(f, "AEAD open failed"),
        }
    }
}

impl std::error::Error for CryptoError {}

/// Result alias for this crate.
pub type Result<T> = std::result::Result<T, CryptoError>;
