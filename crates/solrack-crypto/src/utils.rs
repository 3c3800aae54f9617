//! Randomness, base64, and constant-time comparison helpers.

use base64::{engine::general_purpose::STANDARD, Engine};
use rand::Rng;
use rand::RngCore;
use subtle::ConstantTimeEq;

use crate::errors::{CryptoError, Result};

/// Alphabet for random ASCII nonces: the printable alphanumerics.
const ASCII_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Generate cryptographically secure random bytes.
///
/// # Example
///
/// ```
/// use solrack_crypto::generate_random_bytes;
///
/// let iv: [u8; 16] = generate_random_bytes();
/// ```
pub fn generate_random_bytes<const N: usize>() -> [u8; N] {
    let mut bytes = [0u8; N];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes
}

/// Generate `len` random printable-ASCII characters from the system CSPRNG.
///
/// Used for the client nonce of the handshake, which the protocol treats
/// as a character string before base64-encoding it.
pub fn random_ascii(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| ASCII_ALPHABET[rng.gen_range(0..ASCII_ALPHABET.len())] as char)
        .collect()
}

/// Standard-alphabet base64 encoding, with padding (RFC 4648 §4).
///
/// Every base64 value on this wire uses this variant.
pub fn base64_encode(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Standard-alphabet base64 decoding.
pub fn base64_decode(data: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(data)
        .map_err(|e| CryptoError::Decode(e.to_string()))
}

/// Timing-independent byte comparison.
///
/// Slices of unequal length compare unequal (in constant time for the
/// common length).
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}
