//! Key derivation: PBKDF2-HMAC-SHA-256, HMAC-SHA-256, SHA-256.
//!
//! The handshake derives all of its 32-byte secrets through these three
//! functions; the exact inputs are dictated by the inverter's protocol.

use hmac::{Hmac, Mac};
use pbkdf2::pbkdf2_hmac;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

type HmacSha256 = Hmac<Sha256>;

/// PBKDF2-HMAC-SHA-256 with a fixed 32-byte output.
///
/// `salt` is the raw (already base64-decoded) salt from the server and
/// `rounds` is the iteration count the server announced.
pub fn pbkdf2_sha256(password: &[u8], salt: &[u8], rounds: u32) -> Zeroizing<[u8; 32]> {
    let mut out = Zeroizing::new([0u8; 32]);
    pbkdf2_hmac::<Sha256>(password, salt, rounds, out.as_mut());
    out
}

/// HMAC-SHA-256 over a single message.
pub fn hmac_sha256(key: &[u8], message: &[u8]) -> Zeroizing<[u8; 32]> {
    hmac_sha256_chain(key, &[message])
}

/// HMAC-SHA-256 absorbing several inputs sequentially.
///
/// Equivalent to `hmac_sha256(key, concat(parts))` without materializing
/// the concatenation; the protocol key is derived this way from the
/// `"Session Key"` label, the auth message, and the client key.
pub fn hmac_sha256_chain(key: &[u8], parts: &[&[u8]]) -> Zeroizing<[u8; 32]> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts keys of any length");
    for part in parts {
        mac.update(part);
    }
    let mut out = Zeroizing::new([0u8; 32]);
    out.copy_from_slice(&mac.finalize().into_bytes());
    out
}

/// SHA-256 digest.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(&Sha256::digest(data));
    out
}

/// Bytewise XOR of two 32-byte values.
///
/// The client proof is `client_key XOR client_signature`.
pub fn xor32(a: &[u8; 32], b: &[u8; 32]) -> Zeroizing<[u8; 32]> {
    let mut out = Zeroizing::new([0u8; 32]);
    for i in 0..32 {
        out[i] = a[i] ^ b[i];
    }
    out
}
