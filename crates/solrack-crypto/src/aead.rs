//! AEAD: AES-256-GCM with the inverter's 16-byte IV.
//!
//! The default `Aes256Gcm` alias fixes the nonce at 12 bytes; the server
//! mandates 16, so the generic [`AesGcm`] instantiation is used with a
//! `U16` nonce size. No additional authenticated data is ever supplied.

use aes_gcm::aead::consts::U16;
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::aes::Aes256;
use aes_gcm::{AesGcm, Nonce};

use crate::constants::GCM_TAG_LEN;
use crate::errors::{CryptoError, Result};

type Aes256Gcm16 = AesGcm<Aes256, U16>;

/// Seal `plaintext` under `key` and the 16-byte `iv`.
///
/// Returns the ciphertext and the detached 16-byte tag; the wire format
/// transmits the two separately.
pub fn gcm_seal(key: &[u8; 32], iv: &[u8; 16], plaintext: &[u8]) -> Result<(Vec<u8>, [u8; 16])> {
    let cipher = Aes256Gcm16::new_from_slice(key).map_err(|_| CryptoError::Seal)?;
    let nonce = Nonce::<U16>::from_slice(iv);
    // The AEAD appends the tag to the ciphertext; split it back off.
    let mut combined = cipher.encrypt(nonce, plaintext).map_err(|_| CryptoError::Seal)?;
    let tag_at = combined.len() - GCM_TAG_LEN;
    let mut tag = [0u8; GCM_TAG_LEN];
    tag.copy_from_slice(&combined[tag_at..]);
    combined.truncate(tag_at);
    Ok((combined, tag))
}

/// Open a ciphertext produced by [`gcm_seal`].
///
/// Fails with [`CryptoError::Open`] if any bit of the ciphertext or tag
/// has been altered.
pub fn gcm_open(
    key: &[u8; 32],
    iv: &[u8; 16],
    ciphertext: &[u8],
    tag: &[u8; 16],
) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm16::new_from_slice(key).map_err(|_| CryptoError::Open)?;
    let nonce = Nonce::<U16>::from_slice(iv);
    let mut combined = Vec::with_capacity(ciphertext.len() + GCM_TAG_LEN);
    combined.extend_from_slice(ciphertext);
    combined.extend_from_slice(tag);
    cipher
        .decrypt(nonce, combined.as_slice())
        .map_err(|_| CryptoError::Open)
}
