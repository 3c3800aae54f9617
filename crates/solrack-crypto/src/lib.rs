//! # solrack-crypto
//!
//! Cryptographic primitives for the solrack inverter client.
//!
//! The inverter's management API authenticates with a SCRAM-SHA-256-style
//! challenge–response followed by an AES-256-GCM wrap of the issued token.
//! This crate provides exactly the primitives that exchange needs:
//! PBKDF2-HMAC-SHA-256, HMAC-SHA-256, SHA-256, AES-256-GCM with the
//! server's non-standard 16-byte IV, standard base64, a CSPRNG, and
//! constant-time comparison.
//!
//! All derived key material is returned in [`zeroize::Zeroizing`] buffers
//! so it is scrubbed when dropped.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod aead;
pub mod constants;
pub mod errors;
pub mod kdf;
pub mod utils;

pub use aead::{gcm_open, gcm_seal};
pub use constants::*;
pub use errors::CryptoError;
pub use kdf::{hmac_sha256, hmac_sha256_chain, pbkdf2_sha256, sha256, xor32};
pub use utils::{
    base64_decode, base64_encode, constant_time_eq, generate_random_bytes, random_ascii,
};
