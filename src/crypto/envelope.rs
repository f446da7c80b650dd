//! AES-256-GCM envelope sealing and opening
//!
//! An envelope is `nonce || ciphertext || tag` with no header: a fresh
//! 96-bit nonce from the OS random source per seal, empty associated data.
//! Opening is all-or-nothing; no plaintext leaves this module on failure.

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::{
    aead::{Aead, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};

use crate::error::{EnviError, EnviResult};

use super::SymmetricKey;

/// Size of the AES-GCM nonce in bytes (96 bits)
pub const NONCE_SIZE: usize = 12;

/// Size of the AES-GCM authentication tag in bytes
pub const TAG_SIZE: usize = 16;

fn cipher(key: &SymmetricKey) -> EnviResult<Aes256Gcm> {
    Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| EnviError::Encryption(format!("Failed to create cipher: {}", e)))
}

/// Encrypt plaintext into a new envelope
///
/// Fails only if the cipher cannot be built or the random source is unavailable.
pub fn seal(plaintext: &[u8], key: &SymmetricKey) -> EnviResult<Vec<u8>> {
    let cipher = cipher(key)?;

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    OsRng
        .try_fill_bytes(&mut nonce_bytes)
        .map_err(|e| EnviError::Encryption(format!("Random source unavailable: {}", e)))?;
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext)
        .map_err(|_| EnviError::Encryption("Encryption failed".to_string()))?;

    let mut envelope = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
    envelope.extend_from_slice(&nonce_bytes);
    envelope.extend_from_slice(&ciphertext);
    Ok(envelope)
}

/// Decrypt an envelope
///
/// Envelopes shorter than the nonce are rejected as malformed before any
/// decryption attempt. Every authentication failure maps to `Integrity`.
pub fn open(envelope: &[u8], key: &SymmetricKey) -> EnviResult<Vec<u8>> {
    if envelope.len() < NONCE_SIZE {
        return Err(EnviError::MalformedEnvelope {
            len: envelope.len(),
        });
    }

    let cipher = cipher(key)?;
    let (nonce_bytes, ciphertext) = envelope.split_at(NONCE_SIZE);

    cipher
        .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
        .map_err(|_| EnviError::Integrity)
}
