//! Key derivation using SHA-256
//!
//! Derives the AES-256 key from a user passphrase with a single SHA-256
//! digest. There is no salt and no work factor, so weak passphrases are open
//! to offline brute force. The envelope format has no room for KDF parameters.

use sha2::{Digest, Sha256};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Length of the derived key in bytes (AES-256)
pub const KEY_SIZE: usize = 32;

/// A derived encryption key
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SymmetricKey {
    key: [u8; KEY_SIZE],
}

impl SymmetricKey {
    /// Get the key bytes
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.key
    }
}

// Never print key material
impl std::fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SymmetricKey([REDACTED])")
    }
}

/// Derive an encryption key from raw passphrase bytes
///
/// Deterministic and infallible: the empty passphrase derives a key too.
pub fn derive_key(passphrase: &[u8]) -> SymmetricKey {
    let digest = Sha256::digest(passphrase);

    let mut key = [0u8; KEY_SIZE];
    key.copy_from_slice(&digest);

    SymmetricKey { key }
}
