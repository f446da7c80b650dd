//! Cryptographic functions for envi
//!
//! Provides AES-256-GCM envelopes keyed by a SHA-256 digest of the
//! user passphrase.

pub mod envelope;
pub mod key_derivation;
pub mod secure_memory;

pub use envelope::{open, seal, NONCE_SIZE, TAG_SIZE};
pub use key_derivation::{derive_key, SymmetricKey, KEY_SIZE};
pub use secure_memory::Passphrase;
