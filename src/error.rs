//! Custom error types for envi
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions. No variant ever carries a variable value,
//! decrypted text, a derived key or a passphrase.

use std::path::PathBuf;

use thiserror::Error;

use crate::crypto::envelope::NONCE_SIZE;

/// The main error type for envi operations
#[derive(Error, Debug)]
pub enum EnviError {
    /// A named source path does not exist
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Envelope too short to contain a nonce
    #[error("Malformed envelope: {len} bytes is shorter than the {}-byte nonce", NONCE_SIZE)]
    MalformedEnvelope { len: usize },

    /// Authenticated decryption failed
    ///
    /// Deliberately says nothing about whether the passphrase was wrong or
    /// the data was corrupted.
    #[error("Decryption failed: invalid passphrase or corrupted data")]
    Integrity,

    /// Text does not conform to the key/value format
    #[error("Failed to parse {origin}: {message}")]
    SourceParse { origin: String, message: String },

    /// An encrypted source could not be opened
    #[error("Failed to decrypt {}: {reason}", path.display())]
    SourceDecode {
        path: PathBuf,
        #[source]
        reason: Box<EnviError>,
    },

    /// A key is structurally invalid
    #[error("Invalid mapping: {0}")]
    InvalidMapping(String),

    /// No explicit sources and neither default file exists
    #[error("No source found: neither {} nor {} exists", encrypted.display(), plain.display())]
    NoSourceFound { encrypted: PathBuf, plain: PathBuf },

    /// Cipher setup or secure random source failure
    #[error("Encryption error: {0}")]
    Encryption(String),

    /// Passphrase acquisition errors
    #[error("Passphrase error: {0}")]
    Passphrase(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Child process could not be started
    #[error("Launch error: {0}")]
    Launch(String),
}

impl EnviError {
    /// Wrap an envelope failure with the path of the encrypted source
    pub fn source_decode(path: impl Into<PathBuf>, reason: EnviError) -> Self {
        Self::SourceDecode {
            path: path.into(),
            reason: Box::new(reason),
        }
    }

    /// Check if this is an integrity failure, directly or behind a source path
    pub fn is_integrity(&self) -> bool {
        match self {
            Self::Integrity => true,
            Self::SourceDecode { reason, .. } => reason.is_integrity(),
            _ => false,
        }
    }

    /// Check if this is a "file not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::FileNotFound(_))
    }
}

impl From<std::io::Error> for EnviError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Result type alias for envi operations
pub type EnviResult<T> = Result<T, EnviError>;
