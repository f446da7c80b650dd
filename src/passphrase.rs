//! Passphrase acquisition
//!
//! Encoding and decoding never read the terminal themselves; callers inject a
//! [`PassphraseSource`] instead.

use std::path::Path;

use crate::crypto::Passphrase;
use crate::error::{EnviError, EnviResult};

/// Why a passphrase is being requested
#[derive(Debug, Clone, Copy)]
pub enum PassphrasePurpose<'a> {
    /// Decrypting the encrypted source at this path
    Decrypt(&'a Path),
    /// Sealing a new envelope at this path
    Encrypt(&'a Path),
}

/// Supplies passphrases on demand
pub trait PassphraseSource {
    /// Obtain a passphrase for the given purpose
    fn acquire(&self, purpose: PassphrasePurpose<'_>) -> EnviResult<Passphrase>;
}

/// Prompts on the terminal with hidden input
#[derive(Debug, Clone, Default)]
pub struct PromptPassphrase;

impl PromptPassphrase {
    pub fn new() -> Self {
        Self
    }
}

impl PassphraseSource for PromptPassphrase {
    fn acquire(&self, purpose: PassphrasePurpose<'_>) -> EnviResult<Passphrase> {
        match purpose {
            PassphrasePurpose::Decrypt(path) => {
                prompt(&format!("Enter passphrase for {}: ", path.display()))
            }
            PassphrasePurpose::Encrypt(path) => {
                let first = prompt(&format!("Enter new passphrase for {}: ", path.display()))?;
                let second = prompt("Confirm passphrase: ")?;

                if first != second {
                    return Err(EnviError::Passphrase("Passphrases do not match".to_string()));
                }

                Ok(first)
            }
        }
    }
}

/// Prompt for a passphrase (hidden input)
fn prompt(message: &str) -> EnviResult<Passphrase> {
    rpassword::prompt_password(message)
        .map(Passphrase::from)
        .map_err(|e| EnviError::Passphrase(format!("Failed to read passphrase: {}", e)))
}

/// Hands out the same passphrase for every request
///
/// Used for non-interactive runs where the passphrase comes from the
/// environment.
pub struct StaticPassphrase {
    passphrase: Passphrase,
}

impl StaticPassphrase {
    pub fn new(passphrase: impl Into<Passphrase>) -> Self {
        Self {
            passphrase: passphrase.into(),
        }
    }
}

impl PassphraseSource for StaticPassphrase {
    fn acquire(&self, _purpose: PassphrasePurpose<'_>) -> EnviResult<Passphrase> {
        Ok(Passphrase::new(self.passphrase.as_bytes()))
    }
}
