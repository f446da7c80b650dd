//! Default file locations for envi
//!
//! Used when no explicit sources are given.
//!
//! ## Path Resolution Order
//!
//! 1. `ENVI_DIR` environment variable (if set), otherwise the current directory
//! 2. `ENVI_ENCRYPTED_FILE` / `ENVI_PLAIN_FILE` replace the default file names;
//!    absolute values are used as-is

use std::path::PathBuf;

/// Default encrypted file name
pub const DEFAULT_ENCRYPTED_FILE: &str = ".env.AES";

/// Default plain file name
pub const DEFAULT_PLAIN_FILE: &str = ".env";

/// Manages the default source paths used by envi
#[derive(Debug, Clone)]
pub struct EnviPaths {
    /// Directory the default files are resolved against
    base_dir: PathBuf,
    encrypted_file: PathBuf,
    plain_file: PathBuf,
}

impl EnviPaths {
    /// Create a new EnviPaths instance from the process environment
    pub fn new() -> Self {
        let base_dir = std::env::var_os("ENVI_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        let encrypted_file = std::env::var_os("ENVI_ENCRYPTED_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ENCRYPTED_FILE));

        let plain_file = std::env::var_os("ENVI_PLAIN_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PLAIN_FILE));

        Self {
            base_dir,
            encrypted_file,
            plain_file,
        }
    }

    /// Create EnviPaths with a custom base directory and default file names
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            encrypted_file: PathBuf::from(DEFAULT_ENCRYPTED_FILE),
            plain_file: PathBuf::from(DEFAULT_PLAIN_FILE),
        }
    }

    /// Get the path to the default encrypted file (.env.AES)
    pub fn encrypted_file(&self) -> PathBuf {
        self.base_dir.join(&self.encrypted_file)
    }

    /// Get the path to the default plain file (.env)
    pub fn plain_file(&self) -> PathBuf {
        self.base_dir.join(&self.plain_file)
    }
}

impl Default for EnviPaths {
    fn default() -> Self {
        Self::new()
    }
}
