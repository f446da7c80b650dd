//! Encrypted environment store
//!
//! Composes the codec, key derivation and envelope into `encode` and
//! `decode`, plus file helpers that write envelopes atomically.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::debug;

use crate::codec::{CodecError, DotenvCodec, EnvCodec};
use crate::crypto::{derive_key, envelope};
use crate::error::{EnviError, EnviResult};
use crate::mapping::EnvMapping;

/// Seals mappings into envelopes and opens them again
pub struct EnvStore {
    codec: Box<dyn EnvCodec>,
}

impl Default for EnvStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvStore {
    /// Create a store using the dotenv codec
    pub fn new() -> Self {
        Self::with_codec(DotenvCodec)
    }

    /// Create a store with a custom codec
    pub fn with_codec(codec: impl EnvCodec + 'static) -> Self {
        Self {
            codec: Box::new(codec),
        }
    }

    /// Serialize and encrypt a mapping
    ///
    /// Invalid keys fail with `InvalidMapping` before any cryptographic work.
    pub fn encode(&self, mapping: &EnvMapping, passphrase: &[u8]) -> EnviResult<Vec<u8>> {
        let text = self
            .codec
            .serialize(mapping)
            .map_err(|e| EnviError::InvalidMapping(e.to_string()))?;

        let key = derive_key(passphrase);
        envelope::seal(text.as_bytes(), &key)
    }

    /// Decrypt and parse an envelope
    ///
    /// Envelope failures propagate unchanged; unparseable plaintext becomes
    /// `SourceParse`.
    pub fn decode(&self, data: &[u8], passphrase: &[u8]) -> EnviResult<EnvMapping> {
        let key = derive_key(passphrase);
        let plaintext = envelope::open(data, &key)?;

        let text = String::from_utf8(plaintext)
            .map_err(|_| decrypted_parse_error(CodecError::Encoding))?;

        self.codec.deserialize(&text).map_err(decrypted_parse_error)
    }

    /// Parse plain env file text
    pub fn parse_plain(&self, text: &str) -> Result<EnvMapping, CodecError> {
        self.codec.deserialize(text)
    }

    /// Render a mapping as plain env file text
    pub fn render_plain(&self, mapping: &EnvMapping) -> EnviResult<String> {
        self.codec
            .serialize(mapping)
            .map_err(|e| EnviError::InvalidMapping(e.to_string()))
    }

    /// Encode a mapping and write it to `path` atomically
    pub fn write_file(
        &self,
        path: &Path,
        mapping: &EnvMapping,
        passphrase: &[u8],
    ) -> EnviResult<()> {
        let data = self.encode(mapping, passphrase)?;
        write_atomic(path, &data)?;

        debug!(path = %path.display(), variables = mapping.len(), "encrypted data written");
        Ok(())
    }

    /// Read and decode the envelope at `path`
    ///
    /// Envelope failures are reported as `SourceDecode` carrying the path.
    pub fn read_file(&self, path: &Path, passphrase: &[u8]) -> EnviResult<EnvMapping> {
        let data = read_existing(path)?;

        self.decode(&data, passphrase).map_err(|e| match e {
            EnviError::Integrity | EnviError::MalformedEnvelope { .. } => {
                EnviError::source_decode(path, e)
            }
            EnviError::SourceParse { message, .. } => EnviError::SourceParse {
                origin: path.display().to_string(),
                message,
            },
            other => other,
        })
    }
}

fn decrypted_parse_error(err: CodecError) -> EnviError {
    EnviError::SourceParse {
        origin: "decrypted data".to_string(),
        message: err.to_string(),
    }
}

/// Read a whole file, failing with `FileNotFound` if it is absent
pub fn read_existing(path: &Path) -> EnviResult<Vec<u8>> {
    if !path.exists() {
        return Err(EnviError::FileNotFound(path.to_path_buf()));
    }

    fs::read(path).map_err(|e| EnviError::Io(format!("Failed to read {}: {}", path.display(), e)))
}

/// Write bytes to a file atomically (write to temp, then rename)
///
/// The file is either completely written or not modified at all.
pub fn write_atomic(path: &Path, data: &[u8]) -> EnviResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            EnviError::Io(format!("Failed to create directory {}: {}", parent.display(), e))
        })?;
    }

    let mut temp_name = path.file_name().unwrap_or_default().to_os_string();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    let file = File::create(&temp_path)
        .map_err(|e| EnviError::Io(format!("Failed to create temp file: {}", e)))?;

    let mut writer = BufWriter::new(file);
    writer
        .write_all(data)
        .map_err(|e| EnviError::Io(format!("Failed to write data: {}", e)))?;

    writer
        .flush()
        .map_err(|e| EnviError::Io(format!("Failed to flush data: {}", e)))?;

    // Sync to disk before rename
    writer
        .get_ref()
        .sync_all()
        .map_err(|e| EnviError::Io(format!("Failed to sync data: {}", e)))?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        EnviError::Io(format!("Failed to rename temp file: {}", e))
    })?;

    Ok(())
}
