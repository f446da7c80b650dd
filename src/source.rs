//! Source resolution
//!
//! Turns an ordered list of [`Source`]s into two accumulators, one for plain
//! sources and one for encrypted sources. Keeping them apart until
//! [`ResolvedSources::finalize`] is what makes encrypted values outrank plain
//! ones regardless of listing order.
//!
//! Final precedence, lowest to highest:
//! process environment < plain files < encrypted files < inline overrides

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::codec::validate_key;
use crate::config::EnviPaths;
use crate::error::{EnviError, EnviResult};
use crate::mapping::{mapping_from_environ, merge, merge_into, EnvMapping};
use crate::passphrase::{PassphrasePurpose, PassphraseSource};
use crate::store::{read_existing, EnvStore};

/// One origin of environment variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// The live process environment
    ProcessEnvironment,
    /// A plaintext env file
    PlainFile(PathBuf),
    /// An encrypted envelope file
    EncryptedFile(PathBuf),
}

impl Source {
    /// Whether this source feeds the encrypted accumulator
    pub fn is_encrypted(&self) -> bool {
        matches!(self, Self::EncryptedFile(_))
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProcessEnvironment => write!(f, "process environment"),
            Self::PlainFile(path) => write!(f, "plain file {}", path.display()),
            Self::EncryptedFile(path) => write!(f, "encrypted file {}", path.display()),
        }
    }
}

/// Where process environment entries come from
#[derive(Debug, Clone)]
enum Environ {
    Live,
    Captured(Vec<String>),
}

/// The two per-class accumulators produced by [`SourceReader::resolve`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedSources {
    /// Process environment and plain files, merged in listed order
    pub plain: EnvMapping,
    /// Encrypted files, merged in listed order
    pub encrypted: EnvMapping,
}

impl ResolvedSources {
    /// Apply the cross-class precedence: plain < encrypted < overrides
    pub fn finalize(self, overrides: &EnvMapping) -> EnvMapping {
        merge([self.plain, self.encrypted, overrides.clone()])
    }
}

/// Resolves sources into per-class mappings
pub struct SourceReader<'a> {
    store: &'a EnvStore,
    passphrases: &'a dyn PassphraseSource,
    paths: &'a EnviPaths,
    environ: Environ,
}

impl<'a> SourceReader<'a> {
    /// Create a reader over the live process environment
    pub fn new(
        store: &'a EnvStore,
        passphrases: &'a dyn PassphraseSource,
        paths: &'a EnviPaths,
    ) -> Self {
        Self {
            store,
            passphrases,
            paths,
            environ: Environ::Live,
        }
    }

    /// Use captured raw `NAME=VALUE` entries in place of the live environment
    pub fn with_environ<I, S>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.environ = Environ::Captured(entries.into_iter().map(Into::into).collect());
        self
    }

    /// Resolve sources strictly in order, failing fast on the first error
    ///
    /// An empty list falls back to the default encrypted file, then the
    /// default plain file, and fails with `NoSourceFound` if neither exists.
    pub fn resolve(&self, sources: &[Source]) -> EnviResult<ResolvedSources> {
        let defaulted;
        let sources = if sources.is_empty() {
            defaulted = [self.default_source()?];
            &defaulted[..]
        } else {
            sources
        };

        let mut resolved = ResolvedSources::default();
        for source in sources {
            debug!(%source, "resolving source");
            let mapping = self.read(source)?;
            debug!(%source, variables = mapping.len(), "source resolved");

            let accumulator = if source.is_encrypted() {
                &mut resolved.encrypted
            } else {
                &mut resolved.plain
            };
            merge_into(accumulator, mapping);
        }

        Ok(resolved)
    }

    fn default_source(&self) -> EnviResult<Source> {
        let encrypted = self.paths.encrypted_file();
        if encrypted.exists() {
            info!(path = %encrypted.display(), "using default encrypted file");
            return Ok(Source::EncryptedFile(encrypted));
        }

        let plain = self.paths.plain_file();
        if plain.exists() {
            info!(path = %plain.display(), "using default plain file");
            return Ok(Source::PlainFile(plain));
        }

        Err(EnviError::NoSourceFound { encrypted, plain })
    }

    fn read(&self, source: &Source) -> EnviResult<EnvMapping> {
        match source {
            Source::ProcessEnvironment => Ok(self.read_environ()),
            Source::PlainFile(path) => self.read_plain(path),
            Source::EncryptedFile(path) => self.read_encrypted(path),
        }
    }

    // Names the codec cannot write (exported shell functions etc.) are skipped
    fn read_environ(&self) -> EnvMapping {
        let mapping = match &self.environ {
            Environ::Captured(entries) => mapping_from_environ(entries),
            Environ::Live => std::env::vars_os()
                .filter_map(|(name, value)| match (name.into_string(), value.into_string()) {
                    (Ok(name), Ok(value)) => Some((name, value)),
                    _ => {
                        debug!("skipping non-UTF-8 environment entry");
                        None
                    }
                })
                .collect(),
        };

        mapping
            .into_iter()
            .filter(|(name, _)| {
                let keep = validate_key(name).is_ok();
                if !keep {
                    debug!(name = %name, "skipping environment variable with unsupported name");
                }
                keep
            })
            .collect()
    }

    fn read_plain(&self, path: &Path) -> EnviResult<EnvMapping> {
        let data = read_existing(path)?;
        let text = String::from_utf8(data).map_err(|_| EnviError::SourceParse {
            origin: path.display().to_string(),
            message: "text is not valid UTF-8".to_string(),
        })?;

        self.store
            .parse_plain(&text)
            .map_err(|e| EnviError::SourceParse {
                origin: path.display().to_string(),
                message: e.to_string(),
            })
    }

    fn read_encrypted(&self, path: &Path) -> EnviResult<EnvMapping> {
        if !path.exists() {
            return Err(EnviError::FileNotFound(path.to_path_buf()));
        }

        let passphrase = self.passphrases.acquire(PassphrasePurpose::Decrypt(path))?;
        self.store.read_file(path, passphrase.as_bytes())
    }
}
