//! envi - Encrypted environment variables for child processes
//!
//! This library protects a set of environment variables at rest by sealing
//! them into a single passphrase-encrypted file, and later resolves them,
//! together with the process environment and plain `.env` files, into the
//! environment of a child process.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `crypto`: SHA-256 key derivation and AES-256-GCM envelopes
//! - `codec`: dotenv text serialization
//! - `mapping`: environment mappings and precedence merging
//! - `store`: encode/decode of mappings to envelopes and files
//! - `source`: resolution of process, plain and encrypted sources
//! - `passphrase`: passphrase acquisition
//! - `config`: default file locations
//! - `launch`: child process execution
//! - `cli`: command line handling
//!
//! # Example
//!
//! ```rust,no_run
//! use envi::{EnvMapping, EnvStore};
//!
//! let store = EnvStore::new();
//! let mut vars = EnvMapping::new();
//! vars.insert("API_TOKEN".to_string(), "abc123".to_string());
//!
//! let envelope = store.encode(&vars, b"passphrase")?;
//! assert_eq!(store.decode(&envelope, b"passphrase")?, vars);
//! # Ok::<(), envi::EnviError>(())
//! ```

pub mod cli;
pub mod codec;
pub mod config;
pub mod crypto;
pub mod error;
pub mod launch;
pub mod mapping;
pub mod passphrase;
pub mod source;
pub mod store;

pub use error::{EnviError, EnviResult};
pub use mapping::EnvMapping;
pub use source::{ResolvedSources, Source, SourceReader};
pub use store::EnvStore;
