//! CLI command handlers
//!
//! This module turns parsed flags into source lists and overrides and
//! bridges them to the store, the source reader and the launcher.

pub mod commands;

use std::path::PathBuf;

use clap::Parser;

use crate::config::EnviPaths;
use crate::source::Source;

pub use commands::{handle_dump, handle_encode, handle_run};

/// Command line for envi
#[derive(Parser, Debug)]
#[command(
    name = "envi",
    version,
    about = "A simple tool to encrypt and decrypt environment variables",
    long_about = "envi encrypts environment variables into a .env.AES file with a \
                  passphrase and later injects them into a command's environment.",
    override_usage = "envi [flags] [--] <command> [arguments...]\n       \
                      Note: if there are overlapping flags, use '--' to separate flags from arguments."
)]
pub struct Cli {
    /// Encrypt the resolved environment variables into a .env.AES file
    #[arg(short = 'E', long, conflicts_with = "dump")]
    pub encode: bool,

    /// Destination of --encode (defaults to the default encrypted file)
    #[arg(short, long, value_name = "PATH", requires = "encode")]
    pub output: Option<PathBuf>,

    /// Adopt the current process's environment variables
    #[arg(short = 'A', long)]
    pub adopt: bool,

    /// Add the default .env file as a plain source
    #[arg(short, long)]
    pub add: bool,

    /// Plain .env file to read (repeatable)
    #[arg(short, long = "file", value_name = "PATH")]
    pub files: Vec<PathBuf>,

    /// Encrypted .env.AES file to read (repeatable)
    #[arg(short, long = "input", value_name = "PATH")]
    pub inputs: Vec<PathBuf>,

    /// Environment variable as KEY:VALUE; takes precedence over every source
    #[arg(short, long = "env", value_name = "KEY:VALUE")]
    pub envs: Vec<String>,

    /// Print the resolved variables as dotenv text instead of running a command
    #[arg(long)]
    pub dump: bool,

    /// Passphrase for every encrypted file (skips the prompt)
    #[arg(long, env = "ENVI_PASSPHRASE", hide = true, hide_env_values = true)]
    pub passphrase: Option<String>,

    /// Show debug information
    #[arg(short, long)]
    pub debug: bool,

    /// Command to run, followed by its arguments
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}

impl Cli {
    /// Sources in precedence order within their class
    ///
    /// An empty list lets the source reader pick a default file. Outside
    /// `--encode`, plain sources without any `-i` are layered under the
    /// default encrypted file when it exists.
    pub fn sources(&self, paths: &EnviPaths) -> Vec<Source> {
        let mut sources = Vec::new();

        if self.adopt {
            sources.push(Source::ProcessEnvironment);
        }
        if self.add {
            sources.push(Source::PlainFile(paths.plain_file()));
        }
        sources.extend(self.files.iter().cloned().map(Source::PlainFile));
        sources.extend(self.inputs.iter().cloned().map(Source::EncryptedFile));

        if !self.encode && self.inputs.is_empty() && !sources.is_empty() {
            let encrypted = paths.encrypted_file();
            if encrypted.exists() {
                sources.push(Source::EncryptedFile(encrypted));
            }
        }

        sources
    }

    /// Where --encode writes
    pub fn output_path(&self, paths: &EnviPaths) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| paths.encrypted_file())
    }
}
