//! Text serialization of environment mappings
//!
//! The [`EnvCodec`] trait is the seam between envi and the line-oriented
//! `NAME=VALUE` format. [`DotenvCodec`] parses with `dotenvy` and writes one
//! double-quoted assignment per line, sorted by key.

use std::io::Cursor;

use thiserror::Error;

use crate::mapping::EnvMapping;

/// Codec failures
///
/// Messages identify a position, never the text of the offending line, since
/// that text may be decrypted secret material.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Text is not valid dotenv syntax
    #[error("malformed assignment on line {line}")]
    Parse { line: usize },

    /// Text could not be read as UTF-8
    #[error("text is not valid UTF-8")]
    Encoding,

    /// A key cannot be represented as a dotenv assignment
    #[error("invalid variable name {0:?}")]
    InvalidKey(String),
}

/// Converts between mappings and env file text
pub trait EnvCodec {
    /// Render a mapping as text
    fn serialize(&self, mapping: &EnvMapping) -> Result<String, CodecError>;

    /// Parse text into a mapping
    fn deserialize(&self, text: &str) -> Result<EnvMapping, CodecError>;
}

/// dotenv-format codec
#[derive(Debug, Clone, Copy, Default)]
pub struct DotenvCodec;

impl EnvCodec for DotenvCodec {
    fn serialize(&self, mapping: &EnvMapping) -> Result<String, CodecError> {
        let mut out = String::new();
        for (key, value) in mapping {
            validate_key(key)?;
            out.push_str(key);
            out.push('=');
            if is_integer(value) {
                out.push_str(value);
            } else {
                out.push('"');
                out.push_str(&escape_value(value));
                out.push('"');
            }
            out.push('\n');
        }
        Ok(out)
    }

    fn deserialize(&self, text: &str) -> Result<EnvMapping, CodecError> {
        let mut mapping = EnvMapping::new();
        for item in dotenvy::from_read_iter(Cursor::new(text.as_bytes())) {
            match item {
                Ok((key, value)) => {
                    mapping.insert(key, value);
                }
                Err(dotenvy::Error::LineParse(line, _)) => {
                    return Err(CodecError::Parse {
                        line: line_number(text, &line),
                    });
                }
                Err(_) => return Err(CodecError::Encoding),
            }
        }
        Ok(mapping)
    }
}

/// Check that a key can be written as a dotenv assignment
///
/// Keys must be non-empty, contain no `=` or NUL, and match
/// `[A-Za-z_][A-Za-z0-9_.]*`.
pub fn validate_key(key: &str) -> Result<(), CodecError> {
    let mut chars = key.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
        }
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(CodecError::InvalidKey(key.to_string()))
    }
}

fn is_integer(value: &str) -> bool {
    let digits = value.strip_prefix('-').unwrap_or(value);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn escape_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '$' => escaped.push_str("\\$"),
            '\n' => escaped.push_str("\\n"),
            _ => escaped.push(c),
        }
    }
    escaped
}

// dotenvy reports the failing line's text; map it back to a 1-based number
// so the text itself never reaches an error message.
fn line_number(text: &str, failing: &str) -> usize {
    let first = failing.lines().next().unwrap_or_default();
    text.lines()
        .position(|l| l == first)
        .map(|i| i + 1)
        .unwrap_or(0)
}
