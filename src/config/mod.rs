//! Configuration module for envi
//!
//! Resolves the default source file locations and their environment
//! overrides.

pub mod paths;

pub use paths::EnviPaths;
