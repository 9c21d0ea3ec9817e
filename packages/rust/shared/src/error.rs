//! Error types for skillmap.
//!
//! Library crates use [`SkillmapError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.
//!
//! Row-level parse misses never surface here: they are dropped by the
//! extractor and only counted in its diagnostics.

use std::path::PathBuf;

/// Top-level error type for all skillmap operations.
#[derive(Debug, thiserror::Error)]
pub enum SkillmapError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// A page of the source document could not be read. Fatal for the run.
    #[error("document error on page {page}: {message}")]
    Document { page: usize, message: String },

    /// Structural parse error in an input file (page dump, JSON, TOML).
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Reference dictionary could not be loaded. Fatal at startup.
    #[error("reference dictionary error: {message}")]
    Reference { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Data validation error (bad page range, invalid option, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, SkillmapError>;

impl SkillmapError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a page read error for the given page index.
    pub fn document(page: usize, msg: impl Into<String>) -> Self {
        Self::Document {
            page,
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create a reference dictionary error from any displayable message.
    pub fn reference(msg: impl Into<String>) -> Self {
        Self::Reference {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
