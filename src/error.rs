//! Error types for qobuz-dl
//!
//! This module provides the error handling for the library:
//! - A crate-wide [`Error`] with contextual variants for configuration, transport,
//!   catalog and filesystem failures
//! - A dedicated [`TagError`] for the tagging adapter, so a failed tag can be told
//!   apart from a failed download at the track boundary

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for qobuz-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for qobuz-dl
///
/// This is the primary error type used throughout the library. Each variant includes
/// contextual information to help diagnose issues.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "quality")
        key: Option<String>,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Network error (stream fetch, cover or booklet download)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The catalog client failed to resolve an item
    #[error("catalog error: {0}")]
    Catalog(String),

    /// Catalog metadata is missing a field the pipeline requires
    #[error("invalid metadata: {0}")]
    Metadata(String),

    /// Tagging failed
    #[error("tagging error: {0}")]
    Tag(#[from] TagError),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Errors raised by a [`Tagger`](crate::tagging::Tagger) implementation
#[derive(Debug, Error)]
pub enum TagError {
    /// The downloaded file could not be opened or parsed as audio
    #[error("failed to read {path}: {reason}")]
    Read {
        /// The temporary file that could not be read
        path: PathBuf,
        /// The reason reading failed
        reason: String,
    },

    /// Tags could not be written back into the file
    #[error("failed to write tags to {path}: {reason}")]
    Write {
        /// The file being tagged
        path: PathBuf,
        /// The reason writing failed
        reason: String,
    },

    /// Cover art could not be loaded for embedding
    #[error("failed to load cover art {path}: {reason}")]
    Cover {
        /// The cover image path
        path: PathBuf,
        /// The reason loading failed
        reason: String,
    },

    /// The tagged file could not be moved to its final name
    #[error("failed to move {source_path} to {dest_path}: {reason}")]
    Rename {
        /// The temporary file
        source_path: PathBuf,
        /// The final destination
        dest_path: PathBuf,
        /// The reason the move failed
        reason: String,
    },
}

impl Error {
    /// Shorthand for a configuration error tied to a specific key
    pub(crate) fn config(message: impl Into<String>, key: &str) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.to_string()),
        }
    }
}
