//! Error types for the discovery pipeline.
//!
//! Library code uses `thiserror` for explicit error enums. Only configuration
//! errors cross into the caller as failures; runtime discovery problems are
//! logged where they happen.

use std::path::PathBuf;

use thiserror::Error;

/// Invalid configuration detected before any discovery work starts.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The note-name regular expression does not compile.
    #[error("invalid note pattern '{pattern}': {source}")]
    NotePattern {
        /// Pattern as supplied by the user.
        pattern: String,
        /// Underlying regex error.
        #[source]
        source: regex::Error,
    },

    /// The tag regular expression does not compile.
    #[error("invalid tag pattern '{pattern}': {source}")]
    TagPattern {
        /// Pattern as supplied by the user.
        pattern: String,
        /// Underlying regex error.
        #[source]
        source: regex::Error,
    },

    /// A finder name in the priority list is not known.
    #[error("unknown finder '{0}' (expected one of: index, glob, filesystem)")]
    UnknownFinder(String),

    /// The priority list names the same finder twice.
    #[error("finder '{0}' listed more than once")]
    DuplicateFinder(String),

    /// The note channel needs room for at least one note.
    #[error("channel capacity must be greater than zero")]
    ZeroCapacity,

    /// An explicitly requested settings file could not be read or parsed.
    #[error("failed to load settings from {path}: {reason}")]
    Settings {
        /// Settings file path.
        path: PathBuf,
        /// Human-readable cause.
        reason: String,
    },
}

/// Failure while persisting the path cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Low-level I/O error.
    #[error("cache IO error at {path}: {source}")]
    Io {
        /// Cache file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Paths could not be serialized.
    #[error("cache serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
