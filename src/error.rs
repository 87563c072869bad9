//! Unified error types for workshelf
//!
//! Error strategy:
//! - Per-work errors (metadata, destination, cover, copy, tags): logged with
//!   the product code and the batch moves on to the next work folder
//! - Run errors (configuration, console I/O): fatal, abort the batch
//!
//! Messages name the paths and URLs involved so a single work folder can be
//! fixed by hand and re-run.

use crate::metadata::FetchError;
use std::path::PathBuf;
use thiserror::Error;

/// Audio formats picked up from disc folders, for error messages
pub const SUPPORTED_FORMATS: &str = "FLAC, MP3";

/// Top-level error type for workshelf operations
#[derive(Debug, Error)]
pub enum ShelfError {
    // =========================================================================
    // Work-scoped errors - log, skip the work, continue batch
    // =========================================================================
    #[error("Metadata lookup failed for {code}: {source}")]
    Metadata {
        code: String,
        #[source]
        source: FetchError,
    },

    #[error("Cannot file '{source_folder}' into '{existing}': the destination exists and is not a directory\n  Tip: Move or rename the existing entry, then re-run this work")]
    DestinationConflict {
        source_folder: PathBuf,
        existing: PathBuf,
    },

    #[error("Cannot download cover: {url} -> '{path}': {reason}")]
    CoverDownload {
        url: String,
        path: PathBuf,
        reason: String,
    },

    #[error("Unsupported audio format for '{path}'\n  Supported formats: {SUPPORTED_FORMATS}")]
    UnsupportedFormat { path: PathBuf },

    #[error("Failed to write tags to '{path}': {reason}")]
    TagWrite { path: PathBuf, reason: String },

    #[error("Failed to copy '{from}' -> '{to}': {reason}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        reason: String,
    },

    // =========================================================================
    // Fatal errors - abort entire batch
    // =========================================================================
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Cannot load config file '{path}': {reason}\n  Tip: Pass a different file with --config")]
    ConfigFile { path: PathBuf, reason: String },

    #[error("Invalid renamer template '{0}': it must contain 'rjcode' so the product code is never dropped")]
    InvalidTemplate(String),

    #[error("Console interaction failed: {0}")]
    Console(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for workshelf operations
pub type Result<T> = std::result::Result<T, ShelfError>;

impl ShelfError {
    /// Returns true if this error must abort the whole run instead of one work
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ShelfError::Config(_)
                | ShelfError::ConfigFile { .. }
                | ShelfError::InvalidTemplate(_)
                | ShelfError::Console(_)
        )
    }

    /// Create a copy error from an IO failure
    pub fn copy_error(
        from: impl Into<PathBuf>,
        to: impl Into<PathBuf>,
        err: std::io::Error,
    ) -> Self {
        ShelfError::Copy {
            from: from.into(),
            to: to.into(),
            reason: err.to_string(),
        }
    }

    /// Create a tag write error with the offending file
    pub fn tag_write(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        ShelfError::TagWrite {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
