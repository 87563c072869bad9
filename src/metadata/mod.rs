//! Catalog metadata and cover art retrieval
//!
//! The pipeline only sees the [`MetadataClient`] and [`CoverSource`] traits;
//! the HTTP implementations here are thin adapters over `reqwest`.

pub mod cover;
pub mod http;

pub use cover::{CoverSource, HttpCoverSource, COVER_FILE_NAME};
pub use http::{ClientSettings, HttpMetadataClient, Locale};

use crate::types::WorkMetadata;
use thiserror::Error;

/// Why a metadata lookup failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connection(String),

    #[error("{status} {reason}")]
    HttpStatus { status: u16, reason: String },

    #[error("transport error: {0}")]
    Transport(String),
}

impl FetchError {
    /// Timeouts, connection problems and HTTP status failures happen in normal
    /// operation; anything else points at a bug or a broken endpoint
    pub fn is_expected(&self) -> bool {
        !matches!(self, FetchError::Transport(_))
    }
}

/// Resolves a product code to catalog metadata
pub trait MetadataClient {
    fn fetch(&self, product_code: &str) -> std::result::Result<WorkMetadata, FetchError>;
}
