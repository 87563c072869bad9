//! Tag container writing
//!
//! Tracks are tagged through the [`TagWriter`] capability so the pipeline can
//! be driven without touching real audio containers. [`LoftyTagWriter`] is the
//! production implementation.

pub mod writer;

pub use writer::LoftyTagWriter;

use crate::error::Result;
use std::path::Path;

/// How a container stores embedded pictures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagFormat {
    /// ID3v2 frames (MP3); a front cover replaces any previous one
    FrameBased,
    /// FLAC metadata blocks; pictures are appended as new blocks
    BlockBased,
}

/// Per-track fields written into a copied audio file
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TrackTags {
    pub title: String,
    /// Voice performers joined with the configured delimiter
    pub artist: String,
    pub album_artist: String,
    pub album: String,
    pub date: String,
    pub website: String,
    pub genres: Vec<String>,
    pub track_number: u32,
    pub disc_number: u32,
    pub disc_subtitle: Option<String>,
}

/// Writes metadata and artwork into audio files in place
pub trait TagWriter {
    /// Set every field of `tags` on the file at `path` and save it
    fn write_tags(&self, path: &Path, tags: &TrackTags) -> Result<()>;

    /// Embed `jpeg` as the front cover of the file at `path` and save it
    fn embed_cover(&self, path: &Path, jpeg: &[u8]) -> Result<()>;
}
