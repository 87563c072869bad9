//! Core data types for workshelf
//!
//! These types represent the domain model and flow through the pipeline.

use crate::error::{Result, ShelfError};
use serde::{Deserialize, Serialize};
use std::path::Path;

// =============================================================================
// Catalog metadata
// =============================================================================

/// Descriptive metadata for one work, as returned by the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkMetadata {
    pub maker_name: String,
    pub work_name: String,
    /// Voice performers, in catalog order
    #[serde(default)]
    pub cvs: Vec<String>,
    #[serde(default)]
    pub release_date: String,
    /// Uniquely identifies the work (e.g. "RJ123456")
    #[serde(default, alias = "rjcode")]
    pub product_code: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub cover_url: String,
}

impl WorkMetadata {
    /// Catalog page for this work, written into each track's website field
    pub fn catalog_url(&self) -> String {
        format!(
            "https://www.dlsite.com/maniax/work/=/product_id/{}.html",
            self.product_code
        )
    }
}

// =============================================================================
// Renamer configuration
// =============================================================================

/// One entry of the ordered tag list
///
/// Deserializes from either `"Tag"` or `["Source", "Replacement"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagRule {
    /// Keep the tag as-is
    Keep(String),
    /// Replace the source tag with another name
    Replace(String, String),
}

impl TagRule {
    /// The tag this rule looks for in a work's raw tags
    pub fn source(&self) -> &str {
        match self {
            TagRule::Keep(tag) => tag,
            TagRule::Replace(source, _) => source,
        }
    }

    /// The tag this rule emits when it matches
    pub fn output(&self) -> &str {
        match self {
            TagRule::Keep(tag) => tag,
            TagRule::Replace(_, replacement) => replacement,
        }
    }
}

/// Genre selection rules
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagsConfig {
    pub ordered_list: Vec<TagRule>,
    /// Count cap applied after reordering (`usize::MAX` when unlimited)
    pub max_number: usize,
}

impl TagsConfig {
    /// Build from the config-file representation, where 0 means unlimited
    pub fn new(ordered_list: Vec<TagRule>, max_number: usize) -> Self {
        Self {
            ordered_list,
            max_number: if max_number == 0 { usize::MAX } else { max_number },
        }
    }
}

impl Default for TagsConfig {
    fn default() -> Self {
        Self::new(Vec::new(), 0)
    }
}

/// Marker every renamer template must contain
pub const TEMPLATE_CODE_MARKER: &str = "rjcode";

/// Naming and tagging options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenamerConfig {
    template: String,
    pub delimiter: String,
    pub exclude_brackets_in_title: bool,
    pub illegal_char_to_fullwidth: bool,
    pub tags: TagsConfig,
}

impl RenamerConfig {
    /// Create a renamer config, rejecting templates that would drop the code
    pub fn new(
        template: impl Into<String>,
        delimiter: impl Into<String>,
        exclude_brackets_in_title: bool,
        illegal_char_to_fullwidth: bool,
        tags: TagsConfig,
    ) -> Result<Self> {
        let template = template.into();
        if !template.contains(TEMPLATE_CODE_MARKER) {
            return Err(ShelfError::InvalidTemplate(template));
        }
        Ok(Self {
            template,
            delimiter: delimiter.into(),
            exclude_brackets_in_title,
            illegal_char_to_fullwidth,
            tags,
        })
    }

    pub fn template(&self) -> &str {
        &self.template
    }
}

// =============================================================================
// Supported formats
// =============================================================================

/// Audio formats collected from disc folders, in processing order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioFormat {
    Flac,
    Mp3,
}

impl AudioFormat {
    /// Lossless first, then lossy
    pub const ALL: [AudioFormat; 2] = [AudioFormat::Flac, AudioFormat::Mp3];

    pub fn extension(self) -> &'static str {
        match self {
            AudioFormat::Flac => "flac",
            AudioFormat::Mp3 => "mp3",
        }
    }

    /// Detect format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "flac" => Some(AudioFormat::Flac),
            "mp3" => Some(AudioFormat::Mp3),
            _ => None,
        }
    }

    /// Check whether a path carries this format's extension
    pub fn matches(self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
            == Some(self)
    }
}
