//! Scripted collaborators for pipeline unit tests

use crate::console::{parse_yes_no, resolve_answer, Console};
use crate::discovery::CodeRecognizer;
use crate::error::{Result, ShelfError};
use crate::metadata::{CoverSource, FetchError, MetadataClient, COVER_FILE_NAME};
use crate::tagging::{TagWriter, TrackTags};
use crate::types::{RenamerConfig, TagsConfig, WorkMetadata};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};

pub fn sample_renamer() -> RenamerConfig {
    RenamerConfig::new(
        "[maker_name][rjcode] work_name",
        " ",
        false,
        false,
        TagsConfig::default(),
    )
    .unwrap()
}

pub fn sample_metadata() -> WorkMetadata {
    WorkMetadata {
        maker_name: "Circle A".into(),
        work_name: "Sample Work".into(),
        cvs: vec!["Voice1".into()],
        release_date: "2024-01-01".into(),
        product_code: "RJ123456".into(),
        tags: vec!["Drama".into()],
        cover_url: "http://img.example/RJ123456.jpg".into(),
    }
}

/// Replays canned answers and records every prompt
#[derive(Default)]
pub struct ScriptedConsole {
    answers: RefCell<VecDeque<String>>,
    prompts: RefCell<Vec<String>>,
}

impl ScriptedConsole {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: RefCell::new(answers.iter().map(|a| a.to_string()).collect()),
            prompts: RefCell::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.borrow().clone()
    }

    fn next_answer(&self, prompt: &str) -> Result<String> {
        self.prompts.borrow_mut().push(prompt.to_string());
        self.answers
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| ShelfError::Console(format!("no scripted answer for '{}'", prompt)))
    }
}

impl Console for ScriptedConsole {
    fn confirm(&self, prompt: &str) -> Result<bool> {
        let answer = self.next_answer(prompt)?;
        parse_yes_no(&answer)
            .ok_or_else(|| ShelfError::Console(format!("unscripted yes/no answer '{}'", answer)))
    }

    fn ask(&self, prompt: &str, default: Option<&str>) -> Result<String> {
        let answer = self.next_answer(prompt)?;
        resolve_answer(&answer, default)
            .ok_or_else(|| ShelfError::Console("blank answer without default".into()))
    }

    fn say(&self, _message: &str) {}
}

/// Records tag writes instead of touching audio files
#[derive(Default)]
pub struct RecordingTagWriter {
    writes: RefCell<Vec<(PathBuf, TrackTags)>>,
    covers: RefCell<Vec<PathBuf>>,
}

impl RecordingTagWriter {
    pub fn writes(&self) -> Vec<(PathBuf, TrackTags)> {
        self.writes.borrow().clone()
    }

    pub fn covers(&self) -> Vec<PathBuf> {
        self.covers.borrow().clone()
    }
}

impl TagWriter for RecordingTagWriter {
    fn write_tags(&self, path: &Path, tags: &TrackTags) -> Result<()> {
        self.writes
            .borrow_mut()
            .push((path.to_path_buf(), tags.clone()));
        Ok(())
    }

    fn embed_cover(&self, path: &Path, _jpeg: &[u8]) -> Result<()> {
        self.covers.borrow_mut().push(path.to_path_buf());
        Ok(())
    }
}

/// Answers lookups from a fixed table and counts calls
#[derive(Default)]
pub struct TableMetadataClient {
    entries: HashMap<String, std::result::Result<WorkMetadata, FetchError>>,
    calls: RefCell<Vec<String>>,
}

impl TableMetadataClient {
    pub fn with(
        mut self,
        code: &str,
        result: std::result::Result<WorkMetadata, FetchError>,
    ) -> Self {
        self.entries.insert(code.to_string(), result);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl MetadataClient for TableMetadataClient {
    fn fetch(&self, product_code: &str) -> std::result::Result<WorkMetadata, FetchError> {
        self.calls.borrow_mut().push(product_code.to_string());
        self.entries
            .get(product_code)
            .cloned()
            .unwrap_or_else(|| {
                Err(FetchError::HttpStatus {
                    status: 404,
                    reason: "Not Found".into(),
                })
            })
    }
}

/// Writes a fixed payload as the cover, or fails every download
#[derive(Default)]
pub struct StubCoverSource {
    pub fail: bool,
}

impl CoverSource for StubCoverSource {
    fn fetch_cover(&self, url: &str, dest_dir: &Path) -> Result<PathBuf> {
        let path = dest_dir.join(COVER_FILE_NAME);
        if self.fail {
            return Err(ShelfError::CoverDownload {
                url: url.to_string(),
                path,
                reason: "HTTP 404".into(),
            });
        }
        std::fs::write(&path, b"\xFF\xD8cover")?;
        Ok(path)
    }
}

/// Treats folder names starting with "RJ" + six digits as codes
pub struct PrefixRecognizer;

impl CodeRecognizer for PrefixRecognizer {
    fn extract_code(&self, folder_name: &str) -> Option<String> {
        let code = folder_name.get(..8)?;
        (code.starts_with("RJ") && code[2..].chars().all(|c| c.is_ascii_digit()))
            .then(|| code.to_string())
    }
}
