//! JSON config file
//!
//! Every key is optional except `scraper_endpoint`; [`ConfigFile::verify`]
//! reports all problems at once so the user can fix the file in one pass.

use crate::discovery::DEFAULT_MAX_DEPTH;
use crate::error::{Result, ShelfError};
use crate::metadata::Locale;
use crate::types::{TagRule, TEMPLATE_CODE_MARKER};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Longest accepted timeout or request spacing, in seconds
pub const MAX_SECONDS: f64 = 3600.0;

/// On-disk configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub scanner_max_depth: usize,
    pub scraper_endpoint: String,
    pub scraper_locale: Locale,
    /// Seconds
    pub scraper_connect_timeout: f64,
    /// Seconds
    pub scraper_read_timeout: f64,
    /// Seconds between metadata requests
    pub scraper_sleep_interval: f64,
    pub scraper_http_proxy: Option<String>,
    pub renamer_template: String,
    pub renamer_delimiter: String,
    pub renamer_exclude_square_brackets_in_work_name_flag: bool,
    pub renamer_illegal_character_to_full_width_flag: bool,
    pub renamer_tags_ordered_list: Vec<TagRule>,
    /// 0 = unlimited
    pub renamer_tags_max_number: usize,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            scanner_max_depth: DEFAULT_MAX_DEPTH,
            scraper_endpoint: String::new(),
            scraper_locale: Locale::default(),
            scraper_connect_timeout: 10.0,
            scraper_read_timeout: 10.0,
            scraper_sleep_interval: 3.0,
            scraper_http_proxy: None,
            renamer_template: "[maker_name][rjcode] work_name cv_list_str".to_string(),
            renamer_delimiter: " ".to_string(),
            renamer_exclude_square_brackets_in_work_name_flag: false,
            renamer_illegal_character_to_full_width_flag: false,
            renamer_tags_ordered_list: Vec::new(),
            renamer_tags_max_number: 0,
        }
    }
}

impl ConfigFile {
    /// Read and parse a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ShelfError::ConfigFile {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&content).map_err(|e| ShelfError::ConfigFile {
            path: path.to_path_buf(),
            reason: format!("invalid JSON: {}", e),
        })
    }

    /// Every rule the file violates, empty when valid
    pub fn verify(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.scraper_endpoint.trim().is_empty() {
            errors.push("scraper_endpoint must be set".to_string());
        } else if !self.scraper_endpoint.contains("{code}") {
            errors.push("scraper_endpoint must contain the {code} placeholder".to_string());
        }

        for (key, value) in [
            ("scraper_connect_timeout", self.scraper_connect_timeout),
            ("scraper_read_timeout", self.scraper_read_timeout),
        ] {
            if !value.is_finite() || value <= 0.0 || value > MAX_SECONDS {
                errors.push(format!(
                    "{} must be a positive number of seconds up to {}",
                    key, MAX_SECONDS
                ));
            }
        }
        let sleep = self.scraper_sleep_interval;
        if !sleep.is_finite() || !(0.0..=MAX_SECONDS).contains(&sleep) {
            errors.push(format!(
                "scraper_sleep_interval must be between 0 and {} seconds",
                MAX_SECONDS
            ));
        }

        if let Some(proxy) = &self.scraper_http_proxy {
            if !(proxy.starts_with("http://")
                || proxy.starts_with("https://")
                || proxy.starts_with("socks5://"))
            {
                errors.push(format!("scraper_http_proxy '{}' is not a proxy URL", proxy));
            }
        }

        if !self.renamer_template.contains(TEMPLATE_CODE_MARKER) {
            errors.push(format!(
                "renamer_template must contain '{}'",
                TEMPLATE_CODE_MARKER
            ));
        }

        for rule in &self.renamer_tags_ordered_list {
            if rule.source().is_empty() || rule.output().is_empty() {
                errors.push(format!(
                    "renamer_tags_ordered_list contains an empty tag: {:?}",
                    rule
                ));
            }
        }

        errors
    }
}
