//! Product code recognition from folder names

use once_cell::sync::Lazy;
use regex::Regex;

/// Extracts a catalog product code from a folder's base name
pub trait CodeRecognizer {
    fn extract_code(&self, folder_name: &str) -> Option<String>;
}

/// RJ/BJ/VJ codes followed by 6 or 8 digits, not part of a longer token
static RJCODE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:^|[^a-z0-9])((?:rj|bj|vj)(?:[0-9]{8}|[0-9]{6}))(?:[^0-9]|$)")
        .expect("valid product code pattern")
});

/// Recognizes DLsite-style product codes
#[derive(Debug, Clone, Copy, Default)]
pub struct RjCodeRecognizer;

impl CodeRecognizer for RjCodeRecognizer {
    fn extract_code(&self, folder_name: &str) -> Option<String> {
        RJCODE
            .captures(folder_name)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_uppercase())
    }
}
