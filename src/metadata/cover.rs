//! Cover art download

use super::http::{build_client, ClientSettings};
use crate::error::{Result, ShelfError};
use reqwest::blocking::Client;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name of the downloaded cover inside a destination work folder
pub const COVER_FILE_NAME: &str = "cover.jpg";

/// Fetches a work's cover image into its destination folder
pub trait CoverSource {
    /// Store the image at `dest_dir/cover.jpg` and return that path
    fn fetch_cover(&self, url: &str, dest_dir: &Path) -> Result<PathBuf>;
}

/// [`CoverSource`] downloading over HTTP
#[derive(Debug)]
pub struct HttpCoverSource {
    client: Client,
}

impl HttpCoverSource {
    pub fn new(settings: &ClientSettings) -> Result<Self> {
        Ok(Self {
            client: build_client(settings)?,
        })
    }
}

impl CoverSource for HttpCoverSource {
    fn fetch_cover(&self, url: &str, dest_dir: &Path) -> Result<PathBuf> {
        let path = dest_dir.join(COVER_FILE_NAME);
        let wrap = |reason: String| ShelfError::CoverDownload {
            url: url.to_string(),
            path: path.clone(),
            reason,
        };

        debug!("Downloading cover {} -> {}", url, path.display());
        let mut response = self
            .client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| wrap(e.to_string()))?;

        let mut file = File::create(&path).map_err(|e| wrap(e.to_string()))?;
        response
            .copy_to(&mut file)
            .map_err(|e| wrap(e.to_string()))?;

        Ok(path)
    }
}
