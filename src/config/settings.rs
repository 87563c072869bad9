//! Runtime configuration settings

use super::cli::Cli;
use super::file::ConfigFile;
use crate::discovery::DEFAULT_MAX_DEPTH;
use crate::error::{Result, ShelfError};
use crate::metadata::ClientSettings;
use crate::types::{RenamerConfig, TagsConfig};
use std::path::PathBuf;
use std::time::Duration;

/// Runtime settings for the organizing pipeline
#[derive(Debug, Clone)]
pub struct Settings {
    /// Roots scanned for work folders
    pub roots: Vec<PathBuf>,
    /// Destination library root
    pub destination: PathBuf,
    /// Depth limit for both root and disc scans
    pub scanner_max_depth: usize,
    pub renamer: RenamerConfig,
    pub client: ClientSettings,
    /// Show progress bars
    pub show_progress: bool,
    /// Dry run mode - plan without writing
    pub dry_run: bool,
}

impl Settings {
    /// Create settings from CLI arguments and the config file they name
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let file = ConfigFile::load(&cli.config)?;
        let mut settings = Self::from_file(&file, cli.roots.clone(), cli.dest.clone())?;
        settings.show_progress = !cli.quiet;
        settings.dry_run = cli.dry_run;
        Ok(settings)
    }

    /// Validate a parsed config file and turn it into settings
    pub fn from_file(file: &ConfigFile, roots: Vec<PathBuf>, destination: PathBuf) -> Result<Self> {
        let errors = file.verify();
        if !errors.is_empty() {
            return Err(ShelfError::Config(errors.join("; ")));
        }

        let renamer = RenamerConfig::new(
            file.renamer_template.clone(),
            file.renamer_delimiter.clone(),
            file.renamer_exclude_square_brackets_in_work_name_flag,
            file.renamer_illegal_character_to_full_width_flag,
            TagsConfig::new(
                file.renamer_tags_ordered_list.clone(),
                file.renamer_tags_max_number,
            ),
        )?;

        let client = ClientSettings {
            endpoint: file.scraper_endpoint.clone(),
            locale: file.scraper_locale,
            connect_timeout: seconds("scraper_connect_timeout", file.scraper_connect_timeout)?,
            read_timeout: seconds("scraper_read_timeout", file.scraper_read_timeout)?,
            sleep_interval: seconds("scraper_sleep_interval", file.scraper_sleep_interval)?,
            proxy: file.scraper_http_proxy.clone(),
        };

        Ok(Self {
            roots,
            destination,
            scanner_max_depth: file.scanner_max_depth,
            renamer,
            client,
            show_progress: true,
            dry_run: false,
        })
    }

    /// Settings with default naming rules, for embedding and tests
    pub fn new(roots: Vec<PathBuf>, destination: PathBuf, renamer: RenamerConfig) -> Self {
        Self {
            roots,
            destination,
            scanner_max_depth: DEFAULT_MAX_DEPTH,
            renamer,
            client: ClientSettings::default(),
            show_progress: false,
            dry_run: false,
        }
    }
}

fn seconds(key: &str, value: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(value)
        .map_err(|e| ShelfError::Config(format!("{}: {}", key, e)))
}
