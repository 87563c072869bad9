//! workshelf - file audio works into a tagged library
//!
//! Finds work folders named with a catalog product code, resolves each code
//! to catalog metadata, and copies the audio into
//! `destination/<maker>/<title>/` with tags and cover art embedded.
//!
//! # Architecture
//!
//! The library is organized into several key modules:
//!
//! - `config`: CLI argument parsing, config file and runtime settings
//! - `discovery`: Bounded-depth directory scanning and product code recognition
//! - `naming`: Filesystem-safe names, title heuristics and genre selection
//! - `metadata`: Catalog metadata client and cover download
//! - `tagging`: Tag container writing (lofty)
//! - `console`: Interactive prompts
//! - `pipeline`: Per-work orchestration and disc processing
//!
//! # Example
//!
//! ```no_run
//! use workshelf::{config::{Cli, Settings}, pipeline};
//! use clap::Parser;
//!
//! let cli = Cli::parse();
//! let settings = Settings::from_cli(&cli).expect("Invalid configuration");
//! let summary = pipeline::run(&settings).expect("Run aborted");
//! println!("Organized {} works", summary.organized);
//! ```

pub mod config;
pub mod console;
pub mod discovery;
pub mod error;
pub mod metadata;
pub mod naming;
pub mod pipeline;
pub mod tagging;
pub mod types;

// Re-export key types at crate root
pub use error::{Result, ShelfError};
pub use types::{RenamerConfig, TagRule, TagsConfig, WorkMetadata};
