//! CLI argument parsing

use clap::Parser;
use std::path::PathBuf;

/// workshelf - file audio works into a tagged library
///
/// Scans the given roots for folders named with a product code, looks the
/// code up in the catalog, then copies each work's audio into
/// DEST/<maker>/<title>/ with tags and cover art embedded.
#[derive(Parser, Debug)]
#[command(name = "workshelf")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Root folders to scan for work folders
    #[arg(value_name = "ROOT", required = true)]
    pub roots: Vec<PathBuf>,

    /// Destination library root
    #[arg(short, long, value_name = "DIR")]
    pub dest: PathBuf,

    /// JSON config file
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    pub config: PathBuf,

    /// Verbose output (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (warnings only, no progress bars)
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,

    /// Dry run - resolve metadata and print the planned layout without writing
    #[arg(long, default_value = "false")]
    pub dry_run: bool,
}

impl Cli {
    /// Get the log filter directive based on verbosity flags
    pub fn log_filter(&self) -> &'static str {
        if self.quiet {
            return "warn";
        }
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}
