//! Pipeline orchestration
//!
//! Wires the production collaborators (HTTP metadata and cover download,
//! lofty tag writing, terminal prompts) into the [`Organizer`].

pub mod disc;
pub mod orchestrator;

#[cfg(test)]
pub(crate) mod fakes;

pub use disc::{process_disc, DiscContext, DiscProgress};
pub use orchestrator::{Collaborators, Organizer, RunSummary, WorkOutcome, WorkStage};

use crate::config::Settings;
use crate::console::TermConsole;
use crate::discovery::RjCodeRecognizer;
use crate::error::{Result, ShelfError};
use crate::metadata::{HttpCoverSource, HttpMetadataClient};
use crate::tagging::LoftyTagWriter;
use std::time::Instant;
use tracing::info;

/// Run the full organizing pipeline with the production collaborators
pub fn run(settings: &Settings) -> Result<RunSummary> {
    let pipeline_start = Instant::now();

    let metadata = HttpMetadataClient::new(settings.client.clone())?;
    let covers = HttpCoverSource::new(&settings.client)?;
    let console = TermConsole::new();

    if !settings.dry_run {
        std::fs::create_dir_all(&settings.destination).map_err(|e| {
            ShelfError::Config(format!(
                "cannot create destination {}: {}",
                settings.destination.display(),
                e
            ))
        })?;
    }

    let organizer = Organizer::new(
        settings,
        Collaborators {
            recognizer: &RjCodeRecognizer,
            metadata: &metadata,
            covers: &covers,
            tags: &LoftyTagWriter,
            console: &console,
        },
    );
    let summary = organizer.run()?;

    info!(
        "Total pipeline time: {:.2}s",
        pipeline_start.elapsed().as_secs_f64()
    );
    Ok(summary)
}
