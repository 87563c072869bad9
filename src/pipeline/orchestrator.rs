//! Work folder orchestration
//!
//! Each candidate folder moves through
//! `Discovered -> CodeExtracted -> MetadataResolved -> DestinationBuilt ->
//! CoverFetched -> DiscsProcessed`. A folder without a product code is
//! skipped without side effects. A failure past code extraction is logged
//! against the code and the batch continues with the next folder; whatever
//! was already written for that work stays in place.

use super::disc::{collect_audio_files, process_disc, DiscContext};
use crate::config::Settings;
use crate::console::Console;
use crate::discovery::{CodeRecognizer, Scanner};
use crate::error::{Result, ShelfError};
use crate::metadata::{CoverSource, MetadataClient};
use crate::naming::{clean_title, render_template, sanitize};
use crate::tagging::TagWriter;
use crate::types::{AudioFormat, WorkMetadata};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Furthest state a work folder reached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkStage {
    Discovered,
    CodeExtracted,
    MetadataResolved,
    DestinationBuilt,
    CoverFetched,
    DiscsProcessed,
}

impl fmt::Display for WorkStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WorkStage::Discovered => "discovered",
            WorkStage::CodeExtracted => "code extracted",
            WorkStage::MetadataResolved => "metadata resolved",
            WorkStage::DestinationBuilt => "destination built",
            WorkStage::CoverFetched => "cover fetched",
            WorkStage::DiscsProcessed => "discs processed",
        };
        f.write_str(name)
    }
}

/// Result of processing one candidate folder
#[derive(Debug)]
pub enum WorkOutcome {
    /// Folder name carries no product code; nothing was touched
    SkippedNoCode,
    /// All discs processed into `destination`
    Organized {
        code: String,
        destination: PathBuf,
        /// Format groups copied, whatever numbers the user gave them
        discs: u32,
    },
    /// Dry run: metadata resolved, nothing written
    Planned { code: String, destination: PathBuf },
    /// Failed after `stage`; partial output is left in place
    Failed {
        code: String,
        stage: WorkStage,
        error: ShelfError,
    },
}

/// Pipeline result summary
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Folders visited by the root scan
    pub scanned: usize,
    /// Folders carrying a product code
    pub discovered: usize,
    pub organized: usize,
    pub planned: usize,
    pub failed: usize,
}

impl RunSummary {
    fn record(&mut self, outcome: &WorkOutcome) {
        self.scanned += 1;
        match outcome {
            WorkOutcome::SkippedNoCode => {}
            WorkOutcome::Organized { .. } => {
                self.discovered += 1;
                self.organized += 1;
            }
            WorkOutcome::Planned { .. } => {
                self.discovered += 1;
                self.planned += 1;
            }
            WorkOutcome::Failed { .. } => {
                self.discovered += 1;
                self.failed += 1;
            }
        }
    }
}

/// External capabilities the orchestrator drives
pub struct Collaborators<'a> {
    pub recognizer: &'a dyn CodeRecognizer,
    pub metadata: &'a dyn MetadataClient,
    pub covers: &'a dyn CoverSource,
    pub tags: &'a dyn TagWriter,
    pub console: &'a dyn Console,
}

/// Drives work folders from discovery to tagged output
pub struct Organizer<'a> {
    settings: &'a Settings,
    scanner: Scanner,
    io: Collaborators<'a>,
}

impl<'a> Organizer<'a> {
    pub fn new(settings: &'a Settings, io: Collaborators<'a>) -> Self {
        Self {
            settings,
            scanner: Scanner::new(settings.scanner_max_depth),
            io,
        }
    }

    /// Process every configured root; only fatal errors stop the run
    pub fn run(&self) -> Result<RunSummary> {
        let mut summary = RunSummary::default();
        for root in &self.settings.roots {
            if !root.is_dir() {
                warn!("Skipping root that is not a directory: {}", root.display());
                continue;
            }
            info!("Scanning {}", root.display());
            for folder in self.scanner.scan(root) {
                let outcome = self.process_work(&folder)?;
                summary.record(&outcome);
            }
        }
        Ok(summary)
    }

    /// Take one candidate folder as far through the pipeline as it goes
    ///
    /// Work-scoped failures come back as [`WorkOutcome::Failed`]; `Err` is
    /// reserved for errors that must abort the run.
    pub fn process_work(&self, folder: &Path) -> Result<WorkOutcome> {
        let folder_name = folder
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let Some(code) = self.io.recognizer.extract_code(&folder_name) else {
            return Ok(WorkOutcome::SkippedNoCode);
        };

        info!("[{}] -> Found work folder: {}", code, folder.display());
        let mut stage = WorkStage::CodeExtracted;
        match self.advance(&code, folder, &mut stage) {
            Ok(outcome) => Ok(outcome),
            Err(e) if e.is_fatal() => {
                error!("[{}] -> Aborting run: {}", code, e);
                Err(e)
            }
            Err(e) => {
                log_failure(&code, &e);
                Ok(WorkOutcome::Failed {
                    code,
                    stage,
                    error: e,
                })
            }
        }
    }

    fn advance(&self, code: &str, folder: &Path, stage: &mut WorkStage) -> Result<WorkOutcome> {
        let metadata = self
            .io
            .metadata
            .fetch(code)
            .map_err(|source| ShelfError::Metadata {
                code: code.to_string(),
                source,
            })?;
        *stage = WorkStage::MetadataResolved;

        if self.settings.dry_run {
            return Ok(self.plan(folder, &metadata));
        }

        info!("[{}] -> Create folder structure", code);
        let destination = self.build_destination(folder, &metadata)?;
        *stage = WorkStage::DestinationBuilt;

        info!("[{}] -> Download cover", code);
        self.io.covers.fetch_cover(&metadata.cover_url, &destination)?;
        *stage = WorkStage::CoverFetched;

        info!("[{}] -> Start interactive tagging", code);
        let ctx = DiscContext {
            renamer: &self.settings.renamer,
            tags: self.io.tags,
            console: self.io.console,
            show_progress: self.settings.show_progress,
        };
        let mut disc_number = 1;
        let mut discs = 0;
        for source in self.scanner.scan(folder) {
            let progress = process_disc(&ctx, &source, &destination, &metadata, disc_number)?;
            disc_number = progress.next_disc_number;
            discs += progress.groups;
        }
        *stage = WorkStage::DiscsProcessed;

        info!("[{}] -> Done: {}", code, destination.display());
        Ok(WorkOutcome::Organized {
            code: code.to_string(),
            destination,
            discs,
        })
    }

    /// `destination / maker / title`, both sanitized
    ///
    /// A component that sanitizes to nothing falls back to the product code.
    pub fn destination_for(&self, metadata: &WorkMetadata) -> PathBuf {
        let renamer = &self.settings.renamer;
        let component = |text: &str| {
            let name = sanitize(text, renamer.illegal_char_to_fullwidth);
            if name.is_empty() {
                sanitize(&metadata.product_code, renamer.illegal_char_to_fullwidth)
            } else {
                name
            }
        };
        let maker = component(&metadata.maker_name);
        let title = component(&clean_title(
            &metadata.work_name,
            renamer.exclude_brackets_in_title,
        ));
        self.settings.destination.join(maker).join(title)
    }

    fn build_destination(&self, folder: &Path, metadata: &WorkMetadata) -> Result<PathBuf> {
        let destination = self.destination_for(metadata);
        if let Some(maker_dir) = destination.parent() {
            ensure_dir(folder, maker_dir)?;
        }
        ensure_dir(folder, &destination)?;
        Ok(destination)
    }

    fn plan(&self, folder: &Path, metadata: &WorkMetadata) -> WorkOutcome {
        let renamer = &self.settings.renamer;
        let destination = self.destination_for(metadata);
        let name = render_template(
            renamer.template(),
            metadata,
            &renamer.delimiter,
            renamer.exclude_brackets_in_title,
            renamer.illegal_char_to_fullwidth,
        );

        println!();
        println!("{}", name);
        println!("  from: {}", folder.display());
        println!("  to:   {}", destination.display());
        for source in self.scanner.scan(folder) {
            for format in AudioFormat::ALL {
                let count = collect_audio_files(&source, format).len();
                if count > 0 {
                    println!(
                        "    {} {} files in {}",
                        count,
                        format.extension(),
                        source.display()
                    );
                }
            }
        }

        WorkOutcome::Planned {
            code: metadata.product_code.clone(),
            destination,
        }
    }
}

/// Create `dir` unless it already exists as a directory
fn ensure_dir(source_folder: &Path, dir: &Path) -> Result<()> {
    if dir.is_dir() {
        debug!("Reusing {}", dir.display());
        return Ok(());
    }
    if dir.exists() {
        return Err(ShelfError::DestinationConflict {
            source_folder: source_folder.to_path_buf(),
            existing: dir.to_path_buf(),
        });
    }
    fs::create_dir(dir)?;
    Ok(())
}

/// Expected network trouble is a warning; everything else is an error
fn log_failure(code: &str, err: &ShelfError) {
    match err {
        ShelfError::Metadata { source, .. } if source.is_expected() => {
            warn!("[{}] -> Failed: {}", code, source);
        }
        ShelfError::Metadata { source, .. } => {
            error!("[{}] -> Failed: {}", code, source);
        }
        other => error!("[{}] -> Failed: {}", code, other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{FetchError, COVER_FILE_NAME};
    use crate::pipeline::fakes::{
        sample_metadata, sample_renamer, PrefixRecognizer, RecordingTagWriter,
        ScriptedConsole, StubCoverSource, TableMetadataClient,
    };
    use tempfile::TempDir;

    struct Fixture {
        input: TempDir,
        output: TempDir,
        settings: Settings,
    }

    fn fixture() -> Fixture {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        let settings = Settings::new(
            vec![input.path().to_path_buf()],
            output.path().to_path_buf(),
            sample_renamer(),
        );
        Fixture {
            input,
            output,
            settings,
        }
    }

    fn collaborators<'a>(
        metadata: &'a TableMetadataClient,
        covers: &'a StubCoverSource,
        tags: &'a RecordingTagWriter,
        console: &'a ScriptedConsole,
    ) -> Collaborators<'a> {
        Collaborators {
            recognizer: &PrefixRecognizer,
            metadata,
            covers,
            tags,
            console,
        }
    }

    #[test]
    fn test_folder_without_code_has_no_side_effects() {
        let fx = fixture();
        let folder = fx.input.path().join("Unrelated Album");
        fs::create_dir(&folder).unwrap();
        fs::write(folder.join("01 a.flac"), b"a").unwrap();

        let metadata = TableMetadataClient::default();
        let (covers, tags, console) = (
            StubCoverSource::default(),
            RecordingTagWriter::default(),
            ScriptedConsole::new(&[]),
        );
        let organizer = Organizer::new(
            &fx.settings,
            collaborators(&metadata, &covers, &tags, &console),
        );

        let outcome = organizer.process_work(&folder).unwrap();
        assert!(matches!(outcome, WorkOutcome::SkippedNoCode));
        assert!(metadata.calls().is_empty());
        assert_eq!(fs::read_dir(fx.output.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_cover_failure_is_work_scoped() {
        let fx = fixture();
        let folder = fx.input.path().join("RJ123456 Sample Work");
        fs::create_dir(&folder).unwrap();
        fs::write(folder.join("01 Intro.flac"), b"a").unwrap();

        let metadata = TableMetadataClient::default().with("RJ123456", Ok(sample_metadata()));
        let covers = StubCoverSource { fail: true };
        let (tags, console) = (RecordingTagWriter::default(), ScriptedConsole::new(&[]));
        let organizer = Organizer::new(
            &fx.settings,
            collaborators(&metadata, &covers, &tags, &console),
        );

        match organizer.process_work(&folder).unwrap() {
            WorkOutcome::Failed { code, stage, error } => {
                assert_eq!(code, "RJ123456");
                assert_eq!(stage, WorkStage::DestinationBuilt);
                assert!(matches!(error, ShelfError::CoverDownload { .. }));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        // Partial output stays: the directory tree was already built
        assert!(fx.output.path().join("Circle A/Sample Work").is_dir());
        assert!(tags.writes().is_empty());
    }

    #[test]
    fn test_destination_conflict_names_both_paths() {
        let fx = fixture();
        let folder = fx.input.path().join("RJ123456 Sample Work");
        fs::create_dir(&folder).unwrap();
        fs::write(fx.output.path().join("Circle A"), b"not a dir").unwrap();

        let metadata = TableMetadataClient::default().with("RJ123456", Ok(sample_metadata()));
        let (covers, tags, console) = (
            StubCoverSource::default(),
            RecordingTagWriter::default(),
            ScriptedConsole::new(&[]),
        );
        let organizer = Organizer::new(
            &fx.settings,
            collaborators(&metadata, &covers, &tags, &console),
        );

        match organizer.process_work(&folder).unwrap() {
            WorkOutcome::Failed {
                stage,
                error: ShelfError::DestinationConflict { source_folder, existing },
                ..
            } => {
                assert_eq!(stage, WorkStage::MetadataResolved);
                assert_eq!(source_folder, folder);
                assert_eq!(existing, fx.output.path().join("Circle A"));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_console_failure_aborts_run() {
        let fx = fixture();
        let folder = fx.input.path().join("RJ123456 Sample Work");
        fs::create_dir(&folder).unwrap();
        fs::write(folder.join("01 Intro.flac"), b"a").unwrap();

        let metadata = TableMetadataClient::default().with("RJ123456", Ok(sample_metadata()));
        // No scripted answers: the first prompt fails
        let (covers, tags, console) = (
            StubCoverSource::default(),
            RecordingTagWriter::default(),
            ScriptedConsole::new(&[]),
        );
        let organizer = Organizer::new(
            &fx.settings,
            collaborators(&metadata, &covers, &tags, &console),
        );

        let err = organizer.run().unwrap_err();
        assert!(matches!(err, ShelfError::Console(_)));
    }

    #[test]
    fn test_disc_numbers_thread_across_subfolders() {
        let fx = fixture();
        let folder = fx.input.path().join("RJ123456 Sample Work");
        for disc in ["01 Main", "02 Bonus"] {
            fs::create_dir_all(folder.join(disc)).unwrap();
            fs::write(folder.join(disc).join(format!("{}.flac", disc)), b"a").unwrap();
        }

        let metadata = TableMetadataClient::default().with("RJ123456", Ok(sample_metadata()));
        let (covers, tags) = (StubCoverSource::default(), RecordingTagWriter::default());
        let console = ScriptedConsole::new(&["y", "", "y", "y", "", "y"]);
        let organizer = Organizer::new(
            &fx.settings,
            collaborators(&metadata, &covers, &tags, &console),
        );

        match organizer.process_work(&folder).unwrap() {
            WorkOutcome::Organized { discs, destination, .. } => {
                assert_eq!(discs, 2);
                assert!(destination.join(COVER_FILE_NAME).is_file());
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        let writes = tags.writes();
        let discs: Vec<_> = writes.iter().map(|(_, t)| t.disc_number).collect();
        assert_eq!(discs, vec![1, 2]);
        assert_eq!(writes[1].1.disc_subtitle.as_deref(), Some("Bonus"));
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let mut fx = fixture();
        fx.settings.dry_run = true;
        let folder = fx.input.path().join("RJ123456 Sample Work");
        fs::create_dir(&folder).unwrap();
        fs::write(folder.join("01 Intro.flac"), b"a").unwrap();

        let metadata = TableMetadataClient::default().with("RJ123456", Ok(sample_metadata()));
        let (covers, tags, console) = (
            StubCoverSource::default(),
            RecordingTagWriter::default(),
            ScriptedConsole::new(&[]),
        );
        let organizer = Organizer::new(
            &fx.settings,
            collaborators(&metadata, &covers, &tags, &console),
        );

        let summary = organizer.run().unwrap();
        assert_eq!(summary.planned, 1);
        assert_eq!(summary.organized, 0);
        assert_eq!(fs::read_dir(fx.output.path()).unwrap().count(), 0);
        assert!(console.prompts().is_empty());
    }

    #[test]
    fn test_fetch_failures_are_recorded() {
        let fx = fixture();
        for name in ["RJ000001 Timeout", "RJ000002 Broken"] {
            fs::create_dir(fx.input.path().join(name)).unwrap();
        }

        let metadata = TableMetadataClient::default()
            .with("RJ000001", Err(FetchError::Timeout))
            .with("RJ000002", Err(FetchError::Transport("bad body".into())));
        let (covers, tags, console) = (
            StubCoverSource::default(),
            RecordingTagWriter::default(),
            ScriptedConsole::new(&[]),
        );
        let organizer = Organizer::new(
            &fx.settings,
            collaborators(&metadata, &covers, &tags, &console),
        );

        let summary = organizer.run().unwrap();
        assert_eq!(summary.discovered, 2);
        assert_eq!(summary.failed, 2);
        assert_eq!(metadata.calls(), vec!["RJ000001", "RJ000002"]);
        assert_eq!(fs::read_dir(fx.output.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_destination_is_sanitized() {
        let mut fx = fixture();
        fx.settings.renamer.exclude_brackets_in_title = true;
        fx.settings.renamer.illegal_char_to_fullwidth = true;

        let metadata = TableMetadataClient::default();
        let (covers, tags, console) = (
            StubCoverSource::default(),
            RecordingTagWriter::default(),
            ScriptedConsole::new(&[]),
        );
        let organizer = Organizer::new(
            &fx.settings,
            collaborators(&metadata, &covers, &tags, &console),
        );

        let mut work = sample_metadata();
        work.maker_name = "Circle/A".into();
        work.work_name = "【New】 Q&A: Part 1?".into();
        assert_eq!(
            organizer.destination_for(&work),
            fx.output.path().join("Circle／A").join("Q&A： Part 1？")
        );
    }

    #[test]
    fn test_disc_count_ignores_chosen_numbers() {
        let fx = fixture();
        let folder = fx.input.path().join("RJ123456 Sample Work");
        fs::create_dir(&folder).unwrap();
        fs::write(folder.join("01 Intro.flac"), b"a").unwrap();

        let metadata = TableMetadataClient::default().with("RJ123456", Ok(sample_metadata()));
        let (covers, tags) = (StubCoverSource::default(), RecordingTagWriter::default());
        // Add, jump to disc 9, keep the sniffed subtitle
        let console = ScriptedConsole::new(&["y", "9", "y"]);
        let organizer = Organizer::new(
            &fx.settings,
            collaborators(&metadata, &covers, &tags, &console),
        );

        match organizer.process_work(&folder).unwrap() {
            WorkOutcome::Organized { discs, .. } => assert_eq!(discs, 1),
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(tags.writes()[0].1.disc_number, 9);
    }

    #[test]
    fn test_empty_name_components_fall_back_to_code() {
        let fx = fixture();
        let metadata = TableMetadataClient::default();
        let (covers, tags, console) = (
            StubCoverSource::default(),
            RecordingTagWriter::default(),
            ScriptedConsole::new(&[]),
        );
        let organizer = Organizer::new(
            &fx.settings,
            collaborators(&metadata, &covers, &tags, &console),
        );

        let mut work = sample_metadata();
        work.maker_name = "???".into();
        work.work_name = " ** ".into();
        assert_eq!(
            organizer.destination_for(&work),
            fx.output.path().join("RJ123456").join("RJ123456")
        );

        work.maker_name = "Circle A".into();
        assert_eq!(
            organizer.destination_for(&work),
            fx.output.path().join("Circle A").join("RJ123456")
        );
    }
}
