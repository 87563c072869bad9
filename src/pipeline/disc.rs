//! Per-folder disc processing
//!
//! One source folder may hold a FLAC group and an MP3 group. Each group the
//! user accepts is copied into the destination work folder, tagged, given the
//! cover art, and consumes one disc number.

use crate::console::Console;
use crate::error::{Result, ShelfError};
use crate::metadata::COVER_FILE_NAME;
use crate::naming::{clean_title, select_tags, sniff_disc_subtitle, sniff_title};
use crate::tagging::{TagWriter, TrackTags};
use crate::types::{AudioFormat, RenamerConfig, WorkMetadata};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Collaborators and options needed to process discs of one work
pub struct DiscContext<'a> {
    pub renamer: &'a RenamerConfig,
    pub tags: &'a dyn TagWriter,
    pub console: &'a dyn Console,
    pub show_progress: bool,
}

/// Files of `format` directly inside `dir`, sorted by name
pub fn collect_audio_files(dir: &Path, format: AudioFormat) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file() && format.matches(e.path()))
        .map(|e| e.into_path())
        .collect()
}

/// Work-level fields shared by every track of a work
pub fn album_tags(metadata: &WorkMetadata, renamer: &RenamerConfig) -> TrackTags {
    TrackTags {
        artist: metadata.cvs.join(&renamer.delimiter),
        album_artist: metadata.maker_name.clone(),
        album: clean_title(&metadata.work_name, renamer.exclude_brackets_in_title),
        date: metadata.release_date.clone(),
        website: metadata.catalog_url(),
        genres: select_tags(
            &metadata.tags,
            &renamer.tags.ordered_list,
            renamer.tags.max_number,
        ),
        ..TrackTags::default()
    }
}

/// Disc counter state after one source folder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscProgress {
    /// Number offered to the next accepted group
    pub next_disc_number: u32,
    /// Groups copied from this folder
    pub groups: u32,
}

/// Process one source folder starting at `disc_number`
pub fn process_disc(
    ctx: &DiscContext<'_>,
    source: &Path,
    destination: &Path,
    metadata: &WorkMetadata,
    disc_number: u32,
) -> Result<DiscProgress> {
    let mut disc_number = disc_number;
    let mut groups = 0;

    for format in AudioFormat::ALL {
        let files = collect_audio_files(source, format);
        if files.is_empty() {
            continue;
        }

        ctx.console.say(&format!(
            "Found {} {} files in {}",
            files.len(),
            format.extension(),
            source.display()
        ));
        if !ctx.console.confirm("Add these files? (y/n) ")? {
            debug!("Skipped {} group in {}", format.extension(), source.display());
            continue;
        }

        disc_number = ask_disc_number(ctx.console, disc_number)?;
        let subtitle = ask_disc_subtitle(ctx.console, source)?;
        debug!("disc_number: {}, disc_subtitle: {:?}", disc_number, subtitle);

        copy_and_tag(ctx, &files, destination, metadata, disc_number, subtitle)?;
        info!(
            "[{}] -> Disc {}: {} {} tracks",
            metadata.product_code,
            disc_number,
            files.len(),
            format.extension()
        );

        disc_number = disc_number.saturating_add(1);
        groups += 1;
    }

    Ok(DiscProgress {
        next_disc_number: disc_number,
        groups,
    })
}

/// Largest disc number a user may enter; the counter must still advance past it
const MAX_DISC_NUMBER: u32 = u32::MAX - 1;

fn ask_disc_number(console: &dyn Console, current: u32) -> Result<u32> {
    let default = current.to_string();
    let answer = console.ask(
        &format!("Disc number (default {}): ", current),
        Some(&default),
    )?;
    Ok(parse_disc_number(&answer).unwrap_or(current))
}

/// Positive disc number in range, `None` for anything else
fn parse_disc_number(answer: &str) -> Option<u32> {
    answer
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|n| (1..=MAX_DISC_NUMBER).contains(n))
}

fn ask_disc_subtitle(console: &dyn Console, source: &Path) -> Result<Option<String>> {
    let folder_name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    if let Some(candidate) = sniff_disc_subtitle(&folder_name) {
        if console.confirm(&format!("Use disc subtitle: [{}]? (y/n) ", candidate))? {
            return Ok(Some(candidate));
        }
    }

    let answer = console.ask("Disc subtitle: ", Some(""))?;
    if answer.is_empty() {
        console.say("No disc subtitle");
        Ok(None)
    } else {
        Ok(Some(answer))
    }
}

fn copy_and_tag(
    ctx: &DiscContext<'_>,
    files: &[PathBuf],
    destination: &Path,
    metadata: &WorkMetadata,
    disc_number: u32,
    disc_subtitle: Option<String>,
) -> Result<()> {
    let base = album_tags(metadata, ctx.renamer);
    let cover_path = destination.join(COVER_FILE_NAME);
    let cover = if cover_path.is_file() {
        Some(fs::read(&cover_path)?)
    } else {
        None
    };

    let progress = ctx.show_progress.then(|| {
        let pb = ProgressBar::new(files.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        pb
    });

    for (index, source_file) in files.iter().enumerate() {
        let Some(file_name) = source_file.file_name() else {
            continue;
        };
        let file_name_str = file_name.to_string_lossy();
        let target = destination.join(file_name);

        fs::copy(source_file, &target)
            .map_err(|e| ShelfError::copy_error(source_file, &target, e))?;

        let title = sniff_title(&file_name_str).unwrap_or_else(|| {
            Path::new(file_name)
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default()
        });
        let tags = TrackTags {
            title,
            track_number: index as u32 + 1,
            disc_number,
            disc_subtitle: disc_subtitle.clone(),
            ..base.clone()
        };
        ctx.tags.write_tags(&target, &tags)?;
        if let Some(jpeg) = &cover {
            ctx.tags.embed_cover(&target, jpeg)?;
        }

        if let Some(pb) = &progress {
            pb.inc(1);
            pb.set_message(file_name_str.into_owned());
        }
    }

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }
    Ok(())
}
