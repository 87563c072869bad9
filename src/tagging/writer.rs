//! lofty-backed tag writer
//!
//! Uses lofty to write ID3v2 (MP3) and Vorbis comments + picture blocks (FLAC).

use super::{TagFormat, TagWriter, TrackTags};
use crate::error::{Result, ShelfError};
use lofty::config::WriteOptions;
use lofty::file::{FileType, TaggedFile, TaggedFileExt};
use lofty::picture::{MimeType, Picture, PictureType};
use lofty::probe::Probe;
use lofty::tag::{ItemKey, ItemValue, Tag, TagExt, TagItem};
use std::path::Path;
use tracing::debug;

impl TagFormat {
    /// Container family for a probed file type
    pub fn from_file_type(file_type: FileType) -> Option<Self> {
        match file_type {
            FileType::Mpeg => Some(TagFormat::FrameBased),
            FileType::Flac => Some(TagFormat::BlockBased),
            _ => None,
        }
    }

    /// Key the catalog URL is stored under
    fn website_item(self, url: &str) -> TagItem {
        match self {
            TagFormat::FrameBased => {
                TagItem::new(ItemKey::TrackArtistUrl, ItemValue::Locator(url.to_string()))
            }
            TagFormat::BlockBased => TagItem::new(
                ItemKey::Unknown("WEBSITE".to_string()),
                ItemValue::Text(url.to_string()),
            ),
        }
    }
}

/// [`TagWriter`] implementation on top of lofty
#[derive(Debug, Clone, Copy, Default)]
pub struct LoftyTagWriter;

impl LoftyTagWriter {
    fn open(path: &Path) -> Result<(TaggedFile, TagFormat)> {
        let tagged_file = Probe::open(path)
            .and_then(|probe| probe.read())
            .map_err(|e| ShelfError::tag_write(path, e))?;

        let format = TagFormat::from_file_type(tagged_file.file_type()).ok_or_else(|| {
            ShelfError::UnsupportedFormat {
                path: path.to_path_buf(),
            }
        })?;
        Ok((tagged_file, format))
    }

    /// Primary tag of the file, created empty if missing
    fn primary_tag<'a>(tagged_file: &'a mut TaggedFile, path: &Path) -> Result<&'a mut Tag> {
        let tag_type = tagged_file.primary_tag_type();
        if tagged_file.tag(tag_type).is_none() {
            tagged_file.insert_tag(Tag::new(tag_type));
        }
        tagged_file
            .tag_mut(tag_type)
            .ok_or_else(|| ShelfError::tag_write(path, "no writable tag"))
    }
}

impl TagWriter for LoftyTagWriter {
    fn write_tags(&self, path: &Path, tags: &TrackTags) -> Result<()> {
        let (mut tagged_file, format) = Self::open(path)?;
        let tag = Self::primary_tag(&mut tagged_file, path)?;

        tag.insert_text(ItemKey::TrackTitle, tags.title.clone());
        tag.insert_text(ItemKey::TrackArtist, tags.artist.clone());
        tag.insert_text(ItemKey::AlbumArtist, tags.album_artist.clone());
        tag.insert_text(ItemKey::AlbumTitle, tags.album.clone());
        tag.insert_text(ItemKey::RecordingDate, tags.date.clone());
        tag.insert_text(ItemKey::TrackNumber, tags.track_number.to_string());
        tag.insert_text(ItemKey::DiscNumber, tags.disc_number.to_string());
        if let Some(subtitle) = &tags.disc_subtitle {
            tag.insert_text(ItemKey::SetSubtitle, subtitle.clone());
        }

        let website = format.website_item(&tags.website);
        tag.remove_key(website.key());
        tag.insert_unchecked(website);

        tag.remove_key(&ItemKey::Genre);
        for genre in &tags.genres {
            tag.push(TagItem::new(ItemKey::Genre, ItemValue::Text(genre.clone())));
        }

        tag.save_to_path(path, WriteOptions::default())
            .map_err(|e| ShelfError::tag_write(path, e))?;
        debug!(
            "Tagged {} (track {}, disc {})",
            path.display(),
            tags.track_number,
            tags.disc_number
        );
        Ok(())
    }

    fn embed_cover(&self, path: &Path, jpeg: &[u8]) -> Result<()> {
        let (mut tagged_file, format) = Self::open(path)?;
        let tag = Self::primary_tag(&mut tagged_file, path)?;

        let picture = Picture::new_unchecked(
            PictureType::CoverFront,
            Some(MimeType::Jpeg),
            Some("Cover".to_string()),
            jpeg.to_vec(),
        );
        match format {
            TagFormat::FrameBased => {
                tag.remove_picture_type(PictureType::CoverFront);
                tag.push_picture(picture);
            }
            TagFormat::BlockBased => tag.push_picture(picture),
        }

        tag.save_to_path(path, WriteOptions::default())
            .map_err(|e| ShelfError::tag_write(path, e))?;
        debug!("Embedded cover into {}", path.display());
        Ok(())
    }
}
