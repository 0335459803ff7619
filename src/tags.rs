// Audio metadata tag access
//
// The workflow only depends on the `TagProcessor` trait; the concrete
// implementation reads and writes tags through lofty. Tests substitute
// mocks so no real audio files are needed.

use std::path::Path;

use lofty::config::WriteOptions;
use lofty::file::TaggedFileExt;
use lofty::probe::Probe;
use lofty::tag::{Accessor, ItemKey, ItemValue, Tag, TagExt, TagItem};
use tracing::debug;

use crate::error::{Result, RomajiError};

/// The metadata fields the converter touches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackTags {
    pub title: Option<String>,
    pub performers: Vec<String>,
    pub album_artists: Vec<String>,
    pub album: Option<String>,
}

/// Main trait for tag read/write operations
#[cfg_attr(test, mockall::automock)]
pub trait TagProcessor: Send + Sync {
    /// Read the converter-relevant fields; a file without a tag reads as
    /// all-empty rather than an error.
    fn read_tags(&self, path: &Path) -> Result<TrackTags>;

    /// Write the fields back, creating the primary tag when missing.
    fn write_tags(&self, path: &Path, tags: &TrackTags) -> Result<()>;
}

/// Factory for creating tag processor instances
pub struct TagProcessorFactory;

impl TagProcessorFactory {
    /// Create the default lofty-backed tag processor
    pub fn create_processor() -> Box<dyn TagProcessor> {
        Box::new(LoftyTagProcessor)
    }
}

/// Concrete implementation of tag access (lofty-based)
pub struct LoftyTagProcessor;

impl TagProcessor for LoftyTagProcessor {
    fn read_tags(&self, path: &Path) -> Result<TrackTags> {
        let tagged = Probe::open(path)
            .map_err(|e| RomajiError::Tag(format!("Failed to open {}: {}", path.display(), e)))?
            .read()
            .map_err(|e| RomajiError::Tag(format!("Failed to read {}: {}", path.display(), e)))?;

        let tag = match tagged.primary_tag().or_else(|| tagged.first_tag()) {
            Some(tag) => tag,
            None => {
                debug!("No tag present in {}", path.display());
                return Ok(TrackTags::default());
            }
        };

        Ok(TrackTags {
            title: tag.title().map(|s| s.to_string()),
            performers: tag
                .get_strings(&ItemKey::TrackArtist)
                .map(str::to_string)
                .collect(),
            album_artists: tag
                .get_strings(&ItemKey::AlbumArtist)
                .map(str::to_string)
                .collect(),
            album: tag.album().map(|s| s.to_string()),
        })
    }

    fn write_tags(&self, path: &Path, tags: &TrackTags) -> Result<()> {
        let mut tagged = Probe::open(path)
            .map_err(|e| RomajiError::Tag(format!("Failed to open {}: {}", path.display(), e)))?
            .read()
            .map_err(|e| RomajiError::Tag(format!("Failed to read {}: {}", path.display(), e)))?;

        if tagged.primary_tag_mut().is_none() {
            let tag_type = tagged.primary_tag_type();
            tagged.insert_tag(Tag::new(tag_type));
        }

        let Some(tag) = tagged.primary_tag_mut() else {
            return Err(RomajiError::Tag(format!(
                "No writable tag for {}",
                path.display()
            )));
        };

        match &tags.title {
            Some(title) => tag.set_title(title.clone()),
            None => tag.remove_title(),
        }
        match &tags.album {
            Some(album) => tag.set_album(album.clone()),
            None => tag.remove_album(),
        }

        replace_all_values(tag, ItemKey::TrackArtist, &tags.performers);
        replace_all_values(tag, ItemKey::AlbumArtist, &tags.album_artists);

        tag.save_to_path(path, WriteOptions::default())
            .map_err(|e| RomajiError::Tag(format!("Failed to write {}: {}", path.display(), e)))?;

        debug!("Wrote tags to {}", path.display());
        Ok(())
    }
}

fn replace_all_values(tag: &mut Tag, key: ItemKey, values: &[String]) {
    tag.take(&key).for_each(drop);
    for value in values {
        tag.push(TagItem::new(key.clone(), ItemValue::Text(value.clone())));
    }
}
