use std::path::{Path, PathBuf};
use std::time::Duration;

use lofty::file::{AudioFile, TaggedFileExt};
use lofty::tag::Accessor;
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::display::display_from_fields;
use super::model::{TrackIndex, TrackRecord};
use super::LibraryError;

/// Tag fields the library cares about. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackMetadata {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub duration: Option<Duration>,
}

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("failed to read tags from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: lofty::error::LoftyError,
    },

    #[error("no readable metadata in {0}")]
    Unsupported(PathBuf),
}

pub trait MetadataReader {
    fn read(&self, path: &Path) -> Result<TrackMetadata, MetadataError>;
}

/// Reads tags and stream properties with `lofty`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoftyReader;

impl MetadataReader for LoftyReader {
    fn read(&self, path: &Path) -> Result<TrackMetadata, MetadataError> {
        let tagged = lofty::read_from_path(path).map_err(|source| MetadataError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let clean = |v: Option<std::borrow::Cow<'_, str>>| {
            v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
        };

        let duration = Some(tagged.properties().duration()).filter(|d| !d.is_zero());
        let mut meta = TrackMetadata {
            duration,
            ..TrackMetadata::default()
        };
        if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
            meta.title = clean(tag.title());
            meta.artist = clean(tag.artist());
            meta.album = clean(tag.album());
        }
        Ok(meta)
    }
}

fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Turn one file into a record, degrading to file stem and unknown duration
/// when its metadata cannot be read.
pub fn read_record(path: &Path, settings: &LibrarySettings, reader: &dyn MetadataReader) -> TrackRecord {
    let meta = reader.read(path).unwrap_or_else(|e| {
        debug!(error = %e, "metadata fallback");
        TrackMetadata::default()
    });

    let name = display_from_fields(
        path,
        meta.title.as_deref(),
        meta.artist.as_deref(),
        meta.album.as_deref(),
        &settings.display_fields,
        &settings.display_separator,
    );

    TrackRecord {
        path: path.to_path_buf(),
        name,
        duration: meta.duration,
        album: meta.album,
    }
}

/// Recursively collect every recognized audio file under `dir` into an index.
pub fn scan(
    dir: &Path,
    settings: &LibrarySettings,
    reader: &dyn MetadataReader,
) -> Result<TrackIndex, LibraryError> {
    if !dir.is_dir() {
        return Err(LibraryError::FolderNotFound(dir.to_path_buf()));
    }

    let walker = WalkDir::new(dir).follow_links(settings.follow_links);

    let mut tracks: Vec<TrackRecord> = Vec::new();
    for entry in walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                return Err(LibraryError::ReadFailure {
                    path: dir.to_path_buf(),
                    source: e.into(),
                });
            }
            Err(e) => {
                warn!(error = %e, "skipping unreadable entry");
                continue;
            }
        };

        let path = entry.path();
        if entry.file_type().is_file() && is_audio_file(path, settings) {
            tracks.push(read_record(path, settings, reader));
        }
    }

    if tracks.is_empty() {
        return Err(LibraryError::FolderEmpty(dir.to_path_buf()));
    }
    Ok(TrackIndex::new(tracks))
}
