use std::path::Path;

use tracing::{debug, info, warn};

use crate::config::LibrarySettings;

use super::cache::SnapshotCache;
use super::model::TrackIndex;
use super::scan::{scan, MetadataReader};
use super::LibraryError;

/// Builds track indexes for folders, going through the snapshot cache when
/// one is configured.
pub struct LibraryLoader {
    settings: LibrarySettings,
    reader: Box<dyn MetadataReader>,
    cache: Option<SnapshotCache>,
}

impl LibraryLoader {
    pub fn new(
        settings: LibrarySettings,
        reader: Box<dyn MetadataReader>,
        cache: Option<SnapshotCache>,
    ) -> Self {
        Self {
            settings,
            reader,
            cache,
        }
    }

    /// Index `folder`, preferring a stored snapshot over a fresh scan.
    pub fn load(&self, folder: &Path) -> Result<TrackIndex, LibraryError> {
        if !folder.is_dir() {
            return Err(LibraryError::FolderNotFound(folder.to_path_buf()));
        }

        if let Some(cache) = &self.cache {
            match cache.load(folder) {
                Ok(Some(index)) if !index.is_empty() => {
                    debug!(folder = %folder.display(), tracks = index.len(), "snapshot hit");
                    return Ok(index);
                }
                Ok(_) => {}
                Err(e) => warn!(error = %e, "ignoring unreadable snapshot"),
            }
        }

        self.scan_and_store(folder)
    }

    /// Drop any snapshot for `folder` and scan it again.
    pub fn rescan(&self, folder: &Path) -> Result<TrackIndex, LibraryError> {
        if let Some(cache) = &self.cache {
            if let Err(e) = cache.invalidate(folder) {
                warn!(error = %e, "failed to remove snapshot");
            }
        }
        self.scan_and_store(folder)
    }

    fn scan_and_store(&self, folder: &Path) -> Result<TrackIndex, LibraryError> {
        let index = scan(folder, &self.settings, self.reader.as_ref())?;
        info!(
            folder = %folder.display(),
            tracks = index.len(),
            albums = index.albums().len(),
            "scanned library"
        );

        if let Some(cache) = &self.cache {
            if let Err(e) = cache.store(folder, &index) {
                warn!(error = %e, "failed to write snapshot");
            }
        }
        Ok(index)
    }
}
