//! On-disk library snapshots, keyed by a hash of the scanned folder's path.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use xxhash_rust::xxh64::xxh64;

use super::display::parse_duration_label;
use super::model::{TrackIndex, TrackRecord};

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("failed to access snapshot {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid snapshot {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("inconsistent snapshot {0}")]
    Corrupt(PathBuf),
}

/// Serialized form of a `TrackIndex`.
///
/// `display_names` and `durations` run parallel to `playlist`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub playlist: Vec<PathBuf>,
    pub display_names: Vec<String>,
    pub durations: Vec<String>,
    pub albums: BTreeMap<String, Vec<PathBuf>>,
    pub album_names: Vec<String>,
}

impl Snapshot {
    pub fn from_index(index: &TrackIndex) -> Self {
        let tracks = index.tracks();
        let albums: BTreeMap<String, Vec<PathBuf>> = index
            .albums()
            .iter()
            .map(|a| {
                let paths = a.tracks.iter().map(|&i| tracks[i].path.clone()).collect();
                (a.name.clone(), paths)
            })
            .collect();

        Self {
            playlist: tracks.iter().map(|t| t.path.clone()).collect(),
            display_names: tracks.iter().map(|t| t.name.clone()).collect(),
            durations: tracks.iter().map(TrackRecord::duration_label).collect(),
            album_names: albums.keys().cloned().collect(),
            albums,
        }
    }

    /// Rebuild the index. `None` when the parallel lists disagree in length.
    pub fn into_index(self) -> Option<TrackIndex> {
        let n = self.playlist.len();
        if self.display_names.len() != n || self.durations.len() != n {
            return None;
        }

        let mut album_of: HashMap<PathBuf, String> = HashMap::new();
        for (name, paths) in self.albums {
            for path in paths {
                album_of.insert(path, name.clone());
            }
        }

        let tracks = self
            .playlist
            .into_iter()
            .zip(self.display_names)
            .zip(self.durations)
            .map(|((path, name), label)| TrackRecord {
                album: album_of.remove(&path),
                duration: parse_duration_label(&label),
                name,
                path,
            })
            .collect();
        Some(TrackIndex::new(tracks))
    }
}

/// Directory of `library-<key>.json` files.
pub struct SnapshotCache {
    dir: PathBuf,
}

impl SnapshotCache {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Lowercase hex xxh64 of the folder path.
    pub fn key_for(folder: &Path) -> String {
        format!("{:016x}", xxh64(folder.as_os_str().as_encoded_bytes(), 0))
    }

    pub fn path_for(&self, folder: &Path) -> PathBuf {
        self.dir.join(format!("library-{}.json", Self::key_for(folder)))
    }

    /// `Ok(None)` when no snapshot exists for `folder`.
    pub fn load(&self, folder: &Path) -> Result<Option<TrackIndex>, CacheError> {
        let path = self.path_for(folder);
        let raw = match fs::read(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(CacheError::Io { path, source }),
        };
        let snapshot: Snapshot = match serde_json::from_slice(&raw) {
            Ok(s) => s,
            Err(source) => return Err(CacheError::Json { path, source }),
        };
        snapshot
            .into_index()
            .map(Some)
            .ok_or(CacheError::Corrupt(path))
    }

    pub fn store(&self, folder: &Path, index: &TrackIndex) -> Result<(), CacheError> {
        let path = self.path_for(folder);
        fs::create_dir_all(&self.dir).map_err(|source| CacheError::Io {
            path: self.dir.clone(),
            source,
        })?;
        let encoded = serde_json::to_vec(&Snapshot::from_index(index)).map_err(|source| {
            CacheError::Json {
                path: path.clone(),
                source,
            }
        })?;
        fs::write(&path, encoded).map_err(|source| CacheError::Io { path, source })
    }

    /// Remove the snapshot for `folder`; missing snapshots are fine.
    pub fn invalidate(&self, folder: &Path) -> Result<(), CacheError> {
        let path = self.path_for(folder);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(CacheError::Io { path, source }),
        }
    }
}
