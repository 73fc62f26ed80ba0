use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::display::duration_label;

/// One audio file as shown by the views. Rebuilt wholesale on rescan.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackRecord {
    pub path: PathBuf,
    pub name: String,
    pub duration: Option<Duration>,
    pub album: Option<String>,
}

impl TrackRecord {
    pub fn duration_label(&self) -> String {
        duration_label(self.duration)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Album {
    pub name: String,
    /// Positions into the index's track list, in path order.
    pub tracks: Vec<usize>,
}

/// Tracks sorted by raw path string plus the album grouping derived from them.
///
/// Track positions are stable for the lifetime of an index, so views and the
/// play queue may refer to tracks by position or by path interchangeably.
#[derive(Debug, Clone, Default)]
pub struct TrackIndex {
    tracks: Vec<TrackRecord>,
    positions: HashMap<PathBuf, usize>,
    albums: Vec<Album>,
}

impl TrackIndex {
    pub fn new(mut tracks: Vec<TrackRecord>) -> Self {
        tracks.sort_by(|a, b| a.path.as_os_str().cmp(b.path.as_os_str()));
        tracks.dedup_by(|a, b| a.path == b.path);

        let positions = tracks
            .iter()
            .enumerate()
            .map(|(i, t)| (t.path.clone(), i))
            .collect();

        let mut buckets: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for (i, track) in tracks.iter().enumerate() {
            if let Some(album) = track.album.as_deref().filter(|a| !a.is_empty()) {
                buckets.entry(album.to_string()).or_default().push(i);
            }
        }
        let albums = buckets
            .into_iter()
            .map(|(name, tracks)| Album { name, tracks })
            .collect();

        Self {
            tracks,
            positions,
            albums,
        }
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn tracks(&self) -> &[TrackRecord] {
        &self.tracks
    }

    pub fn get(&self, index: usize) -> Option<&TrackRecord> {
        self.tracks.get(index)
    }

    pub fn position(&self, path: &Path) -> Option<usize> {
        self.positions.get(path).copied()
    }

    pub fn record(&self, path: &Path) -> Option<&TrackRecord> {
        self.position(path).and_then(|i| self.tracks.get(i))
    }

    pub fn albums(&self) -> &[Album] {
        &self.albums
    }

    pub fn album(&self, index: usize) -> Option<&Album> {
        self.albums.get(index)
    }

    /// Path of the `track`th entry of album `album`.
    pub fn album_track(&self, album: usize, track: usize) -> Option<&TrackRecord> {
        self.albums
            .get(album)
            .and_then(|a| a.tracks.get(track))
            .and_then(|&i| self.tracks.get(i))
    }

    /// Display name for a path, falling back to its file stem for paths that
    /// are not (or no longer) in the index.
    pub fn name_for(&self, path: &Path) -> String {
        match self.record(path) {
            Some(track) => track.name.clone(),
            None => file_stem(path),
        }
    }
}

pub(crate) fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("UNKNOWN")
        .to_string()
}
