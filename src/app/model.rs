//! Session model: everything the dispatcher owns between key presses.
//!
//! The `Session` struct holds the library index, play queue, per-view
//! cursors, playback state and the current input mode. Rendering reads it
//! through the accessors here; mutation happens in `app::dispatch`.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::audio::{AudioBackend, PlaybackClock};
use crate::config::SessionState;
use crate::library::{LibraryLoader, TrackIndex};

use super::queue::PlayQueue;
use super::view::{ViewKind, Views};

/// What enter does on a search result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchCommit {
    Select,
    SelectAndPlay,
}

/// Settings the session consults while running.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub seek_step: Duration,
    pub volume_step: f32,
    pub fade_out: Duration,
    pub search_commit: SearchCommit,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            seek_step: Duration::from_secs(5),
            volume_step: 0.05,
            fade_out: Duration::from_millis(2000),
            search_commit: SearchCommit::Select,
        }
    }
}

/// Loaded track, position estimate and the user-facing playback toggles.
#[derive(Debug, Clone)]
pub struct PlaybackSession {
    pub current: Option<PathBuf>,
    pub clock: PlaybackClock,
    pub volume: f32,
    pub shuffle: bool,
    pub repeat: bool,
    /// A fade-out is in progress; silence means stop rather than advance.
    pub fading: bool,
}

impl PlaybackSession {
    pub fn new(volume: f32, shuffle: bool, repeat: bool) -> Self {
        Self {
            current: None,
            clock: PlaybackClock::new(),
            volume: volume.clamp(0.0, 1.0),
            shuffle,
            repeat,
            fading: false,
        }
    }
}

impl Default for PlaybackSession {
    fn default() -> Self {
        Self::new(1.0, false, false)
    }
}

/// Live search over the active view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchSession {
    pub query: String,
    /// Ranked indices into the active view's names.
    pub results: Vec<usize>,
    /// Position in `results`.
    pub cursor: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Normal,
    CommandEntry { buffer: String },
    Search(SearchSession),
    QuitConfirm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Popup {
    Help,
    Version,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
}

/// One-line message under the list; replaced by the next one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub text: String,
    pub kind: StatusKind,
}

impl Status {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: StatusKind::Info,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: StatusKind::Error,
        }
    }
}

/// The whole interactive session, generic over the audio output.
pub struct Session<B: AudioBackend> {
    pub(super) backend: B,
    pub(super) loader: LibraryLoader,
    pub(super) index: TrackIndex,
    pub(super) folder: Option<PathBuf>,
    pub(super) queue: PlayQueue,
    pub(super) views: Views,
    pub(super) playback: PlaybackSession,
    pub(super) mode: Mode,
    pub(super) popup: Option<Popup>,
    pub(super) status: Option<Status>,
    pub(super) options: SessionOptions,
    pub(super) state_dirty: bool,
}

impl<B: AudioBackend> Session<B> {
    pub fn new(
        mut backend: B,
        loader: LibraryLoader,
        options: SessionOptions,
        playback: PlaybackSession,
        view: ViewKind,
    ) -> Self {
        backend.set_volume(playback.volume);
        Self {
            backend,
            loader,
            index: TrackIndex::default(),
            folder: None,
            queue: PlayQueue::new(),
            views: Views::new(view),
            playback,
            mode: Mode::Normal,
            popup: None,
            status: None,
            options,
            state_dirty: false,
        }
    }

    pub fn index(&self) -> &TrackIndex {
        &self.index
    }

    pub fn folder(&self) -> Option<&Path> {
        self.folder.as_deref()
    }

    pub fn queue(&self) -> &PlayQueue {
        &self.queue
    }

    pub fn views(&self) -> &Views {
        &self.views
    }

    pub fn playback(&self) -> &PlaybackSession {
        &self.playback
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn popup(&self) -> Option<Popup> {
        self.popup
    }

    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        self.playback.clock.elapsed(now)
    }

    pub fn now_playing(&self) -> Option<String> {
        self.playback
            .current
            .as_deref()
            .map(|p| self.index.name_for(p))
    }

    /// Names of the rows of the active view, in display order.
    pub fn active_names(&self) -> Vec<String> {
        match self.views.active {
            ViewKind::Library => self.index.tracks().iter().map(|t| t.name.clone()).collect(),
            ViewKind::Queue => self
                .queue
                .items()
                .iter()
                .map(|p| self.index.name_for(p))
                .collect(),
            ViewKind::Albums => self.index.albums().iter().map(|a| a.name.clone()).collect(),
        }
    }

    /// Track names of the album under the album cursor.
    pub fn album_track_names(&self) -> Vec<String> {
        self.index
            .album(self.views.album.albums.selected)
            .map(|a| {
                a.tracks
                    .iter()
                    .filter_map(|&i| self.index.get(i))
                    .map(|t| t.name.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Tell the session how many list rows fit on screen.
    pub fn set_capacity(&mut self, rows: usize) {
        let rows = rows.max(1);
        if self.views.capacity == rows {
            return;
        }
        self.views.capacity = rows;
        self.views.library.scroll_into_view(rows);
        self.views.queue.scroll_into_view(rows);
        self.views.album.albums.scroll_into_view(rows);
        self.views.album.tracks.scroll_into_view(rows);
    }

    /// Values persisted between runs.
    pub fn session_state(&self) -> SessionState {
        SessionState {
            volume: self.playback.volume,
            shuffle: self.playback.shuffle,
            repeat: self.playback.repeat,
            music_folder: self.folder.clone(),
        }
    }

    /// True once after the persisted values changed in a way worth saving
    /// before quit (a new music folder).
    pub fn take_state_dirty(&mut self) -> bool {
        std::mem::take(&mut self.state_dirty)
    }
}
