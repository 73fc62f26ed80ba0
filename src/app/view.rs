//! Per-view selection and scroll cursors.

use crate::library::{TrackIndex, TrackRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Library,
    Queue,
    Albums,
}

impl ViewKind {
    pub fn label(self) -> &'static str {
        match self {
            ViewKind::Library => "Library",
            ViewKind::Queue => "Queue",
            ViewKind::Albums => "Albums",
        }
    }
}

/// Selection plus the first visible row of a list.
///
/// For a non-empty list, `scroll <= selected < scroll + capacity` after every
/// operation that takes a capacity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewState {
    pub selected: usize,
    pub scroll: usize,
}

impl ViewState {
    /// Move one row up. At the top this is a no-op and returns false.
    pub fn move_up(&mut self, capacity: usize) -> bool {
        if self.selected == 0 {
            return false;
        }
        self.selected -= 1;
        self.scroll_into_view(capacity);
        true
    }

    /// Move one row down. At the bottom this is a no-op and returns false.
    pub fn move_down(&mut self, len: usize, capacity: usize) -> bool {
        if self.selected + 1 >= len {
            return false;
        }
        self.selected += 1;
        self.scroll_into_view(capacity);
        true
    }

    pub fn select(&mut self, index: usize, len: usize, capacity: usize) {
        self.selected = index;
        self.clamp(len, capacity);
    }

    /// Pull the cursors back inside a list of `len` rows.
    pub fn clamp(&mut self, len: usize, capacity: usize) {
        if len == 0 {
            self.reset();
            return;
        }
        self.selected = self.selected.min(len - 1);
        self.scroll_into_view(capacity);
    }

    pub fn reset(&mut self) {
        self.selected = 0;
        self.scroll = 0;
    }

    /// Scroll by the least amount that brings `selected` on screen.
    pub fn scroll_into_view(&mut self, capacity: usize) {
        let capacity = capacity.max(1);
        if self.selected < self.scroll {
            self.scroll = self.selected;
        } else if self.selected >= self.scroll + capacity {
            self.scroll = self.selected + 1 - capacity;
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Pane {
    #[default]
    Albums,
    Tracks,
}

/// Two-pane album browser: album list on the left, its tracks on the right.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlbumViewState {
    pub albums: ViewState,
    pub tracks: ViewState,
    pub pane: Pane,
}

impl AlbumViewState {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn focus(&mut self, pane: Pane) {
        self.pane = pane;
    }

    fn track_count(&self, index: &TrackIndex) -> usize {
        index.album(self.albums.selected).map_or(0, |a| a.tracks.len())
    }

    pub fn move_up(&mut self, capacity: usize) -> bool {
        match self.pane {
            Pane::Albums => {
                let moved = self.albums.move_up(capacity);
                if moved {
                    self.tracks.reset();
                }
                moved
            }
            Pane::Tracks => self.tracks.move_up(capacity),
        }
    }

    pub fn move_down(&mut self, index: &TrackIndex, capacity: usize) -> bool {
        match self.pane {
            Pane::Albums => {
                let moved = self.albums.move_down(index.albums().len(), capacity);
                if moved {
                    self.tracks.reset();
                }
                moved
            }
            Pane::Tracks => self.tracks.move_down(self.track_count(index), capacity),
        }
    }

    pub fn clamp(&mut self, index: &TrackIndex, capacity: usize) {
        let before = self.albums.selected;
        self.albums.clamp(index.albums().len(), capacity);
        if self.albums.selected != before {
            self.tracks.reset();
        }
        self.tracks.clamp(self.track_count(index), capacity);
    }

    pub fn selected_track<'a>(&self, index: &'a TrackIndex) -> Option<&'a TrackRecord> {
        index.album_track(self.albums.selected, self.tracks.selected)
    }
}

/// Cursor state for all three views plus which one is showing.
#[derive(Debug, Clone)]
pub struct Views {
    pub active: ViewKind,
    pub library: ViewState,
    pub queue: ViewState,
    pub album: AlbumViewState,
    /// Rows visible in the list area; updated by the renderer.
    pub capacity: usize,
}

impl Views {
    pub fn new(active: ViewKind) -> Self {
        Self {
            active,
            library: ViewState::default(),
            queue: ViewState::default(),
            album: AlbumViewState::default(),
            capacity: 1,
        }
    }

    /// Show `kind`, starting it from the top. Other views keep their cursors.
    pub fn switch(&mut self, kind: ViewKind) {
        self.active = kind;
        match kind {
            ViewKind::Library => self.library.reset(),
            ViewKind::Queue => self.queue.reset(),
            ViewKind::Albums => self.album.reset(),
        }
    }

    /// Forget every cursor, e.g. after the library was replaced.
    pub fn reset_all(&mut self) {
        self.library.reset();
        self.queue.reset();
        self.album.reset();
    }
}
