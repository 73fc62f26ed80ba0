//! Input-driven state transitions and the per-tick auto-advance check.

use std::path::{Path, PathBuf};
use std::time::Instant;

use rand::Rng;
use tracing::{info, warn};

use crate::audio::AudioBackend;
use crate::library::TrackIndex;

use super::action::{Action, Flow};
use super::command::Command;
use super::model::{Mode, Popup, SearchCommit, SearchSession, Session, Status};
use super::search::rank;
use super::view::{Pane, ViewKind};

#[derive(Clone, Copy)]
enum Step {
    Forward,
    Back,
}

impl<B: AudioBackend> Session<B> {
    /// Apply one action. Returns `Flow::Quit` when the session should end.
    pub fn handle(&mut self, action: Action, now: Instant) -> Flow {
        if self.popup.take().is_some() {
            return Flow::Continue;
        }

        match std::mem::replace(&mut self.mode, Mode::Normal) {
            Mode::Normal => self.handle_normal(action, now),
            Mode::CommandEntry { buffer } => self.handle_command_entry(buffer, action, now),
            Mode::Search(search) => {
                self.handle_search(search, action, now);
                Flow::Continue
            }
            Mode::QuitConfirm => match action {
                Action::Confirm => Flow::Quit,
                Action::Cancel => Flow::Continue,
                _ => {
                    self.mode = Mode::QuitConfirm;
                    Flow::Continue
                }
            },
        }
    }

    /// Poll the backend and advance when the current track has ended.
    pub fn tick(&mut self, now: Instant) {
        self.backend.tick(now);

        if self.playback.current.is_none() {
            return;
        }
        if self.playback.fading && !self.backend.is_busy() {
            self.stop_playback();
            self.status = Some(Status::info("Faded out"));
            return;
        }
        if self.playback.clock.is_playing() && !self.backend.is_busy() {
            self.auto_advance(now);
        }
    }

    /// Load `folder` as the library, replacing the current index.
    pub fn open_folder(&mut self, folder: PathBuf) {
        if !folder.is_dir() {
            self.status = Some(Status::error("Folder not found."));
            return;
        }
        match self.loader.load(&folder) {
            Ok(index) => {
                info!(folder = %folder.display(), tracks = index.len(), "library loaded");
                self.status = Some(Status::info(format!(
                    "Loaded {} tracks from {}",
                    index.len(),
                    folder.display()
                )));
                self.replace_index(index);
                if self.folder.as_deref() != Some(folder.as_path()) {
                    self.state_dirty = true;
                }
                self.folder = Some(folder);
            }
            Err(e) => {
                warn!(error = %e, "failed to load library");
                self.status = Some(Status::error(e.to_string()));
            }
        }
    }

    fn handle_normal(&mut self, action: Action, now: Instant) -> Flow {
        let in_albums = self.views.active == ViewKind::Albums;
        match action {
            Action::RequestQuit => self.mode = Mode::QuitConfirm,
            Action::BeginCommand => {
                self.mode = Mode::CommandEntry {
                    buffer: ":".to_string(),
                }
            }
            Action::BeginSearch if !in_albums => {
                let results = rank("", &self.active_names());
                self.mode = Mode::Search(SearchSession {
                    results,
                    ..SearchSession::default()
                });
            }
            Action::SwitchView(kind) => self.views.switch(kind),
            Action::MoveUp => self.move_selection(Step::Back),
            Action::MoveDown => self.move_selection(Step::Forward),
            Action::FocusAlbums if in_albums => self.views.album.focus(Pane::Albums),
            Action::FocusTracks if in_albums => self.views.album.focus(Pane::Tracks),
            Action::Submit => self.play_selection(now),
            Action::Enqueue => self.enqueue_selection(),
            Action::RemoveFromQueue if self.views.active == ViewKind::Queue => {
                let index = self.views.queue.selected;
                self.remove_from_queue(index);
            }
            Action::TogglePause => self.toggle_pause(now),
            Action::Next => self.next(now),
            Action::Prev => self.prev(now),
            Action::VolumeUp => self.change_volume(self.options.volume_step),
            Action::VolumeDown => self.change_volume(-self.options.volume_step),
            Action::FadeOut => self.fade_out(now),
            Action::SeekForward if !in_albums => self.seek(now, Step::Forward),
            Action::SeekBackward if !in_albums => self.seek(now, Step::Back),
            Action::ToggleShuffle => {
                self.playback.shuffle = !self.playback.shuffle;
                let state = if self.playback.shuffle { "on" } else { "off" };
                self.status = Some(Status::info(format!("Shuffle {state}")));
            }
            Action::ToggleRepeat => {
                self.playback.repeat = !self.playback.repeat;
                let state = if self.playback.repeat { "on" } else { "off" };
                self.status = Some(Status::info(format!("Repeat {state}")));
            }
            Action::Cancel => self.status = None,
            _ => {}
        }
        Flow::Continue
    }

    fn handle_command_entry(&mut self, mut buffer: String, action: Action, now: Instant) -> Flow {
        match action {
            Action::Input(c) => buffer.push(c),
            Action::Backspace => {
                buffer.pop();
                if buffer.is_empty() {
                    return Flow::Continue;
                }
            }
            Action::Cancel => return Flow::Continue,
            Action::Submit => return self.run_command(&buffer, now),
            _ => {}
        }
        self.mode = Mode::CommandEntry { buffer };
        Flow::Continue
    }

    fn handle_search(&mut self, mut search: SearchSession, action: Action, now: Instant) {
        match action {
            Action::Input(c) => {
                search.query.push(c);
                search.cursor = 0;
            }
            Action::Backspace => {
                if search.query.pop().is_none() {
                    return;
                }
                search.cursor = 0;
            }
            Action::Cancel => return,
            Action::MoveDown => {
                if search.cursor + 1 < search.results.len() {
                    search.cursor += 1;
                }
            }
            Action::MoveUp => search.cursor = search.cursor.saturating_sub(1),
            Action::Submit => {
                self.commit_search(&search, now);
                return;
            }
            _ => {}
        }

        search.results = rank(&search.query, &self.active_names());
        search.cursor = search.cursor.min(search.results.len().saturating_sub(1));
        self.mode = Mode::Search(search);
    }

    fn commit_search(&mut self, search: &SearchSession, now: Instant) {
        let Some(&target) = search.results.get(search.cursor) else {
            return;
        };
        let capacity = self.views.capacity;
        match self.views.active {
            ViewKind::Library => self.views.library.select(target, self.index.len(), capacity),
            ViewKind::Queue => self.views.queue.select(target, self.queue.len(), capacity),
            ViewKind::Albums => return,
        }
        if self.options.search_commit == SearchCommit::SelectAndPlay {
            self.play_selection(now);
        }
    }

    fn run_command(&mut self, input: &str, now: Instant) -> Flow {
        let command = match Command::parse(input) {
            Ok(command) => command,
            Err(e) => {
                self.status = Some(Status::error(e.to_string()));
                return Flow::Continue;
            }
        };
        info!(?command, "command");

        match command {
            Command::AddFolder(folder) => self.open_folder(folder),
            Command::Refresh => self.refresh(),
            Command::ClearQueue => {
                self.queue.clear();
                self.views.queue.reset();
                self.status = Some(Status::info("Queue cleared"));
            }
            Command::RemoveFromQueue(index) => self.remove_from_queue(index),
            Command::Quit => return Flow::Quit,
            Command::Version => self.popup = Some(Popup::Version),
            Command::Help => self.popup = Some(Popup::Help),
            Command::Empty => self.status = None,
        }
        Flow::Continue
    }

    fn refresh(&mut self) {
        let Some(folder) = self.folder.clone() else {
            self.status = Some(Status::error("No music folder set. Use :a <folder>"));
            return;
        };
        match self.loader.rescan(&folder) {
            Ok(index) => {
                self.status = Some(Status::info(format!(
                    "Library refreshed ({} tracks)",
                    index.len()
                )));
                self.replace_index(index);
            }
            Err(e) => {
                warn!(error = %e, "refresh failed");
                self.status = Some(Status::error(e.to_string()));
            }
        }
    }

    fn replace_index(&mut self, index: TrackIndex) {
        self.index = index;
        self.views.reset_all();
    }

    fn move_selection(&mut self, step: Step) {
        let capacity = self.views.capacity;
        match (self.views.active, step) {
            (ViewKind::Library, Step::Back) => {
                self.views.library.move_up(capacity);
            }
            (ViewKind::Library, Step::Forward) => {
                self.views.library.move_down(self.index.len(), capacity);
            }
            (ViewKind::Queue, Step::Back) => {
                self.views.queue.move_up(capacity);
            }
            (ViewKind::Queue, Step::Forward) => {
                self.views.queue.move_down(self.queue.len(), capacity);
            }
            (ViewKind::Albums, Step::Back) => {
                self.views.album.move_up(capacity);
            }
            (ViewKind::Albums, Step::Forward) => {
                self.views.album.move_down(&self.index, capacity);
            }
        }
    }

    /// Path under the cursor of the active view, if any.
    fn selected_path(&self) -> Option<PathBuf> {
        match self.views.active {
            ViewKind::Library => self
                .index
                .get(self.views.library.selected)
                .map(|t| t.path.clone()),
            ViewKind::Queue => self
                .queue
                .get(self.views.queue.selected)
                .map(Path::to_path_buf),
            ViewKind::Albums => match self.views.album.pane {
                Pane::Tracks => self
                    .views
                    .album
                    .selected_track(&self.index)
                    .map(|t| t.path.clone()),
                Pane::Albums => None,
            },
        }
    }

    fn play_selection(&mut self, now: Instant) {
        if let Some(path) = self.selected_path() {
            self.play_path(path, now);
        }
    }

    fn enqueue_selection(&mut self) {
        if self.views.active == ViewKind::Queue {
            return;
        }
        let Some(path) = self.selected_path() else {
            return;
        };
        let name = self.index.name_for(&path);
        if self.queue.enqueue(path) {
            self.status = Some(Status::info(format!("Queued: {name}")));
        } else {
            self.status = Some(Status::info(format!("Already queued: {name}")));
        }
        self.move_selection(Step::Forward);
    }

    fn remove_from_queue(&mut self, index: usize) {
        match self.queue.remove_at(index) {
            Ok(path) => {
                self.views.queue.clamp(self.queue.len(), self.views.capacity);
                self.status = Some(Status::info(format!(
                    "Removed: {}",
                    self.index.name_for(&path)
                )));
            }
            Err(e) => {
                warn!(error = %e, "queue removal rejected");
                self.status = Some(Status::error("Invalid queue index."));
            }
        }
    }

    /// Start `path` from the top. On failure nothing but the status changes.
    fn play_path(&mut self, path: PathBuf, now: Instant) -> bool {
        if let Err(e) = self.backend.load(&path) {
            warn!(error = %e, "load failed");
            self.status = Some(Status::error(format!(
                "Failed to play: {}",
                self.index.name_for(&path)
            )));
            return false;
        }

        self.backend.set_volume(self.playback.volume);
        self.backend.play();
        let length = self.index.record(&path).and_then(|t| t.duration);
        self.playback.clock.load(now, length);
        self.playback.fading = false;
        self.status = None;

        if let Some(pos) = self.index.position(&path) {
            self.views
                .library
                .select(pos, self.index.len(), self.views.capacity);
        }
        info!(track = %path.display(), "playing");
        self.playback.current = Some(path);
        true
    }

    fn stop_playback(&mut self) {
        self.backend.stop();
        self.playback.clock.stop();
        self.playback.current = None;
        self.playback.fading = false;
    }

    fn toggle_pause(&mut self, now: Instant) {
        if self.playback.current.is_none() {
            self.play_selection(now);
        } else if self.playback.clock.pause(now) {
            self.backend.pause();
        } else if self.playback.clock.unpause(now) {
            self.backend.unpause();
        }
    }

    /// Next library track after the current one (or a random one).
    fn playlist_step(&self, step: Step) -> Option<PathBuf> {
        let len = self.index.len();
        if len == 0 {
            return None;
        }
        let target = if self.playback.shuffle {
            rand::thread_rng().gen_range(0..len)
        } else {
            let current = self
                .playback
                .current
                .as_deref()
                .and_then(|p| self.index.position(p));
            match (current, step) {
                (Some(i), Step::Forward) => (i + 1) % len,
                (Some(i), Step::Back) => (i + len - 1) % len,
                (None, Step::Forward) => 0,
                (None, Step::Back) => len - 1,
            }
        };
        self.index.get(target).map(|t| t.path.clone())
    }

    /// The queue entry only counts as played once it actually loads.
    fn next(&mut self, now: Instant) {
        if let Some(path) = self.queue.peek().map(Path::to_path_buf) {
            if self.play_path(path, now) {
                self.queue.advance();
            }
            return;
        }
        if let Some(path) = self.playlist_step(Step::Forward) {
            self.play_path(path, now);
        }
    }

    fn prev(&mut self, now: Instant) {
        if let Some(path) = self.playlist_step(Step::Back) {
            self.play_path(path, now);
        }
    }

    fn auto_advance(&mut self, now: Instant) {
        // Repeat wraps an exhausted queue back to its first entry.
        let wrap = self.playback.repeat && self.queue.is_exhausted() && !self.queue.is_empty();
        let queued = if wrap {
            self.queue.get(0)
        } else {
            self.queue.peek()
        }
        .map(Path::to_path_buf);

        let (next, from_queue) = match queued {
            Some(path) => (Some(path), true),
            None if self.playback.repeat => (self.playback.current.clone(), false),
            None => (self.playlist_step(Step::Forward), false),
        };

        let Some(path) = next else {
            self.stop_playback();
            return;
        };
        if !self.play_path(path, now) {
            self.stop_playback();
            return;
        }
        if from_queue {
            if wrap {
                self.queue.rewind();
            }
            self.queue.advance();
        }
    }

    fn change_volume(&mut self, delta: f32) {
        let volume = ((self.playback.volume + delta).clamp(0.0, 1.0) * 100.0).round() / 100.0;
        self.playback.volume = volume;
        self.backend.set_volume(volume);
        self.status = Some(Status::info(format!(
            "Volume {}%",
            (volume * 100.0).round() as u32
        )));
    }

    fn fade_out(&mut self, now: Instant) {
        if self.playback.current.is_none() || self.playback.fading {
            return;
        }
        self.backend.fade_out(self.options.fade_out, now);
        self.playback.fading = true;
        self.status = Some(Status::info("Fading out..."));
    }

    fn seek(&mut self, now: Instant, step: Step) {
        let secs = self.options.seek_step.as_secs() as i64;
        let delta = match step {
            Step::Forward => secs,
            Step::Back => -secs,
        };
        let Some(target) = self.playback.clock.seek_target(now, delta) else {
            return;
        };
        match self.backend.seek_to(target) {
            Ok(()) => self.playback.clock.set_position(now, target),
            Err(e) => {
                warn!(error = %e, "seek failed");
                self.status = Some(Status::error(e.to_string()));
            }
        }
    }
}
