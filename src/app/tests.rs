use super::*;
use crate::audio::{AudioBackend, PlaybackError};
use crate::config::LibrarySettings;
use crate::library::{LibraryLoader, MetadataError, MetadataReader, TrackMetadata};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tempfile::TempDir;

#[derive(Default)]
struct FakeBackend {
    loaded: Option<PathBuf>,
    loads: Vec<PathBuf>,
    playing: bool,
    busy: bool,
    fading: bool,
    volume: f32,
    seeks: Vec<Duration>,
    broken: HashSet<PathBuf>,
}

impl AudioBackend for FakeBackend {
    fn load(&mut self, path: &Path) -> Result<(), PlaybackError> {
        if self.broken.contains(path) {
            return Err(PlaybackError::LoadFailure {
                path: path.to_path_buf(),
                reason: "broken".to_string(),
            });
        }
        self.loaded = Some(path.to_path_buf());
        self.loads.push(path.to_path_buf());
        self.busy = true;
        self.playing = false;
        self.fading = false;
        Ok(())
    }

    fn play(&mut self) {
        self.playing = true;
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn unpause(&mut self) {
        self.playing = true;
    }

    fn stop(&mut self) {
        self.loaded = None;
        self.busy = false;
        self.playing = false;
        self.fading = false;
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }

    fn volume(&self) -> f32 {
        self.volume
    }

    fn fade_out(&mut self, _over: Duration, _now: Instant) {
        self.fading = true;
    }

    fn seek_to(&mut self, position: Duration) -> Result<(), PlaybackError> {
        self.seeks.push(position);
        Ok(())
    }

    fn is_busy(&self) -> bool {
        self.busy
    }
}

struct TableReader(HashMap<String, TrackMetadata>);

impl MetadataReader for TableReader {
    fn read(&self, path: &Path) -> Result<TrackMetadata, MetadataError> {
        let name = path.file_name().and_then(|s| s.to_str()).unwrap_or("");
        self.0
            .get(name)
            .cloned()
            .ok_or_else(|| MetadataError::Unsupported(path.to_path_buf()))
    }
}

struct Fixture {
    dir: TempDir,
    session: Session<FakeBackend>,
}

impl Fixture {
    fn path(&self, file: &str) -> PathBuf {
        self.dir.path().join(file)
    }
}

/// Library of `a.mp3` ("Alpha Song", album LP, 10s), `b.mp3` ("Beta Song",
/// album LP, 20s) and `c.mp3` ("Gamma", no album, 30s).
fn fixture_with(options: SessionOptions) -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let table = [
        ("a.mp3", "Alpha Song", Some("LP"), 10),
        ("b.mp3", "Beta Song", Some("LP"), 20),
        ("c.mp3", "Gamma", None, 30),
    ];
    let mut meta = HashMap::new();
    for (file, title, album, secs) in table {
        std::fs::write(dir.path().join(file), b"x").unwrap();
        meta.insert(
            file.to_string(),
            TrackMetadata {
                title: Some(title.to_string()),
                artist: None,
                album: album.map(str::to_string),
                duration: Some(Duration::from_secs(secs)),
            },
        );
    }

    let loader = LibraryLoader::new(LibrarySettings::default(), Box::new(TableReader(meta)), None);
    let mut session = Session::new(
        FakeBackend::default(),
        loader,
        options,
        PlaybackSession::default(),
        ViewKind::Library,
    );
    session.set_capacity(10);
    session.open_folder(dir.path().to_path_buf());
    Fixture { dir, session }
}

fn fixture() -> Fixture {
    fixture_with(SessionOptions::default())
}

fn secs(n: u64) -> Duration {
    Duration::from_secs(n)
}

fn run_command(session: &mut Session<FakeBackend>, line: &str, now: Instant) -> Flow {
    session.handle(Action::BeginCommand, now);
    for c in line.trim_start_matches(':').chars() {
        session.handle(Action::Input(c), now);
    }
    session.handle(Action::Submit, now)
}

fn type_search(session: &mut Session<FakeBackend>, query: &str, now: Instant) {
    session.handle(Action::BeginSearch, now);
    for c in query.chars() {
        session.handle(Action::Input(c), now);
    }
}

/// Pretend the backend ran out of audio, then tick.
fn finish_track(session: &mut Session<FakeBackend>, now: Instant) {
    session.backend.busy = false;
    session.tick(now);
}

#[test]
fn open_folder_builds_index_and_album_view_starts_at_top() {
    let mut f = fixture();
    let t0 = Instant::now();
    let s = &mut f.session;

    assert_eq!(s.index().len(), 3);
    assert_eq!(s.index().albums().len(), 1);
    assert_eq!(s.index().albums()[0].tracks.len(), 2);
    assert_eq!(s.folder(), Some(f.dir.path()));
    assert!(s.take_state_dirty());
    assert!(!s.take_state_dirty());

    s.handle(Action::SwitchView(ViewKind::Albums), t0);
    assert_eq!(s.views().active, ViewKind::Albums);
    assert_eq!(s.views().album, AlbumViewState::default());
    assert_eq!(s.album_track_names(), vec!["Alpha Song", "Beta Song"]);
}

#[test]
fn submit_plays_selection_and_starts_clock() {
    let mut f = fixture();
    let t0 = Instant::now();
    let b = f.path("b.mp3");
    let s = &mut f.session;

    s.handle(Action::MoveDown, t0);
    s.handle(Action::Submit, t0);

    assert_eq!(s.playback().current.as_deref(), Some(b.as_path()));
    assert!(s.backend().playing);
    assert!(s.playback().clock.is_playing());
    assert_eq!(s.playback().clock.length(), Some(secs(20)));
    assert_eq!(s.elapsed(t0 + secs(3)), secs(3));
    assert_eq!(s.now_playing().as_deref(), Some("Beta Song"));
}

#[test]
fn toggle_pause_with_nothing_loaded_plays_selection_then_freezes_clock() {
    let mut f = fixture();
    let t0 = Instant::now();
    let s = &mut f.session;

    s.handle(Action::TogglePause, t0);
    assert!(s.playback().clock.is_playing());

    s.handle(Action::TogglePause, t0 + secs(4));
    assert!(s.playback().clock.is_paused());
    assert!(!s.backend().playing);
    assert_eq!(s.elapsed(t0 + secs(9)), secs(4));

    s.handle(Action::TogglePause, t0 + secs(9));
    assert!(s.backend().playing);
    assert_eq!(s.elapsed(t0 + secs(10)), secs(5));
}

#[test]
fn auto_advance_prefers_queue_then_sequential_wraparound() {
    let mut f = fixture();
    let t0 = Instant::now();
    let (a, b, c) = (f.path("a.mp3"), f.path("b.mp3"), f.path("c.mp3"));
    let s = &mut f.session;

    // Queue c, then start a.
    s.handle(Action::MoveDown, t0);
    s.handle(Action::MoveDown, t0);
    s.handle(Action::Enqueue, t0);
    assert_eq!(s.queue().items(), &[c.clone()]);
    s.handle(Action::MoveUp, t0);
    s.handle(Action::MoveUp, t0);
    s.handle(Action::Submit, t0);
    assert_eq!(s.playback().current.as_deref(), Some(a.as_path()));

    // Still busy: nothing happens.
    s.tick(t0 + secs(5));
    assert_eq!(s.playback().current.as_deref(), Some(a.as_path()));

    finish_track(s, t0 + secs(10));
    assert_eq!(s.playback().current.as_deref(), Some(c.as_path()));
    assert!(s.queue().is_exhausted());

    // Queue exhausted: sequential from c wraps to a.
    finish_track(s, t0 + secs(40));
    assert_eq!(s.playback().current.as_deref(), Some(a.as_path()));

    finish_track(s, t0 + secs(50));
    assert_eq!(s.playback().current.as_deref(), Some(b.as_path()));
    // Library selection follows the playing track.
    assert_eq!(s.views().library.selected, 1);
}

#[test]
fn repeat_replays_current_track_when_queue_empty() {
    let mut f = fixture();
    let t0 = Instant::now();
    let a = f.path("a.mp3");
    let s = &mut f.session;

    s.handle(Action::ToggleRepeat, t0);
    s.handle(Action::Submit, t0);
    finish_track(s, t0 + secs(10));

    assert_eq!(s.playback().current.as_deref(), Some(a.as_path()));
    assert_eq!(s.backend().loads.len(), 2);
    assert_eq!(s.elapsed(t0 + secs(11)), secs(1));
}

#[test]
fn repeat_cycles_through_queue_from_start() {
    let mut f = fixture();
    let t0 = Instant::now();
    let (a, b) = (f.path("a.mp3"), f.path("b.mp3"));
    let s = &mut f.session;

    s.handle(Action::Enqueue, t0); // a, selection moves to b
    s.handle(Action::Enqueue, t0); // b
    s.handle(Action::ToggleRepeat, t0);
    s.handle(Action::Next, t0);
    assert_eq!(s.playback().current.as_deref(), Some(a.as_path()));

    finish_track(s, t0 + secs(1));
    assert_eq!(s.playback().current.as_deref(), Some(b.as_path()));

    finish_track(s, t0 + secs(2));
    assert_eq!(s.playback().current.as_deref(), Some(a.as_path()));
}

#[test]
fn failed_play_keeps_previous_state() {
    let mut f = fixture();
    let t0 = Instant::now();
    let (a, b) = (f.path("a.mp3"), f.path("b.mp3"));
    let s = &mut f.session;

    s.handle(Action::Submit, t0);
    s.backend.broken.insert(b.clone());
    s.handle(Action::MoveDown, t0);
    s.handle(Action::Submit, t0 + secs(2));

    assert_eq!(s.playback().current.as_deref(), Some(a.as_path()));
    assert_eq!(s.backend().loaded.as_deref(), Some(a.as_path()));
    assert_eq!(s.elapsed(t0 + secs(3)), secs(3));
    let status = s.status().unwrap();
    assert_eq!(status.kind, StatusKind::Error);
    assert_eq!(status.text, "Failed to play: Beta Song");
}

#[test]
fn failed_auto_advance_stops_the_clock() {
    let mut f = fixture();
    let t0 = Instant::now();
    let b = f.path("b.mp3");
    let s = &mut f.session;

    s.handle(Action::Submit, t0);
    s.backend.broken.insert(b);
    finish_track(s, t0 + secs(10));

    assert!(s.playback().clock.is_stopped());
    assert_eq!(s.backend().loads.len(), 1);

    assert_eq!(s.playback().current, None);
    assert_eq!(s.now_playing(), None);

    // Not retried on the next tick.
    s.tick(t0 + secs(11));
    assert_eq!(s.backend().loads.len(), 1);
    assert_eq!(s.status().unwrap().kind, StatusKind::Error);

    // Play/pause starts the selection again instead of doing nothing.
    s.handle(Action::TogglePause, t0 + secs(12));
    assert_eq!(s.backend().loads.len(), 2);
    assert!(s.playback().clock.is_playing());
}

#[test]
fn failed_queued_next_keeps_queue_position() {
    let mut f = fixture();
    let t0 = Instant::now();
    let (a, b) = (f.path("a.mp3"), f.path("b.mp3"));
    let s = &mut f.session;

    s.handle(Action::MoveDown, t0);
    s.handle(Action::Enqueue, t0);
    s.handle(Action::MoveUp, t0);
    s.handle(Action::MoveUp, t0);
    s.handle(Action::Submit, t0);
    assert_eq!(s.playback().current.as_deref(), Some(a.as_path()));
    assert_eq!(s.queue().items(), &[b.clone()]);

    s.backend.broken.insert(b.clone());
    s.handle(Action::Next, t0 + secs(1));

    assert_eq!(s.playback().current.as_deref(), Some(a.as_path()));
    assert_eq!(s.queue().cursor(), 0);
    assert!(!s.queue().is_exhausted());
    assert_eq!(s.status().unwrap().kind, StatusKind::Error);

    // Once it loads, the same entry plays and is consumed.
    s.backend.broken.remove(&b);
    s.handle(Action::Next, t0 + secs(2));
    assert_eq!(s.playback().current.as_deref(), Some(b.as_path()));
    assert_eq!(s.queue().cursor(), 1);
}

#[test]
fn failed_queued_auto_advance_keeps_queue_position() {
    let mut f = fixture();
    let t0 = Instant::now();
    let b = f.path("b.mp3");
    let s = &mut f.session;

    s.handle(Action::MoveDown, t0);
    s.handle(Action::Enqueue, t0);
    s.handle(Action::MoveUp, t0);
    s.handle(Action::MoveUp, t0);
    s.handle(Action::Submit, t0);

    s.backend.broken.insert(b);
    finish_track(s, t0 + secs(10));

    assert!(s.playback().clock.is_stopped());
    assert_eq!(s.queue().cursor(), 0);
}

#[test]
fn fade_out_stops_without_advancing() {
    let mut f = fixture();
    let t0 = Instant::now();
    let s = &mut f.session;

    s.handle(Action::Submit, t0);
    s.handle(Action::FadeOut, t0 + secs(1));
    assert!(s.backend().fading);
    assert!(s.playback().fading);

    s.tick(t0 + secs(2));
    assert!(s.playback().current.is_some());

    finish_track(s, t0 + secs(3));
    assert!(s.playback().current.is_none());
    assert!(s.playback().clock.is_stopped());
    assert_eq!(s.backend().loads.len(), 1);
    assert_eq!(s.status().unwrap().text, "Faded out");
}

#[test]
fn seek_moves_clock_and_backend_but_not_in_album_view() {
    let mut f = fixture();
    let t0 = Instant::now();
    let s = &mut f.session;

    s.handle(Action::Submit, t0);
    s.handle(Action::SeekForward, t0 + secs(3));
    assert_eq!(s.backend().seeks, vec![secs(8)]);
    assert_eq!(s.elapsed(t0 + secs(3)), secs(8));

    s.handle(Action::SeekForward, t0 + secs(3));
    assert_eq!(s.elapsed(t0 + secs(3)), secs(10));

    s.handle(Action::SwitchView(ViewKind::Albums), t0 + secs(3));
    s.handle(Action::SeekBackward, t0 + secs(3));
    assert_eq!(s.backend().seeks.len(), 2);
}

#[test]
fn next_and_prev_walk_the_library_with_wraparound() {
    let mut f = fixture();
    let t0 = Instant::now();
    let (a, c) = (f.path("a.mp3"), f.path("c.mp3"));
    let s = &mut f.session;

    s.handle(Action::Submit, t0);
    s.handle(Action::Prev, t0);
    assert_eq!(s.playback().current.as_deref(), Some(c.as_path()));
    s.handle(Action::Next, t0);
    assert_eq!(s.playback().current.as_deref(), Some(a.as_path()));
}

#[test]
fn shuffle_next_stays_inside_library() {
    let mut f = fixture();
    let t0 = Instant::now();
    let s = &mut f.session;

    s.handle(Action::ToggleShuffle, t0);
    for _ in 0..10 {
        s.handle(Action::Next, t0);
        let current = s.playback().current.clone().unwrap();
        assert!(s.index().position(&current).is_some());
    }
}

#[test]
fn volume_steps_round_and_clamp() {
    let mut f = fixture();
    let t0 = Instant::now();
    let s = &mut f.session;

    s.handle(Action::VolumeUp, t0);
    assert_eq!(s.playback().volume, 1.0);

    for _ in 0..3 {
        s.handle(Action::VolumeDown, t0);
    }
    assert_eq!(s.playback().volume, 0.85);
    assert_eq!(s.backend().volume, 0.85);
    assert_eq!(s.status().unwrap().text, "Volume 85%");

    for _ in 0..40 {
        s.handle(Action::VolumeDown, t0);
    }
    assert_eq!(s.playback().volume, 0.0);
}

#[test]
fn search_commit_selects_without_playing() {
    let mut f = fixture();
    let t0 = Instant::now();
    let s = &mut f.session;

    type_search(s, "gam", t0);
    match s.mode() {
        Mode::Search(search) => {
            assert_eq!(search.query, "gam");
            assert_eq!(search.results, vec![2]);
        }
        other => panic!("expected search mode, got {other:?}"),
    }

    s.handle(Action::Submit, t0);
    assert_eq!(s.mode(), &Mode::Normal);
    assert_eq!(s.views().library.selected, 2);
    assert!(s.playback().current.is_none());
}

#[test]
fn search_cursor_moves_over_results_only() {
    let mut f = fixture();
    let t0 = Instant::now();
    let s = &mut f.session;

    type_search(s, "song", t0);
    s.handle(Action::MoveDown, t0);
    s.handle(Action::MoveDown, t0);
    s.handle(Action::MoveDown, t0);
    match s.mode() {
        Mode::Search(search) => {
            assert_eq!(search.results, vec![0, 1]);
            assert_eq!(search.cursor, 1);
        }
        other => panic!("expected search mode, got {other:?}"),
    }
    // The view's own selection is untouched until commit.
    assert_eq!(s.views().library.selected, 0);

    s.handle(Action::Submit, t0);
    assert_eq!(s.views().library.selected, 1);
}

#[test]
fn search_select_and_play_option_starts_playback() {
    let mut f = fixture_with(SessionOptions {
        search_commit: SearchCommit::SelectAndPlay,
        ..SessionOptions::default()
    });
    let t0 = Instant::now();
    let c = f.path("c.mp3");
    let s = &mut f.session;

    type_search(s, "gamma", t0);
    s.handle(Action::Submit, t0);
    assert_eq!(s.playback().current.as_deref(), Some(c.as_path()));
}

#[test]
fn search_exits_on_escape_or_backspace_on_empty_query() {
    let mut f = fixture();
    let t0 = Instant::now();
    let s = &mut f.session;

    type_search(s, "g", t0);
    s.handle(Action::Cancel, t0);
    assert_eq!(s.mode(), &Mode::Normal);
    assert_eq!(s.views().library.selected, 0);

    type_search(s, "g", t0);
    s.handle(Action::Backspace, t0);
    assert!(matches!(s.mode(), Mode::Search(_)));
    s.handle(Action::Backspace, t0);
    assert_eq!(s.mode(), &Mode::Normal);
}

#[test]
fn search_is_not_available_in_album_view() {
    let mut f = fixture();
    let t0 = Instant::now();
    let s = &mut f.session;

    s.handle(Action::SwitchView(ViewKind::Albums), t0);
    s.handle(Action::BeginSearch, t0);
    assert_eq!(s.mode(), &Mode::Normal);
}

#[test]
fn album_view_enter_and_queue_need_track_pane() {
    let mut f = fixture();
    let t0 = Instant::now();
    let b = f.path("b.mp3");
    let s = &mut f.session;

    s.handle(Action::SwitchView(ViewKind::Albums), t0);
    s.handle(Action::Submit, t0);
    s.handle(Action::Enqueue, t0);
    assert!(s.playback().current.is_none());
    assert!(s.queue().is_empty());

    s.handle(Action::FocusTracks, t0);
    s.handle(Action::MoveDown, t0);
    assert_eq!(s.views().album.tracks.selected, 1);
    s.handle(Action::Submit, t0);
    assert_eq!(s.playback().current.as_deref(), Some(b.as_path()));

    s.handle(Action::FocusAlbums, t0);
    assert_eq!(s.views().album.pane, Pane::Albums);
}

#[test]
fn queue_view_remove_key_and_enter() {
    let mut f = fixture();
    let t0 = Instant::now();
    let b = f.path("b.mp3");
    let s = &mut f.session;

    for _ in 0..3 {
        s.handle(Action::Enqueue, t0);
    }
    assert_eq!(s.queue().len(), 3);

    s.handle(Action::SwitchView(ViewKind::Queue), t0);
    s.handle(Action::MoveDown, t0);
    s.handle(Action::Submit, t0);
    assert_eq!(s.playback().current.as_deref(), Some(b.as_path()));
    assert_eq!(s.queue().cursor(), 0);

    s.handle(Action::MoveDown, t0);
    s.handle(Action::RemoveFromQueue, t0);
    assert_eq!(s.queue().len(), 2);
    assert_eq!(s.views().queue.selected, 1);
    assert_eq!(s.active_names(), vec!["Alpha Song", "Beta Song"]);
}

#[test]
fn remove_command_adjusts_cursor_and_reports_bad_index() {
    let mut f = fixture();
    let t0 = Instant::now();
    let s = &mut f.session;

    for _ in 0..3 {
        s.handle(Action::Enqueue, t0);
    }
    s.handle(Action::Next, t0);
    s.handle(Action::Next, t0);
    assert_eq!(s.queue().cursor(), 2);

    run_command(s, ":remove 1", t0);
    assert_eq!(s.queue().len(), 2);
    assert_eq!(s.queue().cursor(), 1);

    run_command(s, ":remove 9", t0);
    assert_eq!(s.status().unwrap().text, "Invalid queue index.");
    assert_eq!(s.queue().len(), 2);

    run_command(s, ":clear", t0);
    assert!(s.queue().is_empty());
    assert_eq!(s.queue().cursor(), 0);
}

#[test]
fn unknown_and_empty_commands() {
    let mut f = fixture();
    let t0 = Instant::now();
    let s = &mut f.session;

    assert_eq!(run_command(s, ":bogus", t0), Flow::Continue);
    assert_eq!(s.mode(), &Mode::Normal);
    let status = s.status().unwrap();
    assert_eq!(status.text, "Unknown command: :bogus");
    assert_eq!(status.kind, StatusKind::Error);

    run_command(s, ":", t0);
    assert!(s.status().is_none());
}

#[test]
fn command_entry_editing() {
    let mut f = fixture();
    let t0 = Instant::now();
    let s = &mut f.session;

    s.handle(Action::BeginCommand, t0);
    s.handle(Action::Input('x'), t0);
    s.handle(Action::Backspace, t0);
    assert_eq!(
        s.mode(),
        &Mode::CommandEntry {
            buffer: ":".to_string()
        }
    );
    s.handle(Action::Input('q'), t0);
    s.handle(Action::Cancel, t0);
    assert_eq!(s.mode(), &Mode::Normal);
}

#[test]
fn help_and_version_popups_close_on_any_key() {
    let mut f = fixture();
    let t0 = Instant::now();
    let s = &mut f.session;

    run_command(s, ":help", t0);
    assert_eq!(s.popup(), Some(Popup::Help));
    s.handle(Action::MoveDown, t0);
    assert_eq!(s.popup(), None);
    // The key that closed the popup did nothing else.
    assert_eq!(s.views().library.selected, 0);

    run_command(s, ":v", t0);
    assert_eq!(s.popup(), Some(Popup::Version));
}

#[test]
fn quit_needs_confirmation_and_quit_command_does_not() {
    let mut f = fixture();
    let t0 = Instant::now();
    let s = &mut f.session;

    assert_eq!(s.handle(Action::RequestQuit, t0), Flow::Continue);
    assert_eq!(s.mode(), &Mode::QuitConfirm);
    assert_eq!(s.handle(Action::MoveDown, t0), Flow::Continue);
    assert_eq!(s.mode(), &Mode::QuitConfirm);
    assert_eq!(s.handle(Action::Cancel, t0), Flow::Continue);
    assert_eq!(s.mode(), &Mode::Normal);

    s.handle(Action::RequestQuit, t0);
    assert_eq!(s.handle(Action::Confirm, t0), Flow::Quit);

    assert_eq!(run_command(s, ":q", t0), Flow::Quit);
}

#[test]
fn add_folder_missing_keeps_library() {
    let mut f = fixture();
    let t0 = Instant::now();
    let s = &mut f.session;

    run_command(s, ":a /definitely/not/here", t0);
    assert_eq!(s.status().unwrap().text, "Folder not found.");
    assert_eq!(s.index().len(), 3);
}

#[test]
fn refresh_rescans_and_resets_views() {
    let mut f = fixture();
    let t0 = Instant::now();
    std::fs::write(f.path("d.mp3"), b"x").unwrap();
    let s = &mut f.session;

    s.handle(Action::MoveDown, t0);
    run_command(s, ":refresh", t0);
    assert_eq!(s.index().len(), 4);
    assert_eq!(s.views().library.selected, 0);
    assert_eq!(s.status().unwrap().kind, StatusKind::Info);
}

#[test]
fn session_state_reflects_toggles() {
    let mut f = fixture();
    let t0 = Instant::now();
    let s = &mut f.session;

    s.handle(Action::ToggleShuffle, t0);
    s.handle(Action::VolumeDown, t0);
    let state = s.session_state();
    assert!(state.shuffle);
    assert!(!state.repeat);
    assert_eq!(state.volume, 0.95);
    assert_eq!(state.music_folder.as_deref(), Some(f.dir.path()));
}
