use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/muse/config.toml` or `~/.config/muse/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `MUSE__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub audio: AudioSettings,
    pub playback: PlaybackSettings,
    pub library: LibrarySettings,
    pub ui: UiSettings,
    pub keys: KeyBindings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Fade-out duration for the fade key (milliseconds).
    pub fade_out_ms: u64,
    /// Volume change per volume key press.
    pub volume_step: f32,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            fade_out_ms: 2000,
            volume_step: 0.05,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Whether shuffle starts enabled.
    pub shuffle: bool,
    /// Whether repeat starts enabled.
    pub repeat: bool,
    /// Initial volume in `0.0..=1.0`.
    pub volume: f32,
    /// Number of seconds to seek per seek key press.
    pub seek_seconds: u64,
    /// What pressing enter on a search result does.
    pub search_commit: SearchCommitSetting,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            shuffle: false,
            repeat: false,
            volume: 1.0,
            seek_seconds: 5,
            search_commit: SearchCommitSetting::Select,
        }
    }
}

#[derive(Debug, Copy, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchCommitSetting {
    #[serde(alias = "select-only", alias = "select_only")]
    Select,
    #[serde(alias = "select_and_play", alias = "play")]
    SelectAndPlay,
}

#[derive(Debug, Copy, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrackDisplayField {
    Title,
    Artist,
    Album,
    Filename,
    Path,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// Folder scanned at startup when none is given on the command line.
    pub music_folder: Option<PathBuf>,
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Whether to reuse and write library snapshots.
    pub cache: bool,

    /// Which fields to use to build a track's display name.
    ///
    /// Example: ["artist", "title"] -> "Artist - Title"
    pub display_fields: Vec<TrackDisplayField>,
    /// Separator used to join `display_fields`.
    pub display_separator: String,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        let extensions = [
            "mp3", "wav", "flac", "ogg", "aac", "m4a", "wma", "aiff", "ape", "opus", "mpc",
            "spx", "wv", "tta", "mp2", "mp1", "caf", "dsf", "dff", "au", "snd", "oga", "mogg",
            "xm", "mod", "it", "s3m", "mtm", "umx",
        ];
        Self {
            music_folder: None,
            extensions: extensions.iter().map(|e| e.to_string()).collect(),
            follow_links: true,
            include_hidden: true,
            cache: true,
            display_fields: vec![TrackDisplayField::Artist, TrackDisplayField::Title],
            display_separator: " - ".to_string(),
        }
    }
}

#[derive(Debug, Copy, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewSetting {
    Library,
    Queue,
    #[serde(alias = "album")]
    Albums,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// View shown at startup.
    pub default_view: ViewSetting,
    /// Minimum interval between redraws and finished-track checks (milliseconds).
    pub redraw_interval_ms: u64,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            default_view: ViewSetting::Library,
            redraw_interval_ms: 50,
        }
    }
}

/// Key specs per bindable action. See `keys::parse_key` for the accepted names.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub quit: Vec<String>,
    pub search: Vec<String>,
    pub next: Vec<String>,
    pub prev: Vec<String>,
    pub play_pause: Vec<String>,
    pub down: Vec<String>,
    pub up: Vec<String>,
    pub enter: Vec<String>,
    pub shuffle: Vec<String>,
    pub repeat: Vec<String>,
    pub volume_up: Vec<String>,
    pub volume_down: Vec<String>,
    pub fade_out: Vec<String>,
    pub queue: Vec<String>,
    pub seek_forward: Vec<String>,
    pub seek_backward: Vec<String>,
    pub remove: Vec<String>,
    pub pane_left: Vec<String>,
    pub pane_right: Vec<String>,
}

fn keys(specs: &[&str]) -> Vec<String> {
    specs.iter().map(|s| s.to_string()).collect()
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            quit: keys(&["q"]),
            search: keys(&["/"]),
            next: keys(&["n"]),
            prev: keys(&["p"]),
            play_pause: keys(&["space"]),
            down: keys(&["down"]),
            up: keys(&["up"]),
            enter: keys(&["enter"]),
            shuffle: keys(&["s"]),
            repeat: keys(&["r"]),
            volume_up: keys(&["+", "="]),
            volume_down: keys(&["-"]),
            fade_out: keys(&["f"]),
            queue: keys(&["e"]),
            seek_forward: keys(&["right"]),
            seek_backward: keys(&["left"]),
            remove: keys(&["d", "delete"]),
            pane_left: keys(&["left", "h"]),
            pane_right: keys(&["right", "l"]),
        }
    }
}

impl KeyBindings {
    /// All bindings as `(name, specs)` pairs, in help-text order.
    pub fn entries(&self) -> [(&'static str, &[String]); 19] {
        [
            ("up", self.up.as_slice()),
            ("down", self.down.as_slice()),
            ("enter", self.enter.as_slice()),
            ("play_pause", self.play_pause.as_slice()),
            ("next", self.next.as_slice()),
            ("prev", self.prev.as_slice()),
            ("shuffle", self.shuffle.as_slice()),
            ("repeat", self.repeat.as_slice()),
            ("search", self.search.as_slice()),
            ("volume_up", self.volume_up.as_slice()),
            ("volume_down", self.volume_down.as_slice()),
            ("queue", self.queue.as_slice()),
            ("quit", self.quit.as_slice()),
            ("fade_out", self.fade_out.as_slice()),
            ("seek_forward", self.seek_forward.as_slice()),
            ("seek_backward", self.seek_backward.as_slice()),
            ("remove", self.remove.as_slice()),
            ("pane_left", self.pane_left.as_slice()),
            ("pane_right", self.pane_right.as_slice()),
        ]
    }
}
