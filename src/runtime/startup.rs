use std::path::PathBuf;
use std::time::Duration;

use crate::app::{PlaybackSession, SearchCommit, SessionOptions, ViewKind};
use crate::config::{self, SessionState};
use crate::library::{LibraryLoader, LoftyReader, SnapshotCache};

/// Initial session values after merging config, persisted state and CLI.
pub struct Startup {
    pub playback: PlaybackSession,
    pub options: SessionOptions,
    pub view: ViewKind,
    pub folder: Option<PathBuf>,
}

/// Persisted state wins over config; a folder on the command line wins over both.
pub fn resolve(
    settings: &config::Settings,
    state: Option<SessionState>,
    cli_folder: Option<PathBuf>,
) -> Startup {
    let (volume, shuffle, repeat, saved_folder) = match state {
        Some(s) => (s.volume, s.shuffle, s.repeat, s.music_folder),
        None => (
            settings.playback.volume,
            settings.playback.shuffle,
            settings.playback.repeat,
            None,
        ),
    };

    let folder = cli_folder
        .or(saved_folder)
        .or_else(|| settings.library.music_folder.clone());

    Startup {
        playback: PlaybackSession::new(volume, shuffle, repeat),
        options: session_options(settings),
        view: match settings.ui.default_view {
            config::ViewSetting::Library => ViewKind::Library,
            config::ViewSetting::Queue => ViewKind::Queue,
            config::ViewSetting::Albums => ViewKind::Albums,
        },
        folder,
    }
}

fn session_options(settings: &config::Settings) -> SessionOptions {
    SessionOptions {
        seek_step: Duration::from_secs(settings.playback.seek_seconds),
        volume_step: settings.audio.volume_step,
        fade_out: Duration::from_millis(settings.audio.fade_out_ms),
        search_commit: match settings.playback.search_commit {
            config::SearchCommitSetting::Select => SearchCommit::Select,
            config::SearchCommitSetting::SelectAndPlay => SearchCommit::SelectAndPlay,
        },
    }
}

pub fn build_loader(settings: &config::Settings) -> LibraryLoader {
    let cache = if settings.library.cache {
        config::cache_dir().map(SnapshotCache::new)
    } else {
        None
    };
    LibraryLoader::new(settings.library.clone(), Box::new(LoftyReader), cache)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_overrides_config_and_cli_overrides_folder() {
        let mut settings = config::Settings::default();
        settings.playback.volume = 0.3;
        settings.library.music_folder = Some("/cfg".into());

        let none = resolve(&settings, None, None);
        assert_eq!(none.playback.volume, 0.3);
        assert_eq!(none.folder, Some(PathBuf::from("/cfg")));

        let state = SessionState {
            volume: 0.7,
            shuffle: true,
            repeat: true,
            music_folder: Some("/saved".into()),
        };
        let saved = resolve(&settings, Some(state.clone()), None);
        assert_eq!(saved.playback.volume, 0.7);
        assert!(saved.playback.shuffle);
        assert!(saved.playback.repeat);
        assert_eq!(saved.folder, Some(PathBuf::from("/saved")));

        let cli = resolve(&settings, Some(state), Some("/cli".into()));
        assert_eq!(cli.folder, Some(PathBuf::from("/cli")));
    }

    #[test]
    fn maps_setting_enums() {
        let mut settings = config::Settings::default();
        settings.ui.default_view = config::ViewSetting::Albums;
        settings.playback.search_commit = config::SearchCommitSetting::SelectAndPlay;
        settings.playback.seek_seconds = 12;

        let s = resolve(&settings, None, None);
        assert_eq!(s.view, ViewKind::Albums);
        assert_eq!(s.options.search_commit, SearchCommit::SelectAndPlay);
        assert_eq!(s.options.seek_step, Duration::from_secs(12));
    }
}
