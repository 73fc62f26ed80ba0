//! Session state persisted between runs (volume, shuffle, repeat, folder).
//!
//! Kept apart from `config.toml` so the user's config file is never rewritten.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("failed to access state file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid state file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to encode state: {0}")]
    Encode(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionState {
    pub volume: f32,
    pub shuffle: bool,
    pub repeat: bool,
    pub music_folder: Option<PathBuf>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            volume: 1.0,
            shuffle: false,
            repeat: false,
            music_folder: None,
        }
    }
}

/// Reads and writes `SessionState` as TOML at a fixed path.
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Store at `<state_dir>/state.toml`, if a state directory can be resolved.
    pub fn default_location() -> Option<Self> {
        super::load::state_dir().map(|d| Self::new(d.join("state.toml")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load persisted state; `Ok(None)` when nothing has been saved yet.
    pub fn load(&self) -> Result<Option<SessionState>, StateError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StateError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        toml::from_str(&raw)
            .map(Some)
            .map_err(|source| StateError::Parse {
                path: self.path.clone(),
                source,
            })
    }

    pub fn save(&self, state: &SessionState) -> Result<(), StateError> {
        let encoded = toml::to_string_pretty(state)?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| StateError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&self.path, encoded).map_err(|source| StateError::Io {
            path: self.path.clone(),
            source,
        })
    }
}
