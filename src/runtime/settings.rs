use tracing::warn;

use crate::config::{self, SessionState, StateStore};

pub fn load_settings() -> config::Settings {
    match config::Settings::load() {
        Ok(s) => {
            if let Err(msg) = s.validate() {
                warn!("invalid config, using defaults: {msg}");
                config::Settings::default()
            } else {
                s
            }
        }
        Err(e) => {
            // Config is optional; failures should not prevent the app from starting.
            warn!("failed to load config, using defaults: {e}");
            config::Settings::default()
        }
    }
}

/// Last session's persisted values, if any could be read.
pub fn load_state(store: Option<&StateStore>) -> Option<SessionState> {
    let store = store?;
    match store.load() {
        Ok(state) => state,
        Err(e) => {
            warn!("ignoring unreadable state file: {e}");
            None
        }
    }
}

pub fn save_state(store: Option<&StateStore>, state: &SessionState) {
    let Some(store) = store else {
        return;
    };
    if let Err(e) = store.save(state) {
        warn!("failed to save state to {}: {e}", store.path().display());
    }
}
