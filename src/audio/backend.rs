use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("no audio output device: {0}")]
    NoOutputDevice(String),

    #[error("cannot play {}: {reason}", path.display())]
    LoadFailure { path: PathBuf, reason: String },

    #[error("cannot seek in {}: {reason}", path.display())]
    SeekFailure { path: PathBuf, reason: String },
}

/// Whatever actually produces sound.
///
/// The session only ever polls `is_busy`; it never asks the backend for a
/// position, so implementations are free to drift from the session clock.
pub trait AudioBackend {
    /// Prepare `path` for playback, paused at the start. On failure the
    /// previously loaded track (if any) is left as it was.
    fn load(&mut self, path: &Path) -> Result<(), PlaybackError>;

    fn play(&mut self);
    fn pause(&mut self);
    fn unpause(&mut self);
    fn stop(&mut self);

    fn set_volume(&mut self, volume: f32);
    fn volume(&self) -> f32;

    /// Start lowering the volume to silence over `over`, then stop.
    fn fade_out(&mut self, over: Duration, now: Instant);

    /// Jump to an absolute position in the loaded track.
    fn seek_to(&mut self, position: Duration) -> Result<(), PlaybackError>;

    /// True while a track is loaded and still has audio left (paused counts).
    fn is_busy(&self) -> bool;

    /// Advance time-based effects such as an ongoing fade.
    fn tick(&mut self, _now: Instant) {}
}
