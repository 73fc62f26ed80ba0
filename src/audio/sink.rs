//! Utilities for creating `rodio` sinks from file paths.
//!
//! The helper here encapsulates opening/decoding a file and preparing a
//! paused `Sink` at the requested start position.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use rodio::{Decoder, OutputStream, Sink, Source};

use super::PlaybackError;

/// Create a paused `Sink` for `path` that starts playback at `start_at`.
pub(super) fn create_sink_at(
    handle: &OutputStream,
    path: &Path,
    start_at: Duration,
) -> Result<Sink, PlaybackError> {
    let failure = |reason: String| PlaybackError::LoadFailure {
        path: path.to_path_buf(),
        reason,
    };

    let file = File::open(path).map_err(|e| failure(e.to_string()))?;

    let source = Decoder::new(BufReader::new(file))
        .map_err(|e| failure(e.to_string()))?
        .skip_duration(start_at);

    let sink = Sink::connect_new(handle.mixer());
    sink.append(source);
    sink.pause();
    Ok(sink)
}
