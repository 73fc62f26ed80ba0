use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::debug;

use super::backend::{AudioBackend, PlaybackError};
use super::sink::create_sink_at;

struct Fade {
    started: Instant,
    over: Duration,
    from: f32,
}

/// `rodio` output: one stream for the whole session, one sink per loaded track.
pub struct RodioBackend {
    stream: OutputStream,
    sink: Option<Sink>,
    current: Option<PathBuf>,
    playing: bool,
    volume: f32,
    fade: Option<Fade>,
}

impl RodioBackend {
    pub fn open() -> Result<Self, PlaybackError> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| PlaybackError::NoOutputDevice(e.to_string()))?;
        // rodio logs to stderr when OutputStream is dropped, which would
        // scribble over the TUI.
        stream.log_on_drop(false);

        Ok(Self {
            stream,
            sink: None,
            current: None,
            playing: false,
            volume: 1.0,
            fade: None,
        })
    }

    fn swap_sink(&mut self, sink: Sink) {
        sink.set_volume(self.volume);
        if let Some(old) = self.sink.replace(sink) {
            old.stop();
        }
    }
}

impl AudioBackend for RodioBackend {
    fn load(&mut self, path: &Path) -> Result<(), PlaybackError> {
        let sink = create_sink_at(&self.stream, path, Duration::ZERO)?;
        self.fade = None;
        self.swap_sink(sink);
        self.current = Some(path.to_path_buf());
        self.playing = false;
        Ok(())
    }

    fn play(&mut self) {
        if let Some(sink) = &self.sink {
            sink.play();
            self.playing = true;
        }
    }

    fn pause(&mut self) {
        if let Some(sink) = &self.sink {
            sink.pause();
            self.playing = false;
        }
    }

    fn unpause(&mut self) {
        self.play();
    }

    fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        self.current = None;
        self.playing = false;
        self.fade = None;
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        if self.fade.is_none() {
            if let Some(sink) = &self.sink {
                sink.set_volume(self.volume);
            }
        }
    }

    fn volume(&self) -> f32 {
        self.volume
    }

    fn fade_out(&mut self, over: Duration, now: Instant) {
        let Some(sink) = &self.sink else {
            return;
        };
        if over.is_zero() {
            self.stop();
            return;
        }
        self.fade = Some(Fade {
            started: now,
            over,
            from: sink.volume(),
        });
    }

    fn seek_to(&mut self, position: Duration) -> Result<(), PlaybackError> {
        let Some(path) = self.current.clone() else {
            return Ok(());
        };
        let sink = create_sink_at(&self.stream, &path, position).map_err(|e| {
            PlaybackError::SeekFailure {
                path: path.clone(),
                reason: e.to_string(),
            }
        })?;
        let resume = self.playing;
        let fading_volume = self.sink.as_ref().map(Sink::volume);
        self.swap_sink(sink);
        if let (Some(v), Some(sink)) = (fading_volume.filter(|_| self.fade.is_some()), &self.sink) {
            sink.set_volume(v);
        }
        if resume {
            self.play();
        }
        debug!(position_ms = position.as_millis() as u64, "rebuilt sink for seek");
        Ok(())
    }

    fn is_busy(&self) -> bool {
        self.sink.as_ref().is_some_and(|s| !s.empty())
    }

    fn tick(&mut self, now: Instant) {
        let Some(fade) = &self.fade else {
            return;
        };
        let t = now.saturating_duration_since(fade.started).as_secs_f32() / fade.over.as_secs_f32();
        if t >= 1.0 {
            if let Some(sink) = self.sink.take() {
                sink.stop();
            }
            self.current = None;
            self.playing = false;
            self.fade = None;
        } else if let Some(sink) = &self.sink {
            sink.set_volume(fade.from * (1.0 - t));
        }
    }
}
