use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockState {
    Stopped,
    /// Position is `base + (now - since)`.
    Playing { since: Instant, base: Duration },
    Paused { offset: Duration },
}

/// Elapsed-time estimate for the loaded track, derived from wall-clock
/// instants rather than from the backend.
#[derive(Debug, Clone)]
pub struct PlaybackClock {
    state: ClockState,
    length: Option<Duration>,
}

impl Default for PlaybackClock {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackClock {
    pub fn new() -> Self {
        Self {
            state: ClockState::Stopped,
            length: None,
        }
    }

    pub fn state(&self) -> ClockState {
        self.state
    }

    pub fn length(&self) -> Option<Duration> {
        self.length
    }

    pub fn is_playing(&self) -> bool {
        matches!(self.state, ClockState::Playing { .. })
    }

    pub fn is_paused(&self) -> bool {
        matches!(self.state, ClockState::Paused { .. })
    }

    pub fn is_stopped(&self) -> bool {
        matches!(self.state, ClockState::Stopped)
    }

    /// A freshly loaded track starts playing from zero.
    pub fn load(&mut self, now: Instant, length: Option<Duration>) {
        self.length = length;
        self.state = ClockState::Playing {
            since: now,
            base: Duration::ZERO,
        };
    }

    /// Freeze the position. Returns false unless the clock was playing.
    pub fn pause(&mut self, now: Instant) -> bool {
        match self.state {
            ClockState::Playing { .. } => {
                self.state = ClockState::Paused {
                    offset: self.elapsed(now),
                };
                true
            }
            _ => false,
        }
    }

    /// Resume from the frozen position. Returns false unless paused.
    pub fn unpause(&mut self, now: Instant) -> bool {
        match self.state {
            ClockState::Paused { offset } => {
                self.state = ClockState::Playing {
                    since: now,
                    base: offset,
                };
                true
            }
            _ => false,
        }
    }

    pub fn stop(&mut self) {
        self.state = ClockState::Stopped;
        self.length = None;
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        match self.state {
            ClockState::Stopped => Duration::ZERO,
            ClockState::Playing { since, base } => base + now.saturating_duration_since(since),
            ClockState::Paused { offset } => offset,
        }
    }

    /// Where a relative seek of `delta_secs` would land, clamped to the track.
    /// `None` while stopped.
    ///
    /// With an unknown length only the lower bound applies.
    pub fn seek_target(&self, now: Instant, delta_secs: i64) -> Option<Duration> {
        if self.is_stopped() {
            return None;
        }
        let current = self.elapsed(now);
        let delta = Duration::from_secs(delta_secs.unsigned_abs());
        let target = if delta_secs >= 0 {
            current + delta
        } else {
            current.saturating_sub(delta)
        };
        Some(match self.length {
            Some(length) => target.min(length),
            None => target,
        })
    }

    /// Rewrite the reference point so `elapsed` reports `position` from now on.
    pub fn set_position(&mut self, now: Instant, position: Duration) {
        self.state = match self.state {
            ClockState::Stopped => ClockState::Stopped,
            ClockState::Playing { .. } => ClockState::Playing {
                since: now,
                base: position,
            },
            ClockState::Paused { .. } => ClockState::Paused { offset: position },
        };
    }
}
