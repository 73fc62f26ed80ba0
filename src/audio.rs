//! Audio output and the playback clock.
//!
//! `AudioBackend` is the seam the session talks to; `RodioBackend` is the real
//! implementation. `PlaybackClock` tracks the reported position independently
//! of the backend.

mod backend;
mod clock;
mod player;
mod sink;

pub use backend::{AudioBackend, PlaybackError};
pub use clock::{ClockState, PlaybackClock};
pub use player::RodioBackend;
