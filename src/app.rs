//! Session state machine: views, search, play queue and playback control.
//!
//! `Session` (in `app::model`) owns all interactive state; `app::dispatch`
//! applies `Action`s to it and runs the per-tick auto-advance check.

mod action;
mod command;
mod dispatch;
mod model;
mod queue;
mod search;
mod view;

pub use action::{Action, Flow};
pub use command::{Command, CommandError, COMMAND_HELP};
pub use model::*;
pub use queue::{PlayQueue, QueueError};
pub use search::rank;
pub use view::{AlbumViewState, Pane, ViewKind, ViewState, Views};

#[cfg(test)]
mod tests;
