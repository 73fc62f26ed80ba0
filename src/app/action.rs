use super::view::ViewKind;

/// Everything the session reacts to. Produced from key presses by the runtime
/// key map; which actions are meaningful depends on the current mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveUp,
    MoveDown,
    /// Album view: move focus to the album list.
    FocusAlbums,
    /// Album view: move focus to the track list.
    FocusTracks,
    /// Play the selection, run the typed command or commit the search.
    Submit,
    Enqueue,
    RemoveFromQueue,
    TogglePause,
    Next,
    Prev,
    VolumeUp,
    VolumeDown,
    FadeOut,
    SeekForward,
    SeekBackward,
    ToggleShuffle,
    ToggleRepeat,
    SwitchView(ViewKind),
    BeginSearch,
    BeginCommand,
    RequestQuit,
    /// Answer yes to the quit prompt.
    Confirm,
    /// A printable character typed into the command or search line.
    Input(char),
    Backspace,
    Cancel,
}

/// Whether the event loop should keep running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}
