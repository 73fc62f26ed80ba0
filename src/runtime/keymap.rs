use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{Action, Mode, ViewKind};
use crate::config::KeyBindings;
use crate::config::keys::parse_key;

/// What the key map needs to know about the session to pick an action.
#[derive(Debug, Clone, Copy)]
pub struct KeyContext<'a> {
    pub mode: &'a Mode,
    pub popup_open: bool,
    pub view: ViewKind,
}

/// Configured key bindings resolved to key codes.
pub struct KeyMap {
    normal: Vec<(KeyCode, Action)>,
    panes: Vec<(KeyCode, Action)>,
    search_nav: Vec<(KeyCode, Action)>,
}

fn bind(out: &mut Vec<(KeyCode, Action)>, specs: &[String], action: Action) {
    out.extend(specs.iter().filter_map(|s| parse_key(s)).map(|code| (code, action)));
}

fn lookup(table: &[(KeyCode, Action)], code: KeyCode) -> Option<Action> {
    table.iter().find(|(c, _)| *c == code).map(|&(_, a)| a)
}

impl KeyMap {
    pub fn new(keys: &KeyBindings) -> Self {
        let mut normal = Vec::new();
        bind(&mut normal, &keys.up, Action::MoveUp);
        bind(&mut normal, &keys.down, Action::MoveDown);
        bind(&mut normal, &keys.enter, Action::Submit);
        bind(&mut normal, &keys.play_pause, Action::TogglePause);
        bind(&mut normal, &keys.next, Action::Next);
        bind(&mut normal, &keys.prev, Action::Prev);
        bind(&mut normal, &keys.shuffle, Action::ToggleShuffle);
        bind(&mut normal, &keys.repeat, Action::ToggleRepeat);
        bind(&mut normal, &keys.search, Action::BeginSearch);
        bind(&mut normal, &keys.volume_up, Action::VolumeUp);
        bind(&mut normal, &keys.volume_down, Action::VolumeDown);
        bind(&mut normal, &keys.queue, Action::Enqueue);
        bind(&mut normal, &keys.remove, Action::RemoveFromQueue);
        bind(&mut normal, &keys.quit, Action::RequestQuit);
        bind(&mut normal, &keys.fade_out, Action::FadeOut);
        bind(&mut normal, &keys.seek_forward, Action::SeekForward);
        bind(&mut normal, &keys.seek_backward, Action::SeekBackward);

        let mut panes = Vec::new();
        bind(&mut panes, &keys.pane_left, Action::FocusAlbums);
        bind(&mut panes, &keys.pane_right, Action::FocusTracks);

        let mut search_nav = Vec::new();
        bind(&mut search_nav, &keys.up, Action::MoveUp);
        bind(&mut search_nav, &keys.down, Action::MoveDown);

        Self {
            normal,
            panes,
            search_nav,
        }
    }

    pub fn translate(&self, key: KeyEvent, ctx: KeyContext<'_>) -> Option<Action> {
        if ctx.popup_open {
            return Some(Action::Cancel);
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match ctx.mode {
            Mode::QuitConfirm => match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => Some(Action::Confirm),
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Some(Action::Cancel),
                _ => None,
            },
            Mode::CommandEntry { .. } | Mode::Search(_) => {
                match key.code {
                    KeyCode::Esc => return Some(Action::Cancel),
                    KeyCode::Enter => return Some(Action::Submit),
                    KeyCode::Backspace => return Some(Action::Backspace),
                    _ => {}
                }
                if matches!(ctx.mode, Mode::Search(_))
                    && let Some(action) = lookup(&self.search_nav, key.code)
                {
                    return Some(action);
                }
                match key.code {
                    KeyCode::Char(c) if !ctrl && !c.is_control() => Some(Action::Input(c)),
                    _ => None,
                }
            }
            Mode::Normal => {
                if ctrl {
                    return match key.code {
                        KeyCode::Char('c') => Some(Action::RequestQuit),
                        _ => None,
                    };
                }
                match key.code {
                    KeyCode::Char(':') => return Some(Action::BeginCommand),
                    KeyCode::Char('1') => return Some(Action::SwitchView(ViewKind::Library)),
                    KeyCode::Char('2') => return Some(Action::SwitchView(ViewKind::Queue)),
                    KeyCode::Char('3') => return Some(Action::SwitchView(ViewKind::Albums)),
                    _ => {}
                }
                if ctx.view == ViewKind::Albums
                    && let Some(action) = lookup(&self.panes, key.code)
                {
                    return Some(action);
                }
                lookup(&self.normal, key.code)
            }
        }
    }
}
