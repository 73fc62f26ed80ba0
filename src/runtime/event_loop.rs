use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::info;

use crate::app::{Flow, Session};
use crate::audio::AudioBackend;
use crate::config::{KeyBindings, StateStore};
use crate::runtime::keymap::{KeyContext, KeyMap};
use crate::runtime::settings::save_state;
use crate::ui;

/// Main terminal event loop: one input event per iteration, rate-limited
/// tick and redraw. Returns `Ok(())` once quitting is confirmed.
pub fn run<B: AudioBackend>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    session: &mut Session<B>,
    keys: &KeyBindings,
    redraw_interval: Duration,
    store: Option<&StateStore>,
) -> Result<(), Box<dyn std::error::Error>> {
    let keymap = KeyMap::new(keys);
    let mut last_frame: Option<Instant> = None;
    let mut dirty = true;

    loop {
        let now = Instant::now();
        let due = last_frame.is_none_or(|t| now.duration_since(t) >= redraw_interval);

        if due {
            session.tick(now);
            if session.take_state_dirty() {
                save_state(store, &session.session_state());
            }
        }

        if due || dirty {
            terminal.draw(|f| {
                session.set_capacity(ui::list_capacity(f.area()));
                ui::draw(f, session, keys, now);
            })?;
            last_frame = Some(now);
            dirty = false;
        }

        if !event::poll(redraw_interval)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            dirty = true;
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        let ctx = KeyContext {
            mode: session.mode(),
            popup_open: session.popup().is_some(),
            view: session.views().active,
        };
        let Some(action) = keymap.translate(key, ctx) else {
            continue;
        };

        dirty = true;
        if session.handle(action, Instant::now()) == Flow::Quit {
            info!("quit requested");
            save_state(store, &session.session_state());
            return Ok(());
        }
    }
}
