use std::path::PathBuf;
use std::time::Duration;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{error, info};

use crate::app::Session;
use crate::audio::RodioBackend;
use crate::config::{self, StateStore};

mod event_loop;
mod keymap;
mod logging;
mod settings;
mod startup;

pub fn run(cli_folder: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let _log_guard = config::state_dir().and_then(|dir| logging::init(&dir));
    info!("muse {} starting", env!("CARGO_PKG_VERSION"));

    let settings = settings::load_settings();
    let store = StateStore::default_location();
    let state = settings::load_state(store.as_ref());
    let start = startup::resolve(&settings, state, cli_folder);

    let backend = match RodioBackend::open() {
        Ok(b) => b,
        Err(e) => {
            error!("{e}");
            eprintln!("muse: {e}");
            return Err(e.into());
        }
    };

    let mut session = Session::new(
        backend,
        startup::build_loader(&settings),
        start.options,
        start.playback,
        start.view,
    );
    if let Some(folder) = start.folder {
        session.open_folder(folder);
    }

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(
        &mut terminal,
        &mut session,
        &settings.keys,
        Duration::from_millis(settings.ui.redraw_interval_ms.max(1)),
        store.as_ref(),
    );

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &run_result {
        error!("event loop failed: {e}");
    }
    run_result
}
