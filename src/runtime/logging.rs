use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter (`EnvFilter` syntax).
pub const LOG_ENV: &str = "MUSE_LOG";

/// Log to a daily-rolling `muse.log` under `dir`.
///
/// The terminal belongs to the UI, so nothing is written to stderr. The
/// returned guard flushes pending lines when dropped; keep it alive for the
/// whole run. Returns `None` when logging could not be set up.
pub fn init(dir: &Path) -> Option<WorkerGuard> {
    if let Err(e) = std::fs::create_dir_all(dir) {
        eprintln!("muse: cannot create log directory {}: {e}", dir.display());
        return None;
    }

    let file_appender = tracing_appender::rolling::daily(dir, "muse.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::fmt()
        .with_writer(file_writer)
        .with_target(true)
        .with_level(true)
        .with_ansi(false)
        .with_env_filter(filter)
        .finish();

    match tracing::subscriber::set_global_default(subscriber) {
        Ok(()) => Some(guard),
        Err(e) => {
            eprintln!("muse: logging disabled: {e}");
            None
        }
    }
}
