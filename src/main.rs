use std::path::PathBuf;

use clap::Parser;

mod app;
mod audio;
mod config;
mod library;
mod runtime;
mod ui;

/// Terminal music browser with library, queue and album views.
#[derive(Debug, Parser)]
#[command(name = "muse", version, about)]
struct Cli {
    /// Music folder to open; defaults to the last one used.
    folder: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    runtime::run(cli.folder)
}
