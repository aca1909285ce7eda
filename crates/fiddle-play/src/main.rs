//! Launch the fiddle playground.

use std::{fs::File, path::Path, sync::Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use fiddle_play::{PlayOptions, play};
use tracing::Level;

/// Send tracing output to a file. The terminal belongs to the playground.
fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(Level::DEBUG)
        .with_line_number(true)
        .compact()
        .init();
    Ok(())
}

/// Run the playground.
pub fn main() -> Result<()> {
    let opts = PlayOptions::parse();
    if let Some(path) = &opts.log {
        init_logging(path)?;
    }
    play::run(&opts)
}
