//! Command line options.

use std::{path::PathBuf, time::Duration};

use clap::Parser;

/// Playground options.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[clap(author, version, about, long_about = None)]
#[clap(after_help = "Keys: WASD move, Q/E rotate, wheel zoom, R reset camera, \
                     C toggle checkbox, Tab split screen, Esc quit.")]
pub struct PlayOptions {
    /// Target frames per second.
    #[clap(long, default_value_t = 60)]
    pub fps: u32,

    /// Start in split-screen mode.
    #[clap(short, long)]
    pub split: bool,

    /// Write trace output to this file.
    #[clap(long)]
    pub log: Option<PathBuf>,
}

impl Default for PlayOptions {
    fn default() -> Self {
        Self {
            fps: 60,
            split: false,
            log: None,
        }
    }
}

impl PlayOptions {
    /// Set the target frame rate.
    pub fn fps(mut self, fps: u32) -> Self {
        self.fps = fps;
        self
    }

    /// Start in split-screen mode.
    pub fn split(mut self, split: bool) -> Self {
        self.split = split;
        self
    }

    /// Time budget for one frame. A zero frame rate is treated as one.
    pub fn frame_time(&self) -> Duration {
        Duration::from_secs(1) / self.fps.max(1)
    }
}
