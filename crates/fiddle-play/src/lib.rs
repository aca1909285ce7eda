//! A terminal playground for the fiddle layout engine: an overhead map view
//! with a movable player and camera, plus a small HUD laid out by
//! [`fiddle::Ui`].

/// Tile map, player and camera state.
pub mod game;
/// Per-frame widget tree.
pub mod hud;
/// Command line options.
pub mod options;
/// The frame loop.
pub mod play;
/// Terminal output and input.
pub mod term;

pub use options::PlayOptions;
