//! Fiddle: an immediate-mode UI autolayout engine.
//!
//! A widget tree is rebuilt every frame into an arena ([`WidgetTree`]). Each
//! widget carries a semantic size per axis ([`Size`]), and the layout engine
//! ([`layout`]) resolves those into pixel sizes and parent-relative positions
//! in five explicit tree walks. A persistent [`WidgetCache`] keyed by stable
//! [`Key`]s keeps the previous frame's results around for callers that want
//! them.
//!
//! # Quick Start
//!
//! The main entry points are:
//! - [`Ui`] - The immediate-mode builder
//! - [`WidgetTree`] - The per-frame arena, usable on its own
//! - [`layout::layout`] - Resolve both axes and compute screen rects

#![warn(missing_docs)]

/// Retained per-key widget state.
pub mod cache;
/// Debug dump utilities.
pub mod dump;
/// Core error types.
pub mod error;
/// Widget behaviour flags.
pub mod flags;
/// Node ID types.
pub mod id;
/// Stable widget keys.
pub mod key;
/// The autolayout engine.
pub mod layout;
/// Widget node data.
pub mod node;
/// Semantic sizes.
pub mod size;
/// Widget arena.
pub mod tree;
/// Immediate-mode builder.
pub mod ui;

pub use cache::{CachedWidget, WidgetCache};
pub use error::{Error, Result};
pub use flags::WidgetFlags;
pub use geom;
pub use geom::{Axis, Expanse, Point, Rect};
pub use id::NodeId;
pub use key::Key;
pub use node::Widget;
pub use size::{Size, SizeKind};
pub use tree::WidgetTree;
pub use ui::Ui;
