//! Geometry primitives used by the fiddle layout engine.
//!
//! All coordinates are `f32` pixels. Sizes are never negative once they leave
//! the layout engine, but the types themselves do not enforce it.

/// Layout axes.
mod axis;
/// Width/height size type.
mod expanse;
/// Point helpers.
mod point;
/// Rectangle operations.
mod rect;

pub use axis::Axis;
pub use expanse::Expanse;
pub use point::Point;
pub use rect::Rect;
