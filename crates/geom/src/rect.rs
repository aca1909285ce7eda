use super::{Expanse, Point};

/// A rectangle in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Top-left corner.
    pub tl: Point,
    /// Width.
    pub w: f32,
    /// Height.
    pub h: f32,
}

impl Rect {
    /// Construct a new rectangle.
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            tl: Point { x, y },
            w,
            h,
        }
    }

    /// A zero-sized rectangle at the origin.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Build a rectangle from a corner and a size.
    pub fn from_parts(tl: Point, size: Expanse) -> Self {
        Self {
            tl,
            w: size.w,
            h: size.h,
        }
    }

    /// The size of this rectangle.
    pub fn expanse(&self) -> Expanse {
        Expanse::new(self.w, self.h)
    }

    /// The bottom-right corner (exclusive).
    pub fn br(&self) -> Point {
        Point {
            x: self.tl.x + self.w,
            y: self.tl.y + self.h,
        }
    }

    /// The overlapping region of two rectangles, if any.
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        let (a, b) = (self.br(), other.br());
        let tl = Point::new(self.tl.x.max(other.tl.x), self.tl.y.max(other.tl.y));
        let br = Point::new(a.x.min(b.x), a.y.min(b.y));
        if br.x <= tl.x || br.y <= tl.y {
            None
        } else {
            Some(Self::new(tl.x, tl.y, br.x - tl.x, br.y - tl.y))
        }
    }
}
