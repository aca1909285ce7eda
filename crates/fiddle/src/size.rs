/// How a widget wants to be sized along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SizeKind {
    /// Size not needed; resolves to zero.
    #[default]
    Null,
    /// Size given directly in pixels by `value`.
    Pixels,
    /// Size fits the widget's content hint.
    TextContent,
    /// Size is `value` (a fraction, nominally 0..=1) of the parent's size on
    /// the same axis.
    PercentOfParent,
    /// Size is the sum of the children's sizes along the widget's layout
    /// axis, or their maximum on the cross axis.
    ChildrenSum,
}

/// A declarative sizing request on one axis.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    /// Sizing kind.
    pub kind: SizeKind,
    /// Pixel count or fraction, depending on `kind`.
    pub value: f32,
    /// Fraction of the computed size that may not be given up when the
    /// parent overflows. 0 is fully negotiable, 1 never shrinks.
    pub strictness: f32,
}

impl Size {
    /// A size that is not needed.
    pub const NULL: Self = Self {
        kind: SizeKind::Null,
        value: 0.0,
        strictness: 0.0,
    };

    /// A fixed pixel size.
    pub fn px(value: f32, strictness: f32) -> Self {
        Self {
            kind: SizeKind::Pixels,
            value,
            strictness,
        }
    }

    /// Fit the content hint.
    pub fn text_content(strictness: f32) -> Self {
        Self {
            kind: SizeKind::TextContent,
            value: 0.0,
            strictness,
        }
    }

    /// A fraction of the parent's size.
    pub fn pct(value: f32, strictness: f32) -> Self {
        Self {
            kind: SizeKind::PercentOfParent,
            value,
            strictness,
        }
    }

    /// The sum of the children's sizes.
    pub fn children_sum(strictness: f32) -> Self {
        Self {
            kind: SizeKind::ChildrenSum,
            value: 0.0,
            strictness,
        }
    }

    /// Strictness clamped to `[0, 1]`. NaN counts as fully negotiable.
    pub fn clamped_strictness(&self) -> f32 {
        if self.strictness.is_nan() {
            0.0
        } else {
            self.strictness.clamp(0.0, 1.0)
        }
    }
}
