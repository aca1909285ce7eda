use bitflags::bitflags;

use crate::Axis;

bitflags! {
    /// Per-widget behaviour flags set by builders.
    ///
    /// Only the view-scroll flags affect layout: a parent that scrolls on an
    /// axis is allowed to have children overflow it on that axis. The rest
    /// are carried for renderers and input handling.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct WidgetFlags: u32 {
        /// Widget responds to clicks.
        const CLICKABLE = 1 << 0;
        /// Widget scrolls its content horizontally.
        const VIEW_SCROLL_X = 1 << 1;
        /// Widget scrolls its content vertically.
        const VIEW_SCROLL_Y = 1 << 2;
        /// Draw the widget's display text.
        const DRAW_TEXT = 1 << 3;
        /// Draw a border.
        const DRAW_BORDER = 1 << 4;
        /// Fill the background.
        const DRAW_BACKGROUND = 1 << 5;
        /// Draw a drop shadow.
        const DRAW_DROP_SHADOW = 1 << 6;
        /// Clip children to the widget's rect.
        const CLIP = 1 << 7;
        /// Animate the hot (hovered) state.
        const HOT_ANIMATION = 1 << 8;
        /// Animate the active (pressed) state.
        const ACTIVE_ANIMATION = 1 << 9;

        /// Scroll on both axes.
        const VIEW_SCROLL = Self::VIEW_SCROLL_X.bits() | Self::VIEW_SCROLL_Y.bits();
        /// The usual flag set for a button.
        const BUTTON = Self::CLICKABLE.bits()
            | Self::DRAW_BORDER.bits()
            | Self::DRAW_TEXT.bits()
            | Self::DRAW_BACKGROUND.bits()
            | Self::HOT_ANIMATION.bits()
            | Self::ACTIVE_ANIMATION.bits();
    }
}

impl WidgetFlags {
    /// Are children allowed to overflow this widget along `axis`?
    pub fn allows_overflow(&self, axis: Axis) -> bool {
        match axis {
            Axis::X => self.contains(Self::VIEW_SCROLL_X),
            Axis::Y => self.contains(Self::VIEW_SCROLL_Y),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overflow_per_axis() {
        let f = WidgetFlags::VIEW_SCROLL_Y | WidgetFlags::CLIP;
        assert!(!f.allows_overflow(Axis::X));
        assert!(f.allows_overflow(Axis::Y));
        assert!(WidgetFlags::VIEW_SCROLL.allows_overflow(Axis::X));
        assert!(!WidgetFlags::BUTTON.allows_overflow(Axis::Y));
    }
}
