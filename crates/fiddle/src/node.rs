use crate::{
    Axis,
    flags::WidgetFlags,
    geom::{Expanse, Rect},
    id::NodeId,
    key::{self, Key},
    size::Size,
};

/// One rectangle in the layout tree, stored in the arena.
///
/// Holds both the builder's input (semantic sizes, layout axis, content hint)
/// and the layout engine's output (computed sizes, relative positions, screen
/// rect). Outputs are overwritten on every successful layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Widget {
    /// Stable identity.
    pub(crate) key: Key,
    /// Behaviour flags.
    pub(crate) flags: WidgetFlags,
    /// Full label, including any hidden `##` suffix.
    pub(crate) label: String,

    /// Parent in the arena tree.
    pub(crate) parent: Option<NodeId>,
    /// Children in the arena tree, in layout order.
    pub(crate) children: Vec<NodeId>,

    /// Semantic size per axis.
    pub(crate) semantic_size: [Size; 2],
    /// Axis along which children are stacked.
    pub(crate) child_layout_axis: Axis,
    /// Intrinsic content size, used by `SizeKind::TextContent`.
    pub(crate) content_size: Expanse,

    /// Computed position relative to the parent, per axis.
    pub(crate) computed_rel_position: [f32; 2],
    /// Computed size in pixels, per axis.
    pub(crate) computed_size: [f32; 2],
    /// Final screen-space rectangle.
    pub(crate) rect: Rect,
}

impl Widget {
    /// Construct a detached widget whose key is derived from `label`.
    pub fn new(label: impl Into<String>) -> Self {
        let label = label.into();
        Self::with_key(Key::from_label(&label), label)
    }

    /// Construct a detached widget with an explicit key.
    pub fn with_key(key: Key, label: impl Into<String>) -> Self {
        Self {
            key,
            flags: WidgetFlags::empty(),
            label: label.into(),
            parent: None,
            children: Vec::new(),
            semantic_size: [Size::NULL; 2],
            child_layout_axis: Axis::X,
            content_size: Expanse::default(),
            computed_rel_position: [0.0; 2],
            computed_size: [0.0; 2],
            rect: Rect::zero(),
        }
    }

    /// Set the semantic size on one axis.
    pub fn size(mut self, axis: Axis, size: Size) -> Self {
        self.semantic_size[axis.index()] = size;
        self
    }

    /// Set the semantic size on both axes.
    pub fn sizes(mut self, x: Size, y: Size) -> Self {
        self.semantic_size = [x, y];
        self
    }

    /// Set the axis children are stacked along.
    pub fn layout_axis(mut self, axis: Axis) -> Self {
        self.child_layout_axis = axis;
        self
    }

    /// Set the content hint.
    pub fn content(mut self, content: Expanse) -> Self {
        self.content_size = content;
        self
    }

    /// Set the behaviour flags.
    pub fn flags(mut self, flags: WidgetFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Return the widget's key.
    pub fn key(&self) -> Key {
        self.key
    }

    /// Return the widget's flags.
    pub fn widget_flags(&self) -> WidgetFlags {
        self.flags
    }

    /// Return the full label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Return the part of the label meant for display.
    pub fn display_text(&self) -> &str {
        key::display_text(&self.label)
    }

    /// Return the widget's parent, if any.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Return the widget's children.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Return the semantic size on an axis.
    pub fn semantic_size(&self, axis: Axis) -> Size {
        self.semantic_size[axis.index()]
    }

    /// Return the child layout axis.
    pub fn child_layout_axis(&self) -> Axis {
        self.child_layout_axis
    }

    /// Return the content hint.
    pub fn content_size(&self) -> Expanse {
        self.content_size
    }

    /// Return the computed size on an axis.
    pub fn computed_size(&self, axis: Axis) -> f32 {
        self.computed_size[axis.index()]
    }

    /// Return the computed position relative to the parent on an axis.
    pub fn computed_rel_position(&self, axis: Axis) -> f32 {
        self.computed_rel_position[axis.index()]
    }

    /// Return the computed size on both axes.
    pub fn computed_expanse(&self) -> Expanse {
        Expanse::new(self.computed_size[0], self.computed_size[1])
    }

    /// Return the final screen-space rectangle.
    pub fn rect(&self) -> Rect {
        self.rect
    }
}
