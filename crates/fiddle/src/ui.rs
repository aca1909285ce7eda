//! Immediate-mode builder.
//!
//! Callers rebuild the whole widget tree every frame between
//! [`Ui::begin_frame`] and [`Ui::end_frame`]. Widgets are appended to the
//! active parent, which is managed with [`Ui::push_parent`] and
//! [`Ui::pop_parent`]. Widget identity across frames comes from labels, so a
//! label must be unique among its siblings.

use std::collections::HashMap;

use crate::{
    Axis,
    cache::{CachedWidget, WidgetCache},
    error::{Error, Result},
    flags::WidgetFlags,
    geom::Expanse,
    id::NodeId,
    key::Key,
    layout,
    node::Widget,
    size::Size,
    tree::WidgetTree,
};

/// Label used for the root widget of every frame.
const ROOT_LABEL: &str = "###root";

/// Immediate-mode UI state: the per-frame arena plus the retained cache.
#[derive(Debug, Default)]
pub struct Ui {
    /// This frame's widgets.
    tree: WidgetTree,
    /// State retained across frames.
    cache: WidgetCache,
    /// Active parent stack. The bottom entry is the frame root.
    parents: Vec<NodeId>,
    /// Preferred size stacks, per axis.
    pref_sizes: [Vec<Size>; 2],
    /// Keys built this frame.
    keys: HashMap<Key, NodeId>,
    /// Current frame index, starting at 1 with the first frame.
    frame: u64,
    /// Viewport for this frame.
    viewport: Expanse,
}

impl Ui {
    /// Construct an empty UI.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new frame. The arena is reset and a root sized to the viewport
    /// becomes the active parent. The root stacks its children along Y.
    pub fn begin_frame(&mut self, viewport: Expanse) -> NodeId {
        self.frame += 1;
        self.viewport = viewport;
        self.tree.clear();
        self.parents.clear();
        self.keys.clear();
        for stack in &mut self.pref_sizes {
            stack.clear();
        }

        let key = Key::from_label(ROOT_LABEL);
        let root = self.tree.insert(
            Widget::with_key(key, ROOT_LABEL)
                .sizes(Size::px(viewport.w, 1.0), Size::px(viewport.h, 1.0))
                .layout_axis(Axis::Y),
        );
        self.tree.root = Some(root);
        self.keys.insert(key, root);
        self.cache.touch(key, self.frame);
        self.parents.push(root);
        root
    }

    /// Create a widget under the active parent.
    ///
    /// The widget's key is derived from `label`, seeded with the parent's key.
    /// Its semantic sizes come from the top of the preferred size stacks, or
    /// `Size::NULL` when a stack is empty.
    pub fn widget_make(&mut self, flags: WidgetFlags, label: &str) -> Result<NodeId> {
        let parent = self.current_parent()?;
        let key = Key::from_label_seeded(label, self.tree.get(parent)?.key);
        if !key.is_null() && self.keys.contains_key(&key) {
            return Err(Error::DuplicateKey(label.to_string()));
        }

        let widget = Widget::with_key(key, label)
            .flags(flags)
            .sizes(self.pref_size(Axis::X), self.pref_size(Axis::Y));
        let id = self.tree.add_child(parent, widget)?;
        if !key.is_null() {
            self.keys.insert(key, id);
            self.cache.touch(key, self.frame);
        }
        Ok(id)
    }

    /// Create a text widget sized to `content` on both axes.
    pub fn text(&mut self, label: &str, content: Expanse) -> Result<NodeId> {
        let id = self.widget_make(WidgetFlags::DRAW_TEXT, label)?;
        let node = self.tree.get_mut(id)?;
        node.content_size = content;
        node.semantic_size = [Size::text_content(1.0); 2];
        Ok(id)
    }

    /// Set the axis `id` stacks its children along.
    pub fn equip_child_layout_axis(&mut self, id: NodeId, axis: Axis) -> Result<NodeId> {
        self.tree.set_child_layout_axis(id, axis)?;
        Ok(id)
    }

    /// Override a widget's semantic size on one axis.
    pub fn set_size(&mut self, id: NodeId, axis: Axis, size: Size) -> Result<()> {
        self.tree.set_semantic_size(id, axis, size)
    }

    /// Set a widget's content hint.
    pub fn set_content_size(&mut self, id: NodeId, content: Expanse) -> Result<()> {
        self.tree.set_content_size(id, content)
    }

    /// Make `id` the active parent. Returns the previously active parent.
    pub fn push_parent(&mut self, id: NodeId) -> Result<Option<NodeId>> {
        self.tree.get(id)?;
        let previous = self.parents.last().copied();
        self.parents.push(id);
        Ok(previous)
    }

    /// Restore the previous parent. The frame root cannot be popped.
    pub fn pop_parent(&mut self) -> Result<NodeId> {
        if self.parents.len() <= 1 {
            return Err(Error::ParentStack("cannot pop the frame root".into()));
        }
        self.parents
            .pop()
            .ok_or_else(|| Error::ParentStack("empty".into()))
    }

    /// Run `f` with `id` as the active parent.
    pub fn with_parent<R>(
        &mut self,
        id: NodeId,
        f: impl FnOnce(&mut Self) -> Result<R>,
    ) -> Result<R> {
        self.push_parent(id)?;
        let ret = f(self);
        self.pop_parent()?;
        ret
    }

    /// Push a preferred size for widgets created from now on.
    pub fn push_size(&mut self, axis: Axis, size: Size) {
        self.pref_sizes[axis.index()].push(size);
    }

    /// Pop the most recent preferred size on an axis.
    pub fn pop_size(&mut self, axis: Axis) -> Option<Size> {
        self.pref_sizes[axis.index()].pop()
    }

    /// Finish the frame: lay out the tree, record results in the cache, and
    /// evict widgets that were not built this frame.
    ///
    /// On error the frame's layout is discarded and cached entries keep the
    /// previous frame's results.
    pub fn end_frame(&mut self) -> Result<()> {
        if self.parents.len() != 1 {
            return Err(Error::ParentStack(format!(
                "{} parent(s) still pushed at end of frame",
                self.parents.len().saturating_sub(1)
            )));
        }
        if let Err(e) = layout::layout(&mut self.tree, self.viewport) {
            tracing::warn!(frame = self.frame, error = %e, "layout failed");
            return Err(e);
        }
        for (_, widget) in self.tree.nodes.iter() {
            self.cache.record(widget);
        }
        self.cache.prune(self.frame);
        Ok(())
    }

    /// This frame's widget tree.
    pub fn tree(&self) -> &WidgetTree {
        &self.tree
    }

    /// The retained cache.
    pub fn cache(&self) -> &WidgetCache {
        &self.cache
    }

    /// The current frame index.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// This frame's root.
    pub fn root(&self) -> Option<NodeId> {
        self.tree.root()
    }

    /// Find a widget built this frame by key.
    pub fn widget(&self, key: Key) -> Option<NodeId> {
        self.keys.get(&key).copied()
    }

    /// Find a widget built this frame by key and return its node.
    pub fn node(&self, key: Key) -> Option<&Widget> {
        self.widget(key).and_then(|id| self.tree.node(id))
    }

    /// The cached state of a widget from the last successful layout.
    pub fn previous(&self, key: Key) -> Option<&CachedWidget> {
        self.cache.get(key)
    }

    /// The active parent.
    fn current_parent(&self) -> Result<NodeId> {
        self.parents
            .last()
            .copied()
            .ok_or_else(|| Error::ParentStack("no frame in progress".into()))
    }

    /// The preferred size on an axis.
    fn pref_size(&self, axis: Axis) -> Size {
        self.pref_sizes[axis.index()]
            .last()
            .copied()
            .unwrap_or(Size::NULL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widgets_attach_to_active_parent() -> Result<()> {
        let mut ui = Ui::new();
        let root = ui.begin_frame(Expanse::new(100.0, 100.0));
        let panel = ui.widget_make(WidgetFlags::empty(), "panel")?;
        let inner = ui.with_parent(panel, |ui| ui.widget_make(WidgetFlags::empty(), "inner"))?;
        let after = ui.widget_make(WidgetFlags::empty(), "after")?;
        assert_eq!(ui.tree().children(root), &[panel, after]);
        assert_eq!(ui.tree().parent(inner), Some(panel));
        ui.end_frame()
    }

    #[test]
    fn pref_sizes_apply() -> Result<()> {
        let mut ui = Ui::new();
        ui.begin_frame(Expanse::new(100.0, 100.0));
        ui.push_size(Axis::X, Size::pct(0.5, 0.0));
        ui.push_size(Axis::Y, Size::px(10.0, 1.0));
        let a = ui.widget_make(WidgetFlags::empty(), "a")?;
        assert_eq!(ui.pop_size(Axis::X), Some(Size::pct(0.5, 0.0)));
        let b = ui.widget_make(WidgetFlags::empty(), "b")?;
        ui.end_frame()?;
        let tree = ui.tree();
        assert_eq!(tree.get(a)?.computed_expanse(), Expanse::new(50.0, 10.0));
        assert_eq!(tree.get(b)?.semantic_size(Axis::X), Size::NULL);
        assert_eq!(tree.get(b)?.rect().tl.y, 10.0);
        Ok(())
    }

    #[test]
    fn duplicate_sibling_labels_rejected() -> Result<()> {
        let mut ui = Ui::new();
        ui.begin_frame(Expanse::new(10.0, 10.0));
        ui.widget_make(WidgetFlags::empty(), "ok")?;
        assert_eq!(
            ui.widget_make(WidgetFlags::empty(), "ok"),
            Err(Error::DuplicateKey("ok".into()))
        );
        // Anonymous widgets never collide.
        ui.widget_make(WidgetFlags::empty(), "")?;
        ui.widget_make(WidgetFlags::empty(), "")?;
        Ok(())
    }

    #[test]
    fn same_label_under_different_parents() -> Result<()> {
        let mut ui = Ui::new();
        ui.begin_frame(Expanse::new(10.0, 10.0));
        let a = ui.widget_make(WidgetFlags::empty(), "a")?;
        let b = ui.widget_make(WidgetFlags::empty(), "b")?;
        ui.with_parent(a, |ui| ui.widget_make(WidgetFlags::BUTTON, "ok"))?;
        ui.with_parent(b, |ui| ui.widget_make(WidgetFlags::BUTTON, "ok"))?;
        ui.end_frame()
    }

    #[test]
    fn parent_stack_misuse() -> Result<()> {
        let mut ui = Ui::new();
        assert!(matches!(
            ui.widget_make(WidgetFlags::empty(), "early"),
            Err(Error::ParentStack(_))
        ));
        ui.begin_frame(Expanse::new(10.0, 10.0));
        assert!(matches!(ui.pop_parent(), Err(Error::ParentStack(_))));
        let a = ui.widget_make(WidgetFlags::empty(), "a")?;
        ui.push_parent(a)?;
        assert!(matches!(ui.end_frame(), Err(Error::ParentStack(_))));
        assert_eq!(ui.pop_parent()?, a);
        ui.end_frame()
    }

    #[test]
    fn cache_tracks_frames() -> Result<()> {
        let mut ui = Ui::new();
        ui.begin_frame(Expanse::new(100.0, 100.0));
        ui.push_size(Axis::X, Size::px(20.0, 1.0));
        ui.widget_make(WidgetFlags::empty(), "stays")?;
        ui.widget_make(WidgetFlags::empty(), "goes")?;
        ui.end_frame()?;

        let root_key = Key::from_label(ROOT_LABEL);
        let stays = Key::from_label_seeded("stays", root_key);
        let goes = Key::from_label_seeded("goes", root_key);
        assert_eq!(ui.previous(goes).map(|c| c.size(Axis::X)), Some(20.0));

        ui.begin_frame(Expanse::new(100.0, 100.0));
        ui.widget_make(WidgetFlags::empty(), "stays")?;
        ui.end_frame()?;
        assert!(ui.previous(goes).is_none());
        let cached = ui.previous(stays).expect("stays cached");
        assert_eq!(cached.first_frame_touched, 1);
        assert_eq!(cached.last_frame_touched, 2);
        assert!(ui.node(stays).is_some());
        Ok(())
    }

    #[test]
    fn failed_layout_keeps_previous_results() -> Result<()> {
        let mut ui = Ui::new();
        ui.begin_frame(Expanse::new(100.0, 100.0));
        ui.push_size(Axis::X, Size::px(30.0, 1.0));
        let panel = ui.widget_make(WidgetFlags::empty(), "panel")?;
        ui.end_frame()?;
        let key = ui.tree().get(panel)?.key();

        ui.begin_frame(Expanse::new(100.0, 100.0));
        ui.push_size(Axis::X, Size::children_sum(1.0));
        let panel = ui.widget_make(WidgetFlags::empty(), "panel")?;
        ui.pop_size(Axis::X);
        ui.push_size(Axis::X, Size::pct(1.0, 0.0));
        ui.with_parent(panel, |ui| ui.widget_make(WidgetFlags::empty(), "child"))?;
        assert!(matches!(
            ui.end_frame(),
            Err(Error::StructuralCycle { .. })
        ));
        assert_eq!(ui.previous(key).map(|c| c.size(Axis::X)), Some(30.0));
        Ok(())
    }
}
