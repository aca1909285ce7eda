//! Retained per-key widget state.
//!
//! The arena is rebuilt every frame, so anything that has to survive between
//! frames lives here, keyed by the widget's stable [`Key`]. The cache is a
//! record of what happened on earlier frames; it is never an input to sizing.

use std::collections::HashMap;

use crate::{Axis, geom::Rect, key::Key, node::Widget};

/// Last known state of a widget.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedWidget {
    /// Widget identity.
    pub key: Key,
    /// Frame in which the widget first appeared.
    pub first_frame_touched: u64,
    /// Most recent frame in which the widget was built.
    pub last_frame_touched: u64,
    /// Computed size from the most recent successful layout.
    pub computed_size: [f32; 2],
    /// Computed relative position from the most recent successful layout.
    pub computed_rel_position: [f32; 2],
    /// Screen rect from the most recent successful layout.
    pub rect: Rect,
}

impl CachedWidget {
    /// A fresh entry with no layout yet.
    fn new(key: Key, frame: u64) -> Self {
        Self {
            key,
            first_frame_touched: frame,
            last_frame_touched: frame,
            computed_size: [0.0; 2],
            computed_rel_position: [0.0; 2],
            rect: Rect::zero(),
        }
    }

    /// Computed size on one axis.
    pub fn size(&self, axis: Axis) -> f32 {
        self.computed_size[axis.index()]
    }
}

/// Map from widget key to the widget's last known state.
#[derive(Debug, Default)]
pub struct WidgetCache {
    /// Entries by key.
    entries: HashMap<Key, CachedWidget>,
}

impl WidgetCache {
    /// Construct an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached widgets.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Mark a key as built in `frame`, creating its entry if needed. Null keys
    /// are not cached.
    pub fn touch(&mut self, key: Key, frame: u64) -> Option<&mut CachedWidget> {
        if key.is_null() {
            return None;
        }
        let entry = self
            .entries
            .entry(key)
            .or_insert_with(|| CachedWidget::new(key, frame));
        entry.last_frame_touched = frame;
        Some(entry)
    }

    /// Copy a widget's layout output into its entry, if it has one.
    pub fn record(&mut self, widget: &Widget) {
        if let Some(entry) = self.entries.get_mut(&widget.key) {
            entry.computed_size = widget.computed_size;
            entry.computed_rel_position = widget.computed_rel_position;
            entry.rect = widget.rect;
        }
    }

    /// Look up a key.
    pub fn get(&self, key: Key) -> Option<&CachedWidget> {
        self.entries.get(&key)
    }

    /// Evict every entry not touched in `frame`. Returns the number evicted.
    pub fn prune(&mut self, frame: u64) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, e| e.last_frame_touched >= frame);
        let evicted = before - self.entries.len();
        if evicted > 0 {
            tracing::trace!(evicted, frame, "pruned widget cache");
        }
        evicted
    }
}
