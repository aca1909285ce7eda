//! The per-frame widget arena.

use std::collections::HashSet;

use slotmap::SlotMap;

use crate::{
    Axis,
    error::{Error, Result},
    geom::Expanse,
    id::NodeId,
    node::Widget,
    size::Size,
};

/// Arena of widgets linked into a single rooted tree.
///
/// Widgets refer to each other through [`NodeId`] handles, so the arena owns
/// every node and the tree can be walked in both directions without shared
/// ownership.
#[derive(Debug, Default, Clone)]
pub struct WidgetTree {
    /// Node storage arena.
    pub(crate) nodes: SlotMap<NodeId, Widget>,
    /// Root node ID.
    pub(crate) root: Option<NodeId>,
}

impl WidgetTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every node. Handles from before the call are invalidated.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
    }

    /// Number of nodes in the arena, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if the arena holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Return the root node, if one has been set.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Make a parentless node the root.
    pub fn set_root(&mut self, id: NodeId) -> Result<()> {
        let node = self.get(id)?;
        if node.parent.is_some() {
            return Err(Error::AlreadyAttached(id));
        }
        self.root = Some(id);
        Ok(())
    }

    /// Insert a detached widget. Any tree links on the widget are discarded.
    pub fn insert(&mut self, mut widget: Widget) -> NodeId {
        widget.parent = None;
        widget.children.clear();
        self.nodes.insert(widget)
    }

    /// Insert a widget and append it to `parent`'s children.
    pub fn add_child(&mut self, parent: NodeId, widget: Widget) -> Result<NodeId> {
        self.get(parent)?;
        let child = self.insert(widget);
        self.attach(parent, child)?;
        Ok(child)
    }

    /// Append a detached node to `parent`'s children.
    pub fn attach(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.get(parent)?;
        if self.get(child)?.parent.is_some() {
            return Err(Error::AlreadyAttached(child));
        }
        if self.root == Some(child) || parent == child || self.is_ancestor(child, parent) {
            return Err(Error::WouldCreateCycle { parent, child });
        }
        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.push(child);
        }
        Ok(())
    }

    /// Return a node.
    pub fn node(&self, id: NodeId) -> Option<&Widget> {
        self.nodes.get(id)
    }

    /// Return a node mutably.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Widget> {
        self.nodes.get_mut(id)
    }

    /// Return a node, or a `NodeNotFound` error.
    pub fn get(&self, id: NodeId) -> Result<&Widget> {
        self.nodes.get(id).ok_or(Error::NodeNotFound(id))
    }

    /// Return a node mutably, or a `NodeNotFound` error.
    pub fn get_mut(&mut self, id: NodeId) -> Result<&mut Widget> {
        self.nodes.get_mut(id).ok_or(Error::NodeNotFound(id))
    }

    /// Return a node's parent.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|n| n.parent)
    }

    /// Return a node's children, or an empty slice for unknown nodes.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// The sibling after `id` in its parent's child list.
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let siblings = self.children(self.parent(id)?);
        let i = siblings.iter().position(|c| *c == id)?;
        siblings.get(i + 1).copied()
    }

    /// The sibling before `id` in its parent's child list.
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        let siblings = self.children(self.parent(id)?);
        let i = siblings.iter().position(|c| *c == id)?;
        i.checked_sub(1).and_then(|i| siblings.get(i).copied())
    }

    /// Set a node's semantic size on one axis.
    pub fn set_semantic_size(&mut self, id: NodeId, axis: Axis, size: Size) -> Result<()> {
        self.get_mut(id)?.semantic_size[axis.index()] = size;
        Ok(())
    }

    /// Set a node's content hint.
    pub fn set_content_size(&mut self, id: NodeId, content: Expanse) -> Result<()> {
        self.get_mut(id)?.content_size = content;
        Ok(())
    }

    /// Set the axis a node stacks its children along.
    pub fn set_child_layout_axis(&mut self, id: NodeId, axis: Axis) -> Result<()> {
        self.get_mut(id)?.child_layout_axis = axis;
        Ok(())
    }

    /// Return true if `ancestor` appears in the parent chain of `node`.
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes.get(id).and_then(|n| n.parent);
        }
        false
    }

    /// Collect a subtree in pre-order (parents before children), including the root.
    pub fn pre_order(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(node_id) = stack.pop() {
            let Some(node) = self.nodes.get(node_id) else {
                continue;
            };
            out.push(node_id);
            for child in node.children.iter().rev() {
                stack.push(*child);
            }
        }
        out
    }

    /// Collect a subtree in post-order (children before parents), including the root.
    pub fn post_order(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![(root, false)];
        while let Some((node_id, visited)) = stack.pop() {
            let Some(node) = self.nodes.get(node_id) else {
                continue;
            };
            if visited {
                out.push(node_id);
                continue;
            }
            stack.push((node_id, true));
            for child in node.children.iter().rev() {
                stack.push((*child, false));
            }
        }
        out
    }

    /// Check that the tree is rooted and that every link reachable from the
    /// root is present and consistent. Returns the root on success.
    pub fn validate(&self) -> Result<NodeId> {
        let root = self
            .root
            .ok_or_else(|| Error::Malformed("no root".into()))?;
        let root_node = self.get(root)?;
        if root_node.parent.is_some() {
            return Err(Error::Malformed(format!("root {root:?} has a parent")));
        }

        let mut seen = HashSet::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if !seen.insert(id) {
                return Err(Error::Malformed(format!("{id:?} reached twice")));
            }
            let node = self.get(id)?;
            for child in &node.children {
                let child_node = self
                    .nodes
                    .get(*child)
                    .ok_or_else(|| Error::Malformed(format!("child {child:?} missing")))?;
                if child_node.parent != Some(id) {
                    return Err(Error::Malformed(format!(
                        "child {child:?} parent mismatch under {id:?}"
                    )));
                }
                stack.push(*child);
            }
        }
        Ok(root)
    }
}
