//! The autolayout engine.
//!
//! Layout runs once per axis, in five explicit walks over the tree:
//!
//! 1. standalone sizes (pixels, text content), any order
//! 2. upward-dependent sizes (percent of parent), pre-order
//! 3. downward-dependent sizes (children sum), post-order
//! 4. violation resolution, pre-order
//! 5. relative positions, pre-order
//!
//! Each walk reads the tree and writes into an [`AxisSolve`] scratch buffer.
//! The buffer is copied onto the tree only once every pass has succeeded, so a
//! failed resolve never leaves partial output behind.

use slotmap::SecondaryMap;

use crate::{
    Axis,
    error::Result,
    geom::{Expanse, Point, Rect},
    id::NodeId,
    tree::WidgetTree,
};

/// Relative position resolution.
mod position;
/// The three sizing passes.
mod sizing;
/// Overflow resolution.
mod violations;

/// Scratch results for one axis.
#[derive(Debug, Clone)]
pub struct AxisSolve {
    /// Axis being resolved.
    pub(super) axis: Axis,
    /// Root of the solved tree.
    pub(super) root: NodeId,
    /// Size the root resolves percentages against.
    pub(super) top_level: f32,
    /// Nodes reachable from the root, parents first.
    pub(super) pre_order: Vec<NodeId>,
    /// Nodes reachable from the root, children first.
    pub(super) post_order: Vec<NodeId>,
    /// Resolved sizes. A missing entry is a size not yet resolved.
    pub(super) sizes: SecondaryMap<NodeId, f32>,
    /// Resolved positions relative to the parent.
    pub(super) positions: SecondaryMap<NodeId, f32>,
}

impl AxisSolve {
    /// Prepare an empty solve over a validated tree.
    fn new(tree: &WidgetTree, axis: Axis, top_level: f32) -> Result<Self> {
        let root = tree.validate()?;
        Ok(Self {
            axis,
            root,
            top_level,
            pre_order: tree.pre_order(root),
            post_order: tree.post_order(root),
            sizes: SecondaryMap::new(),
            positions: SecondaryMap::new(),
        })
    }

    /// The axis this solve covers.
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// The resolved size of a node, if resolved.
    pub fn size(&self, id: NodeId) -> Option<f32> {
        self.sizes.get(id).copied()
    }

    /// The resolved parent-relative position of a node, if resolved.
    pub fn position(&self, id: NodeId) -> Option<f32> {
        self.positions.get(id).copied()
    }

    /// Size of a node, treating unresolved as zero.
    fn size_or_zero(&self, id: NodeId) -> f32 {
        self.size(id).unwrap_or(0.0)
    }

    /// Write sizes and positions onto the tree.
    pub fn commit(&self, tree: &mut WidgetTree) {
        let i = self.axis.index();
        for &id in &self.pre_order {
            let size = self.size_or_zero(id);
            let position = self.position(id).unwrap_or(0.0);
            if let Some(node) = tree.node_mut(id) {
                node.computed_size[i] = size;
                node.computed_rel_position[i] = position;
            }
        }
    }
}

/// Clamp a size to be finite and non-negative. NaN and infinities become zero.
fn non_negative(v: f32) -> f32 {
    if v.is_finite() { v.max(0.0) } else { 0.0 }
}

/// Run all passes for one axis without touching the tree.
///
/// `top_level` is the size a percent-of-parent root resolves against, usually
/// the viewport extent on `axis`.
pub fn solve_axis(tree: &WidgetTree, axis: Axis, top_level: f32) -> Result<AxisSolve> {
    let mut solve = AxisSolve::new(tree, axis, top_level)?;
    sizing::standalone_sizes(tree, &mut solve);
    sizing::upward_dependent_sizes(tree, &mut solve);
    sizing::downward_dependent_sizes(tree, &mut solve)?;
    violations::solve_violations(tree, &mut solve);
    position::relative_positions(tree, &mut solve);
    tracing::trace!(%axis, nodes = solve.pre_order.len(), "axis solved");
    Ok(solve)
}

/// Resolve one axis and write the results onto the tree.
pub fn resolve(tree: &mut WidgetTree, axis: Axis, top_level: f32) -> Result<()> {
    let solve = solve_axis(tree, axis, top_level)?;
    solve.commit(tree);
    Ok(())
}

/// Resolve X then Y against a viewport, then compute screen rects.
///
/// Content hints are read as they are when the call starts; callers whose
/// height hints depend on the resolved width should lay out X with
/// [`resolve`] first, update the hints, then call this.
pub fn layout(tree: &mut WidgetTree, viewport: Expanse) -> Result<()> {
    let mut solves = Vec::with_capacity(Axis::ALL.len());
    for axis in Axis::ALL {
        solves.push(solve_axis(tree, axis, viewport.get(axis))?);
    }
    for solve in &solves {
        solve.commit(tree);
    }
    compute_rects(tree)
}

/// Compute each node's screen rect from its parent's rect and its computed
/// relative position and size.
pub fn compute_rects(tree: &mut WidgetTree) -> Result<()> {
    let root = tree.validate()?;
    for id in tree.pre_order(root) {
        let origin = tree
            .parent(id)
            .and_then(|p| tree.node(p))
            .map(|p| p.rect.tl)
            .unwrap_or_default();
        let node = tree.get_mut(id)?;
        let rel = Point::new(node.computed_rel_position[0], node.computed_rel_position[1]);
        node.rect = Rect::from_parts(origin + rel, node.computed_expanse());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, node::Widget, size::Size};

    /// Build a root with the given size on X and a null size on Y, laying out
    /// along X.
    fn row(root_x: Size) -> Result<(WidgetTree, NodeId)> {
        let mut tree = WidgetTree::new();
        let root = tree.insert(Widget::new("root").size(Axis::X, root_x));
        tree.set_root(root)?;
        Ok((tree, root))
    }

    fn sized(label: &str, x: Size) -> Widget {
        Widget::new(label).size(Axis::X, x)
    }

    #[test]
    fn fixed_pixels() -> Result<()> {
        let (mut tree, root) = row(Size::px(300.0, 1.0))?;
        let a = tree.add_child(root, sized("a", Size::px(40.0, 0.0)))?;
        let b = tree.add_child(a, sized("b", Size::px(25.0, 0.0)))?;
        resolve(&mut tree, Axis::X, 1000.0)?;
        assert_eq!(tree.get(root)?.computed_size(Axis::X), 300.0);
        assert_eq!(tree.get(a)?.computed_size(Axis::X), 40.0);
        assert_eq!(tree.get(b)?.computed_size(Axis::X), 25.0);
        Ok(())
    }

    #[test]
    fn negative_pixels_clamp() -> Result<()> {
        let (mut tree, root) = row(Size::px(-5.0, 1.0))?;
        resolve(&mut tree, Axis::X, 100.0)?;
        assert_eq!(tree.get(root)?.computed_size(Axis::X), 0.0);
        Ok(())
    }

    #[test]
    fn text_content_uses_hint() -> Result<()> {
        let (mut tree, root) = row(Size::px(100.0, 1.0))?;
        let t = tree.add_child(
            root,
            sized("t", Size::text_content(1.0)).content(Expanse::new(42.0, 7.0)),
        )?;
        tree.set_semantic_size(t, Axis::Y, Size::text_content(1.0))?;
        layout(&mut tree, Expanse::new(100.0, 100.0))?;
        assert_eq!(tree.get(t)?.computed_expanse(), Expanse::new(42.0, 7.0));
        Ok(())
    }

    #[test]
    fn percent_of_parent() -> Result<()> {
        let (mut tree, root) = row(Size::px(200.0, 1.0))?;
        let a = tree.add_child(root, sized("a", Size::pct(0.25, 0.0)))?;
        let b = tree.add_child(a, sized("b", Size::pct(0.5, 0.0)))?;
        resolve(&mut tree, Axis::X, 1000.0)?;
        assert_eq!(tree.get(a)?.computed_size(Axis::X), 50.0);
        assert_eq!(tree.get(b)?.computed_size(Axis::X), 25.0);
        Ok(())
    }

    #[test]
    fn percent_root_uses_top_level() -> Result<()> {
        let (mut tree, root) = row(Size::pct(0.5, 1.0))?;
        resolve(&mut tree, Axis::X, 640.0)?;
        assert_eq!(tree.get(root)?.computed_size(Axis::X), 320.0);
        Ok(())
    }

    #[test]
    fn children_sum_along_and_across() -> Result<()> {
        let (mut tree, root) = row(Size::children_sum(1.0))?;
        tree.set_semantic_size(root, Axis::Y, Size::children_sum(1.0))?;
        let a = tree.add_child(
            root,
            Widget::new("a").sizes(Size::px(30.0, 0.0), Size::px(10.0, 0.0)),
        )?;
        tree.add_child(
            root,
            Widget::new("b").sizes(Size::px(20.0, 0.0), Size::px(15.0, 0.0)),
        )?;
        layout(&mut tree, Expanse::new(500.0, 500.0))?;
        let r = tree.get(root)?;
        assert_eq!(r.computed_size(Axis::X), 50.0);
        assert_eq!(r.computed_size(Axis::Y), 15.0);
        assert_eq!(tree.get(a)?.computed_size(Axis::Y), 10.0);
        Ok(())
    }

    #[test]
    fn overflow_split_evenly() -> Result<()> {
        let (mut tree, root) = row(Size::px(100.0, 1.0))?;
        let a = tree.add_child(root, sized("a", Size::px(60.0, 0.0)))?;
        let b = tree.add_child(root, sized("b", Size::px(60.0, 0.0)))?;
        resolve(&mut tree, Axis::X, 100.0)?;
        assert_eq!(tree.get(a)?.computed_size(Axis::X), 50.0);
        assert_eq!(tree.get(b)?.computed_size(Axis::X), 50.0);
        assert_eq!(tree.get(b)?.computed_rel_position(Axis::X), 50.0);
        Ok(())
    }

    #[test]
    fn strict_child_keeps_size() -> Result<()> {
        let (mut tree, root) = row(Size::px(100.0, 1.0))?;
        let a = tree.add_child(root, sized("a", Size::px(60.0, 1.0)))?;
        let b = tree.add_child(root, sized("b", Size::px(60.0, 0.0)))?;
        resolve(&mut tree, Axis::X, 100.0)?;
        assert_eq!(tree.get(a)?.computed_size(Axis::X), 60.0);
        assert_eq!(tree.get(b)?.computed_size(Axis::X), 40.0);
        Ok(())
    }

    #[test]
    fn overflow_clamps_at_zero() -> Result<()> {
        let (mut tree, root) = row(Size::px(10.0, 1.0))?;
        let a = tree.add_child(root, sized("a", Size::px(60.0, 1.0)))?;
        let b = tree.add_child(root, sized("b", Size::px(20.0, 0.0)))?;
        resolve(&mut tree, Axis::X, 100.0)?;
        assert_eq!(tree.get(a)?.computed_size(Axis::X), 60.0);
        assert_eq!(tree.get(b)?.computed_size(Axis::X), 0.0);
        Ok(())
    }

    #[test]
    fn strictness_floor_holds_along_axis() -> Result<()> {
        let (mut tree, root) = row(Size::px(0.0, 1.0))?;
        let a = tree.add_child(root, sized("a", Size::px(100.0, 0.99)))?;
        let b = tree.add_child(root, sized("b", Size::px(1.0, 0.0)))?;
        resolve(&mut tree, Axis::X, 100.0)?;
        assert!(tree.get(a)?.computed_size(Axis::X) >= 99.0 - 1e-3);
        assert_eq!(tree.get(b)?.computed_size(Axis::X), 0.0);
        Ok(())
    }

    #[test]
    fn non_finite_sizes_resolve_to_zero() -> Result<()> {
        let (mut tree, root) = row(Size::px(100.0, 1.0))?;
        let a = tree.add_child(root, sized("a", Size::px(f32::INFINITY, 0.0)))?;
        let b = tree.add_child(root, sized("b", Size::px(f32::NAN, 0.0)))?;
        let c = tree.add_child(root, sized("c", Size::px(20.0, 0.0)))?;
        let d = tree.add_child(root, sized("d", Size::pct(f32::INFINITY, 0.0)))?;
        resolve(&mut tree, Axis::X, 100.0)?;
        assert_eq!(tree.get(a)?.computed_size(Axis::X), 0.0);
        assert_eq!(tree.get(b)?.computed_size(Axis::X), 0.0);
        assert_eq!(tree.get(c)?.computed_size(Axis::X), 20.0);
        assert_eq!(tree.get(d)?.computed_size(Axis::X), 0.0);
        assert_eq!(tree.get(d)?.computed_rel_position(Axis::X), 20.0);
        Ok(())
    }

    #[test]
    fn all_strict_overflow_left_alone() -> Result<()> {
        let (mut tree, root) = row(Size::px(100.0, 1.0))?;
        let a = tree.add_child(root, sized("a", Size::px(70.0, 1.0)))?;
        let b = tree.add_child(root, sized("b", Size::px(70.0, 5.0)))?;
        resolve(&mut tree, Axis::X, 100.0)?;
        assert_eq!(tree.get(a)?.computed_size(Axis::X), 70.0);
        assert_eq!(tree.get(b)?.computed_size(Axis::X), 70.0);
        assert_eq!(tree.get(b)?.computed_rel_position(Axis::X), 70.0);
        Ok(())
    }

    #[test]
    fn underflow_is_not_filled() -> Result<()> {
        let (mut tree, root) = row(Size::px(100.0, 1.0))?;
        let a = tree.add_child(root, sized("a", Size::px(10.0, 0.0)))?;
        resolve(&mut tree, Axis::X, 100.0)?;
        assert_eq!(tree.get(a)?.computed_size(Axis::X), 10.0);
        Ok(())
    }

    #[test]
    fn scrolling_parent_allows_overflow() -> Result<()> {
        let mut tree = WidgetTree::new();
        let root = tree.insert(
            Widget::new("root")
                .size(Axis::X, Size::px(100.0, 1.0))
                .flags(crate::WidgetFlags::VIEW_SCROLL_X),
        );
        tree.set_root(root)?;
        let a = tree.add_child(root, sized("a", Size::px(80.0, 0.0)))?;
        let b = tree.add_child(root, sized("b", Size::px(80.0, 0.0)))?;
        resolve(&mut tree, Axis::X, 100.0)?;
        assert_eq!(tree.get(a)?.computed_size(Axis::X), 80.0);
        assert_eq!(tree.get(b)?.computed_rel_position(Axis::X), 80.0);
        Ok(())
    }

    #[test]
    fn cross_axis_overflow_limited_by_strictness() -> Result<()> {
        let mut tree = WidgetTree::new();
        let root = tree.insert(
            Widget::new("root")
                .sizes(Size::px(100.0, 1.0), Size::px(10.0, 1.0))
                .layout_axis(Axis::X),
        );
        tree.set_root(root)?;
        let tall = |label: &str, h: f32, strictness: f32| {
            Widget::new(label).size(Axis::Y, Size::px(h, strictness))
        };
        let loose = tree.add_child(root, tall("loose", 30.0, 0.0))?;
        let half = tree.add_child(root, tall("half", 30.0, 0.5))?;
        let fits = tree.add_child(root, tall("fits", 4.0, 0.0))?;
        resolve(&mut tree, Axis::Y, 100.0)?;
        assert_eq!(tree.get(loose)?.computed_size(Axis::Y), 10.0);
        assert_eq!(tree.get(half)?.computed_size(Axis::Y), 15.0);
        assert_eq!(tree.get(fits)?.computed_size(Axis::Y), 4.0);
        for id in [loose, half, fits] {
            assert_eq!(tree.get(id)?.computed_rel_position(Axis::Y), 0.0);
        }
        Ok(())
    }

    #[test]
    fn positions_stack_along_layout_axis() -> Result<()> {
        let (mut tree, root) = row(Size::px(100.0, 1.0))?;
        let kids = [10.0, 20.0, 30.0]
            .iter()
            .enumerate()
            .map(|(i, w)| tree.add_child(root, sized(&format!("c{i}"), Size::px(*w, 0.0))))
            .collect::<Result<Vec<_>>>()?;
        resolve(&mut tree, Axis::X, 100.0)?;
        let pos: Vec<f32> = kids
            .iter()
            .map(|k| tree.get(*k).map(|n| n.computed_rel_position(Axis::X)))
            .collect::<Result<_>>()?;
        assert_eq!(pos, vec![0.0, 10.0, 30.0]);
        Ok(())
    }

    #[test]
    fn percent_under_children_sum_is_a_cycle() -> Result<()> {
        let (mut tree, root) = row(Size::px(100.0, 1.0))?;
        let sum = tree.add_child(root, sized("sum", Size::children_sum(0.0)))?;
        let pct = tree.add_child(sum, sized("pct", Size::pct(0.5, 0.0)))?;
        tree.add_child(sum, sized("fixed", Size::px(10.0, 0.0)))?;
        let err = resolve(&mut tree, Axis::X, 100.0);
        assert_eq!(
            err,
            Err(Error::StructuralCycle {
                node: pct,
                axis: Axis::X
            })
        );
        // Nothing was committed.
        assert_eq!(tree.get(root)?.computed_size(Axis::X), 0.0);
        Ok(())
    }

    #[test]
    fn percent_chain_under_children_sum_is_a_cycle() -> Result<()> {
        let (mut tree, root) = row(Size::children_sum(1.0))?;
        let a = tree.add_child(root, sized("a", Size::pct(1.0, 0.0)))?;
        tree.add_child(a, sized("b", Size::pct(0.5, 0.0)))?;
        assert!(matches!(
            resolve(&mut tree, Axis::X, 100.0),
            Err(Error::StructuralCycle { node, .. }) if node == a
        ));
        Ok(())
    }

    #[test]
    fn intervening_fixed_size_breaks_cycle() -> Result<()> {
        let (mut tree, root) = row(Size::children_sum(1.0))?;
        let fixed = tree.add_child(root, sized("fixed", Size::px(80.0, 1.0)))?;
        let pct = tree.add_child(fixed, sized("pct", Size::pct(0.5, 0.0)))?;
        resolve(&mut tree, Axis::X, 100.0)?;
        assert_eq!(tree.get(root)?.computed_size(Axis::X), 80.0);
        assert_eq!(tree.get(pct)?.computed_size(Axis::X), 40.0);
        Ok(())
    }

    #[test]
    fn failed_axis_leaves_other_axis_uncommitted() -> Result<()> {
        let mut tree = WidgetTree::new();
        let root = tree.insert(
            Widget::new("root").sizes(Size::px(50.0, 1.0), Size::children_sum(1.0)),
        );
        tree.set_root(root)?;
        tree.add_child(
            root,
            Widget::new("a").sizes(Size::px(10.0, 0.0), Size::pct(1.0, 0.0)),
        )?;
        assert!(layout(&mut tree, Expanse::new(100.0, 100.0)).is_err());
        assert_eq!(tree.get(root)?.computed_size(Axis::X), 0.0);
        Ok(())
    }

    #[test]
    fn rects_accumulate_parent_offsets() -> Result<()> {
        let mut tree = WidgetTree::new();
        let root = tree.insert(
            Widget::new("root")
                .sizes(Size::px(100.0, 1.0), Size::px(100.0, 1.0))
                .layout_axis(Axis::Y),
        );
        tree.set_root(root)?;
        tree.add_child(
            root,
            Widget::new("top").sizes(Size::pct(1.0, 0.0), Size::px(20.0, 1.0)),
        )?;
        let body = tree.add_child(
            root,
            Widget::new("body")
                .sizes(Size::pct(1.0, 0.0), Size::pct(0.5, 0.0))
                .layout_axis(Axis::X),
        )?;
        tree.add_child(
            body,
            Widget::new("left").sizes(Size::px(30.0, 0.0), Size::pct(1.0, 0.0)),
        )?;
        let right = tree.add_child(
            body,
            Widget::new("right").sizes(Size::px(30.0, 0.0), Size::pct(1.0, 0.0)),
        )?;
        layout(&mut tree, Expanse::new(100.0, 100.0))?;
        assert_eq!(tree.get(body)?.rect(), Rect::new(0.0, 20.0, 100.0, 50.0));
        assert_eq!(tree.get(right)?.rect(), Rect::new(30.0, 20.0, 30.0, 50.0));
        Ok(())
    }

    #[test]
    fn detached_nodes_are_ignored() -> Result<()> {
        let (mut tree, root) = row(Size::px(10.0, 1.0))?;
        let loose = tree.insert(sized("loose", Size::pct(0.5, 0.0)));
        let solve = solve_axis(&tree, Axis::X, 10.0)?;
        assert_eq!(solve.size(root), Some(10.0));
        assert_eq!(solve.size(loose), None);
        Ok(())
    }

    #[test]
    fn missing_root_is_malformed() {
        let mut tree = WidgetTree::new();
        tree.insert(Widget::new("orphan"));
        assert!(matches!(
            resolve(&mut tree, Axis::X, 10.0),
            Err(Error::Malformed(_))
        ));
    }
}
