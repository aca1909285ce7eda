use slotmap::SecondaryMap;

use super::AxisSolve;
use crate::{Axis, id::NodeId, tree::WidgetTree};

/// Overflow below this is treated as rounding noise.
const EPSILON: f32 = 1e-3;

/// Shrink children that extend past their parent, parents first.
///
/// Along the parent's layout axis the overflow is shared out in proportion to
/// each child's `size * (1 - strictness)`, and no child loses more than that
/// amount. Across it, each child that is
/// larger than the parent gives up at most its own negotiable share. Parents
/// that scroll on the axis are skipped. Children never grow.
pub(super) fn solve_violations(tree: &WidgetTree, solve: &mut AxisSolve) {
    let axis = solve.axis;
    for &id in &solve.pre_order {
        let Some(node) = tree.node(id) else {
            continue;
        };
        if node.children.is_empty() || node.flags.allows_overflow(axis) {
            continue;
        }
        let parent_size = solve.sizes.get(id).copied().unwrap_or(0.0);
        if node.child_layout_axis == axis {
            shrink_along(tree, &mut solve.sizes, id, parent_size, axis);
        } else {
            shrink_across(tree, &mut solve.sizes, id, parent_size, axis);
        }
    }
}

/// Strictness of a node on an axis, clamped.
fn strictness(tree: &WidgetTree, id: NodeId, axis: Axis) -> f32 {
    tree.node(id)
        .map(|n| n.semantic_size(axis).clamped_strictness())
        .unwrap_or(1.0)
}

/// Distribute overflow across children stacked along `axis`.
fn shrink_along(
    tree: &WidgetTree,
    sizes: &mut SecondaryMap<NodeId, f32>,
    parent: NodeId,
    parent_size: f32,
    axis: Axis,
) {
    let children = tree.children(parent);
    let size = |sizes: &SecondaryMap<NodeId, f32>, c: NodeId| sizes.get(c).copied().unwrap_or(0.0);

    let total: f32 = children.iter().map(|c| size(sizes, *c)).sum();
    let overflow = total - parent_size;
    if overflow <= EPSILON {
        return;
    }

    let weights: Vec<f32> = children
        .iter()
        .map(|c| size(sizes, *c) * (1.0 - strictness(tree, *c, axis)))
        .collect();
    let total_weight: f32 = weights.iter().sum();
    if total_weight <= 0.0 {
        tracing::debug!(?parent, %axis, overflow, "overflow unresolved: children are strict");
        return;
    }

    let mut removed = 0.0;
    for (&child, weight) in children.iter().zip(&weights) {
        let current = size(sizes, child);
        // A child never gives up more than its negotiable share.
        let reduction = (overflow * weight / total_weight).min(*weight);
        sizes.insert(child, current - reduction);
        removed += reduction;
    }
    if overflow - removed > EPSILON {
        tracing::debug!(
            ?parent,
            %axis,
            remaining = overflow - removed,
            "overflow partly unresolved"
        );
    }
}

/// Pull in children that are larger than the parent across `axis`.
fn shrink_across(
    tree: &WidgetTree,
    sizes: &mut SecondaryMap<NodeId, f32>,
    parent: NodeId,
    parent_size: f32,
    axis: Axis,
) {
    for &child in tree.children(parent) {
        let current = sizes.get(child).copied().unwrap_or(0.0);
        let excess = current - parent_size;
        if excess <= EPSILON {
            continue;
        }
        let negotiable = current * (1.0 - strictness(tree, child, axis));
        let reduction = excess.min(negotiable);
        sizes.insert(child, current - reduction);
        if excess - reduction > EPSILON {
            tracing::debug!(?parent, ?child, %axis, "cross-axis overflow unresolved");
        }
    }
}
