use super::{AxisSolve, non_negative};
use crate::{
    error::{Error, Result},
    size::SizeKind,
    tree::WidgetTree,
};

/// Resolve sizes that depend only on the widget itself.
pub(super) fn standalone_sizes(tree: &WidgetTree, solve: &mut AxisSolve) {
    let axis = solve.axis;
    for &id in &solve.pre_order {
        let Some(node) = tree.node(id) else {
            continue;
        };
        let size = node.semantic_size(axis);
        let px = match size.kind {
            SizeKind::Null => 0.0,
            SizeKind::Pixels => size.value,
            SizeKind::TextContent => node.content_size.get(axis),
            SizeKind::PercentOfParent | SizeKind::ChildrenSum => continue,
        };
        solve.sizes.insert(id, non_negative(px));
    }
}

/// Resolve percent-of-parent sizes, parents first. The root resolves against
/// the solve's top-level size. A percentage of an unresolved parent stays
/// unresolved and is reported by the downward pass.
pub(super) fn upward_dependent_sizes(tree: &WidgetTree, solve: &mut AxisSolve) {
    let axis = solve.axis;
    for &id in &solve.pre_order {
        let Some(node) = tree.node(id) else {
            continue;
        };
        let size = node.semantic_size(axis);
        if size.kind != SizeKind::PercentOfParent {
            continue;
        }
        let parent_size = match node.parent {
            None => Some(solve.top_level),
            Some(parent) => solve.sizes.get(parent).copied(),
        };
        if let Some(parent_size) = parent_size {
            solve.sizes.insert(id, non_negative(parent_size * size.value));
        }
    }
}

/// Resolve children-sum sizes, children first: the sum along the node's layout
/// axis, the maximum across it.
///
/// Every child must be resolved by now. One that is not depends on an
/// ancestor that in turn depends on it, and the whole solve fails.
pub(super) fn downward_dependent_sizes(tree: &WidgetTree, solve: &mut AxisSolve) -> Result<()> {
    let axis = solve.axis;
    for &id in &solve.post_order {
        let Some(node) = tree.node(id) else {
            continue;
        };
        if node.semantic_size(axis).kind != SizeKind::ChildrenSum {
            continue;
        }
        let along = node.child_layout_axis == axis;
        let mut total: f32 = 0.0;
        for &child in &node.children {
            let Some(s) = solve.sizes.get(child).copied() else {
                tracing::debug!(?id, ?child, %axis, "children sum over unresolved child");
                return Err(Error::StructuralCycle { node: child, axis });
            };
            total = if along { total + s } else { total.max(s) };
        }
        solve.sizes.insert(id, total);
    }

    if let Some(&id) = solve
        .pre_order
        .iter()
        .find(|id| !solve.sizes.contains_key(**id))
    {
        return Err(Error::StructuralCycle { node: id, axis });
    }
    Ok(())
}
