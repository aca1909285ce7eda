use super::AxisSolve;
use crate::tree::WidgetTree;

/// Place children one after another along their parent's layout axis, and at
/// the parent's start across it. The root sits at zero.
pub(super) fn relative_positions(tree: &WidgetTree, solve: &mut AxisSolve) {
    let axis = solve.axis;
    solve.positions.insert(solve.root, 0.0);
    for &id in &solve.pre_order {
        let Some(node) = tree.node(id) else {
            continue;
        };
        let along = node.child_layout_axis == axis;
        let mut cursor = 0.0;
        for &child in &node.children {
            if along {
                solve.positions.insert(child, cursor);
                cursor += solve.sizes.get(child).copied().unwrap_or(0.0);
            } else {
                solve.positions.insert(child, 0.0);
            }
        }
    }
}
