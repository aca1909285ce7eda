use std::io::Write;

use termcolor::{Buffer, Color, ColorSpec, WriteColor};

use crate::{
    Axis, NodeId,
    error::{Error, Result},
    size::{Size, SizeKind},
    tree::WidgetTree,
};

/// Traverses a widget tree and returns a string showing each node's identity,
/// sizing inputs and layout outputs. This is a debug function.
pub fn dump(tree: &WidgetTree, root: NodeId) -> Result<String> {
    let mut buffer = Buffer::ansi();
    dump_node(&mut buffer, tree, root, 0)?;
    Ok(String::from_utf8_lossy(buffer.as_slice()).into_owned())
}

/// Like [`dump`], without color escapes.
pub fn dump_plain(tree: &WidgetTree, root: NodeId) -> Result<String> {
    let mut buffer = Buffer::no_color();
    dump_node(&mut buffer, tree, root, 0)?;
    Ok(String::from_utf8_lossy(buffer.as_slice()).into_owned())
}

/// Short description of a semantic size.
fn describe(size: Size) -> String {
    let kind = match size.kind {
        SizeKind::Null => return "null".into(),
        SizeKind::Pixels => format!("{}px", size.value),
        SizeKind::TextContent => "text".into(),
        SizeKind::PercentOfParent => format!("{}%", size.value * 100.0),
        SizeKind::ChildrenSum => "children".into(),
    };
    format!("{kind} s={}", size.strictness)
}

/// Helper to write an indented, colored label followed by a value.
fn write_field(buffer: &mut Buffer, indent: &str, label: &str, value: &str) -> Result<()> {
    write!(buffer, "{indent}  ")?;
    buffer.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
    write!(buffer, "{label}")?;
    buffer.reset()?;
    writeln!(buffer, " {value}")?;
    Ok(())
}

/// Walk a node subtree and emit formatted debug output.
fn dump_node(buffer: &mut Buffer, tree: &WidgetTree, id: NodeId, level: usize) -> Result<()> {
    let node = tree.node(id).ok_or(Error::NodeNotFound(id))?;
    let indent = "    ".repeat(level);

    write!(buffer, "{indent}")?;
    buffer.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))?;
    write!(buffer, "{}", node.key())?;
    buffer.reset()?;
    if !node.label().is_empty() {
        buffer.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
        write!(buffer, " {:?}", node.label())?;
        buffer.reset()?;
    }
    if !node.widget_flags().is_empty() {
        write!(buffer, " [{:?}]", node.widget_flags())?;
    }
    writeln!(buffer)?;

    write_field(
        buffer,
        &indent,
        "semantic:",
        &format!(
            "x={} y={} along {}",
            describe(node.semantic_size(Axis::X)),
            describe(node.semantic_size(Axis::Y)),
            node.child_layout_axis()
        ),
    )?;
    write_field(
        buffer,
        &indent,
        "computed:",
        &format!(
            "size=({}, {}) pos=({}, {})",
            node.computed_size(Axis::X),
            node.computed_size(Axis::Y),
            node.computed_rel_position(Axis::X),
            node.computed_rel_position(Axis::Y)
        ),
    )?;
    let r = node.rect();
    write_field(
        buffer,
        &indent,
        "rect:",
        &format!("({}, {}) {}x{}", r.tl.x, r.tl.y, r.w, r.h),
    )?;

    for &child in node.children() {
        dump_node(buffer, tree, child, level + 1)?;
    }
    Ok(())
}
