//! The per-frame widget tree: the map view, the optional side panel and the
//! HUD text, laid out in terminal cells.

use fiddle::{Axis, Expanse, NodeId, Rect, Result, Size, Ui, WidgetFlags, key};
use unicode_width::UnicodeWidthStr;

use crate::game::Game;

/// Side panel width in cells, border included.
pub const PANEL_WIDTH: f32 = 30.0;

/// A line of text placed by the layout engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    /// Screen rect in cells.
    pub rect: Rect,
    /// Text to draw.
    pub text: String,
}

/// Where everything goes this frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Hud {
    /// The whole screen.
    pub screen: Rect,
    /// The overhead map view.
    pub view: Rect,
    /// The side panel, in split-screen mode.
    pub panel: Option<Rect>,
    /// Text lines, in build order.
    pub labels: Vec<Label>,
}

/// A text widget sized to its display width and one row.
fn text(ui: &mut Ui, label: &str) -> Result<NodeId> {
    let width = key::display_text(label).width() as f32;
    ui.text(label, Expanse::new(width, 1.0))
}

/// An anonymous fixed-size gap along `axis`.
fn spacer(ui: &mut Ui, axis: Axis, cells: f32) -> Result<NodeId> {
    let id = ui.widget_make(WidgetFlags::empty(), "")?;
    ui.set_size(id, axis, Size::px(cells, 1.0))?;
    Ok(id)
}

/// The caption and checkbox, inset by one cell from the active parent's
/// top-left corner.
fn hud_block(ui: &mut Ui, game: &Game) -> Result<()> {
    spacer(ui, Axis::Y, 1.0)?;
    let row = ui.widget_make(WidgetFlags::empty(), "row")?;
    ui.set_size(row, Axis::X, Size::pct(1.0, 0.0))?;
    ui.set_size(row, Axis::Y, Size::children_sum(1.0))?;
    ui.with_parent(row, |ui| {
        spacer(ui, Axis::X, 1.0)?;
        let body = ui.widget_make(WidgetFlags::DRAW_BACKGROUND, "body")?;
        ui.equip_child_layout_axis(body, Axis::Y)?;
        ui.set_size(body, Axis::X, Size::children_sum(1.0))?;
        ui.set_size(body, Axis::Y, Size::children_sum(1.0))?;
        ui.with_parent(body, |ui| {
            text(ui, &format!("{}###caption", game.caption()))?;
            let mark = if game.checked { 'x' } else { ' ' };
            text(ui, &format!("[{mark}] Checkbox###checkbox"))?;
            Ok(())
        })
    })
}

/// Build and lay out one frame.
pub fn build(ui: &mut Ui, game: &Game, viewport: Expanse) -> Result<Hud> {
    let root = ui.begin_frame(viewport);
    ui.equip_child_layout_axis(root, Axis::X)?;

    let view = ui.widget_make(WidgetFlags::CLIP, "view")?;
    ui.set_size(view, Axis::X, Size::pct(1.0, 0.0))?;
    ui.set_size(view, Axis::Y, Size::pct(1.0, 1.0))?;
    ui.equip_child_layout_axis(view, Axis::Y)?;

    let panel = if game.split {
        let panel = ui.widget_make(
            WidgetFlags::DRAW_BORDER | WidgetFlags::DRAW_BACKGROUND,
            "panel",
        )?;
        ui.set_size(panel, Axis::X, Size::px(PANEL_WIDTH, 1.0))?;
        ui.set_size(panel, Axis::Y, Size::pct(1.0, 1.0))?;
        ui.equip_child_layout_axis(panel, Axis::Y)?;
        ui.with_parent(panel, |ui| hud_block(ui, game))?;
        Some(panel)
    } else {
        ui.with_parent(view, |ui| hud_block(ui, game))?;
        None
    };

    ui.end_frame()?;

    let tree = ui.tree();
    let mut labels = Vec::new();
    for id in tree.pre_order(root) {
        let node = tree.get(id)?;
        if node.widget_flags().contains(WidgetFlags::DRAW_TEXT) {
            labels.push(Label {
                rect: node.rect(),
                text: node.display_text().to_string(),
            });
        }
    }
    Ok(Hud {
        screen: tree.get(root)?.rect(),
        view: tree.get(view)?.rect(),
        panel: panel.map(|p| tree.get(p).map(|n| n.rect())).transpose()?,
        labels,
    })
}
