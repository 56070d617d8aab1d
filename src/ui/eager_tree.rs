//! Non-virtualized tree for small record sets.
//!
//! Renders every node of the forest with egui collapsing headers. Nodes
//! start collapsed; the open/closed state lives in egui memory under ids
//! salted with the task state revision, so a rebuild starts from scratch.

use crate::app::AppState;
use crate::presentation::color_mapping::{self, RowLook};
use crate::rendering::task_row::{self, RowInteraction};
use egui::collapsing_header::CollapsingState;
use egui::{Margin, ScrollArea, Sense};
use tasktree::{Forest, HighlightController, NodeIndex, TaskId, ThemeColors};

struct EagerView<'a> {
    forest: &'a Forest,
    selected: Option<&'a TaskId>,
    highlight: &'a HighlightController,
    colors: &'a ThemeColors,
    revision: u64,
}

pub fn render_eager_tree(
    ui: &mut egui::Ui,
    state: &AppState,
    theme_colors: &ThemeColors,
) -> Option<RowInteraction> {
    let view = EagerView {
        forest: state.tasks.forest(),
        selected: state.selection.selected_task(),
        highlight: &state.highlight,
        colors: theme_colors,
        revision: state.tasks.revision(),
    };

    let mut interaction = None;
    ScrollArea::vertical()
        .id_salt("task_tree_eager")
        .auto_shrink([false, false])
        .show(ui, |ui| {
            for &root in view.forest.roots() {
                render_node(ui, &view, root, &mut interaction);
            }
        });
    interaction
}

fn render_node(
    ui: &mut egui::Ui,
    view: &EagerView<'_>,
    idx: NodeIndex,
    interaction: &mut Option<RowInteraction>,
) {
    let node = view.forest.node(idx);
    if !node.has_children() {
        if let Some(picked) = node_header(ui, view, idx) {
            *interaction = Some(picked);
        }
        return;
    }

    let id = ui.make_persistent_id((view.revision, node.key()));
    let (_, header, _) = CollapsingState::load_with_default_open(ui.ctx(), id, false)
        .show_header(ui, |ui| node_header(ui, view, idx))
        .body(|ui| {
            for &child in node.children() {
                render_node(ui, view, child, interaction);
            }
        });
    if let Some(picked) = header.inner {
        *interaction = Some(picked);
    }
}

/// Framed row text; clicking a task row selects it.
fn node_header(ui: &mut egui::Ui, view: &EagerView<'_>, idx: NodeIndex) -> Option<RowInteraction> {
    let node = view.forest.node(idx);
    let id = node.task_id();
    let look = RowLook {
        is_branch: node.is_branch(),
        selected: id.zip(view.selected).is_some_and(|(id, sel)| id.loosely_eq(sel)),
        hovered: false,
    };
    let mut frame = egui::Frame::new()
        .fill(color_mapping::row_fill(look, view.colors))
        .inner_margin(Margin::symmetric(6, 2));
    if id.is_some_and(|id| view.highlight.is_highlighted(id)) {
        frame = frame.stroke(color_mapping::highlight_stroke(view.colors));
    }

    let response = frame
        .show(ui, |ui| {
            ui.vertical(|ui| task_row::row_text(ui, node, view.colors));
        })
        .response;
    let clicked = ui
        .interact(response.rect, ui.id().with(("eager_row", node.key())), Sense::click())
        .clicked();
    if clicked {
        id.cloned().map(RowInteraction::Select)
    } else {
        None
    }
}
