//! Task and branch row rendering.
//!
//! A row is a framed block: an expand control indented by depth, then the
//! row text. Branch rows show the branch name and how many root tasks it
//! has. Task rows show the id, a date/prev/branch line and one line per
//! commit, so rows differ in height.

use eframe::egui;
use egui::{Margin, RichText, Sense};
use tasktree::theme::ThemeColors;
use tasktree::{Forest, ForestNode, NodeIndex, NodeKind, TaskId};

use crate::presentation::color_mapping::{self, RowLook};

/// Horizontal indent per task depth level.
pub const INDENT_PER_LEVEL: f32 = 16.0;

/// Per-row flags the caller resolves before rendering.
#[derive(Debug, Clone, Copy, Default)]
pub struct RowContext {
    pub expanded: bool,
    pub selected: bool,
    pub highlighted: bool,
}

/// Result of user interaction with a row
#[derive(Debug, Clone, PartialEq)]
pub enum RowInteraction {
    /// Expand/collapse control was clicked
    Toggle(String),
    /// A task row was clicked
    Select(TaskId),
}

/// Indent in points for a node at `depth` (branch rows sit at depth 0).
pub fn indent_for_depth(depth: usize) -> f32 {
    depth.saturating_sub(1) as f32 * INDENT_PER_LEVEL
}

/// Renders one row of the virtualized list into the current ui.
///
/// The caller places the ui at the row's computed top; the returned
/// response rect is the row's measured extent.
pub fn render_row(
    ui: &mut egui::Ui,
    forest: &Forest,
    idx: NodeIndex,
    ctx: RowContext,
    colors: &ThemeColors,
) -> Option<RowInteraction> {
    let node = forest.node(idx);

    // Registered before the row's widgets so the expand control stays on top.
    let row_id = ui.id().with(("row", node.key()));
    let row_response = ui.interact(ui.max_rect(), row_id, Sense::click());

    let look = RowLook {
        is_branch: node.is_branch(),
        selected: ctx.selected,
        hovered: row_response.hovered(),
    };
    let mut frame = egui::Frame::new()
        .fill(color_mapping::row_fill(look, colors))
        .inner_margin(Margin::symmetric(6, 4));
    if ctx.highlighted {
        frame = frame.stroke(color_mapping::highlight_stroke(colors));
    }

    let mut interaction = None;
    frame.show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.horizontal_top(|ui| {
            ui.add_space(indent_for_depth(node.depth()));
            if expand_control(ui, node, ctx.expanded) {
                interaction = Some(RowInteraction::Toggle(node.key().to_string()));
            }
            ui.vertical(|ui| row_text(ui, node, colors));
        });
    });

    if interaction.is_none() && row_response.clicked() {
        interaction = node.task_id().cloned().map(RowInteraction::Select);
    }
    interaction
}

/// Expand/collapse button; disabled for leaves. Returns true when clicked.
fn expand_control(ui: &mut egui::Ui, node: &ForestNode, expanded: bool) -> bool {
    let symbol = if expanded && node.has_children() { "▼" } else { "▶" };
    let button = egui::Button::new(symbol).small().frame(false);
    ui.add_enabled(node.has_children(), button).clicked()
}

/// Text of a row without frame or controls. Shared with the eager tree.
pub fn row_text(ui: &mut egui::Ui, node: &ForestNode, colors: &ThemeColors) {
    match node.kind() {
        NodeKind::Branch { name } => {
            ui.horizontal(|ui| {
                ui.label(RichText::new(format!("Branch: {}", name)).strong().color(colors.text_strong));
                let badge = egui::Frame::new()
                    .fill(colors.badge)
                    .corner_radius(6.0)
                    .inner_margin(Margin::symmetric(6, 1));
                badge.show(ui, |ui| {
                    ui.label(RichText::new(node.children().len().to_string()).small().color(colors.text_strong));
                });
                ui.label(RichText::new("root tasks").small().color(colors.text_dim));
            });
        }
        NodeKind::Task { record, .. } => {
            let title = match record.id() {
                Some(id) => format!("Task #{}", id),
                None => "Task #?".to_string(),
            };
            ui.label(RichText::new(title).strong().color(colors.text));
            ui.label(
                RichText::new(format!(
                    "Date: {} | prev: {} | branch: {}",
                    record.display_date(),
                    record.prev_label(),
                    record.branch()
                ))
                .small()
                .color(colors.text_dim),
            );
            for line in record.commit_lines() {
                ui.add(egui::Label::new(RichText::new(line).small().monospace().color(colors.commit_text)).wrap());
            }
        }
    }
}
