//! Details panel UI rendering
//!
//! Shows the raw fields of the selected task and lists tasks that could not
//! be attached under their branch.

use crate::app::AppState;
use eframe::egui;
use egui::{RichText, ScrollArea};
use tasktree::{ThemeColors, MISSING};

/// Renders the details for the selected task.
///
/// # Arguments
/// * `ui` - The egui UI context for drawing
/// * `state` - Reference to application state
/// * `theme_colors` - Color palette for the current theme
pub fn render_details_panel(ui: &mut egui::Ui, state: &AppState, theme_colors: &ThemeColors) {
    let record = state
        .selection
        .selected_task()
        .and_then(|id| state.tasks.task_record(id).map(|record| (id, record)));

    let Some((id, record)) = record else {
        ui.label("Task details (select a task to view)");
        render_unreachable(ui, state, theme_colors);
        return;
    };

    ui.label(RichText::new(format!("Details for task #{}", id)).strong());
    ui.separator();

    ScrollArea::vertical()
        .id_salt("details_scroll_area")
        .max_height(ui.available_height())
        .auto_shrink([false, false])
        .show(ui, |ui| {
            ui.label(RichText::new("Fields:").strong());
            let mut fields: Vec<_> = record.fields().iter().collect();
            fields.sort_by(|a, b| a.0.cmp(b.0));
            for (key, value) in fields {
                if key == "branch_commits" {
                    continue;
                }
                let line = serde_json::to_string(&serde_json::json!({ key: value }))
                    .unwrap_or_else(|_| format!("{}: {}", key, MISSING));
                ui.colored_label(theme_colors.text, line);
            }

            ui.add_space(10.0);
            ui.label(RichText::new("Commits:").strong());
            let commits = record.commit_lines();
            if commits.is_empty() {
                ui.colored_label(theme_colors.text_dim, "(no commits)");
            }
            for line in commits {
                ui.colored_label(theme_colors.commit_text, line);
            }
        });
}

/// Tasks whose `prev` chain never reaches their branch (cross-branch
/// parents or cycles). They are never rendered in the tree.
fn render_unreachable(ui: &mut egui::Ui, state: &AppState, theme_colors: &ThemeColors) {
    let forest = state.tasks.forest();
    if forest.unreachable().is_empty() {
        return;
    }

    ui.add_space(6.0);
    ui.colored_label(
        theme_colors.warning,
        format!("{} tasks are not reachable from their branch:", forest.unreachable().len()),
    );
    ScrollArea::vertical()
        .id_salt("unreachable_scroll_area")
        .auto_shrink([false, true])
        .show(ui, |ui| {
            for &idx in forest.unreachable() {
                let node = forest.node(idx);
                let Some(record) = node.task() else { continue };
                ui.colored_label(
                    theme_colors.text_dim,
                    format!(
                        "{} (branch: {}, prev: {})",
                        node.key(),
                        record.branch(),
                        record.prev_label()
                    ),
                );
            }
        });
}
