//! Status bar UI rendering
//!
//! Memory usage, data source and counts for the loaded task set.

use crate::app::AppState;
use crate::utils::{format_count, format_memory_mb};
use eframe::egui;
use egui::RichText;
use tasktree::ThemeColors;

/// Renders the status panel at the bottom of the window.
pub fn render_status_bar(ui: &mut egui::Ui, state: &mut AppState, loading: bool, theme_colors: &ThemeColors) {
    ui.horizontal(|ui| {
        let memory_text = format_memory_mb(state.memory.current_mb());
        ui.label(RichText::new(&memory_text).strong());
        ui.label(RichText::new("|").strong());

        if loading {
            ui.label(RichText::new("Loading…").strong());
            return;
        }

        let Some(origin) = state.tasks.origin() else {
            ui.label(RichText::new("No tasks loaded").strong());
            return;
        };

        let forest = state.tasks.forest();
        ui.label(
            RichText::new(format!(
                "{} | Records: {} | Branches: {} / {} | Visible rows: {}",
                origin.label(),
                format_count(state.tasks.records().len()),
                state.tasks.enabled_branch_count(),
                state.tasks.all_branches().len(),
                format_count(state.tasks.store().visible().len()),
            ))
            .strong(),
        );

        if !forest.unreachable().is_empty() {
            ui.label(RichText::new("|").strong());
            ui.label(
                RichText::new(format!("Unreachable: {}", format_count(forest.unreachable().len())))
                    .strong()
                    .color(theme_colors.warning),
            );
        }
        if forest.skipped() > 0 {
            ui.label(RichText::new("|").strong());
            ui.label(
                RichText::new(format!("Skipped (no id): {}", format_count(forest.skipped())))
                    .color(theme_colors.text_dim),
            );
        }
    });
}
