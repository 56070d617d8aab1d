//! Header panel UI rendering
//!
//! Search box, data source buttons, branch chips, the virtualize switch and
//! the theme selector.

use crate::app::AppState;
use crate::presentation::color_mapping;
use eframe::egui;
use egui::RichText;
use std::path::PathBuf;
use tasktree::{ThemeColors, ViewerConfig};

/// Result of user interaction with the header panel
#[derive(Debug, Clone, PartialEq)]
pub enum HeaderInteraction {
    /// Search button or Enter in the search box
    SearchRequested,
    /// "Reload" reissues the last query
    ReloadRequested,
    /// User picked a task dump to open
    OpenFileRequested(PathBuf),
    /// "Synthetic" loads a generated task set
    SyntheticRequested,
    /// A branch chip was clicked
    BranchToggled(String),
    /// The virtualize switch changed
    VirtualizeChanged(bool),
}

/// Renders the application header.
///
/// # Returns
/// * `Option<HeaderInteraction>` - User interaction result
pub fn render_header(
    ui: &mut egui::Ui,
    state: &mut AppState,
    theme_colors: &ThemeColors,
) -> Option<HeaderInteraction> {
    let mut interaction = None;

    ui.horizontal(|ui| {
        ui.label("Task ID:");
        let search = egui::TextEdit::singleline(state.query.search_text_mut())
            .hint_text("e.g. 399129")
            .desired_width(120.0)
            .show(ui);
        let enter_pressed = search.response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        if ui.button("🔍 Search").clicked() || enter_pressed {
            interaction = Some(HeaderInteraction::SearchRequested);
        }

        if ui.button("⟳ Reload").clicked() {
            interaction = Some(HeaderInteraction::ReloadRequested);
        }

        ui.separator();

        if ui.button("📁 Open JSON…").clicked() {
            let mut dialog = rfd::FileDialog::new()
                .add_filter("Task dumps", &["json", "br"])
                .add_filter("JSON", &["json"])
                .add_filter("Brotli JSON", &["br"]);

            if let Ok(cwd) = std::env::current_dir() {
                dialog = dialog.set_directory(cwd);
            }

            if let Some(path) = dialog.pick_file() {
                interaction = Some(HeaderInteraction::OpenFileRequested(path));
            }
        }

        if ui.button("🔮 Synthetic").clicked() {
            interaction = Some(HeaderInteraction::SyntheticRequested);
        }

        ui.separator();

        let forced = ViewerConfig::forces_virtualization(state.tasks.records().len());
        let mut virtualize = state.use_virtual_list();
        let response = ui.add_enabled(!forced, egui::Checkbox::new(&mut virtualize, "Virtualize"));
        if response.changed() {
            interaction = Some(HeaderInteraction::VirtualizeChanged(virtualize));
        }
        if forced {
            response.on_disabled_hover_text("Large task sets are always virtualized");
        }

        // Push theme selector to the right
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let old_theme = state.theme.current_theme_name().to_string();
            let mut current_theme = old_theme.clone();
            egui::ComboBox::from_id_salt("theme_selector")
                .selected_text(&current_theme)
                .show_ui(ui, |ui| {
                    for theme_name in state.theme.theme_manager().list_themes() {
                        ui.selectable_value(&mut current_theme, theme_name.to_string(), theme_name);
                    }
                });

            if old_theme != current_theme {
                state.theme.set_theme(&current_theme);
                ui.ctx().request_repaint();
            }

            ui.label("Theme:");
        });
    });

    if let Some(branch) = render_branch_chips(ui, state, theme_colors) {
        interaction = Some(HeaderInteraction::BranchToggled(branch));
    }

    if let Some(err) = &state.error_message {
        ui.colored_label(theme_colors.error, format!("Load failed: {}", err));
    }

    interaction
}

/// One chip per branch in the loaded records. Returns the clicked branch.
fn render_branch_chips(ui: &mut egui::Ui, state: &AppState, theme_colors: &ThemeColors) -> Option<String> {
    let branches = state.tasks.all_branches();
    if branches.is_empty() {
        return None;
    }

    let mut clicked = None;
    ui.horizontal_wrapped(|ui| {
        ui.label("Branches:");
        for name in branches {
            let enabled = state.tasks.is_branch_enabled(name);
            let (fill, text) = color_mapping::chip_colors(enabled, theme_colors);
            let label = if enabled {
                format!("{} ✕", name)
            } else {
                name.clone()
            };
            let chip = egui::Button::new(RichText::new(label).small().color(text))
                .fill(fill)
                .corner_radius(8.0);
            if ui.add(chip).clicked() {
                clicked = Some(name.clone());
            }
        }
    });
    clicked
}
