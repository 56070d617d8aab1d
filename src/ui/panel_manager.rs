//! Panel orchestration and layout management.
//!
//! Lays out the header, status bar, details panel and the central tree, and
//! funnels their interactions into a single value for the application
//! coordinator.

use crate::app::AppState;
use crate::io::AsyncLoader;
use crate::rendering::task_row::RowInteraction;
use crate::ui::header::HeaderInteraction;
use crate::ui::{details_panel, eager_tree, header, status_bar, tree_panel};
use egui::RichText;
use std::path::PathBuf;
use tasktree::{TaskId, ThemeColors};

/// Result of panel interactions that need to be handled by the application coordinator.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelInteraction {
    SearchRequested,
    ReloadRequested,
    OpenFileRequested(PathBuf),
    SyntheticRequested,
    BranchToggled(String),
    VirtualizeChanged(bool),
    /// Expand control of the node with this key was clicked
    NodeToggled(String),
    TaskSelected(TaskId),
}

impl From<HeaderInteraction> for PanelInteraction {
    fn from(value: HeaderInteraction) -> Self {
        match value {
            HeaderInteraction::SearchRequested => PanelInteraction::SearchRequested,
            HeaderInteraction::ReloadRequested => PanelInteraction::ReloadRequested,
            HeaderInteraction::OpenFileRequested(path) => PanelInteraction::OpenFileRequested(path),
            HeaderInteraction::SyntheticRequested => PanelInteraction::SyntheticRequested,
            HeaderInteraction::BranchToggled(name) => PanelInteraction::BranchToggled(name),
            HeaderInteraction::VirtualizeChanged(on) => PanelInteraction::VirtualizeChanged(on),
        }
    }
}

impl From<RowInteraction> for PanelInteraction {
    fn from(value: RowInteraction) -> Self {
        match value {
            RowInteraction::Toggle(key) => PanelInteraction::NodeToggled(key),
            RowInteraction::Select(id) => PanelInteraction::TaskSelected(id),
        }
    }
}

/// Manages the layout and rendering of all UI panels.
pub struct PanelManager;

impl PanelManager {
    /// Renders all panels in the application window.
    ///
    /// Called from the eframe::App::update() implementation.
    pub fn render_all_panels(
        ctx: &egui::Context,
        state: &mut AppState,
        loader: &AsyncLoader,
    ) -> Option<PanelInteraction> {
        let mut interaction: Option<PanelInteraction> = None;
        let theme_colors = state.theme.colors().clone();
        let loading = loader.is_loading();

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            if let Some(header_interaction) = header::render_header(ui, state, &theme_colors) {
                interaction = Some(header_interaction.into());
            }
        });

        egui::TopBottomPanel::bottom("status_panel").show(ctx, |ui| {
            status_bar::render_status_bar(ui, state, loading, &theme_colors);
        });

        let window_height = ctx.content_rect().height();
        let details = egui::TopBottomPanel::bottom("details_panel")
            .default_height(window_height * (1.0 - state.layout.split_ratio()))
            .resizable(true)
            .show(ctx, |ui| {
                egui::Frame::default().inner_margin(4.0).show(ui, |ui| {
                    details_panel::render_details_panel(ui, state, &theme_colors);
                });
            });
        state
            .layout
            .set_details_height(details.response.rect.height(), window_height);

        let tree_frame = egui::Frame::default()
            .inner_margin(egui::Margin::same(4))
            .fill(ctx.style().visuals.panel_fill);

        egui::CentralPanel::default().frame(tree_frame).show(ctx, |ui| {
            if let Some(row_interaction) = Self::render_central(ui, state, loading, &theme_colors) {
                interaction = Some(row_interaction.into());
            }
        });

        interaction
    }

    fn render_central(
        ui: &mut egui::Ui,
        state: &mut AppState,
        loading: bool,
        theme_colors: &ThemeColors,
    ) -> Option<RowInteraction> {
        if loading {
            ui.centered_and_justified(|ui| ui.spinner());
            return None;
        }

        if state.error_message.is_some() {
            ui.vertical_centered(|ui| {
                ui.add_space(24.0);
                ui.label(RichText::new("Failed to load tasks").heading().color(theme_colors.error));
            });
            return None;
        }

        if state.tasks.forest().roots().is_empty() {
            if state.tasks.origin().is_some() {
                ui.vertical_centered(|ui| {
                    ui.add_space(24.0);
                    ui.label(RichText::new("No data").heading().color(theme_colors.info));
                    ui.label(RichText::new("Check the query parameters.").color(theme_colors.text_dim));
                });
            }
            return None;
        }

        if state.use_virtual_list() {
            tree_panel::render_tree_panel(ui, state, theme_colors)
        } else {
            eager_tree::render_eager_tree(ui, state, theme_colors)
        }
    }
}
