//! Task Tree Viewer GUI Application
//!
//! Interactive viewer for build-task history, built with egui:
//! - Per-branch task forests linked through each task's `prev` reference
//! - Virtualized list with measured, variable row heights for large sets
//! - Search by task id with highlight and scroll-to-result
//! - Asynchronous fetches from the task history endpoint, or local dumps
//! - Multiple themes with persistent preferences

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]
//! The application is built with a modular architecture:
//! - `app/` - Application state management and coordination
//! - `presentation/` - Visual styling and color mapping
//! - `io/` - Background loading of task sets
//! - `utils/` - Formatting and memory sampling
//! - `ui/` - UI panel rendering
//! - `rendering/` - Row rendering shared by both tree views
//! - `state/` - Loaded tasks, selection, query and view preferences

use eframe::egui;
use tracing_subscriber::EnvFilter;

mod utils;
mod presentation;
mod io;
mod app;
mod rendering;
mod ui;
mod state;

use app::{AppState, ApplicationCoordinator, SettingsCoordinator, ThemeCoordinator};
use io::AsyncLoader;
use state::ThemeState;
use tasktree::{TaskQuery, ViewerConfig};
use ui::panel_manager::{PanelInteraction, PanelManager};

/// Main application entry point that initializes and launches the viewer.
fn main() -> eframe::Result {
    init_logging();

    let config = ViewerConfig::from_env();
    tracing::info!(api_base = %config.api_base, initial_task = ?config.initial_task, "starting viewer");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_title("Task Tree Viewer"),
        ..Default::default()
    };

    eframe::run_native(
        "Task Tree Viewer",
        options,
        Box::new(move |cc| Ok(Box::new(TaskTreeApp::new(cc, config)))),
    )
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// The main application.
///
/// Delegates to coordinators:
/// - `ApplicationCoordinator` handles loading, search and tree interactions
/// - `ThemeCoordinator` handles theme persistence and application
/// - `SettingsCoordinator` handles layout persistence
/// - `PanelManager` handles UI panel layout and rendering
struct TaskTreeApp {
    state: AppState,
    loader: AsyncLoader,
    /// Startup load, issued on the first frame
    startup_pending: bool,
}

impl TaskTreeApp {
    /// Creates the viewer with theme and layout settings loaded from persistent storage.
    fn new(cc: &eframe::CreationContext, config: ViewerConfig) -> Self {
        let theme_name = ThemeCoordinator::load_theme_from_storage(cc.storage);
        let layout = SettingsCoordinator::load_layout(cc.storage);

        Self {
            state: AppState::with_settings(config, ThemeState::with_theme(&theme_name), layout),
            loader: AsyncLoader::new(),
            startup_pending: true,
        }
    }

    /// Searches for the task given on the command line, or loads the
    /// unfiltered task history.
    fn run_startup_load(&mut self, ctx: &egui::Context) {
        match self.state.config.initial_task.clone() {
            Some(id) => ApplicationCoordinator::search_for(&mut self.state, &mut self.loader, &id, ctx),
            None => ApplicationCoordinator::start_fetch(&mut self.state, &mut self.loader, TaskQuery::default(), ctx),
        }
    }

    fn handle_panel_interaction(&mut self, interaction: PanelInteraction, ctx: &egui::Context) {
        match interaction {
            PanelInteraction::SearchRequested => {
                ApplicationCoordinator::search(&mut self.state, &mut self.loader, ctx);
            }
            PanelInteraction::ReloadRequested => {
                ApplicationCoordinator::reload(&mut self.state, &mut self.loader, ctx);
            }
            PanelInteraction::OpenFileRequested(path) => {
                ApplicationCoordinator::open_file(&mut self.state, &mut self.loader, path, ctx);
            }
            PanelInteraction::SyntheticRequested => {
                ApplicationCoordinator::open_synthetic(&mut self.state, &mut self.loader);
            }
            PanelInteraction::BranchToggled(name) => {
                ApplicationCoordinator::handle_branch_toggled(&mut self.state, &name);
            }
            PanelInteraction::VirtualizeChanged(on) => {
                ApplicationCoordinator::set_virtualize(&mut self.state, on);
            }
            PanelInteraction::NodeToggled(key) => {
                ApplicationCoordinator::handle_node_toggled(&mut self.state, &key);
            }
            PanelInteraction::TaskSelected(id) => {
                ApplicationCoordinator::handle_task_selected(&mut self.state, id);
            }
        }
    }
}

impl eframe::App for TaskTreeApp {
    /// Called when the app is being shut down - ensures preferences are saved.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        ThemeCoordinator::save_theme_to_storage(storage, self.state.theme.current_theme_name());
        SettingsCoordinator::save_layout(storage, &self.state.layout);
    }

    /// Main update loop:
    /// 1. Apply settled loads
    /// 2. Apply theme
    /// 3. Issue the startup load on the first frame
    /// 4. Render all panels via PanelManager
    /// 5. Handle panel interactions
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ApplicationCoordinator::check_loading_completion(&mut self.state, &mut self.loader);

        ThemeCoordinator::apply_current_theme(ctx, &self.state);

        if std::mem::take(&mut self.startup_pending) {
            self.run_startup_load(ctx);
        }

        if let Some(interaction) = PanelManager::render_all_panels(ctx, &mut self.state, &self.loader) {
            self.handle_panel_interaction(interaction, ctx);
        }
    }
}
