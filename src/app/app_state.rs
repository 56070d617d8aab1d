//! Centralized application state for the task tree viewer.
//!
//! Composes focused state components, each managing one aspect of the
//! application, so different parts can be borrowed independently.

use crate::state::{LayoutState, QueryState, SelectionState, TaskState, ThemeState};
use crate::utils::MemoryProbe;
use tasktree::{HighlightController, ViewerConfig};

pub struct AppState {
    // ===== Focused State Components =====
    /// Records, branch filter, forest, expansion and row layout
    pub tasks: TaskState,

    /// Task shown in the details panel
    pub selection: SelectionState,

    /// Searched task marked in the tree
    pub highlight: HighlightController,

    /// Search box and last query
    pub query: QueryState,

    pub theme: ThemeState,

    pub layout: LayoutState,

    // ===== Top-Level State =====
    /// Endpoint and startup options
    pub config: ViewerConfig,

    /// Message of the last failed load, if any
    pub error_message: Option<String>,

    /// Process memory shown in the status bar
    pub memory: MemoryProbe,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::with_settings(ViewerConfig::default(), ThemeState::new(), LayoutState::new())
    }

    /// Creates the state with configuration and stored preferences.
    pub fn with_settings(config: ViewerConfig, theme: ThemeState, layout: LayoutState) -> Self {
        Self {
            tasks: TaskState::new(),
            selection: SelectionState::new(),
            highlight: HighlightController::new(),
            query: QueryState::new(),
            theme,
            layout,
            config,
            error_message: None,
            memory: MemoryProbe::new(),
        }
    }

    /// Whether the virtualized list is used for the current records.
    pub fn use_virtual_list(&self) -> bool {
        self.layout.virtualize() || ViewerConfig::forces_virtualization(self.tasks.records().len())
    }
}
