//! Application-level workflows.
//!
//! Starting loads, applying their results, searching, and the tree
//! interactions reported by the panels.

use crate::app::AppState;
use crate::io::{AsyncLoader, LoadOrigin, LoadResult};
use std::path::PathBuf;
use tasktree::{SyntheticGenerator, TaskId, TaskQuery};

pub struct ApplicationCoordinator;

impl ApplicationCoordinator {
    /// Starts fetching `query` from the task history endpoint.
    pub fn start_fetch(
        state: &mut AppState,
        loader: &mut AsyncLoader,
        query: TaskQuery,
        ctx: &egui::Context,
    ) {
        state.error_message = None;
        state.query.set_last_query(query.clone());
        loader.start_fetch(query, &state.config, ctx);
    }

    /// Searches for the id in the search box.
    ///
    /// Clears the highlight, fetches tasks scoped to the id, and highlights
    /// it once the fetch settles. Blank input does nothing.
    pub fn search(state: &mut AppState, loader: &mut AsyncLoader, ctx: &egui::Context) {
        let input = state.query.search_text().to_string();
        if let Some(query) = state.highlight.begin_search(&input) {
            tracing::info!(task_id = ?query.task_id, "searching");
            Self::start_fetch(state, loader, query, ctx);
        }
    }

    /// Searches for `id` as if it had been typed into the search box.
    pub fn search_for(state: &mut AppState, loader: &mut AsyncLoader, id: &TaskId, ctx: &egui::Context) {
        *state.query.search_text_mut() = id.to_string();
        Self::search(state, loader, ctx);
    }

    /// Reissues the last query.
    pub fn reload(state: &mut AppState, loader: &mut AsyncLoader, ctx: &egui::Context) {
        let query = state.query.last_query().clone();
        Self::start_fetch(state, loader, query, ctx);
    }

    pub fn open_file(
        state: &mut AppState,
        loader: &mut AsyncLoader,
        path: PathBuf,
        ctx: &egui::Context,
    ) {
        state.highlight.clear();
        state.error_message = None;
        loader.start_file_load(path, ctx);
    }

    /// Replaces the records with a generated set.
    pub fn open_synthetic(state: &mut AppState, loader: &mut AsyncLoader) {
        let generator = SyntheticGenerator::new();
        let records = loader.load_synthetic(&generator);
        state.highlight.clear();
        state.error_message = None;
        state.selection.clear();
        state.tasks.load(records, LoadOrigin::Synthetic { seed: generator.seed() });
    }

    /// Applies a settled load. Called once per frame.
    ///
    /// Returns true if a load completed (success or error).
    pub fn check_loading_completion(state: &mut AppState, loader: &mut AsyncLoader) -> bool {
        match loader.check_completion() {
            LoadResult::Success { records, origin } => {
                let from_api = origin.is_api();
                state.error_message = None;
                state.tasks.load(records, origin);
                Self::drop_stale_selection(state);
                if from_api {
                    state.highlight.on_fetch_complete();
                }
                true
            }
            LoadResult::Error { message, origin } => {
                state.error_message = Some(message);
                state.tasks.clear();
                state.selection.clear();
                if origin.is_api() {
                    state.highlight.on_fetch_complete();
                }
                true
            }
            LoadResult::None => false,
        }
    }

    fn drop_stale_selection(state: &mut AppState) {
        let still_loaded = state
            .selection
            .selected_task()
            .is_some_and(|id| state.tasks.find_task(id).is_some());
        if !still_loaded {
            state.selection.clear();
        }
    }

    /// Expand/collapse of a node in the virtualized list.
    pub fn handle_node_toggled(state: &mut AppState, key: &str) {
        if !state.tasks.toggle(key) {
            tracing::debug!(key, "toggle ignored");
        }
    }

    /// A task row was activated in either view.
    pub fn handle_task_selected(state: &mut AppState, id: TaskId) {
        state.selection.toggle_task(id);
    }

    pub fn handle_branch_toggled(state: &mut AppState, name: &str) {
        state.tasks.toggle_branch(name);
    }

    pub fn set_virtualize(state: &mut AppState, virtualize: bool) {
        state.layout.set_virtualize(virtualize);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_synthetic_loads_records() {
        let mut state = AppState::new();
        let mut loader = AsyncLoader::new();
        state.error_message = Some("old".to_string());

        ApplicationCoordinator::open_synthetic(&mut state, &mut loader);
        assert!(state.tasks.has_records());
        assert!(state.error_message.is_none());
        assert!(!state.tasks.forest().roots().is_empty());
    }

    #[test]
    fn test_failed_fetch_clears_tasks_and_sets_highlight() {
        let mut state = AppState::new();
        let mut loader = AsyncLoader::new();
        ApplicationCoordinator::open_synthetic(&mut state, &mut loader);

        state.highlight.begin_search("300001");
        loader.spawn_job(LoadOrigin::Api(TaskQuery::default()), None, || {
            Err(anyhow::anyhow!("HTTP 502 — Bad Gateway\n"))
        });

        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(5);
        while !ApplicationCoordinator::check_loading_completion(&mut state, &mut loader) {
            assert!(std::time::Instant::now() < deadline, "load never settled");
            std::thread::sleep(std::time::Duration::from_millis(5));
        }

        assert!(!state.tasks.has_records());
        assert!(state.error_message.as_deref().unwrap_or("").starts_with("HTTP 502"));
        assert_eq!(state.highlight.active(), Some(&TaskId::from("300001")));
    }

    #[test]
    fn test_file_load_drops_pending_search() {
        let mut state = AppState::new();
        let mut loader = AsyncLoader::new();
        let ctx = egui::Context::default();

        state.highlight.begin_search("300001");
        let missing = std::env::temp_dir().join("tasktree-missing-dump.json");
        ApplicationCoordinator::open_file(&mut state, &mut loader, missing, &ctx);
        assert!(state.highlight.pending().is_none());

        // A later unrelated fetch must not bring the old search back.
        loader.spawn_job(LoadOrigin::Api(TaskQuery::default()), None, || Ok(Vec::new()));
        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(5);
        while !ApplicationCoordinator::check_loading_completion(&mut state, &mut loader) {
            assert!(std::time::Instant::now() < deadline, "load never settled");
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
        assert!(state.highlight.active().is_none());
    }

    #[test]
    fn test_selection_toggle() {
        let mut state = AppState::new();
        ApplicationCoordinator::handle_task_selected(&mut state, TaskId::from("5"));
        assert!(state.selection.is_selected(&TaskId::from("5")));
        ApplicationCoordinator::handle_task_selected(&mut state, TaskId::from("5"));
        assert!(state.selection.selected_task().is_none());
    }
}
