//! Search-driven highlight and scroll targeting.
//!
//! A search does not look through the current forest. It clears the current
//! highlight and asks for a fresh fetch scoped to the searched id; once that
//! fetch settles the id becomes the highlight. Matching against task nodes is
//! loose, so `399129` and `"399129"` are the same task.
//!
//! Ancestors of the highlighted node are not expanded automatically. When the
//! node is hidden under a collapsed branch or task, there is nothing to
//! scroll to.

use crate::client::TaskQuery;
use crate::forest::{Forest, NodeIndex};
use crate::task::TaskId;
use crate::tree_state::TreeStore;
use crate::virtual_list::VirtualList;

#[derive(Debug, Clone, Default)]
pub struct HighlightController {
    /// Id searched for, waiting on its fetch
    pending: Option<TaskId>,
    /// Id currently marked
    active: Option<TaskId>,
    /// Set when a new highlight should be scrolled into view once
    scroll_requested: bool,
}

impl HighlightController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a search for `input`.
    ///
    /// Clears the current highlight and returns the query to fetch, or `None`
    /// when the input holds no id.
    pub fn begin_search(&mut self, input: &str) -> Option<TaskQuery> {
        let id = TaskId::parse(input)?;
        self.active = None;
        self.scroll_requested = false;
        let query = TaskQuery::for_task(&id);
        self.pending = Some(id);
        Some(query)
    }

    /// Called when the fetch started by [`begin_search`](Self::begin_search)
    /// settles, successfully or not. The searched id becomes the highlight.
    pub fn on_fetch_complete(&mut self) {
        if let Some(id) = self.pending.take() {
            self.active = Some(id);
            self.scroll_requested = true;
        }
    }

    /// Drops any highlight and pending search.
    pub fn clear(&mut self) {
        self.pending = None;
        self.active = None;
        self.scroll_requested = false;
    }

    pub fn active(&self) -> Option<&TaskId> {
        self.active.as_ref()
    }

    pub fn pending(&self) -> Option<&TaskId> {
        self.pending.as_ref()
    }

    /// Whether a task with id `id` should be drawn highlighted.
    pub fn is_highlighted(&self, id: &TaskId) -> bool {
        self.active.as_ref().is_some_and(|active| active.loosely_eq(id))
    }

    /// Task node matching the highlight in `forest`.
    pub fn highlighted_node(&self, forest: &Forest) -> Option<NodeIndex> {
        forest.find_task(self.active.as_ref()?)
    }

    /// One-shot scroll target for a fresh highlight.
    ///
    /// Returns the new scroll offset if the highlighted row is visible and
    /// not already fully in view. The request is consumed once the row is
    /// visible (scrolled to or not); a hidden row keeps nothing pending.
    pub fn take_scroll_target(
        &mut self,
        forest: &Forest,
        store: &TreeStore,
        list: &mut VirtualList,
        scroll: f32,
        viewport: f32,
    ) -> Option<f32> {
        if !self.scroll_requested {
            return None;
        }
        self.scroll_requested = false;

        let node = self.highlighted_node(forest)?;
        let row = store.row_of(node)?;
        let keys = store.visible_keys(forest);
        list.scroll_to_reveal(&keys, row, scroll, viewport)
    }
}
