//! Loaded records and everything derived from them.
//!
//! Owns the record set, the branch allow-list, the forest built from both,
//! the expand/collapse store and the virtual list layout. Any change to the
//! records or the allow-list rebuilds the forest from scratch and drops the
//! expand flags and row measurements with it.

use crate::io::LoadOrigin;
use tasktree::{Forest, NodeIndex, TaskId, TaskRecord, TreeStore, VirtualList};

#[derive(Debug, Default)]
pub struct TaskState {
    records: Vec<TaskRecord>,
    origin: Option<LoadOrigin>,
    /// Branch names currently enabled in the header chips
    enabled_branches: Vec<String>,
    forest: Forest,
    store: TreeStore,
    list: VirtualList,
    /// Last scroll offset of the virtualized list
    scroll_offset: f32,
    /// Last viewport height of the virtualized list
    viewport_height: f32,
    /// Bumped on every forest rebuild
    revision: u64,
}

impl TaskState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the record set. Every branch starts enabled.
    pub fn load(&mut self, records: Vec<TaskRecord>, origin: LoadOrigin) {
        self.records = records;
        self.origin = Some(origin);
        self.enabled_branches.clear();
        self.rebuild();
        self.enabled_branches = self.forest.all_branches().to_vec();
    }

    /// Drops the record set (e.g. after a failed fetch).
    pub fn clear(&mut self) {
        self.records.clear();
        self.origin = None;
        self.enabled_branches.clear();
        self.rebuild();
    }

    fn rebuild(&mut self) {
        // An empty allow-list selects every branch.
        self.forest = Forest::build(&self.records, Some(self.enabled_branches.as_slice()));
        self.store = TreeStore::new(&self.forest);
        self.list.reset();
        self.scroll_offset = 0.0;
        self.revision += 1;
        tracing::info!(
            records = self.records.len(),
            branches = self.forest.roots().len(),
            visible = self.store.visible().len(),
            "task tree rebuilt"
        );
    }

    // ===== Queries =====

    pub fn records(&self) -> &[TaskRecord] {
        &self.records
    }

    pub fn has_records(&self) -> bool {
        !self.records.is_empty()
    }

    pub fn origin(&self) -> Option<&LoadOrigin> {
        self.origin.as_ref()
    }

    pub fn forest(&self) -> &Forest {
        &self.forest
    }

    pub fn store(&self) -> &TreeStore {
        &self.store
    }

    pub fn all_branches(&self) -> &[String] {
        self.forest.all_branches()
    }

    pub fn is_branch_enabled(&self, name: &str) -> bool {
        self.enabled_branches.iter().any(|b| b == name)
    }

    pub fn enabled_branch_count(&self) -> usize {
        self.enabled_branches.len()
    }

    pub fn scroll_offset(&self) -> f32 {
        self.scroll_offset
    }

    pub fn viewport_height(&self) -> f32 {
        self.viewport_height
    }

    /// Changes whenever the forest is rebuilt. Views that keep their own
    /// per-node state salt it with this so the state starts fresh.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Task node for `id`, loosely matched.
    pub fn find_task(&self, id: &TaskId) -> Option<NodeIndex> {
        self.forest.find_task(id)
    }

    /// Record of the task node for `id`.
    pub fn task_record(&self, id: &TaskId) -> Option<&TaskRecord> {
        self.find_task(id).and_then(|idx| self.forest.node(idx).task())
    }

    // ===== Mutations =====

    /// Enables or disables a branch chip and rebuilds the forest.
    pub fn toggle_branch(&mut self, name: &str) {
        if let Some(pos) = self.enabled_branches.iter().position(|b| b == name) {
            self.enabled_branches.remove(pos);
        } else if self.forest.all_branches().iter().any(|b| b == name) {
            self.enabled_branches.push(name.to_string());
            self.enabled_branches.sort();
        } else {
            return;
        }
        self.rebuild();
    }

    /// Toggles the node with key `key`. The whole offset table is invalidated
    /// since the visible rows changed.
    pub fn toggle(&mut self, key: &str) -> bool {
        let changed = self.store.toggle(&self.forest, key);
        if changed {
            self.list.invalidate_all();
        }
        changed
    }

    pub fn set_scroll(&mut self, offset: f32, viewport_height: f32) {
        self.scroll_offset = offset;
        self.viewport_height = viewport_height;
    }

    /// Split borrow for the virtualized renderer.
    pub fn layout_parts(&mut self) -> (&Forest, &TreeStore, &mut VirtualList) {
        (&self.forest, &self.store, &mut self.list)
    }
}
