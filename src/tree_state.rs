//! Expand/collapse flags and the derived visible-row sequence.

use crate::forest::{Forest, NodeIndex};

/// Per-forest expansion state.
///
/// Holds one expand flag per node of the forest it was created for, plus the
/// ordered list of currently visible nodes. The store must be recreated
/// whenever the forest is rebuilt; flags never carry over.
#[derive(Debug, Clone, Default)]
pub struct TreeStore {
    /// Expand flag per node, indexed like the forest's node table
    expanded: Vec<bool>,
    /// Visible nodes in pre-order
    visible: Vec<NodeIndex>,
    /// Bumped every time the visible sequence is recomputed
    generation: u64,
}

impl TreeStore {
    /// Creates the store with default flags: branches expanded, tasks collapsed.
    pub fn new(forest: &Forest) -> Self {
        let expanded = forest.nodes().iter().map(|n| n.default_expanded()).collect();
        let mut store = Self {
            expanded,
            visible: Vec::new(),
            generation: 0,
        };
        store.recompute(forest);
        store
    }

    /// Visible nodes in render order.
    pub fn visible(&self) -> &[NodeIndex] {
        &self.visible
    }

    /// Visible node keys in render order.
    pub fn visible_keys<'f>(&self, forest: &'f Forest) -> Vec<&'f str> {
        self.visible.iter().map(|&idx| forest.node(idx).key()).collect()
    }

    pub fn is_expanded(&self, idx: NodeIndex) -> bool {
        self.expanded.get(idx).copied().unwrap_or(false)
    }

    /// Counter that changes whenever the visible sequence changes.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Position of `idx` in the visible sequence.
    pub fn row_of(&self, idx: NodeIndex) -> Option<usize> {
        self.visible.iter().position(|&v| v == idx)
    }

    /// Flips the expand flag of the node with key `key`.
    ///
    /// Returns `false` (and changes nothing) for unknown keys and for nodes
    /// without children.
    pub fn toggle(&mut self, forest: &Forest, key: &str) -> bool {
        match forest.index_of(key) {
            Some(idx) => self.toggle_node(forest, idx),
            None => false,
        }
    }

    /// Index-based variant of [`TreeStore::toggle`].
    pub fn toggle_node(&mut self, forest: &Forest, idx: NodeIndex) -> bool {
        let has_children = forest.get(idx).is_some_and(|n| n.has_children());
        if !has_children || idx >= self.expanded.len() {
            return false;
        }
        self.expanded[idx] = !self.expanded[idx];
        self.recompute(forest);
        true
    }

    /// Pre-order walk from the branch nodes; children are visited only below
    /// expanded nodes.
    fn recompute(&mut self, forest: &Forest) {
        self.visible.clear();
        let mut stack: Vec<NodeIndex> = forest.roots().iter().rev().copied().collect();
        while let Some(idx) = stack.pop() {
            self.visible.push(idx);
            if self.expanded[idx] {
                stack.extend(forest.node(idx).children().iter().rev().copied());
            }
        }
        self.generation += 1;
    }
}
