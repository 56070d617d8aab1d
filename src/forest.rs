//! Forest construction from flat task records.
//!
//! The forest is a flat node table: every node lives in one `Vec`, children are
//! stored as indices into that table, and lookups by node key go through a
//! side index. Nothing holds references into the table, so traversals are
//! plain index walks with an explicit stack.
//!
//! Linking rules:
//! - A task whose `prev` names an id that exists anywhere in the input has a
//!   parent. It is attached under that parent only when the parent sits in the
//!   same branch bucket.
//! - A task whose parent exists only in another branch is neither a root nor a
//!   child. It stays in the table, unreachable from any branch, and is listed
//!   by [`Forest::unreachable`].
//! - Depth is computed by walking same-branch ancestors, bounded by
//!   [`MAX_DEPTH_HOPS`], so reference loops still terminate.

use crate::task::{TaskId, TaskRecord};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Maximum number of ancestor hops followed when computing a task's depth.
pub const MAX_DEPTH_HOPS: usize = 50;

/// Index of a node in the forest's node table.
pub type NodeIndex = usize;

/// Node key for a branch node.
pub fn branch_key(name: &str) -> String {
    format!("branch:{}", name)
}

/// Node key for a task node.
pub fn task_key(id: &TaskId) -> String {
    format!("task:{}", id)
}

/// Node key for a task whose id was reused by a later record in another
/// branch. The later record owns the plain [`task_key`].
pub fn shadowed_task_key(id: &TaskId, branch: &str) -> String {
    format!("task:{}@{}", id, branch)
}

/// Branch or task payload of a forest node.
#[derive(Debug, Clone)]
pub enum NodeKind {
    Branch {
        name: String,
    },
    Task {
        record: TaskRecord,
        /// Parent task node, `None` for roots and for unattached tasks.
        parent: Option<NodeIndex>,
        /// Branch node this task was bucketed under.
        branch: NodeIndex,
        /// 1 for root tasks under a branch.
        depth: usize,
    },
}

/// A single entry in the forest's node table.
#[derive(Debug, Clone)]
pub struct ForestNode {
    key: String,
    kind: NodeKind,
    children: Vec<NodeIndex>,
}

impl ForestNode {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn children(&self) -> &[NodeIndex] {
        &self.children
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn is_branch(&self) -> bool {
        matches!(self.kind, NodeKind::Branch { .. })
    }

    /// Branch nodes start expanded, task nodes collapsed.
    pub fn default_expanded(&self) -> bool {
        self.is_branch()
    }

    /// Depth in the tree (0 for branch nodes).
    pub fn depth(&self) -> usize {
        match &self.kind {
            NodeKind::Branch { .. } => 0,
            NodeKind::Task { depth, .. } => *depth,
        }
    }

    pub fn task(&self) -> Option<&TaskRecord> {
        match &self.kind {
            NodeKind::Task { record, .. } => Some(record),
            NodeKind::Branch { .. } => None,
        }
    }

    /// Canonical id of the underlying task, if this is a task node.
    pub fn task_id(&self) -> Option<&TaskId> {
        self.task().and_then(TaskRecord::id)
    }

    pub fn parent(&self) -> Option<NodeIndex> {
        match &self.kind {
            NodeKind::Task { parent, .. } => *parent,
            NodeKind::Branch { .. } => None,
        }
    }

    /// Branch name for branch nodes, the record's branch for task nodes.
    pub fn branch_name(&self) -> &str {
        match &self.kind {
            NodeKind::Branch { name } => name,
            NodeKind::Task { record, .. } => record.branch(),
        }
    }
}

/// Branch-rooted trees built from one record set and branch filter.
#[derive(Debug, Clone, Default)]
pub struct Forest {
    nodes: Vec<ForestNode>,
    /// Branch nodes in sorted name order
    roots: Vec<NodeIndex>,
    index: HashMap<String, NodeIndex>,
    /// Task nodes not reachable from their branch node
    unreachable: Vec<NodeIndex>,
    /// Every distinct branch in the input, sorted, before filtering
    all_branches: Vec<String>,
    /// Records dropped because they had no usable id
    skipped: usize,
}

impl Forest {
    /// Builds the forest for `records`, keeping only branches in `branch_filter`
    /// when it is given and non-empty.
    ///
    /// Records without a usable id are skipped. Duplicate ids are resolved per
    /// branch bucket: within a bucket the last record wins and takes the
    /// position of that last occurrence. A duplicate living in another bucket
    /// stays in its own bucket, keyed by [`shadowed_task_key`]; the plain
    /// `task:<id>` key belongs to the bucket of the id's last record overall.
    pub fn build(records: &[TaskRecord], branch_filter: Option<&[String]>) -> Self {
        let mut last_in_bucket: HashMap<(&str, &TaskId), usize> = HashMap::new();
        let mut owner: HashMap<&TaskId, &str> = HashMap::new();
        let mut skipped = 0;
        for (pos, record) in records.iter().enumerate() {
            match record.id() {
                Some(id) => {
                    last_in_bucket.insert((record.branch(), id), pos);
                    owner.insert(id, record.branch());
                }
                None => skipped += 1,
            }
        }

        // Existence and branch lookups cover the whole input, not just the
        // selected branches.
        let mut by_branch: BTreeMap<&str, Vec<&TaskRecord>> = BTreeMap::new();
        for (pos, record) in records.iter().enumerate() {
            let Some(id) = record.id() else { continue };
            if last_in_bucket.get(&(record.branch(), id)) != Some(&pos) {
                continue;
            }
            by_branch.entry(record.branch()).or_default().push(record);
        }

        let all_branches: Vec<String> = by_branch.keys().map(|b| b.to_string()).collect();
        let allowed: Option<HashSet<&str>> = branch_filter
            .filter(|f| !f.is_empty())
            .map(|f| f.iter().map(String::as_str).collect());

        let mut forest = Forest {
            all_branches,
            skipped,
            ..Default::default()
        };

        for (branch, tasks) in &by_branch {
            if let Some(allowed) = &allowed {
                if !allowed.contains(branch) {
                    continue;
                }
            }
            forest.add_branch(branch, tasks, &owner);
        }

        tracing::debug!(
            branches = forest.roots.len(),
            nodes = forest.nodes.len(),
            unreachable = forest.unreachable.len(),
            skipped = forest.skipped,
            "forest built"
        );

        forest
    }

    /// `owner` maps every id in the input to the branch of its last record.
    fn add_branch(&mut self, name: &str, tasks: &[&TaskRecord], owner: &HashMap<&TaskId, &str>) {
        let branch_idx = self.push_node(
            branch_key(name),
            NodeKind::Branch {
                name: name.to_string(),
            },
        );
        self.roots.push(branch_idx);

        // Declared parent, if it exists anywhere in the input.
        let mut parent_of: HashMap<&TaskId, Option<&TaskId>> = HashMap::with_capacity(tasks.len());
        for task in tasks {
            if let Some(id) = task.id() {
                let prev = task.prev().filter(|p| owner.contains_key(p));
                parent_of.insert(id, prev);
            }
        }

        let mut local: HashMap<&TaskId, NodeIndex> = HashMap::with_capacity(tasks.len());
        for task in tasks {
            let Some(id) = task.id() else { continue };
            let key = if owner.get(id) == Some(&name) {
                task_key(id)
            } else {
                shadowed_task_key(id, name)
            };
            let idx = self.push_node(
                key,
                NodeKind::Task {
                    record: (*task).clone(),
                    parent: None,
                    branch: branch_idx,
                    depth: 1,
                },
            );
            local.insert(id, idx);
        }

        for task in tasks {
            let Some(id) = task.id() else { continue };
            let idx = local[id];
            let declared = parent_of.get(id).copied().flatten();

            match declared {
                None => self.nodes[branch_idx].children.push(idx),
                Some(parent_id) => {
                    if let Some(&parent_idx) = local.get(parent_id) {
                        self.nodes[parent_idx].children.push(idx);
                        if let NodeKind::Task { parent, .. } = &mut self.nodes[idx].kind {
                            *parent = Some(parent_idx);
                        }
                    }
                }
            }

            let depth = bounded_depth(id, &parent_of, &local);
            if let NodeKind::Task { depth: d, .. } = &mut self.nodes[idx].kind {
                *d = depth;
            }
        }

        let reached = self.reachable_from(branch_idx);
        for task in tasks {
            let Some(id) = task.id() else { continue };
            let idx = local[id];
            if !reached.contains(&idx) {
                self.unreachable.push(idx);
            }
        }
    }

    fn push_node(&mut self, key: String, kind: NodeKind) -> NodeIndex {
        let idx = self.nodes.len();
        self.index.insert(key.clone(), idx);
        self.nodes.push(ForestNode {
            key,
            kind,
            children: Vec::new(),
        });
        idx
    }

    /// Every node reachable from `start` (inclusive).
    fn reachable_from(&self, start: NodeIndex) -> HashSet<NodeIndex> {
        let mut seen = HashSet::new();
        let mut stack = vec![start];
        while let Some(idx) = stack.pop() {
            if !seen.insert(idx) {
                continue;
            }
            stack.extend(self.nodes[idx].children.iter().copied());
        }
        seen
    }

    // ===== Queries =====

    pub fn node(&self, idx: NodeIndex) -> &ForestNode {
        &self.nodes[idx]
    }

    pub fn get(&self, idx: NodeIndex) -> Option<&ForestNode> {
        self.nodes.get(idx)
    }

    /// Looks up a node by its key (`branch:<name>` or `task:<id>`).
    pub fn index_of(&self, key: &str) -> Option<NodeIndex> {
        self.index.get(key).copied()
    }

    /// Looks up the task node for `id`, falling back to loose id matching.
    pub fn find_task(&self, id: &TaskId) -> Option<NodeIndex> {
        if let Some(idx) = self.index_of(&task_key(id)) {
            return Some(idx);
        }
        self.nodes
            .iter()
            .position(|n| n.task_id().is_some_and(|tid| tid.loosely_eq(id)))
    }

    /// Branch nodes, in sorted branch-name order.
    pub fn roots(&self) -> &[NodeIndex] {
        &self.roots
    }

    pub fn nodes(&self) -> &[ForestNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn task_count(&self) -> usize {
        self.nodes.len() - self.roots.len()
    }

    /// Task nodes that cannot be reached from any branch node.
    ///
    /// These are tasks whose parent lives in a different branch, and tasks
    /// caught in reference loops.
    pub fn unreachable(&self) -> &[NodeIndex] {
        &self.unreachable
    }

    /// All distinct branch names of the input, sorted, regardless of filter.
    pub fn all_branches(&self) -> &[String] {
        &self.all_branches
    }

    /// Number of input records dropped for lacking an id.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Chain of ancestors from the branch node down to `idx` (exclusive).
    pub fn ancestors(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut chain = Vec::new();
        let NodeKind::Task { branch, .. } = &self.nodes[idx].kind else {
            return chain;
        };
        let branch = *branch;
        let mut current = self.nodes[idx].parent();
        while let Some(p) = current {
            if chain.len() > MAX_DEPTH_HOPS {
                break;
            }
            chain.push(p);
            current = self.nodes[p].parent();
        }
        chain.push(branch);
        chain.reverse();
        chain
    }
}

/// Depth of `id` by walking same-branch ancestors, at most [`MAX_DEPTH_HOPS`] hops.
fn bounded_depth(
    id: &TaskId,
    parent_of: &HashMap<&TaskId, Option<&TaskId>>,
    local: &HashMap<&TaskId, NodeIndex>,
) -> usize {
    let mut depth = 1;
    let mut hops = 0;
    let mut current = parent_of.get(id).copied().flatten();
    while let Some(ancestor) = current {
        if hops >= MAX_DEPTH_HOPS || !local.contains_key(ancestor) {
            break;
        }
        depth += 1;
        hops += 1;
        current = parent_of.get(ancestor).copied().flatten();
    }
    depth
}
