//! Deterministic synthetic task sets.
//!
//! Produces records shaped like the task history API: `prev` chains per
//! branch, dates, and `branch_commits` metadata. A few records point at a task
//! on another branch or at a task that does not exist, so the forest's edge
//! cases show up in every generated set.

use crate::task::TaskRecord;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{json, Map, Value};

const DEFAULT_COUNT: usize = 500;
const DEFAULT_BRANCHES: usize = 4;
const DEFAULT_SEED: u64 = 42;

/// Identifier of the first generated task.
const FIRST_TASK_ID: u64 = 300_000;
/// Start of the generated date range (2023-11-14).
const BASE_EPOCH_SECS: i64 = 1_700_000_000;

const BRANCH_NAMES: &[&str] = &["sisyphus", "p11", "p10", "p9", "c10f2", "sisyphus_e2k"];

const COMMIT_MESSAGES: &[&str] = &[
    "update to new upstream release",
    "fix build with gcc 14",
    "update changelog",
    "rebuild with new python",
    "backport security fix",
    "enable tests",
];

const TASK_STATES: &[&str] = &["DONE", "EPERM", "FAILED", "TESTED"];

/// Share of records that start a new chain.
const ROOT_RATIO: f64 = 0.15;
/// Share of records whose `prev` points to another branch.
const CROSS_BRANCH_RATIO: f64 = 0.03;
/// Share of records whose `prev` points nowhere.
const DANGLING_RATIO: f64 = 0.02;
/// Share of records carrying commit metadata.
const COMMITS_RATIO: f64 = 0.3;

pub struct SyntheticGenerator {
    count: usize,
    branches: usize,
    seed: u64,
}

impl Default for SyntheticGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntheticGenerator {
    pub fn new() -> Self {
        Self {
            count: DEFAULT_COUNT,
            branches: DEFAULT_BRANCHES,
            seed: DEFAULT_SEED,
        }
    }

    /// # Arguments
    /// * `count` - Number of task records
    /// * `branches` - Number of distinct branches (at least one is used)
    /// * `seed` - RNG seed; equal seeds give equal sets
    pub fn with_config(count: usize, branches: usize, seed: u64) -> Self {
        Self {
            count,
            branches: branches.max(1),
            seed,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn branch_names(&self) -> Vec<String> {
        (0..self.branches)
            .map(|i| match BRANCH_NAMES.get(i) {
                Some(name) => name.to_string(),
                None => format!("branch_{}", i),
            })
            .collect()
    }

    pub fn generate(&self) -> Vec<TaskRecord> {
        self.generate_json().into_iter().map(TaskRecord::from_json).collect()
    }

    /// Raw JSON objects, as the API would return them.
    pub fn generate_json(&self) -> Vec<Value> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let branches = self.branch_names();
        // Ids generated so far, per branch
        let mut per_branch: Vec<Vec<u64>> = vec![Vec::new(); branches.len()];
        let mut all_ids: Vec<u64> = Vec::with_capacity(self.count);
        let mut records = Vec::with_capacity(self.count);

        for i in 0..self.count {
            let id = FIRST_TASK_ID + i as u64;
            let branch_idx = rng.gen_range(0..branches.len());
            let branch = &branches[branch_idx];

            let roll: f64 = rng.gen();
            let prev = if roll < DANGLING_RATIO {
                Some(json!(FIRST_TASK_ID - 1 - rng.gen_range(0..1000u64)))
            } else if roll < DANGLING_RATIO + CROSS_BRANCH_RATIO && !all_ids.is_empty() {
                let other = all_ids[rng.gen_range(0..all_ids.len())];
                Some(json!(other))
            } else if roll < DANGLING_RATIO + CROSS_BRANCH_RATIO + ROOT_RATIO
                || per_branch[branch_idx].is_empty()
            {
                None
            } else {
                // Mostly extend recent work so chains get deep.
                let own = &per_branch[branch_idx];
                let window = own.len().min(8);
                let pick = own[own.len() - 1 - rng.gen_range(0..window)];
                Some(json!(pick))
            };

            let mut fields = Map::new();
            fields.insert("id".to_string(), json!(id));
            fields.insert("branch".to_string(), json!(branch));
            fields.insert("prev".to_string(), prev.unwrap_or(Value::Null));

            let secs = BASE_EPOCH_SECS + (i as i64) * 600 + rng.gen_range(0..600);
            if rng.gen_bool(0.5) {
                fields.insert("ts".to_string(), json!(secs * 1000));
            } else if let Some(dt) = chrono::DateTime::from_timestamp(secs, 0) {
                fields.insert("date".to_string(), json!(dt.to_rfc3339()));
            }

            fields.insert("owner".to_string(), json!(format!("maintainer{}", rng.gen_range(1..=20))));
            let state = TASK_STATES[rng.gen_range(0..TASK_STATES.len())];
            fields.insert("state".to_string(), json!(state));

            if rng.gen_bool(COMMITS_RATIO) {
                fields.insert("branch_commits".to_string(), generate_commits(&mut rng, branch, secs));
            }

            per_branch[branch_idx].push(id);
            all_ids.push(id);
            records.push(Value::Object(fields));
        }

        tracing::debug!(count = records.len(), seed = self.seed, "generated synthetic tasks");
        records
    }
}

fn generate_commits(rng: &mut StdRng, branch: &str, secs: i64) -> Value {
    let count = rng.gen_range(1..=3);
    let commits: Vec<Value> = (0..count)
        .map(|_| {
            let hash: String = (0..40)
                .map(|_| char::from_digit(rng.gen_range(0..16), 16).unwrap_or('0'))
                .collect();
            let message = COMMIT_MESSAGES[rng.gen_range(0..COMMIT_MESSAGES.len())];
            let date = chrono::DateTime::from_timestamp(secs, 0)
                .map(|dt| dt.format("%Y-%m-%d").to_string())
                .unwrap_or_default();
            json!({"hash": hash, "message": message, "date": date})
        })
        .collect();

    let mut map = Map::new();
    map.insert(branch.to_string(), Value::Array(commits));
    Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forest::Forest;
    use std::collections::HashSet;

    #[test]
    fn test_deterministic_for_seed() {
        let a = SyntheticGenerator::with_config(200, 3, 7).generate_json();
        let b = SyntheticGenerator::with_config(200, 3, 7).generate_json();
        let c = SyntheticGenerator::with_config(200, 3, 8).generate_json();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_count_and_unique_ids() {
        let records = SyntheticGenerator::with_config(300, 4, 42).generate();
        assert_eq!(records.len(), 300);
        let ids: HashSet<_> = records.iter().filter_map(|r| r.id()).collect();
        assert_eq!(ids.len(), 300);
    }

    #[test]
    fn test_branches_bounded() {
        let generator = SyntheticGenerator::with_config(300, 2, 42);
        let names: HashSet<String> = generator.branch_names().into_iter().collect();
        for record in generator.generate() {
            assert!(names.contains(record.branch()));
        }
        assert_eq!(SyntheticGenerator::with_config(10, 0, 1).branch_names().len(), 1);
        assert_eq!(SyntheticGenerator::with_config(10, 8, 1).branch_names()[7], "branch_7");
    }

    #[test]
    fn test_builds_a_forest_with_every_task_as_a_node() {
        let records = SyntheticGenerator::new().generate();
        let forest = Forest::build(&records, None);
        assert_eq!(forest.task_count(), records.len());
        assert!(forest.unreachable().len() < records.len() / 4);
        assert!(forest.roots().len() <= DEFAULT_BRANCHES);
    }

    #[test]
    fn test_dates_are_displayable() {
        let records = SyntheticGenerator::with_config(50, 2, 42).generate();
        assert!(records.iter().all(|r| r.display_date() != crate::task::MISSING));
    }
}
