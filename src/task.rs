//! Task records and canonical identifiers.
//!
//! Task records arrive as loosely-typed JSON objects. Identifiers, branch names
//! and `prev` references are coerced to canonical strings exactly once, when a
//! [`TaskRecord`] is built from its JSON value. Everything downstream compares
//! those canonical strings only.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use serde_json::{Map, Value};
use std::fmt;

/// Branch bucket used for records that carry no branch name.
pub const UNKNOWN_BRANCH: &str = "unknown";

/// Fields probed (in order) when looking for a displayable date.
const DATE_FIELDS: &[&str] = &[
    "date",
    "time",
    "created_at",
    "finished_at",
    "updated_at",
    "buildtime",
    "ts",
];

/// Numeric timestamps above this are milliseconds, below it seconds.
const MILLIS_THRESHOLD: f64 = 1e12;

/// Placeholder shown when a value is missing.
pub const MISSING: &str = "—";

/// Canonical string form of a task identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(String);

impl TaskId {
    /// Coerces a JSON scalar into a canonical id.
    ///
    /// Strings are kept as-is, numbers use their shortest integral form when
    /// they have no fractional part, booleans become `"true"`/`"false"`.
    /// `null`, empty strings, arrays and objects yield `None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        let text = coerce_scalar(value)?;
        if text.is_empty() {
            None
        } else {
            Some(TaskId(text))
        }
    }

    /// Builds an id from user input (e.g. the search box), trimming whitespace.
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(TaskId(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Loose equality: identical strings, or both sides denote the same number.
    ///
    /// This lets `"399129"` match `399129.0` or `" 399129"`-style values that
    /// reached us through different paths. Whole numbers are compared exactly,
    /// so ids beyond `f64` precision stay distinct.
    pub fn loosely_eq(&self, other: &TaskId) -> bool {
        if self.0 == other.0 {
            return true;
        }
        match (integral_value(&self.0), integral_value(&other.0)) {
            (Some(a), Some(b)) => a == b,
            (Some(_), None) | (None, Some(_)) => false,
            (None, None) => match (self.0.trim().parse::<f64>(), other.0.trim().parse::<f64>()) {
                (Ok(a), Ok(b)) => a.is_finite() && a.fract() != 0.0 && a == b,
                _ => false,
            },
        }
    }
}

/// Exact value of a whole number written as `N`, `N.` or `N.000`.
fn integral_value(text: &str) -> Option<i128> {
    let text = text.trim();
    let (whole, fraction) = text.split_once('.').unwrap_or((text, ""));
    if !fraction.bytes().all(|b| b == b'0') {
        return None;
    }
    whole.parse().ok()
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        TaskId(s.to_string())
    }
}

impl From<u64> for TaskId {
    fn from(n: u64) -> Self {
        TaskId(n.to_string())
    }
}

/// String form of a JSON scalar, `None` for null and containers.
fn coerce_scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i.to_string())
            } else if let Some(u) = n.as_u64() {
                Some(u.to_string())
            } else {
                let f = n.as_f64()?;
                if f.fract() == 0.0 && f.abs() < 9.007_199_254_740_992e15 {
                    Some((f as i64).to_string())
                } else {
                    Some(f.to_string())
                }
            }
        }
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// A single build-task entry.
///
/// `id`, `branch` and `prev` are the canonical forms; `fields` keeps the raw
/// object for display (dates, commit metadata, anything else the API sends).
#[derive(Debug, Clone, PartialEq)]
pub struct TaskRecord {
    id: Option<TaskId>,
    branch: String,
    prev: Option<TaskId>,
    fields: Map<String, Value>,
}

impl TaskRecord {
    /// Builds a record from an arbitrary JSON value.
    ///
    /// Non-object values produce a record without id, which the forest builder
    /// skips.
    pub fn from_json(value: Value) -> Self {
        let fields = match value {
            Value::Object(map) => map,
            _ => Map::new(),
        };

        let id = fields.get("id").and_then(TaskId::from_value);
        let branch = fields
            .get("branch")
            .and_then(coerce_scalar)
            .unwrap_or_else(|| UNKNOWN_BRANCH.to_string());
        let prev = fields.get("prev").and_then(TaskId::from_value);

        Self {
            id,
            branch,
            prev,
            fields,
        }
    }

    /// Canonical id, `None` when the record is unidentifiable.
    pub fn id(&self) -> Option<&TaskId> {
        self.id.as_ref()
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    /// Canonical previous-task reference.
    pub fn prev(&self) -> Option<&TaskId> {
        self.prev.as_ref()
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// The raw JSON object this record was built from.
    pub fn to_json(&self) -> Value {
        Value::Object(self.fields.clone())
    }

    /// Raw `prev` value as displayed in rows (`—` when absent).
    pub fn prev_label(&self) -> String {
        self.prev
            .as_ref()
            .map(|p| p.to_string())
            .unwrap_or_else(|| MISSING.to_string())
    }

    /// First parseable date among the known date fields, in local time.
    pub fn display_date(&self) -> String {
        DATE_FIELDS
            .iter()
            .filter_map(|key| self.fields.get(*key))
            .find_map(parse_date_value)
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| MISSING.to_string())
    }

    /// One display line per commit listed under `branch_commits`.
    ///
    /// Commits are either plain strings or objects with optional `hash`,
    /// `message` and `date` fields.
    pub fn commit_lines(&self) -> Vec<String> {
        let Some(Value::Object(branches)) = self.fields.get("branch_commits") else {
            return Vec::new();
        };

        let mut lines = Vec::new();
        for (branch, commits) in branches {
            let Value::Array(commits) = commits else {
                continue;
            };
            for commit in commits {
                match commit {
                    Value::String(s) => lines.push(format!("{}: {}", branch, s)),
                    Value::Object(obj) => {
                        let hash = obj.get("hash").and_then(Value::as_str).unwrap_or(MISSING);
                        let short = hash.get(..10).unwrap_or(hash);
                        let message = obj.get("message").and_then(Value::as_str).unwrap_or("");
                        match obj.get("date").and_then(Value::as_str) {
                            Some(date) => lines.push(format!("{}: {} {} ({})", branch, short, message, date)),
                            None => lines.push(format!("{}: {} {}", branch, short, message)),
                        }
                    }
                    _ => {}
                }
            }
        }
        lines
    }
}

/// Interprets a JSON date-ish value.
fn parse_date_value(value: &Value) -> Option<DateTime<Local>> {
    match value {
        Value::String(s) => parse_date_str(s),
        Value::Number(n) => {
            let raw = n.as_f64()?;
            let millis = if raw > MILLIS_THRESHOLD { raw } else { raw * 1000.0 };
            if !millis.is_finite() {
                return None;
            }
            Local.timestamp_millis_opt(millis as i64).single()
        }
        _ => None,
    }
}

fn parse_date_str(s: &str) -> Option<DateTime<Local>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Local.from_local_datetime(&naive).earliest();
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_id_coercion() {
        assert_eq!(TaskId::from_value(&json!(42)), Some(TaskId::from("42")));
        assert_eq!(TaskId::from_value(&json!("42")), Some(TaskId::from("42")));
        assert_eq!(TaskId::from_value(&json!(42.0)), Some(TaskId::from("42")));
        assert_eq!(TaskId::from_value(&json!(1.5)), Some(TaskId::from("1.5")));
        assert_eq!(TaskId::from_value(&json!(true)), Some(TaskId::from("true")));
        assert_eq!(TaskId::from_value(&json!(null)), None);
        assert_eq!(TaskId::from_value(&json!("")), None);
        assert_eq!(TaskId::from_value(&json!([1])), None);
    }

    #[test]
    fn test_loose_equality() {
        assert!(TaskId::from("399129").loosely_eq(&TaskId::from("399129")));
        assert!(TaskId::from("399129").loosely_eq(&TaskId::from("399129.0")));
        assert!(!TaskId::from("399129").loosely_eq(&TaskId::from("399130")));
        assert!(!TaskId::from("abc").loosely_eq(&TaskId::from("abd")));
    }

    #[test]
    fn test_loose_equality_is_exact_for_large_ids() {
        let a = TaskId::from("9007199254740993");
        let b = TaskId::from("9007199254740992");
        assert!(!a.loosely_eq(&b));
        assert!(a.loosely_eq(&TaskId::from("9007199254740993.0")));
        assert!(TaskId::from("2.50").loosely_eq(&TaskId::from("2.5")));
        assert!(!TaskId::from("2.5").loosely_eq(&TaskId::from("2")));
    }

    #[test]
    fn test_record_defaults() {
        let record = TaskRecord::from_json(json!({"id": 7}));
        assert_eq!(record.id(), Some(&TaskId::from("7")));
        assert_eq!(record.branch(), UNKNOWN_BRANCH);
        assert_eq!(record.prev(), None);
        assert_eq!(record.prev_label(), MISSING);

        let null_branch = TaskRecord::from_json(json!({"id": 8, "branch": null, "prev": 7}));
        assert_eq!(null_branch.branch(), UNKNOWN_BRANCH);
        assert_eq!(null_branch.prev(), Some(&TaskId::from("7")));
    }

    #[test]
    fn test_non_object_record_has_no_id() {
        let record = TaskRecord::from_json(json!(5));
        assert_eq!(record.id(), None);
    }

    #[test]
    fn test_display_date() {
        let record = TaskRecord::from_json(json!({"id": 1, "date": "not a date", "time": "2024-03-01 10:20:30"}));
        assert_eq!(record.display_date(), "2024-03-01 10:20:30");

        let missing = TaskRecord::from_json(json!({"id": 1}));
        assert_eq!(missing.display_date(), MISSING);

        let seconds = TaskRecord::from_json(json!({"id": 1, "ts": 1_700_000_000}));
        let millis = TaskRecord::from_json(json!({"id": 1, "ts": 1_700_000_000_000u64}));
        assert_eq!(seconds.display_date(), millis.display_date());
        assert_ne!(seconds.display_date(), MISSING);
    }

    #[test]
    fn test_commit_lines() {
        let record = TaskRecord::from_json(json!({
            "id": 1,
            "branch_commits": {
                "sisyphus": ["abc123", {"hash": "0123456789abcdef", "message": "fix build", "date": "2024-01-01"}]
            }
        }));
        let lines = record.commit_lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "sisyphus: abc123");
        assert_eq!(lines[1], "sisyphus: 0123456789 fix build (2024-01-01)");
    }
}
