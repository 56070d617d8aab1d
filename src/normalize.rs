//! Turns API payloads of various shapes into an ordered list of task records.

use crate::task::TaskRecord;
use serde_json::Value;

/// Extracts task records from a successful response payload.
///
/// Accepted shapes, tried in order:
/// - a bare array
/// - an object with an array `tasks` field
/// - an object with an array `list` field
/// - an object whose first array-valued field (in document order) holds the tasks
///
/// Anything else yields an empty list.
pub fn normalize_payload(payload: Value) -> Vec<TaskRecord> {
    let items = match payload {
        Value::Array(items) => items,
        Value::Object(mut map) => {
            if matches!(map.get("tasks"), Some(Value::Array(_))) {
                take_array(map.remove("tasks"))
            } else if matches!(map.get("list"), Some(Value::Array(_))) {
                take_array(map.remove("list"))
            } else {
                let first_key = map
                    .iter()
                    .find(|(_, v)| v.is_array())
                    .map(|(k, _)| k.clone());
                match first_key {
                    Some(key) => take_array(map.remove(&key)),
                    None => Vec::new(),
                }
            }
        }
        _ => Vec::new(),
    };

    items.into_iter().map(TaskRecord::from_json).collect()
}

fn take_array(value: Option<Value>) -> Vec<Value> {
    match value {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ids(records: &[TaskRecord]) -> Vec<String> {
        records
            .iter()
            .map(|r| r.id().map(|id| id.to_string()).unwrap_or_default())
            .collect()
    }

    #[test]
    fn test_bare_array() {
        let records = normalize_payload(json!([{"id": 1}, {"id": 2}]));
        assert_eq!(ids(&records), vec!["1", "2"]);
    }

    #[test]
    fn test_tasks_field_preferred() {
        let records = normalize_payload(json!({"other": [{"id": 9}], "tasks": [{"id": 1}]}));
        assert_eq!(ids(&records), vec!["1"]);
    }

    #[test]
    fn test_list_field() {
        let records = normalize_payload(json!({"length": 1, "list": [{"id": "x"}]}));
        assert_eq!(ids(&records), vec!["x"]);
    }

    #[test]
    fn test_first_array_field_in_document_order() {
        let records = normalize_payload(json!({"meta": {"n": 2}, "zeta": [{"id": 3}], "alpha": [{"id": 4}]}));
        assert_eq!(ids(&records), vec!["3"]);
    }

    #[test]
    fn test_tasks_not_array_falls_through() {
        let records = normalize_payload(json!({"tasks": "none", "items": [{"id": 5}]}));
        assert_eq!(ids(&records), vec!["5"]);
    }

    #[test]
    fn test_unrecognized_shapes() {
        assert!(normalize_payload(json!({"count": 0})).is_empty());
        assert!(normalize_payload(json!(null)).is_empty());
        assert!(normalize_payload(json!("text")).is_empty());
    }

    #[test]
    fn test_malformed_items_are_kept_without_id() {
        let records = normalize_payload(json!([{"id": 1}, 17, {"branch": "p10"}]));
        assert_eq!(records.len(), 3);
        assert!(records[1].id().is_none());
        assert!(records[2].id().is_none());
    }
}
