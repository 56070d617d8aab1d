//! HTTP client for the task history endpoint.
//!
//! The endpoint rejects query parameters it does not know with a 400 whose
//! body names them (`Unknown arguments: project, offset`). The client strips
//! exactly those parameters and retries, a bounded number of times, before
//! giving up.

use crate::normalize::normalize_payload;
use crate::task::{TaskId, TaskRecord};
use anyhow::{anyhow, bail, Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::time::Duration;

/// Path of the task history endpoint below the API base URL.
pub const TASKS_PATH: &str = "/site/tasks_history";

/// Parameter cleanup rounds before the final attempt.
pub const MAX_CLEANUP_ROUNDS: usize = 3;

static UNKNOWN_ARGS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)Unknown arguments:\s*([^"}\]]+)"#).expect("static regex is valid")
});

/// Query parameters accepted by the task history endpoint.
///
/// Every field is optional; empty values are left out of the request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskQuery {
    pub task_id: Option<String>,
    pub project: Option<String>,
    pub branch: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl TaskQuery {
    /// Query scoped to a single task id.
    pub fn for_task(id: &TaskId) -> Self {
        Self {
            task_id: Some(id.to_string()),
            ..Default::default()
        }
    }

    /// Non-empty parameters as trimmed `(name, value)` pairs, in a fixed order.
    pub fn params(&self) -> Vec<(String, String)> {
        let candidates = [
            ("task_id", self.task_id.clone()),
            ("project", self.project.clone()),
            ("branch", self.branch.clone()),
            ("limit", self.limit.map(|n| n.to_string())),
            ("offset", self.offset.map(|n| n.to_string())),
        ];
        candidates
            .into_iter()
            .filter_map(|(name, value)| {
                let value = value?.trim().to_string();
                if value.is_empty() {
                    None
                } else {
                    Some((name.to_string(), value))
                }
            })
            .collect()
    }
}

/// Parameter names listed in an "Unknown arguments" error body.
pub fn parse_unknown_arguments(body: &str) -> Vec<String> {
    UNKNOWN_ARGS
        .captures(body)
        .and_then(|caps| caps.get(1))
        .map(|m| {
            m.as_str()
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

/// Outcome of one HTTP exchange that reached the server.
#[derive(Debug, Clone, PartialEq)]
pub enum HttpReply {
    /// 2xx with a decoded JSON body
    Success(Value),
    /// Non-success status
    Failure {
        status: u16,
        status_text: String,
        body: String,
    },
}

/// Performs a single GET. Transport-level failures are returned as errors.
pub trait Transport {
    fn get(&self, url: &str, params: &[(String, String)]) -> Result<HttpReply>;
}

/// Blocking transport backed by a `ureq` agent.
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
        }
    }
}

impl Transport for UreqTransport {
    fn get(&self, url: &str, params: &[(String, String)]) -> Result<HttpReply> {
        let mut request = self.agent.get(url).set("Accept", "application/json");
        for (name, value) in params {
            request = request.query(name, value);
        }

        match request.call() {
            Ok(response) => {
                let payload: Value = response
                    .into_json()
                    .context("Failed to decode JSON response")?;
                Ok(HttpReply::Success(payload))
            }
            Err(ureq::Error::Status(status, response)) => {
                let status_text = response.status_text().to_string();
                let body = response.into_string().unwrap_or_default();
                Ok(HttpReply::Failure {
                    status,
                    status_text,
                    body,
                })
            }
            Err(ureq::Error::Transport(transport)) => Err(anyhow!("Network error: {}", transport)),
        }
    }
}

/// Fetches task records from the history endpoint.
pub struct TaskClient<T: Transport = UreqTransport> {
    base_url: String,
    transport: T,
}

impl TaskClient<UreqTransport> {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self::with_transport(base_url, UreqTransport::new(timeout))
    }
}

impl<T: Transport> TaskClient<T> {
    pub fn with_transport(base_url: &str, transport: T) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, TASKS_PATH)
    }

    /// Fetches and normalizes the task records matching `query`.
    ///
    /// A 400 naming unknown parameters removes those parameters and retries,
    /// up to [`MAX_CLEANUP_ROUNDS`] times. Any other failure, or a 400 that
    /// names nothing we sent, ends the fetch with a single error.
    pub fn fetch_tasks(&self, query: &TaskQuery) -> Result<Vec<TaskRecord>> {
        let url = self.endpoint();
        let mut params = query.params();

        for round in 0..=MAX_CLEANUP_ROUNDS {
            tracing::debug!(%url, ?params, round, "requesting tasks");
            match self.transport.get(&url, &params)? {
                HttpReply::Success(payload) => {
                    let records = normalize_payload(payload);
                    tracing::info!(count = records.len(), "fetched task records");
                    return Ok(records);
                }
                HttpReply::Failure {
                    status,
                    status_text,
                    body,
                } => {
                    if status == 400 && round < MAX_CLEANUP_ROUNDS {
                        let unknown = parse_unknown_arguments(&body);
                        let before = params.len();
                        params.retain(|(name, _)| !unknown.contains(name));
                        if params.len() < before {
                            tracing::warn!(?unknown, "server rejected parameters, retrying without them");
                            continue;
                        }
                    }
                    bail!("HTTP {} — {}\n{}", status, status_text, body);
                }
            }
        }

        bail!("Giving up after {} parameter cleanup rounds", MAX_CLEANUP_ROUNDS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;

    /// Replays canned replies and records the parameters of every request.
    struct ScriptedTransport {
        replies: RefCell<Vec<Result<HttpReply>>>,
        requests: RefCell<Vec<Vec<(String, String)>>>,
    }

    impl ScriptedTransport {
        fn new(mut replies: Vec<Result<HttpReply>>) -> Self {
            replies.reverse();
            Self {
                replies: RefCell::new(replies),
                requests: RefCell::new(Vec::new()),
            }
        }

        fn param_names(&self) -> Vec<Vec<String>> {
            self.requests
                .borrow()
                .iter()
                .map(|p| p.iter().map(|(k, _)| k.clone()).collect())
                .collect()
        }
    }

    impl Transport for ScriptedTransport {
        fn get(&self, _url: &str, params: &[(String, String)]) -> Result<HttpReply> {
            self.requests.borrow_mut().push(params.to_vec());
            self.replies
                .borrow_mut()
                .pop()
                .unwrap_or_else(|| Err(anyhow!("no scripted reply left")))
        }
    }

    fn bad_request(body: &str) -> Result<HttpReply> {
        Ok(HttpReply::Failure {
            status: 400,
            status_text: "Bad Request".to_string(),
            body: body.to_string(),
        })
    }

    #[test]
    fn test_params_omit_empty_and_trim() {
        let query = TaskQuery {
            task_id: Some(" 399129 ".to_string()),
            project: Some("   ".to_string()),
            branch: None,
            limit: Some(50),
            offset: None,
        };
        assert_eq!(
            query.params(),
            vec![
                ("task_id".to_string(), "399129".to_string()),
                ("limit".to_string(), "50".to_string())
            ]
        );
    }

    #[test]
    fn test_parse_unknown_arguments() {
        let body = r#"{"message": "Unknown arguments: project, offset"}"#;
        assert_eq!(parse_unknown_arguments(body), vec!["project", "offset"]);
        assert!(parse_unknown_arguments("something else").is_empty());
    }

    #[test]
    fn test_success_is_normalized() {
        let transport = ScriptedTransport::new(vec![Ok(HttpReply::Success(json!({"tasks": [{"id": 1}]})))]);
        let client = TaskClient::with_transport("http://example.test/api/", transport);
        let records = client.fetch_tasks(&TaskQuery::default()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(client.endpoint(), "http://example.test/api/site/tasks_history");
    }

    #[test]
    fn test_unknown_arguments_are_stripped_and_retried() {
        let transport = ScriptedTransport::new(vec![
            bad_request(r#"{"message": "Unknown arguments: project"}"#),
            Ok(HttpReply::Success(json!([{"id": 7}]))),
        ]);
        let client = TaskClient::with_transport("http://example.test", transport);
        let query = TaskQuery {
            task_id: Some("7".to_string()),
            project: Some("gcc".to_string()),
            ..Default::default()
        };
        let records = client.fetch_tasks(&query).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(
            client.transport.param_names(),
            vec![vec!["task_id", "project"], vec!["task_id"]]
        );
    }

    #[test]
    fn test_bad_request_without_known_params_fails_immediately() {
        let transport = ScriptedTransport::new(vec![bad_request("Unknown arguments: color")]);
        let client = TaskClient::with_transport("http://example.test", transport);
        let err = client.fetch_tasks(&TaskQuery::default()).unwrap_err();
        assert!(err.to_string().starts_with("HTTP 400 — Bad Request"));
        assert_eq!(client.transport.requests.borrow().len(), 1);
    }

    #[test]
    fn test_cleanup_rounds_are_bounded() {
        let query = TaskQuery {
            task_id: Some("1".to_string()),
            project: Some("p".to_string()),
            branch: Some("b".to_string()),
            limit: Some(1),
            offset: Some(2),
        };
        let transport = ScriptedTransport::new(vec![
            bad_request("Unknown arguments: task_id"),
            bad_request("Unknown arguments: project"),
            bad_request("Unknown arguments: branch"),
            bad_request("Unknown arguments: limit"),
        ]);
        let client = TaskClient::with_transport("http://example.test", transport);
        let err = client.fetch_tasks(&query).unwrap_err();
        assert!(err.to_string().contains("Unknown arguments: limit"));
        assert_eq!(client.transport.requests.borrow().len(), MAX_CLEANUP_ROUNDS + 1);
    }

    #[test]
    fn test_server_error_surfaces_body() {
        let transport = ScriptedTransport::new(vec![Ok(HttpReply::Failure {
            status: 502,
            status_text: "Bad Gateway".to_string(),
            body: "upstream down".to_string(),
        })]);
        let client = TaskClient::with_transport("http://example.test", transport);
        let err = client.fetch_tasks(&TaskQuery::default()).unwrap_err();
        assert_eq!(err.to_string(), "HTTP 502 — Bad Gateway\nupstream down");
    }

    #[test]
    fn test_transport_error_propagates() {
        let transport = ScriptedTransport::new(vec![Err(anyhow!("Network error: connection refused"))]);
        let client = TaskClient::with_transport("http://example.test", transport);
        let err = client.fetch_tasks(&TaskQuery::default()).unwrap_err();
        assert!(err.to_string().contains("connection refused"));
    }
}
