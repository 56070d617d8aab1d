//! Background task loading.
//!
//! Fetches and file reads run on a worker thread and report back through a
//! channel. Every load gets a sequence number; only the result of the most
//! recently issued load is applied, so a slow request that settles after a
//! newer one is dropped instead of overwriting it.

use eframe::egui;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread;
use tasktree::{read_task_file, SyntheticGenerator, TaskClient, TaskQuery, TaskRecord, ViewerConfig};

/// Where a record set came from.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOrigin {
    /// Task history endpoint
    Api(TaskQuery),
    /// Local dump
    File(PathBuf),
    /// Generated in-process
    Synthetic { seed: u64 },
}

impl LoadOrigin {
    pub fn is_api(&self) -> bool {
        matches!(self, LoadOrigin::Api(_))
    }

    /// Short human-readable description for the status bar.
    pub fn label(&self) -> String {
        match self {
            LoadOrigin::Api(query) => match &query.task_id {
                Some(id) => format!("API (task {})", id),
                None => "API".to_string(),
            },
            LoadOrigin::File(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            LoadOrigin::Synthetic { seed } => format!("Synthetic (seed {})", seed),
        }
    }
}

/// Outcome of polling the loader.
pub enum LoadResult {
    Success {
        records: Vec<TaskRecord>,
        origin: LoadOrigin,
    },
    Error {
        message: String,
        origin: LoadOrigin,
    },
    /// Nothing settled since the last poll
    None,
}

struct LoadMessage {
    seq: u64,
    origin: LoadOrigin,
    result: Result<Vec<TaskRecord>, String>,
}

/// Runs loads off the UI thread, last issued wins.
pub struct AsyncLoader {
    sender: Sender<LoadMessage>,
    receiver: Receiver<LoadMessage>,
    /// Sequence number of the newest load
    latest_issued: u64,
    /// Sequence number of the newest load whose result was handed out
    latest_settled: u64,
}

impl AsyncLoader {
    pub fn new() -> Self {
        let (sender, receiver) = channel();
        Self {
            sender,
            receiver,
            latest_issued: 0,
            latest_settled: 0,
        }
    }

    /// True while the newest load has not settled.
    pub fn is_loading(&self) -> bool {
        self.latest_settled < self.latest_issued
    }

    /// Starts fetching tasks for `query` from the configured endpoint.
    ///
    /// # Arguments
    /// * `query` - Query parameters; empty ones are dropped by the client
    /// * `config` - Endpoint and timeout
    /// * `ctx` - Repainted once the fetch settles
    pub fn start_fetch(&mut self, query: TaskQuery, config: &ViewerConfig, ctx: &egui::Context) {
        let base = config.api_base.clone();
        let timeout = config.timeout;
        let job_query = query.clone();
        self.spawn_job(LoadOrigin::Api(query), Some(ctx.clone()), move || {
            TaskClient::new(&base, timeout).fetch_tasks(&job_query)
        });
    }

    /// Starts reading a local dump.
    pub fn start_file_load(&mut self, path: PathBuf, ctx: &egui::Context) {
        let job_path = path.clone();
        self.spawn_job(LoadOrigin::File(path), Some(ctx.clone()), move || {
            read_task_file(&job_path)
        });
    }

    /// Generates a synthetic record set synchronously.
    ///
    /// Any load still in flight is superseded.
    pub fn load_synthetic(&mut self, generator: &SyntheticGenerator) -> Vec<TaskRecord> {
        self.latest_issued += 1;
        self.latest_settled = self.latest_issued;
        generator.generate()
    }

    /// Runs `job` on a worker thread under a fresh sequence number.
    pub fn spawn_job<F>(&mut self, origin: LoadOrigin, ctx: Option<egui::Context>, job: F)
    where
        F: FnOnce() -> anyhow::Result<Vec<TaskRecord>> + Send + 'static,
    {
        self.latest_issued += 1;
        let seq = self.latest_issued;
        let sender = self.sender.clone();
        tracing::debug!(seq, origin = %origin.label(), "load started");

        thread::spawn(move || {
            // Keep the whole error chain for the UI.
            let result = job().map_err(|e| format!("{:#}", e));
            let _ = sender.send(LoadMessage { seq, origin, result });
            if let Some(ctx) = ctx {
                ctx.request_repaint();
            }
        });
    }

    /// Returns the result of the newest load if it has settled.
    ///
    /// Called once per frame. Results of superseded loads are discarded.
    pub fn check_completion(&mut self) -> LoadResult {
        while let Ok(message) = self.receiver.try_recv() {
            if message.seq != self.latest_issued || self.latest_settled >= message.seq {
                tracing::debug!(
                    seq = message.seq,
                    latest = self.latest_issued,
                    "discarding superseded load"
                );
                continue;
            }

            self.latest_settled = message.seq;
            return match message.result {
                Ok(records) => LoadResult::Success {
                    records,
                    origin: message.origin,
                },
                Err(message_text) => {
                    tracing::warn!(error = %message_text, "load failed");
                    LoadResult::Error {
                        message: message_text,
                        origin: message.origin,
                    }
                }
            };
        }

        LoadResult::None
    }
}

impl Default for AsyncLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::mpsc;
    use std::time::{Duration, Instant};
    use tasktree::normalize_payload;

    fn wait_for_result(loader: &mut AsyncLoader) -> LoadResult {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            match loader.check_completion() {
                LoadResult::None => thread::sleep(Duration::from_millis(5)),
                other => return other,
            }
        }
        LoadResult::None
    }

    fn records(ids: &[u64]) -> Vec<TaskRecord> {
        normalize_payload(json!(ids.iter().map(|id| json!({"id": id})).collect::<Vec<_>>()))
    }

    #[test]
    fn test_idle_loader() {
        let mut loader = AsyncLoader::new();
        assert!(!loader.is_loading());
        assert!(matches!(loader.check_completion(), LoadResult::None));
    }

    #[test]
    fn test_job_result_is_delivered() {
        let mut loader = AsyncLoader::new();
        loader.spawn_job(LoadOrigin::Synthetic { seed: 1 }, None, || Ok(records(&[1, 2])));
        assert!(loader.is_loading());

        match wait_for_result(&mut loader) {
            LoadResult::Success { records, origin } => {
                assert_eq!(records.len(), 2);
                assert_eq!(origin, LoadOrigin::Synthetic { seed: 1 });
            }
            _ => panic!("expected a successful load"),
        }
        assert!(!loader.is_loading());
    }

    #[test]
    fn test_error_carries_message() {
        let mut loader = AsyncLoader::new();
        loader.spawn_job(LoadOrigin::Api(TaskQuery::default()), None, || {
            Err(anyhow::anyhow!("HTTP 500 — Internal Server Error\nboom"))
        });
        match wait_for_result(&mut loader) {
            LoadResult::Error { message, origin } => {
                assert!(message.contains("boom"));
                assert!(origin.is_api());
            }
            _ => panic!("expected an error"),
        }
    }

    #[test]
    fn test_stale_result_is_discarded() {
        let mut loader = AsyncLoader::new();
        let (release, gate) = mpsc::channel::<()>();

        // First load blocks until released, after the second one settled.
        loader.spawn_job(LoadOrigin::Api(TaskQuery::default()), None, move || {
            let _ = gate.recv();
            Ok(records(&[1]))
        });
        loader.spawn_job(LoadOrigin::Synthetic { seed: 2 }, None, || Ok(records(&[2, 3])));

        match wait_for_result(&mut loader) {
            LoadResult::Success { records, .. } => assert_eq!(records.len(), 2),
            _ => panic!("expected the newer load"),
        }

        release.send(()).unwrap();
        thread::sleep(Duration::from_millis(50));
        assert!(matches!(loader.check_completion(), LoadResult::None));
        assert!(!loader.is_loading());
    }

    #[test]
    fn test_synthetic_load_supersedes_in_flight_fetch() {
        let mut loader = AsyncLoader::new();
        let (release, gate) = mpsc::channel::<()>();
        loader.spawn_job(LoadOrigin::Api(TaskQuery::default()), None, move || {
            let _ = gate.recv();
            Ok(records(&[1]))
        });

        let generated = loader.load_synthetic(&SyntheticGenerator::with_config(10, 2, 42));
        assert_eq!(generated.len(), 10);
        assert!(!loader.is_loading());

        release.send(()).unwrap();
        thread::sleep(Duration::from_millis(50));
        assert!(matches!(loader.check_completion(), LoadResult::None));
    }

    #[test]
    fn test_origin_labels() {
        let query = TaskQuery {
            task_id: Some("399129".to_string()),
            ..Default::default()
        };
        assert_eq!(LoadOrigin::Api(query).label(), "API (task 399129)");
        assert_eq!(LoadOrigin::File(PathBuf::from("/tmp/tasks.json.br")).label(), "tasks.json.br");
        assert_eq!(LoadOrigin::Synthetic { seed: 42 }.label(), "Synthetic (seed 42)");
    }
}
