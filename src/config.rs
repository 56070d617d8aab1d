//! Viewer configuration from environment variables and command-line arguments.

use crate::task::TaskId;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://rdb.altlinux.org/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Record count above which the virtualized list is always used.
pub const AUTO_VIRTUALIZE_THRESHOLD: usize = 2500;

pub const ENV_API_BASE: &str = "TASKTREE_API_BASE";
pub const ENV_TIMEOUT_SECS: &str = "TASKTREE_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    pub api_base: String,
    pub timeout: Duration,
    /// Task searched for right after startup
    pub initial_task: Option<TaskId>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            initial_task: None,
        }
    }
}

impl ViewerConfig {
    /// Reads the process environment and `std::env::args`.
    pub fn from_env() -> Self {
        let args: Vec<String> = std::env::args().skip(1).collect();
        Self::from_sources(|name| std::env::var(name).ok(), &args)
    }

    /// Builds the configuration from an environment lookup and the program
    /// arguments (without the program name).
    ///
    /// Invalid or empty values fall back to the defaults.
    pub fn from_sources<F>(lookup: F, args: &[String]) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(base) = lookup(ENV_API_BASE) {
            let base = base.trim().trim_end_matches('/');
            if !base.is_empty() {
                config.api_base = base.to_string();
            }
        }

        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.timeout = Duration::from_secs(secs),
                _ => tracing::warn!(value = %raw, "ignoring invalid {}", ENV_TIMEOUT_SECS),
            }
        }

        config.initial_task = args
            .iter()
            .find(|arg| !arg.starts_with('-'))
            .and_then(|arg| TaskId::parse(arg));

        config
    }

    /// Whether the virtualized list is forced for a load of `record_count`.
    pub fn forces_virtualization(record_count: usize) -> bool {
        record_count > AUTO_VIRTUALIZE_THRESHOLD
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_defaults() {
        let config = ViewerConfig::from_sources(|_| None, &[]);
        assert_eq!(config, ViewerConfig::default());
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_environment_overrides() {
        let vars = env(&[(ENV_API_BASE, "http://localhost:8080/api/"), (ENV_TIMEOUT_SECS, "5")]);
        let config = ViewerConfig::from_sources(|k| vars.get(k).cloned(), &[]);
        assert_eq!(config.api_base, "http://localhost:8080/api");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_invalid_timeout_falls_back() {
        let vars = env(&[(ENV_TIMEOUT_SECS, "soon"), (ENV_API_BASE, "  ")]);
        let config = ViewerConfig::from_sources(|k| vars.get(k).cloned(), &[]);
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(config.api_base, DEFAULT_API_BASE);
    }

    #[test]
    fn test_initial_task_from_first_positional() {
        let args = vec!["--verbose".to_string(), " 399129 ".to_string(), "7".to_string()];
        let config = ViewerConfig::from_sources(|_| None, &args);
        assert_eq!(config.initial_task, Some(TaskId::from("399129")));
    }

    #[test]
    fn test_auto_virtualize_threshold() {
        assert!(!ViewerConfig::forces_virtualization(2500));
        assert!(ViewerConfig::forces_virtualization(2501));
    }
}
