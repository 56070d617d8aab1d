//! Formatting helpers for the status bar.

use std::time::{Duration, Instant};
use sysinfo::{Pid, ProcessRefreshKind, System};

const MEMORY_REFRESH_INTERVAL: Duration = Duration::from_secs(1);

/// Formats a count with thousands separators.
///
/// # Examples
/// ```ignore
/// assert_eq!(format_count(1234567), "1,234,567");
/// ```
pub fn format_count(n: usize) -> String {
    let digits = n.to_string();
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result
}

/// Formats memory usage in MB, switching to GB above 1024 MB.
pub fn format_memory_mb(memory_mb: f64) -> String {
    if memory_mb > 1024.0 {
        format!("Memory: {:.2} GB", memory_mb / 1024.0)
    } else {
        format!("Memory: {:.1} MB", memory_mb)
    }
}

/// Resident memory of this process, sampled at most once per second.
pub struct MemoryProbe {
    system: System,
    pid: Pid,
    last_sample: Option<(Instant, f64)>,
}

impl Default for MemoryProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryProbe {
    pub fn new() -> Self {
        Self {
            system: System::new(),
            pid: Pid::from_u32(std::process::id()),
            last_sample: None,
        }
    }

    /// Current memory in megabytes, 0.0 if the process cannot be inspected.
    pub fn current_mb(&mut self) -> f64 {
        if let Some((at, mb)) = self.last_sample {
            if at.elapsed() < MEMORY_REFRESH_INTERVAL {
                return mb;
            }
        }
        self.system
            .refresh_process_specifics(self.pid, ProcessRefreshKind::new().with_memory());
        let mb = self
            .system
            .process(self.pid)
            .map(|p| p.memory() as f64 / (1024.0 * 1024.0))
            .unwrap_or(0.0);
        self.last_sample = Some((Instant::now(), mb));
        mb
    }
}
