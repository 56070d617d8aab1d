//! Utility modules for the task tree viewer.

pub mod formatting;

pub use formatting::{format_count, format_memory_mb, MemoryProbe};
