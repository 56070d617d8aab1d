//! Rendering of individual tree rows.

pub mod task_row;
