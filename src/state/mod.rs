//! State management for the task tree viewer.
//!
//! State-only logic, no UI concerns:
//! - Task state (records, branch filter, forest, expansion, row layout)
//! - Selection state (task shown in the details panel)
//! - Query state (search box, last query)
//! - Theme state (theme manager, current theme)
//! - Layout state (split ratio, virtualize preference)

mod task_state;
mod selection;
mod query_state;
mod theme_state;
mod layout_state;

pub use task_state::TaskState;
pub use selection::SelectionState;
pub use query_state::QueryState;
pub use theme_state::ThemeState;
pub use layout_state::LayoutState;
