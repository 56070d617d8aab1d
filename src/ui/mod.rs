//! UI panel rendering subsystem
//!
//! - Header panel (search, data sources, branch chips, theme selector)
//! - Tree panel (virtualized task tree)
//! - Eager tree (whole forest, for small task sets)
//! - Details panel (raw fields of the selected task)
//! - Status bar (memory and task set counts)
//! - Panel manager (panel orchestration and layout)

pub mod header;
pub mod tree_panel;
pub mod eager_tree;
pub mod details_panel;
pub mod status_bar;
pub mod panel_manager;
