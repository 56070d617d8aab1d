pub mod task;
pub mod normalize;
pub mod forest;
pub mod tree_state;
pub mod row_heights;
pub mod virtual_list;
pub mod highlight;
pub mod client;
pub mod config;
pub mod dump;
pub mod synthetic;
pub mod theme;

// Records and ids
pub use task::{TaskId, TaskRecord, MISSING, UNKNOWN_BRANCH};
pub use normalize::normalize_payload;

// Tree construction and view state
pub use forest::{branch_key, shadowed_task_key, task_key, Forest, ForestNode, NodeIndex, NodeKind, MAX_DEPTH_HOPS};
pub use tree_state::TreeStore;
pub use row_heights::{RowHeightCache, DEFAULT_ROW_HEIGHT};
pub use virtual_list::{VirtualList, OVERSCAN_ROWS};
pub use highlight::HighlightController;

// Data sources
pub use client::{HttpReply, TaskClient, TaskQuery, Transport, UreqTransport};
pub use config::{ViewerConfig, AUTO_VIRTUALIZE_THRESHOLD};
pub use dump::{read_task_file, write_task_file};
pub use synthetic::SyntheticGenerator;

// Theme support
pub use theme::{hex_to_color32, with_alpha, Theme, ThemeColors, ThemeManager};
