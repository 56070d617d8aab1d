//! View preferences persisted between sessions.

use serde::{Deserialize, Serialize};

/// Layout and view preferences.
///
/// Serialized as a whole into eframe storage. Expand/collapse state is not
/// part of it and never persists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutState {
    /// Share of the window height given to the tree (0.0 to 1.0)
    split_ratio: f32,
    /// User choice for the virtualized list; large loads force it on
    virtualize: bool,
}

impl Default for LayoutState {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutState {
    pub fn new() -> Self {
        Self {
            split_ratio: 0.7,
            virtualize: false,
        }
    }

    pub fn split_ratio(&self) -> f32 {
        self.split_ratio
    }

    pub fn virtualize(&self) -> bool {
        self.virtualize
    }

    pub fn set_virtualize(&mut self, virtualize: bool) {
        self.virtualize = virtualize;
    }

    /// Records the details panel height chosen by the user.
    pub fn set_details_height(&mut self, details_height: f32, window_height: f32) {
        if window_height > 0.0 {
            self.split_ratio = (1.0 - details_height / window_height).clamp(0.2, 0.95);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_defaults_for_missing_fields() {
        let layout: LayoutState = serde_json::from_str(r#"{"virtualize": true}"#).unwrap();
        assert!(layout.virtualize());
        assert_eq!(layout.split_ratio(), 0.7);
    }

    #[test]
    fn test_details_height_is_clamped() {
        let mut layout = LayoutState::new();
        layout.set_details_height(300.0, 1000.0);
        assert!((layout.split_ratio() - 0.7).abs() < 1e-6);
        layout.set_details_height(990.0, 1000.0);
        assert_eq!(layout.split_ratio(), 0.2);
    }
}
