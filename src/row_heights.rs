//! Measured row heights keyed by node key.

use std::collections::HashMap;

/// Estimated height of a row that has never been measured.
pub const DEFAULT_ROW_HEIGHT: f32 = 48.0;

/// Measurements within this distance of the cached value are ignored.
pub const MEASURE_TOLERANCE: f32 = 1.0;

/// Last measured rendered height per node key.
///
/// Keys are node keys (`branch:<name>`, `task:<id>`), so heights survive
/// expand/collapse but not a forest rebuild.
#[derive(Debug, Clone)]
pub struct RowHeightCache {
    heights: HashMap<String, f32>,
    default_height: f32,
}

impl Default for RowHeightCache {
    fn default() -> Self {
        Self::new(DEFAULT_ROW_HEIGHT)
    }
}

impl RowHeightCache {
    pub fn new(default_height: f32) -> Self {
        Self {
            heights: HashMap::new(),
            default_height,
        }
    }

    /// Cached height for `key`, or the default estimate.
    pub fn height(&self, key: &str) -> f32 {
        self.heights.get(key).copied().unwrap_or(self.default_height)
    }

    pub fn measured(&self, key: &str) -> Option<f32> {
        self.heights.get(key).copied()
    }

    pub fn default_height(&self) -> f32 {
        self.default_height
    }

    /// Stores a new measurement.
    ///
    /// Returns `true` when the cache changed: the key had no measurement yet,
    /// or the new height differs from the cached one by more than
    /// [`MEASURE_TOLERANCE`].
    pub fn update(&mut self, key: &str, measured: f32) -> bool {
        match self.heights.get(key) {
            Some(&cached) if (cached - measured).abs() <= MEASURE_TOLERANCE => false,
            _ => {
                self.heights.insert(key.to_string(), measured);
                true
            }
        }
    }

    pub fn len(&self) -> usize {
        self.heights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    pub fn clear(&mut self) {
        self.heights.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_height() {
        let cache = RowHeightCache::default();
        assert_eq!(cache.height("task:1"), DEFAULT_ROW_HEIGHT);
        assert_eq!(cache.measured("task:1"), None);
    }

    #[test]
    fn test_first_measurement_always_recorded() {
        let mut cache = RowHeightCache::default();
        assert!(cache.update("task:1", 48.0));
        assert_eq!(cache.measured("task:1"), Some(48.0));
    }

    #[test]
    fn test_small_changes_ignored() {
        let mut cache = RowHeightCache::default();
        cache.update("task:1", 60.0);
        assert!(!cache.update("task:1", 60.8));
        assert!(!cache.update("task:1", 59.0));
        assert!(cache.update("task:1", 62.0));
        assert_eq!(cache.height("task:1"), 62.0);
    }
}
