//! Persistence of view preferences.
//!
//! Settings are stored in eframe storage as JSON strings, one key per
//! setting. Values that are missing or fail to parse fall back to defaults.

use crate::state::LayoutState;
use serde::{Deserialize, Serialize};

const LAYOUT_KEY: &str = "layout";

pub struct SettingsCoordinator;

impl SettingsCoordinator {
    /// Loads a JSON setting, or `default` when absent or unreadable.
    ///
    /// # Arguments
    /// * `storage` - eframe storage, `None` when persistence is unavailable
    /// * `key` - Storage key
    /// * `default` - Fallback value
    pub fn load_setting_or<T>(storage: Option<&dyn eframe::Storage>, key: &str, default: T) -> T
    where
        T: for<'de> Deserialize<'de>,
    {
        let Some(json_str) = storage.and_then(|s| s.get_string(key)) else {
            return default;
        };
        match serde_json::from_str(&json_str) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "ignoring unreadable setting");
                default
            }
        }
    }

    pub fn save_setting<T>(storage: &mut dyn eframe::Storage, key: &str, value: &T)
    where
        T: Serialize,
    {
        match serde_json::to_string(value) {
            Ok(json_str) => storage.set_string(key, json_str),
            Err(e) => tracing::warn!(key, error = %e, "failed to serialize setting"),
        }
    }

    pub fn load_layout(storage: Option<&dyn eframe::Storage>) -> LayoutState {
        Self::load_setting_or(storage, LAYOUT_KEY, LayoutState::default())
    }

    pub fn save_layout(storage: &mut dyn eframe::Storage, layout: &LayoutState) {
        Self::save_setting(storage, LAYOUT_KEY, layout);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MockStorage {
        data: HashMap<String, String>,
    }

    impl eframe::Storage for MockStorage {
        fn get_string(&self, key: &str) -> Option<String> {
            self.data.get(key).cloned()
        }

        fn set_string(&mut self, key: &str, value: String) {
            self.data.insert(key.to_string(), value);
        }

        fn flush(&mut self) {}
    }

    #[test]
    fn test_layout_roundtrip() {
        let mut storage = MockStorage::default();
        let mut layout = LayoutState::new();
        layout.set_virtualize(true);

        SettingsCoordinator::save_layout(&mut storage, &layout);
        assert_eq!(SettingsCoordinator::load_layout(Some(&storage)), layout);
    }

    #[test]
    fn test_missing_storage_gives_defaults() {
        assert_eq!(SettingsCoordinator::load_layout(None), LayoutState::default());
    }

    #[test]
    fn test_unreadable_value_gives_default() {
        let mut storage = MockStorage::default();
        storage.data.insert("layout".to_string(), "not json".to_string());
        assert_eq!(SettingsCoordinator::load_layout(Some(&storage)), LayoutState::default());

        let value: u32 = SettingsCoordinator::load_setting_or(Some(&storage), "missing", 7);
        assert_eq!(value, 7);
    }
}
