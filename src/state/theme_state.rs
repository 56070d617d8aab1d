//! Theme selection state.

use tasktree::theme::{ThemeColors, ThemeManager, DEFAULT_THEME};

pub struct ThemeState {
    theme_manager: ThemeManager,
}

impl std::fmt::Debug for ThemeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeState")
            .field("current_theme_name", &self.current_theme_name())
            .finish_non_exhaustive()
    }
}

impl Default for ThemeState {
    fn default() -> Self {
        Self::new()
    }
}

impl ThemeState {
    pub fn new() -> Self {
        Self::with_theme(DEFAULT_THEME)
    }

    /// Starts with `theme_name`, falling back to the default theme for
    /// unknown names (e.g. a stale stored preference).
    pub fn with_theme(theme_name: &str) -> Self {
        let mut theme_manager = ThemeManager::new();
        if theme_manager.set_current_theme(theme_name).is_err() {
            tracing::warn!(theme = theme_name, "unknown theme, using default");
        }
        Self { theme_manager }
    }

    pub fn theme_manager(&self) -> &ThemeManager {
        &self.theme_manager
    }

    pub fn current_theme_name(&self) -> &str {
        &self.theme_manager.current_theme().name
    }

    pub fn colors(&self) -> &ThemeColors {
        &self.theme_manager.current_theme().colors
    }

    pub fn set_theme(&mut self, theme_name: &str) {
        if let Err(e) = self.theme_manager.set_current_theme(theme_name) {
            tracing::warn!("{}", e);
        }
    }
}
