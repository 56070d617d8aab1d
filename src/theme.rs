//! Color themes for the task tree viewer.
//!
//! A theme is a named palette. The manager keeps the built-in themes in a
//! fixed order (for the header selector) and applies a palette to egui's
//! visuals.
//!
//! ```
//! use tasktree::theme::ThemeManager;
//!
//! let manager = ThemeManager::new();
//! let dark = manager.get_theme("Dark").unwrap();
//! println!("highlight outline: {:?}", dark.colors.highlight);
//! ```

use egui::Color32;

pub const DEFAULT_THEME: &str = "Dark";

/// Palette used by the viewer.
#[derive(Debug, Clone)]
pub struct ThemeColors {
    // Backgrounds
    pub panel_background: Color32,
    pub extreme_background: Color32,
    pub row_background: Color32,
    pub branch_row_background: Color32,

    // Text
    pub text: Color32,
    pub text_dim: Color32,
    pub text_strong: Color32,

    // Interaction
    pub selection: Color32,
    pub hover: Color32,
    pub border: Color32,

    /// Outline around the highlighted search result
    pub highlight: Color32,
    /// Root-count badge on branch rows
    pub badge: Color32,
    pub commit_text: Color32,

    pub error: Color32,
    pub warning: Color32,
    pub info: Color32,
}

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub description: String,
    pub colors: ThemeColors,
}

/// Built-in themes and the current selection.
pub struct ThemeManager {
    themes: Vec<Theme>,
    current: usize,
}

impl ThemeManager {
    pub fn new() -> Self {
        let themes = vec![light_theme(), dark_theme(), nord_theme()];
        let current = themes
            .iter()
            .position(|t| t.name == DEFAULT_THEME)
            .unwrap_or(0);
        Self { themes, current }
    }

    pub fn get_theme(&self, name: &str) -> Option<&Theme> {
        self.themes.iter().find(|t| t.name == name)
    }

    /// Theme names in selector order.
    pub fn list_themes(&self) -> Vec<&str> {
        self.themes.iter().map(|t| t.name.as_str()).collect()
    }

    pub fn current_theme(&self) -> &Theme {
        &self.themes[self.current]
    }

    pub fn set_current_theme(&mut self, name: &str) -> Result<(), String> {
        match self.themes.iter().position(|t| t.name == name) {
            Some(idx) => {
                self.current = idx;
                Ok(())
            }
            None => Err(format!("Theme '{}' not found", name)),
        }
    }

    /// Copies the palette onto egui visuals.
    pub fn apply_theme(&self, theme: &Theme, visuals: &mut egui::Visuals) {
        let colors = &theme.colors;

        visuals.panel_fill = colors.panel_background;
        visuals.window_fill = colors.panel_background;
        visuals.extreme_bg_color = colors.extreme_background;
        visuals.faint_bg_color = colors.row_background;
        visuals.override_text_color = Some(colors.text);

        visuals.selection.bg_fill = colors.selection;
        visuals.selection.stroke.color = colors.highlight;

        visuals.widgets.noninteractive.bg_fill = colors.panel_background;
        visuals.widgets.noninteractive.bg_stroke.color = colors.border;
        visuals.widgets.inactive.bg_fill = colors.hover;
        visuals.widgets.hovered.bg_fill = colors.hover;
        visuals.widgets.active.bg_fill = colors.selection;

        visuals.hyperlink_color = colors.info;
        visuals.error_fg_color = colors.error;
        visuals.warn_fg_color = colors.warning;
    }
}

impl Default for ThemeManager {
    fn default() -> Self {
        Self::new()
    }
}

fn light_theme() -> Theme {
    Theme {
        name: "Light".to_string(),
        description: "Light background, dark text".to_string(),
        colors: ThemeColors {
            panel_background: Color32::from_rgb(248, 248, 248),
            extreme_background: Color32::from_rgb(255, 255, 255),
            row_background: Color32::from_rgb(255, 255, 255),
            branch_row_background: Color32::from_rgb(236, 240, 246),

            text: Color32::from_rgb(20, 20, 20),
            text_dim: Color32::from_rgb(110, 110, 110),
            text_strong: Color32::from_rgb(0, 0, 0),

            selection: Color32::from_rgb(200, 218, 255),
            hover: Color32::from_rgb(225, 225, 225),
            border: Color32::from_rgb(200, 200, 200),

            highlight: Color32::from_rgb(230, 120, 20),
            badge: Color32::from_rgb(40, 100, 200),
            commit_text: Color32::from_rgb(90, 90, 120),

            error: Color32::from_rgb(200, 40, 40),
            warning: Color32::from_rgb(180, 120, 0),
            info: Color32::from_rgb(0, 130, 160),
        },
    }
}

fn dark_theme() -> Theme {
    Theme {
        name: "Dark".to_string(),
        description: "Dark background, light text".to_string(),
        colors: ThemeColors {
            panel_background: Color32::from_rgb(39, 39, 39),
            extreme_background: Color32::from_rgb(16, 16, 16),
            row_background: Color32::from_rgb(30, 30, 30),
            branch_row_background: Color32::from_rgb(48, 52, 60),

            text: Color32::from_rgb(230, 230, 230),
            text_dim: Color32::from_rgb(150, 150, 150),
            text_strong: Color32::from_rgb(255, 255, 255),

            selection: Color32::from_rgb(50, 80, 120),
            hover: Color32::from_rgb(60, 60, 60),
            border: Color32::from_rgb(80, 80, 80),

            highlight: Color32::from_rgb(243, 156, 18),
            badge: Color32::from_rgb(52, 152, 219),
            commit_text: Color32::from_rgb(170, 170, 200),

            error: Color32::from_rgb(231, 76, 60),
            warning: Color32::from_rgb(241, 196, 15),
            info: Color32::from_rgb(26, 188, 156),
        },
    }
}

/// Palette from https://www.nordtheme.com
fn nord_theme() -> Theme {
    Theme {
        name: "Nord".to_string(),
        description: "Arctic blue palette".to_string(),
        colors: ThemeColors {
            panel_background: hex_to_color32("#2e3440"),
            extreme_background: hex_to_color32("#242933"),
            row_background: hex_to_color32("#2e3440"),
            branch_row_background: hex_to_color32("#3b4252"),

            text: hex_to_color32("#d8dee9"),
            text_dim: hex_to_color32("#7b88a1"),
            text_strong: hex_to_color32("#eceff4"),

            selection: hex_to_color32("#434c5e"),
            hover: hex_to_color32("#3b4252"),
            border: hex_to_color32("#4c566a"),

            highlight: hex_to_color32("#ebcb8b"),
            badge: hex_to_color32("#5e81ac"),
            commit_text: hex_to_color32("#88c0d0"),

            error: hex_to_color32("#bf616a"),
            warning: hex_to_color32("#d08770"),
            info: hex_to_color32("#8fbcbb"),
        },
    }
}

/// Parses `#rrggbb`; anything else is black.
pub fn hex_to_color32(hex: &str) -> Color32 {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 {
        return Color32::BLACK;
    }
    let channel = |range: std::ops::Range<usize>| {
        hex.get(range)
            .and_then(|s| u8::from_str_radix(s, 16).ok())
            .unwrap_or(0)
    };
    Color32::from_rgb(channel(0..2), channel(2..4), channel(4..6))
}

/// Same color with a new alpha channel.
pub fn with_alpha(color: Color32, alpha: u8) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}
