//! Color mapping for tree rows and header chips.
//!
//! Maps row and chip state onto the current theme's palette so the
//! renderers never pick colors themselves.

use egui::{Color32, Stroke};
use tasktree::theme::{with_alpha, ThemeColors};

/// Visual state of a tree row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RowLook {
    pub is_branch: bool,
    pub selected: bool,
    pub hovered: bool,
}

/// Background fill for a row.
///
/// Selection wins over hover, hover over the plain background. Branch rows
/// use their own background so bucket boundaries stand out.
pub fn row_fill(look: RowLook, colors: &ThemeColors) -> Color32 {
    if look.selected {
        colors.selection
    } else if look.hovered {
        colors.hover
    } else if look.is_branch {
        colors.branch_row_background
    } else {
        colors.row_background
    }
}

/// Outline drawn around the highlighted search result.
pub fn highlight_stroke(colors: &ThemeColors) -> Stroke {
    Stroke::new(2.0, colors.highlight)
}

/// Fill and text color of a branch chip.
pub fn chip_colors(enabled: bool, colors: &ThemeColors) -> (Color32, Color32) {
    if enabled {
        (colors.badge, colors.text_strong)
    } else {
        (with_alpha(colors.border, 80), colors.text_dim)
    }
}
