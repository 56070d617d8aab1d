//! Virtualized tree panel.
//!
//! Only rows intersecting the viewport (plus overscan) are materialized.
//! Each row is placed at its offset from the virtual list, rendered, and
//! measured; a changed height moves the offset watermark back and triggers
//! another frame so rows below settle at their real positions.

use crate::app::AppState;
use crate::rendering::task_row::{self, RowContext, RowInteraction};
use egui::{Rect, ScrollArea, UiBuilder};
use tasktree::ThemeColors;

/// Renders the visible slice of the tree.
///
/// # Returns
/// The row interaction of this frame, if any
pub fn render_tree_panel(
    ui: &mut egui::Ui,
    state: &mut AppState,
    theme_colors: &ThemeColors,
) -> Option<RowInteraction> {
    let scroll = state.tasks.scroll_offset();
    let viewport_height = state.tasks.viewport_height();
    let selected = state.selection.selected_task().cloned();
    let highlight = &mut state.highlight;
    let (forest, store, list) = state.tasks.layout_parts();

    let target = highlight.take_scroll_target(forest, store, list, scroll, viewport_height);
    let keys = store.visible_keys(forest);
    let visible = store.visible();

    let mut scroll_area = ScrollArea::vertical()
        .id_salt("task_tree_scroll_area")
        .auto_shrink([false, false]);
    if let Some(offset) = target {
        tracing::debug!(offset, "scrolling to highlighted task");
        scroll_area = scroll_area.vertical_scroll_offset(offset);
    }

    let mut interaction = None;
    let output = scroll_area.show_viewport(ui, |ui, viewport| {
        let origin = ui.max_rect().min;
        let width = ui.available_width();
        ui.set_height(list.total_height(&keys));

        let mut remeasured = false;
        for row in list.render_range(&keys, viewport.min.y, viewport.height()) {
            let idx = visible[row];
            let node = forest.node(idx);
            let ctx = RowContext {
                expanded: store.is_expanded(idx),
                selected: node
                    .task_id()
                    .zip(selected.as_ref())
                    .is_some_and(|(id, sel)| id.loosely_eq(sel)),
                highlighted: node.task_id().is_some_and(|id| highlight.is_highlighted(id)),
            };

            let top = list.row_top(&keys, row);
            let rect = Rect::from_min_size(
                origin + egui::vec2(0.0, top),
                egui::vec2(width, list.row_height(&keys, row)),
            );
            let inner = ui.scope_builder(UiBuilder::new().max_rect(rect), |ui| {
                task_row::render_row(ui, forest, idx, ctx, theme_colors)
            });
            if inner.inner.is_some() {
                interaction = inner.inner;
            }
            remeasured |= list.record_measurement(&keys, row, inner.response.rect.height());
        }

        if remeasured {
            ui.ctx().request_repaint();
        }
    });

    state
        .tasks
        .set_scroll(output.state.offset.y, output.inner_rect.height());
    interaction
}
