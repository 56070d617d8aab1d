//! Variable-height virtual list layout.
//!
//! Row positions are the running sum of row heights in visible order. The sums
//! are kept in a cumulative offset table that is only valid up to a watermark:
//! a height change at row `i` moves the watermark back to `i`, and offsets past
//! the watermark are recomputed lazily the next time someone asks for them.
//! Rows before the watermark are never touched again.

use crate::row_heights::RowHeightCache;
use std::ops::Range;

/// Rows rendered beyond each edge of the viewport.
pub const OVERSCAN_ROWS: usize = 10;

/// Layout state for one visible-row sequence.
#[derive(Debug, Clone)]
pub struct VirtualList {
    heights: RowHeightCache,
    /// `offsets[i]` is the top of row `i`; `offsets[n]` is the total height
    offsets: Vec<f32>,
    /// Number of leading entries of `offsets` that are up to date (>= 1)
    valid_len: usize,
    /// Row count the table was last sized for
    row_count: usize,
    overscan: usize,
}

impl Default for VirtualList {
    fn default() -> Self {
        Self::new(RowHeightCache::default(), OVERSCAN_ROWS)
    }
}

impl VirtualList {
    pub fn new(heights: RowHeightCache, overscan: usize) -> Self {
        Self {
            heights,
            offsets: vec![0.0],
            valid_len: 1,
            row_count: 0,
            overscan,
        }
    }

    pub fn heights(&self) -> &RowHeightCache {
        &self.heights
    }

    pub fn overscan(&self) -> usize {
        self.overscan
    }

    /// Number of offset entries currently known to be up to date.
    pub fn valid_len(&self) -> usize {
        self.valid_len
    }

    /// Drops every measurement and offset. Used when the forest is rebuilt.
    pub fn reset(&mut self) {
        self.heights.clear();
        self.offsets.clear();
        self.offsets.push(0.0);
        self.valid_len = 1;
        self.row_count = 0;
    }

    /// Marks the offsets of every row after `row` as stale; `row` keeps its top.
    pub fn invalidate_from(&mut self, row: usize) {
        self.valid_len = self.valid_len.min(row + 1);
    }

    /// Invalidates the whole table. Called after a toggle, since the identity
    /// and count of visible rows changed.
    pub fn invalidate_all(&mut self) {
        self.invalidate_from(0);
    }

    fn sync_len(&mut self, n: usize) {
        if self.row_count != n {
            self.row_count = n;
            self.offsets.resize(n + 1, 0.0);
            self.valid_len = 1;
        }
    }

    /// Computes one more offset past the watermark.
    fn extend_one<K: AsRef<str>>(&mut self, keys: &[K]) {
        let row = self.valid_len - 1;
        let height = self.heights.height(keys[row].as_ref());
        self.offsets[row + 1] = self.offsets[row] + height;
        self.valid_len += 1;
    }

    /// Makes `offsets[..=upto]` valid.
    fn ensure<K: AsRef<str>>(&mut self, keys: &[K], upto: usize) {
        let n = keys.len();
        self.sync_len(n);
        let upto = upto.min(n);
        while self.valid_len <= upto {
            self.extend_one(keys);
        }
    }

    /// Top of row `row` (or the total height for `row == keys.len()`).
    pub fn row_top<K: AsRef<str>>(&mut self, keys: &[K], row: usize) -> f32 {
        self.ensure(keys, row);
        self.offsets[row.min(keys.len())]
    }

    /// Current (measured or estimated) height of row `row`.
    pub fn row_height<K: AsRef<str>>(&self, keys: &[K], row: usize) -> f32 {
        keys.get(row)
            .map(|k| self.heights.height(k.as_ref()))
            .unwrap_or(0.0)
    }

    pub fn total_height<K: AsRef<str>>(&mut self, keys: &[K]) -> f32 {
        self.row_top(keys, keys.len())
    }

    /// Row containing vertical position `y`, clamped to the last row.
    ///
    /// Only extends the offset table as far as needed to reach `y`.
    pub fn row_at<K: AsRef<str>>(&mut self, keys: &[K], y: f32) -> Option<usize> {
        let n = keys.len();
        if n == 0 {
            return None;
        }
        self.sync_len(n);
        while self.valid_len <= n && self.offsets[self.valid_len - 1] <= y {
            self.extend_one(keys);
        }
        let valid = &self.offsets[..self.valid_len];
        let row = valid.partition_point(|&top| top <= y).saturating_sub(1);
        Some(row.min(n - 1))
    }

    /// Rows to render for the given scroll position: every row intersecting
    /// `[scroll, scroll + viewport]`, widened by the overscan on both sides.
    pub fn render_range<K: AsRef<str>>(&mut self, keys: &[K], scroll: f32, viewport: f32) -> Range<usize> {
        let n = keys.len();
        let top = scroll.max(0.0);
        let bottom = top + viewport.max(0.0);
        let Some(first) = self.row_at(keys, top) else {
            return 0..0;
        };

        let mut end = first + 1;
        while end < n && self.row_top(keys, end) < bottom {
            end += 1;
        }

        first.saturating_sub(self.overscan)..(end + self.overscan).min(n)
    }

    /// Records the rendered height of row `row`.
    ///
    /// Returns `true` if the cached height changed, in which case every offset
    /// after this row is stale and the caller should lay out again.
    pub fn record_measurement<K: AsRef<str>>(&mut self, keys: &[K], row: usize, measured: f32) -> bool {
        let Some(key) = keys.get(row) else {
            return false;
        };
        if self.heights.update(key.as_ref(), measured) {
            self.invalidate_from(row);
            true
        } else {
            false
        }
    }

    /// Scroll offset that brings `row` fully into view, or `None` if it
    /// already is.
    pub fn scroll_to_reveal<K: AsRef<str>>(
        &mut self,
        keys: &[K],
        row: usize,
        scroll: f32,
        viewport: f32,
    ) -> Option<f32> {
        if row >= keys.len() {
            return None;
        }
        let top = self.row_top(keys, row);
        let bottom = top + self.row_height(keys, row);
        if top < scroll {
            Some(top)
        } else if bottom > scroll + viewport {
            Some((bottom - viewport).max(0.0).min(top))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row_heights::DEFAULT_ROW_HEIGHT;

    fn keys(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("task:{}", i)).collect()
    }

    #[test]
    fn test_default_offsets() {
        let rows = keys(5);
        let mut list = VirtualList::default();
        assert_eq!(list.row_top(&rows, 0), 0.0);
        assert_eq!(list.row_top(&rows, 3), 3.0 * DEFAULT_ROW_HEIGHT);
        assert_eq!(list.total_height(&rows), 5.0 * DEFAULT_ROW_HEIGHT);
    }

    #[test]
    fn test_measurement_invalidates_only_following_rows() {
        let rows = keys(100);
        let mut list = VirtualList::default();
        list.total_height(&rows);
        assert_eq!(list.valid_len(), 101);

        assert!(list.record_measurement(&rows, 40, 100.0));
        assert_eq!(list.valid_len(), 41);
        assert_eq!(list.row_top(&rows, 40), 40.0 * DEFAULT_ROW_HEIGHT);
        assert_eq!(list.row_top(&rows, 41), 40.0 * DEFAULT_ROW_HEIGHT + 100.0);
        assert_eq!(list.total_height(&rows), 99.0 * DEFAULT_ROW_HEIGHT + 100.0);
    }

    #[test]
    fn test_small_measurement_change_keeps_table() {
        let rows = keys(10);
        let mut list = VirtualList::default();
        list.record_measurement(&rows, 2, 50.0);
        list.total_height(&rows);
        assert!(!list.record_measurement(&rows, 2, 50.5));
        assert_eq!(list.valid_len(), 11);
    }

    #[test]
    fn test_invalidate_all_after_toggle() {
        let rows = keys(10);
        let mut list = VirtualList::default();
        list.total_height(&rows);
        list.invalidate_all();
        assert_eq!(list.valid_len(), 1);
    }

    #[test]
    fn test_row_count_change_resets_table() {
        let mut list = VirtualList::default();
        list.total_height(&keys(10));
        assert_eq!(list.total_height(&keys(4)), 4.0 * DEFAULT_ROW_HEIGHT);
    }

    #[test]
    fn test_render_range_with_overscan() {
        let rows = keys(1000);
        let mut list = VirtualList::default();
        // Rows 20..=30 intersect [1000, 1460] with 48px rows.
        let range = list.render_range(&rows, 1000.0, 460.0);
        assert_eq!(range, 10..41);
    }

    #[test]
    fn test_render_range_clamped_at_edges() {
        let rows = keys(15);
        let mut list = VirtualList::default();
        assert_eq!(list.render_range(&rows, 0.0, 100.0), 0..13);
        assert_eq!(list.render_range(&rows, 10_000.0, 100.0), 4..15);
        let empty: Vec<String> = Vec::new();
        assert_eq!(list.render_range(&empty, 0.0, 100.0), 0..0);
    }

    #[test]
    fn test_row_at_extends_lazily() {
        let rows = keys(1000);
        let mut list = VirtualList::default();
        assert_eq!(list.row_at(&rows, 100.0), Some(2));
        assert!(list.valid_len() < 10);
    }

    #[test]
    fn test_scroll_to_reveal() {
        let rows = keys(100);
        let mut list = VirtualList::default();
        assert_eq!(list.scroll_to_reveal(&rows, 1, 0.0, 480.0), None);
        assert_eq!(list.scroll_to_reveal(&rows, 50, 0.0, 480.0), Some(51.0 * 48.0 - 480.0));
        assert_eq!(list.scroll_to_reveal(&rows, 2, 960.0, 480.0), Some(96.0));
    }

    #[test]
    fn test_reset_drops_measurements() {
        let rows = keys(3);
        let mut list = VirtualList::default();
        list.record_measurement(&rows, 0, 80.0);
        list.reset();
        assert!(list.heights().is_empty());
        assert_eq!(list.total_height(&rows), 3.0 * DEFAULT_ROW_HEIGHT);
    }
}
