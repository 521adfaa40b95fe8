//! Visible row range computation for the virtualized grid.
//!
//! Each row occupies a slot of `height + gap`. Slot offsets are precomputed as
//! a prefix sum so a scroll position maps to a row range with two binary
//! searches; nothing on the scroll path walks the full row list.

use std::ops::Range;

use crate::models::RowModel;

#[derive(Debug, Clone, Default)]
pub struct Virtualizer {
    /// `offsets[i]` is the top of row `i`; `offsets[len]` is the total height.
    offsets: Vec<f64>,
    heights: Vec<f64>,
    overscan: usize,
    /// Last range handed out by `update`
    last_range: Option<Range<usize>>,
}

impl Virtualizer {
    pub fn new(rows: &[RowModel], gap: f64, overscan: usize) -> Self {
        let mut virtualizer = Self {
            overscan,
            ..Self::default()
        };
        virtualizer.set_rows(rows, gap);
        virtualizer
    }

    /// Rebuilds the prefix table. The next `update` always reports a range.
    pub fn set_rows(&mut self, rows: &[RowModel], gap: f64) {
        self.heights.clear();
        self.offsets.clear();
        self.offsets.reserve(rows.len() + 1);

        let mut y = 0.0f64;
        self.offsets.push(y);
        for row in rows {
            self.heights.push(row.height_px);
            y += row.height_px + gap;
            self.offsets.push(y);
        }
        self.last_range = None;
    }

    pub fn set_overscan(&mut self, overscan: usize) {
        self.overscan = overscan;
        self.last_range = None;
    }

    pub fn overscan(&self) -> usize {
        self.overscan
    }

    pub fn len(&self) -> usize {
        self.heights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    /// Height of the scrollable content.
    pub fn total_height(&self) -> f64 {
        self.offsets.last().copied().unwrap_or(0.0)
    }

    /// Top offset of row `index`.
    pub fn offset_of(&self, index: usize) -> Option<f64> {
        if index < self.len() {
            Some(self.offsets[index])
        } else {
            None
        }
    }

    pub fn height_of(&self, index: usize) -> Option<f64> {
        self.heights.get(index).copied()
    }

    /// Row whose slot contains `y`, clamped to the first and last row.
    pub fn row_at_offset(&self, y: f64) -> Option<usize> {
        if self.is_empty() {
            return None;
        }
        let ends = &self.offsets[1..];
        let idx = ends.partition_point(|&end| end <= y);
        Some(idx.min(self.len() - 1))
    }

    /// Rows whose slots intersect `[scroll_top, scroll_top + viewport_height)`,
    /// without overscan.
    pub fn viewport_range(&self, scroll_top: f64, viewport_height: f64) -> Range<usize> {
        if self.is_empty() || !(viewport_height > 0.0) || !scroll_top.is_finite() {
            return 0..0;
        }
        let bottom = scroll_top + viewport_height;
        let ends = &self.offsets[1..];
        let starts = &self.offsets[..self.len()];

        let first = ends.partition_point(|&end| end <= scroll_top);
        let last = starts.partition_point(|&start| start < bottom);
        first.min(last)..last
    }

    /// Rows to render: the viewport range widened by `overscan` on each side
    /// and clamped to the row count.
    pub fn visible_range(&self, scroll_top: f64, viewport_height: f64) -> Range<usize> {
        let range = self.viewport_range(scroll_top, viewport_height);
        if range.is_empty()
            && (self.is_empty() || !(viewport_height > 0.0) || !scroll_top.is_finite())
        {
            return 0..0;
        }
        let start = range.start.saturating_sub(self.overscan);
        let end = range.end.saturating_add(self.overscan).min(self.len());
        start..end
    }

    /// Returns the new render range only when it differs from the last one
    /// reported, so callers re-render on range changes rather than on every
    /// scrolled pixel.
    pub fn update(&mut self, scroll_top: f64, viewport_height: f64) -> Option<Range<usize>> {
        let range = self.visible_range(scroll_top, viewport_height);
        if self.last_range.as_ref() == Some(&range) {
            return None;
        }
        tracing::trace!(start = range.start, end = range.end, "Visible row range changed");
        self.last_range = Some(range.clone());
        Some(range)
    }

    pub fn last_range(&self) -> Option<Range<usize>> {
        self.last_range.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform_rows(count: usize, height: f64) -> Vec<RowModel> {
        (0..count)
            .map(|i| RowModel::new(i, i, height, true, Vec::new()))
            .collect()
    }

    #[test]
    fn test_total_height_includes_trailing_gap() {
        let v = Virtualizer::new(&uniform_rows(3, 200.0), 12.0, 0);
        assert_eq!(v.total_height(), 636.0);
        assert_eq!(v.offset_of(2), Some(424.0));
        assert_eq!(v.offset_of(3), None);
        assert_eq!(v.height_of(1), Some(200.0));
    }

    #[test]
    fn test_scroll_scenario_200_rows() {
        let overscan = 5;
        let viewport = 800.0;
        let v = Virtualizer::new(&uniform_rows(200, 200.0), 12.0, overscan);

        let range = v.visible_range(5000.0, viewport);
        let first = (5000.0f64 / 212.0).floor() as usize - overscan;
        let last = ((5000.0 + viewport) / 212.0f64).ceil() as usize + overscan;
        assert_eq!(range, first..last);
        assert_eq!(range, 18..33);
    }

    #[test]
    fn test_viewport_range_boundaries() {
        let v = Virtualizer::new(&uniform_rows(10, 100.0), 0.0, 0);
        assert_eq!(v.viewport_range(0.0, 100.0), 0..1);
        assert_eq!(v.viewport_range(99.0, 2.0), 0..2);
        assert_eq!(v.viewport_range(100.0, 100.0), 1..2);
        assert_eq!(v.viewport_range(950.0, 500.0), 9..10);
    }

    #[test]
    fn test_range_clamped_to_bounds() {
        let v = Virtualizer::new(&uniform_rows(10, 100.0), 0.0, 5);
        assert_eq!(v.visible_range(0.0, 250.0), 0..8);
        assert_eq!(v.visible_range(900.0, 250.0), 4..10);
        assert_eq!(v.visible_range(-50.0, 100.0), 0..6);
    }

    #[test]
    fn test_scrolled_past_end() {
        let v = Virtualizer::new(&uniform_rows(10, 100.0), 0.0, 2);
        assert_eq!(v.viewport_range(5000.0, 100.0), 10..10);
        assert_eq!(v.visible_range(5000.0, 100.0), 8..10);
    }

    #[test]
    fn test_empty_inputs() {
        let v = Virtualizer::new(&[], 12.0, 5);
        assert_eq!(v.total_height(), 0.0);
        assert_eq!(v.visible_range(0.0, 800.0), 0..0);
        assert_eq!(v.row_at_offset(10.0), None);

        let v = Virtualizer::new(&uniform_rows(10, 100.0), 0.0, 5);
        assert_eq!(v.visible_range(0.0, 0.0), 0..0);
        assert_eq!(v.visible_range(0.0, f64::NAN), 0..0);
    }

    #[test]
    fn test_non_finite_scroll_renders_nothing() {
        let v = Virtualizer::new(&uniform_rows(10, 100.0), 0.0, 5);
        assert_eq!(v.visible_range(f64::NAN, 300.0), 0..0);
        assert_eq!(v.visible_range(f64::INFINITY, 300.0), 0..0);
        assert_eq!(v.visible_range(f64::NEG_INFINITY, 300.0), 0..0);
        assert_eq!(v.viewport_range(f64::NAN, 300.0), 0..0);
    }

    #[test]
    fn test_range_is_minimal() {
        let heights = [120.0, 340.0, 90.0, 210.0, 180.0, 260.0, 75.0, 300.0, 150.0, 220.0];
        let rows: Vec<RowModel> = heights
            .iter()
            .enumerate()
            .map(|(i, h)| RowModel::new(i, i, *h, true, Vec::new()))
            .collect();
        let gap = 8.0;
        let v = Virtualizer::new(&rows, gap, 0);

        for step in 0..60 {
            let top = step as f64 * 37.0;
            let viewport = 300.0;
            let range = v.viewport_range(top, viewport);
            for i in 0..rows.len() {
                let start = v.offset_of(i).unwrap();
                let end = start + heights[i] + gap;
                let intersects = start < top + viewport && end > top;
                assert_eq!(range.contains(&i), intersects, "row {i} at scroll {top}");
            }
        }
    }

    #[test]
    fn test_row_at_offset() {
        let v = Virtualizer::new(&uniform_rows(4, 100.0), 10.0, 0);
        assert_eq!(v.row_at_offset(0.0), Some(0));
        assert_eq!(v.row_at_offset(109.0), Some(0));
        assert_eq!(v.row_at_offset(110.0), Some(1));
        assert_eq!(v.row_at_offset(10_000.0), Some(3));
    }

    #[test]
    fn test_update_reports_only_range_changes() {
        let mut v = Virtualizer::new(&uniform_rows(100, 200.0), 12.0, 2);

        assert_eq!(v.update(0.0, 600.0), Some(0..5));
        assert_eq!(v.update(1.0, 600.0), None);
        let mut changes = 0;
        let mut top = 0.0;
        while top < 2120.0 {
            if v.update(top, 600.0).is_some() {
                changes += 1;
            }
            top += 1.0;
        }
        // Ten rows scrolled over; each boundary crossing changes the range at
        // most twice (top edge and bottom edge).
        assert!(changes > 0 && changes <= 20, "changes = {changes}");
        assert_eq!(v.last_range(), Some(v.visible_range(2119.0, 600.0)));
    }

    #[test]
    fn test_set_rows_resets_backpressure() {
        let mut v = Virtualizer::new(&uniform_rows(10, 100.0), 0.0, 1);
        assert!(v.update(0.0, 300.0).is_some());
        assert!(v.update(0.0, 300.0).is_none());
        v.set_rows(&uniform_rows(10, 50.0), 0.0);
        assert!(v.update(0.0, 300.0).is_some());
        v.set_overscan(3);
        assert_eq!(v.update(0.0, 300.0), Some(0..9));
        assert_eq!(v.overscan(), 3);
    }
}
