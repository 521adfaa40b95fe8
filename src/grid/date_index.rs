//! Scroll-position to date lookup for the floating date label.

use chrono::{DateTime, Utc};

use crate::models::RowModel;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DateIndexEntry {
    /// Top offset of the row, including the gaps of every row above it.
    pub y: f64,
    /// Date of the first asset in the row.
    pub date: DateTime<Utc>,
}

/// Sorted (offset, date) pairs, one per non-empty row.
///
/// Rebuilt from scratch whenever rows change; never patched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DateIndex {
    entries: Vec<DateIndexEntry>,
}

impl DateIndex {
    pub fn build(rows: &[RowModel], gap: f64) -> Self {
        let mut entries = Vec::with_capacity(rows.len());
        let mut y = 0.0f64;
        for row in rows {
            if let Some(asset) = row.first_asset() {
                entries.push(DateIndexEntry { y, date: asset.date });
            }
            y += row.height_px + gap;
        }
        Self { entries }
    }

    pub fn entries(&self) -> &[DateIndexEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Date of the last row starting strictly above `offset`, or `None` when
    /// `offset` is at or before the first row.
    pub fn lookup(&self, offset: f64) -> Option<DateTime<Utc>> {
        let idx = self.entries.partition_point(|entry| entry.y < offset);
        idx.checked_sub(1).map(|i| self.entries[i].date)
    }

    /// Formatted label for a scroll position, sampled `lead_in` below the top.
    pub fn label_at(&self, scroll_top: f64, lead_in: f64) -> Option<String> {
        self.lookup(scroll_top + lead_in).map(format_label)
    }
}

/// Abbreviated month and year, e.g. "Mar 2024".
pub fn format_label(date: DateTime<Utc>) -> String {
    date.format("%b %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::JustifiedLayout;
    use crate::models::{Asset, RowItem};
    use chrono::TimeZone;

    fn month(year: i32, month: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, 15, 0, 0, 0).unwrap()
    }

    fn row(index: usize, height: f64, dates: &[DateTime<Utc>]) -> RowModel {
        let items = dates
            .iter()
            .enumerate()
            .map(|(i, date)| RowItem {
                asset: Asset::new(format!("{index}-{i}"), 100, 100, *date),
                render_width: height,
                render_height: height,
            })
            .collect();
        RowModel::new(index, index * 10, height, true, items)
    }

    #[test]
    fn test_build_accumulates_offsets() {
        let rows = vec![
            row(0, 200.0, &[month(2024, 5), month(2024, 4)]),
            row(1, 180.0, &[month(2024, 3)]),
            row(2, 220.0, &[month(2023, 12)]),
        ];
        let index = DateIndex::build(&rows, 12.0);
        let ys: Vec<f64> = index.entries().iter().map(|e| e.y).collect();
        assert_eq!(ys, vec![0.0, 212.0, 404.0]);
        assert_eq!(index.entries()[0].date, month(2024, 5));
    }

    #[test]
    fn test_empty_rows_are_skipped_but_advance_offset() {
        let rows = vec![
            row(0, 200.0, &[month(2024, 5)]),
            row(1, 100.0, &[]),
            row(2, 200.0, &[month(2024, 1)]),
        ];
        let index = DateIndex::build(&rows, 10.0);
        assert_eq!(index.len(), 2);
        assert_eq!(index.entries()[1].y, 320.0);
    }

    #[test]
    fn test_lookup_uses_strictly_preceding_entry() {
        let rows = vec![
            row(0, 200.0, &[month(2024, 5)]),
            row(1, 200.0, &[month(2024, 3)]),
        ];
        let index = DateIndex::build(&rows, 12.0);

        assert_eq!(index.lookup(0.0), None);
        assert_eq!(index.lookup(0.5), Some(month(2024, 5)));
        assert_eq!(index.lookup(212.0), Some(month(2024, 5)));
        assert_eq!(index.lookup(212.5), Some(month(2024, 3)));
        assert_eq!(index.lookup(1e9), Some(month(2024, 3)));
    }

    #[test]
    fn test_label_lead_in() {
        let rows = vec![
            row(0, 200.0, &[month(2024, 5)]),
            row(1, 200.0, &[month(2024, 3)]),
        ];
        let index = DateIndex::build(&rows, 12.0);

        assert_eq!(index.label_at(0.0, 50.0).as_deref(), Some("May 2024"));
        // 170 + 50 crosses the second row boundary at 212
        assert_eq!(index.label_at(170.0, 50.0).as_deref(), Some("Mar 2024"));
        assert_eq!(index.label_at(0.0, 0.0), None);
    }

    #[test]
    fn test_empty_index() {
        let index = DateIndex::build(&[], 12.0);
        assert!(index.is_empty());
        assert_eq!(index.lookup(100.0), None);
        assert_eq!(index.label_at(100.0, 50.0), None);
    }

    #[test]
    fn test_offsets_non_decreasing_for_packed_rows() {
        let layout = JustifiedLayout::default();
        let assets: Vec<Asset> = (0..80)
            .map(|i| {
                Asset::new(
                    format!("{i}"),
                    600 + (i as u32 * 137) % 1000,
                    400 + (i as u32 * 71) % 900,
                    month(2024, 1 + (i as u32 % 12)),
                )
            })
            .collect();
        let rows = layout.compute(&assets, 1100.0);
        let index = DateIndex::build(&rows, layout.gap);

        assert_eq!(index.len(), rows.len());
        assert!(index.entries().windows(2).all(|w| w[0].y <= w[1].y));
    }

    #[test]
    fn test_format_label() {
        assert_eq!(format_label(month(2023, 1)), "Jan 2023");
        assert_eq!(format_label(month(2025, 12)), "Dec 2025");
    }
}
