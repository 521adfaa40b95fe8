use super::Asset;

#[derive(Debug, Clone, PartialEq)]
pub struct RowItem {
    pub asset: Asset,
    pub render_width: f64,
    pub render_height: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowModel {
    pub row_index: usize,
    /// Index of the first item in the laid-out asset sequence.
    pub start_index: usize,
    pub height_px: f64,
    /// False for a trailing row that was left at target height.
    pub justified: bool,
    pub items: Vec<RowItem>,
}

impl RowModel {
    pub fn new(
        row_index: usize,
        start_index: usize,
        height_px: f64,
        justified: bool,
        items: Vec<RowItem>,
    ) -> Self {
        Self {
            row_index,
            start_index,
            height_px,
            justified,
            items,
        }
    }

    /// One past the index of the last item in the asset sequence.
    pub fn end_index(&self) -> usize {
        self.start_index + self.items.len()
    }

    /// Rendered width of the row including inter-item gaps.
    pub fn content_width(&self, gap: f64) -> f64 {
        let widths: f64 = self.items.iter().map(|item| item.render_width).sum();
        widths + self.items.len().saturating_sub(1) as f64 * gap
    }

    pub fn first_asset(&self) -> Option<&Asset> {
        self.items.first().map(|item| &item.asset)
    }
}
