use crate::config::{GridConfig, DEFAULT_GAP, DEFAULT_TARGET_ROW_HEIGHT};
use crate::error::{GridError, Result};
use crate::models::{Asset, RowItem, RowModel};

/// Configuration for the justified row layout.
///
/// Rows are packed greedily towards `target_height`; every closed row is
/// scaled so its items exactly span the container width.
#[derive(Debug, Clone, PartialEq)]
pub struct JustifiedLayout {
    /// Target row height in pixels (default: 200)
    pub target_height: f64,
    /// Gap between items in a row, and between rows, in pixels (default: 12)
    pub gap: f64,
}

impl Default for JustifiedLayout {
    fn default() -> Self {
        Self {
            target_height: DEFAULT_TARGET_ROW_HEIGHT,
            gap: DEFAULT_GAP,
        }
    }
}

impl From<&GridConfig> for JustifiedLayout {
    fn from(config: &GridConfig) -> Self {
        Self {
            target_height: config.target_row_height,
            gap: config.gap,
        }
    }
}

impl JustifiedLayout {
    /// Creates a layout, rejecting parameters that would make row heights
    /// meaningless.
    pub fn try_new(target_height: f64, gap: f64) -> Result<Self> {
        if !target_height.is_finite() || target_height <= 0.0 {
            return Err(GridError::InvalidGeometry(format!(
                "target row height must be > 0, got {target_height}"
            )));
        }
        if !gap.is_finite() || gap < 0.0 {
            return Err(GridError::InvalidGeometry(format!(
                "gap must be >= 0, got {gap}"
            )));
        }
        Ok(Self { target_height, gap })
    }

    /// Height at which `count` items with the given aspect sum exactly span
    /// the container.
    fn row_height_for(&self, container_width: f64, aspect_sum: f64, count: usize) -> f64 {
        let gaps = count.saturating_sub(1) as f64 * self.gap;
        (container_width - gaps) / aspect_sum
    }

    /// Computes the justified layout for a list of assets.
    ///
    /// # Algorithm
    /// 1. Append assets to a running row, accumulating their aspect ratios.
    /// 2. Once the row's justified height drops below the target, compare it
    ///    with the height the row had before the last asset was added. If the
    ///    shorter row is strictly closer to the target, the last asset is
    ///    pushed to the next row; equal distances keep it.
    /// 3. Close the row at the height that makes it span the container.
    /// 4. Leftover assets form a final row at exactly the target height,
    ///    never stretched to fill the width.
    ///
    /// Returns no rows for empty input or a container that has not been
    /// measured (`container_width <= 0`).
    pub fn compute(&self, assets: &[Asset], container_width: f64) -> Vec<RowModel> {
        let breaks = self.compute_breaks(assets, container_width);
        self.rows_from_breaks(assets, &breaks)
    }

    /// Runs the packing pass and returns only the row boundaries.
    pub fn compute_breaks(&self, assets: &[Asset], container_width: f64) -> Vec<RowBreak> {
        if assets.is_empty() || !container_width.is_finite() || container_width <= 0.0 {
            return Vec::new();
        }

        let degenerate = assets.iter().filter(|asset| asset.is_degenerate()).count();
        if degenerate > 0 {
            tracing::debug!(
                count = degenerate,
                "Assets with zero width or height laid out as squares"
            );
        }

        let target = self.target_height;
        let mut breaks = Vec::new();
        let mut start = 0usize;
        let mut aspect_sum = 0.0f64;
        let mut idx = 0usize;

        while idx < assets.len() {
            let aspect = assets[idx].aspect_ratio();
            aspect_sum += aspect;
            let count = idx + 1 - start;
            let potential = self.row_height_for(container_width, aspect_sum, count);

            if potential < target {
                let mut end = idx + 1;
                let mut final_sum = aspect_sum;

                if count > 1 {
                    let prev_sum = aspect_sum - aspect;
                    let prev = self.row_height_for(container_width, prev_sum, count - 1);
                    // A row narrower than its own gaps has no usable height.
                    if potential <= 0.0 || (prev - target).abs() < (potential - target).abs() {
                        // Reconsider this asset as the head of the next row.
                        end = idx;
                        final_sum = prev_sum;
                    }
                }

                breaks.push(RowBreak {
                    start_index: start,
                    end_index: end,
                    row_height: self.row_height_for(container_width, final_sum, end - start),
                    justified: true,
                });

                start = end;
                aspect_sum = 0.0;
                idx = end;
                continue;
            }

            idx += 1;
        }

        if start < assets.len() {
            breaks.push(RowBreak {
                start_index: start,
                end_index: assets.len(),
                row_height: target,
                justified: false,
            });
        }

        breaks
    }

    /// Reconstructs rows from cached breaks without re-running the packing pass.
    pub fn rows_from_breaks(&self, assets: &[Asset], breaks: &[RowBreak]) -> Vec<RowModel> {
        breaks
            .iter()
            .enumerate()
            .map(|(row_idx, brk)| {
                let items = assets[brk.start_index..brk.end_index]
                    .iter()
                    .map(|asset| RowItem {
                        asset: asset.clone(),
                        render_width: brk.row_height * asset.aspect_ratio(),
                        render_height: brk.row_height,
                    })
                    .collect();
                RowModel::new(
                    row_idx,
                    brk.start_index,
                    brk.row_height,
                    brk.justified,
                    items,
                )
            })
            .collect()
    }

    /// Total scrollable height: every row contributes its height plus one gap.
    pub fn total_height(&self, rows: &[RowModel]) -> f64 {
        rows.iter().map(|row| row.height_px + self.gap).sum()
    }
}

/// Represents a row break for caching purposes.
/// Contains only the indices and height, not the actual items.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowBreak {
    /// Start index in the assets slice (inclusive)
    pub start_index: usize,
    /// End index in the assets slice (exclusive)
    pub end_index: usize,
    /// The computed height for this row
    pub row_height: f64,
    /// Whether the row was scaled to span the container
    pub justified: bool,
}
