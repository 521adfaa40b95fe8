//! Grid controller: the binding layer a host calls on data, resize and scroll
//! events.
//!
//! `AssetGrid` owns the asset sequence and everything derived from it. Rows,
//! the date index and the virtualizer prefix table are rebuilt together
//! whenever the asset list or container width changes; scroll events only
//! touch the virtualizer.

pub mod date_index;
pub mod selection;
pub mod virtualizer;

use std::ops::Range;

pub use date_index::{format_label, DateIndex, DateIndexEntry};
pub use selection::{BulkAction, BulkRequest, ClickOutcome, Modifiers, SelectionSet};
pub use virtualizer::Virtualizer;

use crate::config::GridConfig;
use crate::error::Result;
use crate::layout::{CachedLayoutComputer, JustifiedLayout};
use crate::models::{Asset, RowModel, ViewportState};
use crate::source::AssetSource;

/// A row the renderer should draw, translated to `offset`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleRow<'a> {
    pub row_index: usize,
    pub offset: f64,
    pub height: f64,
    pub row: &'a RowModel,
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct GridFrame<'a> {
    pub rows: Vec<VisibleRow<'a>>,
    pub total_height: f64,
    pub date_label: Option<String>,
}

pub struct AssetGrid {
    config: GridConfig,
    layout: CachedLayoutComputer,
    assets: Vec<Asset>,
    rows: Vec<RowModel>,
    date_index: DateIndex,
    virtualizer: Virtualizer,
    viewport: ViewportState,
    selection: SelectionSet,
}

impl AssetGrid {
    pub fn new(config: GridConfig) -> Result<Self> {
        config.validate()?;
        let layout = CachedLayoutComputer::new(JustifiedLayout::from(&config), config.cache_capacity);
        let virtualizer = Virtualizer::new(&[], config.gap, config.overscan);
        Ok(Self {
            config,
            layout,
            assets: Vec::new(),
            rows: Vec::new(),
            date_index: DateIndex::default(),
            virtualizer,
            viewport: ViewportState::default(),
            selection: SelectionSet::new(),
        })
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    pub fn rows(&self) -> &[RowModel] {
        &self.rows
    }

    pub fn date_index(&self) -> &DateIndex {
        &self.date_index
    }

    pub fn viewport(&self) -> ViewportState {
        self.viewport
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    /// Replaces the asset sequence and relays out. Selected ids that no longer
    /// exist are dropped.
    pub fn set_assets(&mut self, assets: Vec<Asset>) {
        let degenerate = assets.iter().filter(|asset| asset.is_degenerate()).count();
        if degenerate > 0 {
            tracing::warn!(
                count = degenerate,
                "Assets with zero width or height will be laid out as squares"
            );
        }
        self.assets = assets;
        self.selection.retain_known(&self.assets);
        self.relayout();
    }

    /// Pulls every page from `source` and replaces the asset sequence.
    pub fn load_from(&mut self, source: &dyn AssetSource, page_size: usize) -> Result<usize> {
        let assets = crate::source::collect_all(source, page_size)?;
        let count = assets.len();
        self.set_assets(assets);
        Ok(count)
    }

    /// Records a container resize. Rows are only rebuilt when the width
    /// changes; a height change just re-evaluates the visible range.
    pub fn set_container_size(&mut self, width: f64, height: f64) -> Option<Range<usize>> {
        let width_changed = self.viewport.container_width.to_bits() != width.to_bits();
        self.viewport.container_width = width;
        self.viewport.container_height = height;
        if width_changed {
            self.relayout();
        }
        self.virtualizer
            .update(self.viewport.scroll_top, self.viewport.container_height)
    }

    /// Records a scroll position. Returns the render range only when it
    /// changed since the last report.
    pub fn on_scroll(&mut self, scroll_top: f64) -> Option<Range<usize>> {
        self.viewport.scroll_top = scroll_top;
        self.virtualizer.update(scroll_top, self.viewport.container_height)
    }

    pub fn total_height(&self) -> f64 {
        self.virtualizer.total_height()
    }

    pub fn visible_range(&self) -> Range<usize> {
        self.virtualizer
            .visible_range(self.viewport.scroll_top, self.viewport.container_height)
    }

    pub fn visible_rows(&self) -> Vec<VisibleRow<'_>> {
        self.visible_range()
            .filter_map(|index| {
                let row = self.rows.get(index)?;
                Some(VisibleRow {
                    row_index: index,
                    offset: self.virtualizer.offset_of(index)?,
                    height: row.height_px,
                    row,
                })
            })
            .collect()
    }

    pub fn date_label(&self) -> Option<String> {
        self.date_index
            .label_at(self.viewport.scroll_top, self.config.date_lead_in)
    }

    pub fn frame(&self) -> GridFrame<'_> {
        GridFrame {
            rows: self.visible_rows(),
            total_height: self.total_height(),
            date_label: self.date_label(),
        }
    }

    /// Scroll offset that brings the row holding `id` to the top.
    pub fn offset_of_asset(&self, id: &str) -> Option<f64> {
        let index = self.assets.iter().position(|asset| asset.id == id)?;
        let row = self
            .rows
            .partition_point(|row| row.end_index() <= index);
        self.virtualizer.offset_of(row)
    }

    pub fn click(&mut self, id: &str, modifiers: Modifiers) -> ClickOutcome {
        self.selection.click(&self.assets, id, modifiers)
    }

    pub fn toggle_selection(&mut self, id: &str) -> bool {
        self.selection.toggle(&self.assets, id)
    }

    pub fn context_menu(&mut self, id: &str) {
        self.selection.context_menu(&self.assets, id);
    }

    pub fn background_click(&mut self) {
        self.selection.clear();
    }

    pub fn issue_bulk(&mut self, action: BulkAction) -> BulkRequest {
        self.selection.issue_bulk(&self.assets, action)
    }

    fn relayout(&mut self) {
        self.rows = if self.viewport.is_measured() {
            self.layout
                .compute(&self.assets, self.viewport.container_width)
        } else {
            Vec::new()
        };
        self.date_index = DateIndex::build(&self.rows, self.config.gap);
        self.virtualizer.set_rows(&self.rows, self.config.gap);

        tracing::debug!(
            assets = self.assets.len(),
            rows = self.rows.len(),
            container_width = self.viewport.container_width,
            total_height = self.virtualizer.total_height(),
            "Grid relayout"
        );
    }
}
