//! Justified photo-grid core: row packing, date index, viewport
//! virtualization and multi-select state for a chronological asset timeline.

pub mod config;
pub mod error;
pub mod grid;
pub mod layout;
pub mod models;
pub mod source;

pub use config::GridConfig;
pub use error::{GridError, Result};
pub use grid::{AssetGrid, BulkAction, BulkRequest, ClickOutcome, GridFrame, Modifiers, VisibleRow};
pub use layout::{CachedLayoutComputer, JustifiedLayout, RowBreak};
pub use models::{Asset, AssetType, RowItem, RowModel, ViewportState};
pub use source::{AssetSource, ManifestSource, SyntheticSource, VecSource};
