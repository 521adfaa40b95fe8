//! Asset sources feeding the grid.
//!
//! The grid only ever sees an ordered `Vec<Asset>`; where it comes from is
//! behind `AssetSource`, a "fetch one page" interface.
//!
//! - `VecSource` - assets already in memory
//! - `ManifestSource` - a JSON array of assets on disk
//! - `SyntheticSource` - seeded random assets for demos and benchmarks

pub mod manifest;
pub mod synthetic;

pub use manifest::ManifestSource;
pub use synthetic::SyntheticSource;

use crate::error::Result;
use crate::models::Asset;

/// Default page size when draining a source.
pub const DEFAULT_PAGE_SIZE: usize = 500;

pub trait AssetSource {
    /// Returns up to `limit` assets starting at `offset`. An empty page means
    /// the source is exhausted.
    fn fetch_page(&self, offset: usize, limit: usize) -> Result<Vec<Asset>>;
}

/// Drains `source` page by page, preserving its order.
pub fn collect_all(source: &dyn AssetSource, page_size: usize) -> Result<Vec<Asset>> {
    let page_size = page_size.max(1);
    let mut assets = Vec::new();
    loop {
        let page = source.fetch_page(assets.len(), page_size)?;
        let fetched = page.len();
        assets.extend(page);
        if fetched < page_size {
            break;
        }
    }
    tracing::debug!(count = assets.len(), "Collected assets from source");
    Ok(assets)
}

/// Assets already resident in memory.
#[derive(Debug, Clone, Default)]
pub struct VecSource {
    assets: Vec<Asset>,
}

impl VecSource {
    pub fn new(assets: Vec<Asset>) -> Self {
        Self { assets }
    }
}

impl AssetSource for VecSource {
    fn fetch_page(&self, offset: usize, limit: usize) -> Result<Vec<Asset>> {
        Ok(self
            .assets
            .iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }
}
