use std::num::NonZeroUsize;

use lru::LruCache;
use parking_lot::Mutex;
use xxhash_rust::xxh3::xxh3_64;

use crate::config::DEFAULT_CACHE_CAPACITY;
use crate::layout::justified::{JustifiedLayout, RowBreak};
use crate::models::{Asset, RowModel};

/// Key for the layout cache.
///
/// Justified rows depend on the exact container width, so widths are keyed by
/// their bit pattern rather than bucketed.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
struct CacheKey {
    width_bits: u64,
    list_hash: u64,
}

/// Cached layout data: the row breaks that can reconstruct the full layout.
#[derive(Debug, Clone)]
struct CachedLayout {
    breaks: Vec<RowBreak>,
    /// Number of assets this layout was computed for
    item_count: usize,
}

/// Layout cache for storing and retrieving row breaks.
///
/// Entries are keyed by (container width, list hash). The list hash covers
/// the id and dimensions of every asset in order plus the layout parameters,
/// so any change to the sequence, a dimension, the gap or the target height
/// misses the cache.
pub struct LayoutCache {
    cache: Mutex<LruCache<CacheKey, CachedLayout>>,
}

impl LayoutCache {
    /// Creates a cache holding up to `capacity` layouts (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Computes a fast hash of the asset list under the given layout parameters.
    pub fn compute_list_hash(assets: &[Asset], layout: &JustifiedLayout) -> u64 {
        let mut hasher_input = Vec::with_capacity(16 + assets.len() * 32);
        hasher_input.extend_from_slice(&layout.target_height.to_bits().to_le_bytes());
        hasher_input.extend_from_slice(&layout.gap.to_bits().to_le_bytes());

        for asset in assets {
            hasher_input.extend_from_slice(asset.id.as_bytes());
            // Separator so ("ab", "c") and ("a", "bc") differ
            hasher_input.push(0);
            hasher_input.extend_from_slice(&asset.width.to_le_bytes());
            hasher_input.extend_from_slice(&asset.height.to_le_bytes());
        }

        xxh3_64(&hasher_input)
    }

    /// Attempts to retrieve cached row breaks.
    /// Returns None on cache miss or if the cached entry was built for a
    /// different number of assets.
    pub fn get_breaks(
        &self,
        container_width: f64,
        list_hash: u64,
        item_count: usize,
    ) -> Option<Vec<RowBreak>> {
        let key = CacheKey {
            width_bits: container_width.to_bits(),
            list_hash,
        };

        let mut cache = self.cache.lock();
        let entry = cache.get(&key)?;
        if entry.item_count != item_count {
            return None;
        }
        Some(entry.breaks.clone())
    }

    /// Stores row breaks in the cache, evicting the least recently used
    /// layout when full.
    pub fn set(&self, container_width: f64, list_hash: u64, breaks: Vec<RowBreak>, item_count: usize) {
        let key = CacheKey {
            width_bits: container_width.to_bits(),
            list_hash,
        };
        self.cache.lock().put(key, CachedLayout { breaks, item_count });
    }

    /// Clears the entire cache.
    pub fn clear(&self) {
        self.cache.lock().clear();
    }

    /// Returns the number of cached layouts.
    pub fn len(&self) -> usize {
        self.cache.lock().len()
    }

    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.cache.lock().is_empty()
    }
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

/// Combines layout computation with caching.
///
/// Results are always full row sets; a cache hit only skips the packing pass.
pub struct CachedLayoutComputer {
    pub layout: JustifiedLayout,
    pub cache: LayoutCache,
}

impl CachedLayoutComputer {
    pub fn new(layout: JustifiedLayout, capacity: usize) -> Self {
        Self {
            layout,
            cache: LayoutCache::new(capacity),
        }
    }

    /// Computes the layout, using cached breaks if available.
    pub fn compute(&self, assets: &[Asset], container_width: f64) -> Vec<RowModel> {
        if assets.is_empty() || !container_width.is_finite() || container_width <= 0.0 {
            return Vec::new();
        }

        let list_hash = LayoutCache::compute_list_hash(assets, &self.layout);

        if let Some(breaks) = self.cache.get_breaks(container_width, list_hash, assets.len()) {
            tracing::debug!(container_width, rows = breaks.len(), "Layout cache hit");
            return self.layout.rows_from_breaks(assets, &breaks);
        }

        tracing::debug!(container_width, items = assets.len(), "Layout cache miss");
        let breaks = self.layout.compute_breaks(assets, container_width);
        let rows = self.layout.rows_from_breaks(assets, &breaks);
        self.cache.set(container_width, list_hash, breaks, assets.len());

        rows
    }

    /// Invalidates the cache, forcing recomputation on next call.
    pub fn invalidate(&self) {
        self.cache.clear();
    }
}

impl Default for CachedLayoutComputer {
    fn default() -> Self {
        Self::new(JustifiedLayout::default(), DEFAULT_CACHE_CAPACITY)
    }
}
