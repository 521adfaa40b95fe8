//! JSON manifest of assets.
//!
//! The file is a JSON array of asset objects in display order, using the same
//! camelCase shape the API serves.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::AssetSource;
use crate::error::{GridError, Result};
use crate::models::Asset;

#[derive(Debug, Clone)]
pub struct ManifestSource {
    path: PathBuf,
    assets: Vec<Asset>,
}

impl ManifestSource {
    /// Reads and parses the manifest. Duplicate ids keep their first
    /// occurrence, since selection and identity are keyed by id.
    pub fn open(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|source| GridError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let parsed: Vec<Asset> = serde_json::from_str(&raw).map_err(|source| GridError::Manifest {
            path: path.to_path_buf(),
            source,
        })?;

        let mut seen = HashSet::with_capacity(parsed.len());
        let mut duplicates = 0usize;
        let assets: Vec<Asset> = parsed
            .into_iter()
            .filter(|asset| {
                if seen.insert(asset.id.clone()) {
                    true
                } else {
                    duplicates += 1;
                    false
                }
            })
            .collect();

        if duplicates > 0 {
            warn!(
                path = %path.display(),
                duplicates,
                "Manifest contains duplicate asset ids, keeping first occurrence"
            );
        }
        debug!(path = %path.display(), count = assets.len(), "Loaded asset manifest");

        Ok(Self {
            path: path.to_path_buf(),
            assets,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

impl AssetSource for ManifestSource {
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
