//! Grid configuration.
//!
//! All fields are optional in the JSON form; anything missing falls back to
//! the defaults the web grid ships with.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};

/// Gap between items and between rows, in pixels.
pub const DEFAULT_GAP: f64 = 12.0;

/// Height rows are packed towards, in pixels.
pub const DEFAULT_TARGET_ROW_HEIGHT: f64 = 200.0;

/// Rows rendered beyond each edge of the viewport.
pub const DEFAULT_OVERSCAN: usize = 5;

/// How far below `scroll_top` the date label samples, so the label tracks the
/// row about to come into view rather than the one leaving it.
pub const DEFAULT_DATE_LEAD_IN: f64 = 50.0;

/// Number of (width, asset list) layouts kept by the layout cache.
pub const DEFAULT_CACHE_CAPACITY: usize = 8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridConfig {
    pub gap: f64,
    pub target_row_height: f64,
    pub overscan: usize,
    pub date_lead_in: f64,
    pub cache_capacity: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            gap: DEFAULT_GAP,
            target_row_height: DEFAULT_TARGET_ROW_HEIGHT,
            overscan: DEFAULT_OVERSCAN,
            date_lead_in: DEFAULT_DATE_LEAD_IN,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl GridConfig {
    /// Load and validate a config from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|source| GridError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&raw).map_err(|source| GridError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.gap.is_finite() || self.gap < 0.0 {
            return Err(GridError::InvalidConfig {
                field: "gap",
                reason: format!("must be a finite value >= 0, got {}", self.gap),
            });
        }
        if !self.target_row_height.is_finite() || self.target_row_height <= 0.0 {
            return Err(GridError::InvalidConfig {
                field: "targetRowHeight",
                reason: format!("must be a finite value > 0, got {}", self.target_row_height),
            });
        }
        if !self.date_lead_in.is_finite() {
            return Err(GridError::InvalidConfig {
                field: "dateLeadIn",
                reason: "must be finite".to_string(),
            });
        }
        if self.cache_capacity == 0 {
            return Err(GridError::InvalidConfig {
                field: "cacheCapacity",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
