use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the grid core and its asset sources.
///
/// Layout itself never fails; these cover parameter validation and the
/// file-backed sources.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("invalid config field `{field}`: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse asset manifest {}", path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to parse grid config {}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, GridError>;
