use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    #[default]
    Image,
    Video,
}

/// One photo or video as delivered by an asset source.
///
/// Identity is the `id`; positions in a sequence shift whenever the list
/// changes, so nothing outside a single layout pass should key on an index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: String,
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    pub width: u32,
    pub height: u32,
    pub date: DateTime<Utc>,
    #[serde(rename = "type", default)]
    pub asset_type: AssetType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbhash: Option<String>,
}

impl Asset {
    /// Create an image asset with just the fields the layout needs.
    pub fn new(id: impl Into<String>, width: u32, height: u32, date: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            url: String::new(),
            thumbnail_url: None,
            width,
            height,
            date,
            asset_type: AssetType::Image,
            duration: None,
            location: None,
            thumbhash: None,
        }
    }

    /// Mark this asset as a video with an optional display duration.
    pub fn into_video(mut self, duration: Option<String>) -> Self {
        self.asset_type = AssetType::Video;
        self.duration = duration;
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Width over height. Zero-sized assets report 1.0 so they still occupy
    /// a square slot instead of poisoning the row sum with NaN or infinity.
    pub fn aspect_ratio(&self) -> f64 {
        if self.is_degenerate() {
            1.0
        } else {
            self.width as f64 / self.height as f64
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn is_video(&self) -> bool {
        self.asset_type == AssetType::Video
    }

    /// Display duration, only ever reported for videos.
    pub fn duration(&self) -> Option<&str> {
        if self.is_video() {
            self.duration.as_deref()
        } else {
            None
        }
    }
}
