//! Seeded random assets shaped like a real library: mixed orientations,
//! roughly one video in five, newest first.

use chrono::{DateTime, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::AssetSource;
use crate::error::Result;
use crate::models::Asset;

const MIN_DIMENSION: u32 = 400;
const MAX_DIMENSION: u32 = 1600;
const VIDEO_PROBABILITY: f64 = 0.2;
const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

const CITIES: [Option<&str>; 8] = [
    Some("New York"),
    Some("Tokyo"),
    Some("London"),
    Some("Paris"),
    Some("Berlin"),
    Some("San Francisco"),
    Some("Sydney"),
    None,
];

const THUMBHASHES: [&str; 4] = [
    "1QcSHQRnh493V4dIh4eXh1h4kJY=",
    "k0oGLQaSZ3l0hweJiIiHh1iAZ1Y=",
    "ImYFHPZ3aHiHiHh4eIeXh4h4R4g=",
    "VFopSlCAhoh2iJh3eniHd3d2d2g=",
];

/// Generates the whole set up front so paging and repeated runs with the same
/// seed see identical data.
#[derive(Debug, Clone)]
pub struct SyntheticSource {
    assets: Vec<Asset>,
}

impl SyntheticSource {
    /// `count` assets dated between 2023-01-01 and `until`, sorted newest first.
    pub fn new(count: usize, seed: u64, until: DateTime<Utc>) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let since = Utc
            .with_ymd_and_hms(2023, 1, 1, 0, 0, 0)
            .single()
            .unwrap_or(until);
        let span = (until.timestamp() - since.timestamp()).max(1);

        let mut assets: Vec<Asset> = (0..count)
            .map(|_| {
                let width = rng.gen_range(MIN_DIMENSION..=MAX_DIMENSION);
                let height = rng.gen_range(MIN_DIMENSION..=MAX_DIMENSION);
                let timestamp = since.timestamp() + rng.gen_range(0..span);
                let date = Utc.timestamp_opt(timestamp, 0).single().unwrap_or(until);
                let id = random_id(&mut rng);

                let mut asset = Asset::new(id.clone(), width, height, date)
                    .with_url(format!("https://picsum.photos/seed/{id}/{width}/{height}"));
                asset.thumbnail_url = Some(format!(
                    "https://picsum.photos/seed/{id}/400/{}",
                    400 * height / width
                ));
                if rng.gen_bool(VIDEO_PROBABILITY) {
                    let seconds = rng.gen_range(3..180u32);
                    asset = asset.into_video(Some(format!("{}:{:02}", seconds / 60, seconds % 60)));
                }
                asset.location = CITIES[rng.gen_range(0..CITIES.len())].map(str::to_string);
                asset.thumbhash = Some(THUMBHASHES[rng.gen_range(0..THUMBHASHES.len())].to_string());
                asset
            })
            .collect();

        assets.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));
        Self { assets }
    }

    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }
}

fn random_id(rng: &mut StdRng) -> String {
    (0..10)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect()
}

impl AssetSource for SyntheticSource {
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

#[cfg(test)]
mod tests {
    use super::*;

    fn until() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_same_seed_same_assets() {
        let a = SyntheticSource::new(50, 7, until());
        let b = SyntheticSource::new(50, 7, until());
        assert_eq!(a.assets(), b.assets());

        let c = SyntheticSource::new(50, 8, until());
        assert_ne!(a.assets(), c.assets());
    }

    #[test]
    fn test_assets_in_range_and_newest_first() {
        let source = SyntheticSource::new(200, 42, until());
        let assets = source.assets();
        assert_eq!(assets.len(), 200);
        assert!(assets.windows(2).all(|w| w[0].date >= w[1].date));
        for asset in assets {
            assert!((MIN_DIMENSION..=MAX_DIMENSION).contains(&asset.width));
            assert!((MIN_DIMENSION..=MAX_DIMENSION).contains(&asset.height));
            assert!(asset.date <= until());
            assert!(asset.url.contains(&asset.id));
            if !asset.is_video() {
                assert_eq!(asset.duration(), None);
            }
        }
        assert!(assets.iter().any(|a| a.is_video()));
    }

    #[test]
    fn test_paging() {
        let source = SyntheticSource::new(12, 1, until());
        let page = source.fetch_page(10, 5).unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0], source.assets()[10]);
    }
}
