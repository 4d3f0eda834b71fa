//! File-backed lamp store.
//!
//! Reads the three pipeline-produced files from the data directory. The
//! daily pipeline rewrites them atomically, so a single read at startup sees
//! a consistent snapshot.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use geojson::FeatureCollection;

use lampioni_domain::{IsoDate, Lamp, LampData, Stats, BASELINE_DATE};

use super::ports::{LampStorePort, StoreError};

pub const STATS_FILE: &str = "stats.json";
pub const BASELINE_FILE: &str = "streetlamps-baseline.geojson";
pub const NEW_FILE: &str = "streetlamps-new.geojson";

pub struct FileLampStore {
    data_dir: PathBuf,
}

impl FileLampStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    async fn read_lamps(&self, file: &str) -> Result<Vec<Lamp>, StoreError> {
        let raw = tokio::fs::read_to_string(self.data_dir.join(file)).await?;
        let collection: FeatureCollection = serde_json::from_str(&raw)?;
        collection
            .features
            .into_iter()
            .map(|feature| {
                Lamp::from_feature(feature).map_err(|e| StoreError::Feature {
                    file: file.to_string(),
                    reason: e.to_string(),
                })
            })
            .collect()
    }
}

#[async_trait]
impl LampStorePort for FileLampStore {
    async fn load(&self) -> Result<LampData, StoreError> {
        let raw_stats = tokio::fs::read_to_string(self.data_dir.join(STATS_FILE)).await?;
        let stats: Stats = serde_json::from_str(&raw_stats)?;

        let baseline = self.read_lamps(BASELINE_FILE).await?;
        let new = self.read_lamps(NEW_FILE).await?;

        tracing::info!(
            baseline = baseline.len(),
            new = new.len(),
            data_dir = %self.data_dir.display(),
            "Lamp data loaded"
        );

        Ok(LampData::new(
            stats,
            baseline,
            new,
            IsoDate::from(BASELINE_DATE),
        ))
    }
}
