// File: src/services/sample_store/store.rs
use super::seed_source::TraitSeedSource;
use crate::models::setting_record::{SettingRecord, SettingsFilter};
use std::sync::Arc;
use tracing::{info, warn};

/// Read-only cache of the seed collection, loaded once at startup.
pub struct SampleStore {
    records: Arc<Vec<SettingRecord>>,
}

impl SampleStore {
    /// Loads the seed source. An unavailable or malformed source yields an
    /// empty store rather than an error.
    pub async fn load(source: &(dyn TraitSeedSource + Send + Sync)) -> Self {
        let records = match source.read_all().await {
            Ok(records) => {
                info!("Sample store loaded {} seed records", records.len());
                records
            }
            Err(e) => {
                warn!("{}; serving an empty seed collection", e);
                Vec::new()
            }
        };

        Self::from_records(records)
    }

    pub fn from_records(records: Vec<SettingRecord>) -> Self {
        Self {
            records: Arc::new(records),
        }
    }

    pub fn all(&self) -> Arc<Vec<SettingRecord>> {
        self.records.clone()
    }

    pub fn filter(&self, filter: &SettingsFilter) -> Vec<SettingRecord> {
        self.records
            .iter()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
