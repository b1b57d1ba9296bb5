// File: src/services/sample_store/seed_source.rs
use crate::error::ServiceError;
use crate::models::setting_record::SettingRecord;
use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[async_trait]
pub trait TraitSeedSource {
    /// Reads every record the source holds.
    async fn read_all(&self) -> Result<Vec<SettingRecord>, ServiceError>;
}

/// Accepted seed layouts: `{"data": [...]}` or a bare array.
///
/// Records are parsed into `SettingRecord`, so fields outside the record are
/// dropped and integer values come back out as floats. One record that fails
/// to parse rejects the whole document.
#[derive(Deserialize)]
#[serde(untagged)]
enum SeedDocument {
    Wrapped { data: Vec<SettingRecord> },
    Bare(Vec<SettingRecord>),
}

impl From<SeedDocument> for Vec<SettingRecord> {
    fn from(doc: SeedDocument) -> Self {
        match doc {
            SeedDocument::Wrapped { data } => data,
            SeedDocument::Bare(data) => data,
        }
    }
}

pub struct StructFileSeedSource {
    path: PathBuf,
}

impl StructFileSeedSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn unavailable(&self, reason: impl ToString) -> ServiceError {
        ServiceError::SeedUnavailable {
            path: self.path.clone(),
            reason: reason.to_string(),
        }
    }
}

#[async_trait]
impl TraitSeedSource for StructFileSeedSource {
    async fn read_all(&self) -> Result<Vec<SettingRecord>, ServiceError> {
        debug!("Reading seed file {}", self.path.display());

        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| self.unavailable(e))?;

        let document: SeedDocument = serde_json::from_str(&raw).map_err(|e| self.unavailable(e))?;

        Ok(document.into())
    }
}
