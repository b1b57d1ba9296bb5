// File: src/models/page.rs
use super::setting_record::SettingRecord;
use serde::{Deserialize, Serialize};

/// Response envelope for `/live` and `/historical`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    pub data: Vec<SettingRecord>,
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
    pub has_next: bool,
}

/// Raw query parameters. Signed so that `page=0` or `page=-1` reach validation
/// instead of being rejected by the extractor.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_page_size")]
    pub page_size: i64,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    10
}

/// Envelope around a plain record list, as returned by `/settings` and `/dummy`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataEnvelope {
    pub data: Vec<SettingRecord>,
}
