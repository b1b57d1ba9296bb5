use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub log: LogConfig,
    pub seed: SeedConfig,
    pub pagination: PaginationConfig,
    pub stream: StreamConfig,
    #[serde(default)]
    pub generator: GeneratorConfig,
}

#[derive(Debug, Deserialize)]
pub struct LogConfig {
    pub level: String,
    pub format: String,
}

#[derive(Debug, Deserialize)]
pub struct SeedConfig {
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaginationConfig {
    #[serde(default = "default_nominal_total")]
    pub nominal_total: u64,
    #[serde(default = "default_live_max_page_size")]
    pub live_max_page_size: u64,
    #[serde(default = "default_historical_max_page_size")]
    pub historical_max_page_size: u64,
}

#[derive(Debug, Deserialize)]
pub struct StreamConfig {
    pub interval_seconds: u64,
    #[serde(default = "default_outbound_buffer")]
    pub outbound_buffer: usize,
}

#[derive(Debug, Default, Deserialize)]
pub struct GeneratorConfig {
    /// Fixed RNG seed; unset means non-deterministic output
    #[serde(default)]
    pub seed: Option<u64>,
}

impl StreamConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds)
    }
}

fn default_nominal_total() -> u64 {
    1000
}

fn default_live_max_page_size() -> u64 {
    100
}

fn default_historical_max_page_size() -> u64 {
    1000
}

fn default_outbound_buffer() -> usize {
    32
}
