// File: src/models/setting_record.rs
use serde::{Deserialize, Serialize};

pub const INSTRUMENT_NAMES: [&str; 5] = [
    "instrument_one",
    "instrument_two",
    "instrument_three",
    "instrument_four",
    "instrument_five",
];

pub const PARAMETER_NAMES: [&str; 5] = [
    "temperature",
    "power_level",
    "current_bias",
    "voltage",
    "flux_bias",
];

/// One telemetry sample: the value applied to an instrument parameter on a fridge.
///
/// Shared by the seed file, the generator, the HTTP responses and the
/// WebSocket feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingRecord {
    pub fridge_id: i64,
    pub instrument_name: String,
    pub parameter_name: String,
    pub applied_value: f64,
    /// Unix seconds
    pub timestamp: i64,
}

/// Optional exact-match criteria for `/settings`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsFilter {
    pub fridge_id: Option<i64>,
    pub instrument_name: Option<String>,
    pub parameter_name: Option<String>,
}

impl SettingsFilter {
    /// Zero ids and empty names count as "not supplied".
    pub fn matches(&self, record: &SettingRecord) -> bool {
        let fridge_ok = match self.fridge_id {
            Some(id) if id != 0 => record.fridge_id == id,
            _ => true,
        };
        let instrument_ok = match self.instrument_name.as_deref() {
            Some(name) if !name.is_empty() => record.instrument_name == name,
            _ => true,
        };
        let parameter_ok = match self.parameter_name.as_deref() {
            Some(name) if !name.is_empty() => record.parameter_name == name,
            _ => true,
        };

        fridge_ok && instrument_ok && parameter_ok
    }
}
