// File: src/services/generator/record_generator.rs
use crate::models::setting_record::{INSTRUMENT_NAMES, PARAMETER_NAMES, SettingRecord};
use chrono::{Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;
use tracing::debug;

const FRIDGE_ID_MIN: i64 = 1;
const FRIDGE_ID_MAX: i64 = 10;
/// applied_value is drawn in hundredths so rounding can never reach 100.0
const APPLIED_VALUE_CENTS: u32 = 10_000;
const WINDOW_DAYS: i64 = 365;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOrder {
    AsGenerated,
    /// Newest first
    Descending,
}

/// Produces synthetic setting records, every field drawn independently.
pub struct SettingGenerator {
    rng: Mutex<StdRng>,
    window_start: i64,
    window_end: i64,
}

impl SettingGenerator {
    /// Fixes the sampling window to the year before now. `seed` makes the
    /// output reproducible.
    pub fn new(seed: Option<u64>) -> Self {
        let now = Utc::now();
        let start = now - Duration::days(WINDOW_DAYS);
        Self::with_window(seed, start.timestamp(), now.timestamp())
    }

    pub fn with_window(seed: Option<u64>, window_start: i64, window_end: i64) -> Self {
        let rng = match seed {
            Some(seed) => {
                debug!("Record generator seeded with {}", seed);
                StdRng::seed_from_u64(seed)
            }
            None => StdRng::from_entropy(),
        };

        Self {
            rng: Mutex::new(rng),
            window_start: window_start.min(window_end),
            window_end: window_end.max(window_start),
        }
    }

    pub fn window(&self) -> (i64, i64) {
        (self.window_start, self.window_end)
    }

    pub fn generate(&self) -> SettingRecord {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        self.draw(&mut rng)
    }

    /// Exactly `count` records; the lock is taken once for the whole batch.
    pub fn generate_many(&self, count: usize, order: RecordOrder) -> Vec<SettingRecord> {
        let mut records = {
            let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            (0..count).map(|_| self.draw(&mut rng)).collect::<Vec<_>>()
        };

        if order == RecordOrder::Descending {
            records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        }

        records
    }

    fn draw(&self, rng: &mut StdRng) -> SettingRecord {
        let instrument = INSTRUMENT_NAMES[rng.gen_range(0..INSTRUMENT_NAMES.len())];
        let parameter = PARAMETER_NAMES[rng.gen_range(0..PARAMETER_NAMES.len())];
        let cents = rng.gen_range(0..APPLIED_VALUE_CENTS);

        SettingRecord {
            fridge_id: rng.gen_range(FRIDGE_ID_MIN..=FRIDGE_ID_MAX),
            instrument_name: instrument.to_string(),
            parameter_name: parameter.to_string(),
            applied_value: f64::from(cents) / 100.0,
            timestamp: rng.gen_range(self.window_start..=self.window_end),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_valid(record: &SettingRecord, window: (i64, i64)) {
        assert!((FRIDGE_ID_MIN..=FRIDGE_ID_MAX).contains(&record.fridge_id));
        assert!(INSTRUMENT_NAMES.contains(&record.instrument_name.as_str()));
        assert!(PARAMETER_NAMES.contains(&record.parameter_name.as_str()));
        assert!(record.applied_value >= 0.0 && record.applied_value < 100.0);
        let scaled = record.applied_value * 100.0;
        assert!((scaled - scaled.round()).abs() < 1e-6, "more than 2 decimals: {}", record.applied_value);
        assert!(record.timestamp >= window.0 && record.timestamp <= window.1);
    }

    #[test]
    fn test_generated_records_stay_in_domain() {
        let generator = SettingGenerator::new(None);
        let window = generator.window();
        for _ in 0..2_000 {
            assert_valid(&generator.generate(), window);
        }
    }

    #[test]
    fn test_window_spans_one_year_ending_now() {
        let generator = SettingGenerator::new(None);
        let (start, end) = generator.window();
        assert_eq!(end - start, WINDOW_DAYS * 24 * 60 * 60);
        assert!((Utc::now().timestamp() - end).abs() <= 5);
    }

    #[test]
    fn test_generate_many_returns_exact_count() {
        let generator = SettingGenerator::new(Some(7));
        assert_eq!(generator.generate_many(0, RecordOrder::AsGenerated).len(), 0);
        assert_eq!(generator.generate_many(37, RecordOrder::AsGenerated).len(), 37);
    }

    #[test]
    fn test_descending_order_is_non_increasing() {
        let generator = SettingGenerator::new(None);
        let records = generator.generate_many(500, RecordOrder::Descending);
        assert!(records.windows(2).all(|pair| pair[0].timestamp >= pair[1].timestamp));
    }

    #[test]
    fn test_seeded_generators_agree() {
        let a = SettingGenerator::with_window(Some(42), 0, 1_000_000);
        let b = SettingGenerator::with_window(Some(42), 0, 1_000_000);
        assert_eq!(
            a.generate_many(20, RecordOrder::AsGenerated),
            b.generate_many(20, RecordOrder::AsGenerated)
        );
    }

    #[test]
    fn test_degenerate_window_pins_timestamp() {
        let generator = SettingGenerator::with_window(None, 1_234, 1_234);
        assert_eq!(generator.generate().timestamp, 1_234);
    }

    #[test]
    fn test_every_enumerated_name_eventually_appears() {
        let generator = SettingGenerator::new(Some(1));
        let records = generator.generate_many(1_000, RecordOrder::AsGenerated);
        for name in INSTRUMENT_NAMES {
            assert!(records.iter().any(|r| r.instrument_name == name));
        }
        for name in PARAMETER_NAMES {
            assert!(records.iter().any(|r| r.parameter_name == name));
        }
    }
}
