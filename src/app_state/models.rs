// src/app_state/models.rs
use crate::env_config::models::app_setting::AppSettings;
use crate::services::generator::record_generator::SettingGenerator;
use crate::services::pagination::paginator::Paginator;
use crate::services::sample_store::store::SampleStore;
use crate::services::streaming::registry::ConnectionRegistry;
use crate::services::streaming::stream_loop::StreamLoop;
use axum::extract::ws::Message;
use std::sync::Arc;
use tracing::debug;

pub struct AppState {
    pub settings: Arc<AppSettings>,
    pub sample_store: Arc<SampleStore>,
    pub paginator: Arc<Paginator>,
    pub stream_loop: StreamLoop,
    pub registry: Arc<ConnectionRegistry<Message>>,
}

impl AppState {
    /// Wires the services around one shared generator.
    pub fn new(settings: Arc<AppSettings>, sample_store: Arc<SampleStore>) -> Self {
        let config = &settings.app_config;
        let generator = Arc::new(SettingGenerator::new(config.generator.seed));
        let (window_start, window_end) = generator.window();
        debug!("Generator timestamp window: {} to {}", window_start, window_end);

        Self {
            paginator: Arc::new(Paginator::new(generator.clone(), &config.pagination)),
            stream_loop: StreamLoop::new(generator, config.stream.interval()),
            registry: Arc::new(ConnectionRegistry::new()),
            sample_store,
            settings,
        }
    }
}

#[cfg(test)]
pub mod test_support {
    use super::*;
    use crate::env_config::models::app_config::AppConfig;
    use crate::env_config::models::app_env::{AppEnv, Env};
    use crate::models::setting_record::SettingRecord;
    use std::time::Duration;

    pub const TEST_CONFIG: &str = r#"
        [log]
        level = "debug"
        format = "plain"

        [seed]
        path = "data/data.json"

        [pagination]

        [stream]
        interval_seconds = 2
    "#;

    /// State over the given seed records with a custom stream interval.
    pub fn test_state(seed: Vec<SettingRecord>, interval: Duration) -> Arc<AppState> {
        let settings = Arc::new(AppSettings {
            app_config: AppConfig::from_toml_str(TEST_CONFIG).expect("test config"),
            app_env: AppEnv {
                env: Env::Local,
                server_port: 0,
                server_address: "127.0.0.1".to_string(),
            },
        });

        let mut state = AppState::new(settings, Arc::new(SampleStore::from_records(seed)));
        state.stream_loop = StreamLoop::new(Arc::new(SettingGenerator::new(None)), interval);
        Arc::new(state)
    }
}
