use super::models::app_config::AppConfig;
use super::models::app_env::Env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const CONFIG_DIR: &str = "config";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

impl AppConfig {
    /// Loads `config/{env}.toml`. Startup cannot continue without it.
    pub fn new(env: &Env) -> AppConfig {
        let path = Path::new(CONFIG_DIR).join(format!("{}.toml", env));
        AppConfig::from_file(&path).unwrap_or_else(|e| panic!("CONFIG -> {}", e))
    }

    pub fn from_file(path: &Path) -> Result<AppConfig, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        AppConfig::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> Result<AppConfig, ConfigError> {
        let config: AppConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.stream.interval_seconds == 0 {
            return Err(ConfigError::Invalid(
                "stream.interval_seconds must be positive".to_string(),
            ));
        }
        if self.stream.outbound_buffer == 0 {
            return Err(ConfigError::Invalid(
                "stream.outbound_buffer must be positive".to_string(),
            ));
        }
        if self.pagination.live_max_page_size == 0 || self.pagination.historical_max_page_size == 0 {
            return Err(ConfigError::Invalid(
                "pagination page size bounds must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOCAL: &str = r#"
        [log]
        level = "debug"
        format = "plain"

        [seed]
        path = "data/data.json"

        [pagination]

        [stream]
        interval_seconds = 2
    "#;

    #[test]
    fn test_defaults_fill_optional_sections() {
        let config = AppConfig::from_toml_str(LOCAL).unwrap();
        assert_eq!(config.pagination.nominal_total, 1000);
        assert_eq!(config.pagination.live_max_page_size, 100);
        assert_eq!(config.pagination.historical_max_page_size, 1000);
        assert_eq!(config.stream.outbound_buffer, 32);
        assert_eq!(config.stream.interval(), std::time::Duration::from_secs(2));
        assert!(config.generator.seed.is_none());
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        let raw = LOCAL.replace("interval_seconds = 2", "interval_seconds = 0");
        assert!(matches!(AppConfig::from_toml_str(&raw), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_missing_section_is_parse_error() {
        let raw = LOCAL.replace("[seed]", "[seed_path]");
        assert!(matches!(AppConfig::from_toml_str(&raw), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_shipped_configs_parse() {
        let root = Path::new(env!("CARGO_MANIFEST_DIR")).join(CONFIG_DIR);
        for env in [Env::Local, Env::Dev, Env::Prod] {
            let path = root.join(format!("{}.toml", env));
            assert!(AppConfig::from_file(&path).is_ok(), "{} failed", path.display());
        }
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let err = AppConfig::from_file(Path::new("does/not/exist.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
