use config::{Config, Environment};
use serde::{Deserialize, Serialize};
use skipmap_error::ConfigError;

use super::{SkipListConfig, DEFAULT_MAX_LEVEL, DEFAULT_PROBABILITY};
use crate::logging::{LogFormat, LoggingConfig};

/// Префикс переменных окружения по умолчанию.
pub const ENV_PREFIX: &str = "SKIPMAP";

/// Настройки, собранные из значений по умолчанию и переменных окружения.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub max_level: usize,
    pub probability: f64,
    pub log_level: String,
    pub log_format: String,
}

impl Settings {
    /// Читает настройки из переменных окружения `SKIPMAP_*`.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_prefix(ENV_PREFIX)
    }

    pub fn load_with_prefix(prefix: &str) -> Result<Self, ConfigError> {
        let cfg = Config::builder()
            // Значения по умолчанию
            .set_default("max_level", DEFAULT_MAX_LEVEL as i64)
            .and_then(|b| b.set_default("probability", DEFAULT_PROBABILITY))
            .and_then(|b| b.set_default("log_level", "info"))
            .and_then(|b| b.set_default("log_format", "compact"))
            .map_err(load_error)?
            // Переменные окружения с префиксом, например SKIPMAP_MAX_LEVEL
            .add_source(Environment::with_prefix(prefix).try_parsing(true))
            .build()
            .map_err(load_error)?;

        cfg.try_deserialize().map_err(load_error)
    }

    /// Собирает и проверяет конфигурацию пропускного списка.
    pub fn skiplist_config(&self) -> Result<SkipListConfig, ConfigError> {
        Ok(SkipListConfig::new(self.max_level, self.probability)?)
    }

    /// Собирает конфигурацию логирования.
    pub fn logging_config(&self) -> Result<LoggingConfig, ConfigError> {
        let format = self.log_format.parse::<LogFormat>()?;
        let config = LoggingConfig {
            level: self.log_level.to_lowercase(),
            format,
            ..LoggingConfig::default()
        };

        config.validate()?;
        Ok(config)
    }
}

fn load_error(err: config::ConfigError) -> ConfigError {
    ConfigError::Load {
        reason: err.to_string(),
    }
}
