use std::{env, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use skipmap_error::ConfigError;

/// Допустимые уровни логирования.
const LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

/// Формат вывода событий.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    #[default]
    Compact,
    Json,
}

/// Конфигурация логирования.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Базовый уровень (`trace`, `debug`, `info`, `warn`, `error`, `off`).
    pub level: String,
    pub format: LogFormat,
    pub with_ansi: bool,
    pub with_target: bool,
    pub with_thread_ids: bool,
    pub with_line_numbers: bool,
    /// Дополнительные директивы `EnvFilter`, например `skipmap=trace`.
    pub directives: Vec<String>,
}

impl LoggingConfig {
    /// Применяет переопределения из окружения: `SKIPMAP_LOG_LEVEL`,
    /// `SKIPMAP_LOG_FORMAT` и `NO_COLOR`.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(level) = env::var("SKIPMAP_LOG_LEVEL") {
            self.level = level.to_lowercase();
        }

        if let Ok(format) = env::var("SKIPMAP_LOG_FORMAT") {
            match format.parse() {
                Ok(format) => self.format = format,
                Err(e) => eprintln!("Ignoring SKIPMAP_LOG_FORMAT: {e}"),
            }
        }

        if env::var_os("NO_COLOR").is_some() {
            self.with_ansi = false;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !LEVELS.contains(&self.level.as_str()) {
            return Err(ConfigError::Invalid {
                key: "log_level".to_string(),
                reason: format!("unknown level '{}', expected one of {LEVELS:?}", self.level),
            });
        }

        if let Some(bad) = self.directives.iter().find(|d| d.trim().is_empty()) {
            return Err(ConfigError::Invalid {
                key: "directives".to_string(),
                reason: format!("empty filter directive '{bad}'"),
            });
        }

        Ok(())
    }

    /// Строка для `EnvFilter`: базовый уровень и дополнительные директивы.
    pub fn build_filter_directive(&self) -> String {
        std::iter::once(self.level.as_str())
            .chain(self.directives.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
            with_ansi: true,
            with_target: true,
            with_thread_ids: false,
            with_line_numbers: false,
            directives: Vec::new(),
        }
    }
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Invalid {
                key: "log_format".to_string(),
                reason: format!("unknown format '{other}'"),
            }),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let name = match self {
            Self::Pretty => "pretty",
            Self::Compact => "compact",
            Self::Json => "json",
        };
        f.write_str(name)
    }
}
