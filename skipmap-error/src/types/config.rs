use std::any::Any;

use thiserror::Error;

use crate::{ErrorExt, SkipListError, StatusCode};

/// Ошибки загрузки и проверки конфигурации.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Источник конфигурации не удалось прочитать или разобрать.
    #[error("Failed to load configuration: {reason}")]
    Load { reason: String },
    /// Значение прочитано, но не проходит проверку.
    #[error("Invalid configuration value for '{key}': {reason}")]
    Invalid { key: String, reason: String },
}

impl From<SkipListError> for ConfigError {
    fn from(err: SkipListError) -> Self {
        match err {
            SkipListError::InvalidConfiguration {
                parameter,
                value,
                reason,
            } => Self::Invalid {
                key: parameter.to_string(),
                reason: format!("{value} {reason}"),
            },
        }
    }
}

impl ErrorExt for ConfigError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Load { .. } => StatusCode::ConfigLoad,
            Self::Invalid { .. } => StatusCode::ConfigInvalid,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
