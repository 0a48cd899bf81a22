use std::any::Any;

use thiserror::Error;

use crate::{ErrorExt, StatusCode};

/// Ошибки пропускного списка.
///
/// Единственная ошибка, которую может вернуть сам список, возникает при
/// конструировании: поиск, вставка и удаление тотальны и сообщают об
/// отсутствии ключа через `Option`/`bool`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipListError {
    /// Параметры конструктора вне допустимого диапазона.
    #[error("Invalid configuration: {parameter} = {value} ({reason})")]
    InvalidConfiguration {
        parameter: &'static str,
        value: String,
        reason: &'static str,
    },
}

impl SkipListError {
    /// `max_level` меньше единицы.
    pub fn invalid_max_level(max_level: usize) -> Self {
        Self::InvalidConfiguration {
            parameter: "max_level",
            value: max_level.to_string(),
            reason: "must be at least 1",
        }
    }

    /// `probability` вне открытого интервала (0, 1).
    pub fn invalid_probability(probability: f64) -> Self {
        Self::InvalidConfiguration {
            parameter: "probability",
            value: probability.to_string(),
            reason: "must lie in the open interval (0, 1)",
        }
    }

    /// Имя отвергнутого параметра.
    pub fn parameter(&self) -> &'static str {
        match self {
            Self::InvalidConfiguration { parameter, .. } => parameter,
        }
    }
}

impl ErrorExt for SkipListError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidConfiguration { .. } => StatusCode::InvalidArgs,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
