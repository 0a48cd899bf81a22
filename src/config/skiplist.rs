use serde::{Deserialize, Serialize};
use skipmap_error::{SkipListError, SkipListResult};

/// Верхняя граница высоты башни по умолчанию.
pub const DEFAULT_MAX_LEVEL: usize = 16;

/// Вероятность повышения уровня узла по умолчанию.
pub const DEFAULT_PROBABILITY: f64 = 0.5;

/// Параметры пропускного списка.
///
/// Оба значения фиксируются при создании списка и больше не меняются.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkipListConfig {
    /// Максимальная высота башни узла (не меньше 1).
    pub max_level: usize,
    /// Вероятность повышения уровня, строго внутри (0, 1).
    pub probability: f64,
}

impl SkipListConfig {
    pub fn new(
        max_level: usize,
        probability: f64,
    ) -> SkipListResult<Self> {
        let config = Self {
            max_level,
            probability,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_max_level(
        mut self,
        max_level: usize,
    ) -> Self {
        self.max_level = max_level;
        self
    }

    pub fn with_probability(
        mut self,
        probability: f64,
    ) -> Self {
        self.probability = probability;
        self
    }

    /// Проверяет диапазоны параметров.
    ///
    /// `NaN` не попадает в интервал и отвергается так же, как 0 и 1.
    pub fn validate(&self) -> SkipListResult<()> {
        if self.max_level < 1 {
            return Err(SkipListError::invalid_max_level(self.max_level));
        }

        if !(self.probability > 0.0 && self.probability < 1.0) {
            return Err(SkipListError::invalid_probability(self.probability));
        }

        Ok(())
    }
}

impl Default for SkipListConfig {
    fn default() -> Self {
        Self {
            max_level: DEFAULT_MAX_LEVEL,
            probability: DEFAULT_PROBABILITY,
        }
    }
}
