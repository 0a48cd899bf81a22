use std::any::Any;

use skipmap_error::{ErrorExt, StatusCode};
use thiserror::Error;

/// Макрос для валидации условий с возвратом ошибки.
#[macro_export]
macro_rules! validate {
    ($cond:expr, $err:expr) => {
        if !$cond {
            return Err($err);
        }
    };
}

/// Нарушение структурного инварианта пропускного списка.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Уровень узла или списка вне диапазона `1..=max_level`
    #[error("Level {node_level} is outside 1..={max_level}")]
    InvalidLevel { node_level: usize, max_level: usize },
    /// Размер башни не соответствует уровню, на котором найден узел
    #[error("Forward vector size mismatch: expected at least {expected}, got {actual}")]
    ForwardVectorMismatch { expected: usize, actual: usize },
    /// Головная башня содержит ссылку выше текущего уровня
    #[error("Head is linked at level {level} above current level {current_level}")]
    LevelAboveCurrent { level: usize, current_level: usize },
    /// Нарушен порядок сортировки
    #[error("Sort order violation: {message}")]
    SortOrderViolation { message: String },
    /// Длина списка не соответствует реальному кол-ву узлов
    #[error("Length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
    /// Кол-во узлов на уровне не совпадает с кол-вом достаточно высоких башен
    #[error("Tower mismatch at level {level}: expected {expected} nodes, got {actual}")]
    TowerMismatch {
        level: usize,
        expected: usize,
        actual: usize,
    },
    /// Ссылка указывает на освобождённый слот арены
    #[error("Dangling link: {message}")]
    DanglingLink { message: String },
    /// Обнаружена циклическая ссылка
    #[error("Cyclic reference detected: {message}")]
    CyclicReference { message: String },
}

impl ErrorExt for ValidationError {
    fn status_code(&self) -> StatusCode {
        StatusCode::InvariantViolation
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Статистика структуры SkipList.
#[derive(Debug, Clone, PartialEq)]
pub struct SkipListStatistics {
    /// Количество узлов
    pub node_count: usize,
    /// Распределение по высоте башни: индекс `i` соответствует узлам высоты `i + 1`
    pub level_distribution: Vec<usize>,
    /// Текущий уровень списка
    pub current_max_level: usize,
    /// Максимально возможный уровень
    pub max_possible_level: usize,
    /// Средний уровень узла
    pub average_level: f64,
    /// Слотов в арене, включая свободные
    pub arena_slots: usize,
}

impl SkipListStatistics {
    /// Создает пустую статистику.
    pub fn empty(max_level: usize) -> Self {
        Self {
            node_count: 0,
            level_distribution: vec![0; max_level],
            current_max_level: 1,
            max_possible_level: max_level,
            average_level: 0.0,
            arena_slots: 0,
        }
    }

    /// Вычисляет средний уровень.
    pub fn compute_average_level(&mut self) {
        if self.node_count == 0 {
            self.average_level = 0.0;
            return;
        }

        let total_levels: usize = self
            .level_distribution
            .iter()
            .enumerate()
            .map(|(level, &count)| (level + 1) * count)
            .sum();

        self.average_level = total_levels as f64 / self.node_count as f64;
    }

    /// Форматирует статистику для вывода.
    pub fn format_report(&self) -> String {
        let mut report = String::new();
        report.push_str("SkipList Statistics:\n");
        report.push_str(&format!("  Total nodes: {}\n", self.node_count));
        report.push_str(&format!(
            "  Current max level: {}\n",
            self.current_max_level
        ));
        report.push_str(&format!(
            "  Max possible level: {}\n",
            self.max_possible_level
        ));
        report.push_str(&format!("  Average level: {:.2}\n", self.average_level));
        report.push_str(&format!("  Arena slots: {}\n", self.arena_slots));
        report.push_str("  Level distribution:\n");

        for (level, &count) in self.level_distribution.iter().enumerate() {
            if count > 0 {
                let percentage = (count as f64 / self.node_count as f64) * 100.0;
                report.push_str(&format!(
                    "    Level {}: {} nodes ({:.1}%)\n",
                    level + 1,
                    count,
                    percentage
                ));
            }
        }

        report
    }
}
