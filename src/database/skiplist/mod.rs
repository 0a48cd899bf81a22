//! SkipList: упорядоченное отображение на пропускном списке.
//!
//! # Модули
//!
//! - `arena`: хранилище узлов с индексами и free list.
//! - `skiplist_base`: однопоточная реализация.
//! - `concurrent`: потокобезопасная обёртка с `Arc<RwLock>`.
//! - `safety`: валидация инвариантов и статистика.

mod arena;
pub mod safety;
pub mod skiplist_base;

#[cfg(feature = "concurrent")]
pub mod concurrent;

#[cfg(feature = "concurrent")]
pub use concurrent::*;
pub use safety::*;
pub use skiplist_base::*;
