use std::{
    borrow::Borrow,
    fmt::{self, Debug},
    ops::{Deref, DerefMut},
    sync::{
        atomic::{AtomicU64, AtomicUsize, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use skipmap_error::SkipListResult;
use tracing::trace;

use super::{SkipList, SkipListStatistics, ValidationError};
use crate::config::SkipListConfig;

/// Потокобезопасная обёртка над [`SkipList`].
///
/// Чтение берёт разделяемую блокировку, вставка и удаление берут эксклюзивную.
/// Guard освобождает блокировку на любом пути выхода, включая раскрутку
/// стека после паники в `Ord` ключа; `parking_lot::RwLock` не отравляется,
/// поэтому после такой паники список остаётся доступным.
///
/// Клоны разделяют один и тот же список.
pub struct ConcurrentSkipList<K, V> {
    inner: Arc<RwLock<SkipList<K, V>>>,
    cached_length: Arc<AtomicUsize>,
    metrics: Arc<ContentionMetrics>,
}

#[derive(Debug, Default)]
pub struct ContentionMetrics {
    pub read_locks: AtomicUsize,
    pub write_locks: AtomicUsize,
    pub total_wait_time_ns: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentionSnapshot {
    pub read_locks: usize,
    pub write_locks: usize,
    pub total_wait_time_ns: u64,
}

/// Эксклюзивный доступ, который при освобождении обновляет кэш длины.
struct WriteScope<'a, K: Ord, V> {
    guard: RwLockWriteGuard<'a, SkipList<K, V>>,
    cached_length: &'a AtomicUsize,
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl<K: Ord, V> ConcurrentSkipList<K, V> {
    /// Создаёт пустой список с конфигурацией по умолчанию.
    pub fn new() -> Self {
        Self::from_skiplist(SkipList::default())
    }

    pub fn with_config(config: SkipListConfig) -> SkipListResult<Self> {
        Ok(Self::from_skiplist(SkipList::new(config)?))
    }

    /// Оборачивает уже заполненный список.
    pub fn from_skiplist(list: SkipList<K, V>) -> Self {
        Self {
            cached_length: Arc::new(AtomicUsize::new(list.len())),
            inner: Arc::new(RwLock::new(list)),
            metrics: Arc::new(ContentionMetrics::default()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, SkipList<K, V>> {
        let start = Instant::now();
        let guard = self.inner.read();
        let elapsed = start.elapsed().as_nanos() as u64;

        self.metrics.inc_read(elapsed);
        trace!(wait_ns = elapsed, "skiplist shared lock acquired");

        guard
    }

    fn write(&self) -> WriteScope<'_, K, V> {
        let start = Instant::now();
        let guard = self.inner.write();
        let elapsed = start.elapsed().as_nanos() as u64;

        self.metrics.inc_write(elapsed);
        trace!(wait_ns = elapsed, "skiplist exclusive lock acquired");

        WriteScope {
            guard,
            cached_length: &self.cached_length,
        }
    }

    pub fn insert(
        &self,
        key: K,
        value: V,
    ) {
        self.write().insert(key, value);
    }

    /// Возвращает копию значения, если ключ найден.
    pub fn get<Q>(
        &self,
        key: &Q,
    ) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
        V: Clone,
    {
        self.read().get(key).cloned()
    }

    pub fn contains<Q>(
        &self,
        key: &Q,
    ) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.read().contains(key)
    }

    pub fn remove<Q>(
        &self,
        key: &Q,
    ) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.write().remove(key)
    }

    pub fn take<Q>(
        &self,
        key: &Q,
    ) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.write().take(key)
    }

    /// Длина из кэша, без захвата блокировки.
    pub fn len(&self) -> usize {
        self.cached_length.load(Ordering::Relaxed)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.write().clear();
    }

    pub fn first(&self) -> Option<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        self.read().first().map(|(k, v)| (k.clone(), v.clone()))
    }

    pub fn last(&self) -> Option<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        self.read().last().map(|(k, v)| (k.clone(), v.clone()))
    }

    pub fn keys(&self) -> Vec<K>
    where
        K: Clone,
    {
        self.read().keys()
    }

    pub fn current_level(&self) -> usize {
        self.read().current_level()
    }

    pub fn statistics(&self) -> SkipListStatistics {
        self.read().statistics()
    }

    pub fn validate_invariants(&self) -> Result<(), ValidationError>
    where
        K: Debug,
    {
        self.read().validate_invariants()
    }

    /// Выполняет замыкание под разделяемой блокировкой.
    pub fn with_read<F, R>(
        &self,
        f: F,
    ) -> R
    where
        F: FnOnce(&SkipList<K, V>) -> R,
    {
        f(&*self.read())
    }

    /// Выполняет замыкание под эксклюзивной блокировкой.
    pub fn with_write<F, R>(
        &self,
        f: F,
    ) -> R
    where
        F: FnOnce(&mut SkipList<K, V>) -> R,
    {
        f(&mut *self.write())
    }

    pub fn metrics(&self) -> ContentionSnapshot {
        ContentionSnapshot {
            read_locks: self.metrics.read_locks.load(Ordering::Relaxed),
            write_locks: self.metrics.write_locks.load(Ordering::Relaxed),
            total_wait_time_ns: self.metrics.total_wait_time_ns.load(Ordering::Relaxed),
        }
    }

    pub fn reset_metrics(&self) {
        self.metrics.reset();
    }

    pub fn snapshot_and_reset(&self) -> ContentionSnapshot {
        ContentionSnapshot {
            read_locks: self.metrics.read_locks.swap(0, Ordering::Relaxed),
            write_locks: self.metrics.write_locks.swap(0, Ordering::Relaxed),
            total_wait_time_ns: self.metrics.total_wait_time_ns.swap(0, Ordering::Relaxed),
        }
    }
}

impl ContentionSnapshot {
    pub fn total_locks(&self) -> usize {
        self.read_locks + self.write_locks
    }

    pub fn average_wait_time_ns(&self) -> f64 {
        let total_locks = self.total_locks();

        if total_locks == 0 {
            0.0
        } else {
            self.total_wait_time_ns as f64 / total_locks as f64
        }
    }

    pub fn read_write_ratio(&self) -> f64 {
        if self.write_locks == 0 {
            f64::INFINITY
        } else {
            self.read_locks as f64 / self.write_locks as f64
        }
    }

    pub fn avg_wait_time_us(&self) -> f64 {
        self.average_wait_time_ns() / 1000.0
    }

    pub fn average_wait_duration(&self) -> Duration {
        Duration::from_nanos(self.average_wait_time_ns() as u64)
    }

    pub fn format_report(&self) -> String {
        format!(
            "Contention Metrics:\n\
                 Read locks: {}\n\
                 Write locks: {}\n\
                 R/W ratio: {:.2}\n\
                 Avg wait time: {:.2} µs\n",
            self.read_locks,
            self.write_locks,
            self.read_write_ratio(),
            self.avg_wait_time_us(),
        )
    }
}

impl ContentionMetrics {
    pub fn reset(&self) {
        self.read_locks.store(0, Ordering::Relaxed);
        self.write_locks.store(0, Ordering::Relaxed);
        self.total_wait_time_ns.store(0, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn inc_read(
        &self,
        duration_ns: u64,
    ) {
        self.read_locks.fetch_add(1, Ordering::Relaxed);
        self.total_wait_time_ns
            .fetch_add(duration_ns, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn inc_write(
        &self,
        duration_ns: u64,
    ) {
        self.write_locks.fetch_add(1, Ordering::Relaxed);
        self.total_wait_time_ns
            .fetch_add(duration_ns, Ordering::Relaxed);
    }
}

////////////////////////////////////////////////////////////////////////////////
// Общие реализации трейтов для ConcurrentSkipList
////////////////////////////////////////////////////////////////////////////////

impl<K, V> Clone for ConcurrentSkipList<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            cached_length: Arc::clone(&self.cached_length),
            metrics: Arc::clone(&self.metrics),
        }
    }
}

impl<K: Ord, V> Debug for ConcurrentSkipList<K, V> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("ConcurrentSkipList")
            .field("len", &self.len())
            .field("metrics", &self.metrics())
            .finish_non_exhaustive()
    }
}

impl<K: Ord, V> Default for ConcurrentSkipList<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, V> Deref for WriteScope<'_, K, V> {
    type Target = SkipList<K, V>;

    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}

impl<K: Ord, V> DerefMut for WriteScope<'_, K, V> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.guard
    }
}

impl<K: Ord, V> Drop for WriteScope<'_, K, V> {
    fn drop(&mut self) {
        // Выполняется и при раскрутке стека, пока guard ещё удерживается.
        self.cached_length.store(self.guard.len(), Ordering::Relaxed);
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
