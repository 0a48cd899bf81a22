use std::{
    borrow::Borrow,
    fmt::{self, Debug},
};

use rand::{rngs::StdRng, Rng, SeedableRng};
use skipmap_error::SkipListResult;
use tracing::{debug, trace};

use super::{
    arena::{Link, Node, NodeArena, NodeId},
    SkipListStatistics, ValidationError,
};
use crate::{config::SkipListConfig, validate};

/// Позиция спуска: головной sentinel или узел арены.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    Head,
    Node(NodeId),
}

/// SkipList: упорядоченное отображение на основе пропускного списка.
///
/// Однопоточная структура: для доступа из нескольких потоков используйте
/// [`ConcurrentSkipList`](super::ConcurrentSkipList).
///
/// Источник случайности `R` определяет высоту новых узлов. По умолчанию это
/// [`StdRng`], инициализированный энтропией ОС.
#[derive(Clone)]
pub struct SkipList<K, V, R = StdRng> {
    /// Башня головного sentinel; её длина всегда равна `max_level`.
    head: Vec<Link>,
    nodes: NodeArena<K, V>,
    /// Текущий уровень: самый высокий уровень, в котором есть хотя бы один
    /// узел (минимум 1).
    level: usize,
    length: usize,
    config: SkipListConfig,
    rng: R,
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl<K: Ord, V> SkipList<K, V> {
    /// Создаёт пустой список с заданной конфигурацией.
    ///
    /// Возвращает `InvalidConfiguration`, если `max_level < 1` или
    /// `probability` вне интервала (0, 1).
    pub fn new(config: SkipListConfig) -> SkipListResult<Self> {
        Self::with_rng(config, StdRng::from_entropy())
    }
}

impl<K: Ord, V, R: Rng> SkipList<K, V, R> {
    /// Создаёт пустой список с собственным источником случайности.
    pub fn with_rng(
        config: SkipListConfig,
        rng: R,
    ) -> SkipListResult<Self> {
        config.validate()?;

        debug!(
            max_level = config.max_level,
            probability = config.probability,
            "skiplist created"
        );

        Ok(Self::from_parts(config, rng))
    }

    fn from_parts(
        config: SkipListConfig,
        rng: R,
    ) -> Self {
        Self {
            head: vec![None; config.max_level],
            nodes: NodeArena::new(),
            level: 1,
            length: 0,
            config,
            rng,
        }
    }

    /// Генерирует уровень нового узла: повышаем, пока выборка меньше
    /// `probability`, но не выше `max_level`.
    #[inline]
    fn random_level(&mut self) -> usize {
        let mut lvl = 1;

        while lvl < self.config.max_level && self.rng.gen::<f64>() < self.config.probability {
            lvl += 1;
        }

        lvl
    }

    #[inline(always)]
    fn next(
        &self,
        at: Cursor,
        level: usize,
    ) -> Link {
        match at {
            Cursor::Head => self.head[level],
            Cursor::Node(id) => self.nodes[id].forward[level],
        }
    }

    #[inline(always)]
    fn set_next(
        &mut self,
        at: Cursor,
        level: usize,
        link: Link,
    ) {
        match at {
            Cursor::Head => self.head[level] = link,
            Cursor::Node(id) => self.nodes[id].forward[level] = link,
        }
    }

    #[inline(always)]
    fn key_at<Q>(
        &self,
        id: NodeId,
    ) -> &Q
    where
        K: Borrow<Q>,
        Q: ?Sized,
    {
        self.nodes[id].key.borrow()
    }

    /// Спуск от вершины к уровню 0: для каждого уровня возвращает последний
    /// узел с ключом строго меньше `key`.
    ///
    /// Уровни выше текущего остаются указывающими на голову.
    fn find_update<Q>(
        &self,
        key: &Q,
    ) -> Vec<Cursor>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut update = vec![Cursor::Head; self.config.max_level];
        let mut current = Cursor::Head;

        for i in (0..self.level).rev() {
            while let Some(next) = self.next(current, i) {
                if self.key_at::<Q>(next) < key {
                    current = Cursor::Node(next);
                } else {
                    break;
                }
            }
            update[i] = current;
        }

        update
    }

    /// Поиск узла с заданным ключом без сбора update-ссылок.
    fn find<Q>(
        &self,
        key: &Q,
    ) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = Cursor::Head;

        for i in (0..self.level).rev() {
            while let Some(next) = self.next(current, i) {
                if self.key_at::<Q>(next) < key {
                    current = Cursor::Node(next);
                } else {
                    break;
                }
            }
        }

        let candidate = self.next(current, 0)?;
        (self.key_at::<Q>(candidate) == key).then_some(candidate)
    }

    /// Вставляет ключ и значение.
    ///
    /// Если ключ уже есть, значение перезаписывается на месте и структура не
    /// меняется. Все сравнения выполняются до первой модификации ссылок.
    pub fn insert(
        &mut self,
        key: K,
        value: V,
    ) {
        let update = self.find_update(&key);

        if let Some(id) = self.next(update[0], 0) {
            if self.nodes[id].key == key {
                self.nodes[id].value = value;
                return;
            }
        }

        let lvl = self.random_level();

        if lvl > self.level {
            trace!(from = self.level, to = lvl, "skiplist level raised");
            self.level = lvl;
        }

        let forward = (0..lvl).map(|i| self.next(update[i], i)).collect();
        let id = self.nodes.alloc(Node::new(key, value, forward));

        for (i, &prev) in update.iter().enumerate().take(lvl) {
            self.set_next(prev, i, Some(id));
        }

        self.length += 1;
    }

    /// Ищет ключ и возвращает ссылку на значение.
    pub fn get<Q>(
        &self,
        key: &Q,
    ) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).map(|id| self.nodes[id].value())
    }

    /// Ищет ключ и возвращает изменяемую ссылку на значение.
    pub fn get_mut<Q>(
        &mut self,
        key: &Q,
    ) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let id = self.find(key)?;
        Some(&mut self.nodes[id].value)
    }

    /// Проверяет, содержится ли ключ в списке.
    pub fn contains<Q>(
        &self,
        key: &Q,
    ) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).is_some()
    }

    /// Удаляет ключ. Возвращает `false`, если ключа не было.
    pub fn remove<Q>(
        &mut self,
        key: &Q,
    ) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.take(key).is_some()
    }

    /// Удаляет ключ и возвращает его значение.
    pub fn take<Q>(
        &mut self,
        key: &Q,
    ) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let update = self.find_update(key);

        let id = self.next(update[0], 0)?;
        if self.key_at::<Q>(id) != key {
            return None;
        }

        // перепривязываем ссылки на всех уровнях узла
        for (i, &prev) in update.iter().enumerate().take(self.nodes[id].height()) {
            if self.next(prev, i) == Some(id) {
                let succ = self.nodes[id].forward[i];
                self.set_next(prev, i, succ);
            }
        }

        let node = self.nodes.release(id)?;
        self.length -= 1;

        // понижаем уровень списка, пока верхний уровень пуст
        while self.level > 1 && self.head[self.level - 1].is_none() {
            self.level -= 1;
            trace!(to = self.level, "skiplist level lowered");
        }

        Some(node.value)
    }

    /// Возвращает текущее число элементов в списке.
    pub fn len(&self) -> usize {
        self.length
    }

    /// Проверяет на пустоту.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Удаляет все элементы из списка.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.head.iter_mut().for_each(|slot| *slot = None);
        self.level = 1;
        self.length = 0;
    }

    /// Возвращает первый элемент (минимальный ключ).
    pub fn first(&self) -> Option<(&K, &V)> {
        self.head[0].map(|id| {
            let node = &self.nodes[id];
            (node.key(), node.value())
        })
    }

    /// Возвращает последний элемент (максимальный ключ).
    pub fn last(&self) -> Option<(&K, &V)> {
        let mut current = Cursor::Head;

        for i in (0..self.level).rev() {
            while let Some(next) = self.next(current, i) {
                current = Cursor::Node(next);
            }
        }

        match current {
            Cursor::Head => None,
            Cursor::Node(id) => {
                let node = &self.nodes[id];
                Some((node.key(), node.value()))
            }
        }
    }

    /// Текущий уровень списка.
    pub fn current_level(&self) -> usize {
        self.level
    }

    pub fn max_level(&self) -> usize {
        self.config.max_level
    }

    pub fn probability(&self) -> f64 {
        self.config.probability
    }

    pub fn config(&self) -> &SkipListConfig {
        &self.config
    }

    /// Пары ключ/значение уровня 0 в порядке возрастания.
    fn entries(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        let mut current = self.head[0];

        std::iter::from_fn(move || {
            let node = &self.nodes[current?];
            current = node.forward[0];
            Some((node.key(), node.value()))
        })
    }

    /// Собирает статистику распределения узлов по уровням.
    pub fn statistics(&self) -> SkipListStatistics {
        let mut stats = SkipListStatistics::empty(self.config.max_level);

        let mut current = self.head[0];
        while let Some(id) = current {
            let node = &self.nodes[id];
            stats.level_distribution[node.height() - 1] += 1;
            stats.node_count += 1;
            current = node.forward[0];
        }

        stats.current_max_level = self.level;
        stats.arena_slots = self.nodes.capacity();
        stats.compute_average_level();
        stats
    }
}

impl<K: Ord + Clone, V, R: Rng> SkipList<K, V, R> {
    /// Ключи цепочки уровня 0 в порядке возрастания.
    pub fn keys(&self) -> Vec<K> {
        self.entries().map(|(k, _)| k.clone()).collect()
    }
}

impl<K: Ord + Debug, V, R: Rng> SkipList<K, V, R> {
    /// Проверяет структурные инварианты списка.
    ///
    /// - `1 <= level <= max_level`, уровни выше текущего пусты;
    /// - на каждом уровне ключи строго возрастают;
    /// - башня каждого узла непрерывна: узел присутствует ровно на уровнях
    ///   `0..height`;
    /// - цепочка уровня 0 содержит ровно `len()` узлов, и это все живые узлы
    ///   арены.
    pub fn validate_invariants(&self) -> Result<(), ValidationError> {
        let max_level = self.config.max_level;

        validate!(
            self.head.len() == max_level,
            ValidationError::ForwardVectorMismatch {
                expected: max_level,
                actual: self.head.len(),
            }
        );

        validate!(
            (1..=max_level).contains(&self.level),
            ValidationError::InvalidLevel {
                node_level: self.level,
                max_level,
            }
        );

        for i in self.level..max_level {
            validate!(
                self.head[i].is_none(),
                ValidationError::LevelAboveCurrent {
                    level: i,
                    current_level: self.level,
                }
            );
        }

        let mut tall_enough = vec![0usize; max_level];

        for i in 0..self.level {
            let mut count = 0;
            let mut prev_key: Option<&K> = None;
            let mut current = self.head[i];

            while let Some(id) = current {
                let node = self.nodes.get(id).ok_or_else(|| ValidationError::DanglingLink {
                    message: format!("level {i} points to a released node"),
                })?;

                validate!(
                    node.height() <= max_level,
                    ValidationError::InvalidLevel {
                        node_level: node.height(),
                        max_level,
                    }
                );

                validate!(
                    node.height() > i,
                    ValidationError::ForwardVectorMismatch {
                        expected: i + 1,
                        actual: node.height(),
                    }
                );

                if let Some(prev) = prev_key {
                    validate!(
                        prev < node.key(),
                        ValidationError::SortOrderViolation {
                            message: format!("level {i}: {:?} >= {:?}", prev, node.key()),
                        }
                    );
                }

                count += 1;

                validate!(
                    count <= self.nodes.len(),
                    ValidationError::CyclicReference {
                        message: format!("level {i} is longer than the node count"),
                    }
                );

                if i == 0 {
                    for slot in tall_enough.iter_mut().take(node.height()) {
                        *slot += 1;
                    }
                }

                prev_key = Some(node.key());
                current = node.forward[i];
            }

            if i == 0 {
                validate!(
                    count == self.length,
                    ValidationError::LengthMismatch {
                        expected: self.length,
                        actual: count,
                    }
                );
            } else {
                validate!(
                    count == tall_enough[i],
                    ValidationError::TowerMismatch {
                        level: i,
                        expected: tall_enough[i],
                        actual: count,
                    }
                );
            }
        }

        validate!(
            self.nodes.len() == self.length,
            ValidationError::LengthMismatch {
                expected: self.length,
                actual: self.nodes.len(),
            }
        );

        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////
// Общие реализации трейтов для SkipList
////////////////////////////////////////////////////////////////////////////////

impl<K: Ord, V> Default for SkipList<K, V> {
    fn default() -> Self {
        Self::from_parts(SkipListConfig::default(), StdRng::from_entropy())
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for SkipList<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut list = SkipList::default();
        list.extend(iter);
        list
    }
}

impl<K: Ord, V, R: Rng> Extend<(K, V)> for SkipList<K, V, R> {
    fn extend<I: IntoIterator<Item = (K, V)>>(
        &mut self,
        iter: I,
    ) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, V, R> Debug for SkipList<K, V, R>
where
    K: Ord + Debug,
    V: Debug,
    R: Rng,
{
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_map().entries(self.entries()).finish()
    }
}

impl<K, V, R1, R2> PartialEq<SkipList<K, V, R2>> for SkipList<K, V, R1>
where
    K: Ord,
    V: PartialEq,
    R1: Rng,
    R2: Rng,
{
    fn eq(
        &self,
        other: &SkipList<K, V, R2>,
    ) -> bool {
        self.len() == other.len() && self.entries().eq(other.entries())
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
