//! Арена узлов пропускного списка.
//!
//! Узлы хранятся в одном `Vec` и адресуются стабильными индексами
//! [`NodeId`]. Башни узлов ссылаются друг на друга через индексы, поэтому
//! несколько уровней могут указывать на один и тот же узел без разделяемого
//! владения. Освобождённые слоты попадают в free list и переиспользуются
//! следующими вставками.

use std::ops::{Index, IndexMut};

/// Стабильный индекс узла в арене.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Ссылка вперёд на одном уровне: `None` означает конец цепочки.
pub type Link = Option<NodeId>;

/// Узел пропускного списка.
#[derive(Debug, Clone)]
pub struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    /// Башня: по одной ссылке на каждый уровень, в котором участвует узел.
    pub(crate) forward: Vec<Link>,
}

#[derive(Debug, Clone)]
pub(crate) struct NodeArena<K, V> {
    slots: Vec<Option<Node<K, V>>>,
    free: Vec<NodeId>,
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl<K, V> Node<K, V> {
    pub(crate) fn new(
        key: K,
        value: V,
        forward: Vec<Link>,
    ) -> Self {
        Self {
            key,
            value,
            forward,
        }
    }

    /// Возвращает ссылку на ключ.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Возвращает ссылку на значение.
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Высота башни узла.
    pub fn height(&self) -> usize {
        self.forward.len()
    }
}

impl<K, V> NodeArena<K, V> {
    pub(crate) fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Размещает узел, переиспользуя свободный слот, если он есть.
    pub(crate) fn alloc(
        &mut self,
        node: Node<K, V>,
    ) -> NodeId {
        match self.free.pop() {
            Some(id) => {
                debug_assert!(self.slots[id.0].is_none());
                self.slots[id.0] = Some(node);
                id
            }
            None => {
                let id = NodeId(self.slots.len());
                self.slots.push(Some(node));
                id
            }
        }
    }

    /// Забирает узел из арены и возвращает его слот в free list.
    pub(crate) fn release(
        &mut self,
        id: NodeId,
    ) -> Option<Node<K, V>> {
        let node = self.slots.get_mut(id.0)?.take()?;
        self.free.push(id);
        Some(node)
    }

    pub(crate) fn get(
        &self,
        id: NodeId,
    ) -> Option<&Node<K, V>> {
        self.slots.get(id.0)?.as_ref()
    }

    /// Количество живых узлов.
    pub(crate) fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Общее количество слотов, включая свободные.
    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }
}

impl<K, V> Index<NodeId> for NodeArena<K, V> {
    type Output = Node<K, V>;

    fn index(
        &self,
        id: NodeId,
    ) -> &Self::Output {
        match self.slots.get(id.0) {
            Some(Some(node)) => node,
            _ => panic!("dangling node id {}", id.0),
        }
    }
}

impl<K, V> IndexMut<NodeId> for NodeArena<K, V> {
    fn index_mut(
        &mut self,
        id: NodeId,
    ) -> &mut Self::Output {
        match self.slots.get_mut(id.0) {
            Some(Some(node)) => node,
            _ => panic!("dangling node id {}", id.0),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
