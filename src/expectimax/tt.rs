use std::collections::HashMap;

use ahash::RandomState as AHasher;

use crate::board::Board;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Decision,
    Chance,
}

/// A memoizable subproblem: the value of `board` searched `depth` plies deep
/// from a node of kind `kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SearchKey {
    pub board: Board,
    pub depth: u32,
    pub kind: NodeKind,
}

/// Bounded memo table for one move decision.
///
/// Eviction is all-or-nothing: an insert that would push the table past its
/// capacity first empties it.
///
/// ```
/// use core_2048::board::Board;
/// use core_2048::expectimax::{NodeKind, SearchKey, TranspositionCache};
/// let mut tt = TranspositionCache::new(1);
/// let a = SearchKey { board: Board::from_raw(1), depth: 2, kind: NodeKind::Chance };
/// let b = SearchKey { board: Board::from_raw(2), depth: 2, kind: NodeKind::Chance };
/// tt.insert(a, 1.0);
/// tt.insert(b, 2.0);
/// assert_eq!(tt.get(&a), None);
/// assert_eq!(tt.get(&b), Some(2.0));
/// ```
#[derive(Debug, Clone)]
pub struct TranspositionCache {
    map: HashMap<SearchKey, f64, AHasher>,
    capacity: usize,
}

impl TranspositionCache {
    pub fn new(capacity: usize) -> Self {
        Self { map: HashMap::with_capacity_and_hasher(capacity, AHasher::new()), capacity }
    }

    #[inline]
    pub fn get(&self, key: &SearchKey) -> Option<f64> { self.map.get(key).copied() }

    /// Store `value`; a no-op when the capacity is 0.
    #[inline]
    pub fn insert(&mut self, key: SearchKey, value: f64) {
        if self.capacity == 0 {
            return;
        }
        if self.map.len() >= self.capacity {
            self.map.clear();
        }
        self.map.insert(key, value);
    }

    /// Drop every entry, keeping the allocation.
    #[inline]
    pub fn clear(&mut self) { self.map.clear(); }

    #[inline]
    pub fn len(&self) -> usize { self.map.len() }

    #[inline]
    pub fn is_empty(&self) -> bool { self.map.is_empty() }

    #[inline]
    pub fn capacity(&self) -> usize { self.capacity }
}
