//! # Common utility types
use std::{
    cmp::{Ordering, Reverse},
    collections::BinaryHeap,
    fmt::Display,
    ops::{Deref, DerefMut},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which half of a bidirectional search a piece of work belongs to
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
pub enum Side {
    Forward,
    Backward,
}

impl Side {
    pub const fn index(self) -> usize {
        match self {
            Self::Forward => 0,
            Self::Backward => 1,
        }
    }

    pub const fn other(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
        }
    }
}

/// Search engine error type
///
/// Running out of solutions is *not* an error: every strategy signals
/// exhaustion by ending its iterator.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("{side} search worker panicked: {reason}")]
    WorkerPanicked { side: Side, reason: String },

    #[error("invalid search mode: {0}")]
    InvalidMode(String),

    #[error("{0}")]
    RuntimeError(String),
}

impl From<String> for SearchError {
    fn from(s: String) -> Self {
        Self::RuntimeError(s)
    }
}

pub type SearchResult<T> = Result<T, SearchError>;

/// f64 compare wrapper, NaN sorts last
pub fn fcmp(a: f64, b: f64) -> Ordering {
    match (a, b) {
        (x, y) if x.is_nan() && y.is_nan() => Ordering::Equal,
        (x, _) if x.is_nan() => Ordering::Greater,
        (_, y) if y.is_nan() => Ordering::Less,
        (..) => a.partial_cmp(&b).unwrap_or_else(|| unreachable!()),
    }
}

/// f64 wrapper type implementing `Eq` and `Ord`
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct F64(pub f64);

impl Display for F64 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl PartialEq for F64 {
    fn eq(&self, other: &Self) -> bool {
        fcmp(self.0, other.0) == Ordering::Equal
    }
}

impl Eq for F64 {}

impl PartialOrd for F64 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for F64 {
    fn cmp(&self, other: &Self) -> Ordering {
        fcmp(self.0, other.0)
    }
}

impl Deref for F64 {
    type Target = f64;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for F64 {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

/// Min-heap priority queue using f64 as priority.
///
/// Items with equal priority come out in insertion order.
#[derive(Debug, Clone)]
pub struct MinFHeap<T: Ord> {
    heap: BinaryHeap<(Reverse<F64>, Reverse<u64>, T)>,
    seq: u64,
}

impl<T: Ord> MinFHeap<T> {
    /// Create new, empty priority queue
    pub const fn new() -> Self {
        Self { heap: BinaryHeap::new(), seq: 0 }
    }

    /// push value `item` with priority `w` into queue
    pub fn push(&mut self, w: f64, item: T) {
        self.heap.push((Reverse(F64(w)), Reverse(self.seq), item));
        self.seq += 1;
    }

    /// Remove and return smallest item and priority
    pub fn pop(&mut self) -> Option<(f64, T)> {
        self.heap.pop().map(|(Reverse(F64(w)), _, item)| (w, item))
    }

    /// Item `pop` would return next, with its priority
    pub fn peek(&self) -> Option<(f64, &T)> {
        self.heap.peek().map(|(Reverse(F64(w)), _, item)| (*w, item))
    }

    /// Priority of the item `pop` would return next
    pub fn peek_priority(&self) -> Option<f64> {
        self.peek().map(|(w, _)| w)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn clear(&mut self) {
        self.heap.clear();
    }
}

impl<T: Ord> Default for MinFHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord> Extend<(f64, T)> for MinFHeap<T> {
    fn extend<I: IntoIterator<Item = (f64, T)>>(&mut self, iter: I) {
        for (w, item) in iter {
            self.push(w, item);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn heap_pops_lowest_priority_first() {
        let mut heap = MinFHeap::new();
        heap.extend([(3.0, 'c'), (1.0, 'a'), (2.0, 'b')]);
        assert_eq!(heap.peek_priority(), Some(1.0));
        assert_eq!(heap.pop(), Some((1.0, 'a')));
        assert_eq!(heap.pop(), Some((2.0, 'b')));
        assert_eq!(heap.pop(), Some((3.0, 'c')));
        assert_eq!(heap.pop(), None);
    }

    #[test]
    fn heap_breaks_ties_by_insertion_order() {
        let mut heap = MinFHeap::new();
        // items would pop in reverse if ties were decided by `T: Ord`
        for item in [5u32, 4, 3, 2, 1] {
            heap.push(0.0, item);
        }
        let order: Vec<u32> =
            std::iter::from_fn(|| heap.pop().map(|(_, v)| v)).collect();
        assert_eq!(order, vec![5, 4, 3, 2, 1]);
    }

    #[test]
    fn nan_sorts_last() {
        let mut values = [F64(f64::NAN), F64(1.0), F64(f64::NEG_INFINITY)];
        values.sort();
        assert_eq!(*values[0], f64::NEG_INFINITY);
        assert_eq!(*values[1], 1.0);
        assert!(values[2].is_nan());
    }

    #[test]
    fn side_other_flips() {
        assert_eq!(Side::Forward.other(), Side::Backward);
        assert_eq!(Side::Backward.other().index(), 0);
        assert_eq!(Side::Backward.to_string(), "backward");
    }
}
