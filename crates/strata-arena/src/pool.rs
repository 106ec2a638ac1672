//! LIFO pool of released slot indices.

use crate::error::ArenaError;

/// Stack of previously released global indices awaiting reuse.
///
/// The most recently released index is handed out first, so churn-heavy
/// workloads keep touching the same few slots. The pool is pure
/// bookkeeping: it never inspects the memory behind an index.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IndexPool {
    indices: Vec<usize>,
}

impl IndexPool {
    /// Create an empty pool.
    pub const fn new() -> Self {
        Self {
            indices: Vec::new(),
        }
    }

    /// Store a released index.
    pub fn push(&mut self, index: usize) {
        self.indices.push(index);
    }

    /// Remove and return the most recently pushed index.
    ///
    /// Popping an empty pool is a caller bug and is reported as
    /// [`ArenaError::EmptyPool`].
    pub fn pop(&mut self) -> Result<usize, ArenaError> {
        self.indices.pop().ok_or(ArenaError::EmptyPool)
    }

    /// Whether the pool holds no indices.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Number of indices in the pool.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Reserve room for at least `additional` more indices. Has no effect
    /// on ordering.
    pub fn reserve(&mut self, additional: usize) {
        self.indices.reserve(additional);
    }

    /// Number of indices the pool can hold without reallocating.
    pub fn capacity(&self) -> usize {
        self.indices.capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_pool_is_empty() {
        let pool = IndexPool::new();
        assert!(pool.is_empty());
        assert_eq!(pool.len(), 0);
    }

    #[test]
    fn pop_returns_last_pushed() {
        let mut pool = IndexPool::new();
        pool.push(10);
        pool.push(20);
        pool.push(30);
        assert_eq!(pool.len(), 3);
        assert_eq!(pool.pop(), Ok(30));
        assert_eq!(pool.pop(), Ok(20));
        assert_eq!(pool.pop(), Ok(10));
        assert!(pool.is_empty());
    }

    #[test]
    fn pop_on_empty_pool_is_an_error() {
        let mut pool = IndexPool::new();
        assert_eq!(pool.pop(), Err(ArenaError::EmptyPool));
        pool.push(1);
        pool.pop().unwrap();
        assert_eq!(pool.pop(), Err(ArenaError::EmptyPool));
    }

    #[test]
    fn reserve_grows_capacity_only() {
        let mut pool = IndexPool::new();
        pool.push(7);
        pool.reserve(100);
        assert!(pool.capacity() >= 101);
        assert_eq!(pool.pop(), Ok(7));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn drain_order_is_reverse_push_order(
                indices in proptest::collection::vec(0usize..1_000, 0..64),
            ) {
                let mut pool = IndexPool::new();
                for &i in &indices {
                    pool.push(i);
                }
                let mut drained = Vec::new();
                while let Ok(i) = pool.pop() {
                    drained.push(i);
                }
                let mut expected = indices.clone();
                expected.reverse();
                prop_assert_eq!(drained, expected);
            }
        }
    }
}
