//! Test utilities for strata development.
//!
//! Provides drop accounting ([`DropCounter`], [`Tracked`]), a recording
//! deletion hook ([`Recorder`]), and element-type fixtures in [`fixtures`]
//! for exercising layout edge cases.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::cell::RefCell;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Counts how many [`Tracked`] values it issued have been dropped.
///
/// Clones share the same count.
#[derive(Clone, Debug, Default)]
pub struct DropCounter {
    dropped: Arc<AtomicUsize>,
}

impl DropCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap `value` so dropping it bumps this counter.
    pub fn track<T>(&self, value: T) -> Tracked<T> {
        Tracked {
            value,
            dropped: Arc::clone(&self.dropped),
        }
    }

    /// Number of tracked values dropped so far.
    pub fn dropped(&self) -> usize {
        self.dropped.load(Ordering::SeqCst)
    }
}

/// A value that reports its drop to a [`DropCounter`].
///
/// Cloning produces a second tracked value; both count when dropped.
pub struct Tracked<T> {
    value: T,
    dropped: Arc<AtomicUsize>,
}

impl<T> Tracked<T> {
    pub fn get(&self) -> &T {
        &self.value
    }
}

impl<T> Deref for Tracked<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T> DerefMut for Tracked<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.value
    }
}

impl<T: Clone> Clone for Tracked<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            dropped: Arc::clone(&self.dropped),
        }
    }
}

impl<T: PartialEq> PartialEq for Tracked<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T: fmt::Debug> fmt::Debug for Tracked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Tracked").field(&self.value).finish()
    }
}

impl<T> Drop for Tracked<T> {
    fn drop(&mut self) {
        self.dropped.fetch_add(1, Ordering::SeqCst);
    }
}

/// Collects every value handed to its sinks, in call order.
///
/// Use [`sink`](Recorder::sink) as a slot map deletion hook, then inspect
/// what was deleted with [`take`](Recorder::take).
pub struct Recorder<T> {
    log: Rc<RefCell<Vec<T>>>,
}

impl<T> Recorder<T> {
    pub fn new() -> Self {
        Self {
            log: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// A closure that appends its argument to this recorder's log.
    pub fn sink(&self) -> impl FnMut(T) + Clone {
        let log = Rc::clone(&self.log);
        move |value| log.borrow_mut().push(value)
    }

    /// Drain and return everything recorded so far.
    pub fn take(&self) -> Vec<T> {
        std::mem::take(&mut *self.log.borrow_mut())
    }

    /// Number of values recorded and not yet taken.
    pub fn len(&self) -> usize {
        self.log.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Default for Recorder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Recorder<T> {
    fn clone(&self) -> Self {
        Self {
            log: Rc::clone(&self.log),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_sees_drops_of_clones() {
        let counter = DropCounter::new();
        let a = counter.track(String::from("a"));
        let b = a.clone();
        assert_eq!(*b, "a");
        drop(a);
        assert_eq!(counter.dropped(), 1);
        drop(b);
        assert_eq!(counter.clone().dropped(), 2);
    }

    #[test]
    fn recorder_sinks_share_one_log() {
        let recorder = Recorder::new();
        let mut first = recorder.sink();
        let mut second = first.clone();
        first(1);
        second(2);
        assert_eq!(recorder.len(), 2);
        assert_eq!(recorder.take(), vec![1, 2]);
        assert!(recorder.is_empty());
    }
}
