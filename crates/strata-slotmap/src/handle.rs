//! Slot map handles.
//!
//! A [`Handle`] is an `(index, version)` pair that names one occupant of
//! one slot. It is a plain value: holding it keeps nothing alive, and it
//! silently stops resolving once the occupant is removed.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Weak, ABA-safe reference to a value in a [`SlotMap`](crate::SlotMap).
///
/// The type parameter only ties the handle to the map's element type; the
/// handle is `Copy`, `Eq`, `Hash`, and `Ord` for every `T`.
#[must_use]
pub struct Handle<T> {
    pub(crate) index: u32,
    pub(crate) version: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    pub(crate) fn new(index: u32, version: u32) -> Self {
        Self {
            index,
            version,
            _marker: PhantomData,
        }
    }

    /// Rebuild a handle from the parts returned by [`index`](Self::index)
    /// and [`version`](Self::version).
    ///
    /// A forged handle is harmless: the map validates it like any other.
    pub fn from_raw_parts(index: u32, version: u32) -> Self {
        Self::new(index, version)
    }

    /// The slot's global index.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// The version the occupant was issued with.
    pub fn version(&self) -> u32 {
        self.version
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.version == other.version
    }
}

impl<T> Eq for Handle<T> {}

impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
        self.version.hash(state);
    }
}

impl<T> PartialOrd for Handle<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Handle<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.index, self.version).cmp(&(other.index, other.version))
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("index", &self.index)
            .field("version", &self.version)
            .finish()
    }
}

impl<T> fmt::Display for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle(idx={}, v={})", self.index, self.version)
    }
}
