//! Versioned slot map over a pair of paged arenas.
//!
//! [`SlotMap`] stores values in one [`PagedArena`] and a parallel arena of
//! [`Version`]s, and hands out [`Handle`]s that pair an index with the
//! version its occupant was issued with.
//!
//! # Slot states
//!
//! ```text
//!            add                     remove / take / clear
//! Unused ─────────► Live(1) ─────────────────────────► Dead(1)
//!                      ▲                                  │
//!                      └──────────── add (reuse) ─────────┘
//!                                 Dead(v) → Live(v + 1)
//! ```
//!
//! A handle resolves only while the stored version is live and equals the
//! handle's version exactly. Removal sets the dead bit without touching the counter,
//! and reuse bumps the counter, so a handle is rejected both while its slot
//! is dead and after the slot is reused.
//!
//! # Memory safety
//!
//! The value arena only holds raw slots. The version arena is the single
//! source of truth for which slots hold an initialised `T`: a slot is read
//! if and only if its stored version is live. Every `unsafe` block in this
//! module relies on that invariant.

#![allow(unsafe_code)]

use std::fmt;
use std::ops::{Index, IndexMut};

use strata_arena::{ArenaConfig, ArenaError, PagedArena};
use tracing::{debug, warn};

use crate::deleter::{Deleter, DropDeleter};
use crate::error::SlotMapError;
use crate::handle::Handle;
use crate::iter::{Handles, Iter, IterMut, LiveSlots, Values, ValuesMut};
use crate::version::Version;

/// Growable pool of `T` values addressed by versioned handles.
///
/// Values never move once added. Removed slots are recycled LIFO, and the
/// recycled slot's version is bumped so stale handles keep failing.
///
/// The map is not synchronised; callers sharing it across threads must
/// serialise access themselves.
pub struct SlotMap<T, D: Deleter<T> = DropDeleter> {
    values: PagedArena<T>,
    versions: PagedArena<Version>,
    len: usize,
    retired: usize,
    deleter: D,
}

impl<T> SlotMap<T> {
    /// Create an empty map with the default page capacity that drops
    /// removed values.
    pub fn new() -> Self {
        Self::with_deleter(DropDeleter)
    }

    /// Create an empty map with the given arena configuration.
    pub fn with_config(config: ArenaConfig) -> Result<Self, SlotMapError> {
        Self::with_config_and_deleter(config, DropDeleter)
    }
}

impl<T, D: Deleter<T>> SlotMap<T, D> {
    /// Create an empty map with the default page capacity and a custom
    /// deletion hook.
    pub fn with_deleter(deleter: D) -> Self {
        Self {
            values: PagedArena::new(),
            versions: PagedArena::new(),
            len: 0,
            retired: 0,
            deleter,
        }
    }

    /// Create an empty map with both an arena configuration and a custom
    /// deletion hook.
    pub fn with_config_and_deleter(config: ArenaConfig, deleter: D) -> Result<Self, SlotMapError> {
        Ok(Self {
            values: PagedArena::with_config(config.clone())?,
            versions: PagedArena::with_config(config)?,
            len: 0,
            retired: 0,
            deleter,
        })
    }

    /// Store `value` and return a handle to it.
    ///
    /// Reuses the most recently freed slot if there is one, otherwise takes
    /// the next fresh index, growing by one page when needed. On failure the
    /// value is dropped and the map is unchanged.
    pub fn add(&mut self, value: T) -> Result<Handle<T>, SlotMapError> {
        let index = self.values.allocate()?.index();
        let Ok(handle_index) = u32::try_from(index) else {
            self.values.deallocate(index);
            return Err(SlotMapError::IndexSpaceExhausted { index });
        };
        if let Err(err) = self.sync_versions() {
            self.values.deallocate(index);
            return Err(err.into());
        }

        // `vacate` retires exhausted slots instead of pooling them.
        let version = self
            .version(index)
            .next_live()
            .expect("exhausted slots are retired, never recycled");
        self.versions[index].write(version);
        self.values[index].write(value);
        self.len += 1;
        Ok(Handle::new(handle_index, version.raw()))
    }

    /// Remove the value behind `handle` and pass it to the deletion hook.
    ///
    /// Fails with [`SlotMapError::InvalidHandle`] if the handle is out of
    /// range, stale, or already removed.
    pub fn remove(&mut self, handle: Handle<T>) -> Result<(), SlotMapError> {
        let value = self.take(handle)?;
        self.deleter.delete(value);
        Ok(())
    }

    /// Remove the value behind `handle` and return it without running the
    /// deletion hook.
    pub fn take(&mut self, handle: Handle<T>) -> Result<T, SlotMapError> {
        let index = self.resolve(handle).ok_or_else(|| invalid(handle))?;
        Ok(self.vacate(index))
    }

    /// Remove every value, running the deletion hook on each.
    ///
    /// Versions are preserved, so every outstanding handle stays invalid.
    /// Freed slots are recycled in ascending index order.
    pub fn clear(&mut self) {
        let mut released = 0usize;
        for index in (0..self.versions.size()).rev() {
            if self.version(index).is_dead() {
                continue;
            }
            let value = self.vacate(index);
            self.deleter.delete(value);
            released += 1;
        }
        if released > 0 {
            debug!(released, "slot map cleared");
        }
    }

    /// Shared reference to the value behind `handle`.
    pub fn at(&self, handle: Handle<T>) -> Result<&T, SlotMapError> {
        self.find(handle).ok_or_else(|| invalid(handle))
    }

    /// Exclusive reference to the value behind `handle`.
    pub fn at_mut(&mut self, handle: Handle<T>) -> Result<&mut T, SlotMapError> {
        self.find_mut(handle).ok_or_else(|| invalid(handle))
    }

    /// Shared reference to the value behind `handle`, or `None` if the
    /// handle no longer resolves.
    pub fn find(&self, handle: Handle<T>) -> Option<&T> {
        let index = self.resolve(handle)?;
        // SAFETY: `resolve` matched a live version, so the slot holds an
        // initialised value.
        Some(unsafe { self.values[index].assume_init_ref() })
    }

    /// Exclusive reference to the value behind `handle`, or `None` if the
    /// handle no longer resolves.
    pub fn find_mut(&mut self, handle: Handle<T>) -> Option<&mut T> {
        let index = self.resolve(handle)?;
        // SAFETY: as in `find`.
        Some(unsafe { self.values[index].assume_init_mut() })
    }

    /// Whether `handle` names a value currently in the map.
    pub fn contains(&self, handle: Handle<T>) -> bool {
        self.resolve(handle).is_some()
    }

    /// Shared reference to the value behind `handle`, without validation.
    ///
    /// # Safety
    ///
    /// `handle` must be valid for this map, i.e. [`contains`](Self::contains)
    /// would return `true`.
    pub unsafe fn get_unchecked(&self, handle: Handle<T>) -> &T {
        // SAFETY: the caller guarantees the slot is live.
        unsafe { self.values[handle.index as usize].assume_init_ref() }
    }

    /// Exclusive reference to the value behind `handle`, without
    /// validation.
    ///
    /// # Safety
    ///
    /// Same contract as [`get_unchecked`](Self::get_unchecked).
    pub unsafe fn get_unchecked_mut(&mut self, handle: Handle<T>) -> &mut T {
        // SAFETY: the caller guarantees the slot is live.
        unsafe { self.values[handle.index as usize].assume_init_mut() }
    }

    /// Number of live values.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the map holds no live values.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// High-water mark of the value arena: every index ever issued,
    /// live or not.
    pub fn capacity(&self) -> usize {
        self.values.size()
    }

    /// Number of slots whose version counter ran out and which will never
    /// be reused.
    pub fn retired_count(&self) -> usize {
        self.retired
    }

    /// Number of freed slots waiting to be reused.
    pub fn free_count(&self) -> usize {
        self.values.free_count()
    }

    /// Stored version of the slot at `index`, or `None` if the slot has
    /// never been issued.
    pub fn version_of(&self, index: u32) -> Option<Version> {
        let index = index as usize;
        (index < self.versions.size()).then(|| self.version(index))
    }

    /// Live `(handle, value)` pairs in ascending index order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self.live_slots(), &self.values)
    }

    /// Live `(handle, value)` pairs with mutable values, in ascending index
    /// order.
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        let slots = LiveSlots::new(&self.versions, self.len);
        IterMut::new(slots, &self.values)
    }

    /// Live values in ascending index order.
    pub fn values(&self) -> Values<'_, T> {
        Values::new(self.iter())
    }

    /// Live values, mutably, in ascending index order.
    pub fn values_mut(&mut self) -> ValuesMut<'_, T> {
        ValuesMut::new(self.iter_mut())
    }

    /// Handles of all live values in ascending index order.
    pub fn handles(&self) -> Handles<'_, T> {
        Handles::new(self.live_slots())
    }

    fn live_slots(&self) -> LiveSlots<'_> {
        LiveSlots::new(&self.versions, self.len)
    }

    /// Grow the version arena to cover every index the value arena issued.
    /// New entries start out `UNUSED`, which reads as dead.
    fn sync_versions(&mut self) -> Result<(), ArenaError> {
        while self.versions.size() < self.values.size() {
            self.versions.allocate_with(Version::UNUSED)?;
        }
        Ok(())
    }

    /// Stored version at `index`. Callers keep `index < versions.size()`.
    fn version(&self, index: usize) -> Version {
        // SAFETY: `sync_versions` initialises every version slot below
        // `versions.size()` before any other code can observe it.
        unsafe { self.versions[index].assume_init() }
    }

    fn resolve(&self, handle: Handle<T>) -> Option<usize> {
        let index = handle.index as usize;
        (index < self.versions.size() && self.version(index).matches(handle.version))
            .then_some(index)
    }

    /// Move the value out of the live slot at `index`, mark the slot dead,
    /// and recycle or retire it.
    fn vacate(&mut self, index: usize) -> T {
        let version = self.version(index);
        debug_assert!(version.is_live(), "vacating dead slot {index}");
        // SAFETY: the slot is live, so the value is initialised. The dead
        // bit is set immediately below, so it is never read again.
        let value = unsafe { self.values[index].assume_init_read() };
        self.versions[index].write(version.killed());
        if version.is_exhausted() {
            self.retired += 1;
            warn!(
                index,
                version = version.get(),
                "slot version exhausted; retiring slot"
            );
        } else {
            self.values.deallocate(index);
        }
        self.len -= 1;
        value
    }
}

fn invalid<T>(handle: Handle<T>) -> SlotMapError {
    SlotMapError::InvalidHandle {
        index: handle.index,
        version: handle.version,
    }
}

impl<T> Default for SlotMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, D: Deleter<T>> Drop for SlotMap<T, D> {
    /// Live values go through the deletion hook; the arenas then free their
    /// pages.
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T: Clone, D: Deleter<T> + Clone> SlotMap<T, D> {
    /// Fallible form of [`Clone::clone`].
    pub fn try_clone(&self) -> Result<Self, SlotMapError> {
        let mut copy =
            Self::with_config_and_deleter(self.values.config().clone(), self.deleter.clone())?;
        for value in self.values() {
            copy.add(value.clone())?;
        }
        Ok(copy)
    }
}

impl<T: Clone, D: Deleter<T> + Clone> Clone for SlotMap<T, D> {
    /// Deep-copies every live value into fresh storage.
    ///
    /// The copy is compacted: values are re-added in ascending index order
    /// starting from index 0 with version 1. Handles issued by `self` are
    /// not meaningful against the copy.
    ///
    /// # Panics
    ///
    /// Panics if the copy's arenas cannot allocate; use
    /// [`try_clone`](SlotMap::try_clone) to handle that case.
    fn clone(&self) -> Self {
        self.try_clone()
            .unwrap_or_else(|err| panic!("failed to clone slot map: {err}"))
    }
}

impl<T, D: Deleter<T>> Index<Handle<T>> for SlotMap<T, D> {
    type Output = T;

    /// # Panics
    ///
    /// Panics if `handle` does not resolve. Use
    /// [`get_unchecked`](SlotMap::get_unchecked) to skip validation.
    fn index(&self, handle: Handle<T>) -> &T {
        match self.find(handle) {
            Some(value) => value,
            None => panic!("invalid slot map handle: {handle}"),
        }
    }
}

impl<T, D: Deleter<T>> IndexMut<Handle<T>> for SlotMap<T, D> {
    fn index_mut(&mut self, handle: Handle<T>) -> &mut T {
        match self.find_mut(handle) {
            Some(value) => value,
            None => panic!("invalid slot map handle: {handle}"),
        }
    }
}

impl<'a, T, D: Deleter<T>> IntoIterator for &'a SlotMap<T, D> {
    type Item = (Handle<T>, &'a T);
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T, D: Deleter<T>> IntoIterator for &'a mut SlotMap<T, D> {
    type Item = (Handle<T>, &'a mut T);
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T: fmt::Debug, D: Deleter<T>> fmt::Debug for SlotMap<T, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
