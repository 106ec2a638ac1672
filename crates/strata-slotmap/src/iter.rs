//! Iterators over the live slots of a [`SlotMap`](crate::SlotMap).
//!
//! All iterators walk indices in ascending order, skip dead slots, and stop
//! at the version arena's high-water mark. They are exact-size: the map's
//! live count is known up front, which also lets them stop early once the
//! last live slot has been yielded.

#![allow(unsafe_code)]

use std::iter::FusedIterator;
use std::marker::PhantomData;

use strata_arena::PagedArena;

use crate::handle::Handle;
use crate::version::Version;

/// Cursor over live slot indices shared by every iterator.
#[derive(Clone)]
pub(crate) struct LiveSlots<'a> {
    versions: &'a PagedArena<Version>,
    next: usize,
    remaining: usize,
}

impl<'a> LiveSlots<'a> {
    pub(crate) fn new(versions: &'a PagedArena<Version>, live: usize) -> Self {
        Self {
            versions,
            next: 0,
            remaining: live,
        }
    }
}

impl Iterator for LiveSlots<'_> {
    type Item = (u32, Version);

    fn next(&mut self) -> Option<Self::Item> {
        while self.remaining > 0 && self.next < self.versions.size() {
            let index = self.next;
            self.next += 1;
            // SAFETY: every version slot below `size()` is initialised.
            let version = unsafe { self.versions[index].assume_init() };
            if version.is_live() {
                self.remaining -= 1;
                // Live slots always carry indices that fit in a handle.
                return Some((index as u32, version));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

/// Live `(handle, &value)` pairs. Returned by
/// [`SlotMap::iter`](crate::SlotMap::iter).
pub struct Iter<'a, T> {
    slots: LiveSlots<'a>,
    values: &'a PagedArena<T>,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(slots: LiveSlots<'a>, values: &'a PagedArena<T>) -> Self {
        Self { slots, values }
    }
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
            values: self.values,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (Handle<T>, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let (index, version) = self.slots.next()?;
        // SAFETY: the slot is live, so its value is initialised.
        let value = unsafe { self.values[index as usize].assume_init_ref() };
        Some((Handle::new(index, version.raw()), value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.slots.size_hint()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

/// Live `(handle, &mut value)` pairs. Returned by
/// [`SlotMap::iter_mut`](crate::SlotMap::iter_mut).
pub struct IterMut<'a, T> {
    slots: LiveSlots<'a>,
    values: &'a PagedArena<T>,
    _marker: PhantomData<&'a mut T>,
}

impl<'a, T> IterMut<'a, T> {
    /// `values` must come from a map that is mutably borrowed for `'a`.
    pub(crate) fn new(slots: LiveSlots<'a>, values: &'a PagedArena<T>) -> Self {
        Self {
            slots,
            values,
            _marker: PhantomData,
        }
    }
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = (Handle<T>, &'a mut T);

    fn next(&mut self) -> Option<Self::Item> {
        let (index, version) = self.slots.next()?;
        let mut ptr = self.values.address_of(index as usize);
        // SAFETY: the slot is live, so its value is initialised. Each index
        // is yielded at most once, so the returned references are disjoint,
        // and the map stays mutably borrowed for `'a`. Values live in page
        // buffers, not inside the arena struct the shared borrow covers.
        let value = unsafe { ptr.as_mut() };
        Some((Handle::new(index, version.raw()), value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.slots.size_hint()
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {}
impl<T> FusedIterator for IterMut<'_, T> {}

/// Live values. Returned by [`SlotMap::values`](crate::SlotMap::values).
pub struct Values<'a, T> {
    inner: Iter<'a, T>,
}

impl<'a, T> Values<'a, T> {
    pub(crate) fn new(inner: Iter<'a, T>) -> Self {
        Self { inner }
    }
}

impl<T> Clone for Values<'_, T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, T> Iterator for Values<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for Values<'_, T> {}
impl<T> FusedIterator for Values<'_, T> {}

/// Live values, mutably. Returned by
/// [`SlotMap::values_mut`](crate::SlotMap::values_mut).
pub struct ValuesMut<'a, T> {
    inner: IterMut<'a, T>,
}

impl<'a, T> ValuesMut<'a, T> {
    pub(crate) fn new(inner: IterMut<'a, T>) -> Self {
        Self { inner }
    }
}

impl<'a, T> Iterator for ValuesMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for ValuesMut<'_, T> {}
impl<T> FusedIterator for ValuesMut<'_, T> {}

/// Handles of live values. Returned by
/// [`SlotMap::handles`](crate::SlotMap::handles).
pub struct Handles<'a, T> {
    slots: LiveSlots<'a>,
    _marker: PhantomData<fn() -> T>,
}

impl<'a, T> Handles<'a, T> {
    pub(crate) fn new(slots: LiveSlots<'a>) -> Self {
        Self {
            slots,
            _marker: PhantomData,
        }
    }
}

impl<T> Clone for Handles<'_, T> {
    fn clone(&self) -> Self {
        Self::new(self.slots.clone())
    }
}

impl<T> Iterator for Handles<'_, T> {
    type Item = Handle<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let (index, version) = self.slots.next()?;
        Some(Handle::new(index, version.raw()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.slots.size_hint()
    }
}

impl<T> ExactSizeIterator for Handles<'_, T> {}
impl<T> FusedIterator for Handles<'_, T> {}
