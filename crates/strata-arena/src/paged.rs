//! Paged, index-addressed storage for a single element type.
//!
//! [`PagedArena`] maps a dense global index space onto `(page, offset)`
//! pairs. Pages are appended one at a time and never move, so the address
//! of an index is stable for the arena's lifetime. Released indices go to
//! an [`IndexPool`] and are reused LIFO before the arena grows.
//!
//! The arena manages raw slots only. It never constructs, reads, or drops
//! the `T` values placed in them; callers that store values with
//! non-trivial teardown must destroy them before [`PagedArena::deallocate`].

use std::marker::PhantomData;
use std::mem::{self, MaybeUninit};
use std::ops::{Index, IndexMut};
use std::ptr::NonNull;

use tracing::trace;

use crate::config::ArenaConfig;
use crate::error::ArenaError;
use crate::page::Page;
use crate::pool::IndexPool;

/// Result of [`PagedArena::allocate`]: the slot's global index and its
/// current address.
#[derive(Debug, PartialEq, Eq)]
#[must_use]
pub struct Allocation<T> {
    index: usize,
    ptr: NonNull<T>,
}

impl<T> Allocation<T> {
    /// Global index of the slot.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Address of the slot. Stable until the arena is dropped.
    pub fn ptr(&self) -> NonNull<T> {
        self.ptr
    }
}

impl<T> Clone for Allocation<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Allocation<T> {}

/// A growable sequence of fixed-capacity pages holding `T` slots.
///
/// `size()` is the high-water mark of issued indices, including indices
/// that are currently sitting in the free pool. It never decreases.
pub struct PagedArena<T> {
    pages: Vec<Page>,
    free: IndexPool,
    /// Next never-issued global index.
    next_index: usize,
    config: ArenaConfig,
    _marker: PhantomData<T>,
}

impl<T> PagedArena<T> {
    /// Create an empty arena with the default [`ArenaConfig`].
    pub fn new() -> Self {
        Self {
            pages: Vec::new(),
            free: IndexPool::new(),
            next_index: 0,
            config: ArenaConfig::default(),
            _marker: PhantomData,
        }
    }

    /// Create an empty arena with the given configuration.
    ///
    /// Rejects a zero page capacity, a zero page limit, and pages whose
    /// byte size would overflow `isize`.
    pub fn with_config(config: ArenaConfig) -> Result<Self, ArenaError> {
        config.validate()?;
        let fits = config
            .page_capacity
            .checked_mul(mem::size_of::<T>())
            .is_some_and(|bytes| bytes <= isize::MAX as usize);
        if !fits {
            return Err(ArenaError::InvalidConfig {
                reason: format!(
                    "page of {} elements of {} bytes overflows the address space",
                    config.page_capacity,
                    mem::size_of::<T>()
                ),
            });
        }
        Ok(Self {
            pages: Vec::new(),
            free: IndexPool::new(),
            next_index: 0,
            config,
            _marker: PhantomData,
        })
    }

    /// Reserve a slot, reusing the most recently released index if any.
    ///
    /// The returned slot is uninitialised (or holds whatever bytes a
    /// previous occupant left behind). Growth appends exactly one page
    /// when the next fresh index falls past the last page.
    pub fn allocate(&mut self) -> Result<Allocation<T>, ArenaError> {
        if !self.free.is_empty() {
            let index = self.free.pop()?;
            return Ok(Allocation {
                index,
                ptr: self.address_of(index),
            });
        }

        let index = self.next_index;
        let (page, _) = self.locate(index);
        if page >= self.pages.len() {
            self.grow()?;
        }
        self.next_index += 1;
        Ok(Allocation {
            index,
            ptr: self.address_of(index),
        })
    }

    /// Reserve a slot and move `value` into it.
    ///
    /// The value is not dropped by the arena; the caller owns its teardown.
    pub fn allocate_with(&mut self, value: T) -> Result<(usize, &mut T), ArenaError> {
        let index = self.allocate()?.index;
        let slot = self.slot_mut(index);
        Ok((index, slot.write(value)))
    }

    /// Return `index` to the free pool.
    ///
    /// The slot's bytes are left untouched and no destructor runs. Releasing
    /// an index twice, or one that was never issued, corrupts reuse order
    /// and is a caller bug.
    pub fn deallocate(&mut self, index: usize) {
        debug_assert!(
            index < self.next_index,
            "deallocating never-issued index {index}"
        );
        self.free.push(index);
    }

    /// Address of the slot at `index`, without checking it against the
    /// high-water mark.
    ///
    /// # Panics
    ///
    /// Panics if no page has been allocated for `index`.
    pub fn address_of(&self, index: usize) -> NonNull<T> {
        let (page, offset) = self.locate(index);
        self.pages[page].element_ptr(offset)
    }

    /// Bounds-checked address of the slot at `index`.
    pub fn get(&self, index: usize) -> Result<NonNull<T>, ArenaError> {
        self.check(index)?;
        Ok(self.address_of(index))
    }

    /// Bounds-checked shared view of the slot at `index`.
    pub fn at(&self, index: usize) -> Result<&MaybeUninit<T>, ArenaError> {
        self.check(index)?;
        Ok(self.slot(index))
    }

    /// Bounds-checked exclusive view of the slot at `index`.
    pub fn at_mut(&mut self, index: usize) -> Result<&mut MaybeUninit<T>, ArenaError> {
        self.check(index)?;
        Ok(self.slot_mut(index))
    }

    /// High-water mark: the number of indices ever issued.
    pub fn size(&self) -> usize {
        self.next_index
    }

    /// Number of released indices waiting in the pool.
    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    /// Number of pages currently owned.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Number of slots backed by allocated pages.
    pub fn capacity(&self) -> usize {
        self.pages.len() * self.config.page_capacity
    }

    /// The configuration this arena was built with.
    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    /// Total memory held by pages, in bytes.
    pub fn memory_bytes(&self) -> usize {
        self.pages.iter().map(Page::capacity).sum()
    }

    fn locate(&self, index: usize) -> (usize, usize) {
        (
            index / self.config.page_capacity,
            index % self.config.page_capacity,
        )
    }

    fn check(&self, index: usize) -> Result<(), ArenaError> {
        if index >= self.next_index {
            return Err(ArenaError::OutOfBounds {
                index,
                len: self.next_index,
            });
        }
        Ok(())
    }

    fn slot(&self, index: usize) -> &MaybeUninit<T> {
        let (page, offset) = self.locate(index);
        self.pages[page].element(offset)
    }

    fn slot_mut(&mut self, index: usize) -> &mut MaybeUninit<T> {
        let (page, offset) = self.locate(index);
        self.pages[page].element_mut(offset)
    }

    fn page_bytes(&self) -> usize {
        // Saturates only for `new()` with absurdly large `T`; the page
        // allocation then fails cleanly.
        self.config.page_capacity.saturating_mul(mem::size_of::<T>())
    }

    fn grow(&mut self) -> Result<(), ArenaError> {
        let bytes = self.page_bytes();
        if let Some(max) = self.config.max_pages {
            if self.pages.len() >= max {
                return Err(ArenaError::CapacityExceeded {
                    requested: bytes,
                    capacity: self.memory_bytes(),
                });
            }
        }

        let mut page = Page::new(bytes, mem::align_of::<T>())?;
        // Claim the whole page; slot addresses are derived from its base.
        page.allocate(bytes, mem::align_of::<T>())
            .ok_or(ArenaError::AllocationFailed {
                bytes,
                align: mem::align_of::<T>(),
            })?;
        self.pages.push(page);
        trace!(
            page = self.pages.len() - 1,
            pages = self.pages.len(),
            page_capacity = self.config.page_capacity,
            "paged arena grew"
        );
        Ok(())
    }
}

impl<T> Default for PagedArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<usize> for PagedArena<T> {
    type Output = MaybeUninit<T>;

    /// # Panics
    ///
    /// Panics if `index` is at or past the high-water mark, even when a
    /// page already backs it.
    fn index(&self, index: usize) -> &Self::Output {
        match self.at(index) {
            Ok(slot) => slot,
            Err(err) => panic!("{err}"),
        }
    }
}

impl<T> IndexMut<usize> for PagedArena<T> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        match self.at_mut(index) {
            Ok(slot) => slot,
            Err(err) => panic!("{err}"),
        }
    }
}

impl<T> std::fmt::Debug for PagedArena<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PagedArena")
            .field("size", &self.next_index)
            .field("free", &self.free.len())
            .field("pages", &self.pages.len())
            .field("page_capacity", &self.config.page_capacity)
            .finish()
    }
}
