//! Fixed-capacity pages with bump allocation.
//!
//! A [`Page`] is one contiguous buffer with a cursor that advances on each
//! allocation. Pages are never resized and never free individual
//! allocations; [`Page::reset`] rewinds the cursor and logically
//! invalidates everything handed out so far.

use std::mem::MaybeUninit;
use std::ptr::NonNull;

use crate::error::ArenaError;
use crate::raw::RawBuffer;

/// Minimum alignment of every page buffer, matching the platform's
/// strictest fundamental alignment.
pub const MIN_PAGE_ALIGN: usize = 16;

/// A single contiguous memory page with bump allocation.
///
/// Pages are the unit of arena growth. The buffer is allocated once at
/// creation and released when the page is dropped; no destructors are run
/// for anything placed in it.
pub struct Page {
    /// Backing storage, aligned to at least [`MIN_PAGE_ALIGN`].
    buffer: RawBuffer,
    /// Bump pointer: next free byte offset.
    cursor: usize,
}

impl Page {
    /// Create a page of `bytes` bytes whose base is aligned to at least
    /// `align`.
    ///
    /// Fails with [`ArenaError::InvalidAlignment`] if `align` is not a power
    /// of two, or [`ArenaError::AllocationFailed`] if the system allocator
    /// refuses the buffer.
    pub fn new(bytes: usize, align: usize) -> Result<Self, ArenaError> {
        if !align.is_power_of_two() {
            return Err(ArenaError::InvalidAlignment { align });
        }
        Ok(Self {
            buffer: RawBuffer::new(bytes, align.max(MIN_PAGE_ALIGN))?,
            cursor: 0,
        })
    }

    /// Bump-allocate `bytes` bytes aligned to `align`.
    ///
    /// Returns `None` if the request does not fit in the remaining space or
    /// `align` is not a power of two. A failed request leaves the page
    /// untouched.
    pub fn allocate(&mut self, bytes: usize, align: usize) -> Option<NonNull<u8>> {
        if !align.is_power_of_two() {
            return None;
        }
        let base = self.buffer.base().as_ptr().addr();
        let start = base
            .checked_add(self.cursor)?
            .checked_next_multiple_of(align)?
            - base;
        let end = start.checked_add(bytes)?;
        if end > self.buffer.len() {
            return None;
        }
        self.cursor = end;
        Some(self.buffer.byte_ptr(start))
    }

    /// Reset the bump pointer to zero without deallocating.
    ///
    /// All previous allocations become invalid. The backing memory is not
    /// zeroed.
    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    /// Address of the first byte of the page.
    pub fn base(&self) -> NonNull<u8> {
        self.buffer.base()
    }

    /// Address `offset` bytes into the page.
    ///
    /// # Panics
    ///
    /// Panics if `offset` exceeds the page capacity.
    pub fn address(&self, offset: usize) -> NonNull<u8> {
        self.buffer.byte_ptr(offset)
    }

    /// Address of the `index`-th `T` when the page is viewed as `[T]`.
    ///
    /// # Panics
    ///
    /// Panics if the element lies outside the page or is misaligned.
    pub fn element_ptr<T>(&self, index: usize) -> NonNull<T> {
        self.buffer.typed_ptr(index)
    }

    /// Shared view of the `index`-th `T` slot. Ignores the bump cursor.
    pub fn element<T>(&self, index: usize) -> &MaybeUninit<T> {
        self.buffer.uninit(index)
    }

    /// Exclusive view of the `index`-th `T` slot. Ignores the bump cursor.
    pub fn element_mut<T>(&mut self, index: usize) -> &mut MaybeUninit<T> {
        self.buffer.uninit_mut(index)
    }

    /// Number of bytes currently allocated, including alignment padding.
    pub fn used(&self) -> usize {
        self.cursor
    }

    /// Total capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Remaining free capacity in bytes, ignoring alignment padding.
    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.cursor
    }

    /// Alignment of the page base.
    pub fn align(&self) -> usize {
        self.buffer.align()
    }
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("base", &self.base())
            .field("used", &self.cursor)
            .field("capacity", &self.capacity())
            .finish()
    }
}
