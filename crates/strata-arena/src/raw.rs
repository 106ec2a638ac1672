//! Low-level primitives for arena memory operations.
//!
//! Every `unsafe` block in `strata-arena` lives in this module, each with a
//! mandatory `// SAFETY:` comment. The rest of the crate is
//! `#![deny(unsafe_code)]` and reaches raw memory only through
//! [`RawBuffer`]'s bounds-checked methods.

#![allow(unsafe_code)]

use std::alloc::{self, Layout};
use std::mem::{self, MaybeUninit};
use std::ptr::{self, NonNull};

use crate::error::ArenaError;

/// An owned, fixed-size, aligned byte buffer from the global allocator.
///
/// The contents are never initialised, read, or dropped by the buffer
/// itself; it only hands out addresses. Zero-sized buffers allocate
/// nothing and use a dangling pointer aligned to the requested alignment.
pub(crate) struct RawBuffer {
    ptr: NonNull<u8>,
    layout: Layout,
}

// SAFETY: the buffer uniquely owns its allocation. Element types stored in
// it are tracked by the owning arena through `PhantomData`, which carries
// their auto traits.
unsafe impl Send for RawBuffer {}
// SAFETY: `&RawBuffer` yields only raw addresses and `&MaybeUninit<T>`
// views; mutation goes through `&mut self` or caller-side `unsafe`.
unsafe impl Sync for RawBuffer {}

impl RawBuffer {
    /// Allocate `bytes` bytes aligned to `align`.
    pub(crate) fn new(bytes: usize, align: usize) -> Result<Self, ArenaError> {
        let layout = Layout::from_size_align(bytes, align)
            .map_err(|_| ArenaError::AllocationFailed { bytes, align })?;
        if layout.size() == 0 {
            let dangling = NonNull::new(ptr::without_provenance_mut::<u8>(layout.align()))
                .unwrap_or(NonNull::dangling());
            return Ok(Self {
                ptr: dangling,
                layout,
            });
        }
        // SAFETY: `layout` has a non-zero size.
        let ptr = unsafe { alloc::alloc(layout) };
        let ptr = NonNull::new(ptr).ok_or(ArenaError::AllocationFailed { bytes, align })?;
        Ok(Self { ptr, layout })
    }

    pub(crate) fn len(&self) -> usize {
        self.layout.size()
    }

    pub(crate) fn align(&self) -> usize {
        self.layout.align()
    }

    pub(crate) fn base(&self) -> NonNull<u8> {
        self.ptr
    }

    /// Address `offset` bytes past the start of the buffer.
    ///
    /// # Panics
    ///
    /// Panics if `offset` is greater than the buffer length.
    pub(crate) fn byte_ptr(&self, offset: usize) -> NonNull<u8> {
        assert!(
            offset <= self.len(),
            "byte offset {offset} outside buffer of {} bytes",
            self.len()
        );
        // SAFETY: `offset <= len`, so the result stays inside the allocation
        // or one past its end. Zero-sized buffers only ever see offset 0.
        unsafe { self.ptr.add(offset) }
    }

    /// Address of the `index`-th `T` in the buffer.
    ///
    /// # Panics
    ///
    /// Panics if the element does not lie entirely inside the buffer or the
    /// resulting address is not aligned for `T`.
    pub(crate) fn typed_ptr<T>(&self, index: usize) -> NonNull<T> {
        let size = mem::size_of::<T>();
        let end = index
            .checked_mul(size)
            .and_then(|start| start.checked_add(size));
        match end {
            Some(end) if end <= self.len() => {}
            _ => panic!(
                "element {index} of size {size} outside buffer of {} bytes",
                self.len()
            ),
        }
        let ptr = self.byte_ptr(index * size).cast::<T>();
        assert!(
            ptr.as_ptr().is_aligned(),
            "element {index} is not aligned for its type"
        );
        ptr
    }

    /// Shared view of the `index`-th `T` slot.
    pub(crate) fn uninit<T>(&self, index: usize) -> &MaybeUninit<T> {
        let ptr = self.typed_ptr::<MaybeUninit<T>>(index);
        // SAFETY: `typed_ptr` checked bounds and alignment. `MaybeUninit<T>`
        // has no validity invariant and the borrow is tied to `&self`.
        unsafe { ptr.as_ref() }
    }

    /// Exclusive view of the `index`-th `T` slot.
    pub(crate) fn uninit_mut<T>(&mut self, index: usize) -> &mut MaybeUninit<T> {
        let mut ptr = self.typed_ptr::<MaybeUninit<T>>(index);
        // SAFETY: as in `uninit`; `&mut self` guarantees no other borrow of
        // the buffer is live.
        unsafe { ptr.as_mut() }
    }
}

impl Drop for RawBuffer {
    fn drop(&mut self) {
        if self.layout.size() != 0 {
            // SAFETY: `ptr` was returned by `alloc::alloc` with this layout
            // and has not been freed.
            unsafe { alloc::dealloc(self.ptr.as_ptr(), self.layout) }
        }
    }
}
