//! Growable byte-level bump arena built from fixed-size pages.
//!
//! A [`PagedBumpArena`] serves raw, aligned byte ranges. When the current
//! page is full a new page is appended; earlier pages are never touched,
//! so every address handed out stays valid until [`PagedBumpArena::reset`]
//! or drop. Individual allocations cannot be freed.

use std::mem;
use std::ptr::NonNull;

use tracing::{debug, trace};

use crate::error::ArenaError;
use crate::page::{Page, MIN_PAGE_ALIGN};

/// A growable list of [`Page`]s with overflow-based bump allocation.
///
/// Allocations that do not fit in the current page are placed entirely in
/// the next one; there is no cross-page splitting.
pub struct PagedBumpArena {
    pages: Vec<Page>,
    page_bytes: usize,
    max_pages: Option<usize>,
}

impl PagedBumpArena {
    /// Create an arena with one pre-allocated page of `page_bytes` bytes.
    pub fn new(page_bytes: usize) -> Result<Self, ArenaError> {
        Self::build(page_bytes, None)
    }

    /// Like [`new`](Self::new), but refuse to own more than `max_pages`
    /// pages.
    pub fn with_max_pages(page_bytes: usize, max_pages: usize) -> Result<Self, ArenaError> {
        if max_pages == 0 {
            return Err(ArenaError::InvalidConfig {
                reason: "max_pages must be greater than 0".into(),
            });
        }
        Self::build(page_bytes, Some(max_pages))
    }

    fn build(page_bytes: usize, max_pages: Option<usize>) -> Result<Self, ArenaError> {
        if page_bytes == 0 {
            return Err(ArenaError::InvalidConfig {
                reason: "page size must be greater than 0".into(),
            });
        }
        Ok(Self {
            pages: vec![Page::new(page_bytes, MIN_PAGE_ALIGN)?],
            page_bytes,
            max_pages,
        })
    }

    /// Bump-allocate `bytes` bytes aligned to `align`, growing into a new
    /// page if needed.
    ///
    /// Requests larger than a page fail with
    /// [`ArenaError::CapacityExceeded`]; so does growth past `max_pages`.
    pub fn allocate(&mut self, bytes: usize, align: usize) -> Result<NonNull<u8>, ArenaError> {
        if !align.is_power_of_two() {
            return Err(ArenaError::InvalidAlignment { align });
        }
        // Reject allocations that can never fit in a single page.
        if bytes > self.page_bytes {
            return Err(ArenaError::CapacityExceeded {
                requested: bytes,
                capacity: self.page_bytes,
            });
        }

        // Try the current page first.
        if let Some(ptr) = self.current_mut().allocate(bytes, align) {
            return Ok(ptr);
        }

        if let Some(max) = self.max_pages {
            if self.pages.len() >= max {
                return Err(ArenaError::CapacityExceeded {
                    requested: bytes,
                    capacity: self.memory_bytes(),
                });
            }
        }

        let mut page = Page::new(self.page_bytes, align.max(MIN_PAGE_ALIGN))?;
        // The fresh page is aligned to `align`, so a request no larger than
        // the page always fits.
        let ptr = page
            .allocate(bytes, align)
            .ok_or(ArenaError::CapacityExceeded {
                requested: bytes,
                capacity: self.page_bytes,
            })?;
        self.pages.push(page);
        trace!(
            page = self.pages.len() - 1,
            pages = self.pages.len(),
            page_bytes = self.page_bytes,
            "bump arena grew"
        );
        Ok(ptr)
    }

    /// Allocate uninitialised room for `count` values of `T`.
    pub fn allocate_array<T>(&mut self, count: usize) -> Result<NonNull<T>, ArenaError> {
        let bytes = mem::size_of::<T>()
            .checked_mul(count)
            .ok_or(ArenaError::CapacityExceeded {
                requested: usize::MAX,
                capacity: self.page_bytes,
            })?;
        Ok(self.allocate(bytes, mem::align_of::<T>())?.cast())
    }

    /// Release every page but the first and rewind it.
    ///
    /// All previously returned addresses become invalid.
    pub fn reset(&mut self) {
        let released = self.pages.len() - 1;
        self.pages.truncate(1);
        self.current_mut().reset();
        debug!(released, "bump arena reset");
    }

    /// Number of pages currently owned.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Size of each page in bytes.
    pub fn page_bytes(&self) -> usize {
        self.page_bytes
    }

    /// Bytes handed out across all pages, including alignment padding.
    pub fn used(&self) -> usize {
        self.pages.iter().map(Page::used).sum()
    }

    /// Total memory held by pages, in bytes.
    pub fn memory_bytes(&self) -> usize {
        self.pages.iter().map(Page::capacity).sum()
    }

    fn current_mut(&mut self) -> &mut Page {
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }
}

impl std::fmt::Debug for PagedBumpArena {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PagedBumpArena")
            .field("pages", &self.pages.len())
            .field("page_bytes", &self.page_bytes)
            .field("used", &self.used())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_allocation_lands_at_page_base() {
        let mut arena = PagedBumpArena::new(1024).unwrap();
        let ptr = arena.allocate(10, 8).unwrap();
        assert_eq!(ptr.as_ptr().addr() % 8, 0);
        assert_eq!(arena.page_count(), 1);
        assert_eq!(arena.used(), 10);
    }

    #[test]
    fn grows_on_overflow() {
        let mut arena = PagedBumpArena::new(100).unwrap();
        let a = arena.allocate(100, 1).unwrap();
        let b = arena.allocate(50, 1).unwrap();
        assert_ne!(a, b);
        assert_eq!(arena.page_count(), 2);
        assert_eq!(arena.used(), 150);
    }

    #[test]
    fn growth_keeps_earlier_addresses() {
        let mut arena = PagedBumpArena::new(64).unwrap();
        let first = arena.allocate_array::<u64>(8).unwrap();
        for i in 0..8 {
            let p = arena.allocate_array::<u64>(1).unwrap();
            assert_ne!(p, first, "allocation {i} reused a live address");
        }
        assert!(arena.page_count() >= 2);
    }

    #[test]
    fn oversized_alloc_returns_error_not_panic() {
        let mut arena = PagedBumpArena::new(100).unwrap();
        let result = arena.allocate(101, 1);
        assert!(matches!(result, Err(ArenaError::CapacityExceeded { .. })));
        assert_eq!(arena.page_count(), 1);
    }

    #[test]
    fn exactly_page_size_alloc_succeeds() {
        let mut arena = PagedBumpArena::new(100).unwrap();
        assert!(arena.allocate(100, 1).is_ok());
    }

    #[test]
    fn max_pages_caps_growth() {
        let mut arena = PagedBumpArena::with_max_pages(100, 2).unwrap();
        arena.allocate(100, 1).unwrap();
        arena.allocate(100, 1).unwrap();
        let result = arena.allocate(1, 1);
        assert!(matches!(result, Err(ArenaError::CapacityExceeded { .. })));
    }

    #[test]
    fn reset_keeps_only_the_first_page() {
        let mut arena = PagedBumpArena::new(100).unwrap();
        let first = arena.allocate(80, 1).unwrap();
        arena.allocate(80, 1).unwrap();
        arena.allocate(80, 1).unwrap();
        assert_eq!(arena.page_count(), 3);

        arena.reset();
        assert_eq!(arena.page_count(), 1);
        assert_eq!(arena.used(), 0);
        assert_eq!(arena.allocate(10, 1).unwrap(), first);
    }

    #[test]
    fn invalid_inputs_are_rejected() {
        assert!(matches!(
            PagedBumpArena::new(0),
            Err(ArenaError::InvalidConfig { .. })
        ));
        assert!(matches!(
            PagedBumpArena::with_max_pages(64, 0),
            Err(ArenaError::InvalidConfig { .. })
        ));
        let mut arena = PagedBumpArena::new(64).unwrap();
        assert!(matches!(
            arena.allocate(8, 5),
            Err(ArenaError::InvalidAlignment { align: 5 })
        ));
    }

    #[test]
    fn over_aligned_request_on_fresh_page() {
        let mut arena = PagedBumpArena::new(128).unwrap();
        arena.allocate(100, 1).unwrap();
        let ptr = arena.allocate(64, 64).unwrap();
        assert_eq!(ptr.as_ptr().addr() % 64, 0);
    }

    #[test]
    fn array_size_overflow_is_reported() {
        let mut arena = PagedBumpArena::new(64).unwrap();
        let result = arena.allocate_array::<u64>(usize::MAX);
        assert!(matches!(result, Err(ArenaError::CapacityExceeded { .. })));
    }
}
