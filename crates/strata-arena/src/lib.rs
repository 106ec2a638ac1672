//! Paged, index-addressed arenas for the strata slot map.
//!
//! Provides fixed-size pages, a LIFO pool of released indices, and two
//! arenas built from them. This crate is one of two that may contain
//! `unsafe` code (along with `strata-slotmap`).
//!
//! # Architecture
//!
//! ```text
//! PagedArena<T> (typed, index-addressed)
//! ├── Page[] (one fixed buffer each, never moved)
//! │   └── RawBuffer (aligned allocation from the global allocator)
//! └── IndexPool (LIFO stack of released indices)
//!
//! PagedBumpArena (untyped, byte ranges)
//! └── Page[] (bump cursor per page, overflow into a new page)
//! ```
//!
//! # Index space
//!
//! A [`PagedArena`] hands out dense global indices. Index `i` lives at
//! offset `i % page_capacity` of page `i / page_capacity`. Growth appends
//! pages only, so the address of an index never changes.
//!
//! # Memory safety
//!
//! All `unsafe` is confined to `raw.rs`. Slots are exposed as
//! `MaybeUninit<T>` views or raw addresses; the arenas never construct,
//! read, or drop element values.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod bump;
pub mod config;
pub mod error;
pub mod page;
pub mod paged;
pub mod pool;
mod raw;

// Public re-exports for the primary API surface.
pub use bump::PagedBumpArena;
pub use config::ArenaConfig;
pub use error::ArenaError;
pub use page::Page;
pub use paged::{Allocation, PagedArena};
pub use pool::IndexPool;
