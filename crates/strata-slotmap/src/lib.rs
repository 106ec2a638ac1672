//! Versioned slot map with ABA-safe handles.
//!
//! A [`SlotMap`] stores values in a paged arena that never moves them, and
//! issues [`Handle`]s carrying the slot index plus the version of the
//! occupant. Removing a value marks its slot dead; reusing the slot bumps
//! the version. A handle from a previous occupant therefore never resolves
//! to the new one.
//!
//! # Architecture
//!
//! ```text
//! SlotMap<T, D>
//! ├── PagedArena<T>        values, uninitialised until added
//! ├── PagedArena<Version>  one counter + dead bit per slot
//! └── D: Deleter<T>        hook run on removed values
//! ```
//!
//! # Example
//!
//! ```
//! use strata_slotmap::SlotMap;
//!
//! let mut map = SlotMap::new();
//! let a = map.add("alpha").unwrap();
//! let b = map.add("beta").unwrap();
//! map.remove(a).unwrap();
//!
//! assert!(map.find(a).is_none());
//! let c = map.add("gamma").unwrap();
//! assert_eq!(c.index(), a.index());
//! assert_ne!(c, a);
//! assert_eq!(map.values().copied().collect::<Vec<_>>(), ["gamma", "beta"]);
//! assert_eq!(map[b], "beta");
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod deleter;
pub mod error;
pub mod handle;
pub mod iter;
pub mod slot_map;
pub mod version;

pub use deleter::{Deleter, DropDeleter};
pub use error::SlotMapError;
pub use handle::Handle;
pub use iter::{Handles, Iter, IterMut, Values, ValuesMut};
pub use slot_map::SlotMap;
pub use version::Version;
