//! Strata: paged arenas and a versioned slot map.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the strata sub-crates. For most users, adding `strata` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use strata::prelude::*;
//!
//! #[derive(Debug)]
//! struct Body {
//!     mass: f32,
//! }
//!
//! // Small pages so the example crosses a page boundary.
//! let mut bodies = SlotMap::with_config(ArenaConfig::new(2)).unwrap();
//! let sun = bodies.add(Body { mass: 1.0 }).unwrap();
//! let moon = bodies.add(Body { mass: 0.01 }).unwrap();
//! let comet = bodies.add(Body { mass: 0.0001 }).unwrap();
//!
//! bodies.remove(moon).unwrap();
//! assert!(bodies.find(moon).is_none());
//! assert!(matches!(bodies.remove(moon), Err(SlotMapError::InvalidHandle { .. })));
//!
//! // The freed slot is reused with a new version.
//! let lander = bodies.add(Body { mass: 0.0 }).unwrap();
//! assert_eq!(lander.index(), moon.index());
//! assert_eq!(lander.version(), moon.version() + 1);
//!
//! bodies[sun].mass += 0.5;
//! let total: f32 = bodies.values().map(|b| b.mass).sum();
//! assert!((total - 1.5001).abs() < 1e-4);
//! assert_eq!(bodies.handles().collect::<Vec<_>>(), [sun, lander, comet]);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`arena`] | `strata-arena` | Pages, index pool, paged and bump arenas |
//! | [`slotmap`] | `strata-slotmap` | Versioned slot map, handles, deleters |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Paged storage primitives (`strata-arena`).
///
/// [`arena::PagedArena`] hands out stable, index-addressed slots;
/// [`arena::PagedBumpArena`] carves byte ranges out of pages and resets in
/// bulk.
pub use strata_arena as arena;

/// Versioned slot map (`strata-slotmap`).
///
/// [`slotmap::SlotMap`] stores values behind [`slotmap::Handle`]s that
/// stop resolving once their value is removed.
pub use strata_slotmap as slotmap;

/// Common imports for typical strata usage.
///
/// ```rust
/// use strata::prelude::*;
/// ```
pub mod prelude {
    // Arenas
    pub use strata_arena::{ArenaConfig, ArenaError, IndexPool, PagedArena, PagedBumpArena};

    // Slot map
    pub use strata_slotmap::{Deleter, DropDeleter, Handle, SlotMap, SlotMapError};
}
