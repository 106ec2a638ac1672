//! Element types with awkward layouts.
//!
//! - [`Marker`] is zero-sized.
//! - [`CacheLine`] demands 64-byte alignment.
//! - [`Wide`] is large enough that a handful fill a page.
//! - [`Odd`] has a size that is not a multiple of 8.

/// Zero-sized element.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Marker;

/// Over-aligned element: one value per cache line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(align(64))]
pub struct CacheLine(pub u64);

/// 256-byte element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Wide(pub [u64; 32]);

impl Wide {
    /// Every word set to `seed`.
    pub fn splat(seed: u64) -> Self {
        Self([seed; 32])
    }
}

/// Three-byte element with alignment 1.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Odd(pub [u8; 3]);
