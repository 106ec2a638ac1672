//! Per-slot version counters with a reserved dead bit.
//!
//! A [`Version`] packs a 31-bit counter and a "dead" flag into one `u32`.
//! Live slots carry the version their current occupant was issued with;
//! removed slots keep that value and set the dead bit, so a handle minted
//! for the old occupant keeps failing validation until and after the slot
//! is reused.
//!
//! # Exhaustion
//!
//! A slot whose counter reaches [`Version::MAX`] is never revived: on
//! removal the slot map retires it instead of recycling the index. Counters
//! therefore never wrap, and no handle can ever be minted twice.

use std::fmt;

/// Stored version of one slot: counter in the low 31 bits, dead flag in the
/// most significant bit.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Version(u32);

impl Version {
    /// The dead flag.
    pub const DEAD_BIT: u32 = 0x8000_0000;

    /// Mask selecting the counter bits.
    pub const MASK: u32 = 0x7FFF_FFFF;

    /// Largest counter value a live slot can carry.
    pub const MAX: u32 = Self::MASK;

    /// Version of a slot that has never been occupied: counter 0, dead.
    pub const UNUSED: Self = Self(Self::DEAD_BIT);

    /// Reinterpret a stored `u32`.
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// The stored `u32`, dead bit included.
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// The counter, without the dead bit.
    pub const fn get(self) -> u32 {
        self.0 & Self::MASK
    }

    /// Whether the dead bit is set.
    pub const fn is_dead(self) -> bool {
        self.0 & Self::DEAD_BIT != 0
    }

    /// Whether the slot holds a value.
    pub const fn is_live(self) -> bool {
        !self.is_dead()
    }

    /// Whether the counter can no longer be advanced.
    pub const fn is_exhausted(self) -> bool {
        self.get() == Self::MAX
    }

    /// The version the next occupant receives: counter plus one, dead bit
    /// cleared. Returns `None` once the counter is exhausted.
    pub const fn next_live(self) -> Option<Self> {
        if self.is_exhausted() {
            None
        } else {
            Some(Self(self.get() + 1))
        }
    }

    /// The same counter with the dead bit set.
    pub const fn killed(self) -> Self {
        Self(self.0 | Self::DEAD_BIT)
    }

    /// Whether a handle issued with `version` still names this slot's
    /// occupant. A dead slot never matches, whatever bits the handle
    /// carries.
    pub const fn matches(self, version: u32) -> bool {
        self.is_live() && self.0 == version
    }
}

impl fmt::Debug for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_dead() {
            write!(f, "Dead({})", self.get())
        } else {
            write!(f, "Live({})", self.get())
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())?;
        if self.is_dead() {
            write!(f, " (dead)")?;
        }
        Ok(())
    }
}
