//! Interned string identifier.

use std::fmt;

/// Interned string identifier.
///
/// A plain index into the [`StringInterner`](crate::StringInterner) that
/// produced it. Scopes and registries key on `Name`, so lookups hash a `u32`
/// instead of a string.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct Name(u32);

impl Name {
    /// Pre-interned empty string.
    pub const EMPTY: Name = Name(0);

    #[inline]
    pub(crate) const fn new(index: u32) -> Self {
        Name(index)
    }

    /// Index into the interner's string table.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Get raw u32 value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({})", self.0)
    }
}

impl Default for Name {
    fn default() -> Self {
        Self::EMPTY
    }
}
