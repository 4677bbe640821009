use core::fmt;

/// Identifies a **Special-Purpose Register (SPR)** by its architectural number.
///
/// SPR numbers are encoded directly into the `mfspr`/`mtspr` instructions,
/// so each register gets its own accessor; this type names them for
/// diagnostics and lookup tables.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Spr(u16);

impl Spr {
    /// Creates a new `Spr` from a raw register number.
    #[inline(always)]
    #[allow(clippy::inline_always)]
    pub(crate) const fn new(number: u16) -> Self {
        Self(number)
    }

    /// Returns the underlying raw SPR number.
    #[inline(always)]
    #[allow(clippy::inline_always)]
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }
}

impl fmt::Display for Spr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SPR {} ({:#05X})", self.0, self.0)
    }
}
