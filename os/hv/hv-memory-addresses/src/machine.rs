use crate::{MemoryAddress, MemoryPage, PageSize};
use core::fmt;

/// Machine (real hardware bus) address.
///
/// This is what the processor's translation hardware sees, e.g. the real
/// mode offset programmed into `HID4[RMOR]`. Obtained from a
/// [`PhysicalAddress`](crate::PhysicalAddress) through the platform's
/// physical-to-machine translation.
#[repr(transparent)]
#[derive(Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct MachineAddress(MemoryAddress);

impl MachineAddress {
    #[inline]
    #[must_use]
    pub const fn new(v: u64) -> Self {
        Self(MemoryAddress::new(v))
    }

    #[inline]
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0.as_u64()
    }

    #[inline]
    #[must_use]
    pub const fn page<S: PageSize>(self) -> MachinePage<S> {
        MachinePage(self.0.page::<S>())
    }

    #[inline]
    #[must_use]
    pub const fn is_aligned<S: PageSize>(self) -> bool {
        self.0.is_aligned::<S>()
    }
}

impl fmt::Debug for MachineAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MA(0x{:016X})", self.as_u64())
    }
}

impl fmt::Display for MachineAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:016X}", self.as_u64())
    }
}

/// Machine page base for size `S`.
#[repr(transparent)]
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct MachinePage<S: PageSize>(MemoryPage<S>);

impl<S: PageSize> MachinePage<S> {
    #[inline]
    #[must_use]
    pub const fn from_addr(addr: MachineAddress) -> Self {
        Self(MemoryPage::from_addr(addr.0))
    }

    /// Page with machine frame number `mfn`.
    #[inline]
    #[must_use]
    pub const fn from_mfn(mfn: u64) -> Self {
        Self(MemoryPage::from_number(mfn))
    }

    #[inline]
    #[must_use]
    pub const fn base(self) -> MachineAddress {
        MachineAddress(self.0.base())
    }

    /// Machine frame number in units of `S`.
    #[inline]
    #[must_use]
    pub const fn mfn(self) -> u64 {
        self.0.number()
    }
}

impl<S: PageSize> fmt::Display for MachinePage<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl<S: PageSize> fmt::Debug for MachinePage<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MachinePage<{}>({:#018X})",
            S::as_str(),
            self.0.base().as_u64()
        )
    }
}
