//! # Real-Mode Area Sizes
//!
//! The 970 can only confine a partition's real-mode accesses to one of six
//! area sizes. Each size is selected by a three-bit `RMLR` value that the
//! register splits into `RMLR[0]` and `RMLR[1:2]`; the encodings are not
//! monotonic in the size, so they live in a table rather than a formula.

use core::fmt;
use hv_memory_addresses::{MachineAddress, PAGE_SHIFT};
use log::debug;

/// Register encoding for one supported real-mode area size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RmaSettings {
    /// log2 of the area size in bytes.
    pub order: u32,
    /// `HID4[RMLR0]` (one bit).
    pub rmlr0: u8,
    /// `HID4[RMLR1:2]` (two bits).
    pub rmlr12: u8,
}

impl RmaSettings {
    const fn new(order: u32, rmlr0: u8, rmlr12: u8) -> Self {
        Self {
            order,
            rmlr0,
            rmlr12,
        }
    }

    /// Area size in bytes.
    #[must_use]
    pub const fn size_bytes(&self) -> u64 {
        1 << self.order
    }

    /// Area size as a page order, i.e. log2 of the size in base pages.
    #[must_use]
    pub const fn order_pages(&self) -> u32 {
        self.order - PAGE_SHIFT
    }

    /// The `(RMLR0, RMLR1:2)` pair.
    #[must_use]
    pub const fn encoding(&self) -> (u8, u8) {
        (self.rmlr0, self.rmlr12)
    }
}

impl fmt::Display for RmaSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mib = self.size_bytes() >> 20;
        if mib >= 1024 {
            write!(f, "{} GiB", mib >> 10)?;
        } else {
            write!(f, "{mib} MiB")?;
        }
        write!(f, " (rmlr0={}, rmlr12={})", self.rmlr0, self.rmlr12)
    }
}

/// Every real-mode area size the 970 supports. The first entry is the default.
pub const RMA_ORDERS: [RmaSettings; 6] = [
    RmaSettings::new(26, 0, 3), //  64 MiB
    RmaSettings::new(27, 1, 3), // 128 MiB
    RmaSettings::new(28, 1, 0), // 256 MiB
    RmaSettings::new(30, 0, 2), //   1 GiB
    RmaSettings::new(34, 0, 1), //  16 GiB
    RmaSettings::new(38, 0, 0), // 256 GiB
];

// One entry per order, and every encoding fits its register field.
const _: () = {
    let mut i = 0;
    while i < RMA_ORDERS.len() {
        assert!(RMA_ORDERS[i].rmlr0 <= 1, "RMLR0 is a single bit");
        assert!(RMA_ORDERS[i].rmlr12 <= 3, "RMLR1:2 is two bits");
        let mut j = i + 1;
        while j < RMA_ORDERS.len() {
            assert!(
                RMA_ORDERS[i].order != RMA_ORDERS[j].order,
                "duplicate RMA order"
            );
            j += 1;
        }
        i += 1;
    }
};

/// Error returned when a real-mode area cannot be expressed in `HID4`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RmaError {
    #[error("unsupported RMA order {order} (2^{order} bytes)")]
    UnsupportedOrder { order: u32 },
    #[error("RMA base {base} is not aligned to its 2^{order} byte size")]
    MisalignedBase { base: MachineAddress, order: u32 },
}

/// All supported real-mode area sizes, smallest first.
#[must_use]
pub const fn rma_orders() -> &'static [RmaSettings] {
    &RMA_ORDERS
}

/// Look up the encoding for an area of `2^order` bytes.
///
/// # Errors
/// [`RmaError::UnsupportedOrder`] if the core cannot confine real-mode
/// accesses to an area of that size.
pub fn find_rma(order: u32) -> Result<&'static RmaSettings, RmaError> {
    let found = RMA_ORDERS
        .iter()
        .find(|s| s.order == order)
        .ok_or(RmaError::UnsupportedOrder { order });
    debug!("RMA order {order}: {found:?}");
    found
}

/// Reverse lookup from a `(RMLR0, RMLR1:2)` pair, e.g. as read back from `HID4`.
#[must_use]
pub fn find_rma_by_encoding(rmlr0: u8, rmlr12: u8) -> Option<&'static RmaSettings> {
    RMA_ORDERS.iter().find(|s| s.encoding() == (rmlr0, rmlr12))
}

/// Default real-mode area size, as a page order.
#[must_use]
pub const fn default_rma_order_pages() -> u32 {
    RMA_ORDERS[0].order_pages()
}

/// Check a prospective guest's real-mode area before the domain is created.
///
/// `order_pages` is the area's page order, `base` the machine address the
/// area will start at. The area must be one of [`RMA_ORDERS`] and naturally
/// aligned.
///
/// # Errors
/// [`RmaError::UnsupportedOrder`] or [`RmaError::MisalignedBase`].
pub fn validate_rma(
    order_pages: u32,
    base: MachineAddress,
) -> Result<&'static RmaSettings, RmaError> {
    let settings = find_rma(order_pages.saturating_add(PAGE_SHIFT))?;
    if base.as_u64() & (settings.size_bytes() - 1) != 0 {
        return Err(RmaError::MisalignedBase {
            base,
            order: settings.order,
        });
    }
    Ok(settings)
}
