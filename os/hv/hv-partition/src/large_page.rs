use hv_memory_addresses::{PAGE_SHIFT, PageSize, Size16M};

/// log2 of the large page size in bytes (16 MiB).
pub const LARGE_PAGE_SHIFT: u32 = Size16M::SHIFT;

/// Large page orders the core can translate, in base-page units, capped at
/// `max` entries.
///
/// The 970 supports a single large page size, so this yields at most one
/// order and nothing at all for `max == 0`.
pub fn supported_large_page_orders(max: usize) -> impl Iterator<Item = u32> {
    core::iter::once(LARGE_PAGE_SHIFT - PAGE_SHIFT).take(max)
}

/// Fill `sizes` with the supported large page orders and return how many
/// were written. The slice length is the caller's cap.
pub fn large_page_orders(sizes: &mut [u32]) -> usize {
    let max = sizes.len();
    let mut written = 0;
    for (slot, order) in sizes.iter_mut().zip(supported_large_page_orders(max)) {
        *slot = order;
        written += 1;
    }
    written
}
