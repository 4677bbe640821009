//! # Physical and Machine Address Types
//!
//! Strongly typed wrappers for the addresses a hypervisor juggles when it
//! sets up guest partitions on a 64-bit PowerPC core.
//!
//! | Wrapper | Meaning |
//! |----------|----------|
//! | [`PhysicalAddress`] / [`PhysicalPage<S>`] | Addresses as handed out by the domain builder. |
//! | [`MachineAddress`] / [`MachinePage<S>`] | Real hardware addresses, e.g. what `HID4[RMOR]` holds. |
//!
//! Both are built from the principal [`MemoryAddress`] / [`MemoryPage<S>`]
//! types and keep the two address spaces apart at compile time.
//!
//! ## Page Sizes
//!
//! - [`Size4K`] — 4 KiB base pages ([`PAGE_SHIFT`])
//! - [`Size16M`] — 16 MiB large pages
//! - [`Size64M`] — 64 MiB real-mode offset granule
//!
//! ```rust
//! # use hv_memory_addresses::*;
//! let pa = PhysicalAddress::new(0x0000_0000_0400_1234);
//! let page = pa.page::<Size4K>();
//! assert_eq!(page.base().as_u64(), 0x0400_1000);
//! assert_eq!(page.pfn(), 0x4001);
//!
//! let ma = MachineAddress::new(0x0000_0001_0000_0000);
//! assert!(ma.is_aligned::<Size64M>());
//! assert_eq!(ma.page::<Size64M>().mfn(), 0x40);
//! ```

#![cfg_attr(not(any(test, doctest)), no_std)]

mod machine;
mod memory_address;
mod page_size;
mod physical;

pub use machine::{MachineAddress, MachinePage};
pub use memory_address::{MemoryAddress, MemoryPage};
pub use page_size::{PageSize, Size4K, Size16M, Size64M};
pub use physical::{PhysicalAddress, PhysicalPage};

/// log2 of the base page size the hypervisor manages memory in.
pub const PAGE_SHIFT: u32 = Size4K::SHIFT;

/// Base page size in bytes.
pub const PAGE_SIZE: u64 = Size4K::SIZE;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_size_constants() {
        assert_eq!(Size4K::SIZE, 4096);
        assert_eq!(Size16M::SIZE, 16 * 1024 * 1024);
        assert_eq!(Size64M::SIZE, 64 * 1024 * 1024);
        assert_eq!(PAGE_SHIFT, 12);
        assert_eq!(PAGE_SIZE, 4096);
    }

    #[test]
    fn physical_page_frame_numbers() {
        let p = PhysicalPage::<Size4K>::from_pfn(0x1_2345);
        assert_eq!(p.base().as_u64(), 0x1234_5000);
        assert_eq!(p.pfn(), 0x1_2345);

        let q = PhysicalAddress::new(0x1234_5FFF).page::<Size4K>();
        assert_eq!(p, q);
    }

    #[test]
    fn machine_page_granules() {
        let ma = MachineAddress::new(0x0C00_0000);
        assert!(ma.is_aligned::<Size64M>());
        assert_eq!(ma.page::<Size64M>().mfn(), 3);

        let off = MachineAddress::new(0x0C00_1000);
        assert!(!off.is_aligned::<Size64M>());
        assert_eq!(off.page::<Size64M>().base(), ma);
        assert_eq!(MachinePage::<Size4K>::from_mfn(0xC001).base(), off);
    }

    #[test]
    fn display_formats() {
        let pa = PhysicalAddress::new(0x4000_0000);
        assert_eq!(format!("{pa}"), "0x0000000040000000");
        assert_eq!(format!("{pa:?}"), "PA(0x0000000040000000)");
        assert_eq!(
            format!("{:?}", MachinePage::<Size16M>::from_mfn(1)),
            "MachinePage<16M>(0x0000000001000000)"
        );
    }
}
