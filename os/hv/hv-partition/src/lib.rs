//! # PPC970 Logical Partitioning
//!
//! Derives the `HID4` configuration that lets a PPC970 core run isolated
//! guest partitions, and keeps it in place across context switches.
//!
//! ## Overview
//!
//! - [`rma`] lists the real-mode area sizes the core can enforce and their
//!   `RMLR` encodings.
//! - [`large_page`] reports the large page size the core can translate.
//! - [`partition`] packs a guest's partition ID and real-mode area into a
//!   [`Hid4`] image, once, when the guest's vCPU is created.
//! - [`lifecycle`] writes that image back whenever the vCPU is resumed.
//!
//! ```rust
//! # use hv_partition::*;
//! # use hv_memory_addresses::{PhysicalPage, PAGE_SHIFT};
//! struct Core(Hid4);
//!
//! impl PartitionControl for Core {
//!     fn read(&self) -> Hid4 { self.0 }
//!     fn write(&mut self, value: Hid4) { self.0 = value; }
//! }
//!
//! let mut core = Core(Hid4::new());
//! let partition = PartitionConfig::new(
//!     PartitionId::new(5),
//!     30 - PAGE_SHIFT,
//!     PhysicalPage::from_pfn(0x4_0000),
//! );
//!
//! let vcpu = VcpuSprs::new();
//! vcpu.init_vcpu(&core, &partition, &IdentityMapper);
//! vcpu.load_cpu_sprs(&mut core);
//!
//! assert_eq!(core.0.partition_id(), 5);
//! assert_eq!(core.0.rmor(), 0x10);
//! assert_eq!((core.0.rmlr0(), core.0.rmlr12()), (false, 2));
//! ```

#![cfg_attr(not(any(test, doctest)), no_std)]
#![allow(unsafe_code)]

pub mod large_page;
pub mod lifecycle;
pub mod partition;
pub mod rma;

pub use hv_registers::Hid4;
pub use large_page::{LARGE_PAGE_SHIFT, large_page_orders, supported_large_page_orders};
#[cfg(feature = "asm")]
pub use lifecycle::HardwareHid4;
pub use lifecycle::{PartitionControl, VcpuSprs};
pub use partition::{
    IdentityMapper, MachineMapper, PartitionConfig, PartitionId, build_partition_register,
    try_build_partition_register,
};
pub use rma::{
    RMA_ORDERS, RmaError, RmaSettings, default_rma_order_pages, find_rma, find_rma_by_encoding,
    rma_orders, validate_rma,
};
