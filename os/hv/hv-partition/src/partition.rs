//! # Per-Partition `HID4` Image
//!
//! Turns a guest's partition ID and real-mode area into the `HID4` value the
//! core must hold while that guest runs.

use crate::rma::{RmaError, find_rma};
use core::fmt;
use hv_memory_addresses::{MachineAddress, MachinePage, PAGE_SHIFT, PhysicalPage, Size4K};
use hv_registers::Hid4;
use log::info;

/// Logical partition identifier as the hardware sees it.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PartitionId(u16);

impl PartitionId {
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Whether the ID survives the trip through `HID4` unchanged.
    #[must_use]
    pub const fn is_representable(self) -> bool {
        self.0 >> Hid4::LPID_BITS == 0
    }
}

impl fmt::Display for PartitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "d{}", self.0)
    }
}

/// What guest creation hands over about a partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartitionConfig {
    pub id: PartitionId,
    /// Real-mode area size as a page order.
    pub rma_order: u32,
    /// First page of the real-mode area.
    pub rma_page: PhysicalPage<Size4K>,
}

impl PartitionConfig {
    #[must_use]
    pub const fn new(id: PartitionId, rma_order: u32, rma_page: PhysicalPage<Size4K>) -> Self {
        Self {
            id,
            rma_order,
            rma_page,
        }
    }

    /// Real-mode area size as log2 of its byte size.
    #[must_use]
    pub const fn rma_order_bytes(&self) -> u32 {
        self.rma_order.saturating_add(PAGE_SHIFT)
    }
}

/// Physical-to-machine translation for base pages.
pub trait MachineMapper {
    fn machine_page(&self, page: PhysicalPage<Size4K>) -> MachinePage<Size4K>;

    fn machine_address(&self, page: PhysicalPage<Size4K>) -> MachineAddress {
        self.machine_page(page).base()
    }
}

/// Physical frames are machine frames.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityMapper;

impl MachineMapper for IdentityMapper {
    fn machine_page(&self, page: PhysicalPage<Size4K>) -> MachinePage<Size4K> {
        MachinePage::from_mfn(page.pfn())
    }
}

/// Build the `HID4` image for `partition`, or report an unsupported RMA size.
///
/// The RMA size is the only input checked here. The partition ID is packed
/// as its low six bits and the base as whole 64 MiB granules; guest creation
/// owns both ranges (see [`PartitionId::is_representable`] and
/// [`validate_rma`](crate::rma::validate_rma)).
///
/// Fields not owned by partitioning (prefetch, cache-inhibit and the
/// implementation bits) are taken from `template`, normally the value the
/// core currently holds.
///
/// # Errors
/// [`RmaError::UnsupportedOrder`] if the configured RMA size is not in the
/// [table](crate::rma::RMA_ORDERS).
pub fn try_build_partition_register<M>(
    template: Hid4,
    partition: &PartitionConfig,
    mapper: &M,
) -> Result<Hid4, RmaError>
where
    M: MachineMapper + ?Sized,
{
    let rma = find_rma(partition.rma_order_bytes())?;
    let rma_base = mapper.machine_address(partition.rma_page);

    Ok(template
        // Interrupts set MSR[HV]=1, i.e. go to the hypervisor.
        .with_lpes0(false)
        // Guest real-mode accesses go through the RMA.
        .with_lpes1(true)
        .with_rma_base(rma_base)
        .with_partition_id(partition.id.raw())
        .with_rmlr(rma.rmlr0 != 0, rma.rmlr12))
}

/// Build the `HID4` image for `partition`.
///
/// # Panics
/// If the partition's RMA size is not supported. Guest creation validates
/// the size up front (see [`validate_rma`](crate::rma::validate_rma)); getting
/// here with a bad size is a bug and no other size may be substituted.
pub fn build_partition_register<M>(template: Hid4, partition: &PartitionConfig, mapper: &M) -> Hid4
where
    M: MachineMapper + ?Sized,
{
    match try_build_partition_register(template, partition, mapper) {
        Ok(hid4) => {
            info!(
                "{}: HID4 {:#018x} (RMA {} at {}, lpid {})",
                partition.id,
                hid4.into_bits(),
                1u64 << partition.rma_order_bytes(),
                hid4.rma_base(),
                hid4.partition_id()
            );
            hid4
        }
        Err(e) => panic!("{}: cannot build HID4: {e}", partition.id),
    }
}
