//! # Per-vCPU SPR State Across Context Switches
//!
//! `HID4` is core-local and every partition that runs on a core overwrites
//! it, so the image must be written back each time a vCPU is resumed. The
//! image itself never changes after [`VcpuSprs::init_vcpu`]: it is published
//! once by the creating core and read by whichever core runs the vCPU.

use crate::partition::{MachineMapper, PartitionConfig, build_partition_register};
use hv_registers::Hid4;
use hv_sync::SyncOnceCell;
use log::trace;

/// Access to the current core's `HID4`.
///
/// The context-switch path holds one of these per core; tests substitute a
/// plain value.
pub trait PartitionControl {
    fn read(&self) -> Hid4;
    fn write(&mut self, value: Hid4);
}

/// The real register, through `mfspr`/`mtspr`.
#[cfg(feature = "asm")]
#[derive(Debug)]
pub struct HardwareHid4 {
    _private: (),
}

#[cfg(feature = "asm")]
impl HardwareHid4 {
    /// # Safety
    /// Must only be used in hypervisor state on the core it was created on.
    #[must_use]
    pub const unsafe fn new() -> Self {
        Self { _private: () }
    }
}

#[cfg(feature = "asm")]
impl PartitionControl for HardwareHid4 {
    fn read(&self) -> Hid4 {
        use hv_registers::LoadRegisterUnsafe;
        // SAFETY: hypervisor state is guaranteed by construction.
        unsafe { Hid4::load_unsafe() }
    }

    fn write(&mut self, value: Hid4) {
        use hv_registers::StoreRegisterUnsafe;
        // SAFETY: hypervisor state is guaranteed by construction.
        unsafe { value.store_unsafe() }
    }
}

/// Partitioning SPRs of one vCPU.
#[derive(Debug, Default)]
pub struct VcpuSprs {
    hid4: SyncOnceCell<Hid4>,
}

impl VcpuSprs {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            hid4: SyncOnceCell::new(),
        }
    }

    /// Compute and fix the vCPU's `HID4` image.
    ///
    /// The current register value of `regs` supplies the bits partitioning
    /// does not own. Nothing is written to the register.
    ///
    /// # Panics
    /// If the partition's RMA size is unsupported, or if the image was
    /// already fixed.
    pub fn init_vcpu<C, M>(&self, regs: &C, partition: &PartitionConfig, mapper: &M) -> Hid4
    where
        C: PartitionControl + ?Sized,
        M: MachineMapper + ?Sized,
    {
        let hid4 = build_partition_register(regs.read(), partition, mapper);
        match self.hid4.set(hid4) {
            Ok(&fixed) => fixed,
            Err(_) => panic!("{}: HID4 image is already fixed", partition.id),
        }
    }

    /// The fixed image, if [`init_vcpu`](Self::init_vcpu) ran.
    #[must_use]
    pub fn hid4(&self) -> Option<Hid4> {
        self.hid4.get().copied()
    }

    /// Capture SPR state on deactivation.
    ///
    /// `HID4` is set once per domain at creation and never changes, so
    /// there is nothing to capture.
    #[allow(clippy::unused_self)]
    pub const fn save_cpu_sprs(&self) {}

    /// Restore SPR state on activation. Must run before the vCPU executes
    /// any instruction on this core.
    ///
    /// # Panics
    /// If the image was never computed.
    pub fn load_cpu_sprs<C>(&self, regs: &mut C)
    where
        C: PartitionControl + ?Sized,
    {
        let Some(&hid4) = self.hid4.get() else {
            panic!("loading HID4 of a vCPU that was never initialized");
        };
        trace!("load {} <- {:#018x}", Hid4::SPR, hid4.into_bits());
        regs.write(hid4);
    }
}
