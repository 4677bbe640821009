use crate::spr::Spr;
#[cfg(feature = "asm")]
use crate::{LoadRegisterUnsafe, StoreRegisterUnsafe};
use bitfield_struct::bitfield;
use hv_memory_addresses::{MachineAddress, PageSize, Size64M};

/// `HID4` — Hardware Implementation Register 4 (PPC970, SPR 1012).
///
/// On the 970 this register plays the role the architected `LPCR`/`LPIDR`/`RMOR`
/// trio plays on later cores: it selects the active logical partition, where
/// its real-mode area lives and how large that area is.
///
/// The manual numbers bits big-endian (bit 0 is the MSB); field comments give
/// the manual's numbering, the fields themselves are declared LSB first.
///
/// ```text
///  0      1:2     3:6      7:22   23..27   57     58     62:63
/// LPES0 RMLR1:2 LPID2:5  RMOR    ...    LPES1  RMLR0  LPID0:1
/// ```
#[bitfield(u64, order = Lsb)]
#[derive(Eq, PartialEq)]
pub struct Hid4 {
    /// Bits 62–63 — `LPID[0:1]`: low two bits of the partition ID.
    #[bits(2)]
    pub lpid01: u8,

    /// Bits 59–61 — Reserved.
    #[bits(3)]
    pub reserved0: u8,

    /// Bit 58 — `RMLR[0]`: real-mode limit selector, top bit.
    pub rmlr0: bool,

    /// Bit 57 — `LPES[1]`: real-mode accesses are translated through the RMA.
    pub lpes1: bool,

    /// Bits 28–56 — Implementation specific; preserved as read.
    #[bits(29)]
    pub implementation: u32,

    /// Bit 27 — `EN_SP_ITW`: enable speculative icache tablewalk.
    pub en_sp_itw: bool,

    /// Bit 26 — `RES_PREF`: reset data prefetch mechanism.
    pub res_pref: bool,

    /// Bit 25 — `DIS_PREF`: disable data prefetch.
    pub dis_pref: bool,

    /// Bit 24 — `FORCE_AI`: force alignment interrupt.
    pub force_ai: bool,

    /// Bit 23 — `RM_CI`: hypervisor real-mode accesses are cache inhibited.
    pub rm_ci: bool,

    /// Bits 7–22 — `RMOR`: real-mode offset, in 64 MiB units.
    ///
    /// `rma_base_machine = rmor << 26`.
    #[bits(16)]
    pub rmor: u16,

    /// Bits 3–6 — `LPID[2:5]`: upper four bits of the partition ID.
    #[bits(4)]
    pub lpid25: u8,

    /// Bits 1–2 — `RMLR[1:2]`: real-mode limit selector, low bits.
    #[bits(2)]
    pub rmlr12: u8,

    /// Bit 0 — `LPES[0]`: when clear, interrupts set `MSR[HV]=1` and are
    /// delivered to the hypervisor.
    pub lpes0: bool,
}

impl Hid4 {
    /// SPR number of `HID4`.
    pub const HID4: u16 = 1012;

    /// The SPR.
    pub const SPR: Spr = Spr::new(Self::HID4);

    /// Width of the partition ID the register can hold.
    pub const LPID_BITS: u32 = 6;

    /// Set the partition ID, splitting it across `LPID[0:1]` and `LPID[2:5]`.
    ///
    /// Only the low [`LPID_BITS`](Self::LPID_BITS) bits are representable;
    /// anything above is dropped.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn with_partition_id(self, id: u16) -> Self {
        self.with_lpid01((id & 3) as u8)
            .with_lpid25(((id >> 2) & 0xf) as u8)
    }

    /// Reassemble the partition ID from its two fields.
    #[must_use]
    pub fn partition_id(&self) -> u16 {
        (u16::from(self.lpid25()) << 2) | u16::from(self.lpid01())
    }

    /// Set the real-mode offset from the machine address of the RMA base.
    ///
    /// The base is taken in 64 MiB units: offset bits below the granule and
    /// granules beyond the 16-bit field are dropped.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn with_rma_base(self, base: MachineAddress) -> Self {
        let granule = (base.as_u64() >> Size64M::SHIFT) & 0xFFFF;
        self.with_rmor(granule as u16)
    }

    /// Machine address of the real-mode area base.
    #[must_use]
    pub fn rma_base(&self) -> MachineAddress {
        MachineAddress::new(u64::from(self.rmor()) << Size64M::SHIFT)
    }

    /// Set both real-mode limit selector fields.
    #[must_use]
    pub const fn with_rmlr(self, rmlr0: bool, rmlr12: u8) -> Self {
        self.with_rmlr0(rmlr0).with_rmlr12(rmlr12)
    }
}

#[cfg(feature = "asm")]
unsafe extern "C" {
    /// `mfspr r3, HID4`.
    fn ppc970_mfhid4() -> u64;

    /// `sync; mtspr HID4, r3; isync`, the sequence the 970 requires.
    fn ppc970_mthid4(value: u64);
}

#[cfg(feature = "asm")]
impl LoadRegisterUnsafe for Hid4 {
    #[inline]
    unsafe fn load_unsafe() -> Self {
        Self::from_bits(unsafe { ppc970_mfhid4() })
    }
}

#[cfg(feature = "asm")]
impl StoreRegisterUnsafe for Hid4 {
    #[inline]
    unsafe fn store_unsafe(self) {
        unsafe { ppc970_mthid4(self.into_bits()) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_positions_match_manual_numbering() {
        // Manual bit n is 1 << (63 - n).
        assert_eq!(Hid4::new().with_lpes0(true).into_bits(), 1 << 63);
        assert_eq!(Hid4::new().with_rmlr12(0b11).into_bits(), 0b11 << 61);
        assert_eq!(Hid4::new().with_lpid25(0xf).into_bits(), 0xf << 57);
        assert_eq!(Hid4::new().with_rmor(0xFFFF).into_bits(), 0xFFFF << 41);
        assert_eq!(Hid4::new().with_rm_ci(true).into_bits(), 1 << (63 - 23));
        assert_eq!(Hid4::new().with_en_sp_itw(true).into_bits(), 1 << (63 - 27));
        assert_eq!(Hid4::new().with_lpes1(true).into_bits(), 1 << (63 - 57));
        assert_eq!(Hid4::new().with_rmlr0(true).into_bits(), 1 << (63 - 58));
        assert_eq!(Hid4::new().with_lpid01(0b11).into_bits(), 0b11);
    }

    #[test]
    fn partition_id_is_split() {
        let h = Hid4::new().with_partition_id(0b10_1101);
        assert_eq!(h.lpid01(), 0b01);
        assert_eq!(h.lpid25(), 0b1011);
        assert_eq!(h.partition_id(), 0b10_1101);
    }

    #[test]
    fn partition_id_drops_bits_above_six() {
        let h = Hid4::new().with_partition_id(0x45);
        assert_eq!(h.partition_id(), 0x05);
    }

    #[test]
    fn rma_base_in_64m_units() {
        let base = MachineAddress::new(0x1_0000_0000);
        let h = Hid4::new().with_rma_base(base);
        assert_eq!(h.rmor(), 0x40);
        assert_eq!(h.rma_base(), base);
    }

    #[test]
    fn rma_base_drops_offset_within_granule() {
        // 0x4001 << 12 is 64 MiB + 4 KiB.
        let h = Hid4::new().with_rma_base(MachineAddress::new(0x4001 << 12));
        assert_eq!(h.rmor(), 1);
        assert_eq!(h.rma_base(), MachineAddress::new(0x0400_0000));
    }

    #[test]
    fn setters_leave_other_fields_alone() {
        let template = Hid4::from_bits(0x0000_0000_1234_5678 & !(0b11 | 1 << 5 | 1 << 6));
        let h = template.with_partition_id(0x3f).with_rmlr(true, 2);
        assert_eq!(h.implementation(), template.implementation());
        assert_eq!(h.reserved0(), template.reserved0());
        assert_eq!(h.rmor(), template.rmor());
    }

    #[test]
    fn hid4_spr_number() {
        assert_eq!(Hid4::SPR.raw(), 1012);
        assert_eq!(format!("{}", Hid4::SPR), "SPR 1012 (0x3F4)");
    }
}
