use hv_memory_addresses::{MachinePage, PAGE_SHIFT, PhysicalPage, Size4K};
use hv_partition::{
    Hid4, IdentityMapper, MachineMapper, PartitionConfig, PartitionId, RMA_ORDERS, RmaError,
    build_partition_register, try_build_partition_register,
};

/// Places guest frame `n` at machine frame `n + offset`.
struct OffsetMapper(u64);

impl MachineMapper for OffsetMapper {
    fn machine_page(&self, page: PhysicalPage<Size4K>) -> MachinePage<Size4K> {
        MachinePage::from_mfn(page.pfn() + self.0)
    }
}

fn partition(id: u16, order: u32, pfn: u64) -> PartitionConfig {
    PartitionConfig::new(
        PartitionId::new(id),
        order - PAGE_SHIFT,
        PhysicalPage::from_pfn(pfn),
    )
}

#[test]
fn partition_5_with_1g_rma() {
    // 1 GiB RMA at machine address 3 GiB.
    let p = partition(5, 30, 0xC_0000);
    let hid4 = build_partition_register(Hid4::new(), &p, &IdentityMapper);

    assert_eq!(hid4.lpid01(), 0b01);
    assert_eq!(hid4.lpid25(), 0b0001);
    assert_eq!(hid4.partition_id(), 5);
    assert_eq!(u64::from(hid4.rmor()), 0xC000_0000 >> 26);
    assert_eq!((u8::from(hid4.rmlr0()), hid4.rmlr12()), (0, 2));
    assert!(!hid4.lpes0());
    assert!(hid4.lpes1());
}

#[test]
fn every_supported_size_is_encoded() {
    for (i, rma) in RMA_ORDERS.iter().enumerate() {
        let pfn = (1u64 << rma.order) >> PAGE_SHIFT;
        let p = partition(u16::try_from(i).unwrap(), rma.order, pfn);
        let hid4 = build_partition_register(Hid4::new(), &p, &IdentityMapper);

        assert_eq!(u8::from(hid4.rmlr0()), rma.rmlr0, "order {}", rma.order);
        assert_eq!(hid4.rmlr12(), rma.rmlr12, "order {}", rma.order);
        assert_eq!(hid4.rma_base().as_u64(), 1 << rma.order);
    }
}

#[test]
fn rma_base_goes_through_machine_translation() {
    // Guest frame 0, machine frame 0x2_0000 (512 MiB).
    let p = partition(1, 26, 0);
    let hid4 = build_partition_register(Hid4::new(), &p, &OffsetMapper(0x2_0000));
    assert_eq!(hid4.rma_base().as_u64(), 0x2000_0000);
    assert_eq!(hid4.rmor(), 8);
}

#[test]
fn largest_partition_id() {
    let p = partition(63, 26, 0);
    let hid4 = build_partition_register(Hid4::new(), &p, &IdentityMapper);
    assert_eq!(hid4.lpid01(), 0b11);
    assert_eq!(hid4.lpid25(), 0b1111);
}

#[test]
fn unaligned_base_is_shifted_not_rejected() {
    let p = partition(5, 30, 0x4001);
    let hid4 = build_partition_register(Hid4::new(), &p, &IdentityMapper);
    assert_eq!(hid4.rmor(), 1);
    assert_eq!((u8::from(hid4.rmlr0()), hid4.rmlr12()), (0, 2));
}

#[test]
fn partition_id_keeps_low_six_bits() {
    let p = partition(69, 30, 0x4_0000);
    let hid4 = build_partition_register(Hid4::new(), &p, &IdentityMapper);
    assert_eq!(hid4.partition_id(), 5);
    assert_eq!(hid4.lpid01(), 0b01);
    assert_eq!(hid4.lpid25(), 0b0001);
}

#[test]
fn template_bits_are_preserved() {
    let template = Hid4::new()
        .with_lpes0(true)
        .with_rm_ci(true)
        .with_dis_pref(true)
        .with_implementation(0x0ABC_DEF0)
        .with_partition_id(0x2a)
        .with_rmor(0xFFFF);

    let p = partition(3, 27, 0x4_0000);
    let hid4 = build_partition_register(template, &p, &IdentityMapper);

    assert!(hid4.rm_ci());
    assert!(hid4.dis_pref());
    assert!(!hid4.force_ai());
    assert_eq!(hid4.implementation(), 0x0ABC_DEF0);

    // Partition-owned fields are all overwritten.
    assert!(!hid4.lpes0());
    assert!(hid4.lpes1());
    assert_eq!(hid4.partition_id(), 3);
    assert_eq!(hid4.rmor(), 0x10);
    assert_eq!((hid4.rmlr0(), hid4.rmlr12()), (true, 3));
}

#[test]
fn build_is_deterministic() {
    let p = partition(9, 28, 0x10_0000);
    let a = build_partition_register(Hid4::new(), &p, &IdentityMapper);
    let b = build_partition_register(Hid4::new(), &p, &IdentityMapper);
    assert_eq!(a, b);
}

#[test]
fn unsupported_rma_is_reported() {
    let p = partition(2, 29, 0);
    assert_eq!(
        try_build_partition_register(Hid4::new(), &p, &IdentityMapper),
        Err(RmaError::UnsupportedOrder { order: 29 })
    );
}

#[test]
#[should_panic(expected = "unsupported RMA order 29")]
fn unsupported_rma_is_fatal() {
    let p = partition(2, 29, 0);
    let _ = build_partition_register(Hid4::new(), &p, &IdentityMapper);
}

#[test]
#[should_panic(expected = "unsupported RMA order 20")]
fn rma_below_table_is_fatal() {
    let p = partition(2, 20, 0);
    let _ = build_partition_register(Hid4::new(), &p, &IdentityMapper);
}
