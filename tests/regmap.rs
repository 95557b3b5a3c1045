//! Drives the handle against a heap-backed register file and checks that
//! every operation lands on the documented offset with the documented value.

use core::ptr::NonNull;

use dwc_ufshc::registers::consts::*;
use dwc_ufshc::*;

/// A heap-backed stand-in for the controller's MMIO region.
///
/// Plain memory keeps whatever the handle writes, so write-1-to-clear
/// registers read back as the written value; the tests use that to observe
/// exactly what reached each offset and, for IS, as the completion signal
/// the hardware would raise.
struct FakeController {
    base: *mut u32,
    hc: Ufshc,
}

impl FakeController {
    fn new(variant: UfshcVariant) -> Self {
        let file: &'static mut [u32] =
            Box::leak(vec![0u32; REG_SPACE_SIZE / 4].into_boxed_slice());
        for entry in RESET_TABLE {
            file[entry.offset / 4] = entry.value;
        }
        let base = file.as_mut_ptr();
        let hc = unsafe {
            Ufshc::new(
                NonNull::new(base as *mut u8).unwrap(),
                UfshcConfig::new(variant),
            )
        };
        Self { base, hc }
    }

    fn read(&self, offset: usize) -> u32 {
        unsafe { self.base.add(offset / 4).read_volatile() }
    }

    fn write(&self, offset: usize, value: u32) {
        unsafe { self.base.add(offset / 4).write_volatile(value) }
    }
}

#[test]
fn reset_state_parses_into_the_advertised_geometry() {
    let fake = FakeController::new(UfshcVariant::Dwc40);

    let ver = fake.hc.version();
    assert_eq!((ver.major, ver.minor, ver.suffix), (4, 0, 0));

    let caps = fake.hc.capabilities();
    assert_eq!(caps.nutrs, 32);
    assert_eq!(caps.nutmrs, 8);
    assert!(caps.crypto);
    assert!(caps.mcq);
    assert!(caps.addressing_64);

    let mcq = fake.hc.mcq_capabilities();
    assert_eq!(mcq.max_queues, 16);
    assert_eq!(mcq.qcfg_offset, fake.hc.config().mcq_queue_base);

    let crypto = fake.hc.crypto_capabilities().unwrap();
    assert_eq!(crypto.config_slots, 64);
    assert_eq!(crypto.config_offset, fake.hc.config().crypto_cfg_base);

    assert_eq!(fake.hc.manufacturer_id(), 0x0436);
    assert_eq!(fake.hc.bus_throttle().reads, 0x3F);

    let raw_ver = unsafe { fake.hc.registers().offset_ptr::<u32>(REG_VER).read_volatile() };
    assert_eq!(raw_ver, 0x0400);
}

#[test]
fn enable_handshake_completes_against_backing_memory() {
    let fake = FakeController::new(UfshcVariant::Dwc40);
    assert!(!fake.hc.is_enabled());
    fake.hc.enable().unwrap();
    assert!(fake.hc.is_enabled());
    assert_eq!(fake.read(REG_HCE) & 0x1, 1);
    fake.hc.disable().unwrap();
    assert!(!fake.hc.is_enabled());

    fake.hc.set_crypto_general_enable(true).unwrap();
    assert_eq!(fake.read(REG_HCE), 0x2);
}

#[test]
fn interrupt_registers_receive_mask_writes() {
    let fake = FakeController::new(UfshcVariant::Dwc40);
    fake.hc.set_interrupt_enable(INTERRUPT_MASK_ALL);
    assert_eq!(fake.read(REG_IE), INTERRUPT_MASK_ALL);
    assert_eq!(fake.hc.interrupt_enable(), INTERRUPT_MASK_ALL);

    fake.hc.clear_interrupts(0x400);
    assert_eq!(fake.read(REG_IS), 0x400);

    fake.write(REG_UECDL, 0x8000_0002);
    let errors = fake.hc.uic_errors();
    assert_eq!(errors.data_link, 0x8000_0002);
    assert_eq!(errors.phy_adapter, 0);
}

#[test]
fn transfer_list_registers_are_programmed_in_place() {
    let fake = FakeController::new(UfshcVariant::Dwc40);

    fake.hc.set_utrl_base(0x0000_0008_9ABC_0400).unwrap();
    assert_eq!(fake.read(REG_UTRLBA), 0x9ABC_0400);
    assert_eq!(fake.read(REG_UTRLBAU), 0x8);
    assert_eq!(
        fake.hc.set_utrl_base(0x1001),
        Err(UfshcError::InvalidArgument)
    );

    fake.hc.set_utrl_run(true);
    assert_eq!(fake.read(REG_UTRLRSR), 1);
    fake.hc.set_utrl_run(false);
    assert_eq!(fake.read(REG_UTRLRSR), 0);

    fake.hc.ring_utrl_doorbell(5).unwrap();
    assert_eq!(fake.read(REG_UTRLDBR), 1 << 5);
    assert_eq!(
        fake.hc.ring_utrl_doorbell(32),
        Err(UfshcError::InvalidArgument)
    );

    fake.hc.clear_utrl_slot(3).unwrap();
    assert_eq!(fake.read(REG_UTRLCLR), !(1 << 3));

    fake.hc.ack_utrl_completions(0xF0);
    assert_eq!(fake.read(REG_UTRLCNR), 0xF0);
}

#[test]
fn task_management_list_registers_are_programmed_in_place() {
    let fake = FakeController::new(UfshcVariant::Dwc40);

    fake.hc.set_utmrl_base(0x0000_0001_0000_0800).unwrap();
    assert_eq!(fake.read(REG_UTMRLBA), 0x0000_0800);
    assert_eq!(fake.read(REG_UTMRLBAU), 0x1);

    fake.hc.ring_utmrl_doorbell(7).unwrap();
    assert_eq!(fake.read(REG_UTMRLDBR), 1 << 7);
    assert_eq!(
        fake.hc.ring_utmrl_doorbell(8),
        Err(UfshcError::InvalidArgument)
    );

    fake.hc.clear_utmrl_slot(2).unwrap();
    assert_eq!(fake.read(REG_UTMRLCLR), !(1 << 2));

    fake.hc.set_utmrl_run(true);
    assert_eq!(fake.read(REG_UTMRLRSR), 1);
}

#[test]
fn interrupt_aggregation_packs_the_documented_fields() {
    let fake = FakeController::new(UfshcVariant::Dwc40);

    fake.hc.configure_interrupt_aggregation(0x1F, 0x20).unwrap();
    assert_eq!(fake.read(REG_UTRIACR), 0x8100_1F20);
    assert_eq!(
        fake.hc.configure_interrupt_aggregation(0x20, 0),
        Err(UfshcError::InvalidArgument)
    );

    fake.hc.disable_interrupt_aggregation();
    assert_eq!(fake.read(REG_UTRIACR), 0);

    fake.hc.reset_interrupt_aggregation();
    assert_eq!(fake.read(REG_UTRIACR), 1 << 16);
}

#[test]
fn uic_send_walks_the_command_window() {
    let fake = FakeController::new(UfshcVariant::Dwc40);

    // Nothing ready yet.
    assert_eq!(
        fake.hc.dme_get(0x1571, 0),
        Err(UfshcError::NotReady)
    );

    // Raise DP/UTRLRDY/UTMRLRDY/UCRDY as the link bring-up would.
    fake.write(REG_HCS, 0xF);

    let value = fake.hc.dme_get(0x1571, 0).unwrap();
    assert_eq!(value, 0);
    assert_eq!(fake.read(REG_UICCMD), UicOp::DmeGet as u32);
    assert_eq!(fake.read(REG_UCMDARG1), 0x1571_0000);

    fake.hc.dme_set(0x15A8, 4, 0xDEAD_BEEF).unwrap();
    assert_eq!(fake.read(REG_UICCMD), UicOp::DmeSet as u32);
    assert_eq!(fake.read(REG_UCMDARG1), 0x15A8_0004);
    assert_eq!(fake.read(REG_UCMDARG3), 0xDEAD_BEEF);

    // An ARG2 with a nonzero result code comes back as a failure.
    let err = fake
        .hc
        .uic_send(UicOp::DmeLinkStartup, 0, UicResultCode::Busy as u32, 0);
    assert_eq!(err, Err(UfshcError::UicFailure(0x09)));
}

#[test]
fn keyslot_programming_writes_the_whole_slot() {
    let fake = FakeController::new(UfshcVariant::Dwc40);
    let slot = 2;
    let slot_base = fake.hc.config().crypto_cfg_base + slot * CRYPTO_CFG_SLOT_BYTES;

    let mut key = [0u32; 16];
    for (i, word) in key.iter_mut().enumerate() {
        *word = 0x0101_0101 * (i as u32 + 1);
    }
    fake.hc
        .program_keyslot(
            slot,
            &KeyConfig {
                key,
                data_unit_size: 0x08,
                capability_index: 1,
            },
        )
        .unwrap();

    for (i, word) in key.iter().enumerate() {
        assert_eq!(fake.read(slot_base + i * 4), *word);
    }
    let control = fake.read(slot_base + CRYPTOCFG_CONTROL_DWORD * 4);
    assert_eq!(control, 0x8000_0108);
    // Reserved tail is scrubbed.
    assert_eq!(fake.read(slot_base + 0x44), 0);
    assert_eq!(fake.read(slot_base + 0x7C), 0);

    fake.hc.disable_keyslot(slot).unwrap();
    assert_eq!(fake.read(slot_base + CRYPTOCFG_CONTROL_DWORD * 4), 0);
    assert_eq!(fake.read(slot_base), 0);

    let bad_cfg = KeyConfig {
        key,
        data_unit_size: 0x01,
        capability_index: 4,
    };
    assert_eq!(
        fake.hc.program_keyslot(slot, &bad_cfg),
        Err(UfshcError::InvalidArgument)
    );
    assert_eq!(
        fake.hc.disable_keyslot(64),
        Err(UfshcError::InvalidArgument)
    );
}

#[test]
fn crypto_capability_entries_parse_from_the_array() {
    let fake = FakeController::new(UfshcVariant::Dwc40);
    fake.write(REG_CRYPTOCAP + 4, 0x0003_0F00);

    let cap = fake.hc.crypto_capability(0).unwrap();
    assert_eq!(cap.algorithm, CryptoAlg::AesXts);
    assert_eq!(cap.key_size, CryptoKeySize::Bits128);

    let cap = fake.hc.crypto_capability(1).unwrap();
    assert_eq!(cap.key_size, CryptoKeySize::Bits256);

    assert_eq!(
        fake.hc.crypto_capability(4),
        Err(UfshcError::InvalidArgument)
    );
}

#[test]
fn queue_pair_configuration_lands_in_the_indexed_set() {
    let fake = FakeController::new(UfshcVariant::Dwc40);
    let index = 3;
    let set_base = fake.hc.config().mcq_queue_base + index * MCQ_QUEUE_STRIDE;

    fake.hc
        .configure_sq(index, 0x0000_0000_8000_0000, 256, 3)
        .unwrap();
    assert_eq!(fake.read(set_base + QREG_SQLBA), 0x8000_0000);
    assert_eq!(fake.read(set_base + QREG_SQUBA), 0);
    assert_eq!(fake.read(set_base + QREG_SQATTR), 0x0003_00FF);

    fake.hc.enable_sq(index).unwrap();
    assert_eq!(fake.read(set_base + QREG_SQATTR), 0x8003_00FF);
    fake.hc.disable_sq(index).unwrap();
    assert_eq!(fake.read(set_base + QREG_SQATTR), 0x0003_00FF);

    fake.hc
        .configure_cq(index, 0x0000_0000_8001_0000, 256)
        .unwrap();
    assert_eq!(fake.read(set_base + QREG_CQLBA), 0x8001_0000);
    assert_eq!(fake.read(set_base + QREG_CQATTR), 0x0000_00FF);
    fake.hc.enable_cq(index).unwrap();
    assert_eq!(fake.read(set_base + QREG_CQATTR), 0x8000_00FF);

    fake.hc.write_sq_tail(index, 0x12).unwrap();
    assert_eq!(fake.read(set_base + QREG_SQDB), 0x12);
    fake.hc.write_cq_head(index, 0x34).unwrap();
    assert_eq!(fake.read(set_base + QREG_CQDB), 0x34);

    fake.write(set_base + QREG_SQHP, 0x0007);
    assert_eq!(fake.hc.sq_head(index).unwrap(), 7);
    fake.write(set_base + QREG_CQTP, 0x0009);
    assert_eq!(fake.hc.cq_tail(index).unwrap(), 9);

    fake.hc.set_cq_interrupt_enable(index, true).unwrap();
    assert_eq!(fake.read(set_base + QREG_CQIE), 1);
    fake.hc.clear_cq_interrupt(index).unwrap();
    assert_eq!(fake.read(set_base + QREG_CQIS), 1);
    assert!(fake.hc.cq_interrupt_pending(index).unwrap());

    fake.hc.configure_cq_aggregation(index, 0x08, 0x10).unwrap();
    assert_eq!(fake.read(set_base + QREG_CQIACR), 0x8100_0810);

    assert_eq!(
        fake.hc.configure_sq(16, 0, 16, 0),
        Err(UfshcError::InvalidArgument)
    );
    assert_eq!(
        fake.hc.configure_sq(0, 0x400, 16, 16),
        Err(UfshcError::InvalidArgument)
    );
    assert_eq!(
        fake.hc.configure_sq(0, 0x401, 16, 0),
        Err(UfshcError::InvalidArgument)
    );
}

#[test]
fn mcq_global_registers_take_limits_and_esi_base() {
    let fake = FakeController::new(UfshcVariant::Dwc40);

    fake.hc.set_max_active_commands(100).unwrap();
    assert_eq!(fake.read(REG_MCQCFG), 100 << 8);
    assert_eq!(
        fake.hc.set_max_active_commands(0x200),
        Err(UfshcError::InvalidArgument)
    );

    fake.hc.set_esi_base(0x0000_0002_0000_1000).unwrap();
    assert_eq!(fake.read(REG_ESILBA), 0x1000);
    assert_eq!(fake.read(REG_ESIUBA), 0x2);
    assert_eq!(fake.read(REG_MCQCFG) & 0x1, 1);
}

#[test]
fn vendor_registers_take_divider_throttle_and_safety_controls() {
    let fake = FakeController::new(UfshcVariant::Dwc40);

    fake.hc.set_hclkdiv(HclkDiv::Mhz125);
    assert_eq!(fake.read(REG_HCLKDIV), 0x7D);

    fake.hc
        .set_bus_throttle(BusThrottle {
            reads: 16,
            writes: 8,
            enabled: true,
        })
        .unwrap();
    assert_eq!(fake.read(REG_BUSTHRTL), 0x8000_0810);
    assert_eq!(
        fake.hc.set_bus_throttle(BusThrottle {
            reads: 0x40,
            writes: 0,
            enabled: false,
        }),
        Err(UfshcError::InvalidArgument)
    );

    // Monitor comes out of reset enabled.
    assert_eq!(fake.read(REG_SFTYMCTRL), 1);
    fake.hc.set_safety_fault_injection(true);
    assert_eq!(fake.read(REG_SFTYMCTRL), 3);
    fake.hc.clear_safety_counter();
    assert_eq!(fake.read(REG_SFTYMCTRL), 7);

    fake.write(REG_SFTYMSTAT, 0x0000_0304);
    fake.write(REG_SFTYMERR, 0x58);
    let status = fake.hc.safety_status();
    assert!(status.ecc_correctable);
    assert!(!status.ecc_uncorrectable);
    assert_eq!(status.correctable_count, 3);
    assert_eq!(status.fault_offset, 0x58);
}

#[test]
fn g210_instance_rejects_crypto_and_mcq_operations() {
    let fake = FakeController::new(UfshcVariant::G210);

    assert_eq!(
        fake.hc.crypto_capabilities().unwrap_err(),
        UfshcError::Unsupported
    );
    assert_eq!(
        fake.hc
            .program_keyslot(
                0,
                &KeyConfig {
                    key: [0; 16],
                    data_unit_size: 1,
                    capability_index: 0,
                },
            )
            .unwrap_err(),
        UfshcError::Unsupported
    );
    assert_eq!(
        fake.hc.set_crypto_general_enable(true).unwrap_err(),
        UfshcError::Unsupported
    );
    assert_eq!(
        fake.hc.configure_sq(0, 0x400, 16, 0).unwrap_err(),
        UfshcError::Unsupported
    );
    assert_eq!(
        fake.hc.set_max_active_commands(32).unwrap_err(),
        UfshcError::Unsupported
    );

    // The legacy doorbell path still works on the test chip.
    fake.hc.ring_utrl_doorbell(0).unwrap();
    assert_eq!(fake.read(REG_UTRLDBR), 1);
}
