//! Standard UFSHCI host register block (offsets 0x00..0x84).
//!
//! Covers the capability registers, interrupt status/enable, host
//! controller status/enable, the UIC error code registers and the legacy
//! UTP transfer / task management list registers. The UIC command window
//! at 0x90 lives in [`crate::registers::uic`].

use tock_registers::interfaces::Readable;
use tock_registers::register_structs;
use tock_registers::registers::{ReadOnly, ReadWrite, WriteOnly};
use tock_registers::LocalRegisterCopy;

register_structs! {
    pub HciRegs {
        (0x00 => pub cap: ReadOnly<u32, CAP::Register>),
        (0x04 => pub mcqcap: ReadOnly<u32, MCQCAP::Register>),
        (0x08 => pub ver: ReadOnly<u32, VER::Register>),
        (0x0C => _reserved0),
        (0x10 => pub hcpid: ReadOnly<u32>),
        (0x14 => pub hcmid: ReadOnly<u32, HCMID::Register>),
        (0x18 => pub ahit: ReadWrite<u32, AHIT::Register>),
        (0x1C => _reserved1),
        (0x20 => pub is: ReadWrite<u32, INTERRUPT::Register>),
        (0x24 => pub ie: ReadWrite<u32, INTERRUPT::Register>),
        (0x28 => _reserved2),
        (0x30 => pub hcs: ReadOnly<u32, HCS::Register>),
        (0x34 => pub hce: ReadWrite<u32, HCE::Register>),
        (0x38 => pub uecpa: ReadOnly<u32, UECPA::Register>),
        (0x3C => pub uecdl: ReadOnly<u32, UECDL::Register>),
        (0x40 => pub uecn: ReadOnly<u32, UECN::Register>),
        (0x44 => pub uect: ReadOnly<u32, UECT::Register>),
        (0x48 => pub uecdme: ReadOnly<u32, UECDME::Register>),
        (0x4C => pub utriacr: ReadWrite<u32, UTRIACR::Register>),
        (0x50 => pub utrlba: ReadWrite<u32>),
        (0x54 => pub utrlbau: ReadWrite<u32>),
        (0x58 => pub utrldbr: ReadWrite<u32>),
        (0x5C => pub utrlclr: WriteOnly<u32>),
        (0x60 => pub utrlrsr: ReadWrite<u32, RUNSTOP::Register>),
        (0x64 => pub utrlcnr: ReadWrite<u32>),
        (0x68 => _reserved3),
        (0x70 => pub utmrlba: ReadWrite<u32>),
        (0x74 => pub utmrlbau: ReadWrite<u32>),
        (0x78 => pub utmrldbr: ReadWrite<u32>),
        (0x7C => pub utmrlclr: WriteOnly<u32>),
        (0x80 => pub utmrlrsr: ReadWrite<u32, RUNSTOP::Register>),
        (0x84 => @END),
    }
}

tock_registers::register_bitfields! {u32,
    pub CAP [
        /// Number of UTP transfer request slots, minus one.
        NUTRS OFFSET(0) NUMBITS(8) [],
        /// Number of outstanding ready-to-transfers, minus one.
        NORTT OFFSET(8) NUMBITS(8) [],
        /// Number of UTP task management request slots, minus one.
        NUTMRS OFFSET(16) NUMBITS(3) [],
        /// Extra header segments in UTRD supported.
        EHSLUTRDS OFFSET(22) NUMBITS(1) [],
        /// Auto-hibernation supported.
        AUTOH8 OFFSET(23) NUMBITS(1) [],
        /// 64-bit addressing supported.
        AS64 OFFSET(24) NUMBITS(1) [],
        /// Out-of-order data delivery supported.
        OODDS OFFSET(25) NUMBITS(1) [],
        /// UIC DME_TEST_MODE command supported.
        UICDMETMS OFFSET(26) NUMBITS(1) [],
        /// Inline crypto supported.
        CS OFFSET(28) NUMBITS(1) [],
        /// Legacy single doorbell supported.
        LSDBS OFFSET(29) NUMBITS(1) [],
        /// Multi-circular-queue supported.
        MCQS OFFSET(30) NUMBITS(1) []
    ],

    pub MCQCAP [
        /// Number of queue pairs, minus one.
        MAXQ OFFSET(0) NUMBITS(8) [],
        /// Single shared interrupt for all queues.
        SIQ OFFSET(8) NUMBITS(1) [],
        /// Queue configuration array pointer, in 0x200-byte units.
        QCFGPTR OFFSET(16) NUMBITS(8) [],
        /// Maximum interrupt aggregation counter.
        MIAG OFFSET(24) NUMBITS(8) []
    ],

    pub VER [
        VS OFFSET(0) NUMBITS(4) [],
        MNR OFFSET(4) NUMBITS(4) [],
        MJR OFFSET(8) NUMBITS(8) []
    ],

    pub HCMID [
        /// JEDEC manufacturer identification code.
        MIC OFFSET(0) NUMBITS(8) [],
        /// JEDEC continuation bank index.
        BI OFFSET(8) NUMBITS(8) []
    ],

    pub AHIT [
        /// Idle time before autonomous hibernate entry.
        AH8ITV OFFSET(0) NUMBITS(10) [],
        /// Timer scale for AH8ITV.
        TS OFFSET(10) NUMBITS(3) [
            Us1 = 0,
            Us10 = 1,
            Us100 = 2,
            Ms1 = 3,
            Ms10 = 4,
            Ms100 = 5
        ]
    ],

    /// Shared field layout of IS and IE.
    pub INTERRUPT [
        /// UTP transfer request completion.
        UTRCS OFFSET(0) NUMBITS(1) [],
        /// UIC DME_ENDPOINTRESET indication.
        UDEPRI OFFSET(1) NUMBITS(1) [],
        /// UIC error.
        UE OFFSET(2) NUMBITS(1) [],
        /// UIC test mode.
        UTMS OFFSET(3) NUMBITS(1) [],
        /// UIC power mode change.
        UPMS OFFSET(4) NUMBITS(1) [],
        /// UIC hibernate exit.
        UHXS OFFSET(5) NUMBITS(1) [],
        /// UIC hibernate enter.
        UHES OFFSET(6) NUMBITS(1) [],
        /// UIC link lost.
        ULLS OFFSET(7) NUMBITS(1) [],
        /// UIC link startup.
        ULSS OFFSET(8) NUMBITS(1) [],
        /// UTP task management request completion.
        UTMRCS OFFSET(9) NUMBITS(1) [],
        /// UIC command completion.
        UCCS OFFSET(10) NUMBITS(1) [],
        /// Device fatal error.
        DFES OFFSET(11) NUMBITS(1) [],
        /// UTP error.
        UTPES OFFSET(12) NUMBITS(1) [],
        /// Host controller fatal error.
        HCFES OFFSET(16) NUMBITS(1) [],
        /// System bus fatal error.
        SBFES OFFSET(17) NUMBITS(1) [],
        /// Crypto engine fatal error.
        CEFES OFFSET(18) NUMBITS(1) [],
        /// MCQ completion queue event.
        CQES OFFSET(20) NUMBITS(1) []
    ],

    pub HCS [
        /// Device presence.
        DP OFFSET(0) NUMBITS(1) [],
        /// UTP transfer request list ready.
        UTRLRDY OFFSET(1) NUMBITS(1) [],
        /// UTP task management request list ready.
        UTMRLRDY OFFSET(2) NUMBITS(1) [],
        /// UIC command window ready.
        UCRDY OFFSET(3) NUMBITS(1) [],
        /// UIC power mode change request status.
        UPMCRS OFFSET(8) NUMBITS(3) [],
        /// UTP error code.
        UTPEC OFFSET(12) NUMBITS(4) [],
        /// Task tag of the failed UTP request.
        TTAGUTPE OFFSET(16) NUMBITS(8) [],
        /// Target LUN of the failed UTP request.
        TLUNUTPE OFFSET(24) NUMBITS(8) []
    ],

    pub HCE [
        /// Host controller enable.
        HCE OFFSET(0) NUMBITS(1) [],
        /// Crypto general enable.
        CGE OFFSET(1) NUMBITS(1) []
    ],

    pub UECPA [
        EC OFFSET(0) NUMBITS(5) [],
        ERR OFFSET(31) NUMBITS(1) []
    ],

    pub UECDL [
        EC OFFSET(0) NUMBITS(16) [],
        ERR OFFSET(31) NUMBITS(1) []
    ],

    pub UECN [
        EC OFFSET(0) NUMBITS(3) [],
        ERR OFFSET(31) NUMBITS(1) []
    ],

    pub UECT [
        EC OFFSET(0) NUMBITS(7) [],
        ERR OFFSET(31) NUMBITS(1) []
    ],

    pub UECDME [
        EC OFFSET(0) NUMBITS(4) [],
        ERR OFFSET(31) NUMBITS(1) []
    ],

    pub UTRIACR [
        /// Aggregation timeout, in 40 us units.
        IATOVAL OFFSET(0) NUMBITS(8) [],
        /// Aggregation counter threshold.
        IACTH OFFSET(8) NUMBITS(5) [],
        /// Counter and timer reset (write only).
        CTR OFFSET(16) NUMBITS(1) [],
        /// Aggregation status bit.
        IASB OFFSET(20) NUMBITS(1) [],
        /// Parameter write enable.
        IAPWEN OFFSET(24) NUMBITS(1) [],
        /// Aggregation enable.
        IAEN OFFSET(31) NUMBITS(1) []
    ],

    pub RUNSTOP [
        RS OFFSET(0) NUMBITS(1) []
    ]
}

/// Parsed view of the CAP register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HcCapabilities {
    pub nutrs: u16,
    pub nortt: u16,
    pub nutmrs: u8,
    pub ehs_lutrd: bool,
    pub auto_hibernate: bool,
    pub addressing_64: bool,
    pub out_of_order_data: bool,
    pub dme_test_mode: bool,
    pub crypto: bool,
    pub legacy_single_doorbell: bool,
    pub mcq: bool,
}

impl HcCapabilities {
    pub fn from_raw(raw: u32) -> Self {
        let cap = LocalRegisterCopy::<u32, CAP::Register>::new(raw);
        Self {
            nutrs: cap.read(CAP::NUTRS) as u16 + 1,
            nortt: cap.read(CAP::NORTT) as u16 + 1,
            nutmrs: cap.read(CAP::NUTMRS) as u8 + 1,
            ehs_lutrd: cap.is_set(CAP::EHSLUTRDS),
            auto_hibernate: cap.is_set(CAP::AUTOH8),
            addressing_64: cap.is_set(CAP::AS64),
            out_of_order_data: cap.is_set(CAP::OODDS),
            dme_test_mode: cap.is_set(CAP::UICDMETMS),
            crypto: cap.is_set(CAP::CS),
            legacy_single_doorbell: cap.is_set(CAP::LSDBS),
            mcq: cap.is_set(CAP::MCQS),
        }
    }
}

/// Parsed view of the MCQCAP register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct McqCapabilities {
    pub max_queues: u16,
    pub single_interrupt_queue: bool,
    /// Byte offset of the queue configuration array.
    pub qcfg_offset: usize,
    pub max_aggregation: u8,
}

impl McqCapabilities {
    pub fn from_raw(raw: u32) -> Self {
        let cap = LocalRegisterCopy::<u32, MCQCAP::Register>::new(raw);
        Self {
            max_queues: cap.read(MCQCAP::MAXQ) as u16 + 1,
            single_interrupt_queue: cap.is_set(MCQCAP::SIQ),
            qcfg_offset: cap.read(MCQCAP::QCFGPTR) as usize * 0x200,
            max_aggregation: cap.read(MCQCAP::MIAG) as u8,
        }
    }
}

/// Parsed view of the VER register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UfsVersion {
    pub major: u8,
    pub minor: u8,
    pub suffix: u8,
}

impl UfsVersion {
    pub fn from_raw(raw: u32) -> Self {
        let ver = LocalRegisterCopy::<u32, VER::Register>::new(raw);
        Self {
            major: ver.read(VER::MJR) as u8,
            minor: ver.read(VER::MNR) as u8,
            suffix: ver.read(VER::VS) as u8,
        }
    }
}

/// Parsed view of the HCS register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HcStatus {
    pub device_present: bool,
    pub utrl_ready: bool,
    pub utmrl_ready: bool,
    pub uic_ready: bool,
    pub power_mode_status: u8,
    pub utp_error_code: u8,
    pub failed_task_tag: u8,
    pub failed_lun: u8,
}

impl HcStatus {
    pub fn from_raw(raw: u32) -> Self {
        let hcs = LocalRegisterCopy::<u32, HCS::Register>::new(raw);
        Self {
            device_present: hcs.is_set(HCS::DP),
            utrl_ready: hcs.is_set(HCS::UTRLRDY),
            utmrl_ready: hcs.is_set(HCS::UTMRLRDY),
            uic_ready: hcs.is_set(HCS::UCRDY),
            power_mode_status: hcs.read(HCS::UPMCRS) as u8,
            utp_error_code: hcs.read(HCS::UTPEC) as u8,
            failed_task_tag: hcs.read(HCS::TTAGUTPE) as u8,
            failed_lun: hcs.read(HCS::TLUNUTPE) as u8,
        }
    }
}
