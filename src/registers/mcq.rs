//! Multi-circular-queue extension registers.
//!
//! A small global block at 0x380 and one register set per SQ/CQ pair. The
//! queue sets live at the offset MCQCAP.QCFGPTR advertises, spaced
//! [`crate::config::MCQ_QUEUE_STRIDE`] bytes apart.

use tock_registers::register_structs;
use tock_registers::registers::{ReadOnly, ReadWrite};

register_structs! {
    pub McqCfgRegs {
        (0x00 => pub mcqcfg: ReadWrite<u32, MCQCFG::Register>),
        (0x04 => pub esilba: ReadWrite<u32>),
        (0x08 => pub esiuba: ReadWrite<u32>),
        (0x0C => @END),
    }
}

register_structs! {
    /// Register set of one SQ/CQ pair.
    pub McqQueueRegs {
        (0x00 => pub sqattr: ReadWrite<u32, SQATTR::Register>),
        (0x04 => pub sqlba: ReadWrite<u32>),
        (0x08 => pub squba: ReadWrite<u32>),
        (0x0C => pub sqdb: ReadWrite<u32, QPTR::Register>),
        (0x10 => pub sqhp: ReadOnly<u32, QPTR::Register>),
        (0x14 => _reserved0),
        (0x20 => pub cqattr: ReadWrite<u32, CQATTR::Register>),
        (0x24 => pub cqlba: ReadWrite<u32>),
        (0x28 => pub cquba: ReadWrite<u32>),
        (0x2C => pub cqdb: ReadWrite<u32, QPTR::Register>),
        (0x30 => pub cqtp: ReadOnly<u32, QPTR::Register>),
        (0x34 => pub cqis: ReadWrite<u32, CQINT::Register>),
        (0x38 => pub cqie: ReadWrite<u32, CQINT::Register>),
        (0x3C => pub cqiacr: ReadWrite<u32, CQIACR::Register>),
        (0x40 => @END),
    }
}

tock_registers::register_bitfields! {u32,
    pub MCQCFG [
        /// Event specific interrupts enable.
        ESIE OFFSET(0) NUMBITS(1) [],
        /// Maximum active commands across all queues.
        MAC OFFSET(8) NUMBITS(9) []
    ],

    pub SQATTR [
        /// Queue depth in entries, minus one.
        SIZE OFFSET(0) NUMBITS(16) [],
        /// Completion queue receiving this queue's responses.
        CQID OFFSET(16) NUMBITS(8) [],
        /// Submission queue enable.
        SQEN OFFSET(31) NUMBITS(1) []
    ],

    pub CQATTR [
        /// Queue depth in entries, minus one.
        SIZE OFFSET(0) NUMBITS(16) [],
        /// Completion queue enable.
        CQEN OFFSET(31) NUMBITS(1) []
    ],

    /// Shared layout of the head/tail pointer registers.
    pub QPTR [
        PTR OFFSET(0) NUMBITS(16) []
    ],

    /// Shared field layout of CQIS and CQIE.
    pub CQINT [
        /// Tail entry pushed.
        TEPS OFFSET(0) NUMBITS(1) []
    ],

    pub CQIACR [
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
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MCQ_QUEUE_STRIDE;
    use crate::registers::consts;
    use core::mem::{offset_of, size_of};

    #[test]
    fn global_block_matches_the_header_constants() {
        let base = consts::REG_MCQ_CFG_BASE;
        assert_eq!(base + offset_of!(McqCfgRegs, mcqcfg), consts::REG_MCQCFG);
        assert_eq!(base + offset_of!(McqCfgRegs, esilba), consts::REG_ESILBA);
        assert_eq!(base + offset_of!(McqCfgRegs, esiuba), consts::REG_ESIUBA);
    }

    #[test]
    fn queue_set_matches_the_header_constants() {
        assert_eq!(size_of::<McqQueueRegs>(), MCQ_QUEUE_STRIDE);
        assert_eq!(offset_of!(McqQueueRegs, sqattr), consts::QREG_SQATTR);
        assert_eq!(offset_of!(McqQueueRegs, sqlba), consts::QREG_SQLBA);
        assert_eq!(offset_of!(McqQueueRegs, squba), consts::QREG_SQUBA);
        assert_eq!(offset_of!(McqQueueRegs, sqdb), consts::QREG_SQDB);
        assert_eq!(offset_of!(McqQueueRegs, sqhp), consts::QREG_SQHP);
        assert_eq!(offset_of!(McqQueueRegs, cqattr), consts::QREG_CQATTR);
        assert_eq!(offset_of!(McqQueueRegs, cqlba), consts::QREG_CQLBA);
        assert_eq!(offset_of!(McqQueueRegs, cquba), consts::QREG_CQUBA);
        assert_eq!(offset_of!(McqQueueRegs, cqdb), consts::QREG_CQDB);
        assert_eq!(offset_of!(McqQueueRegs, cqtp), consts::QREG_CQTP);
        assert_eq!(offset_of!(McqQueueRegs, cqis), consts::QREG_CQIS);
        assert_eq!(offset_of!(McqQueueRegs, cqie), consts::QREG_CQIE);
        assert_eq!(offset_of!(McqQueueRegs, cqiacr), consts::QREG_CQIACR);
    }

    #[test]
    fn sixteen_queue_sets_fit_the_register_space() {
        let last = 0x3000 + 15 * MCQ_QUEUE_STRIDE + size_of::<McqQueueRegs>();
        assert!(last <= consts::REG_SPACE_SIZE);
    }
}
