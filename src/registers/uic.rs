//! UIC command window (offsets 0x90..0xA0).
//!
//! One command register plus three argument registers. The host writes the
//! arguments, then the DME opcode, and waits for the UCCS interrupt; ARG2
//! carries the result code back.

use tock_registers::register_structs;
use tock_registers::registers::ReadWrite;

register_structs! {
    pub UicRegs {
        (0x00 => pub uiccmd: ReadWrite<u32, UICCMD::Register>),
        (0x04 => pub ucmdarg1: ReadWrite<u32>),
        (0x08 => pub ucmdarg2: ReadWrite<u32, UCMDARG2::Register>),
        (0x0C => pub ucmdarg3: ReadWrite<u32>),
        (0x10 => @END),
    }
}

tock_registers::register_bitfields! {u32,
    pub UICCMD [
        CMDOP OFFSET(0) NUMBITS(8) []
    ],

    pub UCMDARG2 [
        /// Generic result code of the completed command.
        RESCODE OFFSET(0) NUMBITS(8) [],
        /// Attribute set type for DME_SET.
        ATTRSETTYPE OFFSET(16) NUMBITS(8) []
    ]
}

/// DME command opcodes accepted by UICCMD.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum UicOp {
    DmeGet = 0x01,
    DmeSet = 0x02,
    DmePeerGet = 0x03,
    DmePeerSet = 0x04,
    DmePowerOn = 0x10,
    DmePowerOff = 0x11,
    DmeEnable = 0x12,
    DmeReset = 0x14,
    DmeEndpointReset = 0x15,
    DmeLinkStartup = 0x16,
    DmeHibernateEnter = 0x17,
    DmeHibernateExit = 0x18,
    DmeTestMode = 0x1A,
}

/// Generic result codes reported in UCMDARG2 after completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum UicResultCode {
    Success = 0x00,
    InvalidMibAttribute = 0x01,
    InvalidMibAttributeValue = 0x02,
    ReadOnlyMibAttribute = 0x03,
    WriteOnlyMibAttribute = 0x04,
    BadIndex = 0x05,
    LockedMibAttribute = 0x06,
    BadTestFeatureIndex = 0x07,
    PeerCommunicationFailure = 0x08,
    Busy = 0x09,
    DmeFailure = 0x0A,
}

/// Builds the UCMDARG1 value for a DME attribute access.
///
/// The MIB attribute ID occupies bits 31:16 and the GenSelectorIndex bits
/// 15:0.
pub const fn dme_attr_arg1(mib_attribute: u16, gen_selector_index: u16) -> u32 {
    ((mib_attribute as u32) << 16) | gen_selector_index as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registers::consts;
    use core::mem::offset_of;

    #[test]
    fn field_offsets_match_the_header_constants() {
        let base = consts::REG_UIC_BASE;
        assert_eq!(base + offset_of!(UicRegs, uiccmd), consts::REG_UICCMD);
        assert_eq!(base + offset_of!(UicRegs, ucmdarg1), consts::REG_UCMDARG1);
        assert_eq!(base + offset_of!(UicRegs, ucmdarg2), consts::REG_UCMDARG2);
        assert_eq!(base + offset_of!(UicRegs, ucmdarg3), consts::REG_UCMDARG3);
    }

    #[test]
    fn dme_attr_arg1_packs_attribute_and_selector() {
        assert_eq!(dme_attr_arg1(0x1571, 0), 0x1571_0000);
        assert_eq!(dme_attr_arg1(0x15A8, 4), 0x15A8_0004);
    }

    #[test]
    fn opcodes_use_the_architected_encodings() {
        assert_eq!(UicOp::DmeGet as u8, 0x01);
        assert_eq!(UicOp::DmeLinkStartup as u8, 0x16);
        assert_eq!(UicOp::DmeTestMode as u8, 0x1A);
    }
}
