//! DWC vendor extension block (offsets 0xC0..0x100).
//!
//! Bus throttle limits, the safety mechanism monitor and the HCLK divider.
//! HCLKDIV takes the hex equivalent of the hclk frequency in MHz; the
//! divider must be programmed before the first UIC command after reset.

use tock_registers::interfaces::Readable;
use tock_registers::register_structs;
use tock_registers::registers::{ReadOnly, ReadWrite};
use tock_registers::LocalRegisterCopy;

register_structs! {
    pub VendorRegs {
        (0x00 => pub busthrtl: ReadWrite<u32, BUSTHRTL::Register>),
        (0x04 => _reserved0),
        (0x10 => pub sftymstat: ReadOnly<u32, SFTYMSTAT::Register>),
        (0x14 => pub sftymctrl: ReadWrite<u32, SFTYMCTRL::Register>),
        (0x18 => pub sftymerr: ReadOnly<u32, SFTYMERR::Register>),
        (0x1C => _reserved1),
        (0x3C => pub hclkdiv: ReadWrite<u32, HCLKDIV::Register>),
        (0x40 => @END),
    }
}

tock_registers::register_bitfields! {u32,
    pub BUSTHRTL [
        /// Maximum outstanding read transactions on the master port.
        RDTHRTL OFFSET(0) NUMBITS(6) [],
        /// Maximum outstanding write transactions on the master port.
        WRTHRTL OFFSET(8) NUMBITS(6) [],
        /// Throttle enable.
        EN OFFSET(31) NUMBITS(1) []
    ],

    pub SFTYMSTAT [
        /// Register file parity error observed.
        PARERR OFFSET(0) NUMBITS(1) [],
        /// Uncorrectable ECC fault in a RAM macro.
        ECCUE OFFSET(1) NUMBITS(1) [],
        /// Correctable ECC fault in a RAM macro.
        ECCCE OFFSET(2) NUMBITS(1) [],
        /// Saturating count of correctable faults since the last clear.
        CECNT OFFSET(8) NUMBITS(8) [],
        /// Monitor latched a fatal fault and locked further updates.
        LOCK OFFSET(31) NUMBITS(1) []
    ],

    pub SFTYMCTRL [
        /// Monitor enable.
        EN OFFSET(0) NUMBITS(1) [],
        /// Inject a fault into the next register file access.
        INJ OFFSET(1) NUMBITS(1) [],
        /// Clear the correctable fault counter (self-clearing).
        CNTCLR OFFSET(2) NUMBITS(1) []
    ],

    pub SFTYMERR [
        /// Byte offset of the last faulted register.
        ERRADDR OFFSET(0) NUMBITS(16) []
    ],

    pub HCLKDIV [
        DIV OFFSET(0) NUMBITS(16) []
    ]
}

/// Parsed view of the BUSTHRTL register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusThrottle {
    /// Maximum outstanding read transactions.
    pub reads: u8,
    /// Maximum outstanding write transactions.
    pub writes: u8,
    pub enabled: bool,
}

impl BusThrottle {
    pub fn from_raw(raw: u32) -> Self {
        let reg = LocalRegisterCopy::<u32, BUSTHRTL::Register>::new(raw);
        Self {
            reads: reg.read(BUSTHRTL::RDTHRTL) as u8,
            writes: reg.read(BUSTHRTL::WRTHRTL) as u8,
            enabled: reg.is_set(BUSTHRTL::EN),
        }
    }
}

/// Parsed view of the safety mechanism monitor registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SafetyMonitorStatus {
    pub parity_fault: bool,
    pub ecc_uncorrectable: bool,
    pub ecc_correctable: bool,
    pub correctable_count: u8,
    pub locked: bool,
    /// Byte offset of the last faulted register.
    pub fault_offset: u16,
}

impl SafetyMonitorStatus {
    pub fn from_raw(status: u32, fault: u32) -> Self {
        let stat = LocalRegisterCopy::<u32, SFTYMSTAT::Register>::new(status);
        let err = LocalRegisterCopy::<u32, SFTYMERR::Register>::new(fault);
        Self {
            parity_fault: stat.is_set(SFTYMSTAT::PARERR),
            ecc_uncorrectable: stat.is_set(SFTYMSTAT::ECCUE),
            ecc_correctable: stat.is_set(SFTYMSTAT::ECCCE),
            correctable_count: stat.read(SFTYMSTAT::CECNT) as u8,
            locked: stat.is_set(SFTYMSTAT::LOCK),
            fault_offset: err.read(SFTYMERR::ERRADDR) as u16,
        }
    }
}

/// HCLKDIV encodings for the supported reference clock frequencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum HclkDiv {
    Mhz62_5 = 0x3E,
    Mhz125 = 0x7D,
    Mhz200 = 0xC8,
}
