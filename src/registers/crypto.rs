//! Inline-crypto capability and key configuration registers.
//!
//! The capability block at 0x100 advertises the supported cipher/key-size
//! pairs; the configuration array holds one 32-DWORD slot per programmable
//! key. Key material reads back as zero on hardware, so the key DWORDs are
//! declared write-only. The reserved tail of a slot is writable because the
//! architecture requires scrubbing the whole slot on reprogram.

use tock_registers::interfaces::Readable;
use tock_registers::register_structs;
use tock_registers::registers::{ReadOnly, ReadWrite, WriteOnly};
use tock_registers::LocalRegisterCopy;

register_structs! {
    pub CryptoRegs {
        (0x000 => pub ccap: ReadOnly<u32, CCAP::Register>),
        (0x004 => pub cryptocap: [ReadOnly<u32, CRYPTOCAP::Register>; 63]),
        (0x100 => @END),
    }
}

register_structs! {
    /// One key configuration slot (CRYPTOCFG).
    pub CryptoCfgSlot {
        (0x00 => pub key: [WriteOnly<u32>; 16]),
        (0x40 => pub control: ReadWrite<u32, CRYPTOCFG::Register>),
        (0x44 => pub rsvd: [ReadWrite<u32>; 15]),
        (0x80 => @END),
    }
}

tock_registers::register_bitfields! {u32,
    pub CCAP [
        /// Number of entries in the crypto capability array.
        CC OFFSET(0) NUMBITS(8) [],
        /// Number of configuration slots, minus one.
        CFGC OFFSET(8) NUMBITS(8) [],
        /// Configuration array pointer, in 0x80-byte units.
        CFGPTR OFFSET(24) NUMBITS(8) []
    ],

    pub CRYPTOCAP [
        /// Algorithm identifier.
        ALGID OFFSET(0) NUMBITS(8) [],
        /// Supported data unit sizes, bit N = 512 << N bytes.
        SDUSB OFFSET(8) NUMBITS(8) [],
        /// Key size encoding.
        KS OFFSET(16) NUMBITS(8) []
    ],

    pub CRYPTOCFG [
        /// Selected data unit size, same encoding as SDUSB.
        DUSIZE OFFSET(0) NUMBITS(8) [],
        /// Index into the crypto capability array.
        CAPIDX OFFSET(8) NUMBITS(8) [],
        /// Configuration enable; the slot keys I/O once this is set.
        CFGE OFFSET(31) NUMBITS(1) []
    ]
}

/// Cipher algorithms the capability array can advertise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CryptoAlg {
    AesXts = 0x0,
    BitlockerAesCbc = 0x1,
    AesEcb = 0x2,
    EssivAesCbc = 0x3,
}

impl CryptoAlg {
    pub fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0x0 => Some(Self::AesXts),
            0x1 => Some(Self::BitlockerAesCbc),
            0x2 => Some(Self::AesEcb),
            0x3 => Some(Self::EssivAesCbc),
            _ => None,
        }
    }
}

/// Key size encodings used by CRYPTOCAP.KS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CryptoKeySize {
    Bits128 = 0x1,
    Bits192 = 0x2,
    Bits256 = 0x3,
    Bits512 = 0x4,
}

impl CryptoKeySize {
    pub fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0x1 => Some(Self::Bits128),
            0x2 => Some(Self::Bits192),
            0x3 => Some(Self::Bits256),
            0x4 => Some(Self::Bits512),
            _ => None,
        }
    }
}

/// Key material and parameters for programming one configuration slot.
///
/// Unused tail DWORDs of shorter keys must be zero; the controller consumes
/// all sixteen.
#[derive(Clone)]
pub struct KeyConfig {
    pub key: [u32; 16],
    /// Selected data unit size, same encoding as CRYPTOCAP.SDUSB.
    pub data_unit_size: u8,
    /// Index of the capability entry the key conforms to.
    pub capability_index: u8,
}

/// Parsed view of the CCAP register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CryptoCapabilities {
    pub capability_count: u8,
    pub config_slots: u16,
    /// Byte offset of the configuration array.
    pub config_offset: usize,
}

impl CryptoCapabilities {
    pub fn from_raw(raw: u32) -> Self {
        let ccap = LocalRegisterCopy::<u32, CCAP::Register>::new(raw);
        Self {
            capability_count: ccap.read(CCAP::CC) as u8,
            config_slots: ccap.read(CCAP::CFGC) as u16 + 1,
            config_offset: ccap.read(CCAP::CFGPTR) as usize * 0x80,
        }
    }
}

/// Parsed view of one crypto capability entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CryptoCapability {
    pub algorithm: CryptoAlg,
    pub data_unit_sizes: u8,
    pub key_size: CryptoKeySize,
}

impl CryptoCapability {
    pub fn from_raw(raw: u32) -> Option<Self> {
        let cap = LocalRegisterCopy::<u32, CRYPTOCAP::Register>::new(raw);
        Some(Self {
            algorithm: CryptoAlg::from_raw(cap.read(CRYPTOCAP::ALGID) as u8)?,
            data_unit_sizes: cap.read(CRYPTOCAP::SDUSB) as u8,
            key_size: CryptoKeySize::from_raw(cap.read(CRYPTOCAP::KS) as u8)?,
        })
    }
}
