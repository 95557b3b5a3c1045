//! Memory-mapped register definitions for the DWC UFS host controller.
//!
//! The register layout is described using [`tock_registers`], which provides
//! a safe and zero-cost abstraction over volatile MMIO access. Each
//! functional block is exposed through a dedicated sub-module so the code
//! that drives the hardware can depend on a well-structured Rust API instead
//! of scattering raw offsets across a driver.

use core::ptr::NonNull;

pub mod consts;
pub mod crypto;
pub mod hci;
pub mod mcq;
pub mod uic;
pub mod vendor;

/// Top-level view of the DWC_ufshc register file.
///
/// The functional blocks live in separate modules and are reached through
/// the group accessors below. Users create this from an MMIO base address;
/// the arrays whose geometry varies per instance (crypto slots, queue sets)
/// take their base offsets as arguments because only the instance
/// configuration knows them.
pub struct UfshcRegisters {
    base: NonNull<u8>,
}

unsafe impl Send for UfshcRegisters {}

impl UfshcRegisters {
    /// Creates a facade over the controller's MMIO region.
    ///
    /// # Safety
    ///
    /// The caller must ensure the provided pointer is a valid mapping of the
    /// complete DWC_ufshc register file for the lifetime of the returned
    /// object.
    pub const unsafe fn new(base: NonNull<u8>) -> Self {
        Self { base }
    }

    #[inline]
    pub fn hci(&self) -> &hci::HciRegs {
        unsafe { &*(self.base.as_ptr() as *const hci::HciRegs) }
    }

    #[inline]
    pub fn uic(&self) -> &uic::UicRegs {
        unsafe { &*(self.base.as_ptr().add(consts::REG_UIC_BASE) as *const uic::UicRegs) }
    }

    #[inline]
    pub fn vendor(&self) -> &vendor::VendorRegs {
        unsafe { &*(self.base.as_ptr().add(consts::REG_VENDOR_BASE) as *const vendor::VendorRegs) }
    }

    #[inline]
    pub fn crypto(&self) -> &crypto::CryptoRegs {
        unsafe { &*(self.base.as_ptr().add(consts::REG_CRYPTO_BASE) as *const crypto::CryptoRegs) }
    }

    #[inline]
    pub fn mcq_cfg(&self) -> &mcq::McqCfgRegs {
        unsafe { &*(self.base.as_ptr().add(consts::REG_MCQ_CFG_BASE) as *const mcq::McqCfgRegs) }
    }

    /// Returns the key configuration slot at `index`.
    ///
    /// # Safety
    ///
    /// `cfg_base` must be the instance's crypto configuration array offset
    /// and `index` must be below the instance's slot count.
    pub unsafe fn crypto_cfg(&self, cfg_base: usize, index: usize) -> &crypto::CryptoCfgSlot {
        let off = cfg_base + index * crate::config::CRYPTO_CFG_SLOT_BYTES;
        unsafe { &*(self.base.as_ptr().add(off) as *const crypto::CryptoCfgSlot) }
    }

    /// Returns the queue-pair register set at `index`.
    ///
    /// # Safety
    ///
    /// `queue_base` must be the instance's queue configuration array offset
    /// and `index` must be below the instance's queue count.
    pub unsafe fn queue(&self, queue_base: usize, index: usize) -> &mcq::McqQueueRegs {
        let off = queue_base + index * crate::config::MCQ_QUEUE_STRIDE;
        unsafe { &*(self.base.as_ptr().add(off) as *const mcq::McqQueueRegs) }
    }

    /// Raw pointer into the register file, for offsets the typed blocks do
    /// not cover.
    pub fn offset_ptr<T>(&self, offset: usize) -> *mut T {
        unsafe { self.base.as_ptr().add(offset) as *mut T }
    }
}
