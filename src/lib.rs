//! Low-level building blocks for interacting with the Synopsys DesignWare
//! UFS host controller (DWC_ufshc).
//!
//! The crate keeps the register descriptions and helper types in Rust so
//! that higher-level driver components can avoid hard-coded offsets and rely
//! on type safe accessors instead.
//!
//! The surface stops at register access: capability parsing, doorbell and
//! list-base programming, single-command UIC handshakes, crypto keyslot
//! writes and MCQ queue-pair configuration. Queue scheduling, interrupt
//! dispatch and recovery policy belong to the consumer.

#![no_std]

#[macro_use]
extern crate log;

use core::ptr::NonNull;

mod config;
mod err;
pub mod registers;

pub use config::*;
pub use err::*;
pub use registers::crypto::{
    CryptoAlg, CryptoCapabilities, CryptoCapability, CryptoKeySize, KeyConfig,
};
pub use registers::hci::{HcCapabilities, HcStatus, McqCapabilities, UfsVersion};
pub use registers::uic::{dme_attr_arg1, UicOp, UicResultCode};
pub use registers::vendor::{BusThrottle, HclkDiv, SafetyMonitorStatus};
pub use registers::UfshcRegisters;

use registers::crypto::CRYPTOCFG;
use registers::hci::{HCE, INTERRUPT, RUNSTOP, UTRIACR};
use registers::mcq::{CQATTR, CQIACR, CQINT, MCQCFG, QPTR, SQATTR};
use registers::uic::UICCMD;
use registers::vendor::{BUSTHRTL, HCLKDIV, SFTYMCTRL};
use spin::Mutex;
use tock_registers::interfaces::*;

/// Bounded spin count for the host controller enable handshake.
const HCE_HANDSHAKE_SPINS: usize = 1_000_000;
/// Bounded spin count for UIC command completion.
const UIC_COMPLETION_SPINS: usize = 1_000_000;

/// Required alignment of the UTRL/UTMRL and MCQ list base addresses.
const LIST_BASE_ALIGN: u64 = 1024;

/// Handle over one mapped DWC_ufshc instance.
///
/// All operations are single-register reads and writes (plus two bounded
/// handshakes); the UIC command window is serialized internally because the
/// four-register sequence must not interleave.
pub struct Ufshc {
    regs: UfshcRegisters,
    config: UfshcConfig,
    uic_lock: Mutex<()>,
}

impl Ufshc {
    /// Creates a new interface from a raw MMIO base address.
    ///
    /// # Safety
    ///
    /// The caller must ensure that `base` is the correctly mapped and
    /// aligned address of the DWC_ufshc register file and that it remains
    /// valid for the lifetime of the returned structure.
    pub unsafe fn new(base: NonNull<u8>, config: UfshcConfig) -> Self {
        Self {
            regs: unsafe { UfshcRegisters::new(base) },
            config,
            uic_lock: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &UfshcConfig {
        &self.config
    }

    /// Direct access to the typed register blocks.
    pub fn registers(&self) -> &UfshcRegisters {
        &self.regs
    }

    pub fn version(&self) -> UfsVersion {
        UfsVersion::from_raw(self.regs.hci().ver.get())
    }

    pub fn capabilities(&self) -> HcCapabilities {
        HcCapabilities::from_raw(self.regs.hci().cap.get())
    }

    pub fn mcq_capabilities(&self) -> McqCapabilities {
        McqCapabilities::from_raw(self.regs.hci().mcqcap.get())
    }

    pub fn status(&self) -> HcStatus {
        HcStatus::from_raw(self.regs.hci().hcs.get())
    }

    pub fn product_id(&self) -> u32 {
        self.regs.hci().hcpid.get()
    }

    pub fn manufacturer_id(&self) -> u32 {
        self.regs.hci().hcmid.get()
    }

    /// Sets HCE and waits for the controller to report itself enabled.
    pub fn enable(&self) -> Result<(), UfshcError> {
        let hci = self.regs.hci();
        hci.hce.modify(HCE::HCE::SET);
        for _ in 0..HCE_HANDSHAKE_SPINS {
            if hci.hce.is_set(HCE::HCE) {
                debug!("host controller enabled");
                return Ok(());
            }
            core::hint::spin_loop();
        }
        error!("host controller enable handshake timed out, hcs={:#x}", hci.hcs.get());
        Err(UfshcError::Timeout)
    }

    /// Clears HCE and waits for the controller to report itself disabled.
    pub fn disable(&self) -> Result<(), UfshcError> {
        let hci = self.regs.hci();
        hci.hce.modify(HCE::HCE::CLEAR);
        for _ in 0..HCE_HANDSHAKE_SPINS {
            if !hci.hce.is_set(HCE::HCE) {
                return Ok(());
            }
            core::hint::spin_loop();
        }
        error!("host controller disable handshake timed out");
        Err(UfshcError::Timeout)
    }

    pub fn is_enabled(&self) -> bool {
        self.regs.hci().hce.is_set(HCE::HCE)
    }

    /// Toggles the crypto general enable bit alongside HCE.
    pub fn set_crypto_general_enable(&self, enable: bool) -> Result<(), UfshcError> {
        if !self.config.has_crypto() {
            return Err(UfshcError::Unsupported);
        }
        let hce = &self.regs.hci().hce;
        if enable {
            hce.modify(HCE::CGE::SET);
        } else {
            hce.modify(HCE::CGE::CLEAR);
        }
        Ok(())
    }

    /// Replaces the interrupt enable mask.
    pub fn set_interrupt_enable(&self, mask: u32) {
        self.regs.hci().ie.set(mask);
    }

    pub fn interrupt_enable(&self) -> u32 {
        self.regs.hci().ie.get()
    }

    pub fn interrupt_status(&self) -> u32 {
        self.regs.hci().is.get()
    }

    /// Acknowledges the given interrupt sources (write 1 to clear).
    pub fn clear_interrupts(&self, mask: u32) {
        self.regs.hci().is.set(mask);
    }

    /// Reads and thereby clears the five UIC error code registers.
    pub fn uic_errors(&self) -> UicErrors {
        let hci = self.regs.hci();
        UicErrors {
            phy_adapter: hci.uecpa.get(),
            data_link: hci.uecdl.get(),
            network: hci.uecn.get(),
            transport: hci.uect.get(),
            dme: hci.uecdme.get(),
        }
    }

    /// Programs the UTP transfer request list base address.
    pub fn set_utrl_base(&self, addr: u64) -> Result<(), UfshcError> {
        if addr % LIST_BASE_ALIGN != 0 {
            return Err(UfshcError::InvalidArgument);
        }
        let hci = self.regs.hci();
        hci.utrlba.set(addr as u32);
        hci.utrlbau.set((addr >> 32) as u32);
        Ok(())
    }

    pub fn set_utrl_run(&self, run: bool) {
        let rsr = &self.regs.hci().utrlrsr;
        rsr.write(if run { RUNSTOP::RS::SET } else { RUNSTOP::RS::CLEAR });
    }

    /// Rings the transfer request doorbell for one slot.
    pub fn ring_utrl_doorbell(&self, slot: u8) -> Result<(), UfshcError> {
        if u16::from(slot) >= self.config.nutrs {
            return Err(UfshcError::InvalidArgument);
        }
        // Writing 0 to the other bits leaves them unchanged.
        self.regs.hci().utrldbr.set(1 << slot);
        Ok(())
    }

    pub fn utrl_doorbell(&self) -> u32 {
        self.regs.hci().utrldbr.get()
    }

    /// Forcibly retires one transfer slot via UTRLCLR (write 0 to clear).
    pub fn clear_utrl_slot(&self, slot: u8) -> Result<(), UfshcError> {
        if u16::from(slot) >= self.config.nutrs {
            return Err(UfshcError::InvalidArgument);
        }
        self.regs.hci().utrlclr.set(!(1u32 << slot));
        Ok(())
    }

    /// Completed slots as reported by the completion notification register.
    pub fn utrl_completions(&self) -> u32 {
        self.regs.hci().utrlcnr.get()
    }

    /// Acknowledges completion notifications (write 1 to clear).
    pub fn ack_utrl_completions(&self, mask: u32) {
        self.regs.hci().utrlcnr.set(mask);
    }

    /// Enables legacy interrupt aggregation with the given parameters.
    pub fn configure_interrupt_aggregation(
        &self,
        counter_threshold: u8,
        timeout_40us: u8,
    ) -> Result<(), UfshcError> {
        if counter_threshold > 0x1F {
            return Err(UfshcError::InvalidArgument);
        }
        self.regs.hci().utriacr.write(
            UTRIACR::IAEN::SET
                + UTRIACR::IAPWEN::SET
                + UTRIACR::IACTH.val(u32::from(counter_threshold))
                + UTRIACR::IATOVAL.val(u32::from(timeout_40us)),
        );
        Ok(())
    }

    pub fn disable_interrupt_aggregation(&self) {
        self.regs.hci().utriacr.set(0);
    }

    /// Resets the aggregation counter and timer.
    pub fn reset_interrupt_aggregation(&self) {
        self.regs.hci().utriacr.modify(UTRIACR::CTR::SET);
    }

    /// Programs the UTP task management request list base address.
    pub fn set_utmrl_base(&self, addr: u64) -> Result<(), UfshcError> {
        if addr % LIST_BASE_ALIGN != 0 {
            return Err(UfshcError::InvalidArgument);
        }
        let hci = self.regs.hci();
        hci.utmrlba.set(addr as u32);
        hci.utmrlbau.set((addr >> 32) as u32);
        Ok(())
    }

    pub fn set_utmrl_run(&self, run: bool) {
        let rsr = &self.regs.hci().utmrlrsr;
        rsr.write(if run { RUNSTOP::RS::SET } else { RUNSTOP::RS::CLEAR });
    }

    pub fn ring_utmrl_doorbell(&self, slot: u8) -> Result<(), UfshcError> {
        if slot >= self.config.nutmrs {
            return Err(UfshcError::InvalidArgument);
        }
        self.regs.hci().utmrldbr.set(1 << slot);
        Ok(())
    }

    pub fn utmrl_doorbell(&self) -> u32 {
        self.regs.hci().utmrldbr.get()
    }

    pub fn clear_utmrl_slot(&self, slot: u8) -> Result<(), UfshcError> {
        if slot >= self.config.nutmrs {
            return Err(UfshcError::InvalidArgument);
        }
        self.regs.hci().utmrlclr.set(!(1u32 << slot));
        Ok(())
    }

    /// Issues one UIC command and waits for its completion.
    ///
    /// Returns the UCMDARG3 value the command produced. The command window
    /// is serialized internally; callers still must not issue commands while
    /// a power mode change is in flight.
    pub fn uic_send(&self, op: UicOp, arg1: u32, arg2: u32, arg3: u32) -> Result<u32, UfshcError> {
        let hci = self.regs.hci();
        let uic = self.regs.uic();

        if !self.status().uic_ready {
            return Err(UfshcError::NotReady);
        }

        let _guard = self.uic_lock.lock();

        // Acknowledge a stale completion before arming a new command.
        hci.is.write(INTERRUPT::UCCS::SET);
        uic.ucmdarg1.set(arg1);
        uic.ucmdarg2.set(arg2);
        uic.ucmdarg3.set(arg3);
        uic.uiccmd.write(UICCMD::CMDOP.val(op as u32));

        for _ in 0..UIC_COMPLETION_SPINS {
            if hci.is.is_set(INTERRUPT::UCCS) {
                hci.is.write(INTERRUPT::UCCS::SET);
                let code = uic.ucmdarg2.read(registers::uic::UCMDARG2::RESCODE) as u8;
                if code != 0 {
                    warn!("UIC command {:?} failed, result code {:#x}", op, code);
                    return Err(UfshcError::UicFailure(code));
                }
                return Ok(uic.ucmdarg3.get());
            }
            core::hint::spin_loop();
        }

        error!(
            "UIC command timeout: op={:?} arg1={:#x} arg2={:#x} arg3={:#x} is={:#x} hcs={:#x}",
            op,
            arg1,
            arg2,
            arg3,
            hci.is.get(),
            hci.hcs.get()
        );
        Err(UfshcError::Timeout)
    }

    /// DME_GET of a single attribute.
    pub fn dme_get(&self, attribute: u16, selector: u16) -> Result<u32, UfshcError> {
        self.uic_send(UicOp::DmeGet, dme_attr_arg1(attribute, selector), 0, 0)
    }

    /// DME_SET of a single attribute.
    pub fn dme_set(&self, attribute: u16, selector: u16, value: u32) -> Result<(), UfshcError> {
        self.uic_send(UicOp::DmeSet, dme_attr_arg1(attribute, selector), 0, value)
            .map(|_| ())
    }

    /// Parsed crypto capability summary.
    pub fn crypto_capabilities(&self) -> Result<CryptoCapabilities, UfshcError> {
        if !self.config.has_crypto() {
            return Err(UfshcError::Unsupported);
        }
        Ok(CryptoCapabilities::from_raw(self.regs.crypto().ccap.get()))
    }

    /// One entry of the crypto capability array.
    pub fn crypto_capability(&self, index: usize) -> Result<CryptoCapability, UfshcError> {
        let caps = self.crypto_capabilities()?;
        if index >= usize::from(caps.capability_count) {
            return Err(UfshcError::InvalidArgument);
        }
        CryptoCapability::from_raw(self.regs.crypto().cryptocap[index].get())
            .ok_or(UfshcError::InvalidArgument)
    }

    /// Programs one key configuration slot and arms it.
    ///
    /// The slot is disarmed first, the full 32 DWORDs are written (key,
    /// then reserved words as zero), and CFGE is set last so the slot never
    /// keys I/O with a partial key.
    pub fn program_keyslot(&self, slot: usize, key: &KeyConfig) -> Result<(), UfshcError> {
        let regs = self.keyslot(slot)?;
        if usize::from(key.capability_index) >= usize::from(self.crypto_capabilities()?.capability_count)
        {
            return Err(UfshcError::InvalidArgument);
        }

        regs.control.set(0);
        for (reg, word) in regs.key.iter().zip(key.key.iter()) {
            reg.set(*word);
        }
        for reg in regs.rsvd.iter() {
            reg.set(0);
        }
        regs.control.write(
            CRYPTOCFG::DUSIZE.val(u32::from(key.data_unit_size))
                + CRYPTOCFG::CAPIDX.val(u32::from(key.capability_index))
                + CRYPTOCFG::CFGE::SET,
        );
        debug!("armed crypto keyslot {}", slot);
        Ok(())
    }

    /// Disarms one key configuration slot and scrubs its key material.
    pub fn disable_keyslot(&self, slot: usize) -> Result<(), UfshcError> {
        let regs = self.keyslot(slot)?;
        regs.control.set(0);
        for reg in regs.key.iter() {
            reg.set(0);
        }
        for reg in regs.rsvd.iter() {
            reg.set(0);
        }
        debug!("disarmed crypto keyslot {}", slot);
        Ok(())
    }

    fn keyslot(&self, slot: usize) -> Result<&registers::crypto::CryptoCfgSlot, UfshcError> {
        if !self.config.has_crypto() {
            return Err(UfshcError::Unsupported);
        }
        if slot >= self.config.crypto_cfg_slots {
            return Err(UfshcError::InvalidArgument);
        }
        Ok(unsafe { self.regs.crypto_cfg(self.config.crypto_cfg_base, slot) })
    }

    /// Caps the number of commands active across all MCQ queues.
    pub fn set_max_active_commands(&self, mac: u16) -> Result<(), UfshcError> {
        if !self.config.has_mcq() {
            return Err(UfshcError::Unsupported);
        }
        if mac > 0x1FF {
            return Err(UfshcError::InvalidArgument);
        }
        self.regs
            .mcq_cfg()
            .mcqcfg
            .modify(MCQCFG::MAC.val(u32::from(mac)));
        Ok(())
    }

    /// Programs the event specific interrupt list base and enables ESI.
    pub fn set_esi_base(&self, addr: u64) -> Result<(), UfshcError> {
        if !self.config.has_mcq() {
            return Err(UfshcError::Unsupported);
        }
        let mcq = self.regs.mcq_cfg();
        mcq.esilba.set(addr as u32);
        mcq.esiuba.set((addr >> 32) as u32);
        mcq.mcqcfg.modify(MCQCFG::ESIE::SET);
        Ok(())
    }

    /// Programs base, depth and completion routing of one submission queue.
    ///
    /// The queue is left disabled; call [`Ufshc::enable_sq`] once the ring
    /// memory is in place.
    pub fn configure_sq(
        &self,
        index: usize,
        base: u64,
        entries: u16,
        cqid: u8,
    ) -> Result<(), UfshcError> {
        let q = self.queue_regs(index)?;
        if entries == 0 || base % LIST_BASE_ALIGN != 0 {
            return Err(UfshcError::InvalidArgument);
        }
        if usize::from(cqid) >= self.config.mcq_queues {
            return Err(UfshcError::InvalidArgument);
        }
        q.sqlba.set(base as u32);
        q.squba.set((base >> 32) as u32);
        q.sqattr.write(
            SQATTR::SIZE.val(u32::from(entries) - 1) + SQATTR::CQID.val(u32::from(cqid)),
        );
        Ok(())
    }

    pub fn enable_sq(&self, index: usize) -> Result<(), UfshcError> {
        self.queue_regs(index)?.sqattr.modify(SQATTR::SQEN::SET);
        Ok(())
    }

    pub fn disable_sq(&self, index: usize) -> Result<(), UfshcError> {
        self.queue_regs(index)?.sqattr.modify(SQATTR::SQEN::CLEAR);
        Ok(())
    }

    /// Programs base and depth of one completion queue.
    pub fn configure_cq(&self, index: usize, base: u64, entries: u16) -> Result<(), UfshcError> {
        let q = self.queue_regs(index)?;
        if entries == 0 || base % LIST_BASE_ALIGN != 0 {
            return Err(UfshcError::InvalidArgument);
        }
        q.cqlba.set(base as u32);
        q.cquba.set((base >> 32) as u32);
        q.cqattr.write(CQATTR::SIZE.val(u32::from(entries) - 1));
        Ok(())
    }

    pub fn enable_cq(&self, index: usize) -> Result<(), UfshcError> {
        self.queue_regs(index)?.cqattr.modify(CQATTR::CQEN::SET);
        Ok(())
    }

    pub fn disable_cq(&self, index: usize) -> Result<(), UfshcError> {
        self.queue_regs(index)?.cqattr.modify(CQATTR::CQEN::CLEAR);
        Ok(())
    }

    /// Publishes a new submission queue tail to the hardware.
    pub fn write_sq_tail(&self, index: usize, tail: u16) -> Result<(), UfshcError> {
        self.queue_regs(index)?
            .sqdb
            .write(QPTR::PTR.val(u32::from(tail)));
        Ok(())
    }

    pub fn sq_head(&self, index: usize) -> Result<u16, UfshcError> {
        Ok(self.queue_regs(index)?.sqhp.read(QPTR::PTR) as u16)
    }

    /// Publishes a new completion queue head to the hardware.
    pub fn write_cq_head(&self, index: usize, head: u16) -> Result<(), UfshcError> {
        self.queue_regs(index)?
            .cqdb
            .write(QPTR::PTR.val(u32::from(head)));
        Ok(())
    }

    pub fn cq_tail(&self, index: usize) -> Result<u16, UfshcError> {
        Ok(self.queue_regs(index)?.cqtp.read(QPTR::PTR) as u16)
    }

    pub fn set_cq_interrupt_enable(&self, index: usize, enable: bool) -> Result<(), UfshcError> {
        let q = self.queue_regs(index)?;
        q.cqie
            .write(if enable { CQINT::TEPS::SET } else { CQINT::TEPS::CLEAR });
        Ok(())
    }

    pub fn cq_interrupt_pending(&self, index: usize) -> Result<bool, UfshcError> {
        Ok(self.queue_regs(index)?.cqis.is_set(CQINT::TEPS))
    }

    /// Acknowledges the tail-entry-pushed event (write 1 to clear).
    pub fn clear_cq_interrupt(&self, index: usize) -> Result<(), UfshcError> {
        self.queue_regs(index)?.cqis.write(CQINT::TEPS::SET);
        Ok(())
    }

    /// Enables per-queue interrupt aggregation with the given parameters.
    pub fn configure_cq_aggregation(
        &self,
        index: usize,
        counter_threshold: u8,
        timeout_40us: u8,
    ) -> Result<(), UfshcError> {
        if counter_threshold > 0x1F {
            return Err(UfshcError::InvalidArgument);
        }
        self.queue_regs(index)?.cqiacr.write(
            CQIACR::IAEN::SET
                + CQIACR::IAPWEN::SET
                + CQIACR::IACTH.val(u32::from(counter_threshold))
                + CQIACR::IATOVAL.val(u32::from(timeout_40us)),
        );
        Ok(())
    }

    fn queue_regs(&self, index: usize) -> Result<&registers::mcq::McqQueueRegs, UfshcError> {
        if !self.config.has_mcq() {
            return Err(UfshcError::Unsupported);
        }
        if index >= self.config.mcq_queues {
            return Err(UfshcError::InvalidArgument);
        }
        Ok(unsafe { self.regs.queue(self.config.mcq_queue_base, index) })
    }

    /// Programs the HCLK divider. Must happen before the first UIC command
    /// after reset.
    pub fn set_hclkdiv(&self, div: HclkDiv) {
        self.regs
            .vendor()
            .hclkdiv
            .write(HCLKDIV::DIV.val(div as u32));
        debug!("hclkdiv set to {:#x}", div as u32);
    }

    pub fn bus_throttle(&self) -> BusThrottle {
        BusThrottle::from_raw(self.regs.vendor().busthrtl.get())
    }

    pub fn set_bus_throttle(&self, throttle: BusThrottle) -> Result<(), UfshcError> {
        if throttle.reads > 0x3F || throttle.writes > 0x3F {
            return Err(UfshcError::InvalidArgument);
        }
        let limits = BUSTHRTL::RDTHRTL.val(u32::from(throttle.reads))
            + BUSTHRTL::WRTHRTL.val(u32::from(throttle.writes));
        if throttle.enabled {
            self.regs.vendor().busthrtl.write(limits + BUSTHRTL::EN::SET);
        } else {
            self.regs.vendor().busthrtl.write(limits);
        }
        Ok(())
    }

    pub fn safety_status(&self) -> SafetyMonitorStatus {
        let vendor = self.regs.vendor();
        SafetyMonitorStatus::from_raw(vendor.sftymstat.get(), vendor.sftymerr.get())
    }

    /// Clears the correctable fault counter.
    pub fn clear_safety_counter(&self) {
        self.regs.vendor().sftymctrl.modify(SFTYMCTRL::CNTCLR::SET);
    }

    /// Arms or disarms fault injection in the safety monitor.
    pub fn set_safety_fault_injection(&self, inject: bool) {
        let ctrl = &self.regs.vendor().sftymctrl;
        if inject {
            ctrl.modify(SFTYMCTRL::INJ::SET);
        } else {
            ctrl.modify(SFTYMCTRL::INJ::CLEAR);
        }
    }
}

/// Raw snapshot of the five UIC error code registers.
///
/// Reading the registers clears them, so one snapshot captures everything
/// pending at the time of the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UicErrors {
    pub phy_adapter: u32,
    pub data_link: u32,
    pub network: u32,
    pub transport: u32,
    pub dme: u32,
}
