//! Instance parameters for one synthesized DWC_ufshc core.
//!
//! The IP is heavily parameterized at synthesis time (transfer slot counts,
//! inline-crypto geometry, number of MCQ queue pairs). Consumers that know
//! which instance they are talking to pick the matching variant instead of
//! discovering the geometry from capability registers at run time.

/// Byte size of one inline-crypto configuration slot (32 DWORDs).
pub const CRYPTO_CFG_SLOT_BYTES: usize = 0x80;

/// Byte stride between two MCQ queue-pair register sets.
pub const MCQ_QUEUE_STRIDE: usize = 0x40;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum UfshcVariant {
    /// DWC G210 test chip: legacy doorbell only, no inline crypto, no MCQ.
    G210,
    /// Full-feature UFSHCI 4.0 configuration with crypto and MCQ banks.
    Dwc40,
}

#[derive(Debug, Clone)]
pub struct UfshcConfig {
    pub variant: UfshcVariant,
    /// Transfer request slots behind the legacy UTRL doorbell.
    pub nutrs: u16,
    /// Task management request slots.
    pub nutmrs: u8,
    /// Byte offset of the crypto configuration array, 0x80-byte slots.
    pub crypto_cfg_base: usize,
    /// Number of crypto configuration slots (0 when crypto is absent).
    pub crypto_cfg_slots: usize,
    /// Byte offset of the first queue-pair register set.
    pub mcq_queue_base: usize,
    /// Number of SQ/CQ pairs (0 when MCQ is absent).
    pub mcq_queues: usize,
}

impl UfshcConfig {
    pub fn new(variant: UfshcVariant) -> Self {
        match variant {
            UfshcVariant::G210 => Self::new_g210(),
            UfshcVariant::Dwc40 => Self::new_dwc40(),
        }
    }

    fn new_g210() -> Self {
        Self {
            variant: UfshcVariant::G210,
            nutrs: 32,
            nutmrs: 8,
            crypto_cfg_base: 0,
            crypto_cfg_slots: 0,
            mcq_queue_base: 0,
            mcq_queues: 0,
        }
    }

    fn new_dwc40() -> Self {
        Self {
            variant: UfshcVariant::Dwc40,
            nutrs: 32,
            nutmrs: 8,
            // CCAP.CFGPTR resets to 8 on this instance, in 0x80-byte units.
            crypto_cfg_base: 0x400,
            crypto_cfg_slots: 64,
            // MCQCAP.QCFGPTR resets to 0x18, in 0x200-byte units.
            mcq_queue_base: 0x3000,
            mcq_queues: 16,
        }
    }

    pub fn has_crypto(&self) -> bool {
        self.crypto_cfg_slots > 0
    }

    pub fn has_mcq(&self) -> bool {
        self.mcq_queues > 0
    }
}
