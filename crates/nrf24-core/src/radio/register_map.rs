//! The nRF24L01 register map, SPI command set and register bit layouts.
//!
//! The bitfield structs in this module never touch the SPI bus. They only
//! pack and unpack register values, MSB first as in the datasheet.

use bitfield_struct::bitfield;

use crate::{CrcLength, DataRate, FifoState, PaLevel, StatusFlags};

/// Register addresses.
pub mod registers {
    pub const CONFIG: u8 = 0x00;
    pub const EN_AA: u8 = 0x01;
    pub const EN_RXADDR: u8 = 0x02;
    pub const SETUP_AW: u8 = 0x03;
    pub const SETUP_RETR: u8 = 0x04;
    pub const RF_CH: u8 = 0x05;
    pub const RF_SETUP: u8 = 0x06;
    pub const STATUS: u8 = 0x07;
    pub const OBSERVE_TX: u8 = 0x08;
    pub const RPD: u8 = 0x09;
    pub const RX_ADDR_P0: u8 = 0x0A;
    pub const RX_ADDR_P1: u8 = 0x0B;
    pub const TX_ADDR: u8 = 0x10;
    pub const RX_PW_P0: u8 = 0x11;
    pub const FIFO_STATUS: u8 = 0x17;
    pub const DYNPD: u8 = 0x1C;
    pub const FEATURE: u8 = 0x1D;
}

/// SPI command bytes.
pub mod commands {
    pub const W_REGISTER: u8 = 0x20;
    pub const ACTIVATE: u8 = 0x50;
    /// The second byte of the `ACTIVATE` command.
    pub const ACTIVATE_KEY: u8 = 0x73;
    pub const R_RX_PL_WID: u8 = 0x60;
    pub const R_RX_PAYLOAD: u8 = 0x61;
    pub const W_TX_PAYLOAD: u8 = 0xA0;
    /// OR'd with the pipe number.
    pub const W_ACK_PAYLOAD: u8 = 0xA8;
    pub const W_TX_PAYLOAD_NO_ACK: u8 = 0xB0;
    pub const FLUSH_TX: u8 = 0xE1;
    pub const FLUSH_RX: u8 = 0xE2;
    pub const REUSE_TX_PL: u8 = 0xE3;
    pub const NOP: u8 = 0xFF;
}

/// The CONFIG register.
///
/// A set `mask_*` bit prevents the event from asserting the IRQ pin.
#[bitfield(u8, order = Msb)]
#[derive(PartialEq, Eq)]
pub(crate) struct ConfigReg {
    #[bits(1)]
    _reserved: u8,
    pub mask_rx_dr: bool,
    pub mask_tx_ds: bool,
    pub mask_max_rt: bool,
    #[bits(1, default = true)]
    pub en_crc: bool,
    #[bits(1, default = true)]
    pub crco: bool,
    pub pwr_up: bool,
    pub prim_rx: bool,
}

impl ConfigReg {
    /// CRCO is meaningless without EN_CRC, so the radio never reports it alone.
    pub const fn is_corrupted(&self) -> bool {
        self.crco() && !self.en_crc()
    }

    pub const fn crc_length(&self) -> CrcLength {
        match (self.en_crc(), self.crco()) {
            (false, _) => CrcLength::Disabled,
            (true, false) => CrcLength::Bit8,
            (true, true) => CrcLength::Bit16,
        }
    }

    pub const fn with_crc_length(self, length: CrcLength) -> Self {
        match length {
            CrcLength::Disabled => self.with_en_crc(false).with_crco(false),
            CrcLength::Bit8 => self.with_en_crc(true).with_crco(false),
            CrcLength::Bit16 => self.with_en_crc(true).with_crco(true),
        }
    }

    /// The events allowed to assert the IRQ pin.
    pub const fn irq_flags(&self) -> StatusFlags {
        StatusFlags::from_bits(0)
            .with_rx_dr(!self.mask_rx_dr())
            .with_tx_ds(!self.mask_tx_ds())
            .with_tx_df(!self.mask_max_rt())
    }

    pub const fn with_irq_flags(self, flags: StatusFlags) -> Self {
        self.with_mask_rx_dr(!flags.rx_dr())
            .with_mask_tx_ds(!flags.tx_ds())
            .with_mask_max_rt(!flags.tx_df())
    }
}

/// The SETUP_RETR register.
#[bitfield(u8, order = Msb)]
#[derive(PartialEq, Eq)]
pub(crate) struct SetupRetr {
    /// Auto-retransmit delay in steps of 250 µs (0 means 250 µs).
    #[bits(4, default = 5)]
    pub ard: u8,
    /// Auto-retransmit count (0 disables retries).
    #[bits(4, default = 15)]
    pub arc: u8,
}

/// The RF_SETUP register.
#[bitfield(u8, order = Msb)]
#[derive(PartialEq, Eq)]
pub(crate) struct RfSetup {
    pub cont_wave: bool,
    #[bits(1)]
    _reserved: u8,
    pub rf_dr_low: bool,
    pub pll_lock: bool,
    pub rf_dr_high: bool,
    #[bits(2, default = 3)]
    pub rf_pwr: u8,
    /// Obsolete on the nRF24L01+. Si24R1 clones use it for the LNA gain.
    #[bits(1, default = true)]
    pub lna_hcurr: bool,
}

impl RfSetup {
    /// `None` if both data rate bits are set, which the radio never reports.
    pub const fn data_rate(&self) -> Option<DataRate> {
        match (self.rf_dr_low(), self.rf_dr_high()) {
            (false, false) => Some(DataRate::Mbps1),
            (false, true) => Some(DataRate::Mbps2),
            (true, false) => Some(DataRate::Kbps250),
            (true, true) => None,
        }
    }

    pub const fn with_data_rate(self, data_rate: DataRate) -> Self {
        match data_rate {
            DataRate::Mbps1 => self.with_rf_dr_low(false).with_rf_dr_high(false),
            DataRate::Mbps2 => self.with_rf_dr_low(false).with_rf_dr_high(true),
            DataRate::Kbps250 => self.with_rf_dr_low(true).with_rf_dr_high(false),
        }
    }

    pub const fn pa_level(&self) -> PaLevel {
        PaLevel::from_bits(self.rf_pwr())
    }

    pub const fn with_pa_level(self, level: PaLevel) -> Self {
        self.with_rf_pwr(level.into_bits())
    }
}

/// The FEATURE register.
#[bitfield(u8, order = Msb)]
#[derive(PartialEq, Eq)]
pub(crate) struct FeatureReg {
    #[bits(5)]
    _reserved: u8,
    pub en_dpl: bool,
    pub en_ack_pay: bool,
    pub en_dyn_ack: bool,
}

/// The FIFO_STATUS register.
#[bitfield(u8, order = Msb)]
#[derive(PartialEq, Eq)]
pub(crate) struct FifoStatus {
    #[bits(1)]
    _reserved_hi: u8,
    pub tx_reuse: bool,
    pub tx_full: bool,
    pub tx_empty: bool,
    #[bits(2)]
    _reserved_lo: u8,
    pub rx_full: bool,
    pub rx_empty: bool,
}

impl FifoStatus {
    const fn state(full: bool, empty: bool) -> FifoState {
        if empty {
            FifoState::Empty
        } else if full {
            FifoState::Full
        } else {
            FifoState::PartiallyFull
        }
    }

    pub const fn tx_state(&self) -> FifoState {
        Self::state(self.tx_full(), self.tx_empty())
    }

    pub const fn rx_state(&self) -> FifoState {
        Self::state(self.rx_full(), self.rx_empty())
    }
}

/// The OBSERVE_TX register.
#[bitfield(u8, order = Msb)]
#[derive(PartialEq, Eq)]
pub(crate) struct ObserveTx {
    /// Lost packets, saturating at 15. Reset by writing RF_CH.
    #[bits(4)]
    pub plos_cnt: u8,
    /// Retransmissions of the last payload.
    #[bits(4)]
    pub arc_cnt: u8,
}

#[cfg(test)]
mod test {
    use super::{ConfigReg, FeatureReg, FifoStatus, ObserveTx, RfSetup, SetupRetr};
    use crate::{CrcLength, DataRate, FifoState, PaLevel, StatusFlags};

    #[test]
    fn config_defaults() {
        let config = ConfigReg::default();
        assert_eq!(config.into_bits(), 0x0C);
        assert_eq!(config.crc_length(), CrcLength::Bit16);
        assert_eq!(config.with_pwr_up(true).into_bits(), 0x0E);
        assert_eq!(config.irq_flags(), StatusFlags::new());
    }

    #[test]
    fn config_crc() {
        let config = ConfigReg::default().with_crc_length(CrcLength::Bit8);
        assert_eq!(config.into_bits(), 0x08);
        assert_eq!(config.crc_length(), CrcLength::Bit8);
        let config = config.with_crc_length(CrcLength::Disabled);
        assert_eq!(config.into_bits(), 0);
        assert!(ConfigReg::from_bits(0x04).is_corrupted());
        assert!(!ConfigReg::from_bits(0x0C).is_corrupted());
    }

    #[test]
    fn config_irq_masks() {
        let flags = StatusFlags::default().with_rx_dr(true);
        let config = ConfigReg::default().with_irq_flags(flags);
        // tx_ds and max_rt masked
        assert_eq!(config.into_bits(), 0x3C);
        assert_eq!(config.irq_flags(), flags);
    }

    #[test]
    fn retries() {
        assert_eq!(SetupRetr::default().into_bits(), 0x5F);
        let retr = SetupRetr::new().with_ard(2).with_arc(3);
        assert_eq!(retr.into_bits(), 0x23);
    }

    #[test]
    fn rf_setup() {
        let rf = RfSetup::default();
        assert_eq!(rf.into_bits(), 0x07);
        assert_eq!(rf.data_rate(), Some(DataRate::Mbps1));
        assert_eq!(rf.pa_level(), PaLevel::Max);

        let rf = rf.with_data_rate(DataRate::Kbps250).with_pa_level(PaLevel::Low);
        assert_eq!(rf.into_bits(), 0x23);
        assert_eq!(rf.data_rate(), Some(DataRate::Kbps250));

        let rf = rf.with_data_rate(DataRate::Mbps2);
        assert_eq!(rf.into_bits(), 0x0B);
        assert_eq!(RfSetup::from_bits(0x28).data_rate(), None);
    }

    #[test]
    fn feature_bits() {
        let feature = FeatureReg::default().with_en_dpl(true).with_en_ack_pay(true);
        assert_eq!(feature.into_bits(), 6);
        assert!(FeatureReg::from_bits(1).en_dyn_ack());
    }

    #[test]
    fn fifo_states() {
        let fifo = FifoStatus::from_bits(0x11);
        assert_eq!(fifo.tx_state(), FifoState::Empty);
        assert_eq!(fifo.rx_state(), FifoState::Empty);
        let fifo = FifoStatus::from_bits(0x22);
        assert_eq!(fifo.tx_state(), FifoState::Full);
        assert_eq!(fifo.rx_state(), FifoState::Full);
        let fifo = FifoStatus::from_bits(0);
        assert_eq!(fifo.tx_state(), FifoState::PartiallyFull);
        assert_eq!(fifo.rx_state(), FifoState::PartiallyFull);
    }

    #[test]
    fn observe_tx() {
        let observed = ObserveTx::from_bits(0x2F);
        assert_eq!(observed.plos_cnt(), 2);
        assert_eq!(observed.arc_cnt(), 15);
    }
}
