//! Value types shared by the driver traits and [`RadioConfig`](crate::radio::RadioConfig).
//!
//! None of these types touch the hardware; they only describe register values.

use core::fmt::{Display, Formatter, Result};

use bitfield_struct::bitfield;

/// Power Amplifier level.
///
/// The units dBm (decibel-milliwatts) describe the output power of the
/// nRF24L01. Si24R1 clones output slightly more and depend on the LNA setting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PaLevel {
    /// -18 dBm
    Min,
    /// -12 dBm
    Low,
    /// -6 dBm
    High,
    /// 0 dBm
    Max,
}

impl PaLevel {
    /// The value of the 2-bit `RF_PWR` field in the `RF_SETUP` register.
    pub(crate) const fn into_bits(self) -> u8 {
        match self {
            PaLevel::Min => 0,
            PaLevel::Low => 1,
            PaLevel::High => 2,
            PaLevel::Max => 3,
        }
    }

    pub(crate) const fn from_bits(value: u8) -> Self {
        match value & 3 {
            0 => PaLevel::Min,
            1 => PaLevel::Low,
            2 => PaLevel::High,
            _ => PaLevel::Max,
        }
    }

    /// The nominal output power (in dBm) of an nRF24L01 at this level.
    pub const fn dbm(self) -> i8 {
        match self {
            PaLevel::Min => -18,
            PaLevel::Low => -12,
            PaLevel::High => -6,
            PaLevel::Max => 0,
        }
    }

    const fn as_str(&self) -> &'static str {
        match self {
            PaLevel::Min => "Min",
            PaLevel::Low => "Low",
            PaLevel::High => "High",
            PaLevel::Max => "Max",
        }
    }
}

impl Display for PaLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.write_str(self.as_str())
    }
}

/// How fast data moves through the air. Units are in bits per second (bps).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataRate {
    /// 1 Mbps
    Mbps1,
    /// 2 Mbps
    Mbps2,
    /// 250 Kbps (not supported by the non-plus nRF24L01)
    Kbps250,
}

impl DataRate {
    /// The time (in microseconds) needed to switch from RX mode to TX mode.
    ///
    /// This covers the worst case of an outgoing automatic ACK still on air.
    pub const fn tx_delay(self) -> u32 {
        match self {
            DataRate::Mbps1 => 280,
            DataRate::Mbps2 => 240,
            DataRate::Kbps250 => 505,
        }
    }

    const fn as_str(&self) -> &'static str {
        match self {
            DataRate::Mbps1 => "1 Mbps",
            DataRate::Mbps2 => "2 Mbps",
            DataRate::Kbps250 => "250 Kbps",
        }
    }
}

impl Display for DataRate {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.write_str(self.as_str())
    }
}

/// The length of a CRC checksum that is used (if any).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CrcLength {
    /// No CRC checksum is used.
    Disabled,
    /// A 1 byte checksum.
    Bit8,
    /// A 2 byte checksum.
    Bit16,
}

impl Display for CrcLength {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.write_str(match self {
            CrcLength::Disabled => "disabled",
            CrcLength::Bit8 => "8 bit",
            CrcLength::Bit16 => "16 bit",
        })
    }
}

/// The occupancy of a 3-level hardware FIFO.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FifoState {
    /// No payloads are stored.
    Empty,
    /// All 3 levels are occupied.
    Full,
    /// 1 or 2 levels are occupied.
    PartiallyFull,
}

impl Display for FifoState {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.write_str(match self {
            FifoState::Empty => "Empty",
            FifoState::Full => "Full",
            FifoState::PartiallyFull => "Partially Full",
        })
    }
}

/// The operating mode of the radio.
///
/// ```text
/// PowerDown -> Standby -> ActiveTx | ActiveRx -> Standby -> PowerDown
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RadioMode {
    /// The oscillator is stopped. Registers keep their values.
    PowerDown,
    /// Powered up with the CE pin inactive.
    Standby,
    /// Transmitting (or ready to transmit) with the CE pin active.
    ActiveTx,
    /// Listening with the CE pin active.
    ActiveRx,
}

impl Display for RadioMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.write_str(match self {
            RadioMode::PowerDown => "Power Down",
            RadioMode::Standby => "Standby",
            RadioMode::ActiveTx => "Active TX",
            RadioMode::ActiveRx => "Active RX",
        })
    }
}

/// How the length of a payload is determined for a pipe.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PayloadLength {
    /// The length is transmitted with each payload (up to 32 bytes).
    Dynamic,
    /// Every payload has exactly this many bytes (1 to 32).
    Static(u8),
}

impl Display for PayloadLength {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            PayloadLength::Dynamic => f.write_str("dynamic"),
            PayloadLength::Static(len) => write!(f, "{len} bytes"),
        }
    }
}

/// The interrupt events reported by the STATUS register.
///
/// Every SPI transaction clocks out the STATUS register, so the driver keeps
/// a cached copy that is refreshed for free.
///
/// ```ignore
/// let flags = StatusFlags::default().with_rx_dr(true); // only rx_dr asserted
/// let all = StatusFlags::new(); // every flag asserted
/// ```
#[bitfield(u8, new = false, order = Msb)]
#[derive(PartialEq, Eq)]
pub struct StatusFlags {
    #[bits(1)]
    _reserved: u8,

    /// RX data ready: a payload has arrived in the RX FIFO.
    pub rx_dr: bool,

    /// TX data sent: a payload was transmitted (and acknowledged if auto-ack is on).
    pub tx_ds: bool,

    /// TX data failed: the auto-retry budget ran out without an ACK.
    pub tx_df: bool,

    /// The pipe number of the payload at the top of the RX FIFO (7 if empty).
    #[bits(3, access = RO)]
    pub(crate) rx_pipe: u8,

    #[bits(1, access = RO)]
    pub(crate) tx_full: bool,
}

impl StatusFlags {
    /// The IRQ event bits in both STATUS and CONFIG registers.
    pub(crate) const IRQ_MASK: u8 = 0x70;

    /// Like [`StatusFlags::default()`] but with all 3 event flags asserted.
    pub const fn new() -> Self {
        Self::from_bits(Self::IRQ_MASK)
    }

    /// Only the event flags (no pipe number or TX_FULL bit).
    pub(crate) const fn events(self) -> u8 {
        self.into_bits() & Self::IRQ_MASK
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for StatusFlags {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "rx_dr: {}, tx_ds: {}, tx_df: {}",
            self.rx_dr(),
            self.tx_ds(),
            self.tx_df()
        )
    }
}

impl Display for StatusFlags {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(
            f,
            "rx_dr: {}, tx_ds: {}, tx_df: {}",
            self.rx_dr(),
            self.tx_ds(),
            self.tx_df()
        )
    }
}
