//! Errors emitted by the radio driver.
//!
//! Transport errors ([`RadioError::Spi`] and [`RadioError::Gpio`]) come from
//! the embedded-hal implementations and are always returned immediately.
//! The other variants describe a misuse of the driver or a radio that
//! does not answer like an nRF24L01.

use core::fmt::{Display, Formatter, Result};

use crate::RadioMode;

/// A combination of settings that the radio cannot honor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigConflict {
    /// ACK payloads were requested while pipe 0 uses static payload lengths.
    AckPayloadsRequireDynamicPayloads,
    /// ACK payloads were requested while auto-ack is disabled on pipe 0.
    AckPayloadsRequireAutoAck,
}

impl Display for ConfigConflict {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.write_str(match self {
            ConfigConflict::AckPayloadsRequireDynamicPayloads => {
                "ACK payloads require dynamic payloads"
            }
            ConfigConflict::AckPayloadsRequireAutoAck => "ACK payloads require auto-ack",
        })
    }
}

/// The error type returned by every fallible [`RadioHandle`](crate::radio::RadioHandle) method.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RadioError<SPI, DO> {
    /// The SPI bus failed.
    Spi(SPI),
    /// The CE pin failed.
    Gpio(DO),
    /// The operation is not allowed in the radio's current mode.
    InvalidState(RadioMode),
    /// All 3 levels of the TX FIFO are occupied.
    FifoFull,
    /// The requested settings contradict each other.
    ConfigConflict(ConfigConflict),
    /// A register was read back with a value the radio never produces.
    ///
    /// This usually means the SPI bus is miswired or the radio is not powered.
    BinaryCorruption,
}

impl<SPI, DO> RadioError<SPI, DO> {
    /// Is this error caused by the SPI bus or the CE pin?
    pub fn is_transport(&self) -> bool {
        matches!(self, RadioError::Spi(_) | RadioError::Gpio(_))
    }
}

impl<SPI, DO> From<ConfigConflict> for RadioError<SPI, DO> {
    fn from(value: ConfigConflict) -> Self {
        RadioError::ConfigConflict(value)
    }
}

impl<SPI, DO> Display for RadioError<SPI, DO> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            RadioError::Spi(_) => f.write_str("SPI transaction failed"),
            RadioError::Gpio(_) => f.write_str("CE pin failed"),
            RadioError::InvalidState(mode) => write!(f, "not allowed in {mode} mode"),
            RadioError::FifoFull => f.write_str("TX FIFO is full"),
            RadioError::ConfigConflict(conflict) => write!(f, "{conflict}"),
            RadioError::BinaryCorruption => f.write_str("register value is corrupted"),
        }
    }
}

#[cfg(feature = "defmt")]
impl<SPI, DO> defmt::Format for RadioError<SPI, DO> {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            RadioError::Spi(_) => defmt::write!(fmt, "SPI transaction failed"),
            RadioError::Gpio(_) => defmt::write!(fmt, "CE pin failed"),
            RadioError::InvalidState(mode) => defmt::write!(fmt, "not allowed in {} mode", mode),
            RadioError::FifoFull => defmt::write!(fmt, "TX FIFO is full"),
            RadioError::ConfigConflict(conflict) => defmt::write!(fmt, "{}", conflict),
            RadioError::BinaryCorruption => defmt::write!(fmt, "register value is corrupted"),
        }
    }
}

#[cfg(feature = "std")]
impl<SPI: core::fmt::Debug, DO: core::fmt::Debug> std::error::Error for RadioError<SPI, DO> {}
