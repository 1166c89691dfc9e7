//! The traits that make up the radio's application surface.
//!
//! Import them all at once:
//!
//! ```ignore
//! use nrf24::radio::prelude::*;
//! ```
//!
//! Every trait shares a single error type through [`EsbErrorType`],
//! so one `?` works across all of them.

use crate::types::{CrcLength, DataRate, FifoState, PaLevel, RadioMode, StatusFlags};

use super::RadioConfig;

/// The error type shared by all `Esb*` traits.
pub trait EsbErrorType {
    type Error;
}

/// Bringing the radio into a known state.
pub trait EsbInit: EsbErrorType {
    /// Reset the radio to [`RadioConfig::default()`] and leave it in Standby mode.
    ///
    /// Call this once before anything else. Waits 5 ms for the radio's
    /// power-on reset first.
    fn begin(&mut self) -> Result<(), Self::Error>;

    /// Apply all settings in `config`.
    ///
    /// The radio is powered down (and both FIFOs flushed) while registers are
    /// written, then powered up again in Standby TX mode.
    /// Conflicting settings are rejected before any register is touched.
    fn with_config(&mut self, config: &RadioConfig) -> Result<(), Self::Error>;
}

/// Power state control.
pub trait EsbPower: EsbErrorType {
    /// Power up the radio into Standby mode.
    ///
    /// `delay` is the settle time in microseconds; `None` uses 5000 µs.
    /// With `Some(0)` the caller must wait at least 1.5 ms before
    /// transmitting or receiving.
    fn power_up(&mut self, delay: Option<u32>) -> Result<(), Self::Error>;

    /// Power down the radio. Registers keep their values but the cached
    /// status flags are reset.
    fn power_down(&mut self) -> Result<(), Self::Error>;

    fn is_powered(&self) -> bool;

    /// Shortcut for [`EsbPower::power_up(None)`](EsbPower::power_up) or [`EsbPower::power_down()`].
    fn power(&mut self, enable: bool) -> Result<(), Self::Error> {
        if enable {
            self.power_up(None)
        } else {
            self.power_down()
        }
    }
}

/// Mode transitions, transmitting and receiving.
pub trait EsbRadio: EsbErrorType {
    /// Enter active RX mode.
    ///
    /// Pipe 0's RX address (if opened with [`EsbPipe::open_rx_pipe()`]) is restored.
    fn as_rx(&mut self) -> Result<(), Self::Error>;

    /// Enter Standby TX mode.
    ///
    /// Pipe 0 gets the TX address back so that ACK packets can be received.
    /// The TX FIFO is flushed if ACK payloads are enabled.
    fn as_tx(&mut self) -> Result<(), Self::Error>;

    /// Is the radio configured for RX mode?
    fn is_rx(&self) -> bool;

    /// The current [`RadioMode`].
    fn mode(&self) -> RadioMode;

    /// Transmit one payload and block until it is sent or failed.
    ///
    /// Returns `Ok(false)` if the payload was not acknowledged within the
    /// auto-retry budget, or if no result arrived within `tx_timeout`.
    /// A failed payload stays in the TX FIFO; see [`EsbRadio::resend()`].
    ///
    /// `ask_no_ack` only has an effect if enabled by
    /// [`EsbAutoAck::allow_ask_no_ack()`].
    fn send(&mut self, buf: &[u8], ask_no_ack: bool) -> Result<bool, Self::Error>;

    /// Upload one payload into the TX FIFO without waiting.
    ///
    /// Fails with a FIFO-full error if the TX FIFO already holds 3 payloads.
    /// When `start_tx` is `true` the CE pin is left active so the payload
    /// is transmitted right away.
    fn write(&mut self, buf: &[u8], ask_no_ack: bool, start_tx: bool)
        -> Result<(), Self::Error>;

    /// Retransmit the failed payload at the top of the TX FIFO and block
    /// until it is sent or failed.
    fn resend(&mut self) -> Result<bool, Self::Error>;

    /// Call [`EsbRadio::resend()`] until it succeeds, at most `max_attempts` times.
    fn resend_bounded(&mut self, max_attempts: u16) -> Result<bool, Self::Error> {
        for _ in 0..max_attempts {
            if self.resend()? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Restart transmission of the failed payload without blocking.
    ///
    /// The payload is reused in place, so repeated calls never duplicate it.
    fn rewrite(&mut self) -> Result<(), Self::Error>;

    /// The number of retries needed by the last transmission.
    fn get_last_arc(&mut self) -> Result<u8, Self::Error>;

    /// Pop one payload from the RX FIFO into `buf` and return its length.
    ///
    /// With `len = None` the length is the payload's dynamic length or the
    /// static length of the pipe it arrived on. The result is also limited
    /// by `buf.len()`. Returns `0` if the RX FIFO is empty.
    fn read(&mut self, buf: &mut [u8], len: Option<u8>) -> Result<u8, Self::Error>;
}

/// The 3-level RX and TX FIFOs.
pub trait EsbFifo: EsbErrorType {
    fn flush_rx(&mut self) -> Result<(), Self::Error>;

    fn flush_tx(&mut self) -> Result<(), Self::Error>;

    /// `about_tx = true` describes the TX FIFO, `false` the RX FIFO.
    fn get_fifo_state(&mut self, about_tx: bool) -> Result<FifoState, Self::Error>;

    /// Is there a payload in the RX FIFO?
    fn available(&mut self) -> Result<bool, Self::Error>;

    /// Like [`EsbFifo::available()`] but also tells which pipe received
    /// the payload at the top of the RX FIFO.
    fn available_pipe(&mut self) -> Result<Option<u8>, Self::Error>;

    /// Poll [`EsbFifo::available_pipe()`] until a payload arrives or
    /// `timeout` (in microseconds) elapses.
    fn wait_available(&mut self, timeout: u32) -> Result<Option<u8>, Self::Error>;
}

/// The STATUS register and IRQ configuration.
pub trait EsbStatus: EsbErrorType {
    /// The flags cached from the latest SPI transaction.
    fn get_status_flags(&self) -> StatusFlags;

    /// Choose which events assert the IRQ pin (`true` means enabled).
    fn set_status_flags(&mut self, flags: StatusFlags) -> Result<(), Self::Error>;

    /// Clear the events set to `true` in `flags`. Others are left untouched.
    fn clear_status_flags(&mut self, flags: StatusFlags) -> Result<(), Self::Error>;

    /// Refresh the cached status with a NOP transaction.
    fn update(&mut self) -> Result<(), Self::Error>;
}

/// Pipe addresses.
pub trait EsbPipe: EsbErrorType {
    /// Open a RX `pipe` (0 - 5) with the given `address`.
    ///
    /// Pipes 2 - 5 only use `address[0]`; the other bytes come from pipe 1.
    /// The address of pipe 0 is cached and restored by [`EsbRadio::as_rx()`],
    /// because TX mode borrows pipe 0 for receiving ACK packets.
    ///
    /// Invalid pipe numbers and empty addresses are ignored.
    fn open_rx_pipe(&mut self, pipe: u8, address: &[u8]) -> Result<(), Self::Error>;

    /// Set the TX address (also used by pipe 0 in TX mode).
    fn open_tx_pipe(&mut self, address: &[u8]) -> Result<(), Self::Error>;

    fn close_rx_pipe(&mut self, pipe: u8) -> Result<(), Self::Error>;

    /// Set the address length of all pipes, clamped to range [3, 5].
    fn set_address_length(&mut self, length: u8) -> Result<(), Self::Error>;

    fn get_address_length(&mut self) -> Result<u8, Self::Error>;

    /// Read the address of a RX `pipe` from the radio into `address`.
    ///
    /// Returns the number of bytes copied.
    fn get_rx_address(&mut self, pipe: u8, address: &mut [u8]) -> Result<u8, Self::Error>;

    /// Read the TX address from the radio into `address`.
    fn get_tx_address(&mut self, address: &mut [u8]) -> Result<u8, Self::Error>;
}

/// Static and dynamic payload lengths.
pub trait EsbPayloadLength: EsbErrorType {
    /// Set the static payload length of all pipes, clamped to range [1, 32].
    fn set_payload_length(&mut self, length: u8) -> Result<(), Self::Error>;

    /// The static payload length of pipe 0.
    fn get_payload_length(&mut self) -> Result<u8, Self::Error>;

    /// Enable or disable dynamic payload lengths on all pipes.
    ///
    /// Disabling is rejected while ACK payloads are enabled.
    fn set_dynamic_payloads(&mut self, enable: bool) -> Result<(), Self::Error>;

    fn get_dynamic_payloads(&self) -> bool;

    /// The length of the payload at the top of the RX FIFO.
    fn get_dynamic_payload_length(&mut self) -> Result<u8, Self::Error>;
}

/// Automatic acknowledgement and retries.
pub trait EsbAutoAck: EsbErrorType {
    /// Enable or disable custom ACK payloads.
    ///
    /// Enabling is rejected unless dynamic payloads are enabled.
    fn set_ack_payloads(&mut self, enable: bool) -> Result<(), Self::Error>;

    fn get_ack_payloads(&self) -> bool;

    /// Enable or disable auto-ack on all pipes.
    ///
    /// Disabling is rejected while ACK payloads are enabled.
    fn set_auto_ack(&mut self, enable: bool) -> Result<(), Self::Error>;

    /// Enable or disable auto-ack on a single `pipe`.
    fn set_auto_ack_pipe(&mut self, enable: bool, pipe: u8) -> Result<(), Self::Error>;

    /// Allow the `ask_no_ack` parameter of [`EsbRadio::send()`] and [`EsbRadio::write()`].
    fn allow_ask_no_ack(&mut self, enable: bool) -> Result<(), Self::Error>;

    /// Load an ACK payload for the next packet received on `pipe`.
    ///
    /// Returns `false` if ACK payloads are disabled or `pipe` is invalid.
    /// Fails with [`RadioError::InvalidState`](crate::RadioError::InvalidState)
    /// while powered down.
    /// The payload must be loaded before the packet arrives, otherwise the
    /// packet is acknowledged with an empty ACK.
    fn write_ack_payload(&mut self, pipe: u8, buf: &[u8]) -> Result<bool, Self::Error>;

    /// Set the auto-retry `delay` (`(delay + 1) * 250` µs) and `count`.
    ///
    /// Both values are clamped to range [0, 15].
    fn set_auto_retries(&mut self, delay: u8, count: u8) -> Result<(), Self::Error>;
}

/// Radio frequency settings.
pub trait EsbRf: EsbErrorType {
    /// Set the channel, clamped to range [0, 125] (2400 MHz + channel).
    fn set_channel(&mut self, channel: u8) -> Result<(), Self::Error>;

    fn get_channel(&mut self) -> Result<u8, Self::Error>;

    fn set_pa_level(&mut self, level: PaLevel) -> Result<(), Self::Error>;

    fn get_pa_level(&mut self) -> Result<PaLevel, Self::Error>;

    /// Also updates the RX-to-TX settle delay to match the new rate.
    fn set_data_rate(&mut self, data_rate: DataRate) -> Result<(), Self::Error>;

    fn get_data_rate(&mut self) -> Result<DataRate, Self::Error>;

    fn set_crc_length(&mut self, length: CrcLength) -> Result<(), Self::Error>;

    fn get_crc_length(&mut self) -> Result<CrcLength, Self::Error>;
}

/// Debugging output.
pub trait EsbDetails: EsbErrorType {
    /// Print all settings to stdout (`std` feature) or the defmt logger
    /// (`defmt` feature). Does nothing otherwise.
    fn print_details(&mut self) -> Result<(), Self::Error>;
}
