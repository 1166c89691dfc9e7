#![doc = include_str!("../README.md")]
//!
//! ## Basic API
//!
//! - [`RadioHandle::new()`](fn@crate::radio::RadioHandle::new)
//! - [`RadioHandle::begin()`](radio/struct.RadioHandle.html#method.begin)
//! - [`RadioHandle::is_rx()`](radio/struct.RadioHandle.html#method.is_rx)
//! - [`RadioHandle::as_rx()`](radio/struct.RadioHandle.html#method.as_rx)
//! - [`RadioHandle::as_tx()`](radio/struct.RadioHandle.html#method.as_tx)
//! - [`RadioHandle::open_tx_pipe()`](radio/struct.RadioHandle.html#method.open_tx_pipe)
//! - [`RadioHandle::open_rx_pipe()`](radio/struct.RadioHandle.html#method.open_rx_pipe)
//! - [`RadioHandle::close_rx_pipe()`](radio/struct.RadioHandle.html#method.close_rx_pipe)
//! - [`RadioHandle::available()`](radio/struct.RadioHandle.html#method.available)
//! - [`RadioHandle::available_pipe()`](radio/struct.RadioHandle.html#method.available_pipe)
//! - [`RadioHandle::wait_available()`](radio/struct.RadioHandle.html#method.wait_available)
//! - [`RadioHandle::read()`](radio/struct.RadioHandle.html#method.read)
//! - [`RadioHandle::send()`](radio/struct.RadioHandle.html#method.send)
//! - [`RadioHandle::resend()`](radio/struct.RadioHandle.html#method.resend)
//! - [`RadioHandle::set_channel()`](radio/struct.RadioHandle.html#method.set_channel)
//! - [`RadioHandle::get_channel()`](radio/struct.RadioHandle.html#method.get_channel)
//!
//! ## Advanced API
//!
//! - [`RadioHandle::write_ack_payload()`](radio/struct.RadioHandle.html#method.write_ack_payload)
//! - [`RadioHandle::write()`](radio/struct.RadioHandle.html#method.write)
//! - [`RadioHandle::rewrite()`](radio/struct.RadioHandle.html#method.rewrite)
//! - [`RadioHandle::resend_bounded()`](radio/struct.RadioHandle.html#method.resend_bounded)
//! - [`RadioHandle::get_fifo_state()`](radio/struct.RadioHandle.html#method.get_fifo_state)
//! - [`RadioHandle::clear_status_flags()`](radio/struct.RadioHandle.html#method.clear_status_flags)
//! - [`RadioHandle::update()`](radio/struct.RadioHandle.html#method.update)
//! - [`RadioHandle::get_status_flags()`](radio/struct.RadioHandle.html#method.get_status_flags)
//! - [`RadioHandle::wait_for_irq()`](fn@crate::radio::RadioHandle::wait_for_irq)
//! - [`RadioHandle::flush_rx()`](radio/struct.RadioHandle.html#method.flush_rx)
//! - [`RadioHandle::flush_tx()`](radio/struct.RadioHandle.html#method.flush_tx)
//! - [`RadioHandle::start_carrier_wave()`](fn@crate::radio::RadioHandle::start_carrier_wave)
//! - [`RadioHandle::stop_carrier_wave()`](fn@crate::radio::RadioHandle::stop_carrier_wave)
//! - [`RadioHandle::rpd()`](fn@crate::radio::RadioHandle::rpd)
//! - [`RadioHandle::get_last_arc()`](radio/struct.RadioHandle.html#method.get_last_arc)
//! - [`RadioHandle::get_dynamic_payload_length()`](radio/struct.RadioHandle.html#method.get_dynamic_payload_length)
//! - [`RadioHandle::details()`](fn@crate::radio::RadioHandle::details)
//!
//! ## Configuration API
//!
//! - [`RadioHandle::with_config()`](radio/struct.RadioHandle.html#method.with_config)
//! - [`RadioHandle::set_status_flags()`](radio/struct.RadioHandle.html#method.set_status_flags)
//! - [`RadioHandle::set_auto_ack()`](radio/struct.RadioHandle.html#method.set_auto_ack)
//! - [`RadioHandle::set_auto_ack_pipe()`](radio/struct.RadioHandle.html#method.set_auto_ack_pipe)
//! - [`RadioHandle::set_auto_retries()`](radio/struct.RadioHandle.html#method.set_auto_retries)
//! - [`RadioHandle::set_dynamic_payloads()`](radio/struct.RadioHandle.html#method.set_dynamic_payloads)
//! - [`RadioHandle::allow_ask_no_ack()`](radio/struct.RadioHandle.html#method.allow_ask_no_ack)
//! - [`RadioHandle::set_ack_payloads()`](radio/struct.RadioHandle.html#method.set_ack_payloads)
//! - [`RadioHandle::set_address_length()`](radio/struct.RadioHandle.html#method.set_address_length)
//! - [`RadioHandle::get_address_length()`](radio/struct.RadioHandle.html#method.get_address_length)
//! - [`RadioHandle::set_payload_length()`](radio/struct.RadioHandle.html#method.set_payload_length)
//! - [`RadioHandle::get_payload_length()`](radio/struct.RadioHandle.html#method.get_payload_length)
//! - [`RadioHandle::set_data_rate()`](radio/struct.RadioHandle.html#method.set_data_rate)
//! - [`RadioHandle::get_data_rate()`](radio/struct.RadioHandle.html#method.get_data_rate)
//! - [`RadioHandle::set_pa_level()`](radio/struct.RadioHandle.html#method.set_pa_level)
//! - [`RadioHandle::get_pa_level()`](radio/struct.RadioHandle.html#method.get_pa_level)
//! - [`RadioHandle::set_lna()`](fn@crate::radio::RadioHandle::set_lna)
//! - [`RadioHandle::set_crc_length()`](radio/struct.RadioHandle.html#method.set_crc_length)
//! - [`RadioHandle::get_crc_length()`](radio/struct.RadioHandle.html#method.get_crc_length)
//! - [`RadioHandle::is_powered()`](radio/struct.RadioHandle.html#method.is_powered)
//! - [`RadioHandle::power_up()`](radio/struct.RadioHandle.html#method.power_up)
//! - [`RadioHandle::power_down()`](radio/struct.RadioHandle.html#method.power_down)
//! - [`RadioHandle::tx_delay`](value@crate::radio::RadioHandle::tx_delay)
//! - [`RadioHandle::tx_timeout`](value@crate::radio::RadioHandle::tx_timeout)
//! - [`RadioHandle::is_plus_variant()`](fn@crate::radio::RadioHandle::is_plus_variant)
//!
#![no_std]

#[cfg(feature = "std")]
extern crate std;

mod types;
pub use types::{CrcLength, DataRate, FifoState, PaLevel, PayloadLength, RadioMode, StatusFlags};
mod error;
pub use error::{ConfigConflict, RadioError};
mod log;
pub mod radio;

#[cfg(test)]
mod test {
    use crate::radio::RadioHandle;
    use embedded_hal_mock::eh1::{
        delay::NoopDelay,
        digital::{Mock as PinMock, Transaction as PinTransaction},
        spi::{Mock as SpiMock, Transaction as SpiTransaction},
    };

    /// Takes an indefinite repetition of a tuple of 2 vectors: `(expected_data, response_data)`
    /// and generates an array of `SpiTransaction`s.
    ///
    /// NOTE: This macro is only used to generate code in unit tests (for this crate only).
    #[macro_export]
    macro_rules! spi_test_expects {
        ($( ($expected:expr , $response:expr $(,)? ) , ) + ) => {
            [
                $(
                    SpiTransaction::transaction_start(),
                    SpiTransaction::transfer_in_place($expected, $response),
                    SpiTransaction::transaction_end(),
                )*
            ]
        }
    }

    /// The mocked [`RadioHandle`] and clones of the mocks it owns.
    pub struct MockRadio(
        pub RadioHandle<SpiMock<u8>, PinMock, NoopDelay>,
        pub SpiMock<u8>,
        pub PinMock,
    );

    /// Create mock objects using the given expectations.
    pub fn mk_radio(
        ce_expectations: &[PinTransaction],
        spi_expectations: &[SpiTransaction<u8>],
    ) -> MockRadio {
        let spi = SpiMock::new(spi_expectations);
        let ce_pin = PinMock::new(ce_expectations);
        let radio = RadioHandle::new(ce_pin.clone(), spi.clone(), NoopDelay);
        MockRadio(radio, spi, ce_pin)
    }
}
