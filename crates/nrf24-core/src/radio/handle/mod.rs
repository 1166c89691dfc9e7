use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
    spi::SpiDevice,
};

mod auto_ack;
mod details;
mod fifo;
mod init;
mod payload_length;
mod pipe;
mod power;
mod radio;
mod rf;
mod status;
pub use details::RadioDetails;

use super::prelude::{EsbErrorType, EsbFifo, EsbPower, EsbRadio, EsbRf, EsbStatus};
use super::register_map::{commands, registers, ConfigReg, FeatureReg, RfSetup};
use crate::{CrcLength, DataRate, PaLevel, RadioError, RadioMode, StatusFlags};

/// Settle time after setting PWR_UP, covering the slowest (non-plus) radios.
const POWER_UP_DELAY_US: u32 = 5000;
/// Minimum time the CE pin must stay active to start a transmission.
const CE_PULSE_US: u32 = 10;
/// Time between polls in blocking calls.
const POLL_INTERVAL_US: u32 = 50;

/// A driver for one nRF24L01 radio.
///
/// The handle owns the SPI device (which also owns the CSN pin), the CE pin
/// and a delay provider. It implements the [`Esb*` traits](mod@crate::radio::prelude).
///
/// The STATUS byte clocked out by every SPI transaction is cached, so
/// [`EsbStatus::get_status_flags()`] never touches the bus.
pub struct RadioHandle<SPI, DO, DELAY> {
    /// The time (in microseconds) [`EsbRadio::as_tx()`] waits for an
    /// outgoing ACK packet to finish before leaving RX mode.
    ///
    /// It is updated by [`EsbRf::set_data_rate()`]. Set a custom value
    /// only *after* changing the data rate.
    pub tx_delay: u32,
    /// The longest time (in microseconds) [`EsbRadio::send()`] and
    /// [`EsbRadio::resend()`] wait for a transmission result.
    ///
    /// This only guards against a radio that stopped responding; the
    /// auto-retry settings normally end a transmission much sooner.
    pub tx_timeout: u32,
    spi: SPI,
    ce_pin: DO,
    delay_impl: DELAY,
    buf: [u8; 33],
    status: StatusFlags,
    config_reg: ConfigReg,
    feature: FeatureReg,
    ce_active: bool,
    plus_variant: bool,
    address_length: u8,
    tx_address: [u8; 5],
    pipe0_rx_addr: Option<[u8; 5]>,
    payload_lengths: [u8; 6],
    dynamic_pipes: u8,
}

impl<SPI, DO, DELAY> EsbErrorType for RadioHandle<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    type Error = RadioError<SPI::Error, DO::Error>;
}

impl<SPI, DO, DELAY> RadioHandle<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    /// Create a handle for the radio on `spi` with the given `ce_pin`.
    ///
    /// Nothing is sent to the radio until
    /// [`EsbInit::begin()`](fn@crate::radio::prelude::EsbInit::begin) is called.
    pub fn new(ce_pin: DO, spi: SPI, delay_impl: DELAY) -> RadioHandle<SPI, DO, DELAY> {
        RadioHandle {
            tx_delay: DataRate::Mbps1.tx_delay(),
            tx_timeout: 100_000,
            spi,
            ce_pin,
            delay_impl,
            buf: [0u8; 33],
            status: StatusFlags::from_bits(0),
            // 16 bit CRC, all IRQ events enabled, powered down as TX
            config_reg: ConfigReg::default(),
            feature: FeatureReg::new(),
            ce_active: false,
            plus_variant: true,
            address_length: 5,
            tx_address: [0xE7; 5],
            pipe0_rx_addr: None,
            payload_lengths: [32; 6],
            dynamic_pipes: 0,
        }
    }

    fn transfer(&mut self, len: usize) -> Result<(), RadioError<SPI::Error, DO::Error>> {
        self.spi
            .transfer_in_place(&mut self.buf[..len])
            .map_err(RadioError::Spi)?;
        self.status = StatusFlags::from_bits(self.buf[0]);
        Ok(())
    }

    /// Send `command` followed by `len` zero bytes.
    ///
    /// The clocked-in bytes are left in `self.buf[1..=len]`.
    /// With `len = 0` this sends a single byte command:
    /// ```ignore
    /// self.read_buf(commands::NOP, 0)?; // only refreshes self.status
    /// ```
    fn read_buf(&mut self, command: u8, len: usize) -> Result<(), RadioError<SPI::Error, DO::Error>> {
        self.buf[0] = command;
        self.buf[1..=len].fill(0);
        self.transfer(len + 1)
    }

    fn read_reg(&mut self, reg: u8) -> Result<u8, RadioError<SPI::Error, DO::Error>> {
        self.read_buf(reg, 1)?;
        Ok(self.buf[1])
    }

    fn write_reg(&mut self, reg: u8, value: u8) -> Result<(), RadioError<SPI::Error, DO::Error>> {
        self.buf[0] = reg | commands::W_REGISTER;
        self.buf[1] = value;
        self.transfer(2)
    }

    fn write_reg_buf(&mut self, reg: u8, buf: &[u8]) -> Result<(), RadioError<SPI::Error, DO::Error>> {
        self.write_command_buf(reg | commands::W_REGISTER, buf)
    }

    /// Send `command` followed by (up to 32 bytes of) `buf`.
    fn write_command_buf(
        &mut self,
        command: u8,
        buf: &[u8],
    ) -> Result<(), RadioError<SPI::Error, DO::Error>> {
        let len = buf.len().min(32);
        self.buf[0] = command;
        self.buf[1..=len].copy_from_slice(&buf[..len]);
        self.transfer(len + 1)
    }

    fn set_ce(&mut self, active: bool) -> Result<(), RadioError<SPI::Error, DO::Error>> {
        if active {
            self.ce_pin.set_high()
        } else {
            self.ce_pin.set_low()
        }
        .map_err(RadioError::Gpio)?;
        self.ce_active = active;
        Ok(())
    }

    /// Unlock FEATURE, DYNPD and the related commands on non-plus radios.
    ///
    /// The same command locks them again, and plus variants ignore it.
    fn toggle_features(&mut self) -> Result<(), RadioError<SPI::Error, DO::Error>> {
        self.write_command_buf(commands::ACTIVATE, &[commands::ACTIVATE_KEY])
    }

    fn require_powered(&self) -> Result<(), RadioError<SPI::Error, DO::Error>> {
        if self.config_reg.pwr_up() {
            Ok(())
        } else {
            Err(RadioError::InvalidState(RadioMode::PowerDown))
        }
    }

    fn require_tx(&self) -> Result<(), RadioError<SPI::Error, DO::Error>> {
        self.require_powered()?;
        if self.config_reg.prim_rx() {
            Err(RadioError::InvalidState(self.mode()))
        } else {
            Ok(())
        }
    }

    /// Is this radio a nRF24L01+ variant?
    ///
    /// Only valid after [`EsbInit::begin()`](fn@crate::radio::prelude::EsbInit::begin).
    pub fn is_plus_variant(&self) -> bool {
        self.plus_variant
    }

    /// Is the CE pin currently active?
    pub fn ce_active(&self) -> bool {
        self.ce_active
    }

    /// Received Power Detector.
    ///
    /// `true` if a signal stronger than -64 dBm was present on the channel
    /// during the last 40 µs of RX mode.
    pub fn rpd(&mut self) -> Result<bool, RadioError<SPI::Error, DO::Error>> {
        Ok(self.read_reg(registers::RPD)? & 1 == 1)
    }

    /// Transmit a constant carrier wave on `channel` at the given `level`.
    ///
    /// This is meant for hardware testing. It changes the auto-ack,
    /// auto-retry, CRC and TX address settings on plus variants; call
    /// [`EsbInit::with_config()`](fn@crate::radio::prelude::EsbInit::with_config)
    /// after [`RadioHandle::stop_carrier_wave()`] to restore them.
    pub fn start_carrier_wave(
        &mut self,
        level: PaLevel,
        channel: u8,
    ) -> Result<(), RadioError<SPI::Error, DO::Error>> {
        self.as_tx()?;
        let rf_setup = RfSetup::from_bits(self.read_reg(registers::RF_SETUP)?)
            .with_cont_wave(true)
            .with_pll_lock(true);
        self.write_reg(registers::RF_SETUP, rf_setup.into_bits())?;
        if self.plus_variant {
            self.write_reg(registers::EN_AA, 0)?;
            self.write_reg(registers::SETUP_RETR, 0)?;
            let buf = [0xFF; 32];
            // bypass the configured address length
            self.write_reg_buf(registers::TX_ADDR, &buf[..5])?;
            self.flush_tx()?;
            self.write_command_buf(commands::W_TX_PAYLOAD, &buf)?;
            self.set_crc_length(CrcLength::Disabled)?;
        }
        self.set_pa_level(level)?;
        self.set_channel(channel)?;
        self.set_ce(true)?;
        if self.plus_variant {
            self.delay_impl.delay_ms(1);
            self.rewrite()?;
        }
        Ok(())
    }

    pub fn stop_carrier_wave(&mut self) -> Result<(), RadioError<SPI::Error, DO::Error>> {
        // CE low has no effect while CONT_WAVE and REUSE_TX_PL are both set,
        // but powering down does.
        self.power_down()?;
        let rf_setup = RfSetup::from_bits(self.read_reg(registers::RF_SETUP)?)
            .with_cont_wave(false)
            .with_pll_lock(false);
        self.write_reg(registers::RF_SETUP, rf_setup.into_bits())?;
        self.set_ce(false)
    }

    /// Control the LNA gain on non-plus nRF24L01 and Si24R1 radios.
    ///
    /// Has no effect on nRF24L01+ radios.
    pub fn set_lna(&mut self, enable: bool) -> Result<(), RadioError<SPI::Error, DO::Error>> {
        let rf_setup =
            RfSetup::from_bits(self.read_reg(registers::RF_SETUP)?).with_lna_hcurr(enable);
        self.write_reg(registers::RF_SETUP, rf_setup.into_bits())
    }

    /// Block until the (active low) `irq` pin is asserted or `timeout`
    /// (in microseconds) elapses.
    ///
    /// On an interrupt, the cached status flags are refreshed so
    /// [`EsbStatus::get_status_flags()`] tells which event occurred.
    /// Returns `false` on timeout.
    pub fn wait_for_irq<IRQ>(
        &mut self,
        irq: &mut IRQ,
        timeout: u32,
    ) -> Result<bool, RadioError<SPI::Error, DO::Error>>
    where
        IRQ: InputPin<Error = DO::Error>,
    {
        let mut elapsed = 0u32;
        loop {
            if irq.is_low().map_err(RadioError::Gpio)? {
                self.update()?;
                return Ok(true);
            }
            if elapsed >= timeout {
                return Ok(false);
            }
            self.delay_impl.delay_us(POLL_INTERVAL_US);
            elapsed = elapsed.saturating_add(POLL_INTERVAL_US);
        }
    }

    /// Poll the STATUS register until TX_DS or MAX_RT is asserted.
    fn wait_for_tx_result(&mut self) -> Result<bool, RadioError<SPI::Error, DO::Error>> {
        let mut elapsed = 0u32;
        loop {
            self.update()?;
            if self.status.tx_ds() || self.status.tx_df() {
                return Ok(self.status.tx_ds());
            }
            if elapsed >= self.tx_timeout {
                crate::log::warn!("no TX result after {} us", elapsed);
                return Ok(false);
            }
            self.delay_impl.delay_us(POLL_INTERVAL_US);
            elapsed = elapsed.saturating_add(POLL_INTERVAL_US);
        }
    }
}
