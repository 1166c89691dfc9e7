use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

use super::{commands, registers, RadioHandle};
use crate::{
    log::debug,
    radio::{prelude::EsbAutoAck, register_map::SetupRetr},
    ConfigConflict, RadioError,
};

impl<SPI, DO, DELAY> EsbAutoAck for RadioHandle<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    /// See [`EsbAutoAck::set_ack_payloads()`] for implementation-agnostic detail.
    ///
    /// Dynamic payloads must be enabled on pipe 0, and so must auto-ack.
    /// Unlike older drivers, neither is enabled implicitly.
    fn set_ack_payloads(&mut self, enable: bool) -> Result<(), Self::Error> {
        if enable {
            if !self.feature.en_dpl() || self.dynamic_pipes & 1 == 0 {
                return Err(ConfigConflict::AckPayloadsRequireDynamicPayloads.into());
            }
            if self.read_reg(registers::EN_AA)? & 1 == 0 {
                return Err(ConfigConflict::AckPayloadsRequireAutoAck.into());
            }
        }
        self.feature = self.feature.with_en_ack_pay(enable);
        self.write_reg(registers::FEATURE, self.feature.into_bits())
    }

    fn get_ack_payloads(&self) -> bool {
        self.feature.en_ack_pay()
    }

    fn set_auto_ack(&mut self, enable: bool) -> Result<(), Self::Error> {
        if !enable && self.feature.en_ack_pay() {
            return Err(ConfigConflict::AckPayloadsRequireAutoAck.into());
        }
        self.write_reg(registers::EN_AA, if enable { 0x3F } else { 0 })
    }

    fn set_auto_ack_pipe(&mut self, enable: bool, pipe: u8) -> Result<(), Self::Error> {
        if pipe > 5 {
            return Ok(());
        }
        if !enable && pipe == 0 && self.feature.en_ack_pay() {
            return Err(ConfigConflict::AckPayloadsRequireAutoAck.into());
        }
        let mask = 1 << pipe;
        let en_aa = self.read_reg(registers::EN_AA)?;
        self.write_reg(
            registers::EN_AA,
            if enable { en_aa | mask } else { en_aa & !mask },
        )
    }

    fn allow_ask_no_ack(&mut self, enable: bool) -> Result<(), Self::Error> {
        self.feature = self.feature.with_en_dyn_ack(enable);
        self.write_reg(registers::FEATURE, self.feature.into_bits())
    }

    /// See [`EsbAutoAck::write_ack_payload()`] for implementation-agnostic detail.
    ///
    /// ACK payloads share the 3-level TX FIFO with outgoing payloads.
    fn write_ack_payload(&mut self, pipe: u8, buf: &[u8]) -> Result<bool, Self::Error> {
        self.require_powered()?;
        if !self.feature.en_ack_pay() || pipe > 5 {
            return Ok(false);
        }
        self.write_command_buf(commands::W_ACK_PAYLOAD | pipe, buf)?;
        // the STATUS byte describes the TX FIFO before this payload
        if self.status.tx_full() {
            debug!("TX FIFO is full; ACK payload for pipe {} dropped", pipe);
            return Err(RadioError::FifoFull);
        }
        Ok(true)
    }

    fn set_auto_retries(&mut self, delay: u8, count: u8) -> Result<(), Self::Error> {
        let retries = SetupRetr::new()
            .with_ard(delay.min(15))
            .with_arc(count.min(15));
        self.write_reg(registers::SETUP_RETR, retries.into_bits())
    }
}
