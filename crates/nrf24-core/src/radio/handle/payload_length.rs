use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

use super::{commands, registers, RadioHandle};
use crate::{
    log::error,
    radio::prelude::EsbPayloadLength,
    ConfigConflict, RadioError,
};

impl<SPI, DO, DELAY> EsbPayloadLength for RadioHandle<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    fn set_payload_length(&mut self, length: u8) -> Result<(), Self::Error> {
        let length = length.clamp(1, 32);
        for pipe in 0..6 {
            self.write_reg(registers::RX_PW_P0 + pipe, length)?;
        }
        self.payload_lengths = [length; 6];
        Ok(())
    }

    fn get_payload_length(&mut self) -> Result<u8, Self::Error> {
        let length = self.read_reg(registers::RX_PW_P0)? & 0x3F;
        self.payload_lengths[0] = length;
        Ok(length)
    }

    fn set_dynamic_payloads(&mut self, enable: bool) -> Result<(), Self::Error> {
        if !enable && self.feature.en_ack_pay() {
            return Err(ConfigConflict::AckPayloadsRequireDynamicPayloads.into());
        }
        self.feature = self.feature.with_en_dpl(enable);
        self.write_reg(registers::FEATURE, self.feature.into_bits())?;
        self.dynamic_pipes = if enable { 0x3F } else { 0 };
        self.write_reg(registers::DYNPD, self.dynamic_pipes)
    }

    fn get_dynamic_payloads(&self) -> bool {
        self.feature.en_dpl()
    }

    fn get_dynamic_payload_length(&mut self) -> Result<u8, Self::Error> {
        let length = self.read_reg(commands::R_RX_PL_WID)?;
        if length > 32 {
            error!("dynamic payload length {} is out of range", length);
            return Err(RadioError::BinaryCorruption);
        }
        Ok(length)
    }
}
