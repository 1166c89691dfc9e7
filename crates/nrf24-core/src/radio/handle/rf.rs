use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

use super::{registers, RadioHandle};
use crate::{
    log::error,
    radio::{
        prelude::EsbRf,
        register_map::{ConfigReg, RfSetup},
    },
    CrcLength, DataRate, PaLevel, RadioError,
};

impl<SPI, DO, DELAY> EsbRf for RadioHandle<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    fn set_channel(&mut self, channel: u8) -> Result<(), Self::Error> {
        self.write_reg(registers::RF_CH, channel.min(125))
    }

    fn get_channel(&mut self) -> Result<u8, Self::Error> {
        self.read_reg(registers::RF_CH)
    }

    fn set_pa_level(&mut self, level: PaLevel) -> Result<(), Self::Error> {
        let rf_setup = RfSetup::from_bits(self.read_reg(registers::RF_SETUP)?).with_pa_level(level);
        self.write_reg(registers::RF_SETUP, rf_setup.into_bits())
    }

    fn get_pa_level(&mut self) -> Result<PaLevel, Self::Error> {
        Ok(RfSetup::from_bits(self.read_reg(registers::RF_SETUP)?).pa_level())
    }

    fn set_data_rate(&mut self, data_rate: DataRate) -> Result<(), Self::Error> {
        let rf_setup =
            RfSetup::from_bits(self.read_reg(registers::RF_SETUP)?).with_data_rate(data_rate);
        self.write_reg(registers::RF_SETUP, rf_setup.into_bits())?;
        self.tx_delay = data_rate.tx_delay();
        Ok(())
    }

    fn get_data_rate(&mut self) -> Result<DataRate, Self::Error> {
        RfSetup::from_bits(self.read_reg(registers::RF_SETUP)?)
            .data_rate()
            .ok_or_else(|| {
                error!("RF_SETUP holds an illegal data rate");
                RadioError::BinaryCorruption
            })
    }

    fn set_crc_length(&mut self, length: CrcLength) -> Result<(), Self::Error> {
        self.config_reg = self.config_reg.with_crc_length(length);
        self.write_reg(registers::CONFIG, self.config_reg.into_bits())
    }

    /// The radio forces CRC on while auto-ack is enabled on any pipe,
    /// which this reports accordingly.
    fn get_crc_length(&mut self) -> Result<CrcLength, Self::Error> {
        let config = ConfigReg::from_bits(self.read_reg(registers::CONFIG)?);
        if config.is_corrupted() {
            error!("CONFIG holds CRCO without EN_CRC");
            return Err(RadioError::BinaryCorruption);
        }
        Ok(config.crc_length())
    }
}
