use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

use super::{commands, registers, RadioHandle};
use crate::{radio::prelude::EsbStatus, StatusFlags};

impl<SPI, DO, DELAY> EsbStatus for RadioHandle<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    fn get_status_flags(&self) -> StatusFlags {
        self.status
    }

    fn set_status_flags(&mut self, flags: StatusFlags) -> Result<(), Self::Error> {
        self.config_reg = self.config_reg.with_irq_flags(flags);
        self.write_reg(registers::CONFIG, self.config_reg.into_bits())
    }

    fn clear_status_flags(&mut self, flags: StatusFlags) -> Result<(), Self::Error> {
        // event bits are cleared by writing 1
        self.write_reg(registers::STATUS, flags.events())
    }

    fn update(&mut self) -> Result<(), Self::Error> {
        self.read_buf(commands::NOP, 0)
    }
}
