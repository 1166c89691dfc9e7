use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

use super::{commands, registers, RadioHandle, POLL_INTERVAL_US};
use crate::{
    radio::{prelude::EsbFifo, register_map::FifoStatus},
    FifoState,
};

impl<SPI, DO, DELAY> EsbFifo for RadioHandle<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    fn flush_rx(&mut self) -> Result<(), Self::Error> {
        self.read_buf(commands::FLUSH_RX, 0)
    }

    fn flush_tx(&mut self) -> Result<(), Self::Error> {
        self.read_buf(commands::FLUSH_TX, 0)
    }

    fn get_fifo_state(&mut self, about_tx: bool) -> Result<FifoState, Self::Error> {
        let fifo = FifoStatus::from_bits(self.read_reg(registers::FIFO_STATUS)?);
        Ok(if about_tx {
            fifo.tx_state()
        } else {
            fifo.rx_state()
        })
    }

    fn available(&mut self) -> Result<bool, Self::Error> {
        let fifo = FifoStatus::from_bits(self.read_reg(registers::FIFO_STATUS)?);
        Ok(!fifo.rx_empty())
    }

    /// The pipe number comes from the STATUS byte of the same transaction.
    fn available_pipe(&mut self) -> Result<Option<u8>, Self::Error> {
        if !self.available()? {
            return Ok(None);
        }
        let pipe = self.status.rx_pipe();
        // 6 is unused and 7 means empty
        Ok((pipe <= 5).then_some(pipe))
    }

    fn wait_available(&mut self, timeout: u32) -> Result<Option<u8>, Self::Error> {
        let mut elapsed = 0u32;
        loop {
            let pipe = self.available_pipe()?;
            if pipe.is_some() || elapsed >= timeout {
                return Ok(pipe);
            }
            self.delay_impl.delay_us(POLL_INTERVAL_US);
            elapsed = elapsed.saturating_add(POLL_INTERVAL_US);
        }
    }
}
