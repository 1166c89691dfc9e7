use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

use super::{registers, RadioHandle};
use crate::{log::error, radio::prelude::EsbPipe, RadioError};

impl<SPI, DO, DELAY> EsbPipe for RadioHandle<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    /// See [`EsbPipe::open_rx_pipe()`] for implementation-agnostic detail.
    ///
    /// In TX mode, pipe 0's address is only cached; it is written when
    /// [`EsbRadio::as_rx()`](fn@crate::radio::prelude::EsbRadio::as_rx) is called.
    fn open_rx_pipe(&mut self, pipe: u8, address: &[u8]) -> Result<(), Self::Error> {
        if pipe > 5 || address.is_empty() {
            return Ok(());
        }
        let len = address.len().min(self.address_length as usize);
        if pipe == 0 {
            let mut cached = [0u8; 5];
            cached[..len].copy_from_slice(&address[..len]);
            self.pipe0_rx_addr = Some(cached);
            if self.config_reg.prim_rx() {
                self.write_reg_buf(registers::RX_ADDR_P0, &address[..len])?;
            }
        } else if pipe == 1 {
            self.write_reg_buf(registers::RX_ADDR_P1, &address[..len])?;
        } else {
            // pipes 2 - 5 only hold the LSByte
            self.write_reg(registers::RX_ADDR_P0 + pipe, address[0])?;
        }

        let enabled = self.read_reg(registers::EN_RXADDR)?;
        self.write_reg(registers::EN_RXADDR, enabled | (1 << pipe))
    }

    /// See [`EsbPipe::open_tx_pipe()`] for implementation-agnostic detail.
    ///
    /// Outside of RX mode, pipe 0 also gets the new address right away.
    fn open_tx_pipe(&mut self, address: &[u8]) -> Result<(), Self::Error> {
        let len = address.len().min(5);
        self.tx_address[..len].copy_from_slice(&address[..len]);
        let aw = self.address_length as usize;
        let tx_address = self.tx_address;
        self.write_reg_buf(registers::TX_ADDR, &tx_address[..aw])?;
        if !self.config_reg.prim_rx() {
            self.write_reg_buf(registers::RX_ADDR_P0, &tx_address[..aw])?;
        }
        Ok(())
    }

    /// If `pipe` is 0, the cached RX address of pipe 0 is also forgotten.
    fn close_rx_pipe(&mut self, pipe: u8) -> Result<(), Self::Error> {
        if pipe > 5 {
            return Ok(());
        }
        let enabled = self.read_reg(registers::EN_RXADDR)?;
        self.write_reg(registers::EN_RXADDR, enabled & !(1 << pipe))?;
        if pipe == 0 {
            self.pipe0_rx_addr = None;
        }
        Ok(())
    }

    fn set_address_length(&mut self, length: u8) -> Result<(), Self::Error> {
        let length = length.clamp(3, 5);
        self.write_reg(registers::SETUP_AW, length - 2)?;
        self.address_length = length;
        Ok(())
    }

    fn get_address_length(&mut self) -> Result<u8, Self::Error> {
        let setup_aw = self.read_reg(registers::SETUP_AW)? & 3;
        if setup_aw == 0 {
            error!("SETUP_AW holds an illegal value");
            return Err(RadioError::BinaryCorruption);
        }
        self.address_length = setup_aw + 2;
        Ok(self.address_length)
    }

    fn get_rx_address(&mut self, pipe: u8, address: &mut [u8]) -> Result<u8, Self::Error> {
        if pipe > 5 || address.is_empty() {
            return Ok(0);
        }
        let aw = self.address_length as usize;
        let len = address.len().min(aw);
        let reg = if pipe < 2 {
            registers::RX_ADDR_P0 + pipe
        } else {
            registers::RX_ADDR_P1
        };
        self.read_buf(reg, aw)?;
        address[..len].copy_from_slice(&self.buf[1..=len]);
        if pipe > 1 {
            address[0] = self.read_reg(registers::RX_ADDR_P0 + pipe)?;
        }
        Ok(len as u8)
    }

    fn get_tx_address(&mut self, address: &mut [u8]) -> Result<u8, Self::Error> {
        let aw = self.address_length as usize;
        let len = address.len().min(aw);
        self.read_buf(registers::TX_ADDR, aw)?;
        address[..len].copy_from_slice(&self.buf[1..=len]);
        Ok(len as u8)
    }
}
