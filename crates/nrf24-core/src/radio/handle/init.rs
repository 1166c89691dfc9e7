use super::{registers, RadioHandle, POWER_UP_DELAY_US};
use crate::{
    log::{debug, error, info},
    radio::{
        prelude::{EsbFifo, EsbInit, EsbPipe, EsbPower, EsbStatus},
        RadioConfig,
    },
    RadioError, StatusFlags,
};
use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

impl<SPI, DO, DELAY> EsbInit for RadioHandle<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    fn begin(&mut self) -> Result<(), Self::Error> {
        // power-on reset takes up to 4.5 ms (+ 14 µs) with a non-plus radio
        self.delay_impl.delay_ms(5);

        self.power_down()?;
        let config = self.read_reg(registers::CONFIG)?;
        if config != self.config_reg.into_bits() {
            error!("CONFIG read back as {}; check the SPI wiring", config);
            return Err(RadioError::BinaryCorruption);
        }

        // non-plus radios ignore FEATURE writes until the ACTIVATE command is sent
        let before_toggle = self.read_reg(registers::FEATURE)?;
        self.toggle_features()?;
        let after_toggle = self.read_reg(registers::FEATURE)?;
        self.plus_variant = before_toggle == after_toggle;
        if after_toggle < before_toggle {
            // the MCU was reset without a power-on reset of the radio,
            // which left the features of a non-plus radio unlocked
            self.toggle_features()?;
        }
        info!(
            "detected a nRF24L01{} radio",
            if self.plus_variant { "+" } else { "" }
        );
        self.with_config(&RadioConfig::default())
    }

    fn with_config(&mut self, config: &RadioConfig) -> Result<(), Self::Error> {
        config.validate()?;

        self.clear_status_flags(StatusFlags::new())?;
        self.power_down()?;
        self.flush_rx()?;
        self.flush_tx()?;

        self.set_address_length(config.address_length())?;
        self.write_reg(registers::SETUP_RETR, config.retries.into_bits())?;
        self.write_reg(registers::EN_AA, config.auto_ack())?;

        self.dynamic_pipes = config.dynamic_pipes();
        self.feature = config.feature_reg();
        self.write_reg(registers::DYNPD, self.dynamic_pipes)?;
        self.write_reg(registers::FEATURE, self.feature.into_bits())?;

        let rf_setup = config.rf_setup.with_cont_wave(false).with_pll_lock(false);
        self.write_reg(registers::RF_SETUP, rf_setup.into_bits())?;
        self.tx_delay = config.data_rate().tx_delay();

        let aw = self.address_length as usize;
        let mut address = [0u8; 5];
        config.rx_address(0, &mut address);
        self.pipe0_rx_addr = config.is_rx_pipe_enabled(0).then_some(address);
        config.rx_address(1, &mut address);
        self.write_reg_buf(registers::RX_ADDR_P1, &address[..aw])?;
        for pipe in 2..6 {
            config.rx_address(pipe, &mut address);
            self.write_reg(registers::RX_ADDR_P0 + pipe, address[0])?;
        }
        // pipe 0 is needed for ACK packets in TX mode
        self.write_reg(registers::EN_RXADDR, config.enabled_pipes() | 1)?;

        config.tx_address(&mut self.tx_address);
        let tx_address = self.tx_address;
        self.write_reg_buf(registers::TX_ADDR, &tx_address[..aw])?;
        self.write_reg_buf(registers::RX_ADDR_P0, &tx_address[..aw])?;

        for pipe in 0..6u8 {
            let length = config
                .pipe(pipe)
                .map(|p| p.static_length())
                .unwrap_or(32);
            self.payload_lengths[pipe as usize] = length;
            self.write_reg(registers::RX_PW_P0 + pipe, length)?;
        }

        self.write_reg(registers::RF_CH, config.channel())?;

        // Standby-I as PTX: CE stays inactive
        self.config_reg = config.config_reg.with_pwr_up(true).with_prim_rx(false);
        self.write_reg(registers::CONFIG, self.config_reg.into_bits())?;
        self.delay_impl.delay_us(POWER_UP_DELAY_US);
        debug!("applied configuration on channel {}", config.channel());
        Ok(())
    }
}
