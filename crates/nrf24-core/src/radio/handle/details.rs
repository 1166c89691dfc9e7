use core::fmt::{Display, Formatter, Result as FmtResult};

use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

use super::{registers, RadioHandle};
use crate::{
    log::error,
    radio::{
        prelude::{EsbDetails, EsbFifo, EsbPipe, EsbRadio, EsbRf},
        register_map::{ConfigReg, FeatureReg, ObserveTx, RfSetup, SetupRetr},
    },
    CrcLength, DataRate, FifoState, PaLevel, RadioError, RadioMode, StatusFlags,
};

/// A snapshot of the radio's registers, as returned by [`RadioHandle::details()`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RadioDetails {
    pub plus_variant: bool,
    pub mode: RadioMode,
    pub channel: u8,
    pub data_rate: DataRate,
    pub pa_level: PaLevel,
    pub lna_enabled: bool,
    pub crc_length: CrcLength,
    pub address_length: u8,
    /// The static payload length of pipe 0.
    pub payload_length: u8,
    /// In microseconds.
    pub auto_retry_delay: u16,
    pub auto_retry_count: u8,
    /// Lost packets on the current channel.
    pub lost_packets: u8,
    /// Retries made for the last transmission.
    pub last_arc: u8,
    /// The events allowed to assert the IRQ pin.
    pub irq_flags: StatusFlags,
    /// The events currently asserted.
    pub status: StatusFlags,
    pub tx_fifo: FifoState,
    pub rx_fifo: FifoState,
    pub ask_no_ack: bool,
    pub ack_payloads: bool,
    /// One bit per pipe (DYNPD register).
    pub dynamic_payloads: u8,
    /// One bit per pipe (EN_AA register).
    pub auto_ack: u8,
    /// One bit per pipe (EN_RXADDR register).
    pub open_pipes: u8,
    pub tx_address: [u8; 5],
    /// Pipes 2 - 5 already include the bytes shared with pipe 1.
    pub rx_addresses: [[u8; 5]; 6],
}

/// Writes the first `len` bytes of `address` MSByte first.
fn fmt_address(f: &mut Formatter<'_>, address: &[u8; 5], len: u8) -> FmtResult {
    f.write_str("0x")?;
    for byte in address[..len as usize].iter().rev() {
        write!(f, "{byte:02X}")?;
    }
    Ok(())
}

impl Display for RadioDetails {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        writeln!(f, "Is a plus variant_________{}", self.plus_variant)?;
        writeln!(f, "Radio mode________________{}", self.mode)?;
        writeln!(
            f,
            "Channel___________________{} ~ {} MHz",
            self.channel,
            self.channel as u16 + 2400
        )?;
        writeln!(f, "RF Data Rate______________{}", self.data_rate)?;
        writeln!(f, "RF Power Amplifier________{}", self.pa_level)?;
        writeln!(f, "RF LNA enabled____________{}", self.lna_enabled)?;
        writeln!(f, "CRC Length________________{}", self.crc_length)?;
        writeln!(f, "Address length____________{} bytes", self.address_length)?;
        writeln!(f, "Static payload length_____{} bytes", self.payload_length)?;
        writeln!(f, "Auto retry delay__________{} microseconds", self.auto_retry_delay)?;
        writeln!(f, "Auto retry attempts_______{} maximum", self.auto_retry_count)?;
        writeln!(f, "Packets lost______________{}", self.lost_packets)?;
        writeln!(f, "Last retry count__________{}", self.last_arc)?;
        writeln!(f, "IRQ events enabled________{}", self.irq_flags)?;
        writeln!(f, "IRQ events asserted_______{}", self.status)?;
        writeln!(f, "TX FIFO___________________{}", self.tx_fifo)?;
        writeln!(f, "RX FIFO___________________{}", self.rx_fifo)?;
        writeln!(f, "Ask no ACK allowed________{}", self.ask_no_ack)?;
        writeln!(f, "ACK Payload enabled_______{}", self.ack_payloads)?;
        writeln!(f, "Dynamic Payloads__________{:#08b}", self.dynamic_payloads)?;
        writeln!(f, "Auto Acknowledgment_______{:#08b}", self.auto_ack)?;
        f.write_str("TX address________________")?;
        fmt_address(f, &self.tx_address, self.address_length)?;
        for (pipe, address) in self.rx_addresses.iter().enumerate() {
            let state = if self.open_pipes & (1 << pipe) != 0 {
                " open "
            } else {
                "closed"
            };
            write!(f, "\nPipe {pipe} ({state}) bound to ")?;
            fmt_address(f, address, self.address_length)?;
        }
        Ok(())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for RadioDetails {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "Is a plus variant_________{=bool}\n", self.plus_variant);
        defmt::write!(fmt, "Radio mode________________{}\n", self.mode);
        defmt::write!(fmt, "Channel___________________{=u8}\n", self.channel);
        defmt::write!(fmt, "RF Data Rate______________{}\n", self.data_rate);
        defmt::write!(fmt, "RF Power Amplifier________{}\n", self.pa_level);
        defmt::write!(fmt, "RF LNA enabled____________{=bool}\n", self.lna_enabled);
        defmt::write!(fmt, "CRC Length________________{}\n", self.crc_length);
        defmt::write!(fmt, "Address length____________{=u8} bytes\n", self.address_length);
        defmt::write!(fmt, "Static payload length_____{=u8} bytes\n", self.payload_length);
        defmt::write!(fmt, "Auto retry delay__________{=u16} microseconds\n", self.auto_retry_delay);
        defmt::write!(fmt, "Auto retry attempts_______{=u8} maximum\n", self.auto_retry_count);
        defmt::write!(fmt, "Packets lost______________{=u8}\n", self.lost_packets);
        defmt::write!(fmt, "Last retry count__________{=u8}\n", self.last_arc);
        defmt::write!(fmt, "IRQ events enabled________{}\n", self.irq_flags);
        defmt::write!(fmt, "IRQ events asserted_______{}\n", self.status);
        defmt::write!(fmt, "TX FIFO___________________{}\n", self.tx_fifo);
        defmt::write!(fmt, "RX FIFO___________________{}\n", self.rx_fifo);
        defmt::write!(fmt, "Ask no ACK allowed________{=bool}\n", self.ask_no_ack);
        defmt::write!(fmt, "ACK Payload enabled_______{=bool}\n", self.ack_payloads);
        defmt::write!(fmt, "Dynamic Payloads__________0b{=0..8}\n", self.dynamic_payloads);
        defmt::write!(fmt, "Auto Acknowledgment_______0b{=0..8}\n", self.auto_ack);
        let len = self.address_length as usize;
        defmt::write!(fmt, "TX address________________{=[u8]:02X}", &self.tx_address[..len]);
        for (pipe, address) in self.rx_addresses.iter().enumerate() {
            defmt::write!(
                fmt,
                "\nPipe {=usize} (open: {=bool}) bound to {=[u8]:02X}",
                pipe,
                self.open_pipes & (1 << pipe) != 0,
                &address[..len]
            );
        }
    }
}

impl<SPI, DO, DELAY> RadioHandle<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    /// Read all settings from the radio.
    ///
    /// The cached STATUS byte is refreshed as a side effect. Nothing else changes.
    pub fn details(&mut self) -> Result<RadioDetails, RadioError<SPI::Error, DO::Error>> {
        let rf_setup = RfSetup::from_bits(self.read_reg(registers::RF_SETUP)?);
        let config = ConfigReg::from_bits(self.read_reg(registers::CONFIG)?);
        let (Some(data_rate), false) = (rf_setup.data_rate(), config.is_corrupted()) else {
            error!("RF_SETUP or CONFIG holds an illegal value");
            return Err(RadioError::BinaryCorruption);
        };
        let address_length = self.get_address_length()?;
        let payload_length = self.read_reg(registers::RX_PW_P0)? & 0x3F;
        let retries = SetupRetr::from_bits(self.read_reg(registers::SETUP_RETR)?);
        let observed = ObserveTx::from_bits(self.read_reg(registers::OBSERVE_TX)?);
        let tx_fifo = self.get_fifo_state(true)?;
        let rx_fifo = self.get_fifo_state(false)?;
        let feature = FeatureReg::from_bits(self.read_reg(registers::FEATURE)?);
        let dynamic_payloads = self.read_reg(registers::DYNPD)?;
        let auto_ack = self.read_reg(registers::EN_AA)?;
        let open_pipes = self.read_reg(registers::EN_RXADDR)?;
        let channel = self.get_channel()?;

        let mut tx_address = [0u8; 5];
        self.get_tx_address(&mut tx_address)?;
        let mut rx_addresses = [[0u8; 5]; 6];
        for (pipe, address) in rx_addresses.iter_mut().enumerate() {
            self.get_rx_address(pipe as u8, address)?;
        }

        Ok(RadioDetails {
            plus_variant: self.plus_variant,
            mode: self.mode(),
            channel,
            data_rate,
            pa_level: rf_setup.pa_level(),
            lna_enabled: rf_setup.lna_hcurr(),
            crc_length: config.crc_length(),
            address_length,
            payload_length,
            auto_retry_delay: (retries.ard() as u16 + 1) * 250,
            auto_retry_count: retries.arc(),
            lost_packets: observed.plos_cnt(),
            last_arc: observed.arc_cnt(),
            irq_flags: config.irq_flags(),
            status: self.status,
            tx_fifo,
            rx_fifo,
            ask_no_ack: feature.en_dyn_ack(),
            ack_payloads: feature.en_ack_pay(),
            dynamic_payloads,
            auto_ack,
            open_pipes,
            tx_address,
            rx_addresses,
        })
    }
}

impl<SPI, DO, DELAY> EsbDetails for RadioHandle<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    #[cfg(any(feature = "std", feature = "defmt"))]
    fn print_details(&mut self) -> Result<(), Self::Error> {
        let details = self.details()?;
        #[cfg(feature = "std")]
        std::println!("{details}");
        #[cfg(feature = "defmt")]
        defmt::println!("{}", details);
        Ok(())
    }

    #[cfg(not(any(feature = "std", feature = "defmt")))]
    fn print_details(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}
