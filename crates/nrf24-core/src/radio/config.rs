use super::register_map::{ConfigReg, FeatureReg, RfSetup, SetupRetr};
use crate::{ConfigConflict, CrcLength, DataRate, PaLevel, PayloadLength};

/// The settings of a single RX pipe.
///
/// Only pipes 0 and 1 use all bytes of [`PipeConfig::address()`].
/// Pipes 2 - 5 only use the first byte (the LSByte); the remaining bytes
/// are shared with pipe 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PipeConfig {
    address: [u8; 5],
    enabled: bool,
    auto_ack: bool,
    dynamic: bool,
    static_length: u8,
}

impl PipeConfig {
    /// A closed pipe with auto-ack enabled and 32 byte static payloads.
    pub const fn new(address: [u8; 5]) -> Self {
        Self {
            address,
            enabled: false,
            auto_ack: true,
            dynamic: false,
            static_length: 32,
        }
    }

    pub const fn address(&self) -> [u8; 5] {
        self.address
    }

    /// Copy up to 5 bytes of `address` into this pipe's address.
    pub fn with_address(self, address: &[u8]) -> Self {
        let mut new_address = self.address;
        let len = address.len().min(5);
        new_address[..len].copy_from_slice(&address[..len]);
        Self {
            address: new_address,
            ..self
        }
    }

    pub const fn enabled(&self) -> bool {
        self.enabled
    }

    pub const fn with_enabled(self, enabled: bool) -> Self {
        Self { enabled, ..self }
    }

    pub const fn auto_ack(&self) -> bool {
        self.auto_ack
    }

    pub const fn with_auto_ack(self, auto_ack: bool) -> Self {
        Self { auto_ack, ..self }
    }

    pub const fn payload_length(&self) -> PayloadLength {
        if self.dynamic {
            PayloadLength::Dynamic
        } else {
            PayloadLength::Static(self.static_length)
        }
    }

    /// Static lengths are clamped to range [1, 32].
    pub const fn with_payload_length(self, length: PayloadLength) -> Self {
        match length {
            PayloadLength::Dynamic => Self {
                dynamic: true,
                ..self
            },
            PayloadLength::Static(len) => Self {
                dynamic: false,
                static_length: clamp_payload_length(len),
                ..self
            },
        }
    }

    /// The value written to this pipe's RX_PW register.
    pub(crate) const fn static_length(&self) -> u8 {
        self.static_length
    }
}

const fn clamp_payload_length(len: u8) -> u8 {
    if len == 0 {
        1
    } else if len > 32 {
        32
    } else {
        len
    }
}

/// A complete snapshot of the radio's settings.
///
/// This struct follows a builder pattern. Start from [`RadioConfig::default()`]
/// and chain `with_*()` calls, then pass the result to
/// [`EsbInit::with_config()`](fn@crate::radio::prelude::EsbInit::with_config).
///
/// ```ignore
/// let config = RadioConfig::default()
///     .with_channel(42)
///     .with_rx_address(1, b"1Node");
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadioConfig {
    pub(crate) config_reg: ConfigReg,
    pub(crate) retries: SetupRetr,
    pub(crate) rf_setup: RfSetup,
    address_length: u8,
    channel: u8,
    ack_payloads: bool,
    ask_no_ack: bool,
    tx_address: [u8; 5],
    pipes: [PipeConfig; 6],
}

impl Default for RadioConfig {
    /// | setting | default value |
    /// |--------:|:--------------|
    /// | [`RadioConfig::channel()`] | `76` |
    /// | [`RadioConfig::address_length()`] | `5` |
    /// | [`RadioConfig::pa_level()`] | [`PaLevel::Max`] |
    /// | [`RadioConfig::lna_enable()`] | `true` |
    /// | [`RadioConfig::crc_length()`] | [`CrcLength::Bit16`] |
    /// | [`RadioConfig::data_rate()`] | [`DataRate::Mbps1`] |
    /// | [`RadioConfig::payload_length()`] | `32` |
    /// | [`RadioConfig::dynamic_payloads()`] | `false` |
    /// | [`RadioConfig::auto_ack()`] | `0x3F` |
    /// | [`RadioConfig::ack_payloads()`] | `false` |
    /// | [`RadioConfig::ask_no_ack()`] | `false` |
    /// | [`RadioConfig::auto_retry_delay()`] | `5` (1500 µs) |
    /// | [`RadioConfig::auto_retry_count()`] | `15` |
    /// | [`RadioConfig::tx_address()`] | `[0xE7; 5]` |
    /// | IRQ events | all enabled |
    ///
    /// | pipe | state  | address     |
    /// |------|--------|-------------|
    /// | 0    | closed | `[0xE7; 5]` |
    /// | 1    | open   | `[0xC2; 5]` |
    /// | 2    | closed | `0xC3`      |
    /// | 3    | closed | `0xC4`      |
    /// | 4    | closed | `0xC5`      |
    /// | 5    | closed | `0xC6`      |
    fn default() -> Self {
        Self {
            config_reg: ConfigReg::default(),
            retries: SetupRetr::default(),
            rf_setup: RfSetup::default(),
            address_length: 5,
            channel: 76,
            ack_payloads: false,
            ask_no_ack: false,
            tx_address: [0xE7; 5],
            pipes: [
                PipeConfig::new([0xE7; 5]),
                PipeConfig::new([0xC2; 5]).with_enabled(true),
                PipeConfig::new([0xC3, 0xC2, 0xC2, 0xC2, 0xC2]),
                PipeConfig::new([0xC4, 0xC2, 0xC2, 0xC2, 0xC2]),
                PipeConfig::new([0xC5, 0xC2, 0xC2, 0xC2, 0xC2]),
                PipeConfig::new([0xC6, 0xC2, 0xC2, 0xC2, 0xC2]),
            ],
        }
    }
}

impl RadioConfig {
    /// Check that the settings can be applied together.
    ///
    /// [`EsbInit::with_config()`](fn@crate::radio::prelude::EsbInit::with_config)
    /// calls this before writing any register.
    pub fn validate(&self) -> Result<(), ConfigConflict> {
        if self.ack_payloads {
            let pipe0 = &self.pipes[0];
            if pipe0.payload_length() != PayloadLength::Dynamic {
                return Err(ConfigConflict::AckPayloadsRequireDynamicPayloads);
            }
            if !pipe0.auto_ack() {
                return Err(ConfigConflict::AckPayloadsRequireAutoAck);
            }
        }
        Ok(())
    }

    pub const fn crc_length(&self) -> CrcLength {
        self.config_reg.crc_length()
    }

    /// See [`EsbRf::set_crc_length()`](fn@crate::radio::prelude::EsbRf::set_crc_length).
    pub fn with_crc_length(self, length: CrcLength) -> Self {
        Self {
            config_reg: self.config_reg.with_crc_length(length),
            ..self
        }
    }

    /// `None` is never returned for a config built by this API.
    pub const fn data_rate(&self) -> DataRate {
        match self.rf_setup.data_rate() {
            Some(rate) => rate,
            None => DataRate::Mbps1,
        }
    }

    /// See [`EsbRf::set_data_rate()`](fn@crate::radio::prelude::EsbRf::set_data_rate).
    pub fn with_data_rate(self, data_rate: DataRate) -> Self {
        Self {
            rf_setup: self.rf_setup.with_data_rate(data_rate),
            ..self
        }
    }

    pub const fn pa_level(&self) -> PaLevel {
        self.rf_setup.pa_level()
    }

    /// See [`EsbRf::set_pa_level()`](fn@crate::radio::prelude::EsbRf::set_pa_level).
    pub fn with_pa_level(self, level: PaLevel) -> Self {
        Self {
            rf_setup: self.rf_setup.with_pa_level(level),
            ..self
        }
    }

    pub const fn lna_enable(&self) -> bool {
        self.rf_setup.lna_hcurr()
    }

    /// Enable or disable the Low Noise Amplifier.
    ///
    /// Only some clones (like the Si24R1) honor this bit.
    pub fn with_lna_enable(self, enable: bool) -> Self {
        Self {
            rf_setup: self.rf_setup.with_lna_hcurr(enable),
            ..self
        }
    }

    pub const fn address_length(&self) -> u8 {
        self.address_length
    }

    /// The length of all pipe addresses, clamped to range [3, 5].
    pub fn with_address_length(self, value: u8) -> Self {
        Self {
            address_length: value.clamp(3, 5),
            ..self
        }
    }

    pub const fn channel(&self) -> u8 {
        self.channel
    }

    /// The channel is clamped to range [0, 125].
    ///
    /// ```text
    /// frequency (in MHz) = channel + 2400
    /// ```
    pub fn with_channel(self, value: u8) -> Self {
        Self {
            channel: value.min(125),
            ..self
        }
    }

    pub const fn auto_retry_delay(&self) -> u8 {
        self.retries.ard()
    }

    pub const fn auto_retry_count(&self) -> u8 {
        self.retries.arc()
    }

    /// Both `delay` and `count` are clamped to range [0, 15].
    ///
    /// See [`EsbAutoAck::set_auto_retries()`](fn@crate::radio::prelude::EsbAutoAck::set_auto_retries).
    pub fn with_auto_retries(self, delay: u8, count: u8) -> Self {
        Self {
            retries: self.retries.with_ard(delay.min(15)).with_arc(count.min(15)),
            ..self
        }
    }

    /// Is the "RX Data Ready" event allowed to assert the IRQ pin?
    pub fn rx_dr(&self) -> bool {
        !self.config_reg.mask_rx_dr()
    }

    pub fn with_rx_dr(self, enable: bool) -> Self {
        Self {
            config_reg: self.config_reg.with_mask_rx_dr(!enable),
            ..self
        }
    }

    /// Is the "TX Data Sent" event allowed to assert the IRQ pin?
    pub fn tx_ds(&self) -> bool {
        !self.config_reg.mask_tx_ds()
    }

    pub fn with_tx_ds(self, enable: bool) -> Self {
        Self {
            config_reg: self.config_reg.with_mask_tx_ds(!enable),
            ..self
        }
    }

    /// Is the "TX Data Failed" event allowed to assert the IRQ pin?
    pub fn tx_df(&self) -> bool {
        !self.config_reg.mask_max_rt()
    }

    pub fn with_tx_df(self, enable: bool) -> Self {
        Self {
            config_reg: self.config_reg.with_mask_max_rt(!enable),
            ..self
        }
    }

    pub const fn ask_no_ack(&self) -> bool {
        self.ask_no_ack
    }

    /// Allow the `ask_no_ack` parameter of
    /// [`EsbRadio::send()`](fn@crate::radio::prelude::EsbRadio::send) and
    /// [`EsbRadio::write()`](fn@crate::radio::prelude::EsbRadio::write).
    pub fn with_ask_no_ack(self, enable: bool) -> Self {
        Self {
            ask_no_ack: enable,
            ..self
        }
    }

    /// Does any pipe use dynamic payload lengths?
    pub fn dynamic_payloads(&self) -> bool {
        self.pipes
            .iter()
            .any(|pipe| pipe.payload_length() == PayloadLength::Dynamic)
    }

    /// Switch all pipes between dynamic and static payload lengths.
    ///
    /// Disabling dynamic payloads restores each pipe's previous static length.
    pub fn with_dynamic_payloads(self, enable: bool) -> Self {
        let mut pipes = self.pipes;
        for pipe in pipes.iter_mut() {
            pipe.dynamic = enable;
        }
        Self { pipes, ..self }
    }

    /// The auto-ack setting of all pipes, one bit per pipe (bit 0 is pipe 0).
    pub fn auto_ack(&self) -> u8 {
        self.pipes
            .iter()
            .enumerate()
            .fold(0, |mask, (n, pipe)| mask | ((pipe.auto_ack() as u8) << n))
    }

    /// Enable auto-ack for each pipe whose bit is set in `mask`.
    ///
    /// Pipe 0 should keep auto-ack enabled if any other pipe uses it,
    /// because pipe 0 receives the ACK packets in TX mode.
    pub fn with_auto_ack(self, mask: u8) -> Self {
        let mut pipes = self.pipes;
        for (n, pipe) in pipes.iter_mut().enumerate() {
            pipe.auto_ack = mask & (1 << n) != 0;
        }
        Self { pipes, ..self }
    }

    pub const fn ack_payloads(&self) -> bool {
        self.ack_payloads
    }

    /// Enable or disable custom ACK payloads.
    ///
    /// ACK payloads need dynamic payloads and auto-ack on pipe 0.
    /// Those are not enabled implicitly; [`RadioConfig::validate()`]
    /// reports the conflict instead.
    pub fn with_ack_payloads(self, enable: bool) -> Self {
        Self {
            ack_payloads: enable,
            ..self
        }
    }

    /// The static payload length of pipe 0.
    pub const fn payload_length(&self) -> u8 {
        self.pipes[0].static_length()
    }

    /// Set the static payload length of all pipes, clamped to range [1, 32].
    pub fn with_payload_length(self, value: u8) -> Self {
        let mut pipes = self.pipes;
        for pipe in pipes.iter_mut() {
            pipe.static_length = clamp_payload_length(value);
        }
        Self { pipes, ..self }
    }

    /// `None` if `pipe` is greater than 5.
    pub fn pipe(&self, pipe: u8) -> Option<PipeConfig> {
        self.pipes.get(pipe as usize).copied()
    }

    /// Replace all settings of a `pipe`. Does nothing if `pipe` is greater than 5.
    pub fn with_pipe(self, pipe: u8, config: PipeConfig) -> Self {
        let mut pipes = self.pipes;
        if let Some(slot) = pipes.get_mut(pipe as usize) {
            *slot = config;
        }
        Self { pipes, ..self }
    }

    /// Close a RX pipe. Does nothing if `pipe` is greater than 5.
    pub fn close_rx_pipe(self, pipe: u8) -> Self {
        let mut pipes = self.pipes;
        if let Some(slot) = pipes.get_mut(pipe as usize) {
            slot.enabled = false;
        }
        Self { pipes, ..self }
    }

    pub fn is_rx_pipe_enabled(&self, pipe: u8) -> bool {
        self.pipes
            .get(pipe as usize)
            .is_some_and(|config| config.enabled())
    }

    /// Open a RX `pipe` with the given `address`.
    ///
    /// Does nothing if `pipe` is greater than 5 or `address` is empty.
    /// For pipes 2 - 5, only `address[0]` is significant.
    pub fn with_rx_address(self, pipe: u8, address: &[u8]) -> Self {
        let mut pipes = self.pipes;
        if let Some(slot) = pipes.get_mut(pipe as usize) {
            if !address.is_empty() {
                *slot = slot.with_address(address).with_enabled(true);
            }
        }
        Self { pipes, ..self }
    }

    /// Copy the address of a RX `pipe` into `address`.
    ///
    /// For pipes 2 - 5, the bytes after the first are taken from pipe 1.
    pub fn rx_address(&self, pipe: u8, address: &mut [u8]) {
        let Some(config) = self.pipes.get(pipe as usize) else {
            return;
        };
        let len = address.len().min(5);
        if pipe < 2 {
            address[..len].copy_from_slice(&config.address[..len]);
        } else if len > 0 {
            address[0] = config.address[0];
            address[1..len].copy_from_slice(&self.pipes[1].address[1..len]);
        }
    }

    pub fn tx_address(&self, address: &mut [u8]) {
        let len = address.len().min(5);
        address[..len].copy_from_slice(&self.tx_address[..len]);
    }

    /// Set the TX address.
    ///
    /// In TX mode, pipe 0 also uses this address to receive ACK packets.
    pub fn with_tx_address(self, address: &[u8]) -> Self {
        let mut tx_address = self.tx_address;
        let len = address.len().min(5);
        tx_address[..len].copy_from_slice(&address[..len]);
        Self { tx_address, ..self }
    }

    pub(crate) fn feature_reg(&self) -> FeatureReg {
        FeatureReg::new()
            .with_en_dpl(self.dynamic_payloads())
            .with_en_ack_pay(self.ack_payloads)
            .with_en_dyn_ack(self.ask_no_ack)
    }

    /// The DYNPD register value.
    pub(crate) fn dynamic_pipes(&self) -> u8 {
        self.pipes.iter().enumerate().fold(0, |mask, (n, pipe)| {
            mask | (((pipe.payload_length() == PayloadLength::Dynamic) as u8) << n)
        })
    }

    /// The EN_RXADDR register value.
    pub(crate) fn enabled_pipes(&self) -> u8 {
        self.pipes
            .iter()
            .enumerate()
            .fold(0, |mask, (n, pipe)| mask | ((pipe.enabled() as u8) << n))
    }
}
