use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};
use nrf24::{
    radio::{
        prelude::{EsbRadio, EsbRf},
        RadioConfig, RadioHandle,
    },
    CrcLength, DataRate, PaLevel, RadioError,
};

use crate::{
    advertisement::{BleAdvertisement, MAX_PDU_LENGTH},
    framing::{crc24_ble, reverse_bits, whiten, whitening_coefficient},
    log::{debug, warn},
    services::ServicePayload,
};

/// The nRF24L01 channels that match the BLE advertising channels 37, 38 and 39.
pub const BLE_CHANNEL: [u8; 3] = [2, 26, 80];

/// The BLE advertising access address, as the nRF24L01 expects it.
pub const BLE_ADDRESS: [u8; 4] = [0x71, 0x91, 0x7D, 0x6B];

/// Navigation of [`BLE_CHANNEL`].
pub struct BleChannels;

impl BleChannels {
    /// The index of `channel` in [`BLE_CHANNEL`], if any.
    pub fn index_of(channel: u8) -> Option<usize> {
        BLE_CHANNEL.iter().position(|ch| *ch == channel)
    }

    /// The BLE channel after `current`, wrapping around.
    ///
    /// Returns [`None`] if `current` is not in [`BLE_CHANNEL`].
    pub fn increment(current: u8) -> Option<u8> {
        Self::index_of(current).map(|index| BLE_CHANNEL[(index + 1) % BLE_CHANNEL.len()])
    }
}

/// A [`RadioConfig`] that makes the nRF24L01 talk to BLE devices.
///
/// | setting | value |
/// |--------:|:------|
/// | channel | [`BLE_CHANNEL[0]`](BLE_CHANNEL) |
/// | CRC | disabled (a CRC24 is appended to the payload instead) |
/// | auto-ack | disabled on all pipes |
/// | auto-retries | 0 delay, 0 attempts |
/// | address length | 4 |
/// | data rate | 1 Mbps |
/// | payload length | 32 (static) |
/// | pipe 1 and TX address | [`BLE_ADDRESS`] |
pub fn ble_config() -> RadioConfig {
    RadioConfig::default()
        .with_channel(BLE_CHANNEL[0])
        .with_crc_length(CrcLength::Disabled)
        .with_auto_ack(0)
        .with_auto_retries(0, 0)
        .with_address_length(4)
        .with_data_rate(DataRate::Mbps1)
        .with_dynamic_payloads(false)
        .with_payload_length(32)
        .with_rx_address(1, &BLE_ADDRESS)
        .with_tx_address(&BLE_ADDRESS)
}

/// A fake BLE beacon.
///
/// The radio must be configured with [`ble_config()`] first.
///
/// ```ignore
/// use nrf24::radio::{prelude::*, RadioHandle};
/// use nrf24ble::{ble_config, FakeBle, ServicePayload};
///
/// let mut radio = RadioHandle::new(ce_pin, spi_device, delay_impl);
/// radio.begin()?;
/// radio.with_config(&ble_config())?;
/// let mut ble = FakeBle::default();
/// ble.set_name("nRF24L01");
/// ble.advertise(&mut radio, &[ServicePayload::Battery(85)])?;
/// ble.hop_channel(&mut radio)?;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FakeBle {
    /// The advertiser's MAC address.
    pub mac_address: [u8; 6],
    name: [u8; 10],
    name_len: u8,
    /// Include the radio's PA level in advertisements.
    ///
    /// This takes 3 of the 18 bytes available for AD structures.
    pub show_pa_level: bool,
}

impl Default for FakeBle {
    fn default() -> Self {
        Self {
            mac_address: *b"nRF24L",
            name: [0u8; 10],
            name_len: 0,
            show_pa_level: false,
        }
    }
}

impl FakeBle {
    /// The PDU type (ADV_NONCONN_IND) with a random TX address.
    const PDU_HEADER: u8 = 0x42;
    /// LE General Discoverable, BR/EDR not supported.
    const FLAGS: [u8; 3] = [2, 1, 5];

    /// Set the device name included in advertisements.
    ///
    /// Only the first 10 bytes are used. The name takes `name.len() + 2`
    /// bytes of each advertisement. An empty `name` removes it.
    pub fn set_name(&mut self, name: &str) {
        let len = name.len().min(self.name.len());
        self.name[..len].copy_from_slice(&name.as_bytes()[..len]);
        self.name_len = len as u8;
    }

    pub fn name(&self) -> &[u8] {
        &self.name[..self.name_len as usize]
    }

    /// How many bytes of `ad_data` room are left in an advertisement?
    ///
    /// Accounts for the device name and [`FakeBle::show_pa_level`].
    /// A negative result means `ad_data` would not be transmitted.
    pub fn len_available(&self, ad_data: &[u8]) -> i8 {
        let mut available = 18 - ad_data.len().min(64) as i8;
        if self.name_len > 0 {
            available -= self.name_len as i8 + 2;
        }
        if self.show_pa_level {
            available -= 3;
        }
        available
    }

    /// Build the frame for `ad_data` as it will be transmitted on `channel`.
    ///
    /// `ad_data` must already be formatted as AD structures (see
    /// [`ServicePayload::encode()`]). The TX power AD structure is only
    /// included if `pa_level` is given.
    ///
    /// Returns [`None`] if the PDU would be longer than 27 bytes.
    pub fn make_payload(
        &self,
        ad_data: &[u8],
        pa_level: Option<PaLevel>,
        channel: u8,
    ) -> Option<[u8; 32]> {
        let name_len = if self.name_len > 0 {
            self.name_len as usize + 2
        } else {
            0
        };
        let pdu_len = self.mac_address.len()
            + Self::FLAGS.len()
            + if pa_level.is_some() { 3 } else { 0 }
            + name_len
            + ad_data.len();
        if pdu_len > MAX_PDU_LENGTH {
            return None;
        }

        let mut frame = [0u8; 32];
        frame[0] = Self::PDU_HEADER;
        frame[1] = pdu_len as u8;
        frame[2..8].copy_from_slice(&self.mac_address);
        frame[8..11].copy_from_slice(&Self::FLAGS);
        let mut offset = 11;
        let mut append = |bytes: &[u8]| {
            frame[offset..offset + bytes.len()].copy_from_slice(bytes);
            offset += bytes.len();
        };
        if let Some(level) = pa_level {
            append(&[2, 0x0A, level.dbm() as u8]);
        }
        if self.name_len > 0 {
            append(&[self.name_len + 1, 0x08]);
            append(self.name());
        }
        append(ad_data);

        let end = offset;
        let crc = crc24_ble(&frame[..end]);
        frame[end..end + 3].copy_from_slice(&crc);
        whiten(&mut frame[..end + 3], whitening_coefficient(channel));
        reverse_bits(&mut frame[..end + 3]);
        Some(frame)
    }

    /// Advertise `ad_data` on the radio's current channel.
    ///
    /// Returns `Ok(false)` if the advertisement is too big
    /// (see [`FakeBle::len_available()`]).
    pub fn send<SPI, DO, DELAY>(
        &self,
        radio: &mut RadioHandle<SPI, DO, DELAY>,
        ad_data: &[u8],
    ) -> Result<bool, RadioError<SPI::Error, DO::Error>>
    where
        SPI: SpiDevice,
        DO: OutputPin,
        DELAY: DelayNs,
    {
        let pa_level = if self.show_pa_level {
            Some(radio.get_pa_level()?)
        } else {
            None
        };
        let channel = radio.get_channel()?;
        match self.make_payload(ad_data, pa_level, channel) {
            // auto-ack is off, so this only fails on timeout
            Some(frame) => radio.send(&frame, false),
            None => {
                warn!("{} bytes of AD data do not fit in an advertisement", ad_data.len());
                Ok(false)
            }
        }
    }

    /// Advertise the given `services` on the radio's current channel.
    ///
    /// Returns `Ok(false)` if the encoded services do not fit.
    pub fn advertise<SPI, DO, DELAY>(
        &self,
        radio: &mut RadioHandle<SPI, DO, DELAY>,
        services: &[ServicePayload],
    ) -> Result<bool, RadioError<SPI::Error, DO::Error>>
    where
        SPI: SpiDevice,
        DO: OutputPin,
        DELAY: DelayNs,
    {
        let mut ad_data = [0u8; MAX_PDU_LENGTH];
        let mut len = 0;
        for service in services {
            let Some(written) = service.encode(&mut ad_data[len..]) else {
                warn!("services do not fit in an advertisement");
                return Ok(false);
            };
            len += written;
        }
        self.send(radio, &ad_data[..len])
    }

    /// Move the radio to the next BLE channel.
    ///
    /// A radio that is not on a BLE channel moves to the first one.
    /// BLE observers expect advertisements on all 3 channels.
    pub fn hop_channel<SPI, DO, DELAY>(
        &self,
        radio: &mut RadioHandle<SPI, DO, DELAY>,
    ) -> Result<(), RadioError<SPI::Error, DO::Error>>
    where
        SPI: SpiDevice,
        DO: OutputPin,
        DELAY: DelayNs,
    {
        let channel = radio.get_channel()?;
        let next = BleChannels::increment(channel).unwrap_or(BLE_CHANNEL[0]);
        debug!("hopping from channel {} to {}", channel, next);
        radio.set_channel(next)
    }

    /// Read and decode the next payload in the RX FIFO.
    ///
    /// The radio must still be on the channel the payload was received on,
    /// because that channel is the de-whitening key.
    ///
    /// Returns `Ok(None)` if the RX FIFO is empty or the payload is not a
    /// valid advertisement.
    pub fn read<SPI, DO, DELAY>(
        &self,
        radio: &mut RadioHandle<SPI, DO, DELAY>,
    ) -> Result<Option<BleAdvertisement>, RadioError<SPI::Error, DO::Error>>
    where
        SPI: SpiDevice,
        DO: OutputPin,
        DELAY: DelayNs,
    {
        let mut frame = [0u8; 32];
        if radio.read(&mut frame, Some(32))? == 0 {
            return Ok(None);
        }
        let channel = radio.get_channel()?;
        Ok(BleAdvertisement::decode(&mut frame, channel))
    }
}
