use crate::{
    framing::{crc24_ble, reverse_bits, whiten, whitening_coefficient},
    log::debug,
    services::{ServicePayload, UrlPayload, SERVICE_DATA},
};

/// The largest PDU payload (MAC address and AD structures) that fits in
/// a 32 byte nRF24L01 payload along with the PDU header and CRC.
pub const MAX_PDU_LENGTH: usize = 27;

const AD_SHORT_NAME: u8 = 0x08;
const AD_COMPLETE_NAME: u8 = 0x09;
const AD_TX_POWER: u8 = 0x0A;

/// A decoded BLE advertisement.
///
/// Only the AD structures understood by this crate are kept.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BleAdvertisement {
    /// The advertiser's MAC address.
    pub mac_address: [u8; 6],
    name: [u8; 10],
    name_len: u8,
    /// The advertised TX power (in dBm).
    pub tx_power: Option<i8>,
    /// A battery's remaining charge (in percent).
    pub battery_charge: Option<u8>,
    /// A temperature (in Celsius).
    pub temperature: Option<f32>,
    pub url: Option<UrlPayload>,
}

impl BleAdvertisement {
    /// The advertised device name (up to 10 bytes).
    pub fn name(&self) -> Option<&[u8]> {
        (self.name_len > 0).then(|| &self.name[..self.name_len as usize])
    }

    /// Decode a frame received on `channel`.
    ///
    /// `frame` is restored to the plain PDU in the process.
    /// Returns [`None`] if the frame is malformed or the CRC does not match.
    pub fn decode(frame: &mut [u8; 32], channel: u8) -> Option<Self> {
        reverse_bits(frame);
        whiten(frame, whitening_coefficient(channel));

        let len = frame[1] as usize;
        if !(6..=MAX_PDU_LENGTH).contains(&len) {
            debug!("BLE frame dropped: PDU length {} is out of range", len);
            return None;
        }
        let end = len + 2;
        if frame[end..end + 3] != crc24_ble(&frame[..end]) {
            debug!("BLE frame dropped: CRC mismatch");
            return None;
        }

        let mut advertisement = Self::default();
        advertisement.mac_address.copy_from_slice(&frame[2..8]);

        let mut index = 8;
        while index < end {
            let ad_len = frame[index] as usize;
            if ad_len == 0 || index + ad_len >= end {
                break;
            }
            let ad_type = frame[index + 1];
            let data = &frame[index + 2..=index + ad_len];
            match ad_type {
                AD_SHORT_NAME | AD_COMPLETE_NAME => {
                    let name_len = data.len().min(advertisement.name.len());
                    advertisement.name[..name_len].copy_from_slice(&data[..name_len]);
                    advertisement.name_len = name_len as u8;
                }
                AD_TX_POWER => advertisement.tx_power = data.first().map(|dbm| *dbm as i8),
                SERVICE_DATA => match ServicePayload::decode(data) {
                    Some(ServicePayload::Battery(charge)) => {
                        advertisement.battery_charge = Some(charge)
                    }
                    Some(ServicePayload::Temperature(celsius)) => {
                        advertisement.temperature = Some(celsius)
                    }
                    Some(ServicePayload::Url(url)) => advertisement.url = Some(url),
                    None => {}
                },
                _ => {}
            }
            index += ad_len + 1;
        }
        Some(advertisement)
    }
}

#[cfg(test)]
mod test {
    use super::BleAdvertisement;
    use crate::{
        framing::{reverse_bits, whiten, whitening_coefficient},
        services::{ServicePayload, UrlPayload},
        FakeBle, BLE_CHANNEL,
    };
    use nrf24::PaLevel;

    fn encode(services: &[ServicePayload]) -> ([u8; 18], usize) {
        let mut ad_data = [0u8; 18];
        let mut len = 0;
        for service in services {
            len += service.encode(&mut ad_data[len..]).unwrap();
        }
        (ad_data, len)
    }

    #[test]
    fn battery_round_trip() {
        let mut ble = FakeBle::default();
        ble.set_name("nRF24L01");
        let (ad_data, len) = encode(&[ServicePayload::Battery(85)]);
        for channel in BLE_CHANNEL {
            let mut frame = ble
                .make_payload(&ad_data[..len], Some(PaLevel::Low), channel)
                .unwrap();
            let advertisement = BleAdvertisement::decode(&mut frame, channel).unwrap();
            assert_eq!(advertisement.mac_address, ble.mac_address);
            assert_eq!(advertisement.name(), Some(&b"nRF24L01"[..]));
            assert_eq!(advertisement.tx_power, Some(-12));
            assert_eq!(advertisement.battery_charge, Some(85));
            assert_eq!(advertisement.temperature, None);
            assert_eq!(advertisement.url, None);
        }
    }

    #[test]
    fn temperature_and_url() {
        let ble = FakeBle::default();
        let url = UrlPayload::new("https://www.google.com").unwrap();
        let (ad_data, len) = encode(&[ServicePayload::Url(url)]);
        let mut frame = ble.make_payload(&ad_data[..len], None, 26).unwrap();
        let advertisement = BleAdvertisement::decode(&mut frame, 26).unwrap();
        assert_eq!(advertisement.url, Some(url));
        assert_eq!(advertisement.name(), None);
        assert_eq!(advertisement.tx_power, None);

        let (ad_data, len) = encode(&[ServicePayload::Temperature(-4.5)]);
        let mut frame = ble.make_payload(&ad_data[..len], None, 80).unwrap();
        let advertisement = BleAdvertisement::decode(&mut frame, 80).unwrap();
        assert_eq!(advertisement.temperature, Some(-4.5));
    }

    #[test]
    fn unknown_ad_skipped() {
        let ble = FakeBle::default();
        let mut ad_data = [0u8; 10];
        // service data with an unknown UUID
        ad_data[..5].copy_from_slice(&[4, 0x16, 0xFF, 0x0F, 0xFF]);
        ServicePayload::Battery(42).encode(&mut ad_data[5..]).unwrap();
        let mut frame = ble.make_payload(&ad_data, None, BLE_CHANNEL[0]).unwrap();
        let advertisement = BleAdvertisement::decode(&mut frame, BLE_CHANNEL[0]).unwrap();
        assert_eq!(advertisement.battery_charge, Some(42));
    }

    #[test]
    fn bad_ad_length_ends_walk() {
        let ble = FakeBle::default();
        for ad_data in [
            [0u8, 4, 0x16, 0x0F, 0x18, 0x55],
            [9u8, 0x16, 0x0F, 0x18, 0x55, 0],
        ] {
            let mut frame = ble.make_payload(&ad_data, None, BLE_CHANNEL[0]).unwrap();
            let advertisement = BleAdvertisement::decode(&mut frame, BLE_CHANNEL[0]).unwrap();
            assert_eq!(advertisement.mac_address, ble.mac_address);
            assert_eq!(advertisement.battery_charge, None);
        }
    }

    #[test]
    fn bad_length() {
        let coefficient = whitening_coefficient(BLE_CHANNEL[0]);
        for len in [5u8, 28] {
            let mut frame = [0u8; 32];
            frame[1] = len;
            whiten(&mut frame, coefficient);
            reverse_bits(&mut frame);
            assert!(BleAdvertisement::decode(&mut frame, BLE_CHANNEL[0]).is_none());
        }
    }

    #[test]
    fn bad_crc() {
        let ble = FakeBle::default();
        let mut frame = ble.make_payload(&[0x11; 18], None, BLE_CHANNEL[0]).unwrap();
        // corrupt the MAC address
        frame[4] ^= 0xFF;
        assert!(BleAdvertisement::decode(&mut frame, BLE_CHANNEL[0]).is_none());
    }
}
