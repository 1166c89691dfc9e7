//! Low level transformations applied to every BLE frame.
//!
//! A frame is built in this order:
//!
//! 1. append [`crc24_ble()`] of the PDU,
//! 2. [`whiten()`] the PDU and CRC,
//! 3. [`reverse_bits()`] of every byte, because the nRF24L01 transmits
//!    the MSBit first while BLE expects the LSBit first.
//!
//! Decoding applies the same steps in reverse order.

use crate::BleChannels;

/// Reverse the bit order of each byte in `buf`.
///
/// The byte order is not changed.
pub fn reverse_bits(buf: &mut [u8]) {
    buf.iter_mut().for_each(|byte| *byte = byte.reverse_bits());
}

/// The whitening seed for a nRF24L01 `channel`.
///
/// BLE advertising channels 37 - 39 map to [`BLE_CHANNEL`](crate::BLE_CHANNEL).
/// A channel outside of that list uses the seed of the first BLE channel.
pub fn whitening_coefficient(channel: u8) -> u8 {
    let index = BleChannels::index_of(channel).unwrap_or_default() as u8;
    (37 + index) | 0x40
}

/// Whiten or de-whiten `buf` in place.
///
/// The LFSR uses the polynomial x^7 + x^4 + 1 and is seeded with `coefficient`
/// (see [`whitening_coefficient()`]). Applying the same coefficient twice
/// restores the original data.
pub fn whiten(buf: &mut [u8], coefficient: u8) {
    let mut lfsr = coefficient;
    for byte in buf.iter_mut() {
        for bit in 0..8 {
            if lfsr & 1 == 1 {
                lfsr ^= 0x88;
                *byte ^= 1 << bit;
            }
            lfsr >>= 1;
        }
    }
}

/// Compute the BLE CRC24 of `data`.
///
/// Polynomial `0x00065B`, initial value `0x555555`, LSBit first.
/// The result is ordered for appending to the PDU before whitening.
pub fn crc24_ble(data: &[u8]) -> [u8; 3] {
    const POLYNOMIAL: u32 = 0x065B;
    let mut crc: u32 = 0x555555;
    for byte in data {
        crc ^= (byte.reverse_bits() as u32) << 16;
        for _ in 0..8 {
            crc = if crc & 0x800000 != 0 {
                (crc << 1) ^ POLYNOMIAL
            } else {
                crc << 1
            };
        }
        crc &= 0xFFFFFF;
    }
    let [_, high, mid, low] = crc.to_be_bytes();
    [high.reverse_bits(), mid.reverse_bits(), low.reverse_bits()]
}

#[cfg(test)]
mod test {
    use super::{crc24_ble, reverse_bits, whiten, whitening_coefficient};
    use crate::BLE_CHANNEL;

    #[test]
    fn reverse() {
        let mut buf = *b"Hello World";
        reverse_bits(&mut buf);
        assert_eq!(
            buf,
            [0x12, 0xA6, 0x36, 0x36, 0xF6, 0x04, 0xEA, 0xF6, 0x4E, 0x36, 0x26]
        );
        reverse_bits(&mut buf);
        assert_eq!(&buf, b"Hello World");
    }

    #[test]
    fn whitening() {
        let coefficient = (2 + 37) | 0x40;
        let mut buf = *b"Hello World";
        whiten(&mut buf, coefficient);
        assert_eq!(
            buf,
            [0x57, 0x52, 0x26, 0x33, 0xEA, 0xD6, 0xCB, 0xF5, 0xB3, 0xBA, 0xA1]
        );
        whiten(&mut buf, coefficient);
        assert_eq!(&buf, b"Hello World");
    }

    #[test]
    fn coefficients() {
        assert_eq!(whitening_coefficient(BLE_CHANNEL[0]), 0x65);
        assert_eq!(whitening_coefficient(BLE_CHANNEL[1]), 0x66);
        assert_eq!(whitening_coefficient(BLE_CHANNEL[2]), 0x67);
        assert_eq!(whitening_coefficient(76), 0x65);
    }

    #[test]
    fn crc() {
        let data = b"Hello World";
        assert_eq!(crc24_ble(data), [0xB6, 0x8C, 0xB0]);
        assert_eq!(crc24_ble(&[]), [0xAA, 0xAA, 0xAA]);
    }
}
