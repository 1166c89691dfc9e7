#![doc = include_str!("../README.md")]
//! ## Limitations
//!
//! The nRF24L01 was not designed for BLE, so a fake BLE beacon has limits.
//!
//! 1. Only 18 bytes remain for AD structures (when neither a device name nor
//!    the PA level is advertised):
//!
//!    ```text
//!    32 (nRF24L01 maximum) - 2 (PDU header) - 6 (MAC address) - 3 (flags) - 3 (CRC24) = 18
//!    ```
//!
//!    Use [`FakeBle::len_available()`](fn@crate::FakeBle::len_available) to
//!    check if a payload fits.
//! 2. Only the 3 BLE advertising channels are usable: 2.402 GHz, 2.426 GHz and 2.480 GHz.
//!    [`FakeBle::hop_channel()`](fn@crate::FakeBle::hop_channel) cycles through them.
//! 3. The radio's CRC is disabled because BLE uses a 3 byte CRC.
//!    The CRC24 is appended to the payload instead.
//! 4. BLE addresses are 4 bytes long.
//! 5. Auto-ack, auto-retries, ACK payloads and dynamic payloads are unusable.
//! 6. BLE advertisements are always sent at 1 Mbps.
//! 7. Only the `rx_dr` and `tx_ds` events assert the IRQ pin, because
//!    `tx_df` needs auto-ack.
#![no_std]

#[cfg(feature = "std")]
extern crate std;

mod log;

mod radio;
pub use radio::{ble_config, BleChannels, FakeBle, BLE_ADDRESS, BLE_CHANNEL};

mod advertisement;
pub use advertisement::{BleAdvertisement, MAX_PDU_LENGTH};

pub mod framing;

pub mod services;
pub use services::{ServicePayload, UrlPayload};
