//! BLE service data that fits in a fake BLE advertisement.
//!
//! Each service is encoded as one "Service Data" AD structure:
//!
//! ```text
//! | length | 0x16 | UUID (LE) | data ... |
//! ```

#[cfg(feature = "std")]
use std::string::String;

/// The Battery Service UUID.
pub const BATTERY_UUID: u16 = 0x180F;
/// The Health Thermometer Service UUID.
pub const TEMPERATURE_UUID: u16 = 0x1809;
/// The Eddystone Service UUID.
pub const EDDYSTONE_UUID: u16 = 0xFEAA;

/// The AD type of a "Service Data - 16 bit UUID" structure.
pub(crate) const SERVICE_DATA: u8 = 0x16;

/// The Eddystone frame type of a URL frame.
const EDDYSTONE_URL_FRAME: u8 = 0x10;

/// The exponent of the IEEE-11073 FLOAT used for temperatures (10^-2).
const TEMPERATURE_EXPONENT: i8 = -2;

/// The largest AD structure (including its length byte) that still leaves
/// room for the MAC address, the flags and the CRC.
pub const MAX_AD_LENGTH: usize = 18;

/// Encoded URL bytes after the Eddystone header and the scheme byte.
const URL_BODY_MAX: usize = MAX_AD_LENGTH - 7;

const URL_SCHEMES: [&str; 4] = ["http://www.", "https://www.", "http://", "https://"];
const URL_EXPANSIONS: [&str; 14] = [
    ".com/", ".org/", ".edu/", ".net/", ".info/", ".biz/", ".gov/", ".com", ".org", ".edu",
    ".net", ".info", ".biz", ".gov",
];

/// A URL compressed with the Eddystone-URL scheme and expansion tables.
///
/// Only 11 bytes remain for the compressed URL after the scheme, so longer
/// URLs are truncated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UrlPayload {
    pa_level: i8,
    scheme: u8,
    body: [u8; URL_BODY_MAX],
    body_len: u8,
}

impl UrlPayload {
    /// The calibrated TX power (at 0 meters) used unless told otherwise.
    pub const DEFAULT_PA_LEVEL: i8 = -25;

    /// Compress a `url`.
    ///
    /// Returns [`None`] if the `url` does not start with `http://` or `https://`.
    pub fn new(url: &str) -> Option<Self> {
        let (scheme, prefix) = URL_SCHEMES
            .iter()
            .enumerate()
            .find(|(_, prefix)| url.starts_with(**prefix))?;

        let mut rest = &url.as_bytes()[prefix.len()..];
        let mut body = [0u8; URL_BODY_MAX];
        let mut body_len = 0;
        while !rest.is_empty() && body_len < URL_BODY_MAX {
            let expansion = URL_EXPANSIONS
                .iter()
                .enumerate()
                .find(|(_, expansion)| rest.starts_with(expansion.as_bytes()));
            if let Some((code, expansion)) = expansion {
                body[body_len] = code as u8;
                rest = &rest[expansion.len()..];
            } else {
                body[body_len] = rest[0];
                rest = &rest[1..];
            }
            body_len += 1;
        }

        Some(Self {
            pa_level: Self::DEFAULT_PA_LEVEL,
            scheme: scheme as u8,
            body,
            body_len: body_len as u8,
        })
    }

    /// Set the calibrated TX power (in dBm) that receivers use to estimate distance.
    pub fn with_pa_level(self, pa_level: i8) -> Self {
        Self { pa_level, ..self }
    }

    pub fn pa_level(&self) -> i8 {
        self.pa_level
    }

    /// Expand the URL into `out`.
    ///
    /// Returns the number of bytes written. The URL is cut short if `out`
    /// is too small.
    pub fn decode_into(&self, out: &mut [u8]) -> usize {
        let mut written = 0;
        let mut push = |bytes: &[u8]| {
            let len = bytes.len().min(out.len() - written);
            out[written..written + len].copy_from_slice(&bytes[..len]);
            written += len;
        };
        push(URL_SCHEMES[self.scheme as usize].as_bytes());
        for byte in &self.body[..self.body_len as usize] {
            match URL_EXPANSIONS.get(*byte as usize) {
                Some(expansion) => push(expansion.as_bytes()),
                None => push(core::slice::from_ref(byte)),
            }
        }
        written
    }

    /// Expand the URL into a [`String`].
    #[cfg(feature = "std")]
    pub fn to_url(&self) -> String {
        let mut url = String::from(URL_SCHEMES[self.scheme as usize]);
        for byte in &self.body[..self.body_len as usize] {
            match URL_EXPANSIONS.get(*byte as usize) {
                Some(expansion) => url.push_str(expansion),
                None => url.push(*byte as char),
            }
        }
        url
    }

    /// Parse the Eddystone frame that follows the UUID.
    fn from_frame(frame: &[u8]) -> Option<Self> {
        let [frame_type, pa_level, scheme, body @ ..] = frame else {
            return None;
        };
        if *frame_type != EDDYSTONE_URL_FRAME || *scheme as usize >= URL_SCHEMES.len() {
            return None;
        }
        let body_len = body.len().min(URL_BODY_MAX);
        let mut payload = Self {
            pa_level: *pa_level as i8,
            scheme: *scheme,
            body: [0u8; URL_BODY_MAX],
            body_len: body_len as u8,
        };
        payload.body[..body_len].copy_from_slice(&body[..body_len]);
        Some(payload)
    }
}

/// The service data broadcasted in an advertisement.
///
/// ```ignore
/// let battery = ServicePayload::Battery(85);
/// let temperature = ServicePayload::Temperature(21.5);
/// let url = ServicePayload::url("https://www.rust-lang.org").unwrap();
/// ble.advertise(&mut radio, &[battery, temperature])?;
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ServicePayload {
    /// A battery's remaining charge (in percent).
    Battery(u8),
    /// A temperature (in Celsius) with a resolution of 0.01 degrees.
    Temperature(f32),
    /// An Eddystone URL.
    Url(UrlPayload),
}

impl ServicePayload {
    /// Shortcut for a [`ServicePayload::Url`] with the default calibrated TX power.
    pub fn url(url: &str) -> Option<Self> {
        UrlPayload::new(url).map(ServicePayload::Url)
    }

    pub fn uuid(&self) -> u16 {
        match self {
            ServicePayload::Battery(_) => BATTERY_UUID,
            ServicePayload::Temperature(_) => TEMPERATURE_UUID,
            ServicePayload::Url(_) => EDDYSTONE_UUID,
        }
    }

    /// The number of bytes written by [`ServicePayload::encode()`].
    pub fn encoded_len(&self) -> usize {
        4 + match self {
            ServicePayload::Battery(_) => 1,
            ServicePayload::Temperature(_) => 4,
            ServicePayload::Url(url) => 3 + url.body_len as usize,
        }
    }

    /// Write the AD structure into `buf`.
    ///
    /// Returns the number of bytes written, or [`None`] if `buf` is too small.
    pub fn encode(&self, buf: &mut [u8]) -> Option<usize> {
        let len = self.encoded_len();
        let ad = buf.get_mut(..len)?;
        ad[0] = len as u8 - 1;
        ad[1] = SERVICE_DATA;
        ad[2..4].copy_from_slice(&self.uuid().to_le_bytes());
        match self {
            ServicePayload::Battery(charge) => ad[4] = *charge,
            ServicePayload::Temperature(celsius) => {
                let mantissa = centi_degrees(*celsius).to_le_bytes();
                ad[4..7].copy_from_slice(&mantissa[..3]);
                ad[7] = TEMPERATURE_EXPONENT as u8;
            }
            ServicePayload::Url(url) => {
                ad[4] = EDDYSTONE_URL_FRAME;
                ad[5] = url.pa_level as u8;
                ad[6] = url.scheme;
                ad[7..].copy_from_slice(&url.body[..url.body_len as usize]);
            }
        }
        Some(len)
    }

    /// Parse the content of a Service Data AD structure (UUID included).
    ///
    /// Returns [`None`] for unsupported UUIDs or truncated data.
    pub fn decode(service_data: &[u8]) -> Option<Self> {
        let [uuid_low, uuid_high, data @ ..] = service_data else {
            return None;
        };
        match u16::from_le_bytes([*uuid_low, *uuid_high]) {
            BATTERY_UUID => data.first().map(|charge| ServicePayload::Battery(*charge)),
            TEMPERATURE_UUID => match data {
                [m0, m1, m2, exponent, ..] => {
                    // sign-extend the 24 bit mantissa
                    let mantissa = i32::from_le_bytes([*m0, *m1, *m2, 0]) << 8 >> 8;
                    Some(ServicePayload::Temperature(from_float(
                        mantissa,
                        *exponent as i8,
                    )))
                }
                _ => None,
            },
            EDDYSTONE_UUID => UrlPayload::from_frame(data).map(ServicePayload::Url),
            _ => None,
        }
    }
}

/// `celsius * 100`, rounded and limited to a 24 bit signed range.
fn centi_degrees(celsius: f32) -> i32 {
    let scaled = celsius * 100.0;
    let rounded = if scaled < 0.0 {
        scaled - 0.5
    } else {
        scaled + 0.5
    };
    (rounded as i32).clamp(-0x800000, 0x7FFFFF)
}

/// `mantissa * 10^exponent`
fn from_float(mantissa: i32, exponent: i8) -> f32 {
    let mut scale = 1f32;
    for _ in 0..exponent.unsigned_abs() {
        scale *= 10.0;
    }
    if exponent < 0 {
        mantissa as f32 / scale
    } else {
        mantissa as f32 * scale
    }
}
