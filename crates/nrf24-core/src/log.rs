//! Crate-private logging macros.
//!
//! Messages go to `defmt` or to the `log` facade depending on the enabled
//! features. Without either feature the macros expand to nothing, so only
//! values implementing both `defmt::Format` and `Display` should be logged.

macro_rules! debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        {
            defmt::debug!($($arg)*);
        }
        #[cfg(feature = "log")]
        {
            log::debug!($($arg)*);
        }
    }};
}
pub(crate) use debug;

macro_rules! info {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        {
            defmt::info!($($arg)*);
        }
        #[cfg(feature = "log")]
        {
            log::info!($($arg)*);
        }
    }};
}
pub(crate) use info;

macro_rules! warni {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        {
            defmt::warn!($($arg)*);
        }
        #[cfg(feature = "log")]
        {
            log::warn!($($arg)*);
        }
    }};
}
pub(crate) use warni as warn;

macro_rules! error {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        {
            defmt::error!($($arg)*);
        }
        #[cfg(feature = "log")]
        {
            log::error!($($arg)*);
        }
    }};
}
pub(crate) use error;
