//! Everything that talks to the radio.
pub mod prelude;

mod register_map;
pub use register_map::{commands, registers};

mod handle;
pub use handle::{RadioDetails, RadioHandle};

mod config;
pub use config::{PipeConfig, RadioConfig};
