//! `owon-listener` library.
//!
//! Decodes the notification stream of an OWON B35 multimeter into readings
//! such as `+012.3mV`. The pipeline is pure and per line:
//! [`frame::extract_payload`] → [`frame::decode_hex`] →
//! [`measurement::interpret`] → [`output::display::DisplayFormatter`].
//!
//! The binary (`src/main.rs`) is responsible for logging setup, Ctrl-C and
//! process exit codes; the read loop lives in [`crate::app`].

pub mod app;
pub mod frame;
pub mod mac_address;
pub mod measurement;
pub mod output;
pub mod source;

#[cfg(test)]
mod test_utils;

// Re-export commonly used types at the crate root
pub use frame::{FrameError, RawFrame, decode_hex, extract_payload};
pub use mac_address::MacAddress;
pub use measurement::{Measurement, MinMax, Mode, Prefix, Unit, decode_line, interpret};
pub use output::display::DisplayFormatter;
pub use output::{FrameSink, OutputFormatter};
pub use source::{Backend, LineResult, LineStream, SourceConfig, SourceError};
