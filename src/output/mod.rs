//! Rendering and delivery of meter readings.
//!
//! [`OutputFormatter`] turns a [`Measurement`] into text; a [`FrameSink`]
//! decides where that text goes (the live terminal view, the snapshot file).

pub mod display;
pub mod snapshot;
pub mod terminal;

use crate::measurement::Measurement;
use std::io;

/// Trait for formatting measurements into output strings.
pub trait OutputFormatter: Send + Sync {
    /// Format a measurement.
    ///
    /// # Arguments
    /// * `measurement` - The reading to render
    ///
    /// # Returns
    /// The display text for the reading
    fn format(&self, measurement: &Measurement) -> String;
}

/// Destination for rendered readings.
///
/// Every sink holds a single frame: each call replaces what was shown before.
pub trait FrameSink {
    /// Replace the current view with a freshly formatted reading.
    fn show_reading(&mut self, text: &str) -> io::Result<()>;

    /// A partial frame arrived; the next complete one is still pending.
    fn show_waiting(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// One-off status message, e.g. which helper command is being read.
    fn show_notice(&mut self, _text: &str) -> io::Result<()> {
        Ok(())
    }
}
