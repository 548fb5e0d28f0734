//! Core application runner for `owon-listener`.
//!
//! This module is decoupled from process setup (logging, signals, exit codes)
//! so the read-decode-display loop can be tested with injected sources and
//! sinks.

use crate::mac_address::MacAddress;
use crate::measurement::decode_line;
use crate::output::display::DisplayFormatter;
use crate::output::snapshot::{DEFAULT_SNAPSHOT_PATH, SnapshotFile};
use crate::output::terminal::Terminal;
use crate::output::{FrameSink, OutputFormatter};
use crate::source::{Backend, DEFAULT_HANDLE, LineStream, SourceConfig, SourceError};
use clap::Parser;
use std::future::Future;
use std::io;
use std::path::PathBuf;
use std::pin::Pin;
use thiserror::Error;
use tracing::{debug, trace, warn};

/// Command line configuration.
#[derive(Parser, Debug, Clone)]
#[command(author, about, version)]
pub struct Options {
    /// Bluetooth address of the B35 meter, e.g. -a 98:84:E3:CD:C0:E5
    #[arg(short = 'a', long)]
    pub address: Option<MacAddress>,

    /// GATT characteristic handle the meter notifies on
    #[arg(long, default_value = DEFAULT_HANDLE)]
    pub handle: String,

    /// Where notification lines are read from
    #[arg(long, default_value_t, value_enum)]
    pub source: Backend,

    /// Keep a text file containing the current meter reading
    #[arg(short = 't', long = "text-file")]
    pub text_file: bool,

    /// File name for the current reading (used with --text-file)
    #[arg(short = 'o', long, default_value = DEFAULT_SNAPSHOT_PATH)]
    pub output: PathBuf,

    /// Debug output: log raw lines and decoded frames
    #[arg(short = 'd', long)]
    pub debug: bool,

    /// Quiet: do not draw readings on the terminal
    #[arg(short = 'q', long)]
    pub quiet: bool,
}

impl Options {
    pub fn source_config(&self) -> SourceConfig {
        SourceConfig {
            address: self.address,
            handle: self.handle.clone(),
        }
    }
}

/// Errors returned by the core run loop.
#[derive(Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Source(#[from] SourceError),
}

/// Source abstraction to enable deterministic tests without a meter.
pub trait LineSource: Send + Sync {
    fn open(
        &self,
        backend: Backend,
        config: SourceConfig,
    ) -> Pin<Box<dyn Future<Output = Result<LineStream, SourceError>> + Send + '_>>;
}

/// Real source implementation that delegates to the compiled-in backends.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealSource;

impl LineSource for RealSource {
    fn open(
        &self,
        backend: Backend,
        config: SourceConfig,
    ) -> Pin<Box<dyn Future<Output = Result<LineStream, SourceError>> + Send + '_>> {
        Box::pin(async move { crate::source::start(backend, &config).await })
    }
}

/// Run the core loop: read lines from `source`, decode them and hand the
/// display text to every sink.
///
/// - Complete frames are formatted and shown on all sinks.
/// - Partial frames make the sinks show their waiting state.
/// - Lines without a frame are skipped.
///
/// A sink that fails to show something is logged and keeps receiving later
/// frames. Returns when the source closes, or with the first source error.
pub async fn run_with_io(
    options: &Options,
    source: &dyn LineSource,
    sinks: &mut [&mut dyn FrameSink],
) -> Result<(), RunError> {
    let formatter = DisplayFormatter::new();
    let mut stream = source.open(options.source, options.source_config()).await?;

    let notice = format!("Listening ({})", stream.description);
    show_on_all(sinks, "notice", |sink| sink.show_notice(&notice));

    while let Some(result) = stream.lines.recv().await {
        let line = result?;
        debug!(line = line.trim_end(), "received");

        match decode_line(&line) {
            Ok(measurement) => {
                let text = formatter.format(&measurement);
                show_on_all(sinks, "reading", |sink| sink.show_reading(&text));
            }
            Err(e) if e.is_waiting() => {
                debug!(error = %e, "waiting for a complete frame");
                show_on_all(sinks, "waiting state", |sink| sink.show_waiting());
            }
            Err(_) => trace!("not a data line"),
        }
    }

    Ok(())
}

fn show_on_all(
    sinks: &mut [&mut dyn FrameSink],
    what: &str,
    mut show: impl FnMut(&mut dyn FrameSink) -> io::Result<()>,
) {
    for sink in sinks.iter_mut() {
        if let Err(e) = show(&mut **sink) {
            warn!(error = %e, "couldn't show {what}");
        }
    }
}

/// Build the sinks requested by `options` and run against the real source.
///
/// A snapshot file that cannot be created is reported and skipped.
pub async fn run(options: Options) -> Result<(), RunError> {
    let mut terminal = (!options.quiet).then(|| Terminal::new(io::stdout()));

    let mut snapshot = if options.text_file {
        match SnapshotFile::create(&options.output) {
            Ok(file) => Some(file),
            Err(e) => {
                warn!(
                    path = %options.output.display(),
                    error = %e,
                    "couldn't open snapshot file, not saving to file"
                );
                None
            }
        }
    } else {
        None
    };

    let mut sinks: Vec<&mut dyn FrameSink> = Vec::new();
    if let Some(terminal) = terminal.as_mut() {
        sinks.push(terminal);
    }
    if let Some(snapshot) = snapshot.as_mut() {
        sinks.push(snapshot);
    }

    run_with_io(&options, &RealSource, &mut sinks).await
}
