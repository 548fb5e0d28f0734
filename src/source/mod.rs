//! Line sources feeding the decoder.
//!
//! A source produces raw text lines, one per notification, over a channel.
//! The decoder itself never touches Bluetooth: the `gatttool` backend reads
//! the output of the BlueZ helper, the `stdin` backend reads lines piped in
//! (a live `gatttool` pipe or a captured session).

#[cfg(feature = "gatttool")]
pub mod gatttool;
pub mod stdin;

use crate::mac_address::MacAddress;
use std::io;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;

/// Characteristic handle the B35 streams its readings on.
pub const DEFAULT_HANDLE: &str = "0x2d";

/// Channel buffer size for raw lines.
pub const LINE_CHANNEL_BUFFER_SIZE: usize = 100;

/// Error type for line sources.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// The helper process could not be started
    #[error("Error executing '{command}': {reason}")]
    Spawn { command: String, reason: String },
    /// Reading from the source failed
    #[error("Read error: {0}")]
    Read(String),
    /// The helper process ended unsuccessfully
    #[error("'{command}' not found, or exited with error ({status})")]
    Exited { command: String, status: String },
    /// The gatttool backend needs to know which meter to talk to
    #[error("Missing meter address (use --address)")]
    MissingAddress,
}

impl From<io::Error> for SourceError {
    fn from(err: io::Error) -> Self {
        SourceError::Read(err.to_string())
    }
}

/// A raw line, terminator included, or the reason the source stopped.
pub type LineResult = Result<String, SourceError>;

/// An opened source: a human-readable description and its lines.
#[derive(Debug)]
pub struct LineStream {
    pub description: String,
    pub lines: mpsc::Receiver<LineResult>,
}

/// Settings shared by all backends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    pub address: Option<MacAddress>,
    pub handle: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            address: None,
            handle: DEFAULT_HANDLE.to_string(),
        }
    }
}

/// Available line source backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Backend {
    /// Spawn `gatttool` and listen for notifications
    #[cfg(feature = "gatttool")]
    Gatttool,
    /// Read notification lines from standard input
    Stdin,
}

impl Default for Backend {
    fn default() -> Self {
        #[cfg(feature = "gatttool")]
        return Backend::Gatttool;
        #[cfg(not(feature = "gatttool"))]
        return Backend::Stdin;
    }
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            #[cfg(feature = "gatttool")]
            Backend::Gatttool => write!(f, "gatttool"),
            Backend::Stdin => write!(f, "stdin"),
        }
    }
}

/// Forward every line of `reader` to `tx`, keeping line terminators.
///
/// Returns once the reader hits end of input or the receiving side is gone.
pub async fn forward_lines<R>(
    mut reader: R,
    tx: &mpsc::Sender<LineResult>,
) -> Result<(), SourceError>
where
    R: AsyncBufRead + Unpin,
{
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).await? == 0 {
            return Ok(());
        }
        if tx.send(Ok(line)).await.is_err() {
            return Ok(());
        }
    }
}

/// Open the line source selected by `backend`.
#[cfg_attr(not(feature = "gatttool"), allow(unused_variables))]
pub async fn start(backend: Backend, config: &SourceConfig) -> Result<LineStream, SourceError> {
    match backend {
        #[cfg(feature = "gatttool")]
        Backend::Gatttool => {
            let address = config.address.ok_or(SourceError::MissingAddress)?;
            gatttool::start(address, &config.handle).await
        }
        Backend::Stdin => Ok(stdin::start()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::BufReader;

    async fn collect(mut rx: mpsc::Receiver<LineResult>) -> Vec<LineResult> {
        let mut lines = Vec::new();
        while let Some(line) = rx.recv().await {
            lines.push(line);
        }
        lines
    }

    #[tokio::test]
    async fn test_forward_lines_keeps_terminators() {
        let reader = tokio_test::io::Builder::new()
            .read(b"Notification handle = 0x002e value: 2b 30\n")
            .read(b"partial ")
            .read(b"line\nlast")
            .build();

        let (tx, rx) = mpsc::channel(LINE_CHANNEL_BUFFER_SIZE);
        forward_lines(BufReader::new(reader), &tx).await.unwrap();
        drop(tx);

        let lines = collect(rx).await;
        assert_eq!(
            lines,
            vec![
                Ok("Notification handle = 0x002e value: 2b 30\n".to_string()),
                Ok("partial line\n".to_string()),
                Ok("last".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_forward_lines_reports_read_errors() {
        let reader = tokio_test::io::Builder::new()
            .read(b"first\n")
            .read_error(io::Error::other("device went away"))
            .build();

        let (tx, rx) = mpsc::channel(LINE_CHANNEL_BUFFER_SIZE);
        let result = forward_lines(BufReader::new(reader), &tx).await;
        drop(tx);

        assert_eq!(result, Err(SourceError::Read("device went away".to_string())));
        assert_eq!(collect(rx).await, vec![Ok("first\n".to_string())]);
    }

    #[tokio::test]
    async fn test_forward_lines_stops_when_receiver_dropped() {
        let reader = tokio_test::io::Builder::new().read(b"one\ntwo\n").build();

        let (tx, rx) = mpsc::channel(LINE_CHANNEL_BUFFER_SIZE);
        drop(rx);
        assert!(forward_lines(BufReader::new(reader), &tx).await.is_ok());
    }

    #[cfg(feature = "gatttool")]
    #[tokio::test]
    async fn test_gatttool_requires_address() {
        let result = start(Backend::Gatttool, &SourceConfig::default()).await;
        assert_eq!(result.unwrap_err(), SourceError::MissingAddress);
    }

    #[test]
    fn test_source_error_display() {
        let err = SourceError::Exited {
            command: "gatttool".to_string(),
            status: "exit status: 1".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "'gatttool' not found, or exited with error (exit status: 1)"
        );
        assert_eq!(
            SourceError::MissingAddress.to_string(),
            "Missing meter address (use --address)"
        );
        let err: SourceError = io::Error::other("broken pipe").into();
        assert_eq!(err.to_string(), "Read error: broken pipe");
    }

    #[test]
    fn test_backend_display() {
        #[cfg(feature = "gatttool")]
        assert_eq!(Backend::Gatttool.to_string(), "gatttool");
        assert_eq!(Backend::Stdin.to_string(), "stdin");
    }

    #[test]
    fn test_default_config_uses_meter_handle() {
        let config = SourceConfig::default();
        assert_eq!(config.handle, "0x2d");
        assert!(config.address.is_none());
    }
}
