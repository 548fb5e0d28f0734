//! `gatttool` backend.
//!
//! Runs the BlueZ `gatttool` helper in listen mode and forwards its output.
//! Connection handling and notification subscription are left to the helper.

use super::{LINE_CHANNEL_BUFFER_SIZE, LineStream, SourceError, forward_lines};
use crate::mac_address::MacAddress;
use std::process::Stdio;
use tokio::io::BufReader;
use tokio::process::Command;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Helper binary name.
pub const GATTTOOL: &str = "gatttool";

/// Arguments for listening to `handle` on the meter at `address`.
pub fn arguments(address: &MacAddress, handle: &str) -> Vec<String> {
    vec![
        "-b".to_string(),
        address.to_string(),
        "--char-read".to_string(),
        "--handle".to_string(),
        handle.to_string(),
        "--listen".to_string(),
    ]
}

/// The full command line, for messages.
pub fn command_line(address: &MacAddress, handle: &str) -> String {
    let mut command = GATTTOOL.to_string();
    for arg in arguments(address, handle) {
        command.push(' ');
        command.push_str(&arg);
    }
    command
}

/// Spawn `gatttool` and stream its stdout.
///
/// The helper is killed when the reading task is dropped, e.g. when the
/// runtime shuts down after Ctrl-C. A non-zero exit is reported as the final
/// item on the channel.
pub async fn start(address: MacAddress, handle: &str) -> Result<LineStream, SourceError> {
    let command = command_line(&address, handle);

    let mut child = Command::new(GATTTOOL)
        .args(arguments(&address, handle))
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| SourceError::Spawn {
            command: command.clone(),
            reason: e.to_string(),
        })?;

    let stdout = child.stdout.take().ok_or_else(|| SourceError::Spawn {
        command: command.clone(),
        reason: "stdout not captured".to_string(),
    })?;

    info!(%command, "helper started");

    let (tx, rx) = mpsc::channel(LINE_CHANNEL_BUFFER_SIZE);
    let description = command.clone();

    tokio::spawn(async move {
        if let Err(e) = forward_lines(BufReader::new(stdout), &tx).await {
            let _ = tx.send(Err(e)).await;
            return;
        }

        match child.wait().await {
            Ok(status) if status.success() => debug!(%command, "helper finished"),
            Ok(status) => {
                let _ = tx
                    .send(Err(SourceError::Exited {
                        command,
                        status: status.to_string(),
                    }))
                    .await;
            }
            Err(e) => {
                let _ = tx.send(Err(e.into())).await;
            }
        }
    });

    Ok(LineStream {
        description,
        lines: rx,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const METER: MacAddress = MacAddress([0x98, 0x84, 0xE3, 0xCD, 0xC0, 0xE5]);

    #[test]
    fn test_command_line() {
        assert_eq!(
            command_line(&METER, "0x2d"),
            "gatttool -b 98:84:E3:CD:C0:E5 --char-read --handle 0x2d --listen"
        );
    }

    #[test]
    fn test_arguments_use_handle() {
        let args = arguments(&METER, "0x30");
        assert_eq!(args[1], "98:84:E3:CD:C0:E5");
        assert_eq!(args[4], "0x30");
        assert_eq!(args.last().map(String::as_str), Some("--listen"));
    }
}
