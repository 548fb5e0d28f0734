//! Standard input backend.

use super::{LINE_CHANNEL_BUFFER_SIZE, LineStream, forward_lines};
use tokio::io::BufReader;
use tokio::sync::mpsc;

/// Read notification lines from standard input until it closes.
pub fn start() -> LineStream {
    let (tx, rx) = mpsc::channel(LINE_CHANNEL_BUFFER_SIZE);

    tokio::spawn(async move {
        if let Err(e) = forward_lines(BufReader::new(tokio::io::stdin()), &tx).await {
            let _ = tx.send(Err(e)).await;
        }
    });

    LineStream {
        description: "stdin".to_string(),
        lines: rx,
    }
}
