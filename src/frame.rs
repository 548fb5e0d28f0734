//! Frame extraction and hex decoding for B35 notification lines.
//!
//! The Bluetooth helper prints one line per characteristic notification, e.g.
//!
//! ```text
//! Notification handle = 0x002e value: 2b 30 31 32 33 20 30 21 00 80 80 00 00 00
//! ```
//!
//! Everything after the marker is the frame: 14 bytes printed as `"%02x "`
//! tokens followed by the line terminator.

use std::fmt;
use thiserror::Error;

/// Marker that precedes the hex-encoded frame in a notification line.
pub const FRAME_MARKER: &str = "2e value: ";

/// Number of bytes in one meter frame.
pub const FRAME_LEN: usize = 14;

/// Expected length of the text following [`FRAME_MARKER`]: 14 `"xx "` tokens
/// plus the trailing newline.
pub const ENCODED_FRAME_LEN: usize = 43;

/// Leading bytes of a frame reporting an out-of-range reading ("O.L").
pub const OVERLOAD_PATTERN: [u8; 5] = [0x2b, 0x3f, 0x30, 0x3a, 0x3f];

/// Reasons a line does not yield a frame. None of these are fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// The line does not carry a notification value at all.
    #[error("Not a data line")]
    NotADataLine,
    /// The marker was found but the payload has the wrong width.
    #[error("Incomplete frame: expected 43 characters, got {0}")]
    IncompleteFrame(usize),
    /// The payload ran out of valid hex tokens before 14 bytes were read.
    #[error("Hex decode failure: decoded {0} of 14 bytes")]
    HexDecode(usize),
}

impl FrameError {
    /// Whether the caller should show the transient waiting indicator
    /// rather than silently skipping the line.
    pub fn is_waiting(&self) -> bool {
        !matches!(self, FrameError::NotADataLine)
    }
}

/// One decoded meter frame. The index of each byte is its field identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RawFrame(pub [u8; FRAME_LEN]);

impl RawFrame {
    /// Byte at `index`.
    #[inline]
    pub fn byte(&self, index: usize) -> u8 {
        self.0[index]
    }

    /// True when the frame starts with [`OVERLOAD_PATTERN`].
    pub fn is_overload(&self) -> bool {
        self.0.starts_with(&OVERLOAD_PATTERN)
    }
}

impl fmt::Display for RawFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "[{i}]({byte:02x})")?;
        }
        Ok(())
    }
}

/// Locate the frame payload in a raw line.
///
/// Returns the text following [`FRAME_MARKER`] when it is exactly
/// [`ENCODED_FRAME_LEN`] characters wide.
pub fn extract_payload(line: &str) -> Result<&str, FrameError> {
    let start = line.find(FRAME_MARKER).ok_or(FrameError::NotADataLine)?;
    let payload = &line[start + FRAME_MARKER.len()..];

    if payload.len() != ENCODED_FRAME_LEN {
        return Err(FrameError::IncompleteFrame(payload.len()));
    }

    Ok(payload)
}

/// Decode whitespace separated base-16 tokens into a [`RawFrame`].
///
/// Decoding stops at the first token that is not a valid byte, or once 14
/// bytes have been read. Anything short of a full frame is an error.
pub fn decode_hex(payload: &str) -> Result<RawFrame, FrameError> {
    let mut bytes = [0u8; FRAME_LEN];
    let mut count = 0;

    for token in payload.split_ascii_whitespace() {
        if count == FRAME_LEN {
            break;
        }
        match u8::from_str_radix(token, 16) {
            Ok(byte) => {
                bytes[count] = byte;
                count += 1;
            }
            Err(_) => break,
        }
    }

    if count < FRAME_LEN {
        return Err(FrameError::HexDecode(count));
    }

    Ok(RawFrame(bytes))
}
