use crate::frame::{FRAME_LEN, RawFrame};
use std::fmt::Write;

/// `+0123 uV Auto` in the integer range.
pub const AUTO_MICROVOLT_FRAME: [u8; FRAME_LEN] = [
    0x2b, 0x30, 0x31, 0x32, 0x33, 0x20, 0x30, 0x21, 0x00, 0x80, 0x80, 0x00, 0x00, 0x00,
];

/// `+1234 V Auto`, no prefix, integer range. Starting point for [`frame_with`].
const BASE_FRAME: [u8; FRAME_LEN] = [
    b'+', b'1', b'2', b'3', b'4', b' ', 48, 33, 0, 8, 128, 0, 0, 0,
];

/// Build a frame from [`BASE_FRAME`] with the given `(index, byte)` overrides.
pub fn frame_with(overrides: &[(usize, u8)]) -> RawFrame {
    let mut bytes = BASE_FRAME;
    for &(index, byte) in overrides {
        bytes[index] = byte;
    }
    RawFrame(bytes)
}

/// Render bytes the way gatttool prints a notification, newline included.
pub fn notification_line(bytes: &[u8]) -> String {
    let mut line = String::from("Notification handle = 0x002e value: ");
    for byte in bytes {
        let _ = write!(line, "{byte:02x} ");
    }
    line.push('\n');
    line
}
