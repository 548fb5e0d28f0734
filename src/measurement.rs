//! Interpretation of B35 frames into measurements.
//!
//! Byte layout of a [`RawFrame`]:
//!
//! | Index | Meaning |
//! |-------|---------|
//! | 0     | polarity, `'-'` for negative readings |
//! | 1..=4 | ASCII digits of the magnitude |
//! | 6     | decimal point position |
//! | 7     | operating mode |
//! | 8     | min/max qualifier |
//! | 9     | unit prefix (also flags diode test) |
//! | 10    | unit |
//!
//! Several fields ask for the decimal point to move. Each request is
//! expressed as a shift (positive moves the point left), the shifts are
//! summed, and the decimal place count is clamped once at the end.

use crate::frame::{FrameError, RawFrame, decode_hex, extract_payload};
use std::fmt;
use tracing::debug;

/// Highest number of fractional digits shown.
pub const MAX_DECIMAL_PLACES: u8 = 4;

const SIGN: usize = 0;
const DIGITS: std::ops::Range<usize> = 1..5;
const RANGE: usize = 6;
const MODE: usize = 7;
const MIN_MAX: usize = 8;
const PREFIX: usize = 9;
const UNIT: usize = 10;

const PREFIX_DIODE: u8 = 4;
const PREFIX_MILLI: u8 = 64;
const PREFIX_NONE: u8 = 0;
const MODE_DC_AUTO: u8 = 49;
const RANGE_HUNDREDTHS: u8 = 50;
const UNIT_FARAD: u8 = 4;

/// Operating mode reported in byte 7.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Blank,
    Manual,
    AcMinMax,
    AcManual,
    DcMinMax,
    DcManual,
    Delta,
    Auto,
    AcAuto,
    DcAuto,
    Hold,
    /// Diode test, signalled through the prefix byte rather than byte 7.
    Diode,
    Unknown(u8),
}

impl Mode {
    /// Resolve the mode from byte 7, letting the diode flag in byte 9 win.
    pub fn from_codes(mode: u8, prefix: u8) -> Self {
        if prefix == PREFIX_DIODE {
            return Mode::Diode;
        }
        match mode {
            0 | 32 => Mode::Blank,
            1 => Mode::Manual,
            8 => Mode::AcMinMax,
            9 => Mode::AcManual,
            16 => Mode::DcMinMax,
            17 => Mode::DcManual,
            20 => Mode::Delta,
            33 => Mode::Auto,
            41 => Mode::AcAuto,
            49 => Mode::DcAuto,
            51 => Mode::Hold,
            other => Mode::Unknown(other),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Mode::Blank => " ",
            Mode::Manual => "Manual",
            Mode::AcMinMax => "AC-minmax",
            Mode::AcManual => "AC-manual",
            Mode::DcMinMax => "DC-minmax",
            Mode::DcManual => "DC-manual",
            Mode::Delta => "Delta",
            Mode::Auto => "Auto",
            Mode::AcAuto => "AC-auto",
            Mode::DcAuto => "DC-auto",
            Mode::Hold => "Hold",
            Mode::Diode => "Diode",
            Mode::Unknown(code) => return write!(f, "#{code}"),
        };
        f.write_str(label)
    }
}

/// Unit prefix reported in byte 9.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prefix {
    /// No prefix: base unit, diode test, or an unqualified reading.
    None,
    Nano,
    Micro,
    Milli,
    Kilo,
    Mega,
    /// Duty cycle readings label the value instead of scaling it.
    Duty,
    Unknown(u8),
}

impl Prefix {
    /// Resolve the prefix from byte 9. Nano is only reported for capacitance,
    /// where byte 9 is zero and the unit byte says farad.
    pub fn from_codes(prefix: u8, unit: u8) -> Self {
        match prefix {
            PREFIX_NONE if unit == UNIT_FARAD => Prefix::Nano,
            PREFIX_NONE | PREFIX_DIODE | 8 => Prefix::None,
            2 => Prefix::Duty,
            16 => Prefix::Mega,
            32 => Prefix::Kilo,
            PREFIX_MILLI => Prefix::Milli,
            128 => Prefix::Micro,
            other => Prefix::Unknown(other),
        }
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Prefix::None => "",
            Prefix::Nano => "n",
            Prefix::Micro => "u",
            Prefix::Milli => "m",
            Prefix::Kilo => "K",
            Prefix::Mega => "M",
            Prefix::Duty => "duty",
            Prefix::Unknown(code) => return write!(f, "#{code}"),
        };
        f.write_str(label)
    }
}

/// Unit reported in byte 10.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Percent,
    Fahrenheit,
    Celsius,
    Farad,
    Hertz,
    Hfe,
    Ohm,
    Ampere,
    Volt,
    Unknown(u8),
}

impl Unit {
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => Unit::Percent,
            1 => Unit::Fahrenheit,
            2 => Unit::Celsius,
            UNIT_FARAD => Unit::Farad,
            8 => Unit::Hertz,
            16 => Unit::Hfe,
            32 => Unit::Ohm,
            64 => Unit::Ampere,
            128 => Unit::Volt,
            other => Unit::Unknown(other),
        }
    }

    /// Resistance digits carry one more decimal than the range byte states.
    fn shift(self) -> i32 {
        match self {
            Unit::Ohm => 1,
            _ => 0,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Unit::Percent => "%",
            Unit::Fahrenheit => "'F",
            Unit::Celsius => "'C",
            Unit::Farad => "F",
            Unit::Hertz => "Hz",
            Unit::Hfe => "hFe",
            Unit::Ohm => "Ohm",
            Unit::Ampere => "A",
            Unit::Volt => "V",
            Unit::Unknown(code) => return write!(f, "#{code}"),
        };
        f.write_str(label)
    }
}

/// Min/max hold qualifier reported in byte 8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MinMax {
    #[default]
    None,
    Min,
    Max,
}

impl MinMax {
    pub fn from_code(code: u8) -> Self {
        match code {
            16 => MinMax::Min,
            32 => MinMax::Max,
            _ => MinMax::None,
        }
    }
}

impl fmt::Display for MinMax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MinMax::None => "",
            MinMax::Min => "min",
            MinMax::Max => "max",
        })
    }
}

/// A single meter reading.
///
/// When `overload` is set only `unit` and `mode` carry information; the
/// numeric fields are zeroed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    /// Signed reading, already scaled to `decimal_places`
    pub value: f64,
    /// Fractional digits to display, within `0..=MAX_DECIMAL_PLACES`
    pub decimal_places: u8,
    pub prefix: Prefix,
    pub unit: Unit,
    pub mode: Mode,
    pub min_max: MinMax,
    /// The meter reported "O.L"
    pub overload: bool,
}

/// Four ASCII digits at bytes 1..=4 as an integer.
pub fn magnitude(frame: &RawFrame) -> i32 {
    frame.0[DIGITS]
        .iter()
        .fold(0, |acc, &digit| acc * 10 + (i32::from(digit) - i32::from(b'0')))
}

/// Decimal point position requested by the range byte.
pub fn range_shift(range: u8) -> i32 {
    match range {
        49 => 3,
        50 => 2,
        51 => 1,
        _ => 0,
    }
}

/// DC-auto reports hundredths one decade too fine.
pub fn mode_shift(mode: u8, range: u8) -> i32 {
    if mode == MODE_DC_AUTO && range == RANGE_HUNDREDTHS {
        -1
    } else {
        0
    }
}

/// Extra decade carried by nanofarad readings and by milli volts/amps.
pub fn prefix_shift(prefix: u8, unit: u8) -> i32 {
    match prefix {
        PREFIX_NONE if unit == UNIT_FARAD => 1,
        PREFIX_MILLI if unit == 128 || unit == 64 => 1,
        _ => 0,
    }
}

/// Clamp an accumulated shift into a displayable decimal place count.
pub fn clamp_places(shift: i32) -> u8 {
    // Clamped into 0..=4, so the cast cannot truncate.
    shift.clamp(0, i32::from(MAX_DECIMAL_PLACES)) as u8
}

fn apply_shift(magnitude: i32, shift: i32) -> f64 {
    let magnitude = f64::from(magnitude);
    if shift >= 0 {
        magnitude / 10f64.powi(shift)
    } else {
        magnitude * 10f64.powi(-shift)
    }
}

/// Interpret a decoded frame.
///
/// Unknown field codes never fail; they surface as `#<code>` labels.
pub fn interpret(frame: &RawFrame) -> Measurement {
    let unit = Unit::from_code(frame.byte(UNIT));
    let mode = Mode::from_codes(frame.byte(MODE), frame.byte(PREFIX));

    if frame.is_overload() {
        return Measurement {
            value: 0.0,
            decimal_places: 0,
            prefix: Prefix::None,
            unit,
            mode,
            min_max: MinMax::None,
            overload: true,
        };
    }

    let shift = range_shift(frame.byte(RANGE))
        + mode_shift(frame.byte(MODE), frame.byte(RANGE))
        + prefix_shift(frame.byte(PREFIX), frame.byte(UNIT))
        + unit.shift();

    let scaled = apply_shift(magnitude(frame), shift);
    let value = if frame.byte(SIGN) == b'-' {
        -scaled
    } else {
        scaled
    };

    Measurement {
        value,
        decimal_places: clamp_places(shift),
        prefix: Prefix::from_codes(frame.byte(PREFIX), frame.byte(UNIT)),
        unit,
        mode,
        min_max: MinMax::from_code(frame.byte(MIN_MAX)),
        overload: false,
    }
}

/// Run one raw line through extraction, hex decoding and interpretation.
pub fn decode_line(line: &str) -> Result<Measurement, FrameError> {
    let payload = extract_payload(line)?;
    let frame = decode_hex(payload)?;
    debug!(%frame, "decoded frame");
    Ok(interpret(&frame))
}
