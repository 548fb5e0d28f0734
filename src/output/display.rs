//! Meter-style display text.

use crate::measurement::Measurement;
use crate::output::OutputFormatter;

/// Renders readings the way the meter's own display reads.
///
/// ```text
/// +012.3mV
/// DC-auto max
/// ```
///
/// The value always carries a sign and is zero padded to five characters for
/// integer readings and six otherwise, so integer readings keep a leading
/// zero: 123 uV renders as `+0123uV`, not `+123uV`.
///
/// Overloaded readings render as `O.L <unit>` followed by the mode.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisplayFormatter;

impl DisplayFormatter {
    pub fn new() -> Self {
        Self
    }

    /// Total width of the signed, zero padded value.
    #[inline]
    fn value_width(decimal_places: u8) -> usize {
        if decimal_places == 0 { 5 } else { 6 }
    }
}

impl OutputFormatter for DisplayFormatter {
    fn format(&self, m: &Measurement) -> String {
        if m.overload {
            return format!("O.L {}\n{}", m.unit, m.mode);
        }

        let width = Self::value_width(m.decimal_places);
        let precision = usize::from(m.decimal_places);
        format!(
            "{:+0width$.precision$}{}{}\n{} {}",
            m.value, m.prefix, m.unit, m.mode, m.min_max
        )
    }
}
