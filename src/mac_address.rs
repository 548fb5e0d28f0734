//! Bluetooth address of the meter.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A Bluetooth device address, most significant octet first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MacAddress(pub [u8; 6]);

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, octet) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(":")?;
            }
            write!(f, "{octet:02X}")?;
        }
        Ok(())
    }
}

/// Errors returned when parsing a meter address.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseMacError {
    #[error("invalid address '{0}': expected six octets like 98:84:E3:CD:C0:E5")]
    OctetCount(String),
    #[error("invalid address octet '{0}'")]
    Octet(String),
}

impl FromStr for MacAddress {
    type Err = ParseMacError;

    /// Accepts `:` or `-` separated octets, in either case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let parts: Vec<&str> = s.split([':', '-']).collect();
        if parts.len() != 6 {
            return Err(ParseMacError::OctetCount(s.to_string()));
        }

        let mut octets = [0u8; 6];
        for (octet, part) in octets.iter_mut().zip(&parts) {
            if part.len() != 2 {
                return Err(ParseMacError::Octet(part.to_string()));
            }
            *octet =
                u8::from_str_radix(part, 16).map_err(|_| ParseMacError::Octet(part.to_string()))?;
        }

        Ok(MacAddress(octets))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const METER: MacAddress = MacAddress([0x98, 0x84, 0xE3, 0xCD, 0xC0, 0xE5]);

    #[test]
    fn test_display_uppercase_colon_separated() {
        assert_eq!(METER.to_string(), "98:84:E3:CD:C0:E5");
        assert_eq!(MacAddress::default().to_string(), "00:00:00:00:00:00");
    }

    #[test]
    fn test_parse_separators_and_case() {
        assert_eq!("98:84:E3:CD:C0:E5".parse::<MacAddress>().unwrap(), METER);
        assert_eq!("98-84-e3-cd-c0-e5".parse::<MacAddress>().unwrap(), METER);
        assert_eq!(" 98:84:e3:CD:c0:E5\n".parse::<MacAddress>().unwrap(), METER);
    }

    #[test]
    fn test_parse_wrong_octet_count() {
        assert_eq!(
            "98:84:E3".parse::<MacAddress>(),
            Err(ParseMacError::OctetCount("98:84:E3".to_string()))
        );
        assert!(matches!(
            "".parse::<MacAddress>(),
            Err(ParseMacError::OctetCount(_))
        ));
    }

    #[test]
    fn test_parse_bad_octet() {
        assert_eq!(
            "98:84:E3:CD:C0:G5".parse::<MacAddress>(),
            Err(ParseMacError::Octet("G5".to_string()))
        );
        assert_eq!(
            "98:84:E3:CD:C0:E".parse::<MacAddress>(),
            Err(ParseMacError::Octet("E".to_string()))
        );
    }

    #[test]
    fn test_parse_own_display() {
        let parsed: MacAddress = METER.to_string().parse().unwrap();
        assert_eq!(parsed, METER);
    }
}
