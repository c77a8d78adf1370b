/*!
Decoded measurement values.
*/

use serde::{Deserialize, Serialize};
use std::fmt;

/// Measurement unit codes defined by the Digimatic data sheets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Unit {
    Millimeter,
    Inch,
}

impl Unit {
    /// Parse a unit from the frame's unit nibble
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Millimeter),
            1 => Some(Self::Inch),
            _ => None,
        }
    }

    /// The unit nibble value transmitted for this unit
    pub fn code(self) -> u8 {
        match self {
            Self::Millimeter => 0,
            Self::Inch => 1,
        }
    }

    /// Conventional abbreviation, as shown on the instrument display
    pub fn abbrev(self) -> &'static str {
        match self {
            Self::Millimeter => "mm",
            Self::Inch => "in",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbrev())
    }
}

/// A reading from a Digimatic instrument.
///
/// Produced only by a successful decode; the value is never a negative
/// zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// The value reported by the instrument
    pub value: f64,
    /// The unit the value is in
    pub unit: Unit,
}

impl Reading {
    /// Create a new reading
    pub fn new(value: f64, unit: Unit) -> Self {
        Self { value, unit }
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_codes_roundtrip() {
        assert_eq!(Unit::from_code(0), Some(Unit::Millimeter));
        assert_eq!(Unit::from_code(1), Some(Unit::Inch));
        assert_eq!(Unit::Millimeter.code(), 0);
        assert_eq!(Unit::Inch.code(), 1);
        for code in 2..16u8 {
            assert_eq!(Unit::from_code(code), None);
        }
    }

    #[test]
    fn display_appends_unit_abbreviation() {
        assert_eq!(Reading::new(123.456, Unit::Millimeter).to_string(), "123.456mm");
        assert_eq!(Reading::new(-2.0, Unit::Inch).to_string(), "-2in");
        assert_eq!(Reading::new(0.0, Unit::Millimeter).to_string(), "0mm");
    }
}
