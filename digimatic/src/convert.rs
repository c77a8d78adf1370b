/*!
Unit normalization helpers.
*/

use crate::reading::{Reading, Unit};

/// Normalizes a reading's value to centimeters.
pub fn reading_to_centimeters(reading: &Reading) -> f64 {
    match reading.unit {
        Unit::Millimeter => reading.value * 10.0,
        Unit::Inch => reading.value * 2.54,
    }
}

/// Normalizes a decode outcome to centimeters, propagating the empty case.
pub fn to_centimeters(outcome: Option<Reading>) -> Option<f64> {
    outcome.map(|reading| reading_to_centimeters(&reading))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_inches() {
        let cm = reading_to_centimeters(&Reading::new(2.0, Unit::Inch));
        assert!((cm - 5.08).abs() < 1e-12);
    }

    #[test]
    fn converts_millimeters() {
        let cm = reading_to_centimeters(&Reading::new(123.456, Unit::Millimeter));
        assert!((cm - 1234.56).abs() < 1e-9);
    }

    #[test]
    fn propagates_empty_outcome() {
        assert_eq!(to_centimeters(None), None);
        let cm = to_centimeters(Some(Reading::new(2.0, Unit::Inch))).unwrap();
        assert!((cm - 5.08).abs() < 1e-12);
    }
}
