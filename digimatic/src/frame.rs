/*!
Frame assembly, validation and BCD decoding.

This module provides the core frame data structure and the pure decode
pipeline from a captured 52-bit buffer to a [`Reading`]: grouping into 13
LSB-first nibbles, preamble and sign validation, 6-digit BCD magnitude
assembly, decimal scaling and unit lookup.
*/

use thiserror::Error;

use crate::protocol::{
    BITS_PER_NIBBLE, DECIMAL_NIBBLE, FRAME_BITS, MAGNITUDE_DIGITS, MAGNITUDE_FIRST_NIBBLE,
    NIBBLES_PER_FRAME, PREAMBLE_NIBBLES, PREAMBLE_VALUE, SIGN_NEGATIVE, SIGN_NIBBLE,
    SIGN_POSITIVE, UNIT_NIBBLE,
};
use crate::reading::{Reading, Unit};

/// Structural defects that make a frame undecodable.
///
/// A defect is an expected operating condition, not a system fault: the
/// protocol occasionally delivers noise or partial frames and callers
/// recover by issuing another request. [`FrameReader::read`] collapses all
/// variants to an empty outcome; this type exists so rejects stay
/// diagnosable at the `frame` API level and in logs.
///
/// [`FrameReader::read`]: crate::reader::FrameReader::read
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameDefect {
    #[error("preamble nibble {index} is {value:#x}, expected 0xf")]
    Preamble { index: usize, value: u8 },

    #[error("sign nibble is {0:#x}, expected 0x0 or 0x8")]
    Sign(u8),

    #[error("magnitude digit {index} is {value}, not a decimal digit")]
    Digit { index: usize, value: u8 },

    #[error("unit code {0} is not a known unit")]
    UnknownUnit(u8),
}

/// One 52-bit Digimatic frame in transmission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    bits: [bool; FRAME_BITS],
}

impl Frame {
    /// Wraps a captured bit buffer.
    pub fn from_bits(bits: [bool; FRAME_BITS]) -> Self {
        Self { bits }
    }

    /// Builds a frame from its 13 nibbles, LSB-first within each nibble.
    pub fn from_nibbles(nibbles: &[u8; NIBBLES_PER_FRAME]) -> Self {
        let mut bits = [false; FRAME_BITS];
        for (n, &nibble) in nibbles.iter().enumerate() {
            for bit in 0..BITS_PER_NIBBLE {
                bits[n * BITS_PER_NIBBLE + bit] = nibble & (1 << bit) != 0;
            }
        }
        Self { bits }
    }

    /// Builds the frame an instrument would transmit for the given fields.
    ///
    /// Counterpart of [`Frame::decode`], used by simulators and round-trip
    /// tests. `magnitude` is the unscaled 6-digit integer (0..=999999) and
    /// `decimals` the count of fractional digits.
    pub fn from_parts(negative: bool, magnitude: u32, decimals: u8, unit: Unit) -> Self {
        let mut nibbles = [0u8; NIBBLES_PER_FRAME];
        nibbles[..PREAMBLE_NIBBLES].fill(PREAMBLE_VALUE);
        nibbles[SIGN_NIBBLE] = if negative { SIGN_NEGATIVE } else { SIGN_POSITIVE };
        let mut rest = magnitude;
        for i in (0..MAGNITUDE_DIGITS).rev() {
            nibbles[MAGNITUDE_FIRST_NIBBLE + i] = (rest % 10) as u8;
            rest /= 10;
        }
        nibbles[DECIMAL_NIBBLE] = decimals;
        nibbles[UNIT_NIBBLE] = unit.code();
        Self::from_nibbles(&nibbles)
    }

    /// The raw bits in transmission order.
    pub fn bits(&self) -> [bool; FRAME_BITS] {
        self.bits
    }

    /// Groups the bits into 13 nibbles, bit 0 of each group carrying
    /// weight 1 and bit 3 weight 8.
    pub fn nibbles(&self) -> [u8; NIBBLES_PER_FRAME] {
        let mut nibbles = [0u8; NIBBLES_PER_FRAME];
        for (n, nibble) in nibbles.iter_mut().enumerate() {
            let idx = n * BITS_PER_NIBBLE;
            for bit in 0..BITS_PER_NIBBLE {
                if self.bits[idx + bit] {
                    *nibble |= 1 << bit;
                }
            }
        }
        nibbles
    }

    /// Validates the frame structure and decodes it into a [`Reading`].
    ///
    /// A zero magnitude is always reported with positive sign, regardless
    /// of the sign nibble. Unit codes outside the protocol's table reject
    /// the frame.
    pub fn decode(&self) -> Result<Reading, FrameDefect> {
        let nibbles = self.nibbles();

        for (index, &value) in nibbles[..PREAMBLE_NIBBLES].iter().enumerate() {
            if value != PREAMBLE_VALUE {
                return Err(FrameDefect::Preamble { index, value });
            }
        }

        let negative = match nibbles[SIGN_NIBBLE] {
            SIGN_POSITIVE => false,
            SIGN_NEGATIVE => true,
            other => return Err(FrameDefect::Sign(other)),
        };

        // 6-digit BCD magnitude, most significant digit first
        let mut magnitude: u32 = 0;
        let bcd = &nibbles[MAGNITUDE_FIRST_NIBBLE..MAGNITUDE_FIRST_NIBBLE + MAGNITUDE_DIGITS];
        for (index, &digit) in bcd.iter().enumerate() {
            if digit > 9 {
                return Err(FrameDefect::Digit {
                    index,
                    value: digit,
                });
            }
            magnitude = magnitude * 10 + u32::from(digit);
        }

        let number = f64::from(magnitude) / 10f64.powi(i32::from(nibbles[DECIMAL_NIBBLE]));

        let unit = Unit::from_code(nibbles[UNIT_NIBBLE])
            .ok_or(FrameDefect::UnknownUnit(nibbles[UNIT_NIBBLE]))?;

        // never produce a negative zero
        let value = if negative && number != 0.0 {
            -number
        } else {
            number
        };

        Ok(Reading::new(value, unit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_nibbles() -> [u8; NIBBLES_PER_FRAME] {
        [15, 15, 15, 15, 0, 1, 2, 3, 4, 5, 6, 3, 0]
    }

    #[test]
    fn nibble_grouping_is_lsb_first() {
        let mut bits = [false; FRAME_BITS];
        // nibble 0 = 0b0001 -> 1, nibble 1 = 0b1000 -> 8
        bits[0] = true;
        bits[7] = true;
        let nibbles = Frame::from_bits(bits).nibbles();
        assert_eq!(nibbles[0], 1);
        assert_eq!(nibbles[1], 8);
        assert!(nibbles[2..].iter().all(|&n| n == 0));
    }

    #[test]
    fn nibbles_roundtrip_through_bits() {
        let frame = Frame::from_nibbles(&valid_nibbles());
        assert_eq!(frame.nibbles(), valid_nibbles());
    }

    #[test]
    fn decodes_positive_millimeter_reading() {
        let reading = Frame::from_nibbles(&valid_nibbles()).decode().unwrap();
        assert_eq!(reading.value, 123.456);
        assert_eq!(reading.unit, Unit::Millimeter);
        assert_eq!(reading.to_string(), "123.456mm");
    }

    #[test]
    fn decodes_negative_reading() {
        let mut nibbles = valid_nibbles();
        nibbles[SIGN_NIBBLE] = SIGN_NEGATIVE;
        let reading = Frame::from_nibbles(&nibbles).decode().unwrap();
        assert_eq!(reading.value, -123.456);
        assert_eq!(reading.unit, Unit::Millimeter);
    }

    #[test]
    fn zero_magnitude_never_yields_negative_zero() {
        let mut nibbles = valid_nibbles();
        nibbles[SIGN_NIBBLE] = SIGN_NEGATIVE;
        for n in MAGNITUDE_FIRST_NIBBLE..MAGNITUDE_FIRST_NIBBLE + MAGNITUDE_DIGITS {
            nibbles[n] = 0;
        }
        let reading = Frame::from_nibbles(&nibbles).decode().unwrap();
        assert_eq!(reading.value, 0.0);
        assert!(reading.value.is_sign_positive());
    }

    #[test]
    fn rejects_broken_preamble() {
        let mut nibbles = valid_nibbles();
        nibbles[3] = 14;
        assert_eq!(
            Frame::from_nibbles(&nibbles).decode(),
            Err(FrameDefect::Preamble {
                index: 3,
                value: 14
            })
        );
    }

    #[test]
    fn rejects_sign_values_other_than_0_and_8() {
        for sign in (0..16u8).filter(|&s| s != SIGN_POSITIVE && s != SIGN_NEGATIVE) {
            let mut nibbles = valid_nibbles();
            nibbles[SIGN_NIBBLE] = sign;
            assert_eq!(
                Frame::from_nibbles(&nibbles).decode(),
                Err(FrameDefect::Sign(sign))
            );
        }
    }

    #[test]
    fn rejects_non_decimal_magnitude_digit() {
        let mut nibbles = valid_nibbles();
        nibbles[MAGNITUDE_FIRST_NIBBLE + 2] = 10;
        assert_eq!(
            Frame::from_nibbles(&nibbles).decode(),
            Err(FrameDefect::Digit {
                index: 2,
                value: 10
            })
        );
    }

    #[test]
    fn rejects_unknown_unit_code() {
        // The reference implementation silently reported such readings with
        // an absent unit; here anything outside the {0: mm, 1: in} table
        // rejects the frame.
        for code in 2..16u8 {
            let mut nibbles = valid_nibbles();
            nibbles[UNIT_NIBBLE] = code;
            assert_eq!(
                Frame::from_nibbles(&nibbles).decode(),
                Err(FrameDefect::UnknownUnit(code))
            );
        }
    }

    #[test]
    fn magnitude_scaling_matches_bcd_and_decimal_nibble() {
        let cases = [
            (0u32, 0u8, 0.0),
            (1, 0, 1.0),
            (999_999, 0, 999_999.0),
            (999_999, 5, 9.99999),
            (123_456, 3, 123.456),
            (500, 2, 5.0),
            (42, 5, 0.00042),
        ];
        for (magnitude, decimals, expected) in cases {
            let frame = Frame::from_parts(false, magnitude, decimals, Unit::Millimeter);
            let reading = frame.decode().unwrap();
            assert!(
                (reading.value - expected).abs() < 1e-12,
                "magnitude {magnitude} / 10^{decimals}: got {}, expected {expected}",
                reading.value
            );
        }
    }

    #[test]
    fn encode_decode_roundtrip() {
        let cases = [
            (false, 123_456u32, 3u8, Unit::Millimeter),
            (true, 200_000, 5, Unit::Inch),
            (false, 0, 2, Unit::Inch),
            (true, 1, 0, Unit::Millimeter),
        ];
        for (negative, magnitude, decimals, unit) in cases {
            let frame = Frame::from_parts(negative, magnitude, decimals, unit);
            let reading = frame.decode().unwrap();
            let expected = f64::from(magnitude) / 10f64.powi(i32::from(decimals));
            let expected = if negative && expected != 0.0 {
                -expected
            } else {
                expected
            };
            assert!((reading.value - expected).abs() < 1e-9);
            assert_eq!(reading.unit, unit);
        }
    }

    #[test]
    fn repeated_decode_of_same_buffer_is_identical() {
        let frame = Frame::from_nibbles(&valid_nibbles());
        let first = frame.decode().unwrap();
        let second = frame.decode().unwrap();
        assert_eq!(first, second);
    }
}
