/*!
# Digimatic (SPC) Protocol Library

This crate decodes the Mitutoyo Digimatic (SPC) synchronous serial protocol
used by calipers, micrometers and indicators to report measurements over a
4-wire interface (clock, data, request, optional ready).

## Core Types

- [`FrameReader`] - Request/clock/data handshake and 52-bit capture loop
- [`Frame`] - One 52-bit measurement transmission
- [`Reading`] - Decoded measurement value and unit
- [`Pins`] - Named pin configuration validated at construction

## Modules

- [`reader`] - Frame capture against an instrument-driven clock
- [`frame`] - Nibble assembly, validation and BCD decoding
- [`line`] - Digital line capability boundary
- [`convert`] - Unit normalization helpers
- [`error`] - Common error types
*/

pub mod convert;
pub mod error;
pub mod frame;
pub mod line;
pub mod reader;
pub mod reading;

// Re-export commonly used types
pub use error::{ConfigError, DigimaticError, Result};
pub use frame::{Frame, FrameDefect};
pub use line::{InputLine, OutputLine, RequestLine};
pub use reader::{FrameReader, Pins};
pub use reading::{Reading, Unit};

/// Version information for the protocol library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Protocol constants
pub mod protocol {
    /// Number of bits in one Digimatic frame
    pub const FRAME_BITS: usize = 52;

    /// Number of bits per nibble
    pub const BITS_PER_NIBBLE: usize = 4;

    /// Number of nibbles in one frame
    pub const NIBBLES_PER_FRAME: usize = 13;

    /// Number of leading preamble nibbles
    pub const PREAMBLE_NIBBLES: usize = 4;

    /// Fixed value of every preamble nibble
    pub const PREAMBLE_VALUE: u8 = 0xF;

    /// Sign nibble value marking a positive reading
    pub const SIGN_POSITIVE: u8 = 0;

    /// Sign nibble value marking a negative reading
    pub const SIGN_NEGATIVE: u8 = 8;

    /// Number of BCD magnitude digits
    pub const MAGNITUDE_DIGITS: usize = 6;

    /// Index of the sign nibble
    pub const SIGN_NIBBLE: usize = 4;

    /// Index of the first (most significant) BCD magnitude digit
    pub const MAGNITUDE_FIRST_NIBBLE: usize = 5;

    /// Index of the decimal point nibble (count of fractional digits)
    pub const DECIMAL_NIBBLE: usize = 11;

    /// Index of the unit code nibble
    pub const UNIT_NIBBLE: usize = 12;
}
