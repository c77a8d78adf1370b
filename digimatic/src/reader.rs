/*!
Frame capture against an instrument-driven clock.

[`FrameReader`] owns the request-line control and the blocking bit-capture
loop. The instrument generates the clock; the reader only reacts to edges
and samples the data line exactly once per clock low phase.
*/

use tracing::debug;

use crate::convert;
use crate::error::ConfigError;
use crate::frame::Frame;
use crate::line::{InputLine, OutputLine, RequestLine};
use crate::protocol::FRAME_BITS;
use crate::reading::Reading;

/// Named pin configuration for [`FrameReader::new`].
///
/// Lines arrive as pre-configured capability objects: clock, data and ready
/// are inputs with pull-ups, the request line is an output (see the
/// [`line`](crate::line) module). `data` and `clock` are required, and so
/// is one of `request` / `inverted_request`.
#[derive(Debug)]
pub struct Pins<I, O> {
    /// Data line, sampled synchronously with the clock
    pub data: Option<I>,
    /// Clock line, driven by the instrument
    pub clock: Option<I>,
    /// Active-high request line; takes precedence over `inverted_request`
    pub request: Option<O>,
    /// Active-low request line (open-collector wiring)
    pub inverted_request: Option<O>,
    /// Instrument "data ready" signal; polled by callers, never consumed
    /// by [`FrameReader::read`]
    pub ready: Option<I>,
}

impl<I, O> Default for Pins<I, O> {
    fn default() -> Self {
        Self {
            data: None,
            clock: None,
            request: None,
            inverted_request: None,
            ready: None,
        }
    }
}

/// Digimatic SPC frame reader.
///
/// Owns the injected lines and a reusable 52-bit capture buffer. A single
/// `read` call is one atomic unit of work; the reader is not re-entrant and
/// callers serialize access to it.
pub struct FrameReader<I, O> {
    data: I,
    clock: I,
    request: RequestLine<O>,
    ready: Option<I>,
    bits: [bool; FRAME_BITS],
}

impl<I: InputLine, O: OutputLine> FrameReader<I, O> {
    /// Validates the pin configuration and builds a reader.
    pub fn new(pins: Pins<I, O>) -> Result<Self, ConfigError> {
        let data = pins.data.ok_or(ConfigError::MissingPin("data"))?;
        let clock = pins.clock.ok_or(ConfigError::MissingPin("clock"))?;
        let request = match (pins.request, pins.inverted_request) {
            (Some(line), _) => RequestLine::ActiveHigh(line),
            (None, Some(line)) => RequestLine::ActiveLow(line),
            (None, None) => return Err(ConfigError::MissingRequest),
        };
        Ok(Self {
            data,
            clock,
            request,
            ready: pins.ready,
            bits: [false; FRAME_BITS],
        })
    }

    /// Requests and captures one frame, returning the decoded reading, or
    /// `None` when the transmission fails structural validation.
    ///
    /// Blocks until the instrument has clocked out all 52 bits; there is no
    /// timeout, so a silent instrument blocks the caller indefinitely.
    pub fn read(&mut self) -> Option<Reading> {
        self.request.assert();

        for i in 0..FRAME_BITS {
            // each bit is valid while the clock holds the line low
            while self.clock.is_high() {}

            self.bits[i] = self.data.is_high();

            if i == 0 {
                // a response is in flight; release the request so the
                // instrument does not start a second transmission
                self.request.deassert();
            }

            while !self.clock.is_high() {}
        }

        match Frame::from_bits(self.bits).decode() {
            Ok(reading) => Some(reading),
            Err(defect) => {
                debug!("discarding frame: {defect}");
                None
            }
        }
    }

    /// Reads one frame and normalizes the value to centimeters.
    pub fn read_cm(&mut self) -> Option<f64> {
        convert::to_centimeters(self.read())
    }

    /// Samples the ready line, when one was wired.
    pub fn ready(&mut self) -> Option<bool> {
        self.ready.as_mut().map(|line| line.is_high())
    }

    /// Busy-waits until the instrument pulls ready low, signalling a
    /// pending measurement. Returns `false` immediately when no ready line
    /// was wired.
    pub fn wait_ready(&mut self) -> bool {
        match self.ready.as_mut() {
            Some(line) => {
                while line.is_high() {}
                true
            }
            None => false,
        }
    }

    /// Busy-waits until the ready line returns high, so one physical
    /// trigger yields exactly one read. Returns `false` when no ready line
    /// was wired.
    pub fn wait_ready_release(&mut self) -> bool {
        match self.ready.as_mut() {
            Some(line) => {
                while !line.is_high() {}
                true
            }
            None => false,
        }
    }
}
