/*!
Digital line capability boundary.

The decoder never touches GPIO hardware itself; it consumes readable and
writable boolean lines injected at construction. Clock, data and ready are
inputs with pull-ups, the request line is an output. Direction and pull
configuration belong to the platform layer that creates the lines.
*/

/// A readable digital line (clock, data, ready).
pub trait InputLine {
    /// Samples the current electrical level; `true` is high.
    fn is_high(&mut self) -> bool;
}

/// A writable digital line (request).
pub trait OutputLine {
    /// Drives the line to the given electrical level; `true` is high.
    fn set_high(&mut self, level: bool);
}

impl<T: InputLine + ?Sized> InputLine for &mut T {
    fn is_high(&mut self) -> bool {
        (**self).is_high()
    }
}

impl<T: OutputLine + ?Sized> OutputLine for &mut T {
    fn set_high(&mut self, level: bool) {
        (**self).set_high(level)
    }
}

/// Request line with its active sense attached.
///
/// The Digimatic request input is commonly wired through an inverting NPN
/// stage, so a board may hand the decoder either the non-inverted or the
/// inverted side of the signal.
#[derive(Debug)]
pub enum RequestLine<O> {
    ActiveHigh(O),
    ActiveLow(O),
}

impl<O: OutputLine> RequestLine<O> {
    /// Drives the request active, asking the instrument to transmit.
    pub fn assert(&mut self) {
        self.drive(true);
    }

    /// Releases the request.
    pub fn deassert(&mut self) {
        self.drive(false);
    }

    fn drive(&mut self, active: bool) {
        match self {
            RequestLine::ActiveHigh(line) => line.set_high(active),
            RequestLine::ActiveLow(line) => line.set_high(!active),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Recorder(Vec<bool>);

    impl OutputLine for Recorder {
        fn set_high(&mut self, level: bool) {
            self.0.push(level);
        }
    }

    #[test]
    fn active_high_drives_levels_directly() {
        let mut request = RequestLine::ActiveHigh(Recorder(Vec::new()));
        request.assert();
        request.deassert();
        let RequestLine::ActiveHigh(recorder) = request else {
            unreachable!()
        };
        assert_eq!(recorder.0, vec![true, false]);
    }

    #[test]
    fn active_low_inverts_levels() {
        let mut request = RequestLine::ActiveLow(Recorder(Vec::new()));
        request.assert();
        request.deassert();
        let RequestLine::ActiveLow(recorder) = request else {
            unreachable!()
        };
        assert_eq!(recorder.0, vec![false, true]);
    }
}
