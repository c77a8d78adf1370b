/*!
Synthetic Digimatic instrument.

Drives the real [`FrameReader`] capture loop through scripted clock, data
and request lines, so the full handshake is exercised without hardware.
The generator produces a slowly drifting measurement and can corrupt every
Nth frame to exercise the reject path.
*/

use anyhow::Result;
use digimatic::line::{InputLine, OutputLine};
use digimatic::protocol::FRAME_BITS;
use digimatic::{Frame, FrameReader, Pins, Unit};
use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::SimulateConfig;
use crate::replay::ReadingRecord;

/// Waveform state shared by the scripted lines.
///
/// The clock idles high and alternates level on consecutive polls once a
/// frame is loaded, so each wait-low loop in the reader observes exactly
/// one low phase per bit.
struct Waveform {
    bits: [bool; FRAME_BITS],
    loaded: bool,
    clock_polls: usize,
    lows_seen: usize,
}

/// Scripted instrument backing a [`FrameReader`].
pub struct ScriptedInstrument {
    waveform: Rc<RefCell<Waveform>>,
}

impl ScriptedInstrument {
    pub fn new() -> Self {
        Self {
            waveform: Rc::new(RefCell::new(Waveform {
                bits: [false; FRAME_BITS],
                loaded: false,
                clock_polls: 0,
                lows_seen: 0,
            })),
        }
    }

    /// Loads the frame the instrument clocks out on the next read.
    pub fn load(&self, frame: &Frame) {
        let mut w = self.waveform.borrow_mut();
        w.bits = frame.bits();
        w.loaded = true;
        w.clock_polls = 0;
        w.lows_seen = 0;
    }

    /// Builds a pin set wired to this instrument.
    pub fn pins(&self) -> Pins<ScriptedInput, ScriptedRequest> {
        Pins {
            data: Some(ScriptedInput {
                waveform: Rc::clone(&self.waveform),
                role: Role::Data,
            }),
            clock: Some(ScriptedInput {
                waveform: Rc::clone(&self.waveform),
                role: Role::Clock,
            }),
            request: Some(ScriptedRequest {
                waveform: Rc::clone(&self.waveform),
            }),
            inverted_request: None,
            ready: Some(ScriptedInput {
                waveform: Rc::clone(&self.waveform),
                role: Role::Ready,
            }),
        }
    }
}

impl Default for ScriptedInstrument {
    fn default() -> Self {
        Self::new()
    }
}

enum Role {
    Clock,
    Data,
    Ready,
}

pub struct ScriptedInput {
    waveform: Rc<RefCell<Waveform>>,
    role: Role,
}

impl InputLine for ScriptedInput {
    fn is_high(&mut self) -> bool {
        let mut w = self.waveform.borrow_mut();
        match self.role {
            Role::Clock => {
                let high = w.clock_polls % 2 == 0;
                w.clock_polls += 1;
                if !high {
                    w.lows_seen += 1;
                }
                high
            }
            Role::Data => w.bits[w.lows_seen.saturating_sub(1)],
            // ready is pulled low while a measurement is pending
            Role::Ready => !w.loaded,
        }
    }
}

pub struct ScriptedRequest {
    waveform: Rc<RefCell<Waveform>>,
}

impl OutputLine for ScriptedRequest {
    fn set_high(&mut self, level: bool) {
        // releasing the request marks the pending frame as consumed
        if !level {
            self.waveform.borrow_mut().loaded = false;
        }
    }
}

/// Generates a drifting measurement sequence.
pub struct FrameGenerator {
    sequence: u32,
    corrupt_every: u32,
}

impl FrameGenerator {
    pub fn new(corrupt_every: u32) -> Self {
        Self {
            sequence: 0,
            corrupt_every,
        }
    }

    /// Produces the next frame: a value sweeping a few millimeters around
    /// 12.700 mm, encoded at micrometer resolution.
    pub fn next_frame(&mut self) -> Frame {
        self.sequence += 1;
        let angle = f64::from(self.sequence) * 0.37;
        let micrometers = (12_700.0 + 2_500.0 * angle.sin()).round() as u32;
        let frame = Frame::from_parts(false, micrometers, 3, Unit::Millimeter);

        if self.corrupt_every != 0 && self.sequence % self.corrupt_every == 0 {
            corrupt(&frame)
        } else {
            frame
        }
    }
}

/// Flips the first preamble bit so the frame fails validation.
fn corrupt(frame: &Frame) -> Frame {
    let mut bits = frame.bits();
    bits[0] = !bits[0];
    Frame::from_bits(bits)
}

/// Run the simulated instrument through the reader until the frame budget
/// is exhausted or the stop flag flips.
pub fn run(config: &SimulateConfig, stop: Arc<AtomicBool>) -> Result<()> {
    let instrument = ScriptedInstrument::new();
    let mut generator = FrameGenerator::new(config.corrupt_every);
    let mut reader = FrameReader::new(instrument.pins())?;

    let mut produced = 0u32;
    let mut decoded = 0u64;
    let mut empty = 0u64;

    info!("🧪 Simulated instrument started ({} frames)", config.frames);

    while !stop.load(Ordering::SeqCst) {
        if config.frames != 0 && produced >= config.frames {
            break;
        }

        instrument.load(&generator.next_frame());
        produced += 1;

        match reader.read() {
            Some(reading) => {
                decoded += 1;
                if config.json {
                    let record = ReadingRecord::new(produced as usize, &reading, false);
                    println!("{}", serde_json::to_string(&record)?);
                } else {
                    println!("{reading}");
                }
                io::stdout().flush()?;
            }
            None => {
                empty += 1;
                warn!("frame {produced}: no valid frame");
            }
        }

        if config.interval_ms > 0 {
            thread::sleep(Duration::from_millis(config.interval_ms));
        }
    }

    info!("📊 Simulation final stats:");
    info!("   Frames produced: {produced}");
    info!("   Decoded: {decoded}");
    info!("   Empty: {empty}");

    Ok(())
}
