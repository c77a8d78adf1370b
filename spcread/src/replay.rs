/*!
Replay decoding of recorded Digimatic bitstreams.

Capture files hold one frame per line: 52 `0`/`1` characters in
transmission order, optionally broken up by whitespace. Blank lines and
`#` comments are skipped. Each decodable line becomes one reading on
stdout (or an output file), plain or as a JSON line.
*/

use anyhow::{bail, ensure, Context, Result};
use chrono::Local;
use digimatic::convert;
use digimatic::protocol::FRAME_BITS;
use digimatic::{Frame, Reading};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use tracing::{info, warn};

use crate::config::ReplayConfig;

/// One decoded reading as written to JSON-lines output
#[derive(Debug, Serialize)]
pub struct ReadingRecord {
    pub timestamp: String,
    pub sequence: usize,
    pub value: f64,
    pub unit: &'static str,
}

impl ReadingRecord {
    pub fn new(sequence: usize, reading: &Reading, centimeters: bool) -> Self {
        let (value, unit) = if centimeters {
            (convert::reading_to_centimeters(reading), "cm")
        } else {
            (reading.value, reading.unit.abbrev())
        };
        Self {
            timestamp: Local::now().to_rfc3339(),
            sequence,
            value,
            unit,
        }
    }
}

/// Replay session counters
#[derive(Debug, Default)]
struct ReplayStats {
    frames: u64,
    decoded: u64,
    empty: u64,
    skipped: u64,
}

/// Decode a recorded capture according to the replay configuration.
pub fn run(config: &ReplayConfig) -> Result<()> {
    let source: Box<dyn BufRead> = if config.input == "-" {
        Box::new(BufReader::new(io::stdin()))
    } else {
        let file = File::open(&config.input)
            .with_context(|| format!("Failed to open capture file: {}", config.input))?;
        Box::new(BufReader::new(file))
    };

    let mut sink: Box<dyn Write> = match &config.output_file {
        Some(path) => Box::new(
            File::create(path)
                .with_context(|| format!("Failed to create output file: {path}"))?,
        ),
        None => Box::new(io::stdout()),
    };

    let mut stats = ReplayStats::default();

    for (number, line) in source.lines().enumerate() {
        let line = line.context("Failed to read capture line")?;
        let text = line.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }

        let bits = match parse_bits(text) {
            Ok(bits) => bits,
            Err(e) => {
                warn!("line {}: skipping unparsable capture line: {e}", number + 1);
                stats.skipped += 1;
                continue;
            }
        };

        stats.frames += 1;
        match Frame::from_bits(bits).decode() {
            Ok(reading) => {
                stats.decoded += 1;
                emit(&mut sink, config, number + 1, &reading)?;
            }
            Err(defect) => {
                stats.empty += 1;
                warn!("line {}: no valid frame ({defect})", number + 1);
            }
        }
    }

    sink.flush().context("Failed to flush output")?;

    info!("📊 Replay final stats:");
    info!("   Frames: {}", stats.frames);
    info!("   Decoded: {}", stats.decoded);
    info!("   Empty: {}", stats.empty);
    info!("   Skipped lines: {}", stats.skipped);

    Ok(())
}

fn emit(
    sink: &mut Box<dyn Write>,
    config: &ReplayConfig,
    sequence: usize,
    reading: &Reading,
) -> Result<()> {
    if config.json {
        let record = ReadingRecord::new(sequence, reading, config.centimeters);
        let json = serde_json::to_string(&record).context("Failed to serialize reading")?;
        writeln!(sink, "{json}")?;
    } else if config.centimeters {
        writeln!(sink, "{}cm", convert::reading_to_centimeters(reading))?;
    } else {
        writeln!(sink, "{reading}")?;
    }
    Ok(())
}

/// Parse one capture line into a 52-bit frame buffer.
fn parse_bits(text: &str) -> Result<[bool; FRAME_BITS]> {
    let mut bits = [false; FRAME_BITS];
    let mut count = 0usize;
    for ch in text.chars() {
        if ch.is_ascii_whitespace() {
            continue;
        }
        ensure!(count < FRAME_BITS, "more than {FRAME_BITS} bits on line");
        match ch {
            '0' => bits[count] = false,
            '1' => bits[count] = true,
            other => bail!("unexpected character {other:?} in capture line"),
        }
        count += 1;
    }
    ensure!(count == FRAME_BITS, "expected {FRAME_BITS} bits, got {count}");
    Ok(bits)
}
