/*!
# spcread

Decode and exercise Mitutoyo Digimatic (SPC) measurement frames from the
command line: replay recorded 52-bit captures, or run a synthetic
instrument through the real capture loop.

## Usage

### Decode a recorded capture
```bash
spcread decode --input session.bits --json
```

### Decode from stdin, normalized to centimeters
```bash
cat session.bits | spcread decode --centimeters
```

### Run the synthetic instrument
```bash
spcread simulate --frames 20 --corrupt-every 5
```

### Replay from a configuration file
```bash
spcread --config spcread.toml
```
*/

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

mod config;
mod replay;
mod sim;

use config::{AppConfig, ReplayConfig, SimulateConfig};

#[derive(Parser)]
#[command(name = "spcread")]
#[command(about = "Mitutoyo Digimatic (SPC) capture decoding and simulation")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(short, long, default_value = "spcread.toml")]
    config: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a recorded 52-bit capture
    Decode {
        /// Capture file, "-" for stdin
        #[arg(short, long, default_value = "-")]
        input: String,

        /// Write decoded readings as JSON lines to this file
        #[arg(short, long)]
        output: Option<String>,

        /// Emit JSON lines instead of plain readings
        #[arg(long)]
        json: bool,

        /// Normalize values to centimeters
        #[arg(long)]
        centimeters: bool,
    },

    /// Run a synthetic instrument through the frame reader
    Simulate {
        /// Number of frames to produce (0 = run until Ctrl+C)
        #[arg(short, long, default_value = "10")]
        frames: u32,

        /// Delay between frames in milliseconds
        #[arg(long, default_value = "500")]
        interval_ms: u64,

        /// Corrupt every Nth frame (0 = never)
        #[arg(long, default_value = "0")]
        corrupt_every: u32,

        /// Emit JSON lines instead of plain readings
        #[arg(long)]
        json: bool,
    },

    /// Generate a configuration file
    Config {
        /// Output path for configuration file
        #[arg(short, long, default_value = "spcread.toml")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Log to stderr so stdout stays clean for decoded readings
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Commands::Decode {
            input,
            output,
            json,
            centimeters,
        }) => {
            let replay_config = ReplayConfig {
                input,
                output_file: output,
                json,
                centimeters,
            };
            replay::run(&replay_config)
        }

        Some(Commands::Simulate {
            frames,
            interval_ms,
            corrupt_every,
            json,
        }) => {
            let simulate_config = SimulateConfig {
                frames,
                interval_ms,
                corrupt_every,
                json,
            };
            run_simulate(&simulate_config)
        }

        Some(Commands::Config { output }) => generate_config_file(output),

        None => {
            // Replay mode driven by the configuration file
            let app_config = AppConfig::load_from_file(&cli.config)?;
            replay::run(&app_config.replay)
        }
    }
}

/// Run the simulator with a Ctrl+C stop flag
fn run_simulate(simulate_config: &SimulateConfig) -> Result<()> {
    let stop = Arc::new(AtomicBool::new(false));
    let stop_handler = Arc::clone(&stop);
    ctrlc::set_handler(move || {
        eprintln!("\n🛑 Received Ctrl+C, shutting down gracefully...");
        stop_handler.store(true, Ordering::SeqCst);
    })?;

    sim::run(simulate_config, stop)
}

/// Generate a default configuration file
fn generate_config_file(output_path: PathBuf) -> Result<()> {
    let app_config = AppConfig::new();
    app_config.save_to_file(&output_path)?;

    println!("✅ Generated configuration file: {}", output_path.display());
    println!("📝 Edit the file to customize settings, then run:");
    println!("   spcread --config {}", output_path.display());

    Ok(())
}
