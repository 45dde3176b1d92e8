//! filtr8 - step-sequenced synthesizer in the terminal
//!
//! Run with: cargo run -- --bpm 120

mod app;
mod ui;

use std::{fs::File, path::PathBuf, sync::Mutex};

use clap::Parser;
use color_eyre::eyre::{Result as EyreResult, WrapErr};
use filtr8::SynthConfig;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "filtr8", version, about = "Step-sequenced synth with filter and echo")]
struct Args {
    /// Tempo in beats per minute
    #[arg(long, default_value_t = 120.0)]
    bpm: f64,

    /// Number of steps in the pattern
    #[arg(long, default_value_t = 8)]
    steps: usize,

    /// Steps-per-beat divisor
    #[arg(long, default_value_t = 4)]
    signature: u32,

    /// Play without the terminal UI, logging each step
    #[arg(long)]
    headless: bool,

    /// How long headless mode plays before exiting
    #[arg(long, default_value_t = 8.0, value_parser = parse_seconds)]
    seconds: f64,

    /// Write logs here while the terminal UI is up
    #[arg(long)]
    log_file: Option<PathBuf>,
}

/// Longest headless run accepted on the command line (one day)
const MAX_SECONDS: f64 = 86_400.0;

fn parse_seconds(raw: &str) -> Result<f64, String> {
    let seconds: f64 = raw.parse().map_err(|err| format!("{err}"))?;
    if (0.0..=MAX_SECONDS).contains(&seconds) {
        Ok(seconds)
    } else {
        Err(format!("expected 0 to {MAX_SECONDS} seconds"))
    }
}

fn init_tracing(args: &Args) -> EyreResult<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("filtr8=info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if args.headless {
        builder.with_writer(std::io::stderr).init();
    } else if let Some(path) = &args.log_file {
        let file = File::create(path)
            .wrap_err_with(|| format!("cannot create {}", path.display()))?;
        builder.with_ansi(false).with_writer(Mutex::new(file)).init();
    } else {
        builder.with_writer(std::io::sink).init();
    }
    Ok(())
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    let args = Args::parse();
    init_tracing(&args)?;

    let config = SynthConfig::new()
        .with_bpm(args.bpm)
        .with_steps(args.steps)
        .with_signature(args.signature);

    if args.headless {
        app::run_headless(config, args.seconds)
    } else {
        app::run_tui(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seconds_must_be_finite_and_in_range() {
        let args = Args::try_parse_from(["filtr8", "--headless", "--seconds", "2.5"]).unwrap();
        assert_eq!(args.seconds, 2.5);
        for bad in ["inf", "NaN", "-1", "1e12"] {
            assert!(
                Args::try_parse_from(["filtr8", "--seconds", bad]).is_err(),
                "{bad} accepted"
            );
        }
    }
}
