#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Snake Floors headlessly.

mod headless;

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use snake_floors_core::Rules;
use snake_floors_rendering::TextBackend;
use tracing_subscriber::EnvFilter;

use crate::headless::{HeadlessConfig, RunOutcome};

/// Plays Snake Floors with the autopilot and prints what happened.
#[derive(Debug, Parser)]
#[command(name = "snake-floors", version, about, long_about = None)]
struct Args {
    /// Seed for the world's random generator.
    #[arg(long, default_value_t = 0x5eed)]
    seed: u64,

    /// Number of runs to play back to back.
    #[arg(long, default_value_t = 1)]
    runs: u32,

    /// Abandon a run after this many ticks.
    #[arg(long, default_value_t = 5_000)]
    max_ticks: u64,

    /// Draw the board every N ticks; 0 only prints summaries.
    #[arg(long, default_value_t = 0)]
    frame_every: u64,

    /// TOML file overriding any subset of the default rules.
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Raise log verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

/// Entry point for the Snake Floors command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    install_logging(args.verbose);

    let rules = match &args.rules {
        Some(path) => load_rules(path)?,
        None => Rules::default(),
    };
    let config = HeadlessConfig {
        seed: args.seed,
        runs: args.runs,
        max_ticks: args.max_ticks,
        frame_every: args.frame_every,
    };

    let stdout = io::stdout();
    let mut backend = TextBackend::new(stdout.lock());
    let (banner, reports) = headless::play(rules, &config, &mut backend)?;

    println!("{banner}");
    for report in reports {
        let outcome = match report.outcome {
            RunOutcome::GameOver => "game over",
            RunOutcome::Halted => "halted",
            RunOutcome::TickLimit => "tick limit",
        };
        println!(
            "run {}: {} after {} ticks, floor {}, score {}, abilities {}",
            report.run.get(),
            outcome,
            report.ticks,
            report.summary.floor,
            report.summary.score,
            report.summary.abilities_collected
        );
    }
    Ok(())
}

fn install_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_rules(path: &Path) -> Result<Rules> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read rules from {}", path.display()))?;
    parse_rules(&text).with_context(|| format!("invalid rules in {}", path.display()))
}

fn parse_rules(text: &str) -> Result<Rules> {
    let rules: Rules = toml::from_str(text).context("failed to parse rules")?;
    rules.validate()?;
    Ok(rules)
}
