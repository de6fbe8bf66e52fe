#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Zombie Rescue in a terminal.

mod board;
mod input;
mod session;

use std::{
    fs::{self, OpenOptions},
    io::{self, BufRead, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{
    filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};
use zombie_rescue_core::{
    Command, Difficulty, Event, SessionConfig, SessionLayout, DEFAULT_GRID_COLUMNS,
    DEFAULT_GRID_ROWS, DEFAULT_PLACEMENT_SEED,
};
use zombie_rescue_system_controls::FrameInput;
use zombie_rescue_system_scoring::{JsonLinesSink, ScoreSink, Scoring, ANONYMOUS_PLAYER};

use crate::{
    input::{Input, HELP},
    session::Host,
};

/// Terminal front end for Zombie Rescue.
#[derive(Debug, Parser)]
#[command(name = "zombie-rescue", about = "Rescue the survivors before the zombies catch you")]
struct Args {
    /// Difficulty preset: easy, medium or hard.
    #[arg(long, default_value_t = Difficulty::Medium)]
    difficulty: Difficulty,
    /// Seed for scattering humans and zombies.
    #[arg(long, default_value_t = DEFAULT_PLACEMENT_SEED)]
    seed: u64,
    /// Board width in cells.
    #[arg(long, default_value_t = DEFAULT_GRID_COLUMNS)]
    columns: u32,
    /// Board height in cells.
    #[arg(long, default_value_t = DEFAULT_GRID_ROWS)]
    rows: u32,
    /// JSON file describing a fixed starting layout.
    #[arg(long, value_name = "PATH")]
    layout: Option<PathBuf>,
    /// Name reported alongside scores.
    #[arg(long, default_value = ANONYMOUS_PLAYER)]
    player_name: String,
    /// File collecting one JSON score report per finished session.
    #[arg(long, value_name = "PATH")]
    scores: Option<PathBuf>,
    /// Log world activity to stderr.
    #[arg(short, long)]
    verbose: bool,
}

/// Entry point for the Zombie Rescue command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let start = start_command(&args)?;
    let sink = score_sink(args.scores.as_ref())?;
    let mut host = Host::new(start, Scoring::new(args.player_name.clone()), sink)
        .context("failed to start the session")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{}", host.banner())?;
    writeln!(out, "{HELP}")?;
    writeln!(out, "{}", board::render(&host.snapshot()))?;

    for line in io::stdin().lock().lines() {
        let line = line.context("failed to read from stdin")?;
        let input = match input::parse(&line) {
            Ok(Some(input)) => input,
            Ok(None) => continue,
            Err(error) => {
                writeln!(out, "{error}")?;
                continue;
            }
        };
        tracing::debug!(?input, "command received");

        let events = match input {
            Input::Quit => break,
            Input::Help => {
                writeln!(out, "{HELP}")?;
                continue;
            }
            Input::Show => Vec::new(),
            Input::Key(direction) => host.input(FrameInput::key(direction)),
            Input::Click(x, y) => host.input(FrameInput::click(x, y)),
            Input::Go(target) => host.request_move(Command::RequestPlayerMove { target }),
            Input::Wait(duration) => host.wait(duration),
            Input::Difficulty(difficulty) => host.set_difficulty(difficulty),
            Input::Restart => host.restart().context("failed to restart the session")?,
        };

        report(&mut out, &events)?;
        writeln!(out, "{}", board::render(&host.snapshot()))?;
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .init();
}

fn start_command(args: &Args) -> Result<Command> {
    if let Some(path) = &args.layout {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read layout {}", path.display()))?;
        let layout: SessionLayout = serde_json::from_str(&text)
            .with_context(|| format!("failed to parse layout {}", path.display()))?;
        return Ok(Command::LoadLayout { layout });
    }

    let config = SessionConfig::new(args.difficulty)
        .with_dimensions(args.columns, args.rows)
        .with_seed(args.seed);
    Ok(Command::ConfigureSession { config })
}

fn score_sink(path: Option<&PathBuf>) -> Result<Box<dyn ScoreSink>> {
    let Some(path) = path else {
        return Ok(Box::new(JsonLinesSink::new(io::stdout())));
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open score file {}", path.display()))?;
    Ok(Box::new(JsonLinesSink::new(file)))
}

fn report(out: &mut impl Write, events: &[Event]) -> io::Result<()> {
    for message in events.iter().filter_map(session::describe) {
        writeln!(out, "{message}")?;
    }
    Ok(())
}
