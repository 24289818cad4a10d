//! StagesRide - command line entry point.
//!
//! Prints the full-ride summary (and optionally every stage) for one or more
//! Stages exports named `YYYY-MM-DD <length> <Class Type>.csv`.

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueHint};
use stagesride::parser::layout::ColumnLayout;
use stagesride::storage::config::{load_config, load_config_from, ParserConfig};
use stagesride::CycleWorkout;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about = "Summarise Stages bike CSV exports", long_about = None)]
struct Cli {
    /// Export files to summarise
    #[arg(required = true, value_hint = ValueHint::FilePath)]
    inputs: Vec<PathBuf>,

    /// Print every stage summary after the full ride
    #[arg(long, action = ArgAction::SetTrue)]
    stages: bool,

    /// Emit JSON instead of text
    #[arg(long, action = ArgAction::SetTrue)]
    json: bool,

    /// Drop the heart-rate column (no sensor connected)
    #[arg(long, action = ArgAction::SetTrue)]
    no_heart_rate: bool,

    /// Column layout of the firmware that wrote the export (timed|untimed)
    #[arg(long)]
    layout: Option<ColumnLayout>,

    /// Config file (defaults to the platform config directory)
    #[arg(long, value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = resolve_config(&cli)?;

    for (idx, input) in cli.inputs.iter().enumerate() {
        let workout = CycleWorkout::from_path(input, &config)
            .with_context(|| format!("Failed to load {}", input.display()))?;

        if cli.json {
            println!("{}", serde_json::to_string_pretty(&workout)?);
            continue;
        }

        if idx > 0 {
            println!();
        }
        print_workout(&workout, cli.stages)?;
    }

    Ok(())
}

/// Load the config file, then apply command-line overrides.
fn resolve_config(cli: &Cli) -> Result<ParserConfig> {
    let mut config = match &cli.config {
        Some(path) => load_config_from(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => load_config().context("Failed to load config")?,
    };

    if cli.no_heart_rate {
        config.drop_heart_rate = true;
    }
    if let Some(layout) = cli.layout {
        config.layout = layout;
    }

    Ok(config)
}

fn print_workout(workout: &CycleWorkout, with_stages: bool) -> Result<()> {
    println!("{}", workout);

    if !with_stages {
        return Ok(());
    }

    for summary in &workout.stage_summaries {
        println!();
        println!("{}", summary);
    }

    Ok(())
}
