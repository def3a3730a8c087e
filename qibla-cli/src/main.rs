//! Qibla CLI - Qibla bearing and compass alignment from the command line.

mod commands;
mod error;
mod runner;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use console::style;

use commands::config::ConfigCommands;
use error::CliError;
use runner::CliRunner;

#[derive(Debug, Parser)]
#[command(name = "qibla", version, about = "Direction to the Kaaba from anywhere on Earth")]
struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Compute the Qibla bearing for a location
    Bearing {
        /// Latitude in degrees (north positive)
        #[arg(long, allow_negative_numbers = true)]
        lat: Option<f64>,

        /// Longitude in degrees (east positive)
        #[arg(long, allow_negative_numbers = true)]
        lon: Option<f64>,
    },

    /// Run a compass session over recorded heading samples
    Replay {
        /// JSON-lines file of heading samples
        file: PathBuf,

        #[arg(long, allow_negative_numbers = true)]
        lat: Option<f64>,

        #[arg(long, allow_negative_numbers = true)]
        lon: Option<f64>,

        /// Magnetic declination in degrees (east positive); skips lookup
        #[arg(long, allow_negative_numbers = true)]
        declination: Option<f64>,

        /// Delay between samples in milliseconds
        #[arg(long, default_value_t = 100)]
        interval_ms: u64,
    },

    /// View or change configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },

    /// Create the configuration file
    Init,
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Bearing { lat, lon } => {
            let runner = CliRunner::new(cli.verbose)?;
            commands::bearing::run(&runner, lat, lon)
        }
        Commands::Replay {
            file,
            lat,
            lon,
            declination,
            interval_ms,
        } => {
            let runner = CliRunner::new(cli.verbose)?;
            runner.log_startup("replay");
            commands::replay::run(
                &runner,
                commands::replay::ReplayArgs {
                    file,
                    lat,
                    lon,
                    declination,
                    interval_ms,
                },
            )
        }
        Commands::Config { action } => commands::config::run(action),
        Commands::Init => commands::init::run(),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
