//! Init command - create the configuration file.

use std::io::{self, BufRead, Write};

use qibla::config::{config_file_path, ConfigFile};
use qibla::geo::GeoCoordinate;

use crate::error::CliError;

/// Run the init command.
pub fn run() -> Result<(), CliError> {
    let mut config = ConfigFile::load()?;

    if config.location()?.is_none() {
        let stdin = io::stdin();
        if let Some(coord) = prompt_location(&mut stdin.lock()) {
            config.location.latitude = Some(coord.latitude);
            config.location.longitude = Some(coord.longitude);
        }
        println!();
    }
    config.save()?;

    println!("Configuration file: {}", config_file_path().display());
    println!();
    println!("Edit this file to customize Qibla settings.");
    println!("CLI arguments override config file values when specified.");
    Ok(())
}

/// Ask for a default location. Enter skips.
fn prompt_location(input: &mut impl BufRead) -> Option<GeoCoordinate> {
    print!("Default location as 'latitude, longitude' (Enter to skip): ");
    io::stdout().flush().ok();

    let mut line = String::new();
    if input.read_line(&mut line).is_err() {
        return None;
    }

    let line = line.trim();
    if line.is_empty() {
        println!("Skipped.");
        return None;
    }

    match parse_location(line) {
        Some(coord) => {
            println!("Location: {}", coord);
            Some(coord)
        }
        None => {
            println!("Invalid location, skipped.");
            None
        }
    }
}

fn parse_location(text: &str) -> Option<GeoCoordinate> {
    let (lat, lon) = text.split_once(',')?;
    let lat = lat.trim().parse().ok()?;
    let lon = lon.trim().parse().ok()?;
    GeoCoordinate::new(lat, lon).ok()
}
