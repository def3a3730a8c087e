//! Bearing command - print the Qibla direction for a location.

use console::style;
use qibla::bearing::compute_bearing;
use qibla::geo::KAABA;

use super::common::resolve_location;
use crate::error::CliError;
use crate::runner::CliRunner;

/// Run the bearing command.
pub fn run(runner: &CliRunner, lat: Option<f64>, lon: Option<f64>) -> Result<(), CliError> {
    let observer = resolve_location(lat, lon, runner.config())?;
    let bearing = compute_bearing(&observer)?;

    println!("Location: {}", observer);
    println!("Kaaba:    {}", KAABA);
    println!(
        "Qibla:    {} ({} from true north)",
        style(bearing).cyan().bold(),
        bearing.compass_point()
    );
    Ok(())
}
