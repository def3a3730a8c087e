//! Replay command - run a compass session over recorded heading samples.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use console::style;
use tokio_util::sync::CancellationToken;

use qibla::alignment::{AlignmentBand, FeedbackIntensity};
use qibla::compass::{CompassReading, QiblaCompass, RunSummary};
use qibla::declination::{current_year, DeclinationProvider, FixedDeclinationProvider};
use qibla::haptics::RecordingHaptics;
use qibla::location::FixedLocation;
use qibla::sensor::ReplaySensor;

use super::common::resolve_location;
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the replay command.
pub struct ReplayArgs {
    pub file: PathBuf,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub declination: Option<f64>,
    pub interval_ms: u64,
}

/// Run the replay command.
pub fn run(runner: &CliRunner, args: ReplayArgs) -> Result<(), CliError> {
    let config = runner.config();
    let observer = resolve_location(args.lat, args.lon, config)?;
    let sensor =
        load_samples(&args.file)?.with_interval(Duration::from_millis(args.interval_ms));

    // CLI value > config (fixed value or network lookup) > none
    let declination: Option<Arc<dyn DeclinationProvider>> = match args.declination {
        Some(degrees) => Some(Arc::new(FixedDeclinationProvider::new(degrees))),
        None => config.declination_provider(),
    };

    let shutdown = CancellationToken::new();
    let trigger = shutdown.clone();
    ctrlc::set_handler(move || trigger.cancel())
        .map_err(|e| CliError::Config(format!("Failed to set signal handler: {}", e)))?;

    println!(
        "Replaying {} samples from {}",
        sensor.samples().len(),
        args.file.display()
    );
    println!("Press Ctrl+C to stop");
    println!();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(CliError::RuntimeCreation)?;

    let haptics = Arc::new(RecordingHaptics::new());
    let compass_config = config.compass_config();
    let session_declination = declination.clone();

    let summary = runtime.block_on(async {
        let mut compass = QiblaCompass::new(compass_config, Arc::clone(&haptics));
        let subscription = compass
            .initialize(
                &FixedLocation::new(observer),
                &sensor,
                session_declination,
                current_year(),
            )
            .await?;

        if let Some(bearing) = compass.bearing() {
            println!(
                "Location {}  Qibla {} ({})",
                observer,
                style(bearing).cyan().bold(),
                bearing.compass_point()
            );
            println!();
        }

        let summary = compass.run(subscription, shutdown, print_reading).await;
        compass.teardown();
        Ok::<RunSummary, CliError>(summary)
    })?;

    // A blocking HTTP client must not be dropped inside the runtime
    drop(runtime);
    drop(declination);

    print_summary(&summary, &haptics);
    Ok(())
}

/// Read a JSON-lines recording.
fn load_samples(path: &Path) -> Result<ReplaySensor, CliError> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::ReadInput {
        path: path.to_path_buf(),
        source,
    })?;
    let sensor = ReplaySensor::from_json_lines(&text);
    if sensor.samples().is_empty() {
        return Err(CliError::Config(format!(
            "No heading samples found in {}",
            path.display()
        )));
    }
    Ok(sensor)
}

fn print_reading(reading: &CompassReading) {
    let heading = format!(
        "{:>5.1}° {:<2}",
        reading.heading.degrees(),
        reading.direction.as_str()
    );

    let Some(alignment) = reading.alignment else {
        println!("  heading {}", heading);
        return;
    };

    let band = match alignment.band {
        AlignmentBand::Aligned => style(alignment.band).green().bold(),
        AlignmentBand::Close => style(alignment.band).yellow(),
        AlignmentBand::Far => style(alignment.band).dim(),
    };
    let pulse = reading
        .emitted
        .map(|intensity| format!("  [pulse: {}]", intensity))
        .unwrap_or_default();

    println!(
        "  heading {}  gap {:>5.1}°  {}{}",
        heading, alignment.delta, band, pulse
    );
}

fn print_summary(summary: &RunSummary, haptics: &RecordingHaptics) {
    println!();
    println!("Replay finished");
    println!("  Samples:  {}", summary.samples);
    println!("  Skipped:  {}", summary.skipped);
    println!(
        "  Pulses:   {} (strong {}, medium {}, light {})",
        summary.emitted,
        haptics.count_of(FeedbackIntensity::Strong),
        haptics.count_of(FeedbackIntensity::Medium),
        haptics.count_of(FeedbackIntensity::Light)
    );
}
