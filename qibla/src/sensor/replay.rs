//! Replays recorded heading samples as if they came from a live sensor.

use std::time::Duration;

use tracing::{debug, warn};

use super::{HeadingSensor, HeadingSubscription, SensorError, DEFAULT_SAMPLE_CHANNEL_CAPACITY};
use crate::heading::HeadingSample;

/// Default delay between replayed samples (typical sensor cadence, 10 Hz).
pub const DEFAULT_REPLAY_INTERVAL: Duration = Duration::from_millis(100);

/// A sensor backed by a fixed list of samples.
#[derive(Debug, Clone)]
pub struct ReplaySensor {
    samples: Vec<HeadingSample>,
    interval: Duration,
}

impl ReplaySensor {
    pub fn new(samples: Vec<HeadingSample>) -> Self {
        Self {
            samples,
            interval: DEFAULT_REPLAY_INTERVAL,
        }
    }

    /// Set the delay between samples (zero replays as fast as possible).
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Parse JSON-lines samples, one per line.
    ///
    /// Blank lines and lines starting with `#` are ignored. Lines that do
    /// not parse are skipped with a warning rather than failing the replay.
    pub fn from_json_lines(text: &str) -> Self {
        let mut samples = Vec::new();
        for (index, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            match serde_json::from_str::<HeadingSample>(line) {
                Ok(sample) => samples.push(sample),
                Err(e) => warn!(line = index + 1, error = %e, "Skipping unparseable heading sample"),
            }
        }
        Self::new(samples)
    }

    pub fn samples(&self) -> &[HeadingSample] {
        &self.samples
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl HeadingSensor for ReplaySensor {
    fn is_available(&self) -> bool {
        true
    }

    fn subscribe(&self) -> Result<HeadingSubscription, SensorError> {
        let (tx, cancel, subscription) =
            HeadingSubscription::channel(DEFAULT_SAMPLE_CHANNEL_CAPACITY);
        let samples = self.samples.clone();
        let interval = self.interval;

        tokio::spawn(async move {
            for (index, sample) in samples.into_iter().enumerate() {
                if index > 0 && !interval.is_zero() {
                    tokio::select! {
                        _ = cancel.cancelled() => break,
                        _ = tokio::time::sleep(interval) => {}
                    }
                }
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    sent = tx.send(sample) => {
                        if sent.is_err() {
                            break;
                        }
                    }
                }
            }
            debug!("Replay sensor finished");
        });

        Ok(subscription)
    }
}
