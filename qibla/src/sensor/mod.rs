//! Heading sensor seam.
//!
//! A sensor hands out a [`HeadingSubscription`]: a channel of samples plus a
//! cancellation token. Dropping or unsubscribing stops the producer, which is
//! how a view releases the sensor when it is torn down or loses focus.

mod replay;

pub use replay::{ReplaySensor, DEFAULT_REPLAY_INTERVAL};

use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::heading::HeadingSample;

/// Default buffer between a sensor and its consumer.
pub const DEFAULT_SAMPLE_CHANNEL_CAPACITY: usize = 64;

/// Sensor errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SensorError {
    /// No magnetometer and no OS heading API on this device.
    #[error("Compass is not available on this device")]
    Unavailable,

    /// The sensor exists but the subscription could not be set up.
    #[error("Failed to subscribe to heading updates: {0}")]
    SubscribeFailed(String),
}

/// Source of heading samples.
pub trait HeadingSensor: Send + Sync {
    /// Whether the device can produce heading samples at all.
    fn is_available(&self) -> bool;

    /// Start delivering samples.
    ///
    /// Must be called from within a Tokio runtime.
    fn subscribe(&self) -> Result<HeadingSubscription, SensorError>;
}

/// An active stream of heading samples.
#[derive(Debug)]
pub struct HeadingSubscription {
    rx: mpsc::Receiver<HeadingSample>,
    cancel: CancellationToken,
}

impl HeadingSubscription {
    /// Wrap a receiver and the token its producer watches.
    pub fn new(rx: mpsc::Receiver<HeadingSample>, cancel: CancellationToken) -> Self {
        Self { rx, cancel }
    }

    /// Create a subscription together with its producer side.
    pub fn channel(capacity: usize) -> (mpsc::Sender<HeadingSample>, CancellationToken, Self) {
        let (tx, rx) = mpsc::channel(capacity);
        let cancel = CancellationToken::new();
        (tx, cancel.clone(), Self::new(rx, cancel))
    }

    /// Next sample, or `None` once the stream ends or is cancelled.
    pub async fn next(&mut self) -> Option<HeadingSample> {
        if self.cancel.is_cancelled() {
            return None;
        }
        tokio::select! {
            _ = self.cancel.cancelled() => None,
            sample = self.rx.recv() => sample,
        }
    }

    /// Stop the producer and discard anything still queued.
    pub fn unsubscribe(&mut self) {
        self.cancel.cancel();
        self.rx.close();
    }

    pub fn is_active(&self) -> bool {
        !self.cancel.is_cancelled()
    }
}

impl Drop for HeadingSubscription {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
