//! Haptic feedback seam.
//!
//! The compass emits a [`FeedbackIntensity`] whenever alignment changes
//! enough to be worth telling the user about. Sinks are fire-and-forget.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::info;

use crate::alignment::FeedbackIntensity;

/// Consumer of haptic feedback events.
pub trait HapticSink: Send + Sync {
    fn emit(&self, intensity: FeedbackIntensity);
}

impl<T: HapticSink + ?Sized> HapticSink for Arc<T> {
    fn emit(&self, intensity: FeedbackIntensity) {
        (**self).emit(intensity)
    }
}

/// Sink that writes each pulse to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogHaptics;

impl HapticSink for LogHaptics {
    fn emit(&self, intensity: FeedbackIntensity) {
        info!(intensity = %intensity, "Haptic pulse");
    }
}

/// Sink that remembers every pulse it receives.
#[derive(Debug, Default)]
pub struct RecordingHaptics {
    events: Mutex<Vec<FeedbackIntensity>>,
}

impl RecordingHaptics {
    pub fn new() -> Self {
        Self::default()
    }

    /// All pulses in emission order.
    pub fn events(&self) -> Vec<FeedbackIntensity> {
        self.events.lock().clone()
    }

    pub fn count(&self) -> usize {
        self.events.lock().len()
    }

    /// Number of pulses of one intensity.
    pub fn count_of(&self, intensity: FeedbackIntensity) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|&&e| e == intensity)
            .count()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl HapticSink for RecordingHaptics {
    fn emit(&self, intensity: FeedbackIntensity) {
        self.events.lock().push(intensity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_haptics() {
        let sink = RecordingHaptics::new();
        sink.emit(FeedbackIntensity::Light);
        sink.emit(FeedbackIntensity::Strong);
        sink.emit(FeedbackIntensity::Light);

        assert_eq!(
            sink.events(),
            vec![
                FeedbackIntensity::Light,
                FeedbackIntensity::Strong,
                FeedbackIntensity::Light
            ]
        );
        assert_eq!(sink.count_of(FeedbackIntensity::Light), 2);
        assert_eq!(sink.count_of(FeedbackIntensity::Medium), 0);

        sink.clear();
        assert_eq!(sink.count(), 0);
    }

    #[test]
    fn test_shared_sink_through_arc() {
        let sink = Arc::new(RecordingHaptics::new());
        let shared: Arc<RecordingHaptics> = Arc::clone(&sink);
        shared.emit(FeedbackIntensity::Medium);
        assert_eq!(sink.count(), 1);
    }
}
