//! Shared declination value.
//!
//! A single-writer, read-mostly cell. The fetch task writes once per location
//! fix; the heading path reads on every sample without awaiting.

use std::sync::Arc;

use tokio::sync::watch;

/// Handle to the current magnetic declination.
///
/// Cloning the handle shares the same underlying value. Reads never block
/// on a pending fetch: until a value arrives, [`DeclinationHandle::degrees`]
/// returns 0.
#[derive(Debug, Clone)]
pub struct DeclinationHandle {
    tx: Arc<watch::Sender<Option<f64>>>,
}

impl Default for DeclinationHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl DeclinationHandle {
    /// Create an empty cell (no declination known yet).
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    /// Create a cell that already holds a value.
    pub fn with_value(degrees: f64) -> Self {
        let handle = Self::new();
        handle.set(degrees);
        handle
    }

    /// Store a new declination value.
    pub fn set(&self, degrees: f64) {
        self.tx.send_replace(Some(degrees));
    }

    /// Forget the stored value; reads fall back to 0.
    pub fn clear(&self) {
        self.tx.send_replace(None);
    }

    /// The last stored value, if any.
    pub fn get(&self) -> Option<f64> {
        *self.tx.borrow()
    }

    /// The value to apply to magnetic headings (0 when unknown).
    pub fn degrees(&self) -> f64 {
        self.get().unwrap_or(0.0)
    }

    /// Watch for updates (for displays that show the correction in use).
    pub fn subscribe(&self) -> watch::Receiver<Option<f64>> {
        self.tx.subscribe()
    }
}
