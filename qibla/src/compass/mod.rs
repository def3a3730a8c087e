//! Qibla compass session.
//!
//! Ties the pieces together for one active compass view:
//!
//! ```text
//!  location fix ──► compute_bearing ──────────────┐
//!       │                                         ▼
//!       └──► declination lookup ──► cell ──► HeadingReconciler ──► evaluate ──► HapticSink
//!                                                 ▲
//!  HeadingSubscription ── sample ─────────────────┘
//! ```
//!
//! The bearing runs once per location fix. Every heading sample runs
//! normalize → correct → smooth → evaluate to completion before the next
//! sample is read. Nothing on that path awaits the declination lookup.
//!
//! # Example
//!
//! ```ignore
//! use qibla::compass::{CompassConfig, QiblaCompass};
//! use qibla::haptics::LogHaptics;
//!
//! let mut compass = QiblaCompass::new(CompassConfig::default(), LogHaptics);
//! let subscription = compass.initialize(&location, &sensor, Some(provider), year).await?;
//!
//! let shutdown = CancellationToken::new();
//! compass.run(subscription, shutdown, |reading| {
//!     println!("{} → {:?}", reading.heading, reading.alignment);
//! }).await;
//! ```

mod session;
mod types;

pub use session::{CompassConfig, QiblaCompass};
pub use types::{CompassError, CompassReading, CompassStatus, RunSummary};
