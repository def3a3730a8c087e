//! Magnetic declination lookup.
//!
//! Magnetic headings are corrected to true north by adding the local
//! declination. The value is looked up once per location fix from a remote
//! service on a best-effort basis and stored in a [`DeclinationHandle`] that
//! the heading path reads synchronously.
//!
//! # Architecture
//!
//! ```text
//! location fix ──► spawn_declination_fetch ──► DeclinationProvider (blocking pool)
//!                        │                          │
//!                        │ timeout / error          │ Ok(degrees)
//!                        ▼                          ▼
//!                   keep last value        DeclinationHandle::set
//!                                                   │
//!                                                   ▼
//!                               HeadingReconciler reads on every sample
//! ```

mod cell;
mod fetch;
mod http;
mod noaa;
mod provider;

pub use cell::DeclinationHandle;
pub use fetch::{current_year, spawn_declination_fetch, DEFAULT_FETCH_TIMEOUT};
pub use http::{HttpClient, ReqwestClient, DEFAULT_HTTP_TIMEOUT_SECS};
pub use noaa::{NoaaDeclinationProvider, NOAA_DECLINATION_URL};
pub use provider::{DeclinationError, DeclinationProvider, FixedDeclinationProvider};
