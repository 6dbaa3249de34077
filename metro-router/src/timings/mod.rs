//! Time-of-day policy for the router.
//!
//! The router asks a [`TimePolicy`] whether a line runs at the query time,
//! how long a hop takes, and how long a change of line takes.
//! [`BandedTimings`] answers from a configuration of peak and night bands.

mod band;
mod config;
mod error;
mod policy;

pub use band::{Band, InvalidTimeBand, TimeBand};
pub use config::{LineChange, LineTimings, Timing, TimingsConfig};
pub use error::TimingsError;
pub use policy::{BandedTimings, LineStatus, TimePolicy, UnitTimings};
