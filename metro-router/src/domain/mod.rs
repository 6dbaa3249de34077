//! Domain types for the metro router.
//!
//! This module contains the network model the router works on. All types
//! enforce their invariants at construction time, and the assembled
//! [`Network`] is immutable, so routing code can trust what it reads.

mod error;
mod line;
mod network;
mod route;
mod station;
mod stop;

pub use error::DomainError;
pub use line::{Line, LineId};
pub use network::{Network, NetworkBuilder, StopSpec};
pub use route::{Route, RouteStop};
pub use station::{Station, StationId};
pub use stop::{InvalidCode, LineCode, Stop, StopCode, StopId};
