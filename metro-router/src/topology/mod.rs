//! Loading the network topology from a stations map.

mod error;
mod loader;

pub use error::TopologyError;
pub use loader::{StationRecord, from_json, from_records, load_file, parse_opening_date};
