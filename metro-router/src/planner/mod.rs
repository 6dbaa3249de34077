//! Minimal-time route planning.
//!
//! This module answers "what are all the fastest ways from this station to
//! that one?". Each query prepares a weighted graph from the network, runs a
//! label-setting search from every stop of the source station that keeps all
//! tied predecessors, and rebuilds every minimal path from them.

mod config;
mod prepare;
mod rank;
mod reconstruct;
mod search;
mod traverse;


pub use config::RouterConfig;
pub use prepare::{Edge, EdgeKind, PreparedGraph, TransferEdge, prepare};
pub use rank::{deduplicate, keep_fastest, rank_routes};
pub use reconstruct::reconstruct;
pub use search::{RouteError, RouteResult, Router};
pub use traverse::{Label, Traversal};
