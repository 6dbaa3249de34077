//! Rebuilding routes from a finished traversal.
//!
//! Walks predecessor sets backwards from each destination stop, fanning out
//! at every tie, until a source stop is reached.

use std::collections::HashSet;

use tracing::trace;

use crate::domain::{Network, Route, StopId};

use super::rank::{deduplicate, keep_fastest};
use super::traverse::Traversal;

/// Every minimal-time route from any of `sources` to any of `destinations`.
///
/// Destinations the traversal never reached contribute nothing. Only routes
/// whose time equals the smallest destination cost are returned, without
/// duplicates, in discovery order.
///
/// # Panics
///
/// If a destination or predecessor is not part of the traversal.
pub fn reconstruct(
    network: &Network,
    destinations: &[StopId],
    sources: &[StopId],
    traversal: &Traversal<'_>,
) -> Vec<Route> {
    let sources: HashSet<StopId> = sources.iter().copied().collect();

    let mut routes = Vec::new();
    for &destination in destinations {
        let Some(cost) = traversal.cost(destination) else {
            continue;
        };
        let paths = paths_to(destination, &sources, traversal);
        trace!(?destination, cost, paths = paths.len(), "Reconstructed paths");
        routes.extend(
            paths
                .iter()
                .map(|path| Route::from_stop_ids(network, path, cost)),
        );
    }

    deduplicate(keep_fastest(routes))
}

/// Every path from a source to `stop`, in travel order.
///
/// A stop that is neither a source nor has predecessors yields no paths.
fn paths_to(stop: StopId, sources: &HashSet<StopId>, traversal: &Traversal<'_>) -> Vec<Vec<StopId>> {
    if sources.contains(&stop) {
        return vec![vec![stop]];
    }

    traversal
        .predecessors(stop)
        .iter()
        .flat_map(|&previous| paths_to(previous, sources, traversal))
        .map(|mut path| {
            path.push(stop);
            path
        })
        .collect()
}
