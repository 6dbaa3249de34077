//! Route search between two stations.
//!
//! A query runs in four steps: prepare the weighted graph for the query
//! time, run a label-setting traversal from every stop of the source
//! station, rebuild every minimal path to the destination station's stops,
//! then rank the result.

use std::collections::HashSet;

use chrono::NaiveDateTime;
use tracing::{debug, trace};

use crate::domain::{Network, Route, StationId, StopId};
use crate::timings::TimePolicy;

use super::config::RouterConfig;
use super::prepare::{PreparedGraph, prepare};
use super::rank::rank_routes;
use super::reconstruct::reconstruct;
use super::traverse::Traversal;

/// Error from route search.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    /// No station of the network has this name
    #[error("unknown station {0:?}")]
    UnknownStation(String),
}

/// Result of route search.
#[derive(Debug, Clone, Default)]
pub struct RouteResult {
    /// Minimal-time routes, ranked best-first.
    pub routes: Vec<Route>,

    /// Number of stops finalised during search.
    pub stops_visited: usize,
}

impl RouteResult {
    /// Create an empty result.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Finds minimal-time routes over a network.
///
/// The router only reads the network; concurrent queries may share one.
pub struct Router<'a, P: TimePolicy + ?Sized> {
    network: &'a Network,
    policy: &'a P,
    config: &'a RouterConfig,
}

impl<'a, P: TimePolicy + ?Sized> Router<'a, P> {
    /// Create a new router.
    pub fn new(network: &'a Network, policy: &'a P, config: &'a RouterConfig) -> Self {
        Self {
            network,
            policy,
            config,
        }
    }

    /// Find every minimal-time route between two stations, by name.
    ///
    /// With `at` set, only stops open on that date and lines running at that
    /// time take part, costed by the time policy. Without it every stop and
    /// line takes part at unit cost.
    ///
    /// Returns an empty result when the stations are not connected, or when
    /// one of them has no stop taking part in the query.
    pub fn find_routes(
        &self,
        source: &str,
        destination: &str,
        at: Option<NaiveDateTime>,
    ) -> Result<RouteResult, RouteError> {
        let source = self.station(source)?;
        let destination = self.station(destination)?;
        Ok(self.find_routes_between(source, destination, at))
    }

    /// Find every minimal-time route between two stations of the network.
    pub fn find_routes_between(
        &self,
        source: StationId,
        destination: StationId,
        at: Option<NaiveDateTime>,
    ) -> RouteResult {
        let graph = prepare(self.network, self.policy, at, self.config);

        let sources = self.candidate_stops(&graph, source);
        let destinations = self.candidate_stops(&graph, destination);
        if sources.is_empty() || destinations.is_empty() {
            debug!(
                source = self.network.station(source).name(),
                destination = self.network.station(destination).name(),
                sources = sources.len(),
                destinations = destinations.len(),
                "Station has no usable stops"
            );
            return RouteResult::empty();
        }

        let mut traversal = Traversal::start(&graph, &sources);
        self.explore(&mut traversal, &destinations);

        let mut routes = rank_routes(reconstruct(
            self.network,
            &destinations,
            &sources,
            &traversal,
        ));
        if let Some(max) = self.config.max_results {
            routes.truncate(max);
        }

        debug!(
            source = self.network.station(source).name(),
            destination = self.network.station(destination).name(),
            ?at,
            routes = routes.len(),
            stops_visited = traversal.visited_count(),
            "Route search complete"
        );

        RouteResult {
            routes,
            stops_visited: traversal.visited_count(),
        }
    }

    fn station(&self, name: &str) -> Result<StationId, RouteError> {
        self.network
            .find_station(name)
            .map(|station| station.id())
            .ok_or_else(|| RouteError::UnknownStation(name.to_string()))
    }

    /// Stops of `station` that take part in the query.
    fn candidate_stops(&self, graph: &PreparedGraph, station: StationId) -> Vec<StopId> {
        self.network
            .stops_at(station)
            .map(|stop| stop.id())
            .filter(|&stop| graph.is_candidate(stop))
            .collect()
    }

    /// Run the traversal until no destination stop can still be optimal.
    ///
    /// Stops once every destination stop is finalised, or once the next stop
    /// to extract costs more than the cheapest finalised destination. Stops
    /// costing the same are still extracted so equally fast routes through
    /// them keep their predecessors.
    fn explore(&self, traversal: &mut Traversal<'_>, destinations: &[StopId]) {
        if !self.config.early_exit {
            traversal.run_to_completion();
            return;
        }

        let targets: HashSet<StopId> = destinations.iter().copied().collect();
        let mut remaining = targets.len();
        let mut best: Option<u32> = None;

        while let Some((next, cost)) = traversal.peek_next() {
            if remaining == 0 || best.is_some_and(|best| cost > best) {
                trace!(remaining, ?best, cost, "Stopping early");
                break;
            }

            traversal.move_to_next();
            if targets.contains(&next) {
                remaining -= 1;
                best.get_or_insert(cost);
            }
        }
    }
}
