//! Route ranking for search results.
//!
//! Every route a search returns takes the same minimal time, so ranking
//! mostly orders equally fast alternatives.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::domain::{Route, StopId};

/// Rank routes by preference.
///
/// Routes are ranked by:
/// 1. Time taken (shorter is better)
/// 2. Number of changes (fewer is better)
/// 3. Stations travelled (fewer is better)
/// 4. Stop codes, for a stable order between otherwise equal routes
///
/// Returns routes sorted best-first.
pub fn rank_routes(mut routes: Vec<Route>) -> Vec<Route> {
    routes.sort_by(compare);
    routes
}

fn compare(a: &Route, b: &Route) -> Ordering {
    a.time_taken_mins()
        .cmp(&b.time_taken_mins())
        .then_with(|| a.change_count().cmp(&b.change_count()))
        .then_with(|| a.stations_travelled().cmp(&b.stations_travelled()))
        .then_with(|| a.stop_codes().cmp(&b.stop_codes()))
}

/// Keep only the routes with the smallest time.
pub fn keep_fastest(routes: Vec<Route>) -> Vec<Route> {
    let Some(best) = routes.iter().map(Route::time_taken_mins).min() else {
        return routes;
    };
    routes
        .into_iter()
        .filter(|route| route.time_taken_mins() == best)
        .collect()
}

/// Remove routes visiting the same stops in the same order, keeping the
/// first of each.
pub fn deduplicate(routes: Vec<Route>) -> Vec<Route> {
    if routes.len() <= 1 {
        return routes;
    }

    let mut seen: HashSet<Vec<StopId>> = HashSet::with_capacity(routes.len());
    routes
        .into_iter()
        .filter(|route| seen.insert(route.stop_ids()))
        .collect()
}
