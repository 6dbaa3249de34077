//! Application state for the web layer.

use std::sync::Arc;

use crate::domain::Network;
use crate::planner::RouterConfig;
use crate::timings::BandedTimings;

/// Shared application state.
///
/// Contains everything a request needs to route; none of it changes after
/// startup.
#[derive(Clone)]
pub struct AppState {
    /// The metro network
    pub network: Arc<Network>,

    /// Travel time policy
    pub timings: Arc<BandedTimings>,

    /// Router configuration
    pub config: Arc<RouterConfig>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(network: Network, timings: BandedTimings, config: RouterConfig) -> Self {
        Self {
            network: Arc::new(network),
            timings: Arc::new(timings),
            config: Arc::new(config),
        }
    }
}
