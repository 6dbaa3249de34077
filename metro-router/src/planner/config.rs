//! Router configuration.

/// Configuration parameters for route search.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Minutes per hop when the query has no time of travel.
    pub untimed_hop_mins: u32,

    /// Minutes per change of line when the query has no time of travel.
    pub untimed_transfer_mins: u32,

    /// Maximum number of routes to return. `None` returns every minimal route.
    pub max_results: Option<usize>,

    /// Stop the search once every destination stop that can still be
    /// optimal has been finalised.
    /// When false the whole reachable graph is explored.
    pub early_exit: bool,
}

impl RouterConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(
        untimed_hop_mins: u32,
        untimed_transfer_mins: u32,
        max_results: Option<usize>,
        early_exit: bool,
    ) -> Self {
        Self {
            untimed_hop_mins,
            untimed_transfer_mins,
            max_results,
            early_exit,
        }
    }

    /// The same configuration, exploring the whole graph.
    pub fn exhaustive(mut self) -> Self {
        self.early_exit = false;
        self
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            untimed_hop_mins: 1,
            untimed_transfer_mins: 1,
            max_results: None,
            early_exit: true,
        }
    }
}
