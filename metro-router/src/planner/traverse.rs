//! Label-setting traversal over a prepared graph.
//!
//! A multi-source shortest-path search that keeps, for every stop, the set
//! of predecessors achieving its minimum cost. Ties are kept rather than
//! broken, so every equally fast path can be rebuilt afterwards.
//!
//! The frontier is a min-heap keyed by `(cost, stop)` with lazy deletion:
//! a stop may sit in the heap several times and stale entries are skipped on
//! extraction. Ordering by stop id on equal cost keeps extraction order
//! deterministic.

use std::cmp::Reverse;
use std::collections::{BTreeSet, BinaryHeap, HashMap, HashSet};

use tracing::trace;

use crate::domain::StopId;

use super::prepare::PreparedGraph;

/// Search state for one stop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Label {
    cost: Option<u32>,
    predecessors: BTreeSet<StopId>,
}

impl Label {
    /// Best known cost, `None` while unreached.
    pub fn cost(&self) -> Option<u32> {
        self.cost
    }

    /// Stops that reach this one at its best known cost.
    pub fn predecessors(&self) -> &BTreeSet<StopId> {
        &self.predecessors
    }
}

/// An in-progress search.
#[derive(Debug)]
pub struct Traversal<'g> {
    graph: &'g PreparedGraph,
    labels: HashMap<StopId, Label>,
    visited: HashSet<StopId>,
    frontier: BinaryHeap<Reverse<(u32, StopId)>>,
    current: Option<StopId>,
}

impl<'g> Traversal<'g> {
    /// Start a search from `sources`, each at cost 0.
    ///
    /// Sources that are not part of the graph are ignored.
    pub fn start(graph: &'g PreparedGraph, sources: &[StopId]) -> Self {
        let labels = graph
            .candidates()
            .iter()
            .map(|&stop| (stop, Label::default()))
            .collect();

        let mut traversal = Self {
            graph,
            labels,
            visited: HashSet::new(),
            frontier: BinaryHeap::new(),
            current: None,
        };

        for &source in sources {
            if let Some(label) = traversal.labels.get_mut(&source) {
                if label.cost.is_none() {
                    label.cost = Some(0);
                    traversal.frontier.push(Reverse((0, source)));
                }
            }
        }

        traversal
    }

    /// Whether a reachable, unvisited stop remains.
    pub fn has_next(&mut self) -> bool {
        self.peek_next().is_some()
    }

    /// The stop `move_to_next` would extract, with its cost.
    pub fn peek_next(&mut self) -> Option<(StopId, u32)> {
        while let Some(&Reverse((cost, stop))) = self.frontier.peek() {
            if self.is_stale(stop, cost) {
                self.frontier.pop();
                continue;
            }
            return Some((stop, cost));
        }
        None
    }

    /// Extract the cheapest unvisited stop, mark it visited and relax its
    /// edges.
    ///
    /// Returns `None` once every reachable stop has been visited.
    pub fn move_to_next(&mut self) -> Option<StopId> {
        let (stop, cost) = self.peek_next()?;
        self.frontier.pop();
        self.visited.insert(stop);
        self.current = Some(stop);
        trace!(?stop, cost, "Visiting stop");

        let graph = self.graph;
        for edge in graph.neighbours(stop) {
            if !self.visited.contains(&edge.to) {
                self.relax(edge.to, stop, edge.mins);
            }
        }

        Some(stop)
    }

    /// Offer `stop` a path through `via` costing `mins` more than `via`.
    ///
    /// A cheaper path replaces the predecessor set; an equally cheap one
    /// joins it.
    ///
    /// # Panics
    ///
    /// If either stop is not in the graph, or `via` has not been reached.
    pub fn relax(&mut self, stop: StopId, via: StopId, mins: u32) {
        let via_cost = self
            .label(via)
            .cost
            .expect("relaxing through an unreached stop");
        let candidate = via_cost.saturating_add(mins);

        let label = self
            .labels
            .get_mut(&stop)
            .unwrap_or_else(|| panic!("stop {stop:?} is not part of the traversal"));
        match label.cost {
            Some(current) if candidate > current => {}
            Some(current) if candidate == current => {
                label.predecessors.insert(via);
            }
            _ => {
                label.cost = Some(candidate);
                label.predecessors.clear();
                label.predecessors.insert(via);
                self.frontier.push(Reverse((candidate, stop)));
            }
        }
    }

    /// Run until every reachable stop is visited.
    pub fn run_to_completion(&mut self) {
        while self.move_to_next().is_some() {}
    }

    /// The most recently extracted stop.
    pub fn current(&self) -> Option<StopId> {
        self.current
    }

    /// # Panics
    ///
    /// If `stop` is not in the graph.
    pub fn label(&self, stop: StopId) -> &Label {
        self.labels
            .get(&stop)
            .unwrap_or_else(|| panic!("stop {stop:?} is not part of the traversal"))
    }

    /// Best known cost of `stop`, `None` while unreached.
    pub fn cost(&self, stop: StopId) -> Option<u32> {
        self.label(stop).cost
    }

    pub fn predecessors(&self, stop: StopId) -> &BTreeSet<StopId> {
        &self.label(stop).predecessors
    }

    pub fn is_visited(&self, stop: StopId) -> bool {
        self.visited.contains(&stop)
    }

    /// Number of stops visited so far.
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    fn is_stale(&self, stop: StopId, cost: u32) -> bool {
        self.visited.contains(&stop) || self.labels.get(&stop).and_then(Label::cost) != Some(cost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Network, NetworkBuilder, StopSpec};
    use crate::planner::config::RouterConfig;
    use crate::planner::prepare::prepare;
    use crate::timings::UnitTimings;
    use chrono::NaiveDate;

    fn stop(network: &Network, code: &str) -> StopId {
        network.find_stop(code).unwrap().id()
    }

    /// AA: P - Q - R - S, BB: P - T - S
    fn diamond() -> Network {
        let day = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        let mut builder = NetworkBuilder::new();
        builder
            .add_line(vec![
                StopSpec::new("AA1", "P", day),
                StopSpec::new("AA2", "Q", day),
                StopSpec::new("AA3", "R", day),
                StopSpec::new("AA4", "S", day),
            ])
            .unwrap();
        builder
            .add_line(vec![
                StopSpec::new("BB1", "P", day),
                StopSpec::new("BB2", "T", day),
                StopSpec::new("BB3", "S", day),
            ])
            .unwrap();
        builder.build()
    }

    #[test]
    fn sources_start_at_zero() {
        let network = diamond();
        let graph = prepare(&network, &UnitTimings, None, &RouterConfig::default());
        let aa1 = stop(&network, "AA1");
        let traversal = Traversal::start(&graph, &[aa1]);

        assert_eq!(traversal.cost(aa1), Some(0));
        assert!(traversal.predecessors(aa1).is_empty());
        assert_eq!(traversal.cost(stop(&network, "AA2")), None);
        assert_eq!(traversal.current(), None);
    }

    #[test]
    fn extraction_is_in_cost_order() {
        let network = diamond();
        let graph = prepare(&network, &UnitTimings, None, &RouterConfig::default());
        let mut traversal = Traversal::start(&graph, &[stop(&network, "AA1")]);

        let mut costs = Vec::new();
        while let Some(next) = traversal.move_to_next() {
            costs.push(traversal.cost(next).unwrap());
            assert_eq!(traversal.current(), Some(next));
        }

        assert_eq!(costs.len(), 7);
        assert!(costs.windows(2).all(|w| w[0] <= w[1]));
        assert!(!traversal.has_next());
    }

    #[test]
    fn transfers_are_not_free() {
        let network = diamond();
        let graph = prepare(&network, &UnitTimings, None, &RouterConfig::default());
        let mut traversal = Traversal::start(&graph, &[stop(&network, "AA1")]);
        traversal.run_to_completion();

        let aa4 = stop(&network, "AA4");
        let bb3 = stop(&network, "BB3");
        assert_eq!(traversal.cost(aa4), Some(3));
        assert_eq!(traversal.cost(bb3), Some(3));

        // Changing at S would cost 4 either way
        let aa4_preds: Vec<StopId> = traversal.predecessors(aa4).iter().copied().collect();
        assert_eq!(aa4_preds, vec![stop(&network, "AA3")]);
        let bb3_preds: Vec<StopId> = traversal.predecessors(bb3).iter().copied().collect();
        assert_eq!(bb3_preds, vec![stop(&network, "BB2")]);
    }

    #[test]
    fn ties_keep_every_predecessor() {
        // AA: P - M, BB: P - N, CC: M - K - N
        let day = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        let mut builder = NetworkBuilder::new();
        builder
            .add_line(vec![StopSpec::new("AA1", "P", day), StopSpec::new("AA2", "M", day)])
            .unwrap();
        builder
            .add_line(vec![StopSpec::new("BB1", "P", day), StopSpec::new("BB2", "N", day)])
            .unwrap();
        builder
            .add_line(vec![
                StopSpec::new("CC1", "M", day),
                StopSpec::new("CC2", "K", day),
                StopSpec::new("CC3", "N", day),
            ])
            .unwrap();
        let network = builder.build();
        let graph = prepare(&network, &UnitTimings, None, &RouterConfig::default());

        let sources = [stop(&network, "AA1"), stop(&network, "BB1")];
        let mut traversal = Traversal::start(&graph, &sources);
        traversal.run_to_completion();

        let cc2 = stop(&network, "CC2");
        assert_eq!(traversal.cost(cc2), Some(3));
        let preds: Vec<StopId> = traversal.predecessors(cc2).iter().copied().collect();
        assert_eq!(preds, vec![stop(&network, "CC1"), stop(&network, "CC3")]);
    }

    #[test]
    fn equal_cost_relaxation_adds_predecessor() {
        let network = diamond();
        let graph = prepare(&network, &UnitTimings, None, &RouterConfig::default());
        let aa1 = stop(&network, "AA1");
        let bb1 = stop(&network, "BB1");
        let aa2 = stop(&network, "AA2");
        let mut traversal = Traversal::start(&graph, &[aa1, bb1]);

        traversal.relax(aa2, aa1, 1);
        traversal.relax(aa2, bb1, 1);
        assert_eq!(traversal.cost(aa2), Some(1));
        assert_eq!(traversal.predecessors(aa2).len(), 2);

        traversal.relax(aa2, aa1, 0);
        assert_eq!(traversal.cost(aa2), Some(0));
        assert_eq!(
            traversal.predecessors(aa2).iter().copied().collect::<Vec<_>>(),
            vec![aa1]
        );

        traversal.relax(aa2, bb1, 5);
        assert_eq!(traversal.cost(aa2), Some(0));
        assert_eq!(traversal.predecessors(aa2).len(), 1);
    }

    #[test]
    fn stale_entries_are_skipped() {
        let network = diamond();
        let graph = prepare(&network, &UnitTimings, None, &RouterConfig::default());
        let aa1 = stop(&network, "AA1");
        let aa3 = stop(&network, "AA3");
        let mut traversal = Traversal::start(&graph, &[aa1]);

        traversal.relax(aa3, aa1, 10);
        traversal.relax(aa3, aa1, 2);
        let mut seen = Vec::new();
        while let Some(next) = traversal.move_to_next() {
            seen.push(next);
        }
        assert_eq!(seen.iter().filter(|&&s| s == aa3).count(), 1);
        assert_eq!(traversal.visited_count(), 7);
    }

    #[test]
    fn unknown_sources_are_ignored() {
        let network = diamond();
        let graph = prepare(&network, &UnitTimings, None, &RouterConfig::default());
        let mut traversal = Traversal::start(&graph, &[StopId(99)]);
        assert!(!traversal.has_next());
        assert_eq!(traversal.move_to_next(), None);
    }

    #[test]
    fn duplicate_sources_are_queued_once() {
        let network = diamond();
        let graph = prepare(&network, &UnitTimings, None, &RouterConfig::default());
        let aa1 = stop(&network, "AA1");
        let mut traversal = Traversal::start(&graph, &[aa1, aa1]);

        assert_eq!(traversal.move_to_next(), Some(aa1));
        assert_ne!(traversal.peek_next().map(|(s, _)| s), Some(aa1));
    }

    #[test]
    #[should_panic(expected = "not part of the traversal")]
    fn missing_label_panics() {
        let network = diamond();
        let graph = prepare(&network, &UnitTimings, None, &RouterConfig::default());
        let traversal = Traversal::start(&graph, &[]);
        traversal.predecessors(StopId(42));
    }
}
