//! Per-query graph preparation.
//!
//! Turns the immutable network into the weighted graph one query searches:
//! stops that are not open yet and lines that are not running are left out,
//! every surviving line gets its hop weight for the query time, and stops of
//! the same station are joined by transfer edges.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::NaiveDateTime;
use tracing::debug;

use crate::domain::{LineId, Network, StationId, StopId};
use crate::timings::TimePolicy;

use super::config::RouterConfig;

/// How an edge of the prepared graph was formed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    /// A ride between neighbouring stops of a line
    Hop(LineId),
    /// A change of line within a station
    Transfer,
}

/// A directed adjacency entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub to: StopId,
    pub mins: u32,
    pub kind: EdgeKind,
}

/// A change of line between two stops of one station.
///
/// Edges are unordered: the edge between `a` and `b` is the edge between `b`
/// and `a`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransferEdge {
    low: StopId,
    high: StopId,
    mins: u32,
}

impl TransferEdge {
    pub fn new(a: StopId, b: StopId, mins: u32) -> Self {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        Self { low, high, mins }
    }

    /// Both stops, lowest id first.
    pub fn stops(&self) -> (StopId, StopId) {
        (self.low, self.high)
    }

    pub fn mins(&self) -> u32 {
        self.mins
    }

    /// The stop across the edge from `stop`, if `stop` is an end of it.
    pub fn other(&self, stop: StopId) -> Option<StopId> {
        if stop == self.low {
            Some(self.high)
        } else if stop == self.high {
            Some(self.low)
        } else {
            None
        }
    }
}

/// The weighted graph for one query.
#[derive(Debug, Clone, Default)]
pub struct PreparedGraph {
    candidates: Vec<StopId>,
    candidate_set: HashSet<StopId>,
    line_weights: BTreeMap<LineId, u32>,
    transfers: Vec<TransferEdge>,
    transfer_mins: u32,
    adjacency: HashMap<StopId, Vec<Edge>>,
}

impl PreparedGraph {
    /// Stops that can take part in the query, in network order.
    pub fn candidates(&self) -> &[StopId] {
        &self.candidates
    }

    pub fn is_candidate(&self, stop: StopId) -> bool {
        self.candidate_set.contains(&stop)
    }

    /// Edges leaving `stop`.
    pub fn neighbours(&self, stop: StopId) -> &[Edge] {
        self.adjacency.get(&stop).map_or(&[], Vec::as_slice)
    }

    /// Hop weight of a running line, `None` if the line was left out.
    pub fn line_weight(&self, line: LineId) -> Option<u32> {
        self.line_weights.get(&line).copied()
    }

    /// Lines running for this query.
    pub fn active_lines(&self) -> impl Iterator<Item = LineId> + '_ {
        self.line_weights.keys().copied()
    }

    pub fn transfers(&self) -> &[TransferEdge] {
        &self.transfers
    }

    /// Minutes per change of line for this query.
    pub fn transfer_mins(&self) -> u32 {
        self.transfer_mins
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Build the graph for a query at `at`, or an untimed query when `at` is
/// `None`.
///
/// The network is only read. An empty network gives an empty graph.
pub fn prepare<P: TimePolicy + ?Sized>(
    network: &Network,
    policy: &P,
    at: Option<NaiveDateTime>,
    config: &RouterConfig,
) -> PreparedGraph {
    let mut line_weights = BTreeMap::new();
    let mut excluded_lines = 0usize;

    for line in network.lines() {
        let weight = match at {
            Some(time) if !policy.is_operational(line.code(), time) => {
                excluded_lines += 1;
                continue;
            }
            Some(time) => policy.per_hop_cost(line.code(), time),
            None => config.untimed_hop_mins,
        };
        line_weights.insert(line.id(), weight);
    }

    // Stops of running lines that are already open. Each stop belongs to one
    // line, so this never yields a stop twice.
    let candidates: Vec<StopId> = network
        .stops()
        .iter()
        .filter(|stop| line_weights.contains_key(&stop.line()))
        .filter(|stop| at.is_none_or(|time| stop.is_open_on(time.date())))
        .map(|stop| stop.id())
        .collect();
    let candidate_set: HashSet<StopId> = candidates.iter().copied().collect();

    let transfer_mins = match at {
        Some(time) => policy.per_transfer_cost(time),
        None => config.untimed_transfer_mins,
    };

    let transfers = transfer_edges(network, &candidates, transfer_mins);

    let mut adjacency: HashMap<StopId, Vec<Edge>> = HashMap::new();
    for (&line_id, &mins) in &line_weights {
        for (a, b) in network.line(line_id).hops() {
            if !candidate_set.contains(&a) || !candidate_set.contains(&b) {
                continue;
            }
            let kind = EdgeKind::Hop(line_id);
            adjacency.entry(a).or_default().push(Edge { to: b, mins, kind });
            adjacency.entry(b).or_default().push(Edge { to: a, mins, kind });
        }
    }
    for edge in &transfers {
        let (a, b) = edge.stops();
        let mins = edge.mins();
        let kind = EdgeKind::Transfer;
        adjacency.entry(a).or_default().push(Edge { to: b, mins, kind });
        adjacency.entry(b).or_default().push(Edge { to: a, mins, kind });
    }

    debug!(
        lines = line_weights.len(),
        excluded_lines,
        candidates = candidates.len(),
        transfers = transfers.len(),
        transfer_mins,
        "Prepared routing graph"
    );

    PreparedGraph {
        candidates,
        candidate_set,
        line_weights,
        transfers,
        transfer_mins,
        adjacency,
    }
}

/// One transfer edge per unordered pair of candidate stops sharing a station.
fn transfer_edges(network: &Network, candidates: &[StopId], mins: u32) -> Vec<TransferEdge> {
    let mut by_station: BTreeMap<StationId, Vec<StopId>> = BTreeMap::new();
    for &stop in candidates {
        by_station
            .entry(network.stop(stop).station())
            .or_default()
            .push(stop);
    }

    let mut seen = HashSet::new();
    let mut edges = Vec::new();
    for stops in by_station.values().filter(|stops| stops.len() >= 2) {
        for (i, &a) in stops.iter().enumerate() {
            for &b in &stops[i + 1..] {
                let edge = TransferEdge::new(a, b, mins);
                if seen.insert(edge.stops()) {
                    edges.push(edge);
                }
            }
        }
    }
    edges
}
