//! Routing trait and default Dijkstra implementation.
//!
//! # Pluggability
//!
//! `fleet-sim` calls routing via the [`Router`] trait, so a different
//! shortest-path engine can be swapped in without touching the delivery
//! loop.  The default [`DijkstraRouter`] is a single-source Dijkstra.
//!
//! # Unreachable nodes
//!
//! [`ShortestPaths`] always holds one entry per graph node.  Nodes with no
//! path from the source hold [`Reach::Unreachable`], never `0.0` and never a
//! missing entry, so callers can tell "already there" from "cannot get there".

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use fleet_core::NodeId;

use crate::network::Graph;

// ── Reach ─────────────────────────────────────────────────────────────────────

/// Shortest distance to one node, or the unreachable sentinel.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Reach {
    Reachable(f64),
    Unreachable,
}

impl Reach {
    #[inline]
    pub fn distance(self) -> Option<f64> {
        match self {
            Reach::Reachable(d) => Some(d),
            Reach::Unreachable => None,
        }
    }

    #[inline]
    pub fn is_reachable(self) -> bool {
        matches!(self, Reach::Reachable(_))
    }
}

// ── ShortestPaths ─────────────────────────────────────────────────────────────

/// Single-source result: one [`Reach`] per node, indexed by `NodeId`.
#[derive(Clone, Debug, PartialEq)]
pub struct ShortestPaths {
    source: NodeId,
    reach:  Vec<Reach>,
}

impl ShortestPaths {
    #[inline]
    pub fn source(&self) -> NodeId {
        self.source
    }

    /// Entry for `node`.  Ids outside the graph are unreachable.
    #[inline]
    pub fn get(&self, node: NodeId) -> Reach {
        self.reach.get(node.index()).copied().unwrap_or(Reach::Unreachable)
    }

    #[inline]
    pub fn distance(&self, node: NodeId) -> Option<f64> {
        self.get(node).distance()
    }

    /// Number of entries (equal to the graph's node count).
    pub fn len(&self) -> usize {
        self.reach.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reach.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, Reach)> + '_ {
        self.reach.iter().enumerate().map(|(i, &r)| (NodeId(i as u32), r))
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable single-source shortest-path engine.
///
/// Called once per truck per delivery step, always with a fresh source, so
/// implementations must not cache results across sources.
pub trait Router {
    fn shortest_paths(&self, graph: &Graph, source: NodeId) -> ShortestPaths;
}

// ── DijkstraRouter ────────────────────────────────────────────────────────────

/// Dijkstra with a binary heap and lazy deletion, O((V + E) log V).
///
/// Stale heap entries are skipped on pop instead of using decrease-key.
/// Equal distances pop in ascending `NodeId` order, so identical inputs
/// always produce identical results.
pub struct DijkstraRouter;

impl Router for DijkstraRouter {
    fn shortest_paths(&self, graph: &Graph, source: NodeId) -> ShortestPaths {
        dijkstra(graph, source)
    }
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

/// Heap entry ordered by `(distance, node)`.  Distances are validated finite
/// and non-negative at insertion, so `total_cmp` is a true total order here.
#[derive(Copy, Clone, Debug, PartialEq)]
struct Frontier {
    miles: f64,
    node:  NodeId,
}

impl Eq for Frontier {}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        self.miles
            .total_cmp(&other.miles)
            .then_with(|| self.node.cmp(&other.node))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn dijkstra(graph: &Graph, source: NodeId) -> ShortestPaths {
    let n = graph.node_count();
    let mut reach = vec![Reach::Unreachable; n];
    if source.index() >= n {
        return ShortestPaths { source, reach };
    }

    let mut finalized = vec![false; n];
    // Reverse makes BinaryHeap (max) behave as a min-heap.
    let mut heap: BinaryHeap<Reverse<Frontier>> = BinaryHeap::new();
    heap.push(Reverse(Frontier { miles: 0.0, node: source }));

    while let Some(Reverse(Frontier { miles, node })) = heap.pop() {
        if finalized[node.index()] {
            continue;
        }
        finalized[node.index()] = true;
        reach[node.index()] = Reach::Reachable(miles);

        for (&neighbor, &weight) in graph.adjacency_of(node) {
            if !finalized[neighbor.index()] {
                heap.push(Reverse(Frontier { miles: miles + weight, node: neighbor }));
            }
        }
    }

    ShortestPaths { source, reach }
}
