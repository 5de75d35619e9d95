//! Undirected distance graph over named, addressed locations.
//!
//! # Data layout
//!
//! Nodes are stored densely and addressed by `NodeId` (insertion order).
//! Each node owns an ordered `{neighbor → miles}` map, so iteration over a
//! node's neighbours is deterministic:
//!
//! ```text
//! nodes[n]      = Location { name, address }
//! adjacency[n]  = BTreeMap<NodeId, f64>
//! ```
//!
//! # Identity
//!
//! A location is identified by its `(name, address)` pair, and **both**
//! fields are unique across the graph.  Two explicit indexes back the
//! lookups; inserting a location that shares only one of the two fields with
//! an existing node is rejected instead of silently aliasing it.
//!
//! The graph is built once from the distance matrix and then only read.

use std::collections::BTreeMap;
use std::fmt;

use rustc_hash::FxHashMap;

use fleet_core::NodeId;

use crate::{GraphError, GraphResult};

static NO_NEIGHBORS: BTreeMap<NodeId, f64> = BTreeMap::new();

// ── Location ──────────────────────────────────────────────────────────────────

/// A graph vertex: a display name plus the street address used as the lookup
/// key for packages.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Location {
    pub name:    String,
    pub address: String,
}

impl Location {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self { name: name.into(), address: address.into() }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.address)
    }
}

// ── Graph ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default)]
pub struct Graph {
    nodes:      Vec<Location>,
    by_name:    FxHashMap<String, NodeId>,
    by_address: FxHashMap<String, NodeId>,
    adjacency:  Vec<BTreeMap<NodeId, f64>>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(BTreeMap::len).sum::<usize>() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // ── Construction ──────────────────────────────────────────────────────

    /// Insert `location` and return its id.
    ///
    /// Idempotent: inserting the same `(name, address)` again returns the
    /// existing id.  A location whose name **or** address (but not both)
    /// already belongs to another node fails with [`GraphError::Collision`].
    pub fn add_node(&mut self, location: Location) -> GraphResult<NodeId> {
        let named = self.by_name.get(&location.name).copied();
        let addressed = self.by_address.get(&location.address).copied();

        match (named, addressed) {
            (Some(a), Some(b)) if a == b => return Ok(a),
            (None, None) => {}
            (Some(existing), _) | (None, Some(existing)) => {
                return Err(GraphError::Collision {
                    new:      location.to_string(),
                    existing: self.nodes[existing.index()].to_string(),
                });
            }
        }

        let id = NodeId::try_from(self.nodes.len())
            .map_err(|_| GraphError::Matrix("too many locations".into()))?;
        self.by_name.insert(location.name.clone(), id);
        self.by_address.insert(location.address.clone(), id);
        self.nodes.push(location);
        self.adjacency.push(BTreeMap::new());
        Ok(id)
    }

    /// Insert both endpoints if needed, then record `miles` in both
    /// directions.
    ///
    /// Re-adding an existing pair overwrites its distance (last write wins).
    pub fn add_edge(&mut self, a: Location, b: Location, miles: f64) -> GraphResult<()> {
        if a == b {
            return Err(GraphError::SelfLoop(a.to_string()));
        }
        let a = self.add_node(a)?;
        let b = self.add_node(b)?;
        self.connect(a, b, miles)
    }

    /// Id-based form of [`add_edge`](Self::add_edge).  Both ids must already
    /// be in the graph.
    pub fn connect(&mut self, a: NodeId, b: NodeId, miles: f64) -> GraphResult<()> {
        for id in [a, b] {
            if id.index() >= self.nodes.len() {
                return Err(GraphError::NodeNotFound(id));
            }
        }
        if a == b {
            return Err(GraphError::SelfLoop(self.nodes[a.index()].to_string()));
        }
        if !miles.is_finite() || miles < 0.0 {
            return Err(GraphError::InvalidWeight {
                from:   self.nodes[a.index()].to_string(),
                to:     self.nodes[b.index()].to_string(),
                weight: miles,
            });
        }
        self.adjacency[a.index()].insert(b, miles);
        self.adjacency[b.index()].insert(a, miles);
        Ok(())
    }

    // ── Lookup ────────────────────────────────────────────────────────────

    /// Find the node matching `name` and/or `address`.
    ///
    /// With both keys given they must agree on a single node; keys that
    /// resolve to two different nodes are a [`GraphError::Ambiguous`] error.
    pub fn get_node(&self, name: Option<&str>, address: Option<&str>) -> GraphResult<NodeId> {
        let by_name = name.and_then(|n| self.by_name.get(n).copied());
        let by_address = address.and_then(|a| self.by_address.get(a).copied());

        match (by_name, by_address) {
            (Some(a), Some(b)) if a != b => Err(GraphError::Ambiguous {
                name:    name.unwrap_or_default().to_string(),
                address: address.unwrap_or_default().to_string(),
            }),
            (Some(id), _) | (None, Some(id)) => Ok(id),
            (None, None) => Err(GraphError::NotFound(
                address.or(name).unwrap_or_default().to_string(),
            )),
        }
    }

    /// Node whose address is exactly `address`.
    #[inline]
    pub fn by_address(&self, address: &str) -> Option<NodeId> {
        self.by_address.get(address).copied()
    }

    pub fn location(&self, id: NodeId) -> Option<&Location> {
        self.nodes.get(id.index())
    }

    /// All nodes in id order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Location)> + '_ {
        self.nodes.iter().enumerate().map(|(i, l)| (NodeId(i as u32), l))
    }

    // ── Adjacency ─────────────────────────────────────────────────────────

    /// `{neighbor → miles}` for `node`; empty for isolated or unknown nodes.
    #[inline]
    pub fn adjacency_of(&self, node: NodeId) -> &BTreeMap<NodeId, f64> {
        self.adjacency.get(node.index()).unwrap_or(&NO_NEIGHBORS)
    }

    /// Direct edge weight between `a` and `b`, if an edge exists.
    pub fn weight(&self, a: NodeId, b: NodeId) -> Option<f64> {
        self.adjacency_of(a).get(&b).copied()
    }
}
