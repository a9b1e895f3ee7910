//! Sparse directed edge table.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::Node;

/// Distance and travel time of one directed arc.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Distance driven, which drives both energy use and travel cost.
    pub distance: f64,
    /// Time spent driving.
    pub travel_time: f64,
}

impl Edge {
    /// Creates an edge.
    pub fn new(distance: f64, travel_time: f64) -> Self {
        Self {
            distance,
            travel_time,
        }
    }

    /// Returns `true` if both components are finite and non-negative.
    pub fn is_valid(&self) -> bool {
        self.distance.is_finite()
            && self.travel_time.is_finite()
            && self.distance >= 0.0
            && self.travel_time >= 0.0
    }
}

/// Directed `(from, to) -> Edge` table keyed by node ID.
///
/// Unlike a dense matrix, absent arcs are representable; looking one up
/// yields `None` rather than a default distance.
///
/// # Examples
///
/// ```
/// use u_evrp::distance::{Edge, EdgeTable};
///
/// let mut table = EdgeTable::new();
/// table.insert(0, 1, Edge::new(10.0, 12.0));
/// assert_eq!(table.get(0, 1).map(|e| e.travel_time), Some(12.0));
/// assert!(table.get(1, 0).is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EdgeTable {
    edges: HashMap<usize, HashMap<usize, Edge>>,
    len: usize,
}

impl EdgeTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a complete table from node coordinates, with travel time equal
    /// to Euclidean distance.
    pub fn from_nodes(nodes: &[Node]) -> Self {
        let mut table = Self::new();
        for a in nodes {
            for b in nodes {
                if a.id() != b.id() {
                    let d = a.distance_to(b);
                    table.insert(a.id(), b.id(), Edge::new(d, d));
                }
            }
        }
        table
    }

    /// Inserts or replaces the arc `from -> to`, returning the previous edge.
    pub fn insert(&mut self, from: usize, to: usize, edge: Edge) -> Option<Edge> {
        let previous = self.edges.entry(from).or_default().insert(to, edge);
        if previous.is_none() {
            self.len += 1;
        }
        previous
    }

    /// Returns the arc `from -> to`, if declared.
    pub fn get(&self, from: usize, to: usize) -> Option<&Edge> {
        self.edges.get(&from).and_then(|row| row.get(&to))
    }

    /// Iterates over all arcs as `(from, to, edge)` in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &Edge)> {
        self.edges
            .iter()
            .flat_map(|(&from, row)| row.iter().map(move |(&to, edge)| (from, to, edge)))
    }

    /// Number of declared arcs.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no arcs are declared.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
