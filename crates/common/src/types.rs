use std::fmt;
use std::str::FromStr;

use crate::error::{Error, ParseDistanceError};

/// Type alias for a single directed arc: (from, to, weight)
pub type Edge = (usize, usize, i64);

/// Marker written in place of a distance for vertices the source cannot reach.
pub const UNREACHABLE_MARKER: &str = "INF";

/// Weighted graph stored as a flat arc list.
///
/// Vertex IDs run from `0` to `vertex_count - 1`. Arcs are kept in the order
/// they were supplied; the shortest-path engine relaxes them in exactly this
/// order, which is what makes its output reproducible across runs.
///
/// Every arc endpoint is checked against `vertex_count` on construction, so
/// a `Graph` value never references a vertex that does not exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph {
    vertex_count: usize,
    edges: Vec<Edge>,
}

impl Graph {
    /// Builds a graph from an already-directed arc list.
    ///
    /// # Errors
    /// Returns `Error::VertexOutOfRange` for the first arc whose `from` or
    /// `to` is not below `vertex_count`.
    pub fn from_edges(vertex_count: usize, edges: Vec<Edge>) -> Result<Self, Error> {
        if let Some(vertex) = edges
            .iter()
            .flat_map(|&(u, v, _)| [u, v])
            .find(|&x| x >= vertex_count)
        {
            return Err(Error::VertexOutOfRange {
                vertex: i64::try_from(vertex).unwrap_or(i64::MAX),
                vertex_count,
                line: None,
            });
        }

        Ok(Self {
            vertex_count,
            edges,
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

/// Tentative or final distance of a vertex from the source.
///
/// Variant order matters: the derived `Ord` places every `Finite` value
/// below `Unreachable`, so `Unreachable` behaves as an unbounded distance in
/// comparisons without needing a numeric sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Distance {
    Finite(i64),
    Unreachable,
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Distance::Finite(d) => write!(f, "{}", d),
            Distance::Unreachable => f.write_str(UNREACHABLE_MARKER),
        }
    }
}

impl FromStr for Distance {
    type Err = ParseDistanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case(UNREACHABLE_MARKER) {
            return Ok(Distance::Unreachable);
        }
        trimmed
            .parse::<i64>()
            .map(Distance::Finite)
            .map_err(|_| ParseDistanceError(trimmed.to_string()))
    }
}

/// Per-vertex distances from a single source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceTable {
    source: usize,
    distances: Vec<Distance>,
}

impl DistanceTable {
    pub fn new(source: usize, distances: Vec<Distance>) -> Self {
        Self { source, distances }
    }

    pub fn source(&self) -> usize {
        self.source
    }

    /// Distance of `vertex`, or `None` if the table has no such entry.
    pub fn get(&self, vertex: usize) -> Option<Distance> {
        self.distances.get(vertex).copied()
    }

    pub fn len(&self) -> usize {
        self.distances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }

    pub fn as_slice(&self) -> &[Distance] {
        &self.distances
    }

    /// Iterates `(vertex, distance)` pairs in vertex order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, Distance)> + '_ {
        self.distances.iter().copied().enumerate()
    }
}

/// Outcome of a single shortest-path computation.
///
/// A detected negative cycle carries no table: distances are undefined for
/// every vertex reachable through the cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComputationResult {
    Distances(DistanceTable),
    NegativeCycleDetected,
}

impl ComputationResult {
    pub fn distances(&self) -> Option<&DistanceTable> {
        match self {
            ComputationResult::Distances(table) => Some(table),
            ComputationResult::NegativeCycleDetected => None,
        }
    }

    pub fn has_negative_cycle(&self) -> bool {
        matches!(self, ComputationResult::NegativeCycleDetected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreachable_orders_above_every_finite_distance() {
        assert!(Distance::Finite(i64::MAX) < Distance::Unreachable);
        assert!(Distance::Finite(-3) < Distance::Finite(2));
        assert_eq!(
            Distance::Finite(7).min(Distance::Unreachable),
            Distance::Finite(7)
        );
    }

    #[test]
    fn distance_display_and_parse() {
        assert_eq!(Distance::Finite(-5).to_string(), "-5");
        assert_eq!(Distance::Unreachable.to_string(), "INF");

        assert_eq!("12".parse::<Distance>(), Ok(Distance::Finite(12)));
        assert_eq!(" inf ".parse::<Distance>(), Ok(Distance::Unreachable));
        assert_eq!(
            "1.5".parse::<Distance>(),
            Err(ParseDistanceError("1.5".to_string()))
        );
    }

    #[test]
    fn graph_rejects_arc_outside_vertex_range() {
        let result = Graph::from_edges(3, vec![(0, 1, 2), (1, 3, 1)]);

        match result {
            Err(Error::VertexOutOfRange {
                vertex,
                vertex_count,
                line,
            }) => {
                assert_eq!(vertex, 3);
                assert_eq!(vertex_count, 3);
                assert_eq!(line, None);
            }
            other => panic!("Expected VertexOutOfRange, got: {:?}", other),
        }
    }

    #[test]
    fn graph_keeps_arc_order() {
        let edges = vec![(2, 0, 1), (0, 1, -4), (1, 2, 3)];
        let graph = Graph::from_edges(3, edges.clone()).unwrap();

        assert_eq!(graph.vertex_count(), 3);
        assert_eq!(graph.edges(), edges.as_slice());
    }

    #[test]
    fn empty_graph_is_valid() {
        let graph = Graph::from_edges(0, Vec::new()).unwrap();
        assert_eq!(graph.vertex_count(), 0);
        assert_eq!(graph.edge_count(), 0);
    }
}
