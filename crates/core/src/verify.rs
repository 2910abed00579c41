//! Checks for shortest-path results produced outside this crate.
//!
//! [`certify`] validates a distance table against the graph alone, and
//! [`compare`] diffs a candidate result against the Bellman-Ford result for
//! the same graph and source.

use std::fmt;

use common::numeric_kernel::{Relaxation, relax};
use common::types::{ComputationResult, Distance, DistanceTable, Graph};
use thiserror::Error;

/// Reason a distance table fails to certify.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("table has {found} entries but the graph has {expected} vertices")]
    LengthMismatch { expected: usize, found: usize },

    #[error("source vertex {source_vertex} has distance {found}, expected 0")]
    SourceNotZero { source_vertex: usize, found: Distance },

    /// Arc `from -> to` still shortens `to`, so the table is not optimal.
    #[error("arc {from} -> {to} (weight {weight}) still relaxes")]
    Relaxable { from: usize, to: usize, weight: i64 },
}

/// Checks that `table` is a fixed point of relaxation over `graph`.
///
/// Passing means: one entry per vertex, the source at distance 0, and no
/// arc `(u, v, w)` with finite `distance[u]` such that
/// `distance[u] + w < distance[v]`. Arcs are checked in stored order and
/// the first violation found is returned.
pub fn certify(graph: &Graph, table: &DistanceTable) -> Result<(), Violation> {
    let distance = table.as_slice();
    if distance.len() != graph.vertex_count() {
        return Err(Violation::LengthMismatch {
            expected: graph.vertex_count(),
            found: distance.len(),
        });
    }

    let source = table.source();
    match table.get(source) {
        Some(Distance::Finite(0)) => {}
        found => {
            return Err(Violation::SourceNotZero {
                source_vertex: source,
                found: found.unwrap_or(Distance::Unreachable),
            });
        }
    }

    for &(u, v, weight) in graph.edges() {
        // An i64 distance plus an i64 weight always fits the wide sum.
        let relaxable = matches!(
            relax(distance[u].into(), weight, distance[v].into()),
            Ok(Relaxation::Improves(_))
        );
        if relaxable {
            return Err(Violation::Relaxable {
                from: u,
                to: v,
                weight,
            });
        }
    }

    Ok(())
}

/// A single difference between an expected and a candidate result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discrepancy {
    /// One side detected a negative cycle, the other produced distances.
    Classification {
        expected_cycle: bool,
        candidate_cycle: bool,
    },
    VertexCount {
        expected: usize,
        candidate: usize,
    },
    Distance {
        vertex: usize,
        expected: Distance,
        candidate: Distance,
    },
}

impl fmt::Display for Discrepancy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Discrepancy::Classification {
                expected_cycle,
                candidate_cycle,
            } => write!(
                f,
                "negative cycle: expected {}, candidate {}",
                describe_cycle(*expected_cycle),
                describe_cycle(*candidate_cycle)
            ),
            Discrepancy::VertexCount {
                expected,
                candidate,
            } => write!(
                f,
                "vertex count: expected {}, candidate {}",
                expected, candidate
            ),
            Discrepancy::Distance {
                vertex,
                expected,
                candidate,
            } => write!(
                f,
                "vertex {}: expected {}, candidate {}",
                vertex, expected, candidate
            ),
        }
    }
}

fn describe_cycle(detected: bool) -> &'static str {
    if detected { "detected" } else { "absent" }
}

/// Lists every way `candidate` differs from `expected`.
///
/// An empty vector means the two results agree exactly, including the
/// cycle/no-cycle classification. Distance differences are reported in
/// vertex order over the vertices both tables share.
pub fn compare(expected: &ComputationResult, candidate: &ComputationResult) -> Vec<Discrepancy> {
    let (expected_table, candidate_table) = match (expected, candidate) {
        (ComputationResult::Distances(e), ComputationResult::Distances(c)) => (e, c),
        _ if expected.has_negative_cycle() == candidate.has_negative_cycle() => {
            return Vec::new();
        }
        _ => {
            return vec![Discrepancy::Classification {
                expected_cycle: expected.has_negative_cycle(),
                candidate_cycle: candidate.has_negative_cycle(),
            }];
        }
    };

    let mut discrepancies = Vec::new();

    if expected_table.len() != candidate_table.len() {
        discrepancies.push(Discrepancy::VertexCount {
            expected: expected_table.len(),
            candidate: candidate_table.len(),
        });
    }

    discrepancies.extend(
        expected_table
            .iter()
            .zip(candidate_table.iter())
            .filter(|((_, e), (_, c))| e != c)
            .map(|((vertex, e), (_, c))| Discrepancy::Distance {
                vertex,
                expected: e,
                candidate: c,
            }),
    );

    discrepancies
}
