use super::traits::ShortestPathSolver;
use common::{
    error::Error,
    numeric_kernel::{Relaxation, WideDistance, relax},
    types::{ComputationResult, Distance, DistanceTable, Edge, Graph},
};
use tracing::{debug, instrument};

/// Solver implementing the Bellman-Ford algorithm for single-source shortest
/// paths and negative cycle detection.
///
/// Runs `V - 1` relaxation passes over the graph's arcs in stored order,
/// then one detection pass. The result depends only on the graph, its arc
/// order and the source, so it can serve as ground truth for other
/// shortest-path implementations.
#[derive(Debug, Clone, Copy, Default)]
pub struct BellmanFordSolver {
    /// Stop relaxing after the first pass that changes nothing. The
    /// detection pass still runs, and results are identical either way.
    pub early_exit: bool,
}

/// Tentative distances plus, per vertex, the tail of the arc that last
/// improved it.
struct Workspace {
    distance: Vec<WideDistance>,
    via: Vec<usize>,
}

impl Workspace {
    fn new(vertex_count: usize, source: usize) -> Self {
        let mut distance = vec![WideDistance::Unreachable; vertex_count];
        distance[source] = WideDistance::Finite(0);
        Workspace {
            distance,
            via: (0..vertex_count).collect(),
        }
    }

    /// Narrows every distance back to `i64`.
    ///
    /// # Errors
    /// `DistanceOverflow` names the arc that produced the first distance
    /// outside the `i64` range.
    fn into_table(self, source: usize) -> Result<DistanceTable, Error> {
        let Workspace { distance, via } = self;
        let distances = distance
            .into_iter()
            .enumerate()
            .map(|(v, wide)| {
                Distance::try_from(wide).map_err(|_| Error::DistanceOverflow {
                    from: via[v],
                    to: v,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(DistanceTable::new(source, distances))
    }
}

impl BellmanFordSolver {
    pub fn new(early_exit: bool) -> Self {
        BellmanFordSolver { early_exit }
    }

    /// One sweep over `edges` in order, updating `work` in place.
    ///
    /// Returns whether any distance changed.
    fn relaxation_pass(&self, edges: &[Edge], work: &mut Workspace) -> Result<bool, Error> {
        let mut changed = false;

        for &(u, v, weight) in edges {
            let outcome = relax(work.distance[u], weight, work.distance[v])
                .map_err(|_| Error::DistanceOverflow { from: u, to: v })?;

            if let Relaxation::Improves(candidate) = outcome {
                work.distance[v] = WideDistance::Finite(candidate);
                work.via[v] = u;
                changed = true;
            }
        }

        Ok(changed)
    }

    /// Reports whether any arc could still shorten its head's distance.
    fn has_relaxable_arc(&self, edges: &[Edge], distance: &[WideDistance]) -> Result<bool, Error> {
        for &(u, v, weight) in edges {
            let outcome = relax(distance[u], weight, distance[v])
                .map_err(|_| Error::DistanceOverflow { from: u, to: v })?;

            if let Relaxation::Improves(_) = outcome {
                debug!(from = u, to = v, weight, "Arc still relaxes after V - 1 passes");
                return Ok(true);
            }
        }

        Ok(false)
    }
}

impl ShortestPathSolver for BellmanFordSolver {
    /// Computes shortest distances from `source`, or detects a reachable
    /// negative cycle.
    ///
    /// Tentative distances are kept in `i128`, so a negative cycle is
    /// classified even when the distances around it fall far below `i64::MIN`.
    ///
    /// # Returns
    /// - `Ok(Distances(table))` → no negative cycle reachable from `source`.
    /// - `Ok(NegativeCycleDetected)` → some arc still relaxes after `V - 1` passes.
    /// - `Err(InvalidSource)` → `source` is not a vertex of `graph`.
    /// - `Err(DistanceOverflow)` → a final shortest distance does not fit in `i64`.
    #[instrument(
        skip(self, graph),
        fields(vertices = graph.vertex_count(), arcs = graph.edge_count())
    )]
    fn solve(&self, graph: &Graph, source: usize) -> Result<ComputationResult, Error> {
        let vertex_count = graph.vertex_count();
        if source >= vertex_count {
            return Err(Error::InvalidSource {
                vertex: source,
                vertex_count,
            });
        }

        let edges = graph.edges();
        let mut work = Workspace::new(vertex_count, source);

        let max_passes = vertex_count - 1;
        let mut passes = 0;
        while passes < max_passes {
            let changed = self.relaxation_pass(edges, &mut work)?;
            passes += 1;

            if self.early_exit && !changed {
                break;
            }
        }
        debug!(passes, max_passes, "Relaxation finished");

        if self.has_relaxable_arc(edges, &work.distance)? {
            debug!("Negative cycle reachable from source");
            return Ok(ComputationResult::NegativeCycleDetected);
        }

        Ok(ComputationResult::Distances(work.into_table(source)?))
    }
}

#[cfg(test)]
mod bellman_ford_tests {
    use super::*;
    use crate::loader::{EdgeMode, GraphLoader};
    use rstest::rstest;
    use std::io::Cursor;

    fn build_graph(num_nodes: usize, edges: Vec<Edge>) -> Graph {
        Graph::from_edges(num_nodes, edges).unwrap()
    }

    fn load(text: &str, mode: EdgeMode) -> Graph {
        GraphLoader::new(mode).load_reader(Cursor::new(text)).unwrap()
    }

    fn finite(values: &[i64]) -> Vec<Distance> {
        values.iter().copied().map(Distance::Finite).collect()
    }

    #[rstest]
    #[case(false)]
    #[case(true)]
    fn directed_chain_with_negative_arc(#[case] early_exit: bool) {
        let graph = load("3 2\n0 1 5\n1 2 -2\n", EdgeMode::Directed);
        let solver = BellmanFordSolver::new(early_exit);

        let result = solver.solve(&graph, 0).unwrap();
        let table = result.distances().expect("no cycle in a directed chain");

        assert_eq!(table.source(), 0);
        assert_eq!(table.as_slice(), finite(&[0, 5, 3]).as_slice());
    }

    /// The undirected `1 - 2` line becomes arcs 1->2 and 2->1 of weight -2,
    /// a negative 2-cycle reachable from vertex 0.
    #[test]
    fn undirected_negative_line_downstream_is_a_cycle() {
        let graph = load("3 2\n0 1 5\n1 2 -2\n", EdgeMode::Undirected);

        let result = BellmanFordSolver::default().solve(&graph, 0).unwrap();
        assert_eq!(result, ComputationResult::NegativeCycleDetected);
    }

    #[test]
    fn single_undirected_negative_edge_is_a_cycle() {
        let graph = load("2 1\n0 1 -5\n", EdgeMode::Undirected);

        let result = BellmanFordSolver::default().solve(&graph, 0).unwrap();
        assert!(result.has_negative_cycle());
    }

    #[test]
    fn single_directed_negative_edge_is_not_a_cycle() {
        let graph = load("2 1\n0 1 -5\n", EdgeMode::Directed);

        let result = BellmanFordSolver::default().solve(&graph, 0).unwrap();
        let table = result.distances().expect("one arc cannot form a cycle");
        assert_eq!(table.as_slice(), finite(&[0, -5]).as_slice());
    }

    #[test]
    fn edgeless_graph_reaches_only_source() {
        let graph = load("4 0\n", EdgeMode::Undirected);

        let result = BellmanFordSolver::default().solve(&graph, 0).unwrap();
        let table = result.distances().unwrap();

        assert_eq!(table.get(0), Some(Distance::Finite(0)));
        for v in 1..4 {
            assert_eq!(table.get(v), Some(Distance::Unreachable));
        }
    }

    #[test]
    fn source_equal_to_vertex_count_is_invalid() {
        let graph = build_graph(3, vec![(0, 1, 1)]);

        match BellmanFordSolver::default().solve(&graph, 3) {
            Err(Error::InvalidSource {
                vertex,
                vertex_count,
            }) => {
                assert_eq!(vertex, 3);
                assert_eq!(vertex_count, 3);
            }
            other => panic!("Expected InvalidSource, got: {:?}", other),
        }
    }

    #[test]
    fn zero_vertex_graph_rejects_every_source() {
        let graph = build_graph(0, vec![]);

        let result = BellmanFordSolver::default().solve(&graph, 0);
        assert!(matches!(result, Err(Error::InvalidSource { .. })));
    }

    #[test]
    fn single_vertex_graph() {
        let graph = build_graph(1, vec![]);

        let result = BellmanFordSolver::default().solve(&graph, 0).unwrap();
        assert_eq!(result.distances().unwrap().as_slice(), finite(&[0]).as_slice());
    }

    #[test]
    fn isolated_vertex_stays_unreachable() {
        let graph = load("4 2\n0 1 3\n1 2 4\n", EdgeMode::Undirected);

        let result = BellmanFordSolver::default().solve(&graph, 1).unwrap();
        let table = result.distances().unwrap();

        assert_eq!(
            table.as_slice(),
            &[
                Distance::Finite(3),
                Distance::Finite(0),
                Distance::Finite(4),
                Distance::Unreachable
            ]
        );
    }

    #[test]
    fn shorter_detour_wins_over_direct_arc() {
        let graph = load("4 4\n0 1 1\n1 2 1\n2 3 1\n0 3 10\n", EdgeMode::Undirected);

        let result = BellmanFordSolver::default().solve(&graph, 0).unwrap();
        assert_eq!(
            result.distances().unwrap().as_slice(),
            finite(&[0, 1, 2, 3]).as_slice()
        );
    }

    /// Arcs listed against the direction of propagation need every one of the
    /// V - 1 passes to settle.
    #[test]
    fn reversed_chain_needs_all_passes() {
        let n = 50;
        let edges: Vec<Edge> = (0..n - 1).rev().map(|i| (i, i + 1, 2)).collect();
        let graph = build_graph(n, edges);

        for early_exit in [false, true] {
            let result = BellmanFordSolver::new(early_exit).solve(&graph, 0).unwrap();
            let table = result.distances().unwrap();
            assert_eq!(table.get(n - 1), Some(Distance::Finite(2 * (n as i64 - 1))));
        }
    }

    #[test]
    fn directed_negative_cycle_is_detected() {
        let graph = build_graph(3, vec![(0, 1, 1), (1, 2, -3), (2, 1, 1)]);

        let result = BellmanFordSolver::default().solve(&graph, 0).unwrap();
        assert!(result.has_negative_cycle());
    }

    #[test]
    fn unreachable_negative_cycle_is_ignored() {
        // Cycle 2 -> 3 -> 2 has weight -1 but nothing reaches it from 0.
        let graph = build_graph(4, vec![(0, 1, 4), (2, 3, 1), (3, 2, -2)]);

        let result = BellmanFordSolver::default().solve(&graph, 0).unwrap();
        let table = result.distances().expect("cycle is not reachable from 0");

        assert_eq!(
            table.as_slice(),
            &[
                Distance::Finite(0),
                Distance::Finite(4),
                Distance::Unreachable,
                Distance::Unreachable
            ]
        );
    }

    #[test]
    fn zero_weight_cycle_is_not_negative() {
        let graph = load("3 3\n0 1 0\n1 2 0\n2 0 0\n", EdgeMode::Undirected);

        let result = BellmanFordSolver::default().solve(&graph, 2).unwrap();
        assert_eq!(
            result.distances().unwrap().as_slice(),
            finite(&[0, 0, 0]).as_slice()
        );
    }

    /// Distances around these cycles drop below `i64::MIN` before the
    /// detection pass runs; classification must not depend on that.
    #[rstest]
    #[case::undirected_huge_negative_line("2 1\n0 1 -5000000000000000000\n", EdgeMode::Undirected)]
    #[case::directed_cycle_through_zero_arc(
        "3 3\n0 1 -4611686018427387904\n1 0 0\n1 2 1\n",
        EdgeMode::Directed
    )]
    #[case::min_weight_two_cycle("2 2\n0 1 -9223372036854775808\n1 0 0\n", EdgeMode::Directed)]
    #[case::cycle_behind_max_weight_arc(
        "4 3\n0 1 9223372036854775807\n1 2 -9223372036854775808\n2 1 0\n",
        EdgeMode::Directed
    )]
    fn extreme_weight_cycles_are_detected(#[case] text: &str, #[case] mode: EdgeMode) {
        let graph = load(text, mode);

        for early_exit in [false, true] {
            let result = BellmanFordSolver::new(early_exit).solve(&graph, 0).unwrap();
            assert_eq!(result, ComputationResult::NegativeCycleDetected);
        }
    }

    #[rstest]
    #[case::single_min_arc("2 1\n0 1 -9223372036854775808\n", &[0, i64::MIN])]
    #[case::max_then_min(
        "3 2\n0 1 9223372036854775807\n1 2 -9223372036854775808\n",
        &[0, i64::MAX, -1]
    )]
    #[case::min_then_max(
        "3 2\n0 1 -9223372036854775808\n1 2 9223372036854775807\n",
        &[0, i64::MIN, -1]
    )]
    fn extreme_weights_without_cycle_keep_exact_distances(
        #[case] text: &str,
        #[case] expected: &[i64],
    ) {
        let graph = load(text, EdgeMode::Directed);

        let result = BellmanFordSolver::default().solve(&graph, 0).unwrap();
        assert_eq!(result.distances().unwrap().as_slice(), finite(expected).as_slice());
    }

    #[test]
    fn overflowing_sum_is_an_error() {
        let graph = build_graph(3, vec![(0, 1, i64::MAX), (1, 2, 1)]);

        match BellmanFordSolver::default().solve(&graph, 0) {
            Err(Error::DistanceOverflow { from, to }) => {
                assert_eq!((from, to), (1, 2));
            }
            other => panic!("Expected DistanceOverflow, got: {:?}", other),
        }
    }

    #[test]
    fn repeated_runs_are_identical() {
        let graph = load(
            "6 7\n0 1 4\n0 2 1\n2 1 2\n1 3 1\n2 3 5\n3 4 3\n4 5 0\n",
            EdgeMode::Undirected,
        );
        let solver = BellmanFordSolver::default();

        let first = solver.solve(&graph, 0).unwrap();
        let second = solver.solve(&graph, 0).unwrap();
        let early = BellmanFordSolver::new(true).solve(&graph, 0).unwrap();

        assert_eq!(first, second);
        assert_eq!(first, early);
        assert_eq!(
            first.distances().unwrap().as_slice(),
            finite(&[0, 3, 1, 4, 7, 7]).as_slice()
        );
    }
}
