use common::{
    error::Error,
    types::{ComputationResult, Graph},
};

/// Trait for single-source shortest-path solvers with negative-cycle detection.
pub trait ShortestPathSolver {
    /// Computes distances from `source` to every vertex of `graph`.
    ///
    /// Returns `Ok(ComputationResult::Distances(_))` when no negative cycle is
    /// reachable from `source`, `Ok(ComputationResult::NegativeCycleDetected)`
    /// when one is, or `Err(e)` if `source` is invalid or the arithmetic
    /// overflows.
    fn solve(&self, graph: &Graph, source: usize) -> Result<ComputationResult, Error>;
}
