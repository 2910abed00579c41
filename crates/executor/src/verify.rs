use std::fs::File;
use std::io::Write;
use std::path::Path;

use tracing::{info, instrument};

use super::error::Error;
use super::report::read_csv_report;
use super::types::ExitStatus;
use bf_oracle_core::verify::{Discrepancy, Violation, certify, compare};
use bf_oracle_core::{GraphLoader, ShortestPathSolver};
use common::types::ComputationResult;

/// Everything found wrong with a candidate result.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct VerifyOutcome {
    pub discrepancies: Vec<Discrepancy>,
    /// Set when the candidate's own table is not a relaxation fixed point.
    pub violation: Option<Violation>,
}

impl VerifyOutcome {
    pub fn is_match(&self) -> bool {
        self.discrepancies.is_empty() && self.violation.is_none()
    }
}

/// Checks a candidate CSV report against the oracle's result for the same
/// graph and source.
#[instrument(skip(loader, solver, graph_path, candidate_path), fields(graph = %graph_path.display(), candidate = %candidate_path.display()))]
pub fn verify_candidate<S: ShortestPathSolver>(
    loader: &GraphLoader,
    solver: &S,
    graph_path: &Path,
    candidate_path: &Path,
    source: usize,
) -> Result<VerifyOutcome, Error> {
    let graph = loader
        .load_path(graph_path)
        .map_err(|source| Error::GraphLoadError {
            path: graph_path.to_path_buf(),
            source,
        })?;
    let expected = solver.solve(&graph, source)?;

    let candidate = read_csv_report(File::open(candidate_path)?, source)?;

    let discrepancies = compare(&expected, &candidate);
    let violation = match &candidate {
        ComputationResult::Distances(table) => certify(&graph, table).err(),
        ComputationResult::NegativeCycleDetected => None,
    };

    let outcome = VerifyOutcome {
        discrepancies,
        violation,
    };
    info!(matches = outcome.is_match(), "Verification finished");
    Ok(outcome)
}

/// Writes a human-readable verdict and returns the matching exit status.
pub fn render_verdict<W: Write>(outcome: &VerifyOutcome, out: &mut W) -> Result<ExitStatus, Error> {
    if outcome.is_match() {
        writeln!(out, "OK: candidate matches the oracle")?;
        return Ok(ExitStatus::Success);
    }

    for discrepancy in &outcome.discrepancies {
        writeln!(out, "MISMATCH: {}", discrepancy)?;
    }
    if let Some(violation) = &outcome.violation {
        writeln!(out, "INVALID: {}", violation)?;
    }
    Ok(ExitStatus::Mismatch)
}
