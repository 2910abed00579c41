use std::path::PathBuf;

use clap::ValueEnum;
use serde::Deserialize;
use tokio::sync::mpsc::Sender;

use super::error::Error;
use common::types::ComputationResult;

/// A trait defining the contract for any source that streams jobs into the
/// processing pipeline.
///
/// Implementations decide where jobs come from (command-line arguments, a
/// CSV manifest) and must number them `0, 1, 2, ...` in the order they are
/// sent; the writer uses that numbering to emit reports in order.
#[async_trait::async_trait]
pub trait JobStreamer: Send + Sync + 'static {
    async fn run_stream(self, sender: Sender<Job>) -> Result<(), Error>;
}

/// One shortest-path computation: a graph file and a source vertex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub id: usize,
    pub graph: PathBuf,
    pub source: usize,
}

/// A finished job and what it produced.
#[derive(Debug)]
pub struct JobOutcome {
    pub job: Job,
    pub result: Result<ComputationResult, Error>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Text,
    Csv,
}

/// Tally of job outcomes for one pipeline run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub completed: usize,
    pub negative_cycles: usize,
    pub failed: usize,
}

impl RunSummary {
    /// Any failure outranks a detected cycle.
    pub fn exit_status(&self) -> ExitStatus {
        if self.failed > 0 {
            ExitStatus::InputError
        } else if self.negative_cycles > 0 {
            ExitStatus::NegativeCycle
        } else {
            ExitStatus::Success
        }
    }
}

/// Process exit status reported by the `bf-oracle` binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    InputError,
    NegativeCycle,
    Mismatch,
}

impl ExitStatus {
    pub fn code(self) -> u8 {
        match self {
            ExitStatus::Success => 0,
            ExitStatus::InputError => 1,
            ExitStatus::NegativeCycle => 2,
            ExitStatus::Mismatch => 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failures_outrank_cycles() {
        let summary = RunSummary {
            completed: 3,
            negative_cycles: 1,
            failed: 1,
        };
        assert_eq!(summary.exit_status(), ExitStatus::InputError);
        assert_eq!(summary.exit_status().code(), 1);
    }

    #[test]
    fn cycle_status_is_distinct_from_success() {
        let summary = RunSummary {
            completed: 2,
            negative_cycles: 1,
            failed: 0,
        };
        assert_eq!(summary.exit_status().code(), 2);
        assert_eq!(RunSummary::default().exit_status().code(), 0);
    }
}
