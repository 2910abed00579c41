use std::collections::BTreeMap;
use std::io::Write;

use tokio::sync::mpsc::Receiver;
use tracing::{debug, error};

use super::error::Error;
use super::report;
use super::types::{JobOutcome, ReportFormat, RunSummary};

/// Async consumer that renders job outcomes in job order.
///
/// Outcomes may arrive in any order; each is held until every job with a
/// smaller id has been written, so the output of a run does not depend on
/// which job finished first.
pub struct Writer<W: Write> {
    out: W,
    format: ReportFormat,
    annotate: bool,
    receiver: Receiver<JobOutcome>,
    pending: BTreeMap<usize, JobOutcome>,
    next_id: usize,
    summary: RunSummary,
}

impl<W> Writer<W>
where
    W: Write + Send + 'static,
{
    /// With `annotate`, every report is preceded by a
    /// `# graph=<path> source=<n>` line so multi-job output can be split.
    pub fn new(out: W, format: ReportFormat, annotate: bool, receiver: Receiver<JobOutcome>) -> Self {
        Self {
            out,
            format,
            annotate,
            receiver,
            pending: BTreeMap::new(),
            next_id: 0,
            summary: RunSummary::default(),
        }
    }

    /// Run the writer until the outcome channel closes.
    ///
    /// Returns the tally of outcomes together with the output sink.
    pub async fn process_outcomes(mut self) -> Result<(RunSummary, W), Error> {
        debug!("Writer ready.");

        while let Some(outcome) = self.receiver.recv().await {
            self.pending.insert(outcome.job.id, outcome);

            while let Some(ready) = self.pending.remove(&self.next_id) {
                self.emit(ready)?;
                self.next_id += 1;
            }
        }

        // Only reachable with gaps in the id sequence; keep what is left in order.
        for (_, outcome) in std::mem::take(&mut self.pending) {
            self.emit(outcome)?;
        }

        self.out.flush()?;
        Ok((self.summary, self.out))
    }

    pub fn spawn_task(self) -> tokio::task::JoinHandle<Result<(RunSummary, W), Error>> {
        tokio::spawn(self.process_outcomes())
    }

    fn emit(&mut self, outcome: JobOutcome) -> Result<(), Error> {
        let JobOutcome { job, result } = outcome;

        match result {
            Ok(result) => {
                if self.annotate {
                    writeln!(self.out, "# graph={} source={}", job.graph.display(), job.source)?;
                }
                report::render(self.format, &result, &mut self.out)?;

                self.summary.completed += 1;
                if result.has_negative_cycle() {
                    self.summary.negative_cycles += 1;
                }
            }
            Err(e) => {
                error!(
                    graph = %job.graph.display(),
                    source = job.source,
                    error = %e,
                    "Job failed"
                );
                if self.annotate {
                    writeln!(
                        self.out,
                        "# graph={} source={} failed: {}",
                        job.graph.display(),
                        job.source,
                        e
                    )?;
                }
                self.summary.failed += 1;
            }
        }
        Ok(())
    }
}
