use std::io::Write;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::info;

use super::error::Error;
use super::producer::Producer;
use super::runner::JobRunner;
use super::types::{Job, JobOutcome, JobStreamer, ReportFormat, RunSummary};
use super::writer::Writer;
use bf_oracle_core::{GraphLoader, ShortestPathSolver};

/// Settings shared by every job of one run.
#[derive(Debug, Clone)]
pub struct PipelineSettings<S> {
    pub solver: S,
    pub loader: GraphLoader,
    pub format: ReportFormat,
    pub annotate: bool,
    pub max_parallel_jobs: usize,
    pub channel_capacity: usize,
}

/// Runs producer, runner and writer tasks until every job is reported.
///
/// A producer failure (for example an unreadable manifest) is returned
/// after the jobs it did queue have been written.
pub async fn run_jobs<T, S, W>(streamer: T, settings: PipelineSettings<S>, out: W) -> Result<(RunSummary, W), Error>
where
    T: JobStreamer,
    S: ShortestPathSolver + Clone + Send + Sync + 'static,
    W: Write + Send + 'static,
{
    let (job_sender, job_receiver) = mpsc::channel::<Job>(settings.channel_capacity);
    let (outcome_sender, outcome_receiver) = mpsc::channel::<JobOutcome>(settings.channel_capacity);

    let producer_handle = Producer::new(streamer).spawn(job_sender);
    let runner_handle = spawn_runner(&settings, job_receiver, outcome_sender);
    let writer_handle =
        Writer::new(out, settings.format, settings.annotate, outcome_receiver).spawn_task();

    let (produced, ran, written) = tokio::join!(producer_handle, runner_handle, writer_handle);

    let (summary, out) = flatten(written)?;
    flatten(ran)?;
    flatten(produced)?;

    info!(
        completed = summary.completed,
        negative_cycles = summary.negative_cycles,
        failed = summary.failed,
        "Pipeline shut down."
    );
    Ok((summary, out))
}

fn spawn_runner<S>(
    settings: &PipelineSettings<S>,
    jobs: mpsc::Receiver<Job>,
    outcomes: mpsc::Sender<JobOutcome>,
) -> JoinHandle<Result<(), Error>>
where
    S: ShortestPathSolver + Clone + Send + Sync + 'static,
{
    let runner = JobRunner::new(
        settings.solver.clone(),
        settings.loader,
        settings.max_parallel_jobs,
    );
    tokio::spawn(runner.run(jobs, outcomes))
}

fn flatten<T>(joined: Result<Result<T, Error>, tokio::task::JoinError>) -> Result<T, Error> {
    joined.map_err(|e| Error::TaskFailed(e.to_string()))?
}
