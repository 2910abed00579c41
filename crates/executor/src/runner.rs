use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Semaphore;
use tokio::sync::mpsc::{Receiver, Sender};
use tokio::task::{self, JoinError, JoinSet};
use tracing::{debug, info};

use super::error::Error;
use super::types::{Job, JobOutcome};
use bf_oracle_core::{GraphLoader, ShortestPathSolver};

/// Executes jobs as they arrive, at most `max_parallel_jobs` at a time.
///
/// Every job loads its own copy of the graph on a blocking thread and runs
/// the solver to completion there; jobs share nothing but the solver
/// settings. Outcomes are sent in completion order, not job order.
pub struct JobRunner<S> {
    solver: S,
    loader: GraphLoader,
    limit: Arc<Semaphore>,
}

impl<S> JobRunner<S>
where
    S: ShortestPathSolver + Clone + Send + Sync + 'static,
{
    pub fn new(solver: S, loader: GraphLoader, max_parallel_jobs: usize) -> Self {
        JobRunner {
            solver,
            loader,
            limit: Arc::new(Semaphore::new(max_parallel_jobs)),
        }
    }

    pub async fn run(self, mut jobs: Receiver<Job>, outcomes: Sender<JobOutcome>) -> Result<(), Error> {
        debug!("Runner ready.");

        let mut in_flight = InFlight::default();
        let mut dispatched = 0usize;

        while let Some(job) = jobs.recv().await {
            let permit = self
                .limit
                .clone()
                .acquire_owned()
                .await
                .map_err(|e| Error::TaskFailed(e.to_string()))?;

            let solver = self.solver.clone();
            let loader = self.loader;
            let outcomes = outcomes.clone();
            dispatched += 1;

            in_flight.spawn(async move {
                let outcome = task::spawn_blocking(move || {
                    let _permit = permit;
                    execute(&loader, &solver, job)
                })
                .await
                .map_err(|e| Error::TaskFailed(e.to_string()))?;

                outcomes
                    .send(outcome)
                    .await
                    .map_err(|_| Error::ChannelSendFailed)
            });
            in_flight.reap_finished()?;
        }

        in_flight.drain().await?;

        info!(jobs = dispatched, "Runner finished");
        Ok(())
    }
}

/// Spawned job tasks. Finished ones are reaped as new jobs arrive, so the
/// set only holds tasks that are still running or not yet collected.
#[derive(Default)]
struct InFlight {
    tasks: JoinSet<Result<(), Error>>,
}

impl InFlight {
    fn spawn<F>(&mut self, task: F)
    where
        F: Future<Output = Result<(), Error>> + Send + 'static,
    {
        self.tasks.spawn(task);
    }

    fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Collects every task that has already finished, without waiting.
    fn reap_finished(&mut self) -> Result<(), Error> {
        while let Some(joined) = self.tasks.try_join_next() {
            settle(joined)?;
        }
        Ok(())
    }

    /// Waits for the remaining tasks.
    async fn drain(&mut self) -> Result<(), Error> {
        while let Some(joined) = self.tasks.join_next().await {
            settle(joined)?;
        }
        Ok(())
    }
}

fn settle(joined: Result<Result<(), Error>, JoinError>) -> Result<(), Error> {
    joined.map_err(|e| Error::TaskFailed(e.to_string()))?
}

/// Loads the job's graph and solves it. Never panics on bad input: load
/// and solver errors are carried in the outcome.
pub fn execute<S: ShortestPathSolver>(loader: &GraphLoader, solver: &S, job: Job) -> JobOutcome {
    let started = Instant::now();

    let result = loader
        .load_path(&job.graph)
        .map_err(|source| Error::GraphLoadError {
            path: job.graph.clone(),
            source,
        })
        .and_then(|graph| solver.solve(&graph, job.source).map_err(Error::from));

    debug!(
        id = job.id,
        graph = %job.graph.display(),
        source = job.source,
        ok = result.is_ok(),
        elapsed_us = started.elapsed().as_micros() as u64,
        "Job finished"
    );

    JobOutcome { job, result }
}
