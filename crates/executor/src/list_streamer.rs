use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::mpsc::Sender;
use tracing::{debug, info};

use super::error::Error;
use super::types::{Job, JobStreamer};

/// Streams one job per `(graph, source)` pair given on the command line.
///
/// Jobs are emitted graph-major: every source for the first graph, then
/// every source for the second, and so on.
pub struct ListStreamer {
    graphs: Vec<PathBuf>,
    sources: Vec<usize>,
}

impl ListStreamer {
    pub fn new(graphs: Vec<PathBuf>, sources: Vec<usize>) -> Self {
        ListStreamer { graphs, sources }
    }

    fn jobs(&self) -> Vec<Job> {
        self.graphs
            .iter()
            .flat_map(|graph| self.sources.iter().map(move |&source| (graph, source)))
            .enumerate()
            .map(|(id, (graph, source))| Job {
                id,
                graph: graph.clone(),
                source,
            })
            .collect()
    }
}

#[async_trait]
impl JobStreamer for ListStreamer {
    async fn run_stream(self, sender: Sender<Job>) -> Result<(), Error> {
        let jobs = self.jobs();
        info!(jobs = jobs.len(), "ListStreamer: queueing jobs");

        for job in jobs {
            debug!(id = job.id, graph = %job.graph.display(), source = job.source, "Job queued");
            if sender.send(job).await.is_err() {
                return Err(Error::ChannelSendFailed);
            }
        }
        Ok(())
    }
}
