use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use std::fs::File;
use std::path::PathBuf;
use tokio::sync::mpsc::Sender;
use tracing::{error, info};

use super::error::Error;
use super::types::{Job, JobStreamer};

// Helper struct for manifest parsing
#[derive(Debug, Deserialize)]
pub struct ManifestRecord {
    pub graph: PathBuf,

    /// Empty cells fall back to the streamer's default source.
    pub source: Option<usize>,
}

/// Streams jobs listed in a CSV manifest with columns `graph,source`.
///
/// Relative graph paths are resolved against the current directory, not
/// the manifest's location.
pub struct ManifestStreamer {
    path: PathBuf,
    default_source: usize,
}

impl ManifestStreamer {
    pub fn new(path: PathBuf, default_source: usize) -> Self {
        ManifestStreamer {
            path,
            default_source,
        }
    }

    fn parse_manifest(&self) -> Result<Vec<Job>, Error> {
        let file = File::open(&self.path).map_err(|e| {
            error!(path = %self.path.display(), error = %e, "Failed to read manifest");
            Error::IoError(e)
        })?;

        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .from_reader(file);

        let mut jobs = Vec::new();

        for (id, result) in rdr.deserialize().enumerate() {
            let record: ManifestRecord = result?;
            jobs.push(Job {
                id,
                graph: record.graph,
                source: record.source.unwrap_or(self.default_source),
            });
        }
        Ok(jobs)
    }
}

#[async_trait::async_trait]
impl JobStreamer for ManifestStreamer {
    async fn run_stream(self, sender: Sender<Job>) -> Result<(), Error> {
        let jobs = self.parse_manifest()?;
        let total_jobs = jobs.len();

        info!(
            manifest = %self.path.display(),
            jobs = total_jobs,
            "ManifestStreamer: queueing jobs"
        );

        for job in jobs {
            if sender.send(job).await.is_err() {
                error!("ManifestStreamer shutting down: runner receiver dropped during send");
                return Err(Error::ChannelSendFailed);
            }
        }
        Ok(())
    }
}
