use tokio::sync::mpsc::Sender;
use tracing::debug;

use super::{
    error::Error,
    types::{Job, JobStreamer},
};

pub struct Producer<S: JobStreamer> {
    streamer: S,
}

impl<S> Producer<S>
where
    S: JobStreamer,
{
    pub fn new(streamer: S) -> Self {
        Producer { streamer }
    }

    pub fn spawn(self, sender: Sender<Job>) -> tokio::task::JoinHandle<Result<(), Error>> {
        debug!("Producer ready.");
        tokio::spawn(async move { self.streamer.run_stream(sender).await })
    }
}
