use std::path::PathBuf;

use thiserror::Error;

use common::error::Error as OracleError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    ConfigLoadError(String),

    #[error("Failed to load graph `{}`: {source}", path.display())]
    GraphLoadError {
        path: PathBuf,
        #[source]
        source: OracleError,
    },

    #[error("Graph processing error: {0}")]
    GraphError(#[from] OracleError),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Invalid report: {0}")]
    InvalidReport(String),

    #[error("Channel sender failed: Receiver has been dropped.")]
    ChannelSendFailed,

    #[error("Job task failed: {0}")]
    TaskFailed(String),

    #[error("Logging setup failed: {0}")]
    LoggingError(String),
}
