//! Harness error type.

use errbench_common::config::ConfigError;
use errbench_strategies::UnknownStrategy;
use thiserror::Error;

/// Everything that can stop a benchmark sweep.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid thread specification '{spec}': {reason}")]
    ThreadSpec { spec: String, reason: String },

    #[error(transparent)]
    UnknownStrategy(#[from] UnknownStrategy),

    #[error("failed to pin worker {worker} to CPU {cpu}: {source}")]
    Affinity {
        worker: usize,
        cpu: usize,
        #[source]
        source: nix::Error,
    },

    #[error("worker {0} panicked")]
    WorkerPanicked(usize),

    #[error("output error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
