use std::path::PathBuf;

use thiserror::Error;

/// All errors produced by parafilt-core.
#[derive(Debug, Error)]
pub enum ParafiltError {
    #[error("cannot open audio file {path}: {source}")]
    FileOpen {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },

    #[error("frame count mismatch for {path}: expected {expected} samples, got {actual}")]
    FrameCountMismatch {
        path: PathBuf,
        expected: usize,
        actual: usize,
    },

    #[error("failed to decode samples from {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },

    #[error("failed to encode samples to {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },

    #[error("thread count must be at least 1")]
    ZeroThreadCount,

    #[error("invalid candidate thread counts: {0}")]
    InvalidCandidates(String),

    #[error("invalid coefficient range: {0}")]
    InvalidCoefficients(String),

    #[error("failed to spawn worker {index}: {source}")]
    ThreadSpawn {
        index: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("worker {index} panicked")]
    WorkerPanicked { index: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ParafiltError>;
