use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON at line {line}: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid configuration {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{collection}: column '{column}' has {actual} entries, expected {expected}")]
    LengthMismatch {
        collection: &'static str,
        column: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("could not build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl FrameError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FrameError::Io { path: path.into(), source }
    }
}

pub type Result<T> = std::result::Result<T, FrameError>;
