//! CLI error type and its exit-code mapping.

use std::path::PathBuf;

use thiserror::Error;

use combviz_algo::AlgoError;
use combviz_core::CoreError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid input: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Algo(#[from] AlgoError),
}

impl CliError {
    /// Process exit code: 3 for I/O failures, 1 for everything else.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Io { .. } => 3,
            CliError::Json(_) | CliError::Core(_) | CliError::Algo(_) => 1,
        }
    }
}
