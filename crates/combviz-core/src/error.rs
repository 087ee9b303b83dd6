//! Core error types for combviz-core.
//!
//! Graph and command operations never fail: missing identifiers degrade to
//! `None`, `false` or a no-op. Errors only come from the snapshot boundary.

use thiserror::Error;

/// Errors produced by the combviz-core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// JSON serialization or deserialization of a graph snapshot failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
