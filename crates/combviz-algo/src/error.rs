//! Algorithm error types.

use thiserror::Error;

/// Errors produced by the algorithm entry points.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlgoError {
    /// Knapsack value and weight arrays must be parallel.
    #[error("length mismatch: {values} values but {weights} weights")]
    LengthMismatch { values: usize, weights: usize },
}
