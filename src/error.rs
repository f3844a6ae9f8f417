//! Error types for chain execution.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a single step failed.
///
/// Step failures are never propagated out of the executor; they are recorded
/// on the failing step's outcome slot and the run halts. The display form is
/// the message an editor shows next to the step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
#[serde(rename_all = "snake_case")]
pub enum StepError {
    /// The connection could not be established or was interrupted.
    #[error("request failed: {0}")]
    Network(String),

    /// A response arrived with a non-success status code.
    #[error("HTTP error! status: {status}")]
    Http { status: u16 },

    /// The response body was not valid JSON.
    #[error("invalid JSON response: {0}")]
    Decode(String),
}

impl StepError {
    /// Numeric status code for HTTP failures, `None` otherwise.
    pub fn status(&self) -> Option<u16> {
        match self {
            StepError::Http { status } => Some(*status),
            _ => None,
        }
    }
}

/// Errors returned by the run API itself.
///
/// Step-level failures never surface here; they end up in the failing step's
/// [`StepError`]. This type only covers misuse of the engine boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    /// `run` was triggered while the executor is already mid-run.
    #[error("a chain run is already in progress")]
    Busy,
}
