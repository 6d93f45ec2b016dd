#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! High-level operations orchestration for upkeep
//!
//! This crate is the action dispatcher between the CLI and the platform
//! primitives: it decides what each convergence pass does, while the
//! platform crate decides how effects touch the host.

mod context;
mod disable;
mod enable;
mod status;
mod types;

pub use context::{OpsContextBuilder, OpsCtx};
pub use types::{
    CommandReport, ConvergeReport, DisableReport, FileOutcome, FileReport, FileStatus,
    FileSyncState, StatusReport,
};

// Re-export operation functions
pub use disable::disable;
pub use enable::{enable, enable_with_state};
pub use status::status;

use upkeep_errors::Error;

/// Operation result that can be serialized for CLI output
#[derive(Clone, Debug, serde::Serialize)]
#[serde(tag = "type", content = "data")]
pub enum OperationResult {
    /// Enable convergence report
    Converge(ConvergeReport),
    /// Disable report
    Disable(DisableReport),
    /// Status report
    Status(StatusReport),
    /// Generic success message
    Success(String),
}

impl OperationResult {
    /// Convert to JSON string
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, Error> {
        serde_json::to_string_pretty(self).map_err(|e| {
            upkeep_errors::OpsError::SerializationError {
                message: e.to_string(),
            }
            .into()
        })
    }
}
