use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::EventLevel;

/// Events emitted during a convergence pass over the managed files.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ConvergeEvent {
    /// The platform predicate said this is not a Debian-family host;
    /// the whole action is skipped without touching anything.
    PlatformSkipped { action: String },

    /// A target file does not exist on disk; the engine manages existing
    /// files only and leaves the fragment unapplied.
    FileSkipped { file: String, path: PathBuf },

    /// A target file was converged; `changed` is false when the content
    /// already matched and nothing was written.
    FileConverged {
        file: String,
        path: PathBuf,
        changed: bool,
    },

    /// A host command finished (used by the disable path).
    CommandExecuted {
        command: String,
        exit_code: Option<i32>,
    },

    /// A managed file's content differs from the rendered desired content.
    DriftDetected { file: String, path: PathBuf },
}

impl ConvergeEvent {
    pub(crate) fn default_level(&self) -> EventLevel {
        match self {
            Self::PlatformSkipped { .. } | Self::DriftDetected { .. } => EventLevel::Warn,
            Self::FileSkipped { .. } => EventLevel::Info,
            Self::FileConverged { .. } | Self::CommandExecuted { .. } => EventLevel::Info,
        }
    }
}
