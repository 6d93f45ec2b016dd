//! Types for operations and results

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use upkeep_types::TargetFile;

/// What happened to one target file during an `enable` pass
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FileOutcome {
    /// Content was ensured; `changed` is false when it already matched
    Converged { changed: bool },
    /// File absent on disk; the engine manages existing files only
    SkippedMissing,
}

/// Per-file record in a convergence report
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FileReport {
    pub file: TargetFile,
    pub path: PathBuf,
    #[serde(flatten)]
    pub outcome: FileOutcome,
}

/// Report of an `enable` convergence pass
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConvergeReport {
    /// True when the platform predicate short-circuited the whole pass
    pub platform_skipped: bool,
    pub files: Vec<FileReport>,
}

impl ConvergeReport {
    /// Number of files whose content actually changed
    #[must_use]
    pub fn changed_count(&self) -> usize {
        self.files
            .iter()
            .filter(|f| matches!(f.outcome, FileOutcome::Converged { changed: true }))
            .count()
    }

    /// Whether the pass left the host untouched
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.changed_count() == 0
    }
}

/// Per-file record of the `disable` pass
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CommandReport {
    pub file: TargetFile,
    pub path: PathBuf,
    /// Rendered command line; None when the file was absent and skipped
    pub command: Option<String>,
    pub exit_code: Option<i32>,
}

/// Report of a `disable` pass
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DisableReport {
    pub commands: Vec<CommandReport>,
}

impl DisableReport {
    /// Number of files actually commented out
    #[must_use]
    pub fn executed_count(&self) -> usize {
        self.commands.iter().filter(|c| c.command.is_some()).count()
    }
}

/// Sync state of one managed file, as seen by `status`
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FileSyncState {
    /// File absent; enable would skip it
    Missing,
    /// Content matches the rendered desired state
    InSync,
    /// Content differs from the rendered desired state
    Drifted,
}

/// Per-file record in a status report
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FileStatus {
    pub file: TargetFile,
    pub path: PathBuf,
    pub state: FileSyncState,
}

/// Report of a read-only `status` pass
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StatusReport {
    /// Whether this host is in the supported platform family
    pub debian_family: bool,
    pub files: Vec<FileStatus>,
}

impl StatusReport {
    /// Whether every managed file matches its desired content
    #[must_use]
    pub fn in_sync(&self) -> bool {
        self.files
            .iter()
            .all(|f| f.state == FileSyncState::InSync)
    }
}
