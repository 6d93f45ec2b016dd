//! Operation orchestration error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum OpsError {
    #[error("operation failed: {message}")]
    OperationFailed { message: String },

    #[error("component not found: {component}")]
    MissingComponent { component: String },

    #[error("command execution failed: {command} (exit {code:?}): {stderr}")]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("failed to spawn command {command}: {message}")]
    CommandSpawnFailed { command: String, message: String },

    #[error("serialization error: {message}")]
    SerializationError { message: String },

    #[error("event channel closed")]
    EventChannelClosed,
}

impl UserFacingError for OpsError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::CommandFailed { .. } => {
                Some("Inspect the captured command output above; re-running is safe.")
            }
            Self::CommandSpawnFailed { .. } => {
                Some("Check that the required tool (sed) is installed and on PATH.")
            }
            Self::MissingComponent { .. } => {
                Some("This is a wiring bug in the caller; all context components are required.")
            }
            _ => None,
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, Self::CommandFailed { .. })
    }

    fn user_code(&self) -> Option<&'static str> {
        Some(match self {
            Self::OperationFailed { .. } => "ops.operation_failed",
            Self::MissingComponent { .. } => "ops.missing_component",
            Self::CommandFailed { .. } => "ops.command_failed",
            Self::CommandSpawnFailed { .. } => "ops.command_spawn_failed",
            Self::SerializationError { .. } => "ops.serialization_error",
            Self::EventChannelClosed => "ops.event_channel_closed",
        })
    }
}
