//! Storage and filesystem-related error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum StorageError {
    #[error("permission denied: {path}")]
    PermissionDenied { path: String },

    #[error("file not found: {path}")]
    FileNotFound { path: String },

    #[error("write failed for {path}: {message}")]
    WriteFailed { path: String, message: String },

    #[error("read failed for {path}: {message}")]
    ReadFailed { path: String, message: String },

    #[error("ownership change failed for {path}: {message}")]
    ChownFailed { path: String, message: String },

    #[error("IO error: {message}")]
    IoError { message: String },
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        // Without a known path, avoid inventing placeholders; preserve message only
        Self::IoError {
            message: err.to_string(),
        }
    }
}

impl StorageError {
    /// Convert an `io::Error` into a `StorageError` with an associated path
    #[must_use]
    pub fn from_io_with_path(err: &std::io::Error, path: &std::path::Path) -> Self {
        match err.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied {
                path: path.display().to_string(),
            },
            std::io::ErrorKind::NotFound => Self::FileNotFound {
                path: path.display().to_string(),
            },
            _ => Self::IoError {
                message: format!("{}: {err}", path.display()),
            },
        }
    }
}

impl UserFacingError for StorageError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::PermissionDenied { .. } | Self::ChownFailed { .. } => {
                Some("Run with sufficient privileges to manage files under /etc/apt.")
            }
            Self::FileNotFound { .. } => {
                Some("The target file must already exist; upkeep never creates it.")
            }
            _ => None,
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, Self::IoError { .. } | Self::WriteFailed { .. })
    }

    fn user_code(&self) -> Option<&'static str> {
        Some(match self {
            Self::PermissionDenied { .. } => "storage.permission_denied",
            Self::FileNotFound { .. } => "storage.file_not_found",
            Self::WriteFailed { .. } => "storage.write_failed",
            Self::ReadFailed { .. } => "storage.read_failed",
            Self::ChownFailed { .. } => "storage.chown_failed",
            Self::IoError { .. } => "storage.io_error",
        })
    }
}
