//! Host fact gathering error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum FactsError {
    #[error("cannot read os-release file {path}: {message}")]
    OsReleaseUnreadable { path: String, message: String },
}

impl UserFacingError for FactsError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        Some("Check that /etc/os-release is present and readable.")
    }

    fn user_code(&self) -> Option<&'static str> {
        Some(match self {
            Self::OsReleaseUnreadable { .. } => "facts.os_release_unreadable",
        })
    }
}
