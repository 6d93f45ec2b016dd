//! Host facts: pure queries about the environment, consulted to gate actions

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use upkeep_errors::FactsError;

/// Trait for the environment predicates the dispatcher consults.
///
/// Implementations must be pure queries: no mutation of host state.
#[async_trait]
pub trait HostFacts: Send + Sync {
    /// True only when the host belongs to the Debian platform family.
    async fn is_debian_family(&self) -> bool;

    /// Whether a path currently exists on the host filesystem.
    async fn file_exists(&self, path: &Path) -> bool;
}

/// Parsed subset of an os-release file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OsRelease {
    pub id: Option<String>,
    pub id_like: Vec<String>,
}

impl OsRelease {
    /// Whether the described distribution is Debian or derives from it.
    #[must_use]
    pub fn is_debian_family(&self) -> bool {
        self.id.as_deref() == Some("debian")
            || self.id_like.iter().any(|like| like == "debian")
    }
}

/// Facts provider backed by the real host (os-release + filesystem).
pub struct SystemFacts {
    os_release: PathBuf,
}

impl SystemFacts {
    /// Facts for the running host, reading `/etc/os-release`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            os_release: PathBuf::from("/etc/os-release"),
        }
    }

    /// Facts reading an alternate os-release path (tests, chroots).
    #[must_use]
    pub fn with_os_release(path: impl Into<PathBuf>) -> Self {
        Self {
            os_release: path.into(),
        }
    }

    /// Read and parse the os-release file.
    ///
    /// # Errors
    ///
    /// Returns `FactsError::OsReleaseUnreadable` when the file cannot be read.
    pub async fn read_os_release(&self) -> Result<OsRelease, FactsError> {
        let contents = fs::read_to_string(&self.os_release).await.map_err(|e| {
            FactsError::OsReleaseUnreadable {
                path: self.os_release.display().to_string(),
                message: e.to_string(),
            }
        })?;
        Ok(parse_os_release(&contents))
    }
}

impl Default for SystemFacts {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HostFacts for SystemFacts {
    async fn is_debian_family(&self) -> bool {
        match self.read_os_release().await {
            Ok(release) => release.is_debian_family(),
            Err(e) => {
                // An unidentifiable host is treated as not the target platform
                tracing::debug!("os-release unreadable, assuming non-Debian host: {e}");
                false
            }
        }
    }

    async fn file_exists(&self, path: &Path) -> bool {
        fs::try_exists(path).await.unwrap_or(false)
    }
}

/// Parse `KEY=value` lines; values may be double-quoted. Unknown keys and
/// malformed lines are ignored, matching how the file is consumed in practice.
fn parse_os_release(contents: &str) -> OsRelease {
    let mut release = OsRelease::default();
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let value = value.trim().trim_matches('"');
        match key.trim() {
            "ID" => release.id = Some(value.to_string()),
            "ID_LIKE" => {
                release.id_like = value.split_whitespace().map(str::to_string).collect();
            }
            _ => {}
        }
    }
    release
}
