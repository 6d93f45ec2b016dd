//! Idempotent file effects
//!
//! The single write primitive of the convergence engine: ensure a file holds
//! exactly the desired content, touching the disk only on drift.

use async_trait::async_trait;
use std::path::Path;
use tokio::io::AsyncWriteExt;
use upkeep_errors::{Error, StorageError};

/// Requested ownership for a managed file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ownership {
    pub uid: u32,
    pub gid: u32,
}

impl Ownership {
    /// root:root, the ownership of files under /etc/apt
    #[must_use]
    pub const fn root() -> Self {
        Self { uid: 0, gid: 0 }
    }
}

/// Trait for the idempotent file-content-ensure primitive.
#[async_trait]
pub trait FileEffect: Send + Sync {
    /// Write `content` to `path` only if the current content differs.
    ///
    /// Returns whether a change occurred. The target must already exist;
    /// this primitive never creates files. File attributes are preserved
    /// except where `owner` requests a different ownership than the file
    /// currently has.
    async fn ensure_content(
        &self,
        path: &Path,
        content: &str,
        owner: Option<Ownership>,
    ) -> Result<bool, Error>;

    /// Read the current content of a managed file.
    async fn read_to_string(&self, path: &Path) -> Result<String, Error>;
}

/// Real filesystem-backed file effect.
pub struct FsFileEffect;

impl FsFileEffect {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for FsFileEffect {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FileEffect for FsFileEffect {
    async fn ensure_content(
        &self,
        path: &Path,
        content: &str,
        owner: Option<Ownership>,
    ) -> Result<bool, Error> {
        let current = self.read_to_string(path).await?;
        if current == content {
            return Ok(false);
        }

        // Truncate-in-place keeps the inode, so owner/group/mode of the
        // pre-existing file survive the rewrite.
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(path)
            .await
            .map_err(|e| StorageError::from_io_with_path(&e, path))?;

        file.write_all(content.as_bytes())
            .await
            .map_err(|e| StorageError::WriteFailed {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        file.sync_all()
            .await
            .map_err(|e| StorageError::WriteFailed {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        if let Some(owner) = owner {
            apply_ownership(path, owner).await?;
        }

        Ok(true)
    }

    async fn read_to_string(&self, path: &Path) -> Result<String, Error> {
        tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::FileNotFound {
                    path: path.display().to_string(),
                }
                .into()
            } else {
                StorageError::ReadFailed {
                    path: path.display().to_string(),
                    message: e.to_string(),
                }
                .into()
            }
        })
    }
}

/// Chown only when the file does not already have the requested ownership,
/// so converging an already-correct file needs no privileges.
#[cfg(unix)]
async fn apply_ownership(path: &Path, owner: Ownership) -> Result<(), Error> {
    use std::os::unix::fs::MetadataExt;

    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|e| StorageError::from_io_with_path(&e, path))?;
    if metadata.uid() == owner.uid && metadata.gid() == owner.gid {
        return Ok(());
    }

    std::os::unix::fs::chown(path, Some(owner.uid), Some(owner.gid)).map_err(|e| {
        StorageError::ChownFailed {
            path: path.display().to_string(),
            message: e.to_string(),
        }
        .into()
    })
}

#[cfg(not(unix))]
async fn apply_ownership(_path: &Path, _owner: Ownership) -> Result<(), Error> {
    Ok(())
}
