//! The read-only `status` pass

use crate::{FileStatus, FileSyncState, OpsCtx, StatusReport};
use upkeep_errors::Result;
use upkeep_events::{AppEvent, ConvergeEvent, EventEmitter};

/// Compare each managed file against its rendered desired content.
///
/// Purely observational: no file is written and no command is run.
///
/// # Errors
///
/// Returns an error for invalid configuration or an unreadable target file.
pub async fn status(ctx: &OpsCtx) -> Result<StatusReport> {
    let state = ctx.config.desired_state()?;
    let debian_family = ctx.facts.is_debian_family().await;

    let mut files = Vec::new();
    for file_plan in upkeep_render::plan(&state) {
        let path = ctx.config.target_path(file_plan.file);

        if !ctx.facts.file_exists(&path).await {
            files.push(FileStatus {
                file: file_plan.file,
                path,
                state: FileSyncState::Missing,
            });
            continue;
        }

        let current = ctx.file.read_to_string(&path).await?;
        let sync_state = if current == file_plan.content {
            FileSyncState::InSync
        } else {
            ctx.emit(AppEvent::Converge(ConvergeEvent::DriftDetected {
                file: file_plan.file.to_string(),
                path: path.clone(),
            }));
            FileSyncState::Drifted
        };

        files.push(FileStatus {
            file: file_plan.file,
            path,
            state: sync_state,
        });
    }

    Ok(StatusReport {
        debian_family,
        files,
    })
}
