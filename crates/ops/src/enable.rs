//! The `enable` convergence pass

use crate::{ConvergeReport, FileOutcome, FileReport, OpsCtx};
use upkeep_errors::{Error, Result};
use upkeep_events::{AppEvent, ConvergeEvent, EventEmitter};
use upkeep_platform::Ownership;
use upkeep_types::DesiredState;

/// Converge the host toward the desired state described by the context's
/// configuration.
///
/// # Errors
///
/// Returns an error for invalid configuration or a failing file write.
pub async fn enable(ctx: &OpsCtx) -> Result<ConvergeReport> {
    let state = ctx.config.desired_state()?;
    enable_with_state(ctx, &state).await
}

/// Converge the host toward an explicit desired state.
///
/// The pass is a no-op success on non-Debian hosts and for target files that
/// do not exist; it never creates a file. The first failing write aborts the
/// run without rollback - re-running converges the remainder.
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` when `upgrade_types` is empty, or the
/// first file-effect error encountered.
pub async fn enable_with_state(ctx: &OpsCtx, state: &DesiredState) -> Result<ConvergeReport> {
    state.validate_for_enable().map_err(Error::from)?;

    ctx.emit_operation_started("enable");

    if !ctx.facts.is_debian_family().await {
        tracing::info!("not a Debian-family host, skipping enable");
        ctx.emit(AppEvent::Converge(ConvergeEvent::PlatformSkipped {
            action: "enable".to_string(),
        }));
        ctx.emit_operation_completed("enable", true);
        return Ok(ConvergeReport {
            platform_skipped: true,
            files: Vec::new(),
        });
    }

    let ownership = ctx
        .config
        .paths
        .enforce_ownership
        .then(Ownership::root);

    let mut files = Vec::new();
    for file_plan in upkeep_render::plan(state) {
        let path = ctx.config.target_path(file_plan.file);

        if !ctx.facts.file_exists(&path).await {
            tracing::debug!(file = %file_plan.file, "target file absent, skipping");
            ctx.emit(AppEvent::Converge(ConvergeEvent::FileSkipped {
                file: file_plan.file.to_string(),
                path: path.clone(),
            }));
            files.push(FileReport {
                file: file_plan.file,
                path,
                outcome: FileOutcome::SkippedMissing,
            });
            continue;
        }

        let changed = match ctx
            .file
            .ensure_content(&path, &file_plan.content, ownership)
            .await
        {
            Ok(changed) => changed,
            Err(e) => {
                ctx.emit_operation_failed("enable", e.to_string());
                return Err(e);
            }
        };

        ctx.emit(AppEvent::Converge(ConvergeEvent::FileConverged {
            file: file_plan.file.to_string(),
            path: path.clone(),
            changed,
        }));
        files.push(FileReport {
            file: file_plan.file,
            path,
            outcome: FileOutcome::Converged { changed },
        });
    }

    ctx.emit_operation_completed("enable", true);
    Ok(ConvergeReport {
        platform_skipped: false,
        files,
    })
}
