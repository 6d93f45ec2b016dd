//! The `disable` pass: comment out everything upkeep manages

use crate::{CommandReport, DisableReport, OpsCtx};
use upkeep_errors::{OpsError, Result};
use upkeep_events::{AppEvent, ConvergeEvent, EventEmitter};
use upkeep_types::TargetFile;

/// Prefix every active line of both managed files with `#`.
///
/// One well-formed command is issued per file; lines already starting with
/// `#` are left alone, so the pass is idempotent. Missing files are skipped
/// the same way `enable` skips them.
///
/// # Errors
///
/// Returns `OpsError::CommandFailed` with the captured output when a
/// comment-out command exits non-zero.
pub async fn disable(ctx: &OpsCtx) -> Result<DisableReport> {
    ctx.emit_operation_started("disable");

    let mut commands = Vec::new();
    for file in TargetFile::ALL {
        let path = ctx.config.target_path(file);

        if !ctx.facts.file_exists(&path).await {
            tracing::debug!(file = %file, "target file absent, skipping");
            ctx.emit(AppEvent::Converge(ConvergeEvent::FileSkipped {
                file: file.to_string(),
                path: path.clone(),
            }));
            commands.push(CommandReport {
                file,
                path,
                command: None,
                exit_code: None,
            });
            continue;
        }

        // `[^#]` keeps already-commented lines from growing another '#'
        let mut cmd = ctx.command.create_command("sed");
        cmd.arg("-i")
            .arg("s/^[^#]/#&/")
            .arg(path.to_string_lossy());
        let rendered = cmd.display();

        let output = match ctx.command.execute(cmd).await {
            Ok(output) => output,
            Err(e) => {
                ctx.emit_operation_failed("disable", e.to_string());
                return Err(e);
            }
        };

        ctx.emit(AppEvent::Converge(ConvergeEvent::CommandExecuted {
            command: rendered.clone(),
            exit_code: output.code,
        }));

        if !output.success() {
            let err = OpsError::CommandFailed {
                command: rendered,
                code: output.code,
                stderr: output.stderr_lossy(),
            };
            ctx.emit_operation_failed("disable", err.to_string());
            return Err(err.into());
        }

        commands.push(CommandReport {
            file,
            path,
            command: Some(rendered),
            exit_code: output.code,
        });
    }

    ctx.emit_operation_completed("disable", true);
    Ok(DisableReport { commands })
}
