//! Structured logging integration for events
//!
//! Converts domain events into tracing records with structured fields so the
//! same event stream feeds both the console and observability tooling.

use tracing::{debug, error, info, warn};
use upkeep_events::{AppEvent, ConvergeEvent, EventMessage, GeneralEvent};

/// Log an event using the tracing infrastructure with structured fields
pub fn log_event_with_tracing(message: &EventMessage) {
    let meta = &message.meta;
    match &message.event {
        AppEvent::Converge(converge_event) => match converge_event {
            ConvergeEvent::PlatformSkipped { action } => {
                warn!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    action = %action,
                    "Not a Debian-family host, action skipped"
                );
            }
            ConvergeEvent::FileSkipped { file, path } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    file = %file,
                    path = %path.display(),
                    "Target file absent, left unmanaged"
                );
            }
            ConvergeEvent::FileConverged {
                file,
                path,
                changed,
            } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    file = %file,
                    path = %path.display(),
                    changed = changed,
                    "File converged"
                );
            }
            ConvergeEvent::CommandExecuted { command, exit_code } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    command = %command,
                    exit_code = ?exit_code,
                    "Command executed"
                );
            }
            ConvergeEvent::DriftDetected { file, path } => {
                warn!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    file = %file,
                    path = %path.display(),
                    "Managed file drifted from desired content"
                );
            }
        },

        AppEvent::General(general_event) => match general_event {
            GeneralEvent::OperationStarted { operation } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    operation = %operation,
                    "Operation started"
                );
            }
            GeneralEvent::OperationCompleted { operation, success } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    operation = %operation,
                    success = success,
                    "Operation completed"
                );
            }
            GeneralEvent::OperationFailed { operation, error } => {
                error!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    operation = %operation,
                    error = %error,
                    "Operation failed"
                );
            }
            GeneralEvent::Warning { message, context } => {
                warn!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    message = %message,
                    context = ?context,
                    "Warning"
                );
            }
            GeneralEvent::Error { message, details } => {
                error!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    message = %message,
                    details = ?details,
                    "Error"
                );
            }
            GeneralEvent::DebugLog { message, context } => {
                debug!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    message = %message,
                    context = ?context,
                    "Debug log"
                );
            }
        },
    }
}
