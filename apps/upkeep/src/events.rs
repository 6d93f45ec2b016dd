//! Event handling and live status display

use console::style;
use upkeep_events::{AppEvent, ConvergeEvent, EventMessage, GeneralEvent};

/// Event handler for status lines and user feedback
pub struct EventHandler {
    colors_enabled: bool,
    debug: bool,
    /// Suppress console output entirely (JSON mode)
    silent: bool,
}

impl EventHandler {
    /// Create new event handler
    pub fn new(colors_enabled: bool, debug: bool, silent: bool) -> Self {
        Self {
            colors_enabled,
            debug,
            silent,
        }
    }

    /// Handle incoming event
    pub fn handle_message(&mut self, message: EventMessage) {
        crate::logging::log_event_with_tracing(&message);

        if self.silent {
            return;
        }

        match message.event {
            AppEvent::Converge(event) => self.handle_converge(&event),
            AppEvent::General(event) => self.handle_general(&event),
        }
    }

    fn handle_converge(&self, event: &ConvergeEvent) {
        match event {
            ConvergeEvent::PlatformSkipped { action } => {
                self.show_warning(&format!(
                    "not a Debian-family host, `{action}` skipped"
                ));
            }
            ConvergeEvent::FileSkipped { path, .. } => {
                self.show_status(&format!("skipped {} (absent)", path.display()));
            }
            ConvergeEvent::FileConverged { path, changed, .. } => {
                if *changed {
                    self.show_status(&format!("updated {}", path.display()));
                } else {
                    self.show_status(&format!("unchanged {}", path.display()));
                }
            }
            ConvergeEvent::CommandExecuted { command, .. } => {
                self.show_status(&format!("ran {command}"));
            }
            ConvergeEvent::DriftDetected { path, .. } => {
                self.show_warning(&format!("drifted {}", path.display()));
            }
        }
    }

    fn handle_general(&self, event: &GeneralEvent) {
        match event {
            GeneralEvent::Warning { message, .. } => self.show_warning(message),
            GeneralEvent::Error { message, .. } => self.show_error(message),
            GeneralEvent::OperationFailed { operation, error } => {
                self.show_error(&format!("{operation} failed: {error}"));
            }
            GeneralEvent::DebugLog { message, .. } => {
                if self.debug {
                    self.show_status(message);
                }
            }
            // Start/completion lines are covered by the final report output
            GeneralEvent::OperationStarted { .. } | GeneralEvent::OperationCompleted { .. } => {}
        }
    }

    fn show_status(&self, line: &str) {
        println!("  {line}");
    }

    fn show_warning(&self, line: &str) {
        if self.colors_enabled {
            eprintln!("{} {line}", style("warning:").yellow().bold());
        } else {
            eprintln!("warning: {line}");
        }
    }

    fn show_error(&self, line: &str) {
        if self.colors_enabled {
            eprintln!("{} {line}", style("error:").red().bold());
        } else {
            eprintln!("error: {line}");
        }
    }
}
