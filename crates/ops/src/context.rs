//! Operations context for dependency injection
//!
//! The dispatcher depends on the platform traits, never on the concrete
//! host-backed implementations, so every operation can run against fakes.

use std::fmt;
use std::sync::Arc;

use upkeep_config::Config;
use upkeep_errors::OpsError;
use upkeep_events::{EventEmitter, EventSender};
use upkeep_platform::{CommandEffect, FileEffect, HostFacts};

/// Operations context providing access to all system components
pub struct OpsCtx {
    /// Host fact provider (platform predicate, file existence)
    pub facts: Arc<dyn HostFacts>,
    /// Idempotent file-content-ensure primitive
    pub file: Arc<dyn FileEffect>,
    /// Host command execution primitive
    pub command: Arc<dyn CommandEffect>,
    /// Event sender for progress reporting
    pub tx: EventSender,
    /// System configuration
    pub config: Config,
}

impl fmt::Debug for OpsCtx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpsCtx")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl EventEmitter for OpsCtx {
    fn event_sender(&self) -> Option<&EventSender> {
        Some(&self.tx)
    }
}

/// Builder for operations context
pub struct OpsContextBuilder {
    facts: Option<Arc<dyn HostFacts>>,
    file: Option<Arc<dyn FileEffect>>,
    command: Option<Arc<dyn CommandEffect>>,
    tx: Option<EventSender>,
    config: Option<Config>,
}

impl OpsContextBuilder {
    /// Create new context builder
    #[must_use]
    pub fn new() -> Self {
        Self {
            facts: None,
            file: None,
            command: None,
            tx: None,
            config: None,
        }
    }

    /// Set the host fact provider
    #[must_use]
    pub fn with_facts(mut self, facts: Arc<dyn HostFacts>) -> Self {
        self.facts = Some(facts);
        self
    }

    /// Set the file effect primitive
    #[must_use]
    pub fn with_file_effect(mut self, file: Arc<dyn FileEffect>) -> Self {
        self.file = Some(file);
        self
    }

    /// Set the command effect primitive
    #[must_use]
    pub fn with_command_effect(mut self, command: Arc<dyn CommandEffect>) -> Self {
        self.command = Some(command);
        self
    }

    /// Set event sender
    #[must_use]
    pub fn with_event_sender(mut self, tx: EventSender) -> Self {
        self.tx = Some(tx);
        self
    }

    /// Set configuration
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Build the context
    ///
    /// # Errors
    ///
    /// Returns an error if any required component is missing.
    pub fn build(self) -> Result<OpsCtx, OpsError> {
        let facts = self.facts.ok_or_else(|| OpsError::MissingComponent {
            component: "facts".to_string(),
        })?;

        let file = self.file.ok_or_else(|| OpsError::MissingComponent {
            component: "file_effect".to_string(),
        })?;

        let command = self.command.ok_or_else(|| OpsError::MissingComponent {
            component: "command_effect".to_string(),
        })?;

        let tx = self.tx.ok_or_else(|| OpsError::MissingComponent {
            component: "event_sender".to_string(),
        })?;

        let config = self.config.ok_or_else(|| OpsError::MissingComponent {
            component: "config".to_string(),
        })?;

        Ok(OpsCtx {
            facts,
            file,
            command,
            tx,
            config,
        })
    }
}

impl Default for OpsContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_component_is_reported_by_name() {
        let (tx, _rx) = upkeep_events::channel();
        let err = OpsContextBuilder::new()
            .with_event_sender(tx)
            .with_config(Config::default())
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            OpsError::MissingComponent { ref component } if component == "facts"
        ));
    }
}
