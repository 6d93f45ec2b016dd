use serde::{Deserialize, Serialize};

use crate::{EventLevel, EventMeta, EventSource};

pub mod converge;
pub mod general;

pub use converge::ConvergeEvent;
pub use general::GeneralEvent;

/// Top-level application event enum that aggregates all domain-specific events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "domain", content = "event", rename_all = "snake_case")]
pub enum AppEvent {
    /// General utility events (warnings, errors, operations)
    General(GeneralEvent),

    /// Convergence pass events (facts, renders, writes, commands)
    Converge(ConvergeEvent),
}

impl AppEvent {
    /// Identify the source domain for this event (used for metadata/logging).
    #[must_use]
    pub fn event_source(&self) -> EventSource {
        match self {
            Self::General(_) => EventSource::GENERAL,
            Self::Converge(_) => EventSource::CONVERGE,
        }
    }

    /// Default severity of the event, used when building metadata.
    #[must_use]
    pub fn default_level(&self) -> EventLevel {
        match self {
            Self::General(event) => event.default_level(),
            Self::Converge(event) => event.default_level(),
        }
    }
}

/// An event paired with its emission metadata; this is what travels over the
/// channel so that the CLI can log and render without reconstructing context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMessage {
    pub meta: EventMeta,
    pub event: AppEvent,
}

impl EventMessage {
    /// Wrap an event with explicit metadata.
    #[must_use]
    pub fn new(meta: EventMeta, event: AppEvent) -> Self {
        Self { meta, event }
    }

    /// Wrap an event with metadata derived from the event itself.
    #[must_use]
    pub fn from_event(event: AppEvent) -> Self {
        let meta = EventMeta::new(event.default_level(), event.event_source());
        Self { meta, event }
    }
}
