use crate::events::EventKind;
use crate::state::State;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ComphostError {
    /// The event kind is not legal for the entity's current state and variant.
    #[error("Invalid event {event} at state {state}")]
    InvalidTransition { state: State, event: EventKind },

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Deserialization error: {0}")]
    Deserialization(#[from] toml::de::Error),

    #[error("Event bus error: {0}")]
    EventBus(#[from] EventBusError),

    #[error("No component host {component} registered on {host}")]
    UnknownHost { component: String, host: String },

    #[error("Component host {component} is already registered on {host}")]
    DuplicateHost { component: String, host: String },

    #[error("Component host {component} on {host} cannot be removed while {state}")]
    RemoveRejected {
        component: String,
        host: String,
        state: State,
    },
}

impl ComphostError {
    pub fn unknown_host<S: Into<String>>(component: S, host: S) -> Self {
        Self::UnknownHost {
            component: component.into(),
            host: host.into(),
        }
    }

    pub fn duplicate_host<S: Into<String>>(component: S, host: S) -> Self {
        Self::DuplicateHost {
            component: component.into(),
            host: host.into(),
        }
    }

    /// True when the error came from the lifecycle state machine rejecting an event
    pub fn is_invalid_transition(&self) -> bool {
        matches!(self, Self::InvalidTransition { .. })
    }
}

#[derive(Error, Debug)]
pub enum EventBusError {
    #[error("Failed to publish notice: {details}")]
    PublishFailed { details: String },

    #[error("Receiver lagged behind by {skipped} notices")]
    Lagged { skipped: u64 },

    #[error("Event bus channel closed")]
    ChannelClosed,
}

pub type Result<T> = std::result::Result<T, ComphostError>;
