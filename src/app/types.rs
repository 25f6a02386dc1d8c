use crate::events::{ComponentHostEvent, EventKind};
use crate::state::{ComponentVariant, State};
use serde::{Deserialize, Serialize};

/// Notices published by the orchestrator as component hosts change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LifecycleNotice {
    /// A component host was added to the orchestrator
    Registered {
        component: String,
        host: String,
        variant: ComponentVariant,
    },
    /// An event was accepted and the component host moved states
    Transitioned {
        component: String,
        host: String,
        from: State,
        to: State,
        event: EventKind,
        timestamp: i64,
    },
    /// An event was illegal for the component host's current state
    Rejected {
        component: String,
        host: String,
        state: State,
        event: EventKind,
        timestamp: i64,
    },
    /// A component host was discarded after returning to INIT
    Removed { component: String, host: String },
}

impl LifecycleNotice {
    pub fn component(&self) -> &str {
        match self {
            LifecycleNotice::Registered { component, .. }
            | LifecycleNotice::Transitioned { component, .. }
            | LifecycleNotice::Rejected { component, .. }
            | LifecycleNotice::Removed { component, .. } => component,
        }
    }

    pub fn host(&self) -> &str {
        match self {
            LifecycleNotice::Registered { host, .. }
            | LifecycleNotice::Transitioned { host, .. }
            | LifecycleNotice::Rejected { host, .. }
            | LifecycleNotice::Removed { host, .. } => host,
        }
    }

    /// Get the notice type as a string for filtering
    pub fn notice_type(&self) -> &'static str {
        match self {
            LifecycleNotice::Registered { .. } => "registered",
            LifecycleNotice::Transitioned { .. } => "transitioned",
            LifecycleNotice::Rejected { .. } => "rejected",
            LifecycleNotice::Removed { .. } => "removed",
        }
    }

    /// Get a human-readable description of the notice
    pub fn description(&self) -> String {
        match self {
            LifecycleNotice::Registered {
                component,
                host,
                variant,
            } => format!("Registered {} component {} on {}", variant, component, host),
            LifecycleNotice::Transitioned {
                component,
                host,
                from,
                to,
                event,
                ..
            } => format!("{} on {}: {} -> {} ({})", component, host, from, to, event),
            LifecycleNotice::Rejected {
                component,
                host,
                state,
                event,
                ..
            } => format!("{} on {}: rejected {} in {}", component, host, event, state),
            LifecycleNotice::Removed { component, host } => {
                format!("Removed {} from {}", component, host)
            }
        }
    }
}

/// An event the orchestrator could not apply
#[derive(Debug, Clone, Serialize)]
pub struct RejectedEvent {
    pub event: ComponentHostEvent,
    pub reason: String,
}

/// Outcome of applying a batch of events in order
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReplaySummary {
    pub applied: usize,
    pub rejected: Vec<RejectedEvent>,
}

impl ReplaySummary {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}
