//! Lifecycle state machine for one component deployed on one host

use crate::error::{ComphostError, Result};
use crate::events::{ComponentHostEvent, EventKind};
use crate::state::{ComponentVariant, OperationKind, State};
use crate::transition::{self, OperationTimes};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};


/// State and timestamps are replaced together as one value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Lifecycle {
    state: State,
    times: OperationTimes,
}

/// Point-in-time view of a component host for reporting layers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentHostStatus {
    pub component: String,
    pub host: String,
    pub variant: ComponentVariant,
    pub state: State,
    pub last_op_start_time: i64,
    pub last_op_last_update_time: i64,
    pub last_op_end_time: i64,
}

/// One component of a service deployed on one host
///
/// Events are applied through the transition table. A rejected event leaves
/// the entity exactly as it was. Callers delivering events from several
/// tasks must serialize access themselves.
#[derive(Debug, Clone)]
pub struct ServiceComponentHost {
    component: String,
    host: String,
    variant: ComponentVariant,
    lifecycle: Lifecycle,
}

impl ServiceComponentHost {
    pub fn new<S: Into<String>>(component: S, host: S, is_client: bool) -> Self {
        Self::with_variant(component, host, ComponentVariant::from_client_flag(is_client))
    }

    pub fn with_variant<S: Into<String>>(component: S, host: S, variant: ComponentVariant) -> Self {
        Self {
            component: component.into(),
            host: host.into(),
            variant,
            lifecycle: Lifecycle {
                state: State::Init,
                times: OperationTimes::UNSET,
            },
        }
    }

    /// Apply a lifecycle event and return the resulting state
    pub fn handle_event(&mut self, event: &ComponentHostEvent) -> Result<State> {
        let current = self.lifecycle;

        let Some(step) = transition::lookup(current.state, event.kind(), self.variant) else {
            warn!(
                "Rejected {} for {} on {} in state {}",
                event.kind(),
                self.component,
                self.host,
                current.state
            );
            return Err(ComphostError::InvalidTransition {
                state: current.state,
                event: event.kind(),
            });
        };

        self.lifecycle = Lifecycle {
            state: step.to,
            times: step.action.apply(current.times, event.timestamp()),
        };

        debug!(
            "{} on {}: {} -> {} via {}@{}",
            self.component,
            self.host,
            current.state,
            step.to,
            event.kind(),
            event.timestamp()
        );

        Ok(step.to)
    }

    /// Whether `kind` would be accepted right now, without applying it
    pub fn can_accept(&self, kind: EventKind) -> bool {
        transition::lookup(self.lifecycle.state, kind, self.variant).is_some()
    }

    /// Event kinds accepted in the current state
    pub fn valid_events(&self) -> Vec<EventKind> {
        transition::valid_events(self.lifecycle.state, self.variant)
    }

    /// Build an event addressed to this component host
    pub fn event(&self, kind: EventKind, timestamp: i64) -> ComponentHostEvent {
        ComponentHostEvent::new(kind, self.component.as_str(), self.host.as_str(), timestamp)
    }

    /// Operation that is pending or failed, if one is outstanding
    pub fn pending_operation(&self) -> Option<OperationKind> {
        self.lifecycle.state.operation()
    }

    pub fn state(&self) -> State {
        self.lifecycle.state
    }

    pub fn operation_times(&self) -> OperationTimes {
        self.lifecycle.times
    }

    pub fn last_op_start_time(&self) -> i64 {
        self.lifecycle.times.start
    }

    pub fn last_op_last_update_time(&self) -> i64 {
        self.lifecycle.times.last_update
    }

    pub fn last_op_end_time(&self) -> i64 {
        self.lifecycle.times.end
    }

    pub fn component_name(&self) -> &str {
        &self.component
    }

    pub fn host_name(&self) -> &str {
        &self.host
    }

    pub fn variant(&self) -> ComponentVariant {
        self.variant
    }

    pub fn is_client(&self) -> bool {
        self.variant.is_client()
    }

    pub fn snapshot(&self) -> ComponentHostStatus {
        ComponentHostStatus {
            component: self.component.clone(),
            host: self.host.clone(),
            variant: self.variant,
            state: self.lifecycle.state,
            last_op_start_time: self.lifecycle.times.start,
            last_op_last_update_time: self.lifecycle.times.last_update,
            last_op_end_time: self.lifecycle.times.end,
        }
    }
}
