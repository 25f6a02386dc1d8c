use crate::state::OperationKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kinds of lifecycle events a component host can receive
///
/// Request kinds open an operation; progress kinds report on whichever
/// operation is currently pending (or, for `Restarted`, failed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    Install,
    Start,
    Stop,
    Uninstall,
    Wipeout,
    InProgress,
    Failed,
    Succeeded,
    Restarted,
}

impl EventKind {
    pub const ALL: [EventKind; 9] = [
        EventKind::Install,
        EventKind::Start,
        EventKind::Stop,
        EventKind::Uninstall,
        EventKind::Wipeout,
        EventKind::InProgress,
        EventKind::Failed,
        EventKind::Succeeded,
        EventKind::Restarted,
    ];

    /// Request kind for an operation
    pub fn request(op: OperationKind) -> Self {
        match op {
            OperationKind::Install => EventKind::Install,
            OperationKind::Start => EventKind::Start,
            OperationKind::Stop => EventKind::Stop,
            OperationKind::Uninstall => EventKind::Uninstall,
            OperationKind::Wipeout => EventKind::Wipeout,
        }
    }

    /// Operation requested by this kind, `None` for progress kinds
    pub fn operation(&self) -> Option<OperationKind> {
        match self {
            EventKind::Install => Some(OperationKind::Install),
            EventKind::Start => Some(OperationKind::Start),
            EventKind::Stop => Some(OperationKind::Stop),
            EventKind::Uninstall => Some(OperationKind::Uninstall),
            EventKind::Wipeout => Some(OperationKind::Wipeout),
            EventKind::InProgress
            | EventKind::Failed
            | EventKind::Succeeded
            | EventKind::Restarted => None,
        }
    }

    pub fn is_request(&self) -> bool {
        self.operation().is_some()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Install => "INSTALL",
            EventKind::Start => "START",
            EventKind::Stop => "STOP",
            EventKind::Uninstall => "UNINSTALL",
            EventKind::Wipeout => "WIPEOUT",
            EventKind::InProgress => "IN_PROGRESS",
            EventKind::Failed => "FAILED",
            EventKind::Succeeded => "SUCCEEDED",
            EventKind::Restarted => "RESTARTED",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A lifecycle request or progress report addressed to one component host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentHostEvent {
    kind: EventKind,
    component: String,
    host: String,
    timestamp: i64,
}

impl ComponentHostEvent {
    pub fn new<S: Into<String>>(kind: EventKind, component: S, host: S, timestamp: i64) -> Self {
        Self {
            kind,
            component: component.into(),
            host: host.into(),
            timestamp,
        }
    }

    /// Create an event stamped with the current wall clock in milliseconds
    pub fn now<S: Into<String>>(kind: EventKind, component: S, host: S) -> Self {
        Self::new(kind, component, host, chrono::Utc::now().timestamp_millis())
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn component_name(&self) -> &str {
        &self.component
    }

    pub fn host_name(&self) -> &str {
        &self.host
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// Get a human-readable description of the event
    pub fn description(&self) -> String {
        match self.kind.operation() {
            Some(op) => format!(
                "{} requested for {} on {} at {}",
                op, self.component, self.host, self.timestamp
            ),
            None => format!(
                "{} reported for {} on {} at {}",
                self.kind, self.component, self.host, self.timestamp
            ),
        }
    }
}
