use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle states of a component deployed on a host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum State {
    Init,
    Installing,
    Installed,
    InstallFailed,
    Starting,
    Started,
    StartFailed,
    Stopping,
    StopFailed,
    Uninstalling,
    Uninstalled,
    UninstallFailed,
    WipingOut,
    WipeoutFailed,
}

impl State {
    pub const ALL: [State; 14] = [
        State::Init,
        State::Installing,
        State::Installed,
        State::InstallFailed,
        State::Starting,
        State::Started,
        State::StartFailed,
        State::Stopping,
        State::StopFailed,
        State::Uninstalling,
        State::Uninstalled,
        State::UninstallFailed,
        State::WipingOut,
        State::WipeoutFailed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            State::Init => "INIT",
            State::Installing => "INSTALLING",
            State::Installed => "INSTALLED",
            State::InstallFailed => "INSTALL_FAILED",
            State::Starting => "STARTING",
            State::Started => "STARTED",
            State::StartFailed => "START_FAILED",
            State::Stopping => "STOPPING",
            State::StopFailed => "STOP_FAILED",
            State::Uninstalling => "UNINSTALLING",
            State::Uninstalled => "UNINSTALLED",
            State::UninstallFailed => "UNINSTALL_FAILED",
            State::WipingOut => "WIPING_OUT",
            State::WipeoutFailed => "WIPEOUT_FAILED",
        }
    }

    /// Operation whose pending or failed state this is, if any
    pub fn operation(&self) -> Option<OperationKind> {
        OperationKind::ALL
            .into_iter()
            .find(|op| op.pending_state() == *self || op.failed_state() == *self)
    }

    pub fn is_pending(&self) -> bool {
        OperationKind::ALL
            .into_iter()
            .any(|op| op.pending_state() == *self)
    }

    pub fn is_failed(&self) -> bool {
        OperationKind::ALL
            .into_iter()
            .any(|op| op.failed_state() == *self)
    }

    /// States only a daemon component can ever occupy
    pub fn requires_daemon(&self) -> bool {
        matches!(
            self,
            State::Starting
                | State::Started
                | State::StartFailed
                | State::Stopping
                | State::StopFailed
        )
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operations an orchestrator can request against a component host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationKind {
    Install,
    Start,
    Stop,
    Uninstall,
    Wipeout,
}

impl OperationKind {
    pub const ALL: [OperationKind; 5] = [
        OperationKind::Install,
        OperationKind::Start,
        OperationKind::Stop,
        OperationKind::Uninstall,
        OperationKind::Wipeout,
    ];

    /// States a request for this operation may be issued from
    pub fn source_states(&self) -> &'static [State] {
        match self {
            OperationKind::Install => &[State::Init],
            OperationKind::Start => &[State::Installed],
            OperationKind::Stop => &[State::Started],
            OperationKind::Uninstall => &[State::Installed],
            OperationKind::Wipeout => &[State::Uninstalled],
        }
    }

    pub fn pending_state(&self) -> State {
        match self {
            OperationKind::Install => State::Installing,
            OperationKind::Start => State::Starting,
            OperationKind::Stop => State::Stopping,
            OperationKind::Uninstall => State::Uninstalling,
            OperationKind::Wipeout => State::WipingOut,
        }
    }

    pub fn failed_state(&self) -> State {
        match self {
            OperationKind::Install => State::InstallFailed,
            OperationKind::Start => State::StartFailed,
            OperationKind::Stop => State::StopFailed,
            OperationKind::Uninstall => State::UninstallFailed,
            OperationKind::Wipeout => State::WipeoutFailed,
        }
    }

    pub fn completed_state(&self) -> State {
        match self {
            OperationKind::Install => State::Installed,
            OperationKind::Start => State::Started,
            OperationKind::Stop => State::Installed,
            OperationKind::Uninstall => State::Uninstalled,
            OperationKind::Wipeout => State::Init,
        }
    }

    /// Client components have no process to start or stop
    pub fn daemon_only(&self) -> bool {
        matches!(self, OperationKind::Start | OperationKind::Stop)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Install => "INSTALL",
            OperationKind::Start => "START",
            OperationKind::Stop => "STOP",
            OperationKind::Uninstall => "UNINSTALL",
            OperationKind::Wipeout => "WIPEOUT",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a component runs a long-lived process on its host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentVariant {
    #[default]
    Daemon,
    Client,
}

impl ComponentVariant {
    pub fn from_client_flag(is_client: bool) -> Self {
        if is_client {
            ComponentVariant::Client
        } else {
            ComponentVariant::Daemon
        }
    }

    pub fn is_client(&self) -> bool {
        matches!(self, ComponentVariant::Client)
    }
}

impl fmt::Display for ComponentVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentVariant::Daemon => f.write_str("daemon"),
            ComponentVariant::Client => f.write_str("client"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_state_belongs_to_at_most_one_operation_phase() {
        for state in State::ALL {
            assert!(!(state.is_pending() && state.is_failed()), "{}", state);
        }

        let pending: Vec<_> = State::ALL.into_iter().filter(State::is_pending).collect();
        let failed: Vec<_> = State::ALL.into_iter().filter(State::is_failed).collect();
        assert_eq!(pending.len(), 5);
        assert_eq!(failed.len(), 5);
    }

    #[test]
    fn test_operation_lookup_from_state() {
        assert_eq!(State::Installing.operation(), Some(OperationKind::Install));
        assert_eq!(State::StopFailed.operation(), Some(OperationKind::Stop));
        assert_eq!(State::WipingOut.operation(), Some(OperationKind::Wipeout));
        assert_eq!(State::Installed.operation(), None);
        assert_eq!(State::Init.operation(), None);
    }

    #[test]
    fn test_daemon_only_states_match_daemon_only_operations() {
        for op in OperationKind::ALL {
            assert_eq!(op.pending_state().requires_daemon(), op.daemon_only());
            assert_eq!(op.failed_state().requires_daemon(), op.daemon_only());
        }
        assert!(State::Started.requires_daemon());
        assert!(!State::Installed.requires_daemon());
    }

    #[test]
    fn test_state_names_match_serialized_form() {
        for state in State::ALL {
            let json = serde_json::to_string(&state).unwrap();
            assert_eq!(json, format!("\"{}\"", state.as_str()));
        }
    }

    #[test]
    fn test_variant_from_client_flag() {
        assert_eq!(ComponentVariant::from_client_flag(true), ComponentVariant::Client);
        assert_eq!(ComponentVariant::from_client_flag(false), ComponentVariant::Daemon);
        assert!(ComponentVariant::Client.is_client());
        assert!(!ComponentVariant::Daemon.is_client());
    }
}
