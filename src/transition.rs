//! Lifecycle transition table
//!
//! Every legal (state, event kind, variant) combination is one row of
//! [`TRANSITIONS`]. Anything not listed is rejected.

use crate::events::EventKind;
use crate::state::{ComponentVariant, State};
use serde::{Deserialize, Serialize};

/// Sentinel for a timestamp that has not been recorded
pub const UNSET_TIMESTAMP: i64 = -1;

/// Start, last update and end times of the most recent operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationTimes {
    pub start: i64,
    pub last_update: i64,
    pub end: i64,
}

impl OperationTimes {
    pub const UNSET: OperationTimes = OperationTimes {
        start: UNSET_TIMESTAMP,
        last_update: UNSET_TIMESTAMP,
        end: UNSET_TIMESTAMP,
    };
}

impl Default for OperationTimes {
    fn default() -> Self {
        Self::UNSET
    }
}

/// How an accepted event updates the operation timestamps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimestampAction {
    /// A new attempt begins: start is the event time, update and end are cleared
    Reset,
    /// Progress report: update is the event time
    Update,
    /// Outcome report: update and end are the event time
    Finalize,
    None,
}

impl TimestampAction {
    pub fn apply(&self, times: OperationTimes, timestamp: i64) -> OperationTimes {
        match self {
            TimestampAction::Reset => OperationTimes {
                start: timestamp,
                last_update: UNSET_TIMESTAMP,
                end: UNSET_TIMESTAMP,
            },
            TimestampAction::Update => OperationTimes {
                last_update: timestamp,
                ..times
            },
            TimestampAction::Finalize => OperationTimes {
                last_update: timestamp,
                end: timestamp,
                ..times
            },
            TimestampAction::None => times,
        }
    }
}

/// Which component variants a rule applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applicability {
    AnyVariant,
    DaemonOnly,
}

impl Applicability {
    pub fn admits(&self, variant: ComponentVariant) -> bool {
        match self {
            Applicability::AnyVariant => true,
            Applicability::DaemonOnly => !variant.is_client(),
        }
    }
}

/// One row of the transition table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionRule {
    pub from: State,
    pub event: EventKind,
    pub applies_to: Applicability,
    pub to: State,
    pub action: TimestampAction,
}

/// Result of a successful lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub to: State,
    pub action: TimestampAction,
}

const fn rule(
    from: State,
    event: EventKind,
    applies_to: Applicability,
    to: State,
    action: TimestampAction,
) -> TransitionRule {
    TransitionRule {
        from,
        event,
        applies_to,
        to,
        action,
    }
}

use self::Applicability::{AnyVariant, DaemonOnly};
use self::TimestampAction as T;
use crate::events::EventKind as E;
use crate::state::State as S;

pub const TRANSITIONS: &[TransitionRule] = &[
    // install
    rule(S::Init, E::Install, AnyVariant, S::Installing, T::Reset),
    rule(S::Installing, E::InProgress, AnyVariant, S::Installing, T::Update),
    rule(S::Installing, E::Failed, AnyVariant, S::InstallFailed, T::Finalize),
    rule(S::Installing, E::Succeeded, AnyVariant, S::Installed, T::Finalize),
    rule(S::InstallFailed, E::Restarted, AnyVariant, S::Installing, T::Reset),
    // start
    rule(S::Installed, E::Start, DaemonOnly, S::Starting, T::Reset),
    rule(S::Starting, E::InProgress, DaemonOnly, S::Starting, T::Update),
    rule(S::Starting, E::Failed, DaemonOnly, S::StartFailed, T::Finalize),
    rule(S::Starting, E::Succeeded, DaemonOnly, S::Started, T::Finalize),
    rule(S::StartFailed, E::Restarted, DaemonOnly, S::Starting, T::Reset),
    // stop
    rule(S::Started, E::Stop, DaemonOnly, S::Stopping, T::Reset),
    rule(S::Stopping, E::InProgress, DaemonOnly, S::Stopping, T::Update),
    rule(S::Stopping, E::Failed, DaemonOnly, S::StopFailed, T::Finalize),
    rule(S::Stopping, E::Succeeded, DaemonOnly, S::Installed, T::Finalize),
    rule(S::StopFailed, E::Restarted, DaemonOnly, S::Stopping, T::Reset),
    // uninstall
    rule(S::Installed, E::Uninstall, AnyVariant, S::Uninstalling, T::Reset),
    rule(S::Uninstalling, E::InProgress, AnyVariant, S::Uninstalling, T::Update),
    rule(S::Uninstalling, E::Failed, AnyVariant, S::UninstallFailed, T::Finalize),
    rule(S::Uninstalling, E::Succeeded, AnyVariant, S::Uninstalled, T::Finalize),
    rule(S::UninstallFailed, E::Restarted, AnyVariant, S::Uninstalling, T::Reset),
    // wipeout
    rule(S::Uninstalled, E::Wipeout, AnyVariant, S::WipingOut, T::Reset),
    rule(S::WipingOut, E::InProgress, AnyVariant, S::WipingOut, T::Update),
    rule(S::WipingOut, E::Failed, AnyVariant, S::WipeoutFailed, T::Finalize),
    rule(S::WipingOut, E::Succeeded, AnyVariant, S::Init, T::Finalize),
    rule(S::WipeoutFailed, E::Restarted, AnyVariant, S::WipingOut, T::Reset),
];

/// Find the transition for an event, or `None` if the event is illegal here
pub fn lookup(state: State, event: EventKind, variant: ComponentVariant) -> Option<Transition> {
    TRANSITIONS
        .iter()
        .find(|r| r.from == state && r.event == event && r.applies_to.admits(variant))
        .map(|r| Transition {
            to: r.to,
            action: r.action,
        })
}

/// All rows of the table
pub fn rules() -> &'static [TransitionRule] {
    TRANSITIONS
}

/// Event kinds a component of `variant` accepts while in `state`
pub fn valid_events(state: State, variant: ComponentVariant) -> Vec<EventKind> {
    EventKind::ALL
        .into_iter()
        .filter(|kind| lookup(state, *kind, variant).is_some())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::OperationKind;

    /// Derive the expected transition for a cell from the operation definitions
    fn expected(state: State, event: EventKind, variant: ComponentVariant) -> Option<Transition> {
        for op in OperationKind::ALL {
            if op.daemon_only() && variant.is_client() {
                continue;
            }
            let pending = op.pending_state();
            let candidate = match event {
                e if e == EventKind::request(op) && op.source_states().contains(&state) => {
                    Some((pending, TimestampAction::Reset))
                }
                EventKind::InProgress if state == pending => {
                    Some((pending, TimestampAction::Update))
                }
                EventKind::Failed if state == pending => {
                    Some((op.failed_state(), TimestampAction::Finalize))
                }
                EventKind::Succeeded if state == pending => {
                    Some((op.completed_state(), TimestampAction::Finalize))
                }
                EventKind::Restarted if state == op.failed_state() => {
                    Some((pending, TimestampAction::Reset))
                }
                _ => None,
            };
            if let Some((to, action)) = candidate {
                return Some(Transition { to, action });
            }
        }
        None
    }

    #[test]
    fn test_table_matches_operation_definitions_for_every_cell() {
        let mut valid_cells = 0;
        for variant in [ComponentVariant::Daemon, ComponentVariant::Client] {
            for state in State::ALL {
                for event in EventKind::ALL {
                    let actual = lookup(state, event, variant);
                    assert_eq!(
                        actual,
                        expected(state, event, variant),
                        "{} + {} ({})",
                        state,
                        event,
                        variant
                    );
                    if actual.is_some() {
                        valid_cells += 1;
                    }
                }
            }
        }
        // 25 daemon cells, 15 client cells
        assert_eq!(valid_cells, 40);
    }

    #[test]
    fn test_table_has_no_duplicate_keys() {
        for (i, a) in TRANSITIONS.iter().enumerate() {
            for b in &TRANSITIONS[i + 1..] {
                assert!(
                    !(a.from == b.from && a.event == b.event),
                    "duplicate rule for {} + {}",
                    a.from,
                    a.event
                );
            }
        }
        assert_eq!(rules().len(), 25);
    }

    #[test]
    fn test_client_never_reaches_daemon_states() {
        for rule in rules() {
            if rule.to.requires_daemon() || rule.from.requires_daemon() {
                assert_eq!(rule.applies_to, Applicability::DaemonOnly);
            }
        }
        for state in State::ALL {
            for event in EventKind::ALL {
                if let Some(t) = lookup(state, event, ComponentVariant::Client) {
                    assert!(!t.to.requires_daemon());
                }
            }
        }
    }

    #[test]
    fn test_client_start_and_stop_rejected() {
        assert!(lookup(State::Installed, EventKind::Start, ComponentVariant::Client).is_none());
        assert!(lookup(State::Started, EventKind::Stop, ComponentVariant::Client).is_none());
        assert!(lookup(State::Installed, EventKind::Start, ComponentVariant::Daemon).is_some());
    }

    #[test]
    fn test_valid_events() {
        assert_eq!(
            valid_events(State::Installed, ComponentVariant::Daemon),
            vec![EventKind::Start, EventKind::Uninstall]
        );
        assert_eq!(
            valid_events(State::Installed, ComponentVariant::Client),
            vec![EventKind::Uninstall]
        );
        assert_eq!(
            valid_events(State::Installing, ComponentVariant::Client),
            vec![EventKind::InProgress, EventKind::Failed, EventKind::Succeeded]
        );
        assert_eq!(
            valid_events(State::WipeoutFailed, ComponentVariant::Daemon),
            vec![EventKind::Restarted]
        );
    }

    #[test]
    fn test_timestamp_actions() {
        let times = OperationTimes {
            start: 1,
            last_update: 3,
            end: 4,
        };

        assert_eq!(
            TimestampAction::Reset.apply(times, 9),
            OperationTimes {
                start: 9,
                last_update: UNSET_TIMESTAMP,
                end: UNSET_TIMESTAMP,
            }
        );
        assert_eq!(
            TimestampAction::Update.apply(times, 9),
            OperationTimes {
                start: 1,
                last_update: 9,
                end: 4,
            }
        );
        assert_eq!(
            TimestampAction::Finalize.apply(times, 9),
            OperationTimes {
                start: 1,
                last_update: 9,
                end: 9,
            }
        );
        assert_eq!(TimestampAction::None.apply(times, 9), times);
        assert_eq!(OperationTimes::default(), OperationTimes::UNSET);
    }
}
