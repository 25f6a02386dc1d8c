use super::types::{LifecycleNotice, RejectedEvent, ReplaySummary};
use super::orchestrator::HostSlot;
use super::LifecycleOrchestrator;
use crate::error::{ComphostError, Result};
use crate::events::ComponentHostEvent;
use crate::state::State;
use tracing::{debug, info};

impl LifecycleOrchestrator {
    /// Route an event to its component host and apply it
    ///
    /// The entity lock is held while the event is applied and its notice
    /// published, so notices for one entity arrive in the order applied.
    /// A host removed after lookup but before locking is reported as unknown.
    pub fn dispatch(&self, event: &ComponentHostEvent) -> Result<State> {
        let entity = self.entity(event.component_name(), event.host_name())?;
        self.apply(&entity, event)
    }

    /// Apply an event to an already looked-up host handle
    pub(super) fn apply(&self, entity: &HostSlot, event: &ComponentHostEvent) -> Result<State> {
        let mut slot = entity.lock();
        let Some(host) = slot.as_mut() else {
            return Err(ComphostError::unknown_host(
                event.component_name(),
                event.host_name(),
            ));
        };
        let from = host.state();

        match host.handle_event(event) {
            Ok(to) => {
                self.notify(LifecycleNotice::Transitioned {
                    component: event.component_name().to_string(),
                    host: event.host_name().to_string(),
                    from,
                    to,
                    event: event.kind(),
                    timestamp: event.timestamp(),
                });
                Ok(to)
            }
            Err(e) => {
                self.notify(LifecycleNotice::Rejected {
                    component: event.component_name().to_string(),
                    host: event.host_name().to_string(),
                    state: from,
                    event: event.kind(),
                    timestamp: event.timestamp(),
                });
                Err(e)
            }
        }
    }

    /// Apply events in order, recording rather than stopping on rejections
    pub fn dispatch_all<I>(&self, events: I) -> ReplaySummary
    where
        I: IntoIterator<Item = ComponentHostEvent>,
    {
        let mut summary = ReplaySummary::default();

        for event in events {
            match self.dispatch(&event) {
                Ok(state) => {
                    debug!("{} -> {}", event.description(), state);
                    summary.applied += 1;
                }
                Err(e) => summary.rejected.push(RejectedEvent {
                    event,
                    reason: e.to_string(),
                }),
            }
        }

        info!(
            "Replayed {} events: {} applied, {} rejected",
            summary.applied + summary.rejected.len(),
            summary.applied,
            summary.rejected.len()
        );
        summary
    }
}
