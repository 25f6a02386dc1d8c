use super::bus::{EventBus, NoticeFilter, NoticeReceiver};
use super::types::LifecycleNotice;
use crate::config::{ComphostConfig, ComponentHostSpec, OrchestratorConfig};
use crate::error::{ComphostError, Result};
use crate::host::{ComponentHostStatus, ServiceComponentHost};
use crate::state::{ComponentVariant, State};
use parking_lot::{Mutex, RwLock};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Identity of a component host inside the orchestrator
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HostKey {
    pub component: String,
    pub host: String,
}

impl HostKey {
    pub fn new<S: Into<String>>(component: S, host: S) -> Self {
        Self {
            component: component.into(),
            host: host.into(),
        }
    }
}

/// Shared handle to one registered component host
///
/// Emptied under its own lock when the host is removed, so a handle obtained
/// before removal can no longer accept events.
pub(super) type HostSlot = Arc<Mutex<Option<ServiceComponentHost>>>;

/// Owns a set of component hosts and feeds lifecycle events to them
///
/// Each component host sits behind its own lock, so events for one entity
/// are applied one at a time while different entities proceed independently.
pub struct LifecycleOrchestrator {
    pub(super) event_bus: EventBus,
    pub(super) hosts: RwLock<HashMap<HostKey, HostSlot>>,
}

impl LifecycleOrchestrator {
    /// Create an empty orchestrator
    pub fn new(config: &OrchestratorConfig) -> Self {
        let event_bus = if config.debug_events {
            EventBus::with_debug_logging(config.event_bus_capacity)
        } else {
            EventBus::new(config.event_bus_capacity)
        };

        Self {
            event_bus,
            hosts: RwLock::new(HashMap::new()),
        }
    }

    /// Create an orchestrator and register every configured component host
    pub fn from_config(config: &ComphostConfig) -> Result<Self> {
        let orchestrator = Self::new(&config.orchestrator);
        let count = orchestrator.register_all(&config.hosts)?;
        info!("Orchestrator created with {} component hosts", count);
        Ok(orchestrator)
    }

    /// Subscribe to lifecycle notices
    pub fn subscribe(&self, filter: NoticeFilter, name: &str) -> NoticeReceiver {
        NoticeReceiver::new(self.event_bus.subscribe(), filter, name.to_string())
    }

    /// Add a new component host in INIT
    pub fn register(&self, component: &str, host: &str, variant: ComponentVariant) -> Result<()> {
        let mut hosts = self.hosts.write();
        match hosts.entry(HostKey::new(component, host)) {
            Entry::Occupied(_) => Err(ComphostError::duplicate_host(component, host)),
            Entry::Vacant(slot) => {
                slot.insert(Arc::new(Mutex::new(Some(ServiceComponentHost::with_variant(
                    component, host, variant,
                )))));
                self.notify(LifecycleNotice::Registered {
                    component: component.to_string(),
                    host: host.to_string(),
                    variant,
                });
                Ok(())
            }
        }
    }

    /// Register every configured component host, stopping at the first duplicate
    pub fn register_all(&self, specs: &[ComponentHostSpec]) -> Result<usize> {
        for spec in specs {
            self.register(
                &spec.component,
                &spec.host,
                ComponentVariant::from_client_flag(spec.client),
            )?;
        }
        Ok(specs.len())
    }

    /// Discard a component host; only allowed once it is back in INIT
    pub fn remove(&self, component: &str, host: &str) -> Result<ComponentHostStatus> {
        let mut hosts = self.hosts.write();
        let key = HostKey::new(component, host);

        let slot = hosts
            .get(&key)
            .cloned()
            .ok_or_else(|| ComphostError::unknown_host(component, host))?;

        let status = {
            let mut entity = slot.lock();
            let state = match entity.as_ref() {
                Some(current) => current.state(),
                None => return Err(ComphostError::unknown_host(component, host)),
            };
            if state != State::Init {
                return Err(ComphostError::RemoveRejected {
                    component: component.to_string(),
                    host: host.to_string(),
                    state,
                });
            }
            // Handles already cloned out by `entity` now see an empty slot
            match entity.take() {
                Some(removed) => removed.snapshot(),
                None => return Err(ComphostError::unknown_host(component, host)),
            }
        };

        hosts.remove(&key);
        drop(hosts);

        self.notify(LifecycleNotice::Removed {
            component: component.to_string(),
            host: host.to_string(),
        });
        Ok(status)
    }

    /// Look up the shared handle for one component host
    pub(super) fn entity(
        &self,
        component: &str,
        host: &str,
    ) -> Result<HostSlot> {
        self.hosts
            .read()
            .get(&HostKey::new(component, host))
            .cloned()
            .ok_or_else(|| ComphostError::unknown_host(component, host))
    }

    /// Publish a notice if anyone is listening
    pub(super) fn notify(&self, notice: LifecycleNotice) {
        if !self.event_bus.has_subscribers() {
            return;
        }
        if let Err(e) = self.event_bus.publish(notice) {
            debug!("Dropped lifecycle notice: {}", e);
        }
    }
}
