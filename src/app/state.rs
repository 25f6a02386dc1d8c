use super::LifecycleOrchestrator;
use crate::host::ComponentHostStatus;
use crate::state::State;

impl LifecycleOrchestrator {
    /// Get one component host's status
    pub fn status(&self, component: &str, host: &str) -> Option<ComponentHostStatus> {
        self.entity(component, host)
            .ok()
            .and_then(|entity| entity.lock().as_ref().map(|host| host.snapshot()))
    }

    /// Get every component host's status, ordered by component then host
    pub fn statuses(&self) -> Vec<ComponentHostStatus> {
        let entities: Vec<_> = self.hosts.read().values().cloned().collect();
        let mut statuses: Vec<_> = entities
            .iter()
            .filter_map(|entity| entity.lock().as_ref().map(|host| host.snapshot()))
            .collect();
        statuses.sort_by(|a, b| (&a.component, &a.host).cmp(&(&b.component, &b.host)));
        statuses
    }

    /// Component hosts currently in `state`
    pub fn hosts_in_state(&self, state: State) -> Vec<ComponentHostStatus> {
        self.statuses()
            .into_iter()
            .filter(|status| status.state == state)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.hosts.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.read().is_empty()
    }
}
