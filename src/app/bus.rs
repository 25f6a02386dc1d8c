use super::types::LifecycleNotice;
use crate::error::EventBusError;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// Broadcast channel carrying lifecycle notices to any number of observers
pub struct EventBus {
    sender: broadcast::Sender<LifecycleNotice>,
    debug_logging: bool,
}

impl EventBus {
    /// Create a new event bus with the specified channel capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            debug_logging: false,
        }
    }

    /// Create a new event bus with debug logging enabled
    pub fn with_debug_logging(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            debug_logging: true,
        }
    }

    /// Subscribe to notices and get a receiver
    pub fn subscribe(&self) -> broadcast::Receiver<LifecycleNotice> {
        self.sender.subscribe()
    }

    /// Publish a notice to all subscribers
    ///
    /// Never blocks; slow subscribers observe `Lagged` instead.
    pub fn publish(&self, notice: LifecycleNotice) -> Result<usize, EventBusError> {
        if self.debug_logging {
            debug!("Publishing notice: {}", notice.description());
        }

        match &notice {
            LifecycleNotice::Rejected { .. } => {
                warn!("{}", notice.description());
            }
            LifecycleNotice::Registered { .. } | LifecycleNotice::Removed { .. } => {
                info!("{}", notice.description());
            }
            LifecycleNotice::Transitioned { .. } => {}
        }

        self.sender
            .send(notice)
            .map_err(|e| EventBusError::PublishFailed {
                details: e.to_string(),
            })
    }

    /// Get the number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Check if there are any active subscribers
    pub fn has_subscribers(&self) -> bool {
        self.sender.receiver_count() > 0
    }
}

/// Notice filter for selective handling
#[derive(Debug, Clone)]
pub enum NoticeFilter {
    /// Accept all notices
    All,
    /// Accept only specific notice types
    NoticeTypes(Vec<&'static str>),
    /// Accept notices about specific components
    Components(Vec<String>),
    /// Accept notices about specific hosts
    Hosts(Vec<String>),
    /// Custom filter function
    Custom(fn(&LifecycleNotice) -> bool),
}

impl NoticeFilter {
    /// Check if a notice passes this filter
    pub fn matches(&self, notice: &LifecycleNotice) -> bool {
        match self {
            NoticeFilter::All => true,
            NoticeFilter::NoticeTypes(types) => types.contains(&notice.notice_type()),
            NoticeFilter::Components(components) => {
                components.iter().any(|c| c == notice.component())
            }
            NoticeFilter::Hosts(hosts) => hosts.iter().any(|h| h == notice.host()),
            NoticeFilter::Custom(filter_fn) => filter_fn(notice),
        }
    }
}

/// Notice receiver with filtering
pub struct NoticeReceiver {
    receiver: broadcast::Receiver<LifecycleNotice>,
    filter: NoticeFilter,
    name: String,
}

impl NoticeReceiver {
    /// Create a new notice receiver with a filter
    pub fn new(
        receiver: broadcast::Receiver<LifecycleNotice>,
        filter: NoticeFilter,
        name: String,
    ) -> Self {
        Self {
            receiver,
            filter,
            name,
        }
    }

    /// Receive the next notice that passes the filter
    pub async fn recv(&mut self) -> Result<LifecycleNotice, EventBusError> {
        loop {
            match self.receiver.recv().await {
                Ok(notice) => {
                    if self.filter.matches(&notice) {
                        debug!(
                            "Receiver '{}' received notice: {}",
                            self.name,
                            notice.description()
                        );
                        return Ok(notice);
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!("Receiver '{}' lagged behind by {} notices", self.name, n);
                    return Err(EventBusError::Lagged { skipped: n });
                }
                Err(broadcast::error::RecvError::Closed) => {
                    debug!("Event bus closed for receiver '{}'", self.name);
                    return Err(EventBusError::ChannelClosed);
                }
            }
        }
    }

    /// Try to receive a notice without blocking
    pub fn try_recv(&mut self) -> Result<Option<LifecycleNotice>, EventBusError> {
        loop {
            match self.receiver.try_recv() {
                Ok(notice) => {
                    if self.filter.matches(&notice) {
                        return Ok(Some(notice));
                    }
                }
                Err(broadcast::error::TryRecvError::Empty) => {
                    return Ok(None);
                }
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    warn!("Receiver '{}' lagged behind by {} notices", self.name, n);
                    return Err(EventBusError::Lagged { skipped: n });
                }
                Err(broadcast::error::TryRecvError::Closed) => {
                    debug!("Event bus closed for receiver '{}'", self.name);
                    return Err(EventBusError::ChannelClosed);
                }
            }
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
