pub mod app;
pub mod config;
pub mod error;
pub mod events;
pub mod host;
pub mod script;
pub mod state;
pub mod transition;

pub use app::{
    EventBus, HostKey, LifecycleNotice, LifecycleOrchestrator, NoticeFilter, NoticeReceiver,
    RejectedEvent, ReplaySummary,
};
pub use config::{ComphostConfig, ComponentHostSpec};
pub use error::{ComphostError, EventBusError, Result};
pub use events::{ComponentHostEvent, EventKind};
pub use host::{ComponentHostStatus, ServiceComponentHost};
pub use script::EventScript;
pub use state::{ComponentVariant, OperationKind, State};
pub use transition::{OperationTimes, TimestampAction, UNSET_TIMESTAMP};
