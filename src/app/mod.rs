mod bus;
mod dispatch;
mod orchestrator;
mod state;
mod types;


pub use bus::{EventBus, NoticeFilter, NoticeReceiver};
pub use orchestrator::{HostKey, LifecycleOrchestrator};
pub use types::{LifecycleNotice, RejectedEvent, ReplaySummary};
