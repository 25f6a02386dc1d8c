//! Event scripts replayed by the command line tool
//!
//! ```toml
//! [[events]]
//! component = "datanode"
//! host = "h1"
//! kind = "INSTALL"
//! timestamp = 1
//! ```
//!
//! Entries without a timestamp are stamped with the current time when loaded.

use crate::error::Result;
use crate::events::{ComponentHostEvent, EventKind};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Deserialize)]
pub struct ScriptEntry {
    pub component: String,
    pub host: String,
    pub kind: EventKind,
    pub timestamp: Option<i64>,
}

impl ScriptEntry {
    pub fn into_event(self) -> ComponentHostEvent {
        match self.timestamp {
            Some(timestamp) => ComponentHostEvent::new(self.kind, self.component, self.host, timestamp),
            None => ComponentHostEvent::now(self.kind, self.component, self.host),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventScript {
    #[serde(default)]
    pub events: Vec<ScriptEntry>,
}

impl EventScript {
    pub fn parse(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        debug!("Loading event script from: {}", path.as_ref().display());
        let source = std::fs::read_to_string(path)?;
        Self::parse(&source)
    }

    pub fn into_events(self) -> Vec<ComponentHostEvent> {
        self.events
            .into_iter()
            .map(ScriptEntry::into_event)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ComphostError;
    use std::io::Write;

    #[test]
    fn test_parse_script() {
        let script = EventScript::parse(
            r#"
[[events]]
component = "datanode"
host = "h1"
kind = "INSTALL"
timestamp = 1

[[events]]
component = "datanode"
host = "h1"
kind = "IN_PROGRESS"
timestamp = 2
"#,
        )
        .unwrap();

        let events = script.into_events();
        assert_eq!(
            events,
            vec![
                ComponentHostEvent::new(EventKind::Install, "datanode", "h1", 1),
                ComponentHostEvent::new(EventKind::InProgress, "datanode", "h1", 2),
            ]
        );
    }

    #[test]
    fn test_missing_timestamp_uses_current_time() {
        let before = chrono::Utc::now().timestamp_millis();
        let script = EventScript::parse(
            r#"
[[events]]
component = "hdfs_client"
host = "h3"
kind = "UNINSTALL"
"#,
        )
        .unwrap();

        let events = script.into_events();
        assert_eq!(events.len(), 1);
        assert!(events[0].timestamp() >= before);
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let result = EventScript::parse(
            r#"
[[events]]
component = "datanode"
host = "h1"
kind = "REBOOT"
"#,
        );
        assert!(matches!(result, Err(ComphostError::Deserialization(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[[events]]\ncomponent = \"datanode\"\nhost = \"h1\"\nkind = \"WIPEOUT\"\ntimestamp = 9"
        )
        .unwrap();

        let script = EventScript::load_from_file(file.path()).unwrap();
        assert_eq!(script.events.len(), 1);
        assert_eq!(script.events[0].kind, EventKind::Wipeout);

        let missing = EventScript::load_from_file(file.path().with_extension("missing"));
        assert!(matches!(missing, Err(ComphostError::Io(_))));
    }

    #[test]
    fn test_empty_script() {
        assert!(EventScript::parse("").unwrap().into_events().is_empty());
    }
}
