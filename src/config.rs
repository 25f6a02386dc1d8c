use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ComphostConfig {
    pub orchestrator: OrchestratorConfig,
    pub logging: LoggingConfig,

    /// Component hosts registered at startup
    #[serde(default)]
    pub hosts: Vec<ComponentHostSpec>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct OrchestratorConfig {
    /// Capacity of the lifecycle notice broadcast channel
    #[serde(default = "default_event_bus_capacity")]
    pub event_bus_capacity: usize,

    /// Log every published notice at debug level
    #[serde(default = "default_debug_events")]
    pub debug_events: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct LoggingConfig {
    /// Directory for rolling log files; stdout only when unset
    #[serde(default)]
    pub directory: Option<String>,

    /// File name prefix for rolling log files
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ComponentHostSpec {
    pub component: String,
    pub host: String,

    /// Client components never start or stop
    #[serde(default)]
    pub client: bool,
}

impl ComphostConfig {
    /// Load configuration from default sources (file + environment variables)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_file("comphost.toml")
    }

    /// Load configuration from a specific file path
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_str = path.as_ref().to_string_lossy();
        debug!("Loading configuration from: {}", path_str);

        let settings = Config::builder()
            .set_default(
                "orchestrator.event_bus_capacity",
                default_event_bus_capacity() as i64,
            )?
            .set_default("orchestrator.debug_events", default_debug_events())?
            .set_default("logging.file_prefix", default_file_prefix())?
            .add_source(File::with_name(&path_str).required(false))
            // COMPHOST_ORCHESTRATOR__EVENT_BUS_CAPACITY=512
            .add_source(
                Environment::with_prefix("COMPHOST")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: ComphostConfig = settings.try_deserialize()?;

        info!("Configuration loaded successfully");
        debug!("Final configuration: {:#?}", config);

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.orchestrator.event_bus_capacity == 0 {
            return Err(ConfigError::Message(
                "Event bus capacity must be greater than 0".to_string(),
            ));
        }

        if self.logging.file_prefix.trim().is_empty() {
            return Err(ConfigError::Message(
                "Log file prefix must not be empty".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for spec in &self.hosts {
            if spec.component.trim().is_empty() || spec.host.trim().is_empty() {
                return Err(ConfigError::Message(
                    "Component and host names must not be empty".to_string(),
                ));
            }
            if !seen.insert((spec.component.as_str(), spec.host.as_str())) {
                return Err(ConfigError::Message(format!(
                    "Component {} is listed twice for host {}",
                    spec.component, spec.host
                )));
            }
        }

        Ok(())
    }
}

impl Default for ComphostConfig {
    fn default() -> Self {
        Self {
            orchestrator: OrchestratorConfig::default(),
            logging: LoggingConfig {
                directory: None,
                file_prefix: default_file_prefix(),
            },
            hosts: Vec::new(),
        }
    }
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            event_bus_capacity: default_event_bus_capacity(),
            debug_events: default_debug_events(),
        }
    }
}

// Default value functions
fn default_event_bus_capacity() -> usize {
    256
}
fn default_debug_events() -> bool {
    false
}
fn default_file_prefix() -> String {
    "comphost.log".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::io::Write;

    fn spec(component: &str, host: &str, client: bool) -> ComponentHostSpec {
        ComponentHostSpec {
            component: component.to_string(),
            host: host.to_string(),
            client,
        }
    }

    #[test]
    fn test_default_config() {
        let config = ComphostConfig::default();
        assert_eq!(config.orchestrator.event_bus_capacity, 256);
        assert!(!config.orchestrator.debug_events);
        assert!(config.logging.directory.is_none());
        assert!(config.hosts.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ComphostConfig::load_from_file(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.orchestrator.event_bus_capacity, 256);
        assert_eq!(config.logging.file_prefix, "comphost.log");
        assert!(config.hosts.is_empty());
    }

    #[test]
    fn test_load_hosts_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(
            file,
            r#"
[orchestrator]
event_bus_capacity = 32

[logging]
directory = "/var/log/comphost"

[[hosts]]
component = "datanode"
host = "h1"

[[hosts]]
component = "hdfs_client"
host = "h1"
client = true
"#
        )
        .unwrap();

        let config = ComphostConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.orchestrator.event_bus_capacity, 32);
        assert_eq!(config.logging.directory.as_deref(), Some("/var/log/comphost"));
        assert_eq!(
            config.hosts,
            vec![spec("datanode", "h1", false), spec("hdfs_client", "h1", true)]
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_environment_variable_override() {
        env::set_var("COMPHOST_ORCHESTRATOR__DEBUG_EVENTS", "true");

        let dir = tempfile::tempdir().unwrap();
        let config = ComphostConfig::load_from_file(dir.path().join("absent.toml"));

        env::remove_var("COMPHOST_ORCHESTRATOR__DEBUG_EVENTS");

        assert!(config.unwrap().orchestrator.debug_events);
    }

    #[test]
    fn test_config_validation() {
        let mut config = ComphostConfig::default();
        config.orchestrator.event_bus_capacity = 0;
        assert!(config.validate().is_err());

        config.orchestrator.event_bus_capacity = 8;
        config.hosts = vec![spec("datanode", "h1", false), spec("datanode", "h2", false)];
        assert!(config.validate().is_ok());

        config.hosts.push(spec("datanode", "h1", true));
        assert!(config.validate().is_err());

        config.hosts = vec![spec("", "h1", false)];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_config_serializes_to_toml() {
        let rendered = toml::to_string_pretty(&ComphostConfig::default()).unwrap();
        assert!(rendered.contains("event_bus_capacity = 256"));
        assert!(rendered.contains("file_prefix = \"comphost.log\""));
    }
}
