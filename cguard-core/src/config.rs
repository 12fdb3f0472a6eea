//! Configuration system for ComplianceGuard.
//!
//! Uses `figment` for layered configuration: defaults -> YAML config file ->
//! `CGUARD_` environment variables. The config file is `config.yaml` in the
//! working directory by default, matching the deployment layout.

use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Top-level configuration for the ComplianceGuard system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardConfig {
    pub compliance: ComplianceConfig,
    pub agents: AgentsConfig,
    pub memory: MemoryConfig,
    pub session: SessionConfig,
    pub monitoring: MonitoringConfig,
    /// Per-tool overrides keyed by tool name.
    #[serde(default)]
    pub tools: HashMap<String, ToolSettings>,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            compliance: ComplianceConfig::default(),
            agents: AgentsConfig::default(),
            memory: MemoryConfig::default(),
            session: SessionConfig::default(),
            monitoring: MonitoringConfig::default(),
            tools: HashMap::new(),
        }
    }
}

/// Which regulations the system checks against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceConfig {
    pub regulations: Vec<String>,
}

impl Default for ComplianceConfig {
    fn default() -> Self {
        Self {
            regulations: vec!["GDPR".into(), "HIPAA".into(), "SOX".into()],
        }
    }
}

/// Settings for one agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSettings {
    /// Model identifier retained as agent metadata.
    pub model: String,
    /// Whether the agent participates in workflows.
    pub enabled: bool,
    /// Tools this agent is allowed to use, by registry name.
    #[serde(default)]
    pub tools: Vec<String>,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            model: "gemini-2.0-flash-exp".into(),
            enabled: true,
            tools: Vec::new(),
        }
    }
}

/// Settings for each of the four workflow agents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentsConfig {
    #[serde(default = "default_monitor_settings")]
    pub regulation_monitor: AgentSettings,
    #[serde(default = "default_analyzer_settings")]
    pub compliance_analyzer: AgentSettings,
    #[serde(default = "default_assessor_settings")]
    pub risk_assessor: AgentSettings,
    #[serde(default = "default_reporter_settings")]
    pub report_generator: AgentSettings,
}

fn agent_settings_with_tools(tools: &[&str]) -> AgentSettings {
    AgentSettings {
        tools: tools.iter().map(|t| t.to_string()).collect(),
        ..AgentSettings::default()
    }
}

fn default_monitor_settings() -> AgentSettings {
    agent_settings_with_tools(&["regulatory_search", "regulation_db"])
}

fn default_analyzer_settings() -> AgentSettings {
    agent_settings_with_tools(&["gap_analyzer", "policy_analyzer", "regulation_db"])
}

fn default_assessor_settings() -> AgentSettings {
    agent_settings_with_tools(&["risk_engine", "framework_catalog"])
}

fn default_reporter_settings() -> AgentSettings {
    agent_settings_with_tools(&["report_formatter", "audit_trail"])
}

impl Default for AgentsConfig {
    fn default() -> Self {
        Self {
            regulation_monitor: default_monitor_settings(),
            compliance_analyzer: default_analyzer_settings(),
            risk_assessor: default_assessor_settings(),
            report_generator: default_reporter_settings(),
        }
    }
}

impl AgentsConfig {
    /// Look up settings by agent name.
    pub fn get(&self, name: &str) -> Option<&AgentSettings> {
        match name {
            "regulation_monitor" => Some(&self.regulation_monitor),
            "compliance_analyzer" => Some(&self.compliance_analyzer),
            "risk_assessor" => Some(&self.risk_assessor),
            "report_generator" => Some(&self.report_generator),
            _ => None,
        }
    }
}

/// Memory bank settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Total entries across all companies before compaction runs.
    pub max_entries: usize,
    /// Entries kept per company after compaction (most recent).
    pub retained_per_company: usize,
    /// Directory for persisted memory data. None uses the platform data dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            max_entries: 10_000,
            retained_per_company: 50,
            data_dir: None,
        }
    }
}

/// Session manager settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Minutes of inactivity before a session is expired.
    pub timeout_minutes: u64,
    /// Maximum concurrently active sessions.
    pub max_sessions: usize,
    /// Seconds between expiry sweeps.
    pub cleanup_interval_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timeout_minutes: 60,
            max_sessions: 1000,
            cleanup_interval_secs: 300,
        }
    }
}

/// Continuous monitoring settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    /// Seconds between regulatory change checks.
    pub polling_interval_secs: u64,
    /// Seconds to wait after a monitoring error before retrying.
    pub error_backoff_secs: u64,
    /// How far ahead (days) a pending change must be to be reported.
    pub change_horizon_days: i64,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            polling_interval_secs: 3600,
            error_backoff_secs: 300,
            change_horizon_days: 90,
        }
    }
}

/// Per-tool configuration overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    #[serde(default = "default_tool_enabled")]
    pub enabled: bool,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            timeout_secs: None,
            enabled: true,
        }
    }
}

fn default_tool_enabled() -> bool {
    true
}

impl GuardConfig {
    /// Load configuration: defaults, then the given YAML file (if it exists),
    /// then `CGUARD_` environment variables. Nested keys split on `__` so
    /// snake_case field names stay addressable, e.g.
    /// `CGUARD_MONITORING__POLLING_INTERVAL_SECS=120`.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(GuardConfig::default()));

        if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::FileNotFound {
                    path: path.to_path_buf(),
                });
            }
            figment = figment.merge(Yaml::file(path));
        } else {
            // Optional default location; absence is fine.
            figment = figment.merge(Yaml::file("config.yaml"));
        }

        let config: GuardConfig = figment
            .merge(Env::prefixed("CGUARD_").split("__"))
            .extract()
            .map_err(|e| ConfigError::ParseError {
                message: e.to_string(),
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate invariants that figment cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.compliance.regulations.is_empty() {
            return Err(ConfigError::MissingField {
                field: "compliance.regulations".into(),
            });
        }
        if self.monitoring.polling_interval_secs == 0 {
            return Err(ConfigError::Invalid {
                message: "monitoring.polling_interval_secs must be greater than zero".into(),
            });
        }
        if self.session.timeout_minutes == 0 {
            return Err(ConfigError::Invalid {
                message: "session.timeout_minutes must be greater than zero".into(),
            });
        }
        if self.memory.max_entries == 0 {
            return Err(ConfigError::Invalid {
                message: "memory.max_entries must be greater than zero".into(),
            });
        }
        Ok(())
    }

    /// Resolve the memory data directory, falling back to the platform data dir.
    pub fn memory_data_dir(&self) -> PathBuf {
        if let Some(ref dir) = self.memory.data_dir {
            return dir.clone();
        }
        directories::ProjectDirs::from("io", "complianceguard", "cguard")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from(".cguard"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_valid() {
        let config = GuardConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.compliance.regulations, vec!["GDPR", "HIPAA", "SOX"]);
        assert_eq!(config.monitoring.polling_interval_secs, 3600);
        assert_eq!(config.session.timeout_minutes, 60);
    }

    #[test]
    fn test_empty_regulations_rejected() {
        let mut config = GuardConfig::default();
        config.compliance.regulations.clear();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::MissingField { .. }));
    }

    #[test]
    fn test_zero_polling_interval_rejected() {
        let mut config = GuardConfig::default();
        config.monitoring.polling_interval_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_missing_explicit_file_errors() {
        let result = GuardConfig::load(Some(Path::new("/nonexistent/config.yaml")));
        assert!(matches!(result, Err(ConfigError::FileNotFound { .. })));
    }

    #[test]
    fn test_load_yaml_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "compliance:\n  regulations: [\"GDPR\"]\nmonitoring:\n  polling_interval_secs: 120"
        )
        .unwrap();

        let config = GuardConfig::load(Some(&path)).unwrap();
        assert_eq!(config.compliance.regulations, vec!["GDPR"]);
        assert_eq!(config.monitoring.polling_interval_secs, 120);
        // Untouched sections keep defaults
        assert_eq!(config.session.max_sessions, 1000);
    }

    #[test]
    fn test_env_override_reaches_snake_case_fields() {
        // error_backoff_secs is not touched by any other config test, so the
        // temporary variable cannot race a concurrent load.
        std::env::set_var("CGUARD_MONITORING__ERROR_BACKOFF_SECS", "45");
        let config = GuardConfig::load(None).unwrap();
        std::env::remove_var("CGUARD_MONITORING__ERROR_BACKOFF_SECS");

        assert_eq!(config.monitoring.error_backoff_secs, 45);
        // Untouched snake_case fields keep defaults.
        assert_eq!(config.monitoring.polling_interval_secs, 3600);
    }

    #[test]
    fn test_agents_config_lookup() {
        let config = GuardConfig::default();
        assert!(config.agents.get("regulation_monitor").is_some());
        assert!(config.agents.get("report_generator").is_some());
        assert!(config.agents.get("unknown_agent").is_none());
    }

    #[test]
    fn test_agent_settings_defaults() {
        let settings = AgentSettings::default();
        assert!(settings.enabled);
        assert!(settings.tools.is_empty());
    }

    #[test]
    fn test_agents_have_default_tool_lists() {
        let agents = AgentsConfig::default();
        assert!(agents
            .compliance_analyzer
            .tools
            .contains(&"gap_analyzer".to_string()));
        assert!(agents.risk_assessor.tools.contains(&"risk_engine".to_string()));
        assert!(agents
            .report_generator
            .tools
            .contains(&"report_formatter".to_string()));
        assert!(agents
            .regulation_monitor
            .tools
            .contains(&"regulatory_search".to_string()));
    }
}
