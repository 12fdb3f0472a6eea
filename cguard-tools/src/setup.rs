//! Default tool registration driven by configuration.

use cguard_core::config::GuardConfig;
use cguard_core::error::ToolError;
use std::sync::Arc;
use tracing::{info, warn};

use crate::analysis::{GapAnalyzerTool, PolicyAnalyzerTool, RiskEngineTool};
use crate::reference::{FrameworkCatalogTool, RegulationDbTool, RegulatorySearchTool};
use crate::registry::{Tool, ToolRegistry};
use crate::reporting::{AuditTrailTool, ReportFormatterTool};

fn builtin_tools() -> Vec<Arc<dyn Tool>> {
    vec![
        Arc::new(GapAnalyzerTool),
        Arc::new(RiskEngineTool),
        Arc::new(PolicyAnalyzerTool),
        Arc::new(RegulationDbTool),
        Arc::new(FrameworkCatalogTool),
        Arc::new(RegulatorySearchTool),
        Arc::new(AuditTrailTool),
        Arc::new(ReportFormatterTool),
    ]
}

fn tool_enabled(config: &GuardConfig, name: &str) -> bool {
    config
        .tools
        .get(name)
        .map(|settings| settings.enabled)
        .unwrap_or(true)
}

/// Build a registry with every built-in tool, honoring per-tool config.
/// A tool is skipped only when its config entry disables it.
pub fn default_registry(config: &GuardConfig) -> Result<ToolRegistry, ToolError> {
    let mut registry = ToolRegistry::new();
    for tool in builtin_tools() {
        if tool_enabled(config, tool.name()) {
            registry.register(tool)?;
        } else {
            info!(tool = %tool.name(), "Tool disabled by configuration");
        }
    }
    Ok(registry)
}

/// Build a registry restricted to the tools an agent is configured to use,
/// still honoring per-tool disable overrides.
pub fn registry_for_agent(config: &GuardConfig, agent: &str) -> Result<ToolRegistry, ToolError> {
    let allowed = config
        .agents
        .get(agent)
        .map(|settings| settings.tools.clone())
        .unwrap_or_default();

    let mut registry = ToolRegistry::new();
    for tool in builtin_tools() {
        if !allowed.iter().any(|name| name == tool.name()) {
            continue;
        }
        if tool_enabled(config, tool.name()) {
            registry.register(tool)?;
        } else {
            info!(tool = %tool.name(), agent = %agent, "Tool disabled by configuration");
        }
    }

    for name in &allowed {
        if registry.get(name).is_none() && tool_enabled(config, name) {
            warn!(tool = %name, agent = %agent, "Configured tool has no registered implementation");
        }
    }
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cguard_core::config::ToolSettings;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_all_default_tools_registered() {
        let registry = default_registry(&GuardConfig::default()).unwrap();
        assert_eq!(registry.len(), 8);
        for name in [
            "gap_analyzer",
            "risk_engine",
            "policy_analyzer",
            "regulation_db",
            "framework_catalog",
            "regulatory_search",
            "audit_trail",
            "report_formatter",
        ] {
            assert!(registry.get(name).is_some(), "missing tool: {name}");
        }
    }

    #[test]
    fn test_disabled_tool_skipped() {
        let mut config = GuardConfig::default();
        config.tools.insert(
            "regulatory_search".into(),
            ToolSettings {
                enabled: false,
                ..Default::default()
            },
        );

        let registry = default_registry(&config).unwrap();
        assert_eq!(registry.len(), 7);
        assert!(registry.get("regulatory_search").is_none());
    }

    #[test]
    fn test_agent_registry_limited_to_configured_tools() {
        let registry = registry_for_agent(&GuardConfig::default(), "risk_assessor").unwrap();
        assert_eq!(registry.len(), 2);
        assert!(registry.get("risk_engine").is_some());
        assert!(registry.get("framework_catalog").is_some());
        assert!(registry.get("gap_analyzer").is_none());
    }

    #[test]
    fn test_agent_registry_honors_tool_disable() {
        let mut config = GuardConfig::default();
        config.tools.insert(
            "risk_engine".into(),
            ToolSettings {
                enabled: false,
                ..Default::default()
            },
        );

        let registry = registry_for_agent(&config, "risk_assessor").unwrap();
        assert!(registry.get("risk_engine").is_none());
        assert!(registry.get("framework_catalog").is_some());
    }

    #[test]
    fn test_unknown_agent_gets_empty_registry() {
        let registry = registry_for_agent(&GuardConfig::default(), "unknown_agent").unwrap();
        assert!(registry.is_empty());
    }
}
