//! Regulation Monitor Agent — tracks regulatory requirements and changes.
//!
//! Fetches catalog records for every configured regulation concurrently;
//! per-regulation failures are recorded in the snapshot without aborting
//! the batch. Change detection reports pending changes from the catalog
//! feed whose effective date falls within the configured horizon.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{error, info};

use crate::catalog;
use crate::config::{AgentSettings, MonitoringConfig};
use crate::error::AgentError;
use crate::metrics::AgentMetrics;
use crate::types::Severity;

/// Fetched requirements for one regulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegulationData {
    pub regulation: String,
    pub full_name: String,
    pub jurisdiction: String,
    pub last_updated: String,
    pub source: String,
    pub version: String,
    pub key_requirements: Vec<String>,
    pub compliance_deadline: String,
}

/// Outcome of fetching one regulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum RegulationFetch {
    Success { data: RegulationData },
    Failed { error: String },
}

impl RegulationFetch {
    pub fn is_success(&self) -> bool {
        matches!(self, RegulationFetch::Success { .. })
    }

    pub fn data(&self) -> Option<&RegulationData> {
        match self {
            RegulationFetch::Success { data } => Some(data),
            RegulationFetch::Failed { .. } => None,
        }
    }
}

/// The full regulatory snapshot produced by one gather pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegulatorySnapshot {
    pub regulatory_data: BTreeMap<String, RegulationFetch>,
    pub timestamp: DateTime<Utc>,
    pub sources_checked: usize,
    pub successful_fetches: usize,
}

impl RegulatorySnapshot {
    /// Names of regulations that fetched successfully.
    pub fn successful_regulations(&self) -> Vec<&str> {
        self.regulatory_data
            .iter()
            .filter(|(_, fetch)| fetch.is_success())
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

/// One detected regulatory change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegulatoryChange {
    pub regulation: String,
    pub change_type: String,
    pub description: String,
    pub impact_level: Severity,
    pub effective_date: NaiveDate,
    pub action_required: bool,
}

/// Result of a change-detection pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegulatoryChanges {
    pub has_changes: bool,
    pub changes: Vec<RegulatoryChange>,
    pub checked_regulations: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

/// Monitors regulatory requirements across the configured regulations.
pub struct RegulationMonitorAgent {
    settings: AgentSettings,
    monitoring: MonitoringConfig,
    regulations: Vec<String>,
    last_check: Option<DateTime<Utc>>,
    metrics: AgentMetrics,
}

impl RegulationMonitorAgent {
    pub fn new(
        settings: AgentSettings,
        monitoring: MonitoringConfig,
        regulations: Vec<String>,
    ) -> Self {
        Self {
            settings,
            monitoring,
            regulations,
            last_check: None,
            metrics: AgentMetrics::new(),
        }
    }

    /// Gather current regulatory requirements for all configured regulations.
    pub async fn gather_regulatory_data(&mut self) -> Result<RegulatorySnapshot, AgentError> {
        info!(
            sources = self.regulations.len(),
            model = %self.settings.model,
            "Gathering regulatory data"
        );
        self.metrics.record_request();

        let fetches = futures::future::join_all(
            self.regulations
                .iter()
                .map(|regulation| Self::fetch_regulation_data(regulation.clone())),
        )
        .await;

        let mut regulatory_data = BTreeMap::new();
        for (regulation, result) in self.regulations.iter().zip(fetches) {
            match result {
                Ok(data) => {
                    regulatory_data.insert(regulation.clone(), RegulationFetch::Success { data });
                }
                Err(e) => {
                    error!(regulation = %regulation, error = %e, "Regulation fetch failed");
                    self.metrics.record_error();
                    regulatory_data.insert(
                        regulation.clone(),
                        RegulationFetch::Failed {
                            error: e.to_string(),
                        },
                    );
                }
            }
        }

        let now = Utc::now();
        self.last_check = Some(now);

        let successful_fetches = regulatory_data.values().filter(|f| f.is_success()).count();
        info!(
            successful = successful_fetches,
            checked = self.regulations.len(),
            "Regulatory data gathered"
        );

        Ok(RegulatorySnapshot {
            sources_checked: regulatory_data.len(),
            successful_fetches,
            regulatory_data,
            timestamp: now,
        })
    }

    /// Fetch the catalog record for one regulation. Regulations without a
    /// catalog record get a generic entry so downstream analysis still runs
    /// against the fallback requirement set.
    async fn fetch_regulation_data(regulation: String) -> Result<RegulationData, AgentError> {
        if regulation.trim().is_empty() {
            return Err(AgentError::RegulationFetch {
                regulation,
                message: "regulation name is empty".into(),
            });
        }

        match catalog::regulation(&regulation) {
            Some(info) => Ok(RegulationData {
                regulation: info.name.to_string(),
                full_name: info.full_name.to_string(),
                jurisdiction: info.jurisdiction.to_string(),
                last_updated: info.last_updated.to_string(),
                source: "ComplianceGuard Regulatory Database".into(),
                version: "2025.1".into(),
                key_requirements: info.key_requirements.iter().map(|s| s.to_string()).collect(),
                compliance_deadline: info.compliance_deadline.to_string(),
            }),
            None => Ok(RegulationData {
                regulation: regulation.to_uppercase(),
                full_name: format!("General compliance requirements for {}", regulation),
                jurisdiction: "Multiple".into(),
                last_updated: Utc::now().format("%Y-%m-%d").to_string(),
                source: "ComplianceGuard Regulatory Database".into(),
                version: "2025.1".into(),
                key_requirements: Vec::new(),
                compliance_deadline: "To be determined".into(),
            }),
        }
    }

    /// Check the catalog feed for regulatory changes effective within the
    /// configured horizon.
    pub async fn detect_regulatory_changes(&mut self) -> Result<RegulatoryChanges, AgentError> {
        info!(
            horizon_days = self.monitoring.change_horizon_days,
            "Checking for regulatory changes"
        );
        self.metrics.record_request();

        let today = Utc::now().date_naive();
        let horizon = self.monitoring.change_horizon_days;

        let mut changes = Vec::new();
        for regulation in &self.regulations {
            let Some(info) = catalog::regulation(regulation) else {
                continue;
            };
            for pending in info.pending_changes {
                if pending.effective_in_days <= horizon {
                    changes.push(RegulatoryChange {
                        regulation: info.name.to_string(),
                        change_type: pending.change_type.to_string(),
                        description: pending.description.to_string(),
                        impact_level: pending.impact_level,
                        effective_date: today + Duration::days(pending.effective_in_days),
                        action_required: pending.action_required,
                    });
                }
            }
        }

        if !changes.is_empty() {
            info!(count = changes.len(), "Detected regulatory changes");
        }

        Ok(RegulatoryChanges {
            has_changes: !changes.is_empty(),
            changes,
            checked_regulations: self.regulations.clone(),
            timestamp: Utc::now(),
        })
    }

    /// When the agent last gathered data.
    pub fn last_check(&self) -> Option<DateTime<Utc>> {
        self.last_check
    }

    pub fn metrics(&self) -> &AgentMetrics {
        &self.metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_agent(regulations: Vec<&str>) -> RegulationMonitorAgent {
        RegulationMonitorAgent::new(
            AgentSettings::default(),
            MonitoringConfig::default(),
            regulations.into_iter().map(String::from).collect(),
        )
    }

    #[tokio::test]
    async fn test_gather_all_known_regulations() {
        let mut agent = test_agent(vec!["GDPR", "HIPAA", "SOX"]);
        let snapshot = agent.gather_regulatory_data().await.unwrap();

        assert_eq!(snapshot.sources_checked, 3);
        assert_eq!(snapshot.successful_fetches, 3);
        assert!(agent.last_check().is_some());

        let gdpr = snapshot.regulatory_data.get("GDPR").unwrap();
        let data = gdpr.data().unwrap();
        assert_eq!(data.full_name, "General Data Protection Regulation");
        assert_eq!(data.jurisdiction, "European Union");
    }

    #[tokio::test]
    async fn test_gather_unknown_regulation_gets_generic_entry() {
        let mut agent = test_agent(vec!["CCPA"]);
        let snapshot = agent.gather_regulatory_data().await.unwrap();

        assert_eq!(snapshot.successful_fetches, 1);
        let data = snapshot.regulatory_data.get("CCPA").unwrap().data().unwrap();
        assert_eq!(data.jurisdiction, "Multiple");
        assert!(data.full_name.contains("CCPA"));
    }

    #[tokio::test]
    async fn test_gather_empty_name_recorded_as_failed() {
        let mut agent = test_agent(vec!["GDPR", "  "]);
        let snapshot = agent.gather_regulatory_data().await.unwrap();

        assert_eq!(snapshot.sources_checked, 2);
        assert_eq!(snapshot.successful_fetches, 1);
        assert_eq!(agent.metrics().errors, 1);
        assert!(!snapshot.regulatory_data.get("  ").unwrap().is_success());
    }

    #[tokio::test]
    async fn test_detect_changes_within_horizon() {
        let mut agent = test_agent(vec!["GDPR", "HIPAA", "SOX"]);
        let changes = agent.detect_regulatory_changes().await.unwrap();

        // GDPR (+21d) and SOX (+45d) fall inside the 90 day default horizon,
        // HIPAA (+120d) does not.
        assert!(changes.has_changes);
        let regs: Vec<&str> = changes.changes.iter().map(|c| c.regulation.as_str()).collect();
        assert!(regs.contains(&"GDPR"));
        assert!(regs.contains(&"SOX"));
        assert!(!regs.contains(&"HIPAA"));
    }

    #[tokio::test]
    async fn test_detect_changes_narrow_horizon() {
        let monitoring = MonitoringConfig {
            change_horizon_days: 7,
            ..Default::default()
        };
        let mut agent = RegulationMonitorAgent::new(
            AgentSettings::default(),
            monitoring,
            vec!["GDPR".into(), "SOX".into()],
        );

        let changes = agent.detect_regulatory_changes().await.unwrap();
        assert!(!changes.has_changes);
        assert!(changes.changes.is_empty());
    }

    #[tokio::test]
    async fn test_successful_regulations_helper() {
        let mut agent = test_agent(vec!["GDPR", ""]);
        let snapshot = agent.gather_regulatory_data().await.unwrap();
        assert_eq!(snapshot.successful_regulations(), vec!["GDPR"]);
    }
}
