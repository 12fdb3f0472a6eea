//! Fundamental types for the ComplianceGuard domain model.
//!
//! Company profiles are the input to a compliance check; gaps,
//! recommendations, and the score-band enums are shared across the
//! analyzer, risk, and reporter agents.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Severity of a compliance gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// Priority of a recommendation or mitigation strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

/// Risk level derived from a 0-100 compliance score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Map a compliance score to a risk level.
    pub fn from_compliance_score(score: u32) -> Self {
        if score >= 90 {
            RiskLevel::Low
        } else if score >= 75 {
            RiskLevel::Medium
        } else if score >= 60 {
            RiskLevel::High
        } else {
            RiskLevel::Critical
        }
    }

    /// Map a 0-100 risk score (higher is riskier) to a risk level.
    pub fn from_risk_score(score: f64) -> Self {
        if score >= 70.0 {
            RiskLevel::Critical
        } else if score >= 50.0 {
            RiskLevel::High
        } else if score >= 30.0 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

/// Overall compliance status band for a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceStatus {
    Excellent,
    Good,
    Fair,
    NeedsImprovement,
}

impl ComplianceStatus {
    pub fn from_score(score: u32) -> Self {
        if score >= 90 {
            ComplianceStatus::Excellent
        } else if score >= 80 {
            ComplianceStatus::Good
        } else if score >= 70 {
            ComplianceStatus::Fair
        } else {
            ComplianceStatus::NeedsImprovement
        }
    }
}

/// Audit readiness band for a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditReadiness {
    FullyPrepared,
    MostlyPrepared,
    PartiallyPrepared,
    NotPrepared,
}

impl AuditReadiness {
    pub fn from_score(score: u32) -> Self {
        if score >= 90 {
            AuditReadiness::FullyPrepared
        } else if score >= 80 {
            AuditReadiness::MostlyPrepared
        } else if score >= 70 {
            AuditReadiness::PartiallyPrepared
        } else {
            AuditReadiness::NotPrepared
        }
    }
}

/// Direction of a score series over time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Improving,
    Stable,
    Declining,
    InsufficientData,
}

/// Deployment model of a company system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemKind {
    CloudSaas,
    OnPremises,
    Hybrid,
}

/// Encryption posture of a company system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncryptionStatus {
    EncryptedAtRestAndTransit,
    EncryptedAtRest,
    EncryptedInTransit,
    Unencrypted,
}

impl EncryptionStatus {
    pub fn at_rest(&self) -> bool {
        matches!(
            self,
            EncryptionStatus::EncryptedAtRestAndTransit | EncryptionStatus::EncryptedAtRest
        )
    }

    pub fn in_transit(&self) -> bool {
        matches!(
            self,
            EncryptionStatus::EncryptedAtRestAndTransit | EncryptionStatus::EncryptedInTransit
        )
    }
}

/// A company policy document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Policy {
    pub name: String,
    pub content: String,
    pub version: String,
    pub last_updated: NaiveDate,
    pub status: String,
}

/// A system in the company's inventory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemRecord {
    pub name: String,
    pub kind: SystemKind,
    pub vendor: String,
    pub data_categories: Vec<String>,
    pub compliance_requirements: Vec<String>,
    pub data_retention_period: String,
    pub encryption_status: EncryptionStatus,
}

/// A prior compliance assessment on record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PastAssessment {
    pub assessment_date: NaiveDate,
    pub overall_score: u32,
    pub assessor: String,
    pub key_findings: Vec<String>,
}

/// A recorded compliance incident.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Incident {
    pub date: NaiveDate,
    pub kind: String,
    pub severity: Severity,
    pub description: String,
    pub resolution: String,
}

/// The full company profile submitted for a compliance check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub company_id: String,
    pub company_name: String,
    pub industry: String,
    pub employee_count: u32,
    pub revenue_range: String,
    #[serde(default)]
    pub operating_regions: Vec<String>,
    #[serde(default)]
    pub compliance_requirements: Vec<String>,
    #[serde(default)]
    pub policies: Vec<Policy>,
    #[serde(default)]
    pub systems: Vec<SystemRecord>,
    #[serde(default)]
    pub compliance_history: Vec<PastAssessment>,
    #[serde(default)]
    pub recent_incidents: Vec<Incident>,
}

/// A compliance gap identified by the analyzer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gap {
    pub regulation: String,
    pub gap_type: String,
    pub severity: Severity,
    pub description: String,
    pub affected_areas: Vec<String>,
}

/// A remediation recommendation derived from a gap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub regulation: String,
    pub priority: Priority,
    pub action: String,
    pub estimated_effort: String,
    pub timeline: String,
    pub impact: String,
}

/// Terminal status of a workflow run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowStatus {
    Completed,
    Failed,
}

/// One entry in the orchestrator's workflow history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowRecord {
    pub workflow_id: String,
    pub company_id: String,
    pub duration_seconds: f64,
    pub final_score: u32,
    pub risk_score: f64,
    pub timestamp: DateTime<Utc>,
    pub status: WorkflowStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
