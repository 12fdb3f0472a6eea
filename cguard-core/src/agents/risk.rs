//! Risk Assessment Agent — weighs analysis findings into a risk picture.
//!
//! Risk is the inverse of compliance: the overall risk score is
//! `100 - overall_score`, and each regulation additionally carries a
//! weighted risk reflecting its enforcement exposure. Mitigation
//! strategies are derived from the identified risk factors.

use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

use crate::agents::analyzer::AnalysisResults;
use crate::catalog;
use crate::config::AgentSettings;
use crate::error::AgentError;
use crate::metrics::AgentMetrics;
use crate::types::{PastAssessment, Priority, RiskLevel, Severity, Trend};

/// Risk figures for a single regulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegulationRisk {
    pub score: u32,
    pub risk_level: RiskLevel,
    /// (100 - score) scaled by the regulation's enforcement weight.
    pub weighted_risk: f64,
}

/// A contributing risk factor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskFactor {
    pub factor: String,
    pub severity: Severity,
    pub description: String,
}

/// A mitigation strategy addressing one risk factor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MitigationStrategy {
    pub risk_factor: String,
    pub strategy: String,
    pub priority: Priority,
    pub timeline: String,
}

/// Overall compliance health band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl HealthStatus {
    pub fn from_score(score: u32) -> Self {
        if score >= 90 {
            HealthStatus::Excellent
        } else if score >= 80 {
            HealthStatus::Good
        } else if score >= 70 {
            HealthStatus::Fair
        } else {
            HealthStatus::Poor
        }
    }
}

/// Compliance health summary combining current score and trajectory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceHealth {
    pub status: HealthStatus,
    pub trend: Trend,
    pub next_review: NaiveDate,
}

/// Full risk assessment output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub overall_risk_score: f64,
    pub overall_risk_level: RiskLevel,
    pub regulation_risks: BTreeMap<String, RegulationRisk>,
    pub risk_factors: Vec<RiskFactor>,
    pub mitigation_strategies: Vec<MitigationStrategy>,
    pub compliance_health: ComplianceHealth,
    pub predicted_risks: Vec<String>,
}

/// Assesses compliance risk from analysis results and assessment history.
pub struct RiskAssessmentAgent {
    settings: AgentSettings,
    metrics: AgentMetrics,
}

impl RiskAssessmentAgent {
    pub fn new(settings: AgentSettings) -> Self {
        Self {
            settings,
            metrics: AgentMetrics::new(),
        }
    }

    /// Assess risk from analysis results and prior assessment history.
    pub async fn assess_risk(
        &mut self,
        analysis: &AnalysisResults,
        history: &[PastAssessment],
    ) -> Result<RiskAssessment, AgentError> {
        info!(
            overall_score = analysis.overall_score,
            model = %self.settings.model,
            "Assessing compliance risk"
        );
        self.metrics.record_request();

        let overall_risk_score = f64::from(100 - analysis.overall_score.min(100));

        let regulation_risks: BTreeMap<String, RegulationRisk> = analysis
            .regulation_scores
            .iter()
            .map(|(regulation, &score)| {
                let risk = RegulationRisk {
                    score,
                    risk_level: RiskLevel::from_compliance_score(score),
                    weighted_risk: f64::from(100 - score.min(100))
                        * catalog::risk_weight(regulation),
                };
                (regulation.clone(), risk)
            })
            .collect();

        let risk_factors = Self::identify_risk_factors(analysis);
        let mitigation_strategies = Self::mitigation_strategies(&risk_factors);
        let compliance_health = Self::compliance_health(analysis.overall_score, history);
        let predicted_risks = Self::predict_risks(overall_risk_score);

        info!(
            risk_score = overall_risk_score,
            factors = risk_factors.len(),
            "Risk assessment completed"
        );

        Ok(RiskAssessment {
            overall_risk_level: RiskLevel::from_risk_score(overall_risk_score),
            overall_risk_score,
            regulation_risks,
            risk_factors,
            mitigation_strategies,
            compliance_health,
            predicted_risks,
        })
    }

    /// Derive risk factors from gap severities plus the standing factors
    /// every organization carries.
    fn identify_risk_factors(analysis: &AnalysisResults) -> Vec<RiskFactor> {
        let high_gaps = analysis
            .gap_analysis
            .iter()
            .filter(|g| g.severity == Severity::High)
            .count();
        let medium_gaps = analysis
            .gap_analysis
            .iter()
            .filter(|g| g.severity == Severity::Medium)
            .count();

        let mut factors = Vec::new();
        if high_gaps > 0 {
            factors.push(RiskFactor {
                factor: "high_severity_gaps".into(),
                severity: Severity::High,
                description: format!("{} high-severity compliance gaps identified", high_gaps),
            });
        }
        if medium_gaps > 0 {
            factors.push(RiskFactor {
                factor: "medium_severity_gaps".into(),
                severity: Severity::Medium,
                description: format!("{} medium-severity compliance gaps identified", medium_gaps),
            });
        }
        factors.push(RiskFactor {
            factor: "regulatory_changes".into(),
            severity: Severity::Medium,
            description: "Upcoming regulatory changes may affect compliance posture".into(),
        });
        factors.push(RiskFactor {
            factor: "staff_training".into(),
            severity: Severity::Low,
            description: "Ongoing staff training required to maintain compliance awareness".into(),
        });
        factors
    }

    fn mitigation_strategies(factors: &[RiskFactor]) -> Vec<MitigationStrategy> {
        factors
            .iter()
            .filter_map(|factor| {
                let (strategy, priority, timeline) = match factor.factor.as_str() {
                    "high_severity_gaps" => (
                        "Immediate gap remediation with dedicated compliance resources",
                        Priority::Critical,
                        "30 days",
                    ),
                    "medium_severity_gaps" => (
                        "Phased gap remediation integrated into quarterly planning",
                        Priority::High,
                        "90 days",
                    ),
                    "regulatory_changes" => (
                        "Enhanced regulatory monitoring and change impact assessment",
                        Priority::Medium,
                        "Ongoing",
                    ),
                    _ => return None,
                };
                Some(MitigationStrategy {
                    risk_factor: factor.factor.clone(),
                    strategy: strategy.into(),
                    priority,
                    timeline: timeline.into(),
                })
            })
            .collect()
    }

    /// Health combines the current score band with the score trajectory
    /// across prior assessments.
    fn compliance_health(overall_score: u32, history: &[PastAssessment]) -> ComplianceHealth {
        ComplianceHealth {
            status: HealthStatus::from_score(overall_score),
            trend: Self::score_trend(history),
            next_review: Utc::now().date_naive() + Duration::days(30),
        }
    }

    /// Trend of the assessment score series, oldest-to-newest comparison of
    /// the two most recent assessments.
    pub fn score_trend(history: &[PastAssessment]) -> Trend {
        if history.len() < 2 {
            return Trend::InsufficientData;
        }
        let mut sorted: Vec<&PastAssessment> = history.iter().collect();
        sorted.sort_by_key(|a| a.assessment_date);
        let previous = sorted[sorted.len() - 2].overall_score;
        let latest = sorted[sorted.len() - 1].overall_score;
        if latest > previous {
            Trend::Improving
        } else if latest < previous {
            Trend::Declining
        } else {
            Trend::Stable
        }
    }

    fn predict_risks(overall_risk_score: f64) -> Vec<String> {
        let mut risks = vec!["Increased enforcement activity in data protection".to_string()];
        if overall_risk_score >= 30.0 {
            risks.push("New data privacy regulation expanding compliance scope".into());
        } else {
            risks.push("Industry-wide compliance audit initiatives".into());
        }
        risks
    }

    pub fn metrics(&self) -> &AgentMetrics {
        &self.metrics
    }
}
