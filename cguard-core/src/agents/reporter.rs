//! Report Generator Agent — assembles the final compliance report.
//!
//! Takes the analyzer and risk assessor outputs and produces an
//! audit-ready document: executive summary, detailed per-regulation
//! analysis, prioritized recommendations, an action plan, metrics, and
//! an audit readiness section.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

use crate::agents::analyzer::{AnalysisResults, EnrichedCompany};
use crate::agents::risk::{MitigationStrategy, RiskAssessment};
use crate::config::AgentSettings;
use crate::error::AgentError;
use crate::metrics::AgentMetrics;
use crate::types::{
    AuditReadiness, ComplianceStatus, Gap, Priority, Recommendation, Trend,
};

/// Per-regulation performance row in the detailed analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegulationPerformance {
    pub score: u32,
    pub status: ComplianceStatus,
    pub benchmark: String,
    pub trend: Trend,
}

/// Executive summary section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutiveSummary {
    pub overall_compliance_score: u32,
    pub compliance_status: ComplianceStatus,
    pub key_findings: Vec<String>,
    pub priority_actions: Vec<String>,
}

/// Detailed analysis section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedAnalysis {
    pub regulation_performance: BTreeMap<String, RegulationPerformance>,
    pub gap_breakdown: BTreeMap<String, Vec<Gap>>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
}

/// Recommendations section, bucketed by urgency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationsSection {
    pub immediate: Vec<Recommendation>,
    pub short_term: Vec<Recommendation>,
    pub long_term: Vec<MitigationStrategy>,
    pub resource_allocation: String,
}

/// Action plan section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionPlan {
    pub timeline: BTreeMap<String, Vec<String>>,
    pub responsibilities: BTreeMap<String, String>,
    pub success_metrics: Vec<String>,
}

/// Compliance metrics section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceMetricsSection {
    pub current_performance: BTreeMap<String, u32>,
    pub trend: Trend,
    pub industry_average: u32,
    pub target_score: u32,
}

/// Audit readiness section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditReadinessSection {
    pub readiness_level: AuditReadiness,
    pub documentation_status: String,
    pub evidence_availability: String,
    pub recommended_preparations: Vec<String>,
}

/// The final compliance report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceReport {
    pub report_id: String,
    pub company_id: String,
    pub company_name: String,
    pub generated_at: DateTime<Utc>,
    pub executive_summary: ExecutiveSummary,
    pub detailed_analysis: DetailedAnalysis,
    pub recommendations: RecommendationsSection,
    pub action_plan: ActionPlan,
    pub compliance_metrics: ComplianceMetricsSection,
    pub audit_readiness: AuditReadinessSection,
}

/// Generates the final audit-ready compliance report.
pub struct ReportGeneratorAgent {
    settings: AgentSettings,
    metrics: AgentMetrics,
}

impl ReportGeneratorAgent {
    pub fn new(settings: AgentSettings) -> Self {
        Self {
            settings,
            metrics: AgentMetrics::new(),
        }
    }

    /// Assemble the full report from the workflow outputs.
    pub async fn generate_report(
        &mut self,
        company: &EnrichedCompany,
        analysis: &AnalysisResults,
        risk: &RiskAssessment,
    ) -> Result<ComplianceReport, AgentError> {
        info!(
            company = %company.profile.company_id,
            model = %self.settings.model,
            "Generating compliance report"
        );
        self.metrics.record_request();

        let now = Utc::now();
        let report = ComplianceReport {
            report_id: format!("COMP-{}", now.format("%Y%m%d-%H%M%S")),
            company_id: company.profile.company_id.clone(),
            company_name: company.profile.company_name.clone(),
            generated_at: now,
            executive_summary: Self::executive_summary(analysis, risk),
            detailed_analysis: Self::detailed_analysis(analysis, risk),
            recommendations: Self::recommendations(analysis, risk),
            action_plan: Self::action_plan(analysis),
            compliance_metrics: Self::compliance_metrics(analysis, risk),
            audit_readiness: Self::audit_readiness(analysis),
        };

        info!(report_id = %report.report_id, "Compliance report generated");
        Ok(report)
    }

    fn executive_summary(analysis: &AnalysisResults, risk: &RiskAssessment) -> ExecutiveSummary {
        let high_gaps = analysis
            .gap_analysis
            .iter()
            .filter(|g| g.severity == crate::types::Severity::High)
            .count();

        let mut key_findings = vec![format!(
            "Overall compliance score of {}% across {} regulations",
            analysis.overall_score,
            analysis.regulation_scores.len()
        )];
        if high_gaps > 0 {
            key_findings.push(format!(
                "{} high-severity gaps require immediate attention",
                high_gaps
            ));
        } else {
            key_findings.push("No high-severity compliance gaps identified".into());
        }
        key_findings.push(format!(
            "Overall risk level assessed as {:?}",
            risk.overall_risk_level
        ));
        if let Some((regulation, &score)) = analysis
            .regulation_scores
            .iter()
            .min_by_key(|(_, &score)| score)
        {
            key_findings.push(format!(
                "{} is the weakest regulation at {}%",
                regulation, score
            ));
        }

        let priority_actions = risk
            .mitigation_strategies
            .iter()
            .filter(|m| m.priority >= Priority::High)
            .map(|m| format!("{} ({})", m.strategy, m.timeline))
            .collect();

        ExecutiveSummary {
            overall_compliance_score: analysis.overall_score,
            compliance_status: ComplianceStatus::from_score(analysis.overall_score),
            key_findings,
            priority_actions,
        }
    }

    fn detailed_analysis(analysis: &AnalysisResults, risk: &RiskAssessment) -> DetailedAnalysis {
        let regulation_performance: BTreeMap<String, RegulationPerformance> = analysis
            .regulation_scores
            .iter()
            .map(|(regulation, &score)| {
                (
                    regulation.clone(),
                    RegulationPerformance {
                        score,
                        status: ComplianceStatus::from_score(score),
                        benchmark: "Industry Average: 85%".into(),
                        trend: risk.compliance_health.trend,
                    },
                )
            })
            .collect();

        let mut gap_breakdown: BTreeMap<String, Vec<Gap>> = BTreeMap::new();
        for gap in &analysis.gap_analysis {
            gap_breakdown
                .entry(gap.regulation.clone())
                .or_default()
                .push(gap.clone());
        }

        let strengths = analysis
            .regulation_scores
            .iter()
            .filter(|(_, &score)| score >= 85)
            .map(|(regulation, &score)| {
                format!("Strong {} compliance posture ({}%)", regulation, score)
            })
            .collect();
        let weaknesses = analysis
            .regulation_scores
            .iter()
            .filter(|(_, &score)| score < 75)
            .map(|(regulation, &score)| {
                format!("{} compliance below acceptable threshold ({}%)", regulation, score)
            })
            .collect();

        DetailedAnalysis {
            regulation_performance,
            gap_breakdown,
            strengths,
            weaknesses,
        }
    }

    fn recommendations(
        analysis: &AnalysisResults,
        risk: &RiskAssessment,
    ) -> RecommendationsSection {
        let immediate: Vec<Recommendation> = analysis
            .recommendations
            .iter()
            .filter(|r| r.priority >= Priority::High)
            .take(3)
            .cloned()
            .collect();
        let short_term: Vec<Recommendation> = analysis
            .recommendations
            .iter()
            .filter(|r| r.priority == Priority::Medium)
            .take(5)
            .cloned()
            .collect();

        let resource_allocation = if immediate.is_empty() {
            "Maintain current compliance staffing with periodic reviews".to_string()
        } else {
            format!(
                "Dedicate compliance resources to {} immediate remediation items",
                immediate.len()
            )
        };

        RecommendationsSection {
            immediate,
            short_term,
            long_term: risk.mitigation_strategies.clone(),
            resource_allocation,
        }
    }

    fn action_plan(analysis: &AnalysisResults) -> ActionPlan {
        let mut timeline: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for recommendation in &analysis.recommendations {
            let bucket = match recommendation.timeline.as_str() {
                "30 days" => "0-30 days",
                "60 days" => "30-60 days",
                _ => "60-90 days",
            };
            timeline
                .entry(bucket.to_string())
                .or_default()
                .push(recommendation.action.clone());
        }

        let responsibilities = BTreeMap::from([
            (
                "compliance_team".to_string(),
                "Gap remediation, policy updates, and regulatory tracking".to_string(),
            ),
            (
                "it_department".to_string(),
                "System encryption, access controls, and technical safeguards".to_string(),
            ),
            (
                "hr_department".to_string(),
                "Training delivery and completion tracking".to_string(),
            ),
        ]);

        ActionPlan {
            timeline,
            responsibilities,
            success_metrics: vec![
                "All regulations scoring 90% or above".into(),
                "Zero high-severity gaps within 80 days".into(),
                "Audit readiness at fully prepared".into(),
            ],
        }
    }

    fn compliance_metrics(
        analysis: &AnalysisResults,
        risk: &RiskAssessment,
    ) -> ComplianceMetricsSection {
        ComplianceMetricsSection {
            current_performance: analysis.regulation_scores.clone(),
            trend: risk.compliance_health.trend,
            industry_average: 85,
            target_score: 90,
        }
    }

    fn audit_readiness(analysis: &AnalysisResults) -> AuditReadinessSection {
        let score = analysis.overall_score;
        let readiness_level = AuditReadiness::from_score(score);

        let documentation_status = if score >= 80 {
            "complete".to_string()
        } else {
            "needs_update".to_string()
        };
        let evidence_availability = if score >= 85 {
            "available".to_string()
        } else {
            "partial".to_string()
        };

        let mut recommended_preparations = vec!["Compile evidence of control operation".to_string()];
        if score < 80 {
            recommended_preparations
                .push("Update policy documentation before external audit".into());
        }
        if analysis
            .gap_analysis
            .iter()
            .any(|g| g.severity == crate::types::Severity::High)
        {
            recommended_preparations
                .push("Remediate high-severity gaps ahead of audit scheduling".into());
        }

        AuditReadinessSection {
            readiness_level,
            documentation_status,
            evidence_availability,
            recommended_preparations,
        }
    }

    pub fn metrics(&self) -> &AgentMetrics {
        &self.metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::analyzer::ComplianceAnalyzerAgent;
    use crate::agents::monitor::RegulationMonitorAgent;
    use crate::agents::risk::RiskAssessmentAgent;
    use crate::config::MonitoringConfig;
    use crate::sample;

    async fn full_pipeline() -> (EnrichedCompany, AnalysisResults, RiskAssessment) {
        let mut monitor = RegulationMonitorAgent::new(
            AgentSettings::default(),
            MonitoringConfig::default(),
            vec!["GDPR".into(), "HIPAA".into(), "SOX".into()],
        );
        let snapshot = monitor.gather_regulatory_data().await.unwrap();

        let mut analyzer = ComplianceAnalyzerAgent::new(AgentSettings::default());
        let company = analyzer
            .collect_company_data(sample::sample_company())
            .await
            .unwrap();
        let analysis = analyzer.analyze_compliance(&company, &snapshot).await.unwrap();

        let mut assessor = RiskAssessmentAgent::new(AgentSettings::default());
        let risk = assessor
            .assess_risk(&analysis, &company.profile.compliance_history)
            .await
            .unwrap();

        (company, analysis, risk)
    }

    #[tokio::test]
    async fn test_report_structure() {
        let (company, analysis, risk) = full_pipeline().await;
        let mut reporter = ReportGeneratorAgent::new(AgentSettings::default());

        let report = reporter
            .generate_report(&company, &analysis, &risk)
            .await
            .unwrap();

        assert!(report.report_id.starts_with("COMP-"));
        assert_eq!(report.company_id, company.profile.company_id);
        assert_eq!(
            report.executive_summary.overall_compliance_score,
            analysis.overall_score
        );
        assert_eq!(
            report.detailed_analysis.regulation_performance.len(),
            analysis.regulation_scores.len()
        );
        assert!(!report.executive_summary.key_findings.is_empty());
        assert_eq!(report.compliance_metrics.industry_average, 85);
        assert_eq!(report.action_plan.responsibilities.len(), 3);
    }

    #[tokio::test]
    async fn test_gap_breakdown_grouped_by_regulation() {
        let (company, analysis, risk) = full_pipeline().await;
        let mut reporter = ReportGeneratorAgent::new(AgentSettings::default());
        let report = reporter
            .generate_report(&company, &analysis, &risk)
            .await
            .unwrap();

        let grouped_total: usize = report
            .detailed_analysis
            .gap_breakdown
            .values()
            .map(|v| v.len())
            .sum();
        assert_eq!(grouped_total, analysis.gap_analysis.len());
        for (regulation, gaps) in &report.detailed_analysis.gap_breakdown {
            assert!(gaps.iter().all(|g| &g.regulation == regulation));
        }
    }

    #[tokio::test]
    async fn test_recommendation_buckets_bounded() {
        let (company, analysis, risk) = full_pipeline().await;
        let mut reporter = ReportGeneratorAgent::new(AgentSettings::default());
        let report = reporter
            .generate_report(&company, &analysis, &risk)
            .await
            .unwrap();

        assert!(report.recommendations.immediate.len() <= 3);
        assert!(report.recommendations.short_term.len() <= 5);
        assert_eq!(
            report.recommendations.long_term.len(),
            risk.mitigation_strategies.len()
        );
    }

    #[tokio::test]
    async fn test_audit_readiness_bands() {
        let (company, mut analysis, risk) = full_pipeline().await;
        let mut reporter = ReportGeneratorAgent::new(AgentSettings::default());

        analysis.overall_score = 92;
        let report = reporter
            .generate_report(&company, &analysis, &risk)
            .await
            .unwrap();
        assert_eq!(
            report.audit_readiness.readiness_level,
            AuditReadiness::FullyPrepared
        );
        assert_eq!(report.audit_readiness.documentation_status, "complete");

        analysis.overall_score = 55;
        let report = reporter
            .generate_report(&company, &analysis, &risk)
            .await
            .unwrap();
        assert_eq!(
            report.audit_readiness.readiness_level,
            AuditReadiness::NotPrepared
        );
        assert_eq!(report.audit_readiness.documentation_status, "needs_update");
        assert!(report
            .audit_readiness
            .recommended_preparations
            .iter()
            .any(|p| p.contains("policy documentation")));
    }

    #[tokio::test]
    async fn test_report_serializes_to_json() {
        let (company, analysis, risk) = full_pipeline().await;
        let mut reporter = ReportGeneratorAgent::new(AgentSettings::default());
        let report = reporter
            .generate_report(&company, &analysis, &risk)
            .await
            .unwrap();

        let json = serde_json::to_value(&report).unwrap();
        assert!(json["executive_summary"]["overall_compliance_score"].is_number());
        assert!(json["detailed_analysis"]["regulation_performance"].is_object());
    }
}
