//! Workflow orchestrator for the compliance multi-agent system.
//!
//! Runs the four-phase compliance check: regulatory monitoring and data
//! collection run concurrently, then analysis, risk assessment, and report
//! generation run in sequence. Every run is tracked in a session, recorded
//! in the audit trail, stored in the memory bank, and summarized in the
//! workflow history whether it succeeds or fails.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::agents::analyzer::{AnalysisResults, ComplianceAnalyzerAgent, EnrichedCompany};
use crate::agents::monitor::RegulationMonitorAgent;
use crate::agents::reporter::{ComplianceReport, ReportGeneratorAgent};
use crate::agents::risk::{RiskAssessment, RiskAssessmentAgent};
use crate::audit::AuditLog;
use crate::config::GuardConfig;
use crate::error::{AgentError, GuardError, Result, WorkflowError};
use crate::memory::MemoryBank;
use crate::metrics::MetricsSnapshot;
use crate::session::SessionManager;
use crate::types::{CompanyProfile, WorkflowRecord, WorkflowStatus};

/// Role description and current metrics for one agent.
#[derive(Debug, Clone, Serialize)]
pub struct AgentStatus {
    pub description: &'static str,
    pub metrics: MetricsSnapshot,
}

/// Everything produced by one successful compliance check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceCheckOutcome {
    pub workflow_id: String,
    pub session_id: String,
    pub company: EnrichedCompany,
    pub analysis: AnalysisResults,
    pub risk: RiskAssessment,
    pub report: ComplianceReport,
    pub duration_seconds: f64,
}

/// Coordinates the four compliance agents through the workflow phases.
pub struct Orchestrator {
    config: GuardConfig,
    monitor: RegulationMonitorAgent,
    analyzer: ComplianceAnalyzerAgent,
    assessor: RiskAssessmentAgent,
    reporter: ReportGeneratorAgent,
    memory: MemoryBank,
    sessions: SessionManager,
    audit: AuditLog,
    history: Vec<WorkflowRecord>,
    monitoring_active: bool,
    shut_down: bool,
    cleanup_cancel: CancellationToken,
}

impl Orchestrator {
    /// Build an orchestrator from configuration, opening the memory bank and
    /// starting the session expiry sweep. Must be called from within a tokio
    /// runtime.
    pub fn new(config: GuardConfig) -> Result<Self> {
        let data_dir = config.memory_data_dir();
        let memory = MemoryBank::open(config.memory.clone(), data_dir)?;
        let sessions = SessionManager::new(config.session.clone());

        let cleanup_cancel = CancellationToken::new();
        sessions.spawn_cleanup_task(cleanup_cancel.clone());

        let monitor = RegulationMonitorAgent::new(
            config.agents.regulation_monitor.clone(),
            config.monitoring.clone(),
            config.compliance.regulations.clone(),
        );
        let analyzer = ComplianceAnalyzerAgent::new(config.agents.compliance_analyzer.clone());
        let assessor = RiskAssessmentAgent::new(config.agents.risk_assessor.clone());
        let reporter = ReportGeneratorAgent::new(config.agents.report_generator.clone());

        Ok(Self {
            config,
            monitor,
            analyzer,
            assessor,
            reporter,
            memory,
            sessions,
            audit: AuditLog::new(),
            history: Vec::new(),
            monitoring_active: false,
            shut_down: false,
            cleanup_cancel,
        })
    }

    /// Run the full four-phase compliance check for a company.
    pub async fn run_compliance_check(
        &mut self,
        profile: CompanyProfile,
    ) -> Result<ComplianceCheckOutcome> {
        if self.shut_down {
            return Err(WorkflowError::ShutDown.into());
        }
        self.ensure_agents_enabled()?;

        let workflow_id = format!("WF-{}", Utc::now().format("%Y%m%d-%H%M%S"));
        let company_id = profile.company_id.clone();
        let started = Instant::now();

        info!(workflow = %workflow_id, company = %company_id, "Compliance workflow started");
        self.audit
            .record("orchestrator", "workflow_started", Some(&company_id), None);

        let session_id = self
            .sessions
            .create_session(
                &company_id,
                "compliance_check",
                HashMap::from([(
                    "workflow_id".to_string(),
                    serde_json::Value::from(workflow_id.clone()),
                )]),
            )
            .await
            .map_err(GuardError::from)?;

        match self.execute_phases(&workflow_id, &session_id, profile).await {
            Ok(outcome) => {
                let duration_seconds = started.elapsed().as_secs_f64();
                self.history.push(WorkflowRecord {
                    workflow_id: workflow_id.clone(),
                    company_id: company_id.clone(),
                    duration_seconds,
                    final_score: outcome.analysis.overall_score,
                    risk_score: outcome.risk.overall_risk_score,
                    timestamp: Utc::now(),
                    status: WorkflowStatus::Completed,
                    error: None,
                });
                self.audit.record(
                    "orchestrator",
                    "workflow_completed",
                    Some(&company_id),
                    Some(serde_json::json!({
                        "workflow_id": workflow_id,
                        "overall_score": outcome.analysis.overall_score,
                    })),
                );
                self.sessions.end_session(&session_id).await?;

                info!(
                    workflow = %workflow_id,
                    score = outcome.analysis.overall_score,
                    duration_s = duration_seconds,
                    "Compliance workflow completed"
                );
                Ok(ComplianceCheckOutcome {
                    duration_seconds,
                    ..outcome
                })
            }
            Err(e) => {
                let duration_seconds = started.elapsed().as_secs_f64();
                error!(workflow = %workflow_id, error = %e, "Compliance workflow failed");
                self.history.push(WorkflowRecord {
                    workflow_id: workflow_id.clone(),
                    company_id: company_id.clone(),
                    duration_seconds,
                    final_score: 0,
                    risk_score: 100.0,
                    timestamp: Utc::now(),
                    status: WorkflowStatus::Failed,
                    error: Some(e.to_string()),
                });
                self.audit.record(
                    "orchestrator",
                    "workflow_failed",
                    Some(&company_id),
                    Some(serde_json::json!({ "workflow_id": workflow_id, "error": e.to_string() })),
                );
                // Best effort; the session may already be unusable.
                let _ = self.sessions.end_session(&session_id).await;
                Err(e)
            }
        }
    }

    async fn execute_phases(
        &mut self,
        workflow_id: &str,
        session_id: &str,
        profile: CompanyProfile,
    ) -> Result<ComplianceCheckOutcome> {
        // Phase 1: regulatory monitoring and company data collection run
        // concurrently.
        let phase_start = Instant::now();
        let (snapshot, company) = tokio::join!(
            self.monitor.gather_regulatory_data(),
            self.analyzer.collect_company_data(profile),
        );
        let snapshot = snapshot.map_err(|e| Self::phase_error(workflow_id, "monitoring", e))?;
        let company = company.map_err(|e| Self::phase_error(workflow_id, "data_collection", e))?;
        self.sessions
            .record_agent_interaction(
                session_id,
                "regulation_monitor",
                "gather_regulatory_data",
                phase_start.elapsed().as_millis() as u64,
            )
            .await?;

        // Phase 2: compliance analysis.
        let phase_start = Instant::now();
        let analysis = self
            .analyzer
            .analyze_compliance(&company, &snapshot)
            .await
            .map_err(|e| Self::phase_error(workflow_id, "analysis", e))?;
        self.sessions
            .record_agent_interaction(
                session_id,
                "compliance_analyzer",
                "analyze_compliance",
                phase_start.elapsed().as_millis() as u64,
            )
            .await?;

        // Phase 3: risk assessment.
        let phase_start = Instant::now();
        let risk = self
            .assessor
            .assess_risk(&analysis, &company.profile.compliance_history)
            .await
            .map_err(|e| Self::phase_error(workflow_id, "risk_assessment", e))?;
        self.sessions
            .record_agent_interaction(
                session_id,
                "risk_assessor",
                "assess_risk",
                phase_start.elapsed().as_millis() as u64,
            )
            .await?;

        // Phase 4: report generation.
        let phase_start = Instant::now();
        let report = self
            .reporter
            .generate_report(&company, &analysis, &risk)
            .await
            .map_err(|e| Self::phase_error(workflow_id, "report_generation", e))?;
        self.sessions
            .record_agent_interaction(
                session_id,
                "report_generator",
                "generate_report",
                phase_start.elapsed().as_millis() as u64,
            )
            .await?;

        self.memory
            .store_assessment(&company.profile.company_id, &analysis, &risk, &report.report_id)?;

        Ok(ComplianceCheckOutcome {
            workflow_id: workflow_id.to_string(),
            session_id: session_id.to_string(),
            company,
            analysis,
            risk,
            report,
            duration_seconds: 0.0,
        })
    }

    fn phase_error(workflow_id: &str, phase: &str, e: AgentError) -> GuardError {
        WorkflowError::PhaseFailed {
            workflow_id: workflow_id.to_string(),
            phase: phase.to_string(),
            message: e.to_string(),
        }
        .into()
    }

    fn ensure_agents_enabled(&self) -> Result<()> {
        for name in [
            "regulation_monitor",
            "compliance_analyzer",
            "risk_assessor",
            "report_generator",
        ] {
            if let Some(settings) = self.config.agents.get(name) {
                if !settings.enabled {
                    return Err(AgentError::Disabled { name: name.into() }.into());
                }
            }
        }
        Ok(())
    }

    /// Poll for regulatory changes until the token is cancelled. Errors back
    /// off instead of killing the loop.
    pub async fn run_continuous_monitoring(&mut self, cancel: CancellationToken) -> Result<()> {
        if self.shut_down {
            return Err(WorkflowError::ShutDown.into());
        }
        if self.monitoring_active {
            return Err(WorkflowError::MonitoringActive.into());
        }
        self.monitoring_active = true;

        let poll = std::time::Duration::from_secs(self.config.monitoring.polling_interval_secs);
        let backoff = std::time::Duration::from_secs(self.config.monitoring.error_backoff_secs);
        info!(interval_s = poll.as_secs(), "Continuous regulatory monitoring started");

        loop {
            let sleep_for = match self.monitor.detect_regulatory_changes().await {
                Ok(changes) => {
                    if changes.has_changes {
                        self.audit.record(
                            "regulation_monitor",
                            "regulatory_changes_detected",
                            None,
                            Some(serde_json::json!({ "count": changes.changes.len() })),
                        );
                        for change in &changes.changes {
                            info!(
                                regulation = %change.regulation,
                                change_type = %change.change_type,
                                effective = %change.effective_date,
                                "Regulatory change detected"
                            );
                        }
                    }
                    poll
                }
                Err(e) => {
                    warn!(error = %e, "Regulatory change check failed, backing off");
                    backoff
                }
            };

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(sleep_for) => {}
            }
        }

        self.monitoring_active = false;
        info!("Continuous regulatory monitoring stopped");
        Ok(())
    }

    /// Completed and failed workflows, in execution order.
    pub fn workflow_history(&self) -> &[WorkflowRecord] {
        &self.history
    }

    /// Role description and current metrics for each agent.
    pub fn agent_metrics(&self) -> BTreeMap<String, AgentStatus> {
        let snapshots = [
            ("regulation_monitor", self.monitor.metrics().snapshot()),
            ("compliance_analyzer", self.analyzer.metrics().snapshot()),
            ("risk_assessor", self.assessor.metrics().snapshot()),
            ("report_generator", self.reporter.metrics().snapshot()),
        ];
        snapshots
            .into_iter()
            .map(|(name, metrics)| {
                (
                    name.to_string(),
                    AgentStatus {
                        description: crate::agents::agent_description(name),
                        metrics,
                    },
                )
            })
            .collect()
    }

    pub fn memory(&self) -> &MemoryBank {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut MemoryBank {
        &mut self.memory
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    pub fn audit(&self) -> &AuditLog {
        &self.audit
    }

    /// Stop accepting work and stop the session expiry sweep. Subsequent
    /// workflow runs return an error.
    pub fn shutdown(&mut self) {
        self.shut_down = true;
        self.cleanup_cancel.cancel();
        info!("Orchestrator shut down");
    }
}
