//! ComplianceGuard core library.
//!
//! A multi-agent compliance monitoring system: the regulation monitor
//! gathers regulatory data, the compliance analyzer scores company
//! policies against it, the risk assessor weighs the findings, and the
//! report generator assembles an audit-ready report. The orchestrator
//! coordinates the four agents, with sessions, persistent memory, and
//! an audit trail around every run.

pub mod agents;
pub mod audit;
pub mod catalog;
pub mod config;
pub mod error;
pub mod memory;
pub mod metrics;
pub mod orchestrator;
pub mod sample;
pub mod session;
pub mod types;

pub use agents::{
    ComplianceAnalyzerAgent, RegulationMonitorAgent, ReportGeneratorAgent, RiskAssessmentAgent,
};
pub use audit::{AuditEvent, AuditLog};
pub use config::GuardConfig;
pub use error::{GuardError, Result};
pub use memory::{MemoryBank, MemoryMetrics, TrendAnalysis};
pub use orchestrator::{AgentStatus, ComplianceCheckOutcome, Orchestrator};
pub use session::SessionManager;
pub use types::{CompanyProfile, Gap, Recommendation, RiskLevel, Severity};
