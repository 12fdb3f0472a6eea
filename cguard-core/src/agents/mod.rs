//! The four compliance agents.
//!
//! Each agent is a typed async component with its own settings and metrics:
//! the regulation monitor gathers regulatory data, the analyzer scores the
//! company against it, the risk assessor weighs the findings, and the
//! reporter assembles the final document.

pub mod analyzer;
pub mod monitor;
pub mod reporter;
pub mod risk;

pub use analyzer::ComplianceAnalyzerAgent;
pub use monitor::RegulationMonitorAgent;
pub use reporter::ReportGeneratorAgent;
pub use risk::RiskAssessmentAgent;

/// Role description for an agent, surfaced in metrics and logs.
pub fn agent_description(name: &str) -> &'static str {
    match name {
        "regulation_monitor" => {
            "Monitors regulatory changes across GDPR, HIPAA, SOX and alerts on compliance impacts"
        }
        "compliance_analyzer" => {
            "Analyzes company policies against regulatory requirements and identifies compliance gaps"
        }
        "risk_assessor" => {
            "Assesses compliance risks using weighted scoring and provides mitigation recommendations"
        }
        "report_generator" => {
            "Generates comprehensive compliance reports and audit-ready documentation"
        }
        _ => "Compliance agent",
    }
}
