//! Reporting tools — audit trail formatting and report rendering.

use async_trait::async_trait;
use cguard_core::error::ToolError;
use serde_json::json;
use std::fmt::Write as _;

use crate::registry::{required_str, Tool, ToolOutput};

/// Formats audit events into a human-readable trail.
pub struct AuditTrailTool;

#[async_trait]
impl Tool for AuditTrailTool {
    fn name(&self) -> &str {
        "audit_trail"
    }

    fn description(&self) -> &str {
        "Formats recorded audit events into a readable trail document"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "company_id": { "type": "string" },
                "events": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "event_id": { "type": "string" },
                            "timestamp": { "type": "string" },
                            "actor": { "type": "string" },
                            "action": { "type": "string" }
                        }
                    }
                }
            },
            "required": ["company_id", "events"]
        })
    }

    async fn execute(&self, args: serde_json::Value) -> Result<ToolOutput, ToolError> {
        let company_id = required_str(&args, self.name(), "company_id")?;
        let events = args
            .get("events")
            .and_then(|v| v.as_array())
            .ok_or_else(|| ToolError::InvalidArguments {
                name: self.name().to_string(),
                reason: "'events' is required and must be an array".into(),
            })?;

        let mut trail = format!("Audit Trail for {}\n", company_id);
        for event in events {
            let event_id = event.get("event_id").and_then(|v| v.as_str()).unwrap_or("-");
            let timestamp = event.get("timestamp").and_then(|v| v.as_str()).unwrap_or("-");
            let actor = event.get("actor").and_then(|v| v.as_str()).unwrap_or("system");
            let action = event.get("action").and_then(|v| v.as_str()).unwrap_or("-");
            let _ = writeln!(trail, "[{}] {} {} by {}", event_id, timestamp, action, actor);
        }

        Ok(ToolOutput::success(json!({
            "company_id": company_id,
            "event_count": events.len(),
            "trail": trail,
        })))
    }
}

const REPORT_FORMATS: &[&str] = &["executive", "detailed", "technical", "regulatory"];

/// Renders a compliance report as text in one of several formats.
pub struct ReportFormatterTool;

impl ReportFormatterTool {
    fn render(report: &serde_json::Value, format: &str) -> String {
        let company = report
            .get("company_name")
            .and_then(|v| v.as_str())
            .unwrap_or("Unknown company");
        let summary = &report["executive_summary"];
        let score = summary["overall_compliance_score"].as_u64().unwrap_or(0);
        let status = summary["compliance_status"].as_str().unwrap_or("unknown");

        let mut out = format!(
            "Compliance Report: {}\nOverall Score: {}% ({})\n",
            company, score, status
        );

        if let Some(findings) = summary["key_findings"].as_array() {
            out.push_str("\nKey Findings:\n");
            for finding in findings {
                if let Some(text) = finding.as_str() {
                    let _ = writeln!(out, "  - {}", text);
                }
            }
        }

        match format {
            "detailed" => {
                if let Some(performance) =
                    report["detailed_analysis"]["regulation_performance"].as_object()
                {
                    out.push_str("\nRegulation Performance:\n");
                    for (regulation, row) in performance {
                        let _ = writeln!(
                            out,
                            "  {}: {}% ({})",
                            regulation,
                            row["score"].as_u64().unwrap_or(0),
                            row["status"].as_str().unwrap_or("unknown")
                        );
                    }
                }
            }
            "technical" => {
                if let Some(breakdown) = report["detailed_analysis"]["gap_breakdown"].as_object() {
                    out.push_str("\nGap Breakdown:\n");
                    for (regulation, gaps) in breakdown {
                        let count = gaps.as_array().map(|g| g.len()).unwrap_or(0);
                        let _ = writeln!(out, "  {}: {} gaps", regulation, count);
                    }
                }
            }
            "regulatory" => {
                let readiness = &report["audit_readiness"];
                let _ = writeln!(
                    out,
                    "\nAudit Readiness: {}\nDocumentation: {}\nEvidence: {}",
                    readiness["readiness_level"].as_str().unwrap_or("unknown"),
                    readiness["documentation_status"].as_str().unwrap_or("unknown"),
                    readiness["evidence_availability"].as_str().unwrap_or("unknown"),
                );
            }
            _ => {}
        }
        out
    }
}

#[async_trait]
impl Tool for ReportFormatterTool {
    fn name(&self) -> &str {
        "report_formatter"
    }

    fn description(&self) -> &str {
        "Renders a compliance report as executive, detailed, technical, or regulatory text"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "report": { "type": "object" },
                "format": { "type": "string", "enum": REPORT_FORMATS }
            },
            "required": ["report", "format"]
        })
    }

    async fn execute(&self, args: serde_json::Value) -> Result<ToolOutput, ToolError> {
        let format = required_str(&args, self.name(), "format")?;
        if !REPORT_FORMATS.contains(&format) {
            return Err(ToolError::InvalidArguments {
                name: self.name().to_string(),
                reason: format!("unknown format '{}', expected one of {:?}", format, REPORT_FORMATS),
            });
        }
        let report = args.get("report").ok_or_else(|| ToolError::InvalidArguments {
            name: self.name().to_string(),
            reason: "'report' is required".into(),
        })?;

        let text = Self::render(report, format);
        Ok(ToolOutput::success(json!({
            "format": format,
            "text": text,
        })))
    }
}
