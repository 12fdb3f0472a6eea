//! Analysis tools — gap scoring, risk calculation, and policy inspection.

use async_trait::async_trait;
use cguard_core::catalog;
use cguard_core::error::ToolError;
use cguard_core::types::{RiskLevel, Severity};
use serde_json::json;

use crate::registry::{required_str, Tool, ToolOutput};

/// Checks a set of policies against regulation requirements and reports
/// the gaps found.
///
/// A requirement counts as covered when any of its keywords appears in
/// any policy text; each open gap costs five points off a perfect score.
pub struct GapAnalyzerTool;

#[async_trait]
impl Tool for GapAnalyzerTool {
    fn name(&self) -> &str {
        "gap_analyzer"
    }

    fn description(&self) -> &str {
        "Analyzes policies against regulation requirements and scores the gaps"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "policies": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "name": { "type": "string" },
                            "content": { "type": "string" }
                        },
                        "required": ["content"]
                    },
                    "description": "Company policies to check"
                },
                "regulations": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Regulations to check against"
                }
            },
            "required": ["policies", "regulations"]
        })
    }

    async fn execute(&self, args: serde_json::Value) -> Result<ToolOutput, ToolError> {
        let policies = args
            .get("policies")
            .and_then(|v| v.as_array())
            .ok_or_else(|| ToolError::InvalidArguments {
                name: self.name().to_string(),
                reason: "'policies' is required and must be an array".into(),
            })?;
        let regulations = args
            .get("regulations")
            .and_then(|v| v.as_array())
            .ok_or_else(|| ToolError::InvalidArguments {
                name: self.name().to_string(),
                reason: "'regulations' is required and must be an array".into(),
            })?;

        let texts: Vec<String> = policies
            .iter()
            .filter_map(|p| p.get("content").and_then(|c| c.as_str()))
            .map(|c| c.to_lowercase())
            .collect();

        let mut gaps = Vec::new();
        for regulation in regulations.iter().filter_map(|r| r.as_str()) {
            for requirement in catalog::requirements_for(regulation) {
                let covered = texts.iter().any(|text| {
                    requirement.keywords.iter().any(|kw| text.contains(kw))
                });
                if !covered {
                    gaps.push(json!({
                        "regulation": regulation.to_uppercase(),
                        "gap_type": requirement.gap_type,
                        "severity": requirement.severity,
                        "description": requirement.summary,
                        "affected_areas": requirement.affected_areas,
                    }));
                }
            }
        }

        let high_priority: Vec<&serde_json::Value> = gaps
            .iter()
            .filter(|g| g["severity"] == json!(Severity::High))
            .collect();
        let score = 100u64.saturating_sub(5 * gaps.len() as u64);
        let status = if score >= 90 {
            "excellent"
        } else if score >= 80 {
            "good"
        } else if score >= 70 {
            "fair"
        } else {
            "needs_improvement"
        };

        Ok(ToolOutput::success(json!({
            "gap_count": gaps.len(),
            "high_priority_gaps": high_priority,
            "gaps": gaps,
            "compliance_score": score,
            "status": status,
        })))
    }
}

/// Computes weighted risk from per-regulation compliance scores.
///
/// Each regulation contributes `(100 - score) * weight`; the overall risk
/// score is the mean contribution clamped to 100.
pub struct RiskEngineTool;

#[async_trait]
impl Tool for RiskEngineTool {
    fn name(&self) -> &str {
        "risk_engine"
    }

    fn description(&self) -> &str {
        "Calculates weighted risk from per-regulation compliance scores"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "regulation_scores": {
                    "type": "object",
                    "additionalProperties": { "type": "integer", "minimum": 0, "maximum": 100 },
                    "description": "Compliance score per regulation"
                },
                "gap_count": { "type": "integer", "minimum": 0 }
            },
            "required": ["regulation_scores"]
        })
    }

    async fn execute(&self, args: serde_json::Value) -> Result<ToolOutput, ToolError> {
        let scores = args
            .get("regulation_scores")
            .and_then(|v| v.as_object())
            .ok_or_else(|| ToolError::InvalidArguments {
                name: self.name().to_string(),
                reason: "'regulation_scores' is required and must be an object".into(),
            })?;
        if scores.is_empty() {
            return Err(ToolError::InvalidArguments {
                name: self.name().to_string(),
                reason: "'regulation_scores' must not be empty".into(),
            });
        }
        let gap_count = args.get("gap_count").and_then(|v| v.as_u64()).unwrap_or(0);

        let mut breakdown = serde_json::Map::new();
        let mut key_factors = Vec::new();
        let mut total_weighted = 0.0;
        for (regulation, value) in scores {
            let score = value.as_u64().ok_or_else(|| ToolError::InvalidArguments {
                name: self.name().to_string(),
                reason: format!("score for '{regulation}' must be a non-negative integer"),
            })?;
            let weight = catalog::risk_weight(regulation);
            let weighted = (100.0 - score.min(100) as f64) * weight;
            total_weighted += weighted;
            breakdown.insert(
                regulation.to_uppercase(),
                json!({
                    "score": score,
                    "risk_level": RiskLevel::from_compliance_score(score as u32),
                    "weighted_risk": weighted,
                }),
            );
            if score < 75 {
                key_factors.push(format!(
                    "{} compliance below threshold ({score}%)",
                    regulation.to_uppercase()
                ));
            }
        }

        let overall = (total_weighted / scores.len() as f64).min(100.0);
        let mut recommendations = vec!["Prioritize high-severity gaps first".to_string()];
        if gap_count > 5 {
            recommendations
                .push("Consolidate remediation into a dedicated compliance program".into());
        }

        Ok(ToolOutput::success(json!({
            "overall_risk_score": overall,
            "overall_risk_level": RiskLevel::from_risk_score(overall),
            "breakdown": breakdown,
            "key_factors": key_factors,
            "recommendations": recommendations,
        })))
    }
}

/// Checks one policy text against a regulation's requirement keywords.
pub struct PolicyAnalyzerTool;

#[async_trait]
impl Tool for PolicyAnalyzerTool {
    fn name(&self) -> &str {
        "policy_analyzer"
    }

    fn description(&self) -> &str {
        "Analyzes policy text coverage against a regulation's requirements"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "policy_text": { "type": "string" },
                "regulation": { "type": "string" }
            },
            "required": ["policy_text", "regulation"]
        })
    }

    async fn execute(&self, args: serde_json::Value) -> Result<ToolOutput, ToolError> {
        let policy_text = required_str(&args, self.name(), "policy_text")?;
        let regulation = required_str(&args, self.name(), "regulation")?;

        let text = policy_text.to_lowercase();
        let requirements = catalog::requirements_for(regulation);

        let mut covered = Vec::new();
        let mut missing = Vec::new();
        for requirement in requirements {
            if requirement.keywords.iter().any(|kw| text.contains(kw)) {
                covered.push(requirement.gap_type);
            } else {
                missing.push(requirement.gap_type);
            }
        }

        let coverage_percent = if requirements.is_empty() {
            100
        } else {
            100 * covered.len() / requirements.len()
        };

        Ok(ToolOutput::success(json!({
            "regulation": regulation.to_uppercase(),
            "coverage_percent": coverage_percent,
            "covered_requirements": covered,
            "missing_requirements": missing,
            "quality_metrics": {
                "word_count": policy_text.split_whitespace().count(),
                "mentions_procedures": text.contains("procedure"),
                "mentions_review_cycle": text.contains("annual") || text.contains("quarterly"),
            }
        })))
    }
}
