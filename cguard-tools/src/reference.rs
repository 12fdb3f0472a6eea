//! Reference tools — regulation records, framework catalog, and search.

use async_trait::async_trait;
use cguard_core::catalog;
use cguard_core::error::ToolError;
use serde_json::json;

use crate::registry::{required_str, Tool, ToolOutput};

/// Serves regulation records from the built-in catalog.
pub struct RegulationDbTool;

#[async_trait]
impl Tool for RegulationDbTool {
    fn name(&self) -> &str {
        "regulation_db"
    }

    fn description(&self) -> &str {
        "Looks up a regulation's full record in the regulatory database"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "regulation": { "type": "string" }
            },
            "required": ["regulation"]
        })
    }

    async fn execute(&self, args: serde_json::Value) -> Result<ToolOutput, ToolError> {
        let name = required_str(&args, self.name(), "regulation")?;
        let info = catalog::regulation(name).ok_or_else(|| ToolError::ExecutionFailed {
            name: self.name().to_string(),
            message: format!(
                "no record for '{}'; available: {}",
                name,
                catalog::available_regulations().join(", ")
            ),
        })?;

        Ok(ToolOutput::success(json!({
            "name": info.name,
            "full_name": info.full_name,
            "jurisdiction": info.jurisdiction,
            "effective_date": info.effective_date,
            "last_updated": info.last_updated,
            "key_requirements": info.key_requirements,
            "applicability": info.applicability,
            "penalties": info.penalties,
            "compliance_deadline": info.compliance_deadline,
        })))
    }
}

/// Serves compliance framework records (NIST CSF, ISO 27001, COBIT).
pub struct FrameworkCatalogTool;

#[async_trait]
impl Tool for FrameworkCatalogTool {
    fn name(&self) -> &str {
        "framework_catalog"
    }

    fn description(&self) -> &str {
        "Looks up a compliance framework, or lists available frameworks"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "framework": {
                    "type": "string",
                    "description": "Framework name; omit to list all"
                }
            }
        })
    }

    async fn execute(&self, args: serde_json::Value) -> Result<ToolOutput, ToolError> {
        match args.get("framework").and_then(|v| v.as_str()) {
            Some(name) => {
                let info = catalog::framework(name).ok_or_else(|| ToolError::ExecutionFailed {
                    name: self.name().to_string(),
                    message: format!(
                        "no record for '{}'; available: {}",
                        name,
                        catalog::available_frameworks().join(", ")
                    ),
                })?;
                let data = serde_json::to_value(info).map_err(|e| ToolError::ExecutionFailed {
                    name: self.name().to_string(),
                    message: e.to_string(),
                })?;
                Ok(ToolOutput::success(data))
            }
            None => Ok(ToolOutput::success(json!({
                "frameworks": catalog::available_frameworks(),
            }))),
        }
    }
}

/// Searches key requirements across all cataloged regulations.
pub struct RegulatorySearchTool;

#[async_trait]
impl Tool for RegulatorySearchTool {
    fn name(&self) -> &str {
        "regulatory_search"
    }

    fn description(&self) -> &str {
        "Searches regulatory requirements across all cataloged regulations"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "query": { "type": "string" },
                "jurisdictions": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Restrict results to these jurisdictions"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, args: serde_json::Value) -> Result<ToolOutput, ToolError> {
        let query = required_str(&args, self.name(), "query")?.to_lowercase();
        if query.trim().is_empty() {
            return Err(ToolError::InvalidArguments {
                name: self.name().to_string(),
                reason: "'query' must not be empty".into(),
            });
        }
        let jurisdictions: Vec<String> = args
            .get("jurisdictions")
            .and_then(|v| v.as_array())
            .map(|list| {
                list.iter()
                    .filter_map(|j| j.as_str())
                    .map(|j| j.to_lowercase())
                    .collect()
            })
            .unwrap_or_default();

        let mut scored: Vec<(u32, serde_json::Value)> = Vec::new();
        for regulation in catalog::available_regulations() {
            let Some(info) = catalog::regulation(regulation) else {
                continue;
            };
            if !jurisdictions.is_empty()
                && !jurisdictions.contains(&info.jurisdiction.to_lowercase())
            {
                continue;
            }
            for requirement in info.key_requirements {
                let text = requirement.to_lowercase();
                let relevance = text.matches(&query).count() as u32;
                if relevance > 0 {
                    scored.push((
                        relevance,
                        json!({
                            "regulation": info.name,
                            "requirement": requirement,
                            "jurisdiction": info.jurisdiction,
                            "relevance": relevance,
                        }),
                    ));
                }
            }
            for requirement in info.requirements {
                // Gap-type hits outrank summary text hits.
                let mut relevance =
                    requirement.summary.to_lowercase().matches(&query).count() as u32;
                if requirement.gap_type.contains(&query) {
                    relevance += 2;
                }
                if relevance > 0 {
                    scored.push((
                        relevance,
                        json!({
                            "regulation": info.name,
                            "requirement": requirement.summary,
                            "gap_type": requirement.gap_type,
                            "jurisdiction": info.jurisdiction,
                            "relevance": relevance,
                        }),
                    ));
                }
            }
        }
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored.truncate(5);
        let results: Vec<serde_json::Value> = scored.into_iter().map(|(_, r)| r).collect();

        Ok(ToolOutput::success(json!({
            "query": query,
            "result_count": results.len(),
            "results": results,
        })))
    }
}
