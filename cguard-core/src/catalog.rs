//! Built-in regulatory knowledge base.
//!
//! Holds the regulation records served by the monitor and the
//! `regulation_db` tool, the per-regulation requirement definitions the
//! analyzer scores against, the pending-change feed, the compliance
//! framework catalog, and industry benchmark tables.

use crate::types::Severity;
use serde::{Deserialize, Serialize};

/// A single requirement of a regulation, scored by keyword coverage.
///
/// A requirement is considered covered when any of its keywords appears
/// (case-insensitively) in a company policy text. Uncovered requirements
/// become gaps with this definition's gap type and severity.
#[derive(Debug, Clone)]
pub struct RequirementDef {
    pub gap_type: &'static str,
    pub summary: &'static str,
    pub keywords: &'static [&'static str],
    pub severity: Severity,
    pub affected_areas: &'static [&'static str],
}

/// A scheduled regulatory change in the feed.
///
/// The effective date is `effective_in_days` from the day of the query,
/// so change detection stays deterministic relative to the horizon.
#[derive(Debug, Clone)]
pub struct PendingChangeDef {
    pub change_type: &'static str,
    pub description: &'static str,
    pub impact_level: Severity,
    pub effective_in_days: i64,
    pub action_required: bool,
}

/// A regulation record in the catalog.
#[derive(Debug, Clone)]
pub struct RegulationInfo {
    pub name: &'static str,
    pub full_name: &'static str,
    pub jurisdiction: &'static str,
    pub effective_date: &'static str,
    pub last_updated: &'static str,
    pub key_requirements: &'static [&'static str],
    pub applicability: &'static str,
    pub penalties: &'static str,
    pub compliance_deadline: &'static str,
    /// Weight applied to (100 - score) when computing weighted risk.
    pub risk_weight: f64,
    pub requirements: &'static [RequirementDef],
    pub pending_changes: &'static [PendingChangeDef],
}

/// A compliance framework record (NIST CSF, ISO 27001, COBIT).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameworkInfo {
    pub name: String,
    pub full_name: String,
    pub version: String,
    pub domains: Vec<String>,
    pub controls_count: u32,
    pub applicability: String,
    pub maturity_levels: Vec<String>,
    pub last_updated: String,
}

/// Industry benchmark figures for one regulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkInfo {
    pub industry: String,
    pub regulation: String,
    pub average_score: u32,
    pub top_performers: u32,
    pub common_challenges: Vec<String>,
}

const GDPR_REQUIREMENTS: &[RequirementDef] = &[
    RequirementDef {
        gap_type: "data_retention",
        summary: "Storage limitation and retention schedules",
        keywords: &["retention", "storage limitation", "retained only as long"],
        severity: Severity::High,
        affected_areas: &["data_processing", "documentation"],
    },
    RequirementDef {
        gap_type: "consent_management",
        summary: "Lawful basis and consent handling",
        keywords: &["consent", "lawful basis"],
        severity: Severity::High,
        affected_areas: &["data_processing"],
    },
    RequirementDef {
        gap_type: "data_subject_rights",
        summary: "Access, rectification, erasure, and portability rights",
        keywords: &["right to access", "right to erasure", "data portability", "right to rectification"],
        severity: Severity::High,
        affected_areas: &["data_processing", "documentation"],
    },
    RequirementDef {
        gap_type: "dpo_requirement",
        summary: "Data Protection Officer appointment",
        keywords: &["data protection officer", "dpo"],
        severity: Severity::Medium,
        affected_areas: &["documentation", "training"],
    },
];

const HIPAA_REQUIREMENTS: &[RequirementDef] = &[
    RequirementDef {
        gap_type: "phi_encryption",
        summary: "Encryption of protected health information",
        keywords: &["encrypt"],
        severity: Severity::High,
        affected_areas: &["security"],
    },
    RequirementDef {
        gap_type: "access_controls",
        summary: "Role-based access with least privilege",
        keywords: &["access control", "least privilege", "role-based access"],
        severity: Severity::High,
        affected_areas: &["security", "data_processing"],
    },
    RequirementDef {
        gap_type: "breach_protocol",
        summary: "Breach assessment and notification procedures",
        keywords: &["breach"],
        severity: Severity::High,
        affected_areas: &["security", "documentation"],
    },
    RequirementDef {
        gap_type: "training_documentation",
        summary: "Workforce training with documented completion",
        keywords: &["training"],
        severity: Severity::Medium,
        affected_areas: &["training", "documentation"],
    },
];

const SOX_REQUIREMENTS: &[RequirementDef] = &[
    RequirementDef {
        gap_type: "financial_controls",
        summary: "Internal controls over financial reporting",
        keywords: &["internal control", "financial reporting", "financial controls"],
        severity: Severity::High,
        affected_areas: &["documentation", "data_processing"],
    },
    RequirementDef {
        gap_type: "documentation",
        summary: "Documented procedures for control activities",
        keywords: &["documented", "documentation"],
        severity: Severity::Medium,
        affected_areas: &["documentation"],
    },
    RequirementDef {
        gap_type: "internal_audit",
        summary: "Periodic internal audit of control effectiveness",
        keywords: &["internal audit", "audit"],
        severity: Severity::Medium,
        affected_areas: &["documentation"],
    },
    RequirementDef {
        gap_type: "disclosure_controls",
        summary: "Real-time disclosure of material changes",
        keywords: &["disclosure"],
        severity: Severity::High,
        affected_areas: &["documentation", "data_processing"],
    },
];

/// Requirements applied to regulations the catalog has no record for.
pub const GENERIC_REQUIREMENTS: &[RequirementDef] = &[
    RequirementDef {
        gap_type: "policy_gap",
        summary: "A policy addressing the regulation exists",
        keywords: &["policy", "compliance"],
        severity: Severity::Medium,
        affected_areas: &["documentation"],
    },
    RequirementDef {
        gap_type: "documentation_gap",
        summary: "Procedures are documented",
        keywords: &["documented", "documentation", "procedure"],
        severity: Severity::Medium,
        affected_areas: &["documentation"],
    },
    RequirementDef {
        gap_type: "process_gap",
        summary: "An operational process supports the requirement",
        keywords: &["process", "procedures", "response"],
        severity: Severity::Low,
        affected_areas: &["data_processing"],
    },
];

const GDPR: RegulationInfo = RegulationInfo {
    name: "GDPR",
    full_name: "General Data Protection Regulation",
    jurisdiction: "European Union",
    effective_date: "2018-05-25",
    last_updated: "2025-01-15",
    key_requirements: &[
        "Data protection by design and by default",
        "Lawful basis for processing",
        "Data subject rights",
        "Data breach notification",
        "Data Protection Officer appointment",
    ],
    applicability: "Organizations processing EU resident data",
    penalties: "Up to 4% of global annual turnover or \u{20ac}20 million",
    compliance_deadline: "Ongoing",
    risk_weight: 1.2,
    requirements: GDPR_REQUIREMENTS,
    pending_changes: &[PendingChangeDef {
        change_type: "guideline_update",
        description: "Updated GDPR guidance on international data transfers",
        impact_level: Severity::Medium,
        effective_in_days: 21,
        action_required: true,
    }],
};

const HIPAA: RegulationInfo = RegulationInfo {
    name: "HIPAA",
    full_name: "Health Insurance Portability and Accountability Act",
    jurisdiction: "United States",
    effective_date: "1996-08-21",
    last_updated: "2025-01-10",
    key_requirements: &[
        "Privacy Rule - Protected Health Information",
        "Security Rule - Administrative, Physical, Technical Safeguards",
        "Breach Notification Rule",
        "Enforcement Rule",
    ],
    applicability: "Healthcare providers, health plans, healthcare clearinghouses",
    penalties: "Up to $1.5 million per violation category per year",
    compliance_deadline: "Ongoing",
    risk_weight: 1.1,
    requirements: HIPAA_REQUIREMENTS,
    pending_changes: &[PendingChangeDef {
        change_type: "new_requirement",
        description: "Proposed Security Rule update strengthening risk analysis requirements",
        impact_level: Severity::High,
        effective_in_days: 120,
        action_required: false,
    }],
};

const SOX: RegulationInfo = RegulationInfo {
    name: "SOX",
    full_name: "Sarbanes-Oxley Act",
    jurisdiction: "United States",
    effective_date: "2002-07-30",
    last_updated: "2025-01-05",
    key_requirements: &[
        "Section 302 - Corporate responsibility for financial reports",
        "Section 404 - Management assessment of internal controls",
        "Section 409 - Real-time issuer disclosures",
        "Section 802 - Criminal penalties for altering documents",
    ],
    applicability: "Publicly traded companies in the US",
    penalties: "Fines and imprisonment for willful violations",
    compliance_deadline: "Annual financial reporting",
    risk_weight: 1.15,
    requirements: SOX_REQUIREMENTS,
    pending_changes: &[PendingChangeDef {
        change_type: "clarification",
        description: "SEC clarification on Section 404 scoping for smaller issuers",
        impact_level: Severity::Low,
        effective_in_days: 45,
        action_required: false,
    }],
};

/// Look up a regulation record by name (case-insensitive).
pub fn regulation(name: &str) -> Option<&'static RegulationInfo> {
    match name.to_uppercase().as_str() {
        "GDPR" => Some(&GDPR),
        "HIPAA" => Some(&HIPAA),
        "SOX" => Some(&SOX),
        _ => None,
    }
}

/// All regulation names the catalog has records for.
pub fn available_regulations() -> Vec<&'static str> {
    vec!["GDPR", "HIPAA", "SOX"]
}

/// Requirement definitions for a regulation, falling back to the generic set.
pub fn requirements_for(name: &str) -> &'static [RequirementDef] {
    regulation(name)
        .map(|r| r.requirements)
        .unwrap_or(GENERIC_REQUIREMENTS)
}

/// Risk weight for a regulation (1.0 for unknown regulations).
pub fn risk_weight(name: &str) -> f64 {
    regulation(name).map(|r| r.risk_weight).unwrap_or(1.0)
}

/// Look up a compliance framework by name (case-insensitive, `_`/`-` agnostic).
pub fn framework(name: &str) -> Option<FrameworkInfo> {
    let key = name.to_uppercase().replace('-', "_").replace(' ', "_");
    match key.as_str() {
        "NIST_CSF" => Some(FrameworkInfo {
            name: "NIST_CSF".into(),
            full_name: "NIST Cybersecurity Framework".into(),
            version: "2.0".into(),
            domains: ["Identify", "Protect", "Detect", "Respond", "Recover"]
                .map(String::from)
                .to_vec(),
            controls_count: 108,
            applicability: "All organizations managing cybersecurity risk".into(),
            maturity_levels: ["Partial", "Risk-Informed", "Repeatable", "Adaptive"]
                .map(String::from)
                .to_vec(),
            last_updated: "2024-02-26".into(),
        }),
        "ISO_27001" => Some(FrameworkInfo {
            name: "ISO_27001".into(),
            full_name: "ISO/IEC 27001 Information Security Management".into(),
            version: "2022".into(),
            domains: ["Organizational", "People", "Physical", "Technological"]
                .map(String::from)
                .to_vec(),
            controls_count: 93,
            applicability: "Organizations requiring formal ISMS certification".into(),
            maturity_levels: ["Implemented", "Managed", "Established", "Optimized"]
                .map(String::from)
                .to_vec(),
            last_updated: "2022-10-25".into(),
        }),
        "COBIT" => Some(FrameworkInfo {
            name: "COBIT".into(),
            full_name: "Control Objectives for Information and Related Technologies".into(),
            version: "2019".into(),
            domains: [
                "Align, Plan and Organize",
                "Build, Acquire and Implement",
                "Deliver, Service and Support",
                "Monitor, Evaluate and Assess",
            ]
            .map(String::from)
            .to_vec(),
            controls_count: 40,
            applicability: "Enterprise governance and management of information technology".into(),
            maturity_levels: vec!["0-5 scale from Non-existent to Optimized".into()],
            last_updated: "2019-01-01".into(),
        }),
        _ => None,
    }
}

/// All framework names the catalog has records for.
pub fn available_frameworks() -> Vec<&'static str> {
    vec!["NIST_CSF", "ISO_27001", "COBIT"]
}

/// Industry benchmark lookup (industry and regulation, both case-insensitive).
pub fn industry_benchmark(industry: &str, regulation_name: &str) -> Option<BenchmarkInfo> {
    let (avg, top, challenges): (u32, u32, &[&str]) =
        match (industry.to_lowercase().as_str(), regulation_name.to_uppercase().as_str()) {
            ("technology", "GDPR") => (82, 95, &["data_mapping", "consent_management"]),
            ("technology", "SOX") => (88, 96, &["internal_controls", "documentation"]),
            ("healthcare", "HIPAA") => (85, 98, &["phi_protection", "breach_response"]),
            ("healthcare", "GDPR") => (78, 92, &["cross_border_transfers", "patient_rights"]),
            ("finance", "SOX") => (90, 98, &["financial_reporting", "audit_trails"]),
            ("finance", "GDPR") => (80, 94, &["customer_data", "consent_management"]),
            _ => return None,
        };
    Some(BenchmarkInfo {
        industry: industry.to_lowercase(),
        regulation: regulation_name.to_uppercase(),
        average_score: avg,
        top_performers: top,
        common_challenges: challenges.iter().map(|s| s.to_string()).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regulation_lookup_case_insensitive() {
        assert!(regulation("gdpr").is_some());
        assert!(regulation("Hipaa").is_some());
        assert!(regulation("SOX").is_some());
        assert!(regulation("CCPA").is_none());
    }

    #[test]
    fn test_regulation_fields() {
        let gdpr = regulation("GDPR").unwrap();
        assert_eq!(gdpr.full_name, "General Data Protection Regulation");
        assert_eq!(gdpr.jurisdiction, "European Union");
        assert_eq!(gdpr.requirements.len(), 4);
        assert!(gdpr.key_requirements.len() >= 4);
    }

    #[test]
    fn test_requirements_fallback_for_unknown() {
        let reqs = requirements_for("CCPA");
        assert_eq!(reqs.len(), GENERIC_REQUIREMENTS.len());
        assert_eq!(reqs[0].gap_type, "policy_gap");
    }

    #[test]
    fn test_risk_weights() {
        assert_eq!(risk_weight("GDPR"), 1.2);
        assert_eq!(risk_weight("HIPAA"), 1.1);
        assert_eq!(risk_weight("SOX"), 1.15);
        assert_eq!(risk_weight("CCPA"), 1.0);
    }

    #[test]
    fn test_framework_lookup() {
        let nist = framework("nist-csf").unwrap();
        assert_eq!(nist.controls_count, 108);
        assert_eq!(nist.domains.len(), 5);

        let iso = framework("ISO_27001").unwrap();
        assert_eq!(iso.version, "2022");

        assert!(framework("PCI_DSS").is_none());
    }

    #[test]
    fn test_industry_benchmarks() {
        let bench = industry_benchmark("Technology", "gdpr").unwrap();
        assert_eq!(bench.average_score, 82);
        assert_eq!(bench.top_performers, 95);

        assert!(industry_benchmark("retail", "GDPR").is_none());
        assert!(industry_benchmark("finance", "HIPAA").is_none());
    }

    #[test]
    fn test_pending_changes_present() {
        for name in available_regulations() {
            let info = regulation(name).unwrap();
            assert!(!info.pending_changes.is_empty(), "{name} has no change feed");
        }
    }
}
