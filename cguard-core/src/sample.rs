//! Built-in sample company data for demos and tests.

use chrono::NaiveDate;

use crate::types::{
    CompanyProfile, EncryptionStatus, Incident, PastAssessment, Policy, Severity, SystemKind,
    SystemRecord,
};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    // Components are compile-time constants in this module.
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

/// A mid-size technology company with realistic policies and systems.
pub fn sample_company() -> CompanyProfile {
    CompanyProfile {
        company_id: "techcorp-001".into(),
        company_name: "TechCorp Solutions".into(),
        industry: "technology".into(),
        employee_count: 850,
        revenue_range: "50M-100M".into(),
        operating_regions: vec!["EU".into(), "US".into(), "UK".into()],
        compliance_requirements: vec!["GDPR".into(), "HIPAA".into(), "SOX".into()],
        policies: sample_policies(),
        systems: sample_systems(),
        compliance_history: vec![
            PastAssessment {
                assessment_date: date(2025, 1, 20),
                overall_score: 74,
                assessor: "external_auditor".into(),
                key_findings: vec![
                    "Data retention schedules incomplete".into(),
                    "Breach response plan untested".into(),
                ],
            },
            PastAssessment {
                assessment_date: date(2025, 6, 18),
                overall_score: 81,
                assessor: "internal_compliance".into(),
                key_findings: vec!["Retention schedules now documented".into()],
            },
        ],
        recent_incidents: vec![Incident {
            date: date(2025, 4, 3),
            kind: "unauthorized_access_attempt".into(),
            severity: Severity::Medium,
            description: "Blocked credential-stuffing attempt against the customer portal".into(),
            resolution: "Rate limiting tightened and affected accounts forced to reset".into(),
        }],
    }
}

fn sample_policies() -> Vec<Policy> {
    vec![
        Policy {
            name: "Data Privacy Policy".into(),
            content: "TechCorp Solutions processes personal data only where a lawful basis \
                      exists and obtains explicit consent for marketing communications. Data \
                      subjects may exercise the right to access, right to rectification, right \
                      to erasure, and data portability through the privacy portal within 30 \
                      days. Personal data is retained only as long as necessary per the \
                      published retention schedule, after which it is securely deleted. The \
                      appointed Data Protection Officer reviews all processing activities \
                      quarterly and maintains the record of processing."
                .into(),
            version: "3.2".into(),
            last_updated: date(2025, 5, 12),
            status: "active".into(),
        },
        Policy {
            name: "Information Security Policy".into(),
            content: "All production data is encrypted at rest using AES-256 and in transit \
                      using TLS 1.3. Access control follows least privilege with role-based \
                      access reviewed quarterly. Suspected data breach events trigger the \
                      incident response process: containment within 4 hours, assessment within \
                      24 hours, and regulator notification within 72 hours where required. \
                      Security procedures are documented and tested through annual tabletop \
                      exercises."
                .into(),
            version: "2.7".into(),
            last_updated: date(2025, 3, 28),
            status: "active".into(),
        },
        Policy {
            name: "Corporate Governance and Training Policy".into(),
            content: "The finance organization maintains internal control over financial \
                      reporting, with control activities documented and tested by the internal \
                      audit function each quarter. All employees complete annual compliance \
                      training covering data handling, security awareness, and reporting \
                      obligations; completion is tracked in the learning management system. \
                      This policy and its supporting procedures are reviewed by the board \
                      audit committee annually."
                .into(),
            version: "1.9".into(),
            last_updated: date(2025, 2, 14),
            status: "active".into(),
        },
    ]
}

fn sample_systems() -> Vec<SystemRecord> {
    vec![
        SystemRecord {
            name: "Customer CRM".into(),
            kind: SystemKind::CloudSaas,
            vendor: "Salesforce".into(),
            data_categories: vec!["customer_contact_information".into(), "sales_records".into()],
            compliance_requirements: vec!["GDPR".into()],
            data_retention_period: "36 months".into(),
            encryption_status: EncryptionStatus::EncryptedAtRestAndTransit,
        },
        SystemRecord {
            name: "HR Management System".into(),
            kind: SystemKind::CloudSaas,
            vendor: "Workday".into(),
            data_categories: vec!["employee_records".into(), "health_benefits".into()],
            compliance_requirements: vec!["GDPR".into(), "HIPAA".into()],
            data_retention_period: "84 months".into(),
            encryption_status: EncryptionStatus::EncryptedAtRestAndTransit,
        },
        SystemRecord {
            name: "Financial Reporting Platform".into(),
            kind: SystemKind::OnPremises,
            vendor: "SAP".into(),
            data_categories: vec!["financial_records".into(), "audit_trails".into()],
            compliance_requirements: vec!["SOX".into()],
            data_retention_period: "120 months".into(),
            encryption_status: EncryptionStatus::EncryptedAtRest,
        },
        SystemRecord {
            name: "Marketing Automation Platform".into(),
            kind: SystemKind::CloudSaas,
            vendor: "HubSpot".into(),
            data_categories: vec!["prospect_data".into(), "campaign_analytics".into()],
            compliance_requirements: vec!["GDPR".into()],
            data_retention_period: "24 months".into(),
            encryption_status: EncryptionStatus::EncryptedInTransit,
        },
    ]
}

/// Industry variants of the sample company.
pub fn sample_company_for_industry(industry: &str) -> CompanyProfile {
    let mut profile = sample_company();
    match industry.to_lowercase().as_str() {
        "healthcare" => {
            profile.company_id = "medicare-plus-002".into();
            profile.company_name = "MediCare Plus".into();
            profile.industry = "healthcare".into();
            profile.employee_count = 1200;
            profile.compliance_requirements = vec!["HIPAA".into(), "GDPR".into()];
        }
        "finance" => {
            profile.company_id = "finserv-global-003".into();
            profile.company_name = "FinServ Global".into();
            profile.industry = "finance".into();
            profile.employee_count = 2400;
            profile.revenue_range = "500M-1B".into();
            profile.compliance_requirements = vec!["SOX".into(), "GDPR".into()];
        }
        _ => {}
    }
    profile
}

/// Industries with a distinct sample variant.
pub fn available_industries() -> Vec<&'static str> {
    vec!["technology", "healthcare", "finance"]
}

/// A demo scenario with the score range the sample data is built to produce.
#[derive(Debug, Clone)]
pub struct SampleScenario {
    pub name: &'static str,
    pub industry: &'static str,
    pub description: &'static str,
    pub expected_score_range: (u32, u32),
}

/// Scenarios the sample data supports, with expected overall score ranges.
pub fn scenarios() -> Vec<SampleScenario> {
    vec![
        SampleScenario {
            name: "technology_baseline",
            industry: "technology",
            description: "Mature policies with one under-encrypted marketing system \
                          and missing disclosure controls",
            expected_score_range: (80, 95),
        },
        SampleScenario {
            name: "healthcare_phi_focus",
            industry: "healthcare",
            description: "HIPAA-first posture sharing the baseline policy set",
            expected_score_range: (80, 95),
        },
        SampleScenario {
            name: "finance_sox_focus",
            industry: "finance",
            description: "SOX-first posture sharing the baseline policy set",
            expected_score_range: (80, 95),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_company_complete() {
        let company = sample_company();
        assert_eq!(company.policies.len(), 3);
        assert_eq!(company.systems.len(), 4);
        assert_eq!(company.compliance_history.len(), 2);
        assert_eq!(company.recent_incidents.len(), 1);
        assert!(company.compliance_requirements.contains(&"GDPR".to_string()));
    }

    #[test]
    fn test_sample_policies_cover_core_requirements() {
        let company = sample_company();
        let corpus: String = company
            .policies
            .iter()
            .map(|p| p.content.to_lowercase())
            .collect::<Vec<_>>()
            .join(" ");

        for keyword in ["consent", "retention", "encrypt", "breach", "training"] {
            assert!(corpus.contains(keyword), "missing keyword: {keyword}");
        }
    }

    #[test]
    fn test_industry_variants() {
        let healthcare = sample_company_for_industry("healthcare");
        assert_eq!(healthcare.industry, "healthcare");
        assert!(healthcare.compliance_requirements.contains(&"HIPAA".to_string()));

        let finance = sample_company_for_industry("Finance");
        assert_eq!(finance.industry, "finance");

        let default = sample_company_for_industry("retail");
        assert_eq!(default.industry, "technology");
    }

    #[test]
    fn test_scenarios_cover_all_industries() {
        let scenarios = scenarios();
        assert_eq!(scenarios.len(), available_industries().len());
        for scenario in &scenarios {
            assert!(available_industries().contains(&scenario.industry));
            assert!(scenario.expected_score_range.0 <= scenario.expected_score_range.1);
        }
    }

    #[test]
    fn test_sample_serializes_round_trip() {
        let company = sample_company();
        let json = serde_json::to_string(&company).unwrap();
        let back: CompanyProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(back.company_id, company.company_id);
        assert_eq!(back.systems.len(), company.systems.len());
    }
}
