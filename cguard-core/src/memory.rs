//! Persistent memory bank for compliance assessments.
//!
//! Stores one entry per completed workflow, keyed by company, and derives
//! trends (score trajectory, recurring gaps) from the retained history.
//! Entries persist as JSON under the configured data directory and are
//! reloaded on construction, so history survives restarts.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::agents::analyzer::AnalysisResults;
use crate::agents::risk::RiskAssessment;
use crate::catalog::{self, BenchmarkInfo};
use crate::config::MemoryConfig;
use crate::error::MemoryError;
use crate::types::{Severity, Trend};

const MEMORY_FILE: &str = "memory.json";

/// One stored assessment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryEntry {
    pub entry_id: String,
    pub company_id: String,
    pub timestamp: DateTime<Utc>,
    pub overall_score: u32,
    pub regulation_scores: BTreeMap<String, u32>,
    pub gap_types: Vec<String>,
    pub high_severity_gaps: usize,
    pub risk_score: f64,
    pub report_id: String,
}

/// A stored compliance pattern observed across assessments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternEntry {
    pub pattern_id: String,
    pub description: String,
    pub companies_affected: Vec<String>,
    pub recorded_at: DateTime<Utc>,
}

/// Trend analysis over a company's assessment history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendAnalysis {
    pub company_id: String,
    pub assessments_analyzed: usize,
    pub score_trend: Trend,
    pub latest_score: u32,
    /// Gap types by number of assessments they appeared in, most frequent first.
    pub recurring_gaps: Vec<(String, usize)>,
    /// Gap types appearing in at least two assessments.
    pub improvement_areas: Vec<String>,
    /// Confidence in the trend, scaled by sample size.
    pub confidence: u32,
}

/// Lifetime counters for the memory bank.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryMetrics {
    pub total_stored: u64,
    pub compactions_performed: u64,
    pub last_compaction: Option<DateTime<Utc>>,
}

/// On-disk snapshot of the memory bank.
#[derive(Debug, Default, Serialize, Deserialize)]
struct MemoryState {
    entries: Vec<MemoryEntry>,
    patterns: Vec<PatternEntry>,
    #[serde(default)]
    metrics: MemoryMetrics,
}

/// The compliance memory bank.
pub struct MemoryBank {
    config: MemoryConfig,
    data_dir: PathBuf,
    state: MemoryState,
}

impl MemoryBank {
    /// Open the memory bank, loading any persisted state from `data_dir`.
    pub fn open(config: MemoryConfig, data_dir: PathBuf) -> Result<Self, MemoryError> {
        let mut bank = Self {
            config,
            data_dir,
            state: MemoryState::default(),
        };
        bank.load()?;
        Ok(bank)
    }

    /// Record a completed assessment for a company.
    pub fn store_assessment(
        &mut self,
        company_id: &str,
        analysis: &AnalysisResults,
        risk: &RiskAssessment,
        report_id: &str,
    ) -> Result<String, MemoryError> {
        if self.state.entries.len() >= self.config.max_entries {
            self.compact();
            if self.state.entries.len() >= self.config.max_entries {
                return Err(MemoryError::CapacityExceeded);
            }
        }

        let now = Utc::now();
        let entry_id = format!("COMP-{}-{}", company_id, now.format("%Y%m%d%H%M%S"));
        let entry = MemoryEntry {
            entry_id: entry_id.clone(),
            company_id: company_id.to_string(),
            timestamp: now,
            overall_score: analysis.overall_score,
            regulation_scores: analysis.regulation_scores.clone(),
            gap_types: analysis
                .gap_analysis
                .iter()
                .map(|g| g.gap_type.clone())
                .collect(),
            high_severity_gaps: analysis
                .gap_analysis
                .iter()
                .filter(|g| g.severity == Severity::High)
                .count(),
            risk_score: risk.overall_risk_score,
            report_id: report_id.to_string(),
        };

        self.state.entries.push(entry);
        self.state.metrics.total_stored += 1;
        self.save()?;

        info!(company = %company_id, entry = %entry_id, "Assessment stored in memory bank");
        Ok(entry_id)
    }

    /// Retrieve a company's history within the lookback window, newest first.
    pub fn retrieve_history(
        &self,
        company_id: &str,
        lookback_days: i64,
    ) -> Result<Vec<MemoryEntry>, MemoryError> {
        let cutoff = Utc::now() - Duration::days(lookback_days);
        let mut entries: Vec<MemoryEntry> = self
            .state
            .entries
            .iter()
            .filter(|e| e.company_id == company_id && e.timestamp >= cutoff)
            .cloned()
            .collect();

        if entries.is_empty() {
            return Err(MemoryError::NoHistory {
                company_id: company_id.to_string(),
            });
        }
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(entries)
    }

    /// Analyze compliance trends for a company over the last 180 days.
    pub fn analyze_trends(&self, company_id: &str) -> Result<TrendAnalysis, MemoryError> {
        let entries = self.retrieve_history(company_id, 180)?;

        // retrieve_history returns newest first; trend compares the two
        // most recent assessments.
        let score_trend = if entries.len() < 2 {
            Trend::InsufficientData
        } else {
            let latest = entries[0].overall_score;
            let previous = entries[1].overall_score;
            if latest > previous {
                Trend::Improving
            } else if latest < previous {
                Trend::Declining
            } else {
                Trend::Stable
            }
        };

        let mut gap_counts: BTreeMap<String, usize> = BTreeMap::new();
        for entry in &entries {
            let mut seen: Vec<&str> = Vec::new();
            for gap_type in &entry.gap_types {
                // Count each gap type once per assessment.
                if !seen.contains(&gap_type.as_str()) {
                    seen.push(gap_type);
                    *gap_counts.entry(gap_type.clone()).or_default() += 1;
                }
            }
        }
        let mut recurring_gaps: Vec<(String, usize)> = gap_counts.into_iter().collect();
        recurring_gaps.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        let improvement_areas = recurring_gaps
            .iter()
            .filter(|(_, count)| *count >= 2)
            .map(|(gap_type, _)| gap_type.clone())
            .collect();

        Ok(TrendAnalysis {
            company_id: company_id.to_string(),
            assessments_analyzed: entries.len(),
            score_trend,
            latest_score: entries[0].overall_score,
            recurring_gaps,
            improvement_areas,
            confidence: ((entries.len() as u32) * 10).min(95),
        })
    }

    /// Record a cross-company compliance pattern.
    pub fn store_pattern(
        &mut self,
        description: &str,
        companies_affected: Vec<String>,
    ) -> Result<String, MemoryError> {
        let now = Utc::now();
        let pattern_id = format!("PAT-{}", now.format("%Y%m%d%H%M%S"));
        self.state.patterns.push(PatternEntry {
            pattern_id: pattern_id.clone(),
            description: description.to_string(),
            companies_affected,
            recorded_at: now,
        });
        self.save()?;
        Ok(pattern_id)
    }

    pub fn patterns(&self) -> &[PatternEntry] {
        &self.state.patterns
    }

    /// Industry benchmarks for the regulations a company is scored against.
    pub fn industry_benchmarks(&self, industry: &str, regulations: &[String]) -> Vec<BenchmarkInfo> {
        regulations
            .iter()
            .filter_map(|regulation| catalog::industry_benchmark(industry, regulation))
            .collect()
    }

    /// Total stored entries across all companies.
    pub fn entry_count(&self) -> usize {
        self.state.entries.len()
    }

    /// Lifetime counters (survive restarts with the rest of the state).
    pub fn metrics(&self) -> &MemoryMetrics {
        &self.state.metrics
    }

    /// Drop low-signal history: per company, keep entries that are either
    /// notable (score below 70 or any high-severity gap) or among the most
    /// recent `retained_per_company`.
    pub fn compact(&mut self) {
        let before = self.state.entries.len();

        let mut by_company: BTreeMap<String, Vec<MemoryEntry>> = BTreeMap::new();
        for entry in self.state.entries.drain(..) {
            by_company.entry(entry.company_id.clone()).or_default().push(entry);
        }

        for entries in by_company.values_mut() {
            entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
            let retained = self.config.retained_per_company;
            let mut kept: Vec<MemoryEntry> = Vec::new();
            for (index, entry) in entries.drain(..).enumerate() {
                let notable = entry.overall_score < 70 || entry.high_severity_gaps > 0;
                if index < retained || notable {
                    kept.push(entry);
                }
            }
            self.state.entries.extend(kept);
        }
        self.state
            .entries
            .sort_by(|a, b| a.timestamp.cmp(&b.timestamp));

        self.state.metrics.compactions_performed += 1;
        self.state.metrics.last_compaction = Some(Utc::now());

        let dropped = before - self.state.entries.len();
        if dropped > 0 {
            debug!(dropped, remaining = self.state.entries.len(), "Memory bank compacted");
        }
    }

    fn memory_path(&self) -> PathBuf {
        self.data_dir.join(MEMORY_FILE)
    }

    fn load(&mut self) -> Result<(), MemoryError> {
        let path = self.memory_path();
        if !path.exists() {
            return Ok(());
        }
        let contents = std::fs::read_to_string(&path).map_err(|e| MemoryError::PersistenceError {
            message: format!("failed to read {}: {}", path.display(), e),
        })?;
        match serde_json::from_str::<MemoryState>(&contents) {
            Ok(state) => {
                info!(
                    entries = state.entries.len(),
                    patterns = state.patterns.len(),
                    "Loaded memory bank"
                );
                self.state = state;
            }
            Err(e) => {
                // A corrupt file is not fatal; start fresh rather than
                // blocking every workflow.
                warn!(path = %path.display(), error = %e, "Memory file unreadable, starting empty");
            }
        }
        Ok(())
    }

    fn save(&self) -> Result<(), MemoryError> {
        std::fs::create_dir_all(&self.data_dir).map_err(|e| MemoryError::PersistenceError {
            message: format!("failed to create {}: {}", self.data_dir.display(), e),
        })?;
        let path = self.memory_path();
        let json = serde_json::to_string_pretty(&self.state).map_err(|e| {
            MemoryError::PersistenceError {
                message: format!("failed to serialize memory state: {}", e),
            }
        })?;
        std::fs::write(&path, json).map_err(|e| MemoryError::PersistenceError {
            message: format!("failed to write {}: {}", path.display(), e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::analyzer::RiskSummary;
    use crate::agents::risk::{ComplianceHealth, HealthStatus};
    use crate::types::{Gap, RiskLevel};

    fn test_bank(dir: &std::path::Path) -> MemoryBank {
        MemoryBank::open(MemoryConfig::default(), dir.to_path_buf()).unwrap()
    }

    fn analysis(score: u32, gap_types: &[&str]) -> AnalysisResults {
        AnalysisResults {
            overall_score: score,
            regulation_scores: BTreeMap::from([("GDPR".to_string(), score)]),
            gap_analysis: gap_types
                .iter()
                .map(|gap_type| Gap {
                    regulation: "GDPR".into(),
                    gap_type: gap_type.to_string(),
                    severity: Severity::Medium,
                    description: "test".into(),
                    affected_areas: vec![],
                })
                .collect(),
            recommendations: Vec::new(),
            risk_summary: RiskSummary {
                risk_level: RiskLevel::from_compliance_score(score),
                confidence_score: 90,
                key_risks: Vec::new(),
                monitoring_recommendations: Vec::new(),
            },
            timestamp: Utc::now(),
        }
    }

    fn risk(score: u32) -> RiskAssessment {
        RiskAssessment {
            overall_risk_score: f64::from(100 - score),
            overall_risk_level: RiskLevel::from_risk_score(f64::from(100 - score)),
            regulation_risks: BTreeMap::new(),
            risk_factors: Vec::new(),
            mitigation_strategies: Vec::new(),
            compliance_health: ComplianceHealth {
                status: HealthStatus::from_score(score),
                trend: Trend::InsufficientData,
                next_review: Utc::now().date_naive(),
            },
            predicted_risks: Vec::new(),
        }
    }

    #[test]
    fn test_store_and_retrieve() {
        let dir = tempfile::tempdir().unwrap();
        let mut bank = test_bank(dir.path());

        let entry_id = bank
            .store_assessment("acme-001", &analysis(82, &["data_retention"]), &risk(82), "COMP-1")
            .unwrap();
        assert!(entry_id.starts_with("COMP-acme-001-"));

        let history = bank.retrieve_history("acme-001", 30).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].overall_score, 82);
        assert_eq!(history[0].gap_types, vec!["data_retention"]);
    }

    #[test]
    fn test_no_history_error() {
        let dir = tempfile::tempdir().unwrap();
        let bank = test_bank(dir.path());
        let err = bank.retrieve_history("unknown", 30).unwrap_err();
        assert!(matches!(err, MemoryError::NoHistory { .. }));
    }

    #[test]
    fn test_persistence_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut bank = test_bank(dir.path());
            bank.store_assessment("acme-001", &analysis(75, &[]), &risk(75), "COMP-1")
                .unwrap();
        }
        let bank = test_bank(dir.path());
        assert_eq!(bank.entry_count(), 1);
        assert!(bank.retrieve_history("acme-001", 30).is_ok());
    }

    #[test]
    fn test_corrupt_memory_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(MEMORY_FILE), "not json").unwrap();
        let bank = test_bank(dir.path());
        assert_eq!(bank.entry_count(), 0);
    }

    #[test]
    fn test_trend_analysis_recurring_gaps() {
        let dir = tempfile::tempdir().unwrap();
        let mut bank = test_bank(dir.path());

        bank.store_assessment(
            "acme-001",
            &analysis(70, &["data_retention", "consent_management"]),
            &risk(70),
            "COMP-1",
        )
        .unwrap();
        bank.store_assessment(
            "acme-001",
            &analysis(78, &["data_retention"]),
            &risk(78),
            "COMP-2",
        )
        .unwrap();

        let trends = bank.analyze_trends("acme-001").unwrap();
        assert_eq!(trends.assessments_analyzed, 2);
        assert_eq!(trends.score_trend, Trend::Improving);
        assert_eq!(trends.latest_score, 78);
        assert_eq!(trends.recurring_gaps[0], ("data_retention".to_string(), 2));
        assert_eq!(trends.improvement_areas, vec!["data_retention"]);
        assert_eq!(trends.confidence, 20);
    }

    #[test]
    fn test_trend_single_assessment_insufficient() {
        let dir = tempfile::tempdir().unwrap();
        let mut bank = test_bank(dir.path());
        bank.store_assessment("acme-001", &analysis(80, &[]), &risk(80), "COMP-1")
            .unwrap();

        let trends = bank.analyze_trends("acme-001").unwrap();
        assert_eq!(trends.score_trend, Trend::InsufficientData);
        assert_eq!(trends.confidence, 10);
    }

    #[test]
    fn test_compaction_keeps_notable_entries() {
        let dir = tempfile::tempdir().unwrap();
        let config = MemoryConfig {
            retained_per_company: 2,
            ..Default::default()
        };
        let mut bank = MemoryBank::open(config, dir.path().to_path_buf()).unwrap();

        // Four healthy entries, one failing.
        for score in [85, 88, 90, 92] {
            bank.store_assessment("acme-001", &analysis(score, &[]), &risk(score), "COMP-x")
                .unwrap();
        }
        bank.store_assessment("acme-001", &analysis(55, &[]), &risk(55), "COMP-y")
            .unwrap();

        bank.compact();
        let history = bank.retrieve_history("acme-001", 30).unwrap();
        // The failing entry is also the most recent, so the two retained
        // slots cover it plus the 92 entry; the rest are dropped.
        assert_eq!(history.len(), 2);
        assert!(history.iter().any(|e| e.overall_score == 55));
        assert!(history.iter().any(|e| e.overall_score == 92));
    }

    #[test]
    fn test_metrics_persist_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut bank = test_bank(dir.path());
            bank.store_assessment("acme-001", &analysis(80, &[]), &risk(80), "COMP-1")
                .unwrap();
            bank.compact();
            bank.store_pattern("test pattern", vec![]).unwrap();
        }
        let bank = test_bank(dir.path());
        assert_eq!(bank.metrics().total_stored, 1);
        assert_eq!(bank.metrics().compactions_performed, 1);
        assert!(bank.metrics().last_compaction.is_some());
    }

    #[test]
    fn test_store_pattern() {
        let dir = tempfile::tempdir().unwrap();
        let mut bank = test_bank(dir.path());
        let pattern_id = bank
            .store_pattern(
                "Recurring consent management weakness in technology sector",
                vec!["acme-001".into(), "globex-002".into()],
            )
            .unwrap();
        assert!(pattern_id.starts_with("PAT-"));
        assert_eq!(bank.patterns().len(), 1);
    }

    #[test]
    fn test_industry_benchmarks() {
        let dir = tempfile::tempdir().unwrap();
        let bank = test_bank(dir.path());
        let benchmarks = bank.industry_benchmarks(
            "technology",
            &["GDPR".to_string(), "SOX".to_string(), "HIPAA".to_string()],
        );
        // HIPAA has no technology benchmark row.
        assert_eq!(benchmarks.len(), 2);
        assert_eq!(benchmarks[0].average_score, 82);
    }
}
