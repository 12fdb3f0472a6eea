//! Audit trail for compliance activities.
//!
//! Every significant action (workflow phases, report generation, memory
//! writes) can be recorded as an audit event with a daily-sequenced
//! identifier, and the trail can be exported as JSON for auditors.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

/// A single audit event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    pub event_id: String,
    pub timestamp: DateTime<Utc>,
    pub actor: String,
    pub action: String,
    pub company_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

/// An append-only in-memory audit trail.
#[derive(Debug, Default)]
pub struct AuditLog {
    events: Vec<AuditEvent>,
    sequence_date: Option<NaiveDate>,
    sequence: u32,
}

impl AuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an event, returning its identifier.
    pub fn record(
        &mut self,
        actor: &str,
        action: &str,
        company_id: Option<&str>,
        details: Option<Value>,
    ) -> String {
        let now = Utc::now();
        let today = now.date_naive();

        // Sequence numbers restart each day.
        if self.sequence_date != Some(today) {
            self.sequence_date = Some(today);
            self.sequence = 0;
        }
        self.sequence += 1;

        let event_id = format!("AUDIT-{}-{:03}", today.format("%Y%m%d"), self.sequence);
        self.events.push(AuditEvent {
            event_id: event_id.clone(),
            timestamp: now,
            actor: actor.to_string(),
            action: action.to_string(),
            company_id: company_id.map(String::from),
            details,
        });
        event_id
    }

    pub fn events(&self) -> &[AuditEvent] {
        &self.events
    }

    /// Events touching one company, in recorded order.
    pub fn events_for_company(&self, company_id: &str) -> Vec<&AuditEvent> {
        self.events
            .iter()
            .filter(|e| e.company_id.as_deref() == Some(company_id))
            .collect()
    }

    /// Events recorded within a time window.
    pub fn events_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Vec<&AuditEvent> {
        self.events
            .iter()
            .filter(|e| e.timestamp >= from && e.timestamp <= to)
            .collect()
    }

    /// Export the full trail as pretty-printed JSON.
    pub fn export_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.events)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_ids_sequence_within_day() {
        let mut log = AuditLog::new();
        let first = log.record("orchestrator", "workflow_started", Some("acme-001"), None);
        let second = log.record("orchestrator", "workflow_completed", Some("acme-001"), None);

        assert!(first.ends_with("-001"));
        assert!(second.ends_with("-002"));
        assert_eq!(log.events().len(), 2);
    }

    #[test]
    fn test_events_for_company() {
        let mut log = AuditLog::new();
        log.record("orchestrator", "workflow_started", Some("acme-001"), None);
        log.record("orchestrator", "workflow_started", Some("globex-002"), None);
        log.record("session_manager", "cleanup", None, None);

        assert_eq!(log.events_for_company("acme-001").len(), 1);
        assert_eq!(log.events_for_company("globex-002").len(), 1);
    }

    #[test]
    fn test_events_between_window() {
        let mut log = AuditLog::new();
        log.record("orchestrator", "workflow_started", Some("acme-001"), None);

        let now = Utc::now();
        let hour = chrono::Duration::hours(1);
        assert_eq!(log.events_between(now - hour, now + hour).len(), 1);
        assert!(log.events_between(now + hour, now + hour + hour).is_empty());
    }

    #[test]
    fn test_export_json() {
        let mut log = AuditLog::new();
        log.record(
            "report_generator",
            "report_generated",
            Some("acme-001"),
            Some(serde_json::json!({ "report_id": "COMP-20250101-000000" })),
        );

        let json = log.export_json().unwrap();
        let parsed: Vec<AuditEvent> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].action, "report_generated");
    }
}
