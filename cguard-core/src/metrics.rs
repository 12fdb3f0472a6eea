//! Per-agent metrics — request and error counters for observability.

use chrono::{DateTime, Utc};

/// Counters tracked for each compliance agent.
#[derive(Debug, Default)]
pub struct AgentMetrics {
    pub requests_processed: u64,
    pub errors: u64,
    pub last_activity: Option<DateTime<Utc>>,
}

impl AgentMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a processed request.
    pub fn record_request(&mut self) {
        self.requests_processed += 1;
        self.last_activity = Some(Utc::now());
    }

    /// Record an error.
    pub fn record_error(&mut self) {
        self.errors += 1;
        self.last_activity = Some(Utc::now());
    }

    /// Get an immutable snapshot of the counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests_processed: self.requests_processed,
            errors: self.errors,
            last_activity: self.last_activity,
        }
    }
}

/// Immutable snapshot of agent metrics at a point in time.
#[derive(Debug, Clone, serde::Serialize)]
pub struct MetricsSnapshot {
    pub requests_processed: u64,
    pub errors: u64,
    pub last_activity: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_default() {
        let m = AgentMetrics::new();
        assert_eq!(m.requests_processed, 0);
        assert_eq!(m.errors, 0);
        assert!(m.last_activity.is_none());
    }

    #[test]
    fn test_record_request_and_error() {
        let mut m = AgentMetrics::new();
        m.record_request();
        m.record_request();
        m.record_error();

        assert_eq!(m.requests_processed, 2);
        assert_eq!(m.errors, 1);
        assert!(m.last_activity.is_some());
    }

    #[test]
    fn test_snapshot() {
        let mut m = AgentMetrics::new();
        m.record_request();
        let snap = m.snapshot();
        assert_eq!(snap.requests_processed, 1);
        assert_eq!(snap.errors, 0);
    }
}
