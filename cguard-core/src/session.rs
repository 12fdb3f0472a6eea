//! Session management for compliance workflows.
//!
//! Each workflow run happens inside a session: a UUID-keyed record of
//! context, per-agent interactions, and progress. Sessions expire after
//! the configured inactivity timeout; a background sweep task evicts
//! them and can be stopped via a cancellation token.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::SessionConfig;
use crate::error::SessionError;

/// One agent interaction recorded in a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentInteraction {
    pub agent: String,
    pub action: String,
    pub elapsed_ms: u64,
    pub timestamp: DateTime<Utc>,
}

/// A compliance workflow session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub session_id: String,
    pub company_id: String,
    pub session_type: String,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    /// Workflow completion percentage, advanced per agent phase.
    pub progress: u8,
    pub context: HashMap<String, Value>,
    pub interactions: Vec<AgentInteraction>,
}

impl Session {
    /// Total time spent across recorded agent interactions.
    pub fn total_elapsed_ms(&self) -> u64 {
        self.interactions.iter().map(|i| i.elapsed_ms).sum()
    }
}

/// Final metrics returned when a session ends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionMetrics {
    pub session_id: String,
    pub company_id: String,
    pub duration_seconds: f64,
    pub interactions: usize,
    pub distinct_agents: usize,
    pub total_agent_time_ms: u64,
    pub average_agent_time_ms: f64,
    pub final_progress: u8,
    /// Whether the workflow reached the final phase.
    pub completed: bool,
}

/// Manages the lifecycle of workflow sessions.
#[derive(Clone)]
pub struct SessionManager {
    config: SessionConfig,
    sessions: Arc<RwLock<HashMap<String, Session>>>,
}

impl SessionManager {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Create a session for a company, merging any initial context.
    pub async fn create_session(
        &self,
        company_id: &str,
        session_type: &str,
        context: HashMap<String, Value>,
    ) -> Result<String, SessionError> {
        let mut sessions = self.sessions.write().await;

        let active = sessions.values().filter(|s| s.ended_at.is_none()).count();
        if active >= self.config.max_sessions {
            return Err(SessionError::LimitReached {
                max: self.config.max_sessions,
            });
        }

        let session_id = Uuid::new_v4().to_string();
        let now = Utc::now();
        sessions.insert(
            session_id.clone(),
            Session {
                session_id: session_id.clone(),
                company_id: company_id.to_string(),
                session_type: session_type.to_string(),
                created_at: now,
                last_activity: now,
                ended_at: None,
                progress: 0,
                context,
                interactions: Vec::new(),
            },
        );

        info!(session = %session_id, company = %company_id, "Session created");
        Ok(session_id)
    }

    /// Fetch a snapshot of a session.
    pub async fn get_session(&self, session_id: &str) -> Result<Session, SessionError> {
        let sessions = self.sessions.read().await;
        sessions
            .get(session_id)
            .cloned()
            .ok_or_else(|| SessionError::NotFound {
                session_id: session_id.to_string(),
            })
    }

    /// Merge additional context into a session.
    pub async fn update_context(
        &self,
        session_id: &str,
        updates: HashMap<String, Value>,
    ) -> Result<(), SessionError> {
        let mut sessions = self.sessions.write().await;
        let session = Self::active_session(&mut sessions, session_id)?;
        session.context.extend(updates);
        session.last_activity = Utc::now();
        Ok(())
    }

    /// Record an agent interaction and advance workflow progress.
    pub async fn record_agent_interaction(
        &self,
        session_id: &str,
        agent: &str,
        action: &str,
        elapsed_ms: u64,
    ) -> Result<(), SessionError> {
        let mut sessions = self.sessions.write().await;
        let session = Self::active_session(&mut sessions, session_id)?;

        session.interactions.push(AgentInteraction {
            agent: agent.to_string(),
            action: action.to_string(),
            elapsed_ms,
            timestamp: Utc::now(),
        });
        session.progress = Self::progress_for(agent).max(session.progress);
        session.last_activity = Utc::now();

        debug!(session = %session_id, agent = %agent, elapsed_ms, "Agent interaction recorded");
        Ok(())
    }

    /// End a session and return its final metrics.
    pub async fn end_session(&self, session_id: &str) -> Result<SessionMetrics, SessionError> {
        let mut sessions = self.sessions.write().await;
        let session = Self::active_session(&mut sessions, session_id)?;

        let now = Utc::now();
        session.ended_at = Some(now);

        let mut agents: Vec<&str> = session.interactions.iter().map(|i| i.agent.as_str()).collect();
        agents.sort_unstable();
        agents.dedup();

        let total_agent_time_ms = session.total_elapsed_ms();
        let metrics = SessionMetrics {
            session_id: session.session_id.clone(),
            company_id: session.company_id.clone(),
            duration_seconds: (now - session.created_at).num_milliseconds() as f64 / 1000.0,
            interactions: session.interactions.len(),
            distinct_agents: agents.len(),
            total_agent_time_ms,
            average_agent_time_ms: if session.interactions.is_empty() {
                0.0
            } else {
                total_agent_time_ms as f64 / session.interactions.len() as f64
            },
            final_progress: session.progress,
            completed: session.progress == 100,
        };

        info!(
            session = %session_id,
            duration_s = metrics.duration_seconds,
            "Session ended"
        );
        Ok(metrics)
    }

    /// List sessions for a company, newest first.
    pub async fn sessions_for_company(&self, company_id: &str) -> Vec<Session> {
        let sessions = self.sessions.read().await;
        let mut matching: Vec<Session> = sessions
            .values()
            .filter(|s| s.company_id == company_id)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matching
    }

    /// List sessions of a given type, newest first.
    pub async fn sessions_of_type(&self, session_type: &str) -> Vec<Session> {
        let sessions = self.sessions.read().await;
        let mut matching: Vec<Session> = sessions
            .values()
            .filter(|s| s.session_type == session_type)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matching
    }

    /// Count of sessions that have not ended.
    pub async fn active_session_count(&self) -> usize {
        let sessions = self.sessions.read().await;
        sessions.values().filter(|s| s.ended_at.is_none()).count()
    }

    /// Remove sessions idle beyond the timeout. Returns how many were evicted.
    pub async fn cleanup_expired(&self) -> usize {
        let timeout = Duration::minutes(self.config.timeout_minutes as i64);
        let cutoff = Utc::now() - timeout;

        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| s.ended_at.is_some() || s.last_activity >= cutoff);
        let evicted = before - sessions.len();
        if evicted > 0 {
            info!(evicted, "Expired sessions cleaned up");
        }
        evicted
    }

    /// Spawn the periodic expiry sweep as a background task.
    pub fn spawn_cleanup_task(&self, cancel: CancellationToken) -> tokio::task::JoinHandle<()> {
        let manager = self.clone();
        tokio::spawn(async move {
            manager.run_cleanup_loop(cancel).await;
        })
    }

    /// Run the periodic expiry sweep until the token is cancelled.
    pub async fn run_cleanup_loop(&self, cancel: CancellationToken) {
        let interval = std::time::Duration::from_secs(self.config.cleanup_interval_secs);
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("Session cleanup loop stopped");
                    return;
                }
                _ = tokio::time::sleep(interval) => {
                    self.cleanup_expired().await;
                }
            }
        }
    }

    fn active_session<'a>(
        sessions: &'a mut HashMap<String, Session>,
        session_id: &str,
    ) -> Result<&'a mut Session, SessionError> {
        let session = sessions
            .get_mut(session_id)
            .ok_or_else(|| SessionError::NotFound {
                session_id: session_id.to_string(),
            })?;
        if session.ended_at.is_some() {
            return Err(SessionError::AlreadyEnded {
                session_id: session_id.to_string(),
            });
        }
        Ok(session)
    }

    /// Workflow completion percentage after each agent phase.
    fn progress_for(agent: &str) -> u8 {
        match agent {
            "regulation_monitor" => 25,
            "compliance_analyzer" => 50,
            "risk_assessor" => 75,
            "report_generator" => 100,
            _ => 0,
        }
    }
}
