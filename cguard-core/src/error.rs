//! Error types for the ComplianceGuard core.
//!
//! Uses `thiserror` for public API error types with structured variants
//! covering configuration, agents, memory, sessions, tools, and workflows.

use std::path::PathBuf;

/// Top-level error type for the ComplianceGuard core library.
#[derive(Debug, thiserror::Error)]
pub enum GuardError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Agent error: {0}")]
    Agent(#[from] AgentError),

    #[error("Memory error: {0}")]
    Memory(#[from] MemoryError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    #[error("Workflow error: {0}")]
    Workflow(#[from] WorkflowError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors from the configuration system.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Configuration parse error: {message}")]
    ParseError { message: String },
}

/// Errors from individual compliance agents.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("Agent '{name}' is not enabled")]
    Disabled { name: String },

    #[error("Agent '{name}' failed: {message}")]
    ExecutionFailed { name: String, message: String },

    #[error("Regulation '{regulation}' could not be fetched: {message}")]
    RegulationFetch { regulation: String, message: String },

    #[error("No regulatory data available for analysis")]
    NoRegulatoryData,
}

/// Errors from the memory bank.
#[derive(Debug, thiserror::Error)]
pub enum MemoryError {
    #[error("Memory persistence error: {message}")]
    PersistenceError { message: String },

    #[error("No compliance history found for company: {company_id}")]
    NoHistory { company_id: String },

    #[error("Memory capacity exceeded")]
    CapacityExceeded,
}

/// Errors from the session manager.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Session not found: {session_id}")]
    NotFound { session_id: String },

    #[error("Session limit reached ({max} active sessions)")]
    LimitReached { max: usize },

    #[error("Session {session_id} has already ended")]
    AlreadyEnded { session_id: String },
}

/// Errors from tool registration and execution.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("Tool not found: {name}")]
    NotFound { name: String },

    #[error("Tool already registered: {name}")]
    AlreadyRegistered { name: String },

    #[error("Invalid arguments for tool '{name}': {reason}")]
    InvalidArguments { name: String, reason: String },

    #[error("Tool '{name}' execution failed: {message}")]
    ExecutionFailed { name: String, message: String },

    #[error("Tool '{name}' timed out after {timeout_secs}s")]
    Timeout { name: String, timeout_secs: u64 },
}

/// Errors from the workflow orchestrator.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("Workflow {workflow_id} failed during {phase}: {message}")]
    PhaseFailed {
        workflow_id: String,
        phase: String,
        message: String,
    },

    #[error("Monitoring is already running")]
    MonitoringActive,

    #[error("Orchestrator has been shut down")]
    ShutDown,
}

/// A type alias for results using the top-level `GuardError`.
pub type Result<T> = std::result::Result<T, GuardError>;
