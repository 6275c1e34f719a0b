//! Error types for the agentloops domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum; the top-level [`Error`]
//! is what a loop's `run` returns when it aborts.
//!
//! Only LLM failures and parse failures are fatal. Tool failures are
//! folded into the transcript via [`ToolError::to_observation`].

use std::fmt;
use thiserror::Error;

/// Where inside a run a fatal error happened. Step and iteration numbers
/// are 1-based, matching what the logs print.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// A reason-act cycle.
    Think { step: usize },
    /// Plan generation.
    Plan,
    /// Executing one plan step.
    Execute { step: usize },
    /// The initial artifact of a reflection run.
    Generate,
    /// Critiquing the latest artifact.
    Reflect { iteration: usize },
    /// Producing an improved artifact.
    Refine { iteration: usize },
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Think { step } => write!(f, "think (step {step})"),
            Stage::Plan => write!(f, "plan"),
            Stage::Execute { step } => write!(f, "execute (step {step})"),
            Stage::Generate => write!(f, "generate"),
            Stage::Reflect { iteration } => write!(f, "reflect (iteration {iteration})"),
            Stage::Refine { iteration } => write!(f, "refine (iteration {iteration})"),
        }
    }
}

/// The top-level error type for all agentloops operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- LLM errors ---
    #[error("LLM call failed during {stage}: {source}")]
    Llm {
        stage: Stage,
        #[source]
        source: ProviderError,
    },

    // --- Model output errors ---
    #[error("Could not parse model output at step {step}: {source}")]
    Parse {
        step: usize,
        #[source]
        source: ParseError,
    },

    #[error("Could not parse plan: {0}")]
    PlanParse(#[from] PlanParseError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Attach a stage to a provider failure.
    pub fn llm(stage: Stage, source: ProviderError) -> Self {
        Self::Llm { stage, source }
    }

    /// Whether this error was caused by a cancellation signal.
    pub fn is_cancelled(&self) -> bool {
        matches!(
            self,
            Error::Llm {
                source: ProviderError::Cancelled,
                ..
            }
        )
    }
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Failures of the LLM collaborator. Always fatal to the current run.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Stream interrupted: {0}")]
    StreamInterrupted(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("LLM returned an empty response")]
    EmptyResponse,

    #[error("Request cancelled")]
    Cancelled,
}

/// Malformed model output in the reason-act text protocol.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("no 'Action:' line in model output")]
    NoAction,

    #[error("action does not start with a tool name")]
    NoToolName,

    #[error("malformed action arguments: {0}")]
    MalformedArgs(String),
}

/// Malformed model output in the plan phase.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanParseError {
    #[error("plan is not a JSON array of strings: {0}")]
    InvalidJson(String),

    #[error("plan is empty")]
    EmptyPlan,
}

/// Failures at dispatch time. Recovered by the loop, never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Tool execution failed: {tool_name}: {reason}")]
    ExecutionFailed { tool_name: String, reason: String },

    #[error("Invalid tool arguments: {0}")]
    InvalidArguments(String),

    #[error("Tool call cancelled: {0}")]
    Cancelled(String),
}

impl ToolError {
    /// Render this error as an observation line the model can react to.
    pub fn to_observation(&self) -> String {
        match self {
            ToolError::NotFound(name) => {
                format!("Error: no tool named '{name}' is available.")
            }
            ToolError::ExecutionFailed { tool_name, reason } => {
                format!("Error: tool '{tool_name}' failed: {reason}")
            }
            ToolError::InvalidArguments(reason) => {
                format!("Error: invalid tool input: {reason}")
            }
            ToolError::Cancelled(name) => {
                format!("Error: tool '{name}' was cancelled.")
            }
        }
    }
}
