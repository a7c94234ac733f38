//! Error types for the agent core.
//!
//! Errors raised inside a single tool call are [`ToolError`]s and never leave
//! the dispatcher. Everything that aborts a turn is an [`AgentError`].

use std::time::Duration;
use thiserror::Error;

/// Fatal errors for a turn. The session history is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AgentError {
    #[error("model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("model call timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("no final answer after {0} model calls")]
    RunawayLoop(usize),
}

/// Errors contained by the dispatcher and reported back to the model.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error("timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error(transparent)]
    ExecutionFailure(#[from] anyhow::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("an email address is required to start a session")]
    MissingEmail,

    #[error("a phone number is required to start a session")]
    MissingPhone,
}
