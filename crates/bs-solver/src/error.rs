//! Error types for solver invocation.

use thiserror::Error;

/// Errors raised by a Solver Engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Missing parameter: {name}")]
    MissingParameter { name: String },

    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("Step {step} is infeasible: {reason}")]
    Infeasible { step: usize, reason: String },

    #[error("Numerical failure: {what}")]
    Numerical { what: String },

    #[error("Unknown variable: {name}")]
    UnknownVariable { name: String },

    #[error("Solve cancelled")]
    Cancelled,

    #[error("Solve exceeded its deadline")]
    TimedOut,

    #[error("Engine error: {message}")]
    Backend { message: String },
}

pub type EngineResult<T> = Result<T, EngineError>;

/// A failed solve, carrying the engine's cause and a JSON diagnostic trace.
///
/// The trace is meant for server-side logs only.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Simulation failed: {cause}")]
pub struct SolverFailure {
    pub cause: EngineError,
    pub diagnostic: String,
}

impl SolverFailure {
    pub fn new(cause: EngineError, diagnostic: String) -> Self {
        Self { cause, diagnostic }
    }

    pub fn timed_out(diagnostic: String) -> Self {
        Self::new(EngineError::TimedOut, diagnostic)
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self.cause, EngineError::TimedOut)
    }
}

pub type SolverResult<T> = Result<T, SolverFailure>;
