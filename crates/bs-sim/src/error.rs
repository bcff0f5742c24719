//! Error types for the reference engine.

use bs_solver::EngineError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Missing parameter: {name}")]
    MissingParameter { name: &'static str },

    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("Non-physical condition: {what}")]
    NonPhysical { what: String },

    #[error("Step {step} is infeasible: {reason}")]
    Infeasible { step: usize, reason: String },

    #[error("Engine stopped: {0}")]
    Stopped(EngineError),
}

pub type SimResult<T> = Result<T, SimError>;

impl From<SimError> for EngineError {
    fn from(e: SimError) -> Self {
        match e {
            SimError::InvalidArg { what } => EngineError::Backend {
                message: format!("invalid engine argument: {what}"),
            },
            SimError::MissingParameter { name } => EngineError::MissingParameter {
                name: name.to_string(),
            },
            SimError::InvalidParameter { name, reason } => EngineError::InvalidParameter {
                name: name.to_string(),
                reason,
            },
            SimError::NonPhysical { what } => EngineError::Numerical { what },
            SimError::Infeasible { step, reason } => EngineError::Infeasible { step, reason },
            SimError::Stopped(inner) => inner,
        }
    }
}

impl From<EngineError> for SimError {
    fn from(e: EngineError) -> Self {
        SimError::Stopped(e)
    }
}
