//! Error types for the bs-app service layer.

use bs_params::ValidationError;
use bs_protocol::ProtocolError;
use bs_registry::RegistryError;
use bs_results::ResultsError;
use bs_sim::SimError;
use bs_solver::SolverFailure;
use serde::Serialize;
use std::path::PathBuf;

/// Application error type that wraps errors from the backend crates and
/// classifies them for the CLI and the HTTP API.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Solver(#[from] SolverFailure),

    #[error("Results error: {0}")]
    Results(#[from] ResultsError),

    #[error("Engine configuration error: {0}")]
    Engine(#[from] SimError),

    #[error("Failed to read config file: {path}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid configuration: {message}")]
    Config { message: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Run not found: {0}")]
    RunNotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for bs-app operations.
pub type AppResult<T> = Result<T, AppError>;

/// Stable, client-facing error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    UnsupportedChemistry,
    UnsupportedModel,
    UnsupportedParameterSet,
    InvalidParameterValue,
    InvalidInput,
    NotFound,
    SolverFailure,
    SolverTimeout,
    Internal,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::UnsupportedChemistry => "unsupported_chemistry",
            ErrorCode::UnsupportedModel => "unsupported_model",
            ErrorCode::UnsupportedParameterSet => "unsupported_parameter_set",
            ErrorCode::InvalidParameterValue => "invalid_parameter_value",
            ErrorCode::InvalidInput => "invalid_input",
            ErrorCode::NotFound => "not_found",
            ErrorCode::SolverFailure => "solver_failure",
            ErrorCode::SolverTimeout => "solver_timeout",
            ErrorCode::Internal => "internal",
        }
    }

    /// HTTP status for this class of error.
    pub fn status(self) -> u16 {
        match self {
            ErrorCode::UnsupportedChemistry
            | ErrorCode::UnsupportedModel
            | ErrorCode::UnsupportedParameterSet
            | ErrorCode::InvalidParameterValue
            | ErrorCode::InvalidInput => 400,
            ErrorCode::NotFound => 404,
            ErrorCode::SolverFailure | ErrorCode::Internal => 500,
            ErrorCode::SolverTimeout => 504,
        }
    }
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Registry(RegistryError::UnsupportedChemistry { .. }) => {
                ErrorCode::UnsupportedChemistry
            }
            AppError::Registry(RegistryError::UnsupportedModel { .. }) => ErrorCode::UnsupportedModel,
            AppError::Registry(RegistryError::UnsupportedParameterSet { .. }) => {
                ErrorCode::UnsupportedParameterSet
            }
            AppError::Validation(_)
            | AppError::Protocol(ProtocolError::InvalidParameterValue { .. }) => {
                ErrorCode::InvalidParameterValue
            }
            AppError::InvalidInput(_) | AppError::Results(ResultsError::InvalidName { .. }) => {
                ErrorCode::InvalidInput
            }
            AppError::RunNotFound(_)
            | AppError::Results(ResultsError::RunNotFound { .. })
            | AppError::Results(ResultsError::EntryNotFound { .. }) => ErrorCode::NotFound,
            AppError::Solver(failure) if failure.is_timeout() => ErrorCode::SolverTimeout,
            AppError::Solver(_) => ErrorCode::SolverFailure,
            AppError::Protocol(ProtocolError::Empty)
            | AppError::Results(_)
            | AppError::Engine(_)
            | AppError::ConfigRead { .. }
            | AppError::Config { .. }
            | AppError::Internal(_)
            | AppError::Io(_) => ErrorCode::Internal,
        }
    }

    pub fn status(&self) -> u16 {
        self.code().status()
    }

    /// Message safe to hand to clients. Diagnostic traces and internal
    /// details stay in the server log.
    pub fn public_message(&self) -> String {
        match self.code() {
            ErrorCode::Internal => "Internal error".to_string(),
            _ => self.to_string(),
        }
    }

    /// Full diagnostic for logs, including the solver trace when present.
    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            AppError::Solver(failure) => Some(&failure.diagnostic),
            _ => None,
        }
    }
}
