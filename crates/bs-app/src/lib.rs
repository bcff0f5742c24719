//! Shared application service layer for batsim.
//!
//! This crate provides a unified interface for the CLI and the HTTP server,
//! centralizing the request pipeline, the bounded worker pool, catalog
//! queries, run history access and the template library.

pub mod catalog;
pub mod config;
pub mod error;
pub mod library;
pub mod pool;
pub mod progress;
pub mod query;
pub mod request;
pub mod service;

// Re-export key types for convenience
pub use catalog::{ModelCatalog, ParameterInfo, model_catalog, parameter_info};
pub use config::{BIND_ADDRESS_ENV, DEFAULT_LIBRARY_DIR, DEFAULT_RUNS_DIR, ServiceConfig};
pub use error::{AppError, AppResult, ErrorCode};
pub use pool::WorkerPool;
pub use progress::{RunProgressEvent, RunStage};
pub use query::{RunSummary, extract_series, list_variables, run_summary};
pub use request::SimulationRequest;
pub use service::{SimulationResponse, SimulationService};

pub use bs_results::{CustomParameterSet, SimulationTemplate};
