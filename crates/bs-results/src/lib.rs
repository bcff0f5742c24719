//! bs-results: result normalization, run identity, run storage, and the
//! template and custom parameter set library.

pub mod hash;
pub mod library;
pub mod normalize;
pub mod store;
pub mod types;

pub use hash::{compute_run_id, is_run_id};
pub use library::{CustomParameterSet, LibraryStore, SimulationTemplate, is_entry_name};
pub use normalize::{ExtractionError, extract, fallback, summarize};
pub use store::{RunStore, timestamp_now};
pub use types::*;

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Run not found: {run_id}")]
    RunNotFound { run_id: String },

    #[error("Library entry not found in {kind}: {name}")]
    EntryNotFound { kind: &'static str, name: String },

    #[error("Invalid name '{name}': use 1-64 letters, digits, '-' or '_'")]
    InvalidName { name: String },
}
