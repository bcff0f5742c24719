//! bs-solver: Solver Engine boundary and adapter.
//!
//! Engines implement [`SolverEngine`] and return a [`Solution`] queried by
//! variable name. [`SolverAdapter`] clones the preset, applies overrides,
//! invokes the engine under a [`CancelToken`] and wraps any failure in a
//! [`SolverFailure`] with a JSON diagnostic trace.

pub mod adapter;
pub mod cancel;
pub mod engine;
pub mod error;
pub mod variables;

pub use adapter::{SolverAdapter, prepare_values};
pub use cancel::CancelToken;
pub use engine::{Solution, SolverEngine, TIME_VARIABLE, TabularSolution};
pub use error::{EngineError, EngineResult, SolverFailure, SolverResult};
