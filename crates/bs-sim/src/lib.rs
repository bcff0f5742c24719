//! bs-sim: built-in reference Solver Engine.
//!
//! Provides:
//! - A lumped equivalent-circuit cell (linear OCV, ohmic resistance, lumped thermal)
//! - The TransientModel trait and fixed-step RK4 / forward Euler integrators
//! - [`ReferenceEngine`], which walks an experiment protocol instruction by
//!   instruction and records every variable the result normalizer knows
//!
//! The engine is deterministic and cheap. It is not a physical model of record.

pub mod cell;
pub mod engine;
pub mod error;
pub mod integrator;
pub mod model;

pub use cell::{CellParameters, CellState};
pub use engine::{EngineConfig, ReferenceEngine};
pub use error::{SimError, SimResult};
pub use integrator::{ForwardEuler, Integrator, IntegratorType, RK4};
pub use model::TransientModel;
