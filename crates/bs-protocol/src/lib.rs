//! bs-protocol: experiment protocols as ordered solver instruction steps.
//!
//! An experiment type plus numeric knobs yields an [`ExperimentProtocol`];
//! each [`ExperimentStep`] is structured data that also renders to the
//! instruction text clients see (`"Discharge at 1C for 1.0 hours or until 2.5V"`).

pub mod builder;
pub mod error;
pub mod experiment;
pub mod step;

pub use builder::{ExperimentProtocol, build, build_named};
pub use error::{ProtocolError, ProtocolResult};
pub use experiment::{
    ExperimentKnobs, ExperimentType, KNOB_C_RATE, KNOB_CURRENT_A, KNOB_DURATION_S,
    KNOB_LOWER_VOLTAGE_V, KNOB_UPPER_VOLTAGE_V, experiment_types,
};
pub use step::{ExperimentStep, Setpoint, StepAction};
