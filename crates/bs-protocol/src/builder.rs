//! Experiment protocol construction.

use crate::error::{ProtocolError, ProtocolResult};
use crate::experiment::{
    ExperimentKnobs, ExperimentType, KNOB_C_RATE, KNOB_CURRENT_A, KNOB_DURATION_S,
    KNOB_LOWER_VOLTAGE_V, KNOB_UPPER_VOLTAGE_V,
};
use crate::step::{ExperimentStep, Setpoint, StepAction};
use bs_core::constants::NOMINAL_POWER_VOLTAGE_V;
use bs_core::{amps, ohms, s, volts, watts};

/// Ordered, non-empty sequence of solver instructions.
#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentProtocol {
    experiment: ExperimentType,
    steps: Vec<ExperimentStep>,
}

impl ExperimentProtocol {
    pub fn new(experiment: ExperimentType, steps: Vec<ExperimentStep>) -> ProtocolResult<Self> {
        if steps.is_empty() {
            return Err(ProtocolError::Empty);
        }
        Ok(Self { experiment, steps })
    }

    pub fn experiment(&self) -> ExperimentType {
        self.experiment
    }

    pub fn steps(&self) -> &[ExperimentStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Rendered instruction strings, in order.
    pub fn instructions(&self) -> Vec<String> {
        self.steps.iter().map(ExperimentStep::to_string).collect()
    }
}

/// Build the protocol for `experiment` from `knobs`.
pub fn build(experiment: ExperimentType, knobs: &ExperimentKnobs) -> ProtocolResult<ExperimentProtocol> {
    for (name, value) in [
        (KNOB_DURATION_S, knobs.duration_s),
        (KNOB_LOWER_VOLTAGE_V, knobs.lower_voltage_v),
        (KNOB_UPPER_VOLTAGE_V, knobs.upper_voltage_v),
    ] {
        if !value.is_finite() {
            return Err(ProtocolError::InvalidParameterValue {
                name: name.to_string(),
                reason: format!("value {value} is not finite"),
            });
        }
    }

    let duration = Some(s(knobs.duration_s));
    let lower = Some(volts(knobs.lower_voltage_v));
    let upper = volts(knobs.upper_voltage_v);

    let steps = match experiment {
        ExperimentType::ConstantCurrent => vec![ExperimentStep::new(
            StepAction::Discharge,
            Setpoint::CRate(knobs.c_rate),
            duration,
            lower,
            KNOB_C_RATE,
        )?],
        ExperimentType::ConstantVoltage => vec![ExperimentStep::new(
            StepAction::Charge,
            Setpoint::Voltage(upper),
            duration,
            None,
            KNOB_UPPER_VOLTAGE_V,
        )?],
        ExperimentType::Cccv => vec![
            ExperimentStep::new(
                StepAction::Charge,
                Setpoint::CRate(knobs.c_rate),
                None,
                Some(upper),
                KNOB_C_RATE,
            )?,
            ExperimentStep::new(
                StepAction::Hold,
                Setpoint::Voltage(upper),
                duration,
                None,
                KNOB_UPPER_VOLTAGE_V,
            )?,
        ],
        ExperimentType::CurrentFunction => vec![ExperimentStep::new(
            StepAction::Discharge,
            Setpoint::Current(amps(knobs.current_a)),
            duration,
            lower,
            KNOB_CURRENT_A,
        )?],
        ExperimentType::PowerFunction => vec![ExperimentStep::new(
            StepAction::Discharge,
            Setpoint::Power(watts(knobs.current_a * NOMINAL_POWER_VOLTAGE_V)),
            duration,
            lower,
            KNOB_CURRENT_A,
        )?],
        ExperimentType::ResistanceFunction => vec![ExperimentStep::new(
            StepAction::Discharge,
            Setpoint::Resistance(ohms(1.0 / knobs.current_a)),
            duration,
            lower,
            KNOB_CURRENT_A,
        )?],
    };

    ExperimentProtocol::new(experiment, steps)
}

/// Build from a request's experiment-type string. Unknown types run as
/// constant current.
pub fn build_named(experiment: &str, knobs: &ExperimentKnobs) -> ProtocolResult<ExperimentProtocol> {
    build(ExperimentType::parse_or_default(experiment), knobs)
}
