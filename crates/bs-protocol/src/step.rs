//! Solver instruction steps and their text rendering.

use crate::error::{ProtocolError, ProtocolResult};
use bs_core::constants::SECONDS_PER_HOUR;
use bs_core::value::{in_amps, in_ohms, in_seconds, in_volts, in_watts};
use bs_core::{Current, Potential, Power, Resistance, Time};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepAction {
    Discharge,
    Charge,
    Hold,
}

impl StepAction {
    pub fn verb(self) -> &'static str {
        match self {
            StepAction::Discharge => "Discharge",
            StepAction::Charge => "Charge",
            StepAction::Hold => "Hold",
        }
    }
}

/// What the cell is driven with during a step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Setpoint {
    /// Multiple of the nominal capacity per hour.
    CRate(f64),
    Current(Current),
    Voltage(Potential),
    Power(Power),
    Resistance(Resistance),
}

impl Setpoint {
    pub fn magnitude(&self) -> f64 {
        match *self {
            Setpoint::CRate(c) => c,
            Setpoint::Current(i) => in_amps(i),
            Setpoint::Voltage(v) => in_volts(v),
            Setpoint::Power(p) => in_watts(p),
            Setpoint::Resistance(r) => in_ohms(r),
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Setpoint::CRate(_) => "C",
            Setpoint::Current(_) => "A",
            Setpoint::Voltage(_) => "V",
            Setpoint::Power(_) => "W",
            Setpoint::Resistance(_) => "Ohm",
        }
    }
}

/// One instruction: action, setpoint, optional duration and optional
/// voltage termination. At least one of duration and termination is set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExperimentStep {
    pub action: StepAction,
    pub setpoint: Setpoint,
    pub duration: Option<Time>,
    pub until_voltage: Option<Potential>,
}

impl ExperimentStep {
    /// Build a step, rejecting non-finite magnitudes. `knob` names the input
    /// the magnitude was derived from.
    pub fn new(
        action: StepAction,
        setpoint: Setpoint,
        duration: Option<Time>,
        until_voltage: Option<Potential>,
        knob: &str,
    ) -> ProtocolResult<Self> {
        let magnitude = setpoint.magnitude();
        if !magnitude.is_finite() {
            return Err(ProtocolError::InvalidParameterValue {
                name: knob.to_string(),
                reason: format!(
                    "{} magnitude {magnitude} is not finite",
                    setpoint.unit()
                ),
            });
        }
        if duration.is_none() && until_voltage.is_none() {
            return Err(ProtocolError::InvalidParameterValue {
                name: knob.to_string(),
                reason: "step needs a duration or a termination voltage".to_string(),
            });
        }
        Ok(Self {
            action,
            setpoint,
            duration,
            until_voltage,
        })
    }

    pub fn duration_hours(&self) -> Option<f64> {
        self.duration.map(|d| in_seconds(d) / SECONDS_PER_HOUR)
    }
}

impl fmt::Display for ExperimentStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at {}{}",
            self.action.verb(),
            self.setpoint.magnitude(),
            self.setpoint.unit()
        )?;
        // Hour counts always carry a fractional part ("1.0 hours").
        if let Some(hours) = self.duration_hours() {
            write!(f, " for {hours:?} hours")?;
        }
        if let Some(v) = self.until_voltage {
            let joiner = if self.duration.is_some() { " or until" } else { " until" };
            write!(f, "{joiner} {}V", in_volts(v))?;
        }
        Ok(())
    }
}
