//! Experiment types and the knobs that parameterize them.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

pub const KNOB_C_RATE: &str = "C-rate";
pub const KNOB_DURATION_S: &str = "Simulation duration [s]";
pub const KNOB_LOWER_VOLTAGE_V: &str = "Voltage cut-off [V]";
pub const KNOB_UPPER_VOLTAGE_V: &str = "Upper voltage cut-off [V]";
pub const KNOB_CURRENT_A: &str = "Current function [A]";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperimentType {
    #[default]
    ConstantCurrent,
    ConstantVoltage,
    Cccv,
    CurrentFunction,
    PowerFunction,
    ResistanceFunction,
}

impl ExperimentType {
    pub const ALL: [ExperimentType; 6] = [
        ExperimentType::ConstantCurrent,
        ExperimentType::ConstantVoltage,
        ExperimentType::Cccv,
        ExperimentType::CurrentFunction,
        ExperimentType::PowerFunction,
        ExperimentType::ResistanceFunction,
    ];

    pub fn key(self) -> &'static str {
        match self {
            ExperimentType::ConstantCurrent => "constant_current",
            ExperimentType::ConstantVoltage => "constant_voltage",
            ExperimentType::Cccv => "cccv",
            ExperimentType::CurrentFunction => "current_function",
            ExperimentType::PowerFunction => "power_function",
            ExperimentType::ResistanceFunction => "resistance_function",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ExperimentType::ConstantCurrent => "Constant Current Discharge",
            ExperimentType::ConstantVoltage => "Constant Voltage",
            ExperimentType::Cccv => "Constant Current Constant Voltage",
            ExperimentType::CurrentFunction => "Current Function",
            ExperimentType::PowerFunction => "Power Function",
            ExperimentType::ResistanceFunction => "Resistance Function",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.key() == key)
    }

    /// Parse a request's experiment type; unknown keys run as constant current.
    pub fn parse_or_default(key: &str) -> Self {
        match Self::from_key(key) {
            Some(experiment) => experiment,
            None => {
                tracing::warn!(
                    experiment_type = %key,
                    fallback = ExperimentType::default().key(),
                    "unknown experiment type, using fallback"
                );
                ExperimentType::default()
            }
        }
    }
}

impl fmt::Display for ExperimentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Experiment-type catalog: key to display name.
pub fn experiment_types() -> BTreeMap<&'static str, &'static str> {
    ExperimentType::ALL
        .into_iter()
        .map(|t| (t.key(), t.display_name()))
        .collect()
}

/// Numeric inputs of the protocol templates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExperimentKnobs {
    pub c_rate: f64,
    pub duration_s: f64,
    pub lower_voltage_v: f64,
    pub upper_voltage_v: f64,
    pub current_a: f64,
}

impl Default for ExperimentKnobs {
    fn default() -> Self {
        Self {
            c_rate: 1.0,
            duration_s: 3600.0,
            lower_voltage_v: 2.5,
            upper_voltage_v: 4.2,
            current_a: 5.0,
        }
    }
}

impl ExperimentKnobs {
    /// Read knobs from validated overrides, keeping defaults for missing keys.
    pub fn from_overrides(overrides: &BTreeMap<String, f64>) -> Self {
        let defaults = Self::default();
        let read = |key: &str, default: f64| overrides.get(key).copied().unwrap_or(default);
        Self {
            c_rate: read(KNOB_C_RATE, defaults.c_rate),
            duration_s: read(KNOB_DURATION_S, defaults.duration_s),
            lower_voltage_v: read(KNOB_LOWER_VOLTAGE_V, defaults.lower_voltage_v),
            upper_voltage_v: read(KNOB_UPPER_VOLTAGE_V, defaults.upper_voltage_v),
            current_a: read(KNOB_CURRENT_A, defaults.current_a),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_round_trip() {
        for t in ExperimentType::ALL {
            assert_eq!(ExperimentType::from_key(t.key()), Some(t));
        }
    }

    #[test]
    fn unknown_type_falls_back_to_constant_current() {
        assert_eq!(
            ExperimentType::parse_or_default("drive_cycle"),
            ExperimentType::ConstantCurrent
        );
        assert_eq!(ExperimentType::parse_or_default("cccv"), ExperimentType::Cccv);
    }

    #[test]
    fn knobs_read_known_keys_only() {
        let overrides: BTreeMap<String, f64> = [
            (KNOB_C_RATE.to_string(), 2.0),
            ("Ambient temperature [K]".to_string(), 300.0),
        ]
        .into_iter()
        .collect();
        let knobs = ExperimentKnobs::from_overrides(&overrides);
        assert_eq!(knobs.c_rate, 2.0);
        assert_eq!(knobs.duration_s, 3600.0);
        assert_eq!(knobs.current_a, 5.0);
    }

    #[test]
    fn catalog_lists_all_types() {
        let catalog = experiment_types();
        assert_eq!(catalog.len(), 6);
        assert_eq!(catalog["cccv"], "Constant Current Constant Voltage");
    }
}
