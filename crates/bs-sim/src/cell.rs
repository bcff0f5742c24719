//! Lumped equivalent-circuit cell built from parameter values.

use crate::error::{SimError, SimResult};
use bs_registry::names::*;
use bs_registry::{ModelFeatures, ParameterValues};

/// Dynamic state: discharged charge and lumped temperature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellState {
    pub discharged_ah: f64,
    pub temperature_k: f64,
}

impl CellState {
    pub fn is_finite(&self) -> bool {
        self.discharged_ah.is_finite() && self.temperature_k.is_finite()
    }
}

/// Cell constants resolved once per solve.
#[derive(Debug, Clone, PartialEq)]
pub struct CellParameters {
    pub capacity_ah: f64,
    pub initial_soc: f64,
    pub ocv_empty_v: f64,
    pub ocv_full_v: f64,
    /// Total ohmic resistance.
    pub resistance_ohm: f64,
    pub ambient_k: f64,
    /// Heat transfer coefficient times cooling area [W/K].
    pub cooling_w_per_k: f64,
    /// Lumped heat capacity [J/K].
    pub heat_capacity_j_per_k: f64,
    pub negative_ocp_v: f64,
    pub negative_max_concentration: f64,
    pub positive_max_concentration: f64,
}

fn require(values: &ParameterValues, name: &'static str) -> SimResult<f64> {
    let value = values
        .get(name)
        .ok_or(SimError::MissingParameter { name })?;
    if !value.is_finite() {
        return Err(SimError::InvalidParameter {
            name,
            reason: format!("value {value} is not finite"),
        });
    }
    Ok(value)
}

fn require_positive(values: &ParameterValues, name: &'static str) -> SimResult<f64> {
    let value = require(values, name)?;
    if value <= 0.0 {
        return Err(SimError::InvalidParameter {
            name,
            reason: format!("value {value} must be positive"),
        });
    }
    Ok(value)
}

impl CellParameters {
    pub fn from_values(values: &ParameterValues, features: ModelFeatures) -> SimResult<Self> {
        let capacity_ah = require_positive(values, NOMINAL_CAPACITY_AH)?;
        let initial_soc = require(values, INITIAL_SOC)?;
        if !(0.0..=1.0).contains(&initial_soc) {
            return Err(SimError::InvalidParameter {
                name: INITIAL_SOC,
                reason: format!("value {initial_soc} is outside [0, 1]"),
            });
        }

        let ocv_empty_v = require(values, OCV_EMPTY_V)?;
        let ocv_full_v = require(values, OCV_FULL_V)?;
        if ocv_full_v <= ocv_empty_v {
            return Err(SimError::InvalidParameter {
                name: OCV_FULL_V,
                reason: "must exceed the open-circuit voltage at 0% SOC".to_string(),
            });
        }

        let mut resistance_ohm = require(values, CONTACT_RESISTANCE_OHM)?;
        if features.electrolyte {
            let path_m = require_positive(values, NEG_THICKNESS_M)?
                + require_positive(values, SEP_THICKNESS_M)?
                + require_positive(values, POS_THICKNESS_M)?;
            let area_m2 = require_positive(values, ELECTRODE_WIDTH_M)?
                * require_positive(values, ELECTRODE_HEIGHT_M)?
                * require_positive(values, ELECTRODE_PAIRS)?;
            let conductivity = require_positive(values, ELECTROLYTE_CONDUCTIVITY)?;
            resistance_ohm += path_m / (conductivity * area_m2);
        }
        if resistance_ohm <= 0.0 {
            return Err(SimError::InvalidParameter {
                name: CONTACT_RESISTANCE_OHM,
                reason: "total resistance must be positive".to_string(),
            });
        }

        let cooling_w_per_k = require(values, HEAT_TRANSFER_COEFFICIENT)?
            * require(values, COOLING_AREA_M2)?;
        let heat_capacity_j_per_k = require_positive(values, CELL_VOLUME_M3)?
            * require_positive(values, POS_DENSITY)?
            * require_positive(values, POS_HEAT_CAPACITY)?;

        Ok(Self {
            capacity_ah,
            initial_soc,
            ocv_empty_v,
            ocv_full_v,
            resistance_ohm,
            ambient_k: require_positive(values, AMBIENT_TEMPERATURE_K)?,
            cooling_w_per_k,
            heat_capacity_j_per_k,
            negative_ocp_v: require(values, NEG_OCP_V)?,
            negative_max_concentration: require(values, NEG_MAX_CONCENTRATION)?,
            positive_max_concentration: require(values, POS_MAX_CONCENTRATION)?,
        })
    }

    pub fn initial_state(&self) -> CellState {
        CellState {
            discharged_ah: 0.0,
            temperature_k: self.ambient_k,
        }
    }

    pub fn soc(&self, state: &CellState) -> f64 {
        self.initial_soc - state.discharged_ah / self.capacity_ah
    }

    /// Open-circuit voltage, linear in SOC.
    pub fn ocv(&self, soc: f64) -> f64 {
        self.ocv_empty_v + (self.ocv_full_v - self.ocv_empty_v) * soc
    }

    /// Terminal voltage at `current_a` (discharge positive).
    pub fn terminal_voltage(&self, state: &CellState, current_a: f64) -> f64 {
        self.ocv(self.soc(state)) - current_a * self.resistance_ohm
    }

    /// State derivative per second at `current_a`.
    pub fn derivative(&self, state: &CellState, current_a: f64) -> CellState {
        let joule_w = current_a * current_a * self.resistance_ohm;
        let cooling_w = self.cooling_w_per_k * (state.temperature_k - self.ambient_k);
        CellState {
            discharged_ah: current_a / 3600.0,
            temperature_k: (joule_w - cooling_w) / self.heat_capacity_j_per_k,
        }
    }

    pub fn negative_surface_concentration(&self, soc: f64) -> f64 {
        self.negative_max_concentration * (0.03 + (0.9 - 0.03) * soc)
    }

    pub fn positive_surface_concentration(&self, soc: f64) -> f64 {
        self.positive_max_concentration * (0.9 + (0.27 - 0.9) * soc)
    }
}
