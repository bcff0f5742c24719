//! Solver output to client schema, degrading instead of failing.

use crate::types::{ResultMetadata, SimulationResult, Summary, Variables};
use bs_core::{BsError, ensure_all_finite, mean, trapezoid};
use bs_solver::variables::*;
use bs_solver::{EngineError, Solution};
use thiserror::Error;

/// Why the required series could not be extracted.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractionError {
    #[error("required variable '{name}' unavailable: {source}")]
    Missing {
        name: &'static str,
        source: EngineError,
    },

    #[error("required variable '{name}' is empty")]
    Empty { name: &'static str },

    #[error("required variable '{name}' has {actual} samples, time has {expected}")]
    Misaligned {
        name: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("required variable '{name}' is invalid: {source}")]
    Invalid {
        name: &'static str,
        source: BsError,
    },
}

type Slot = fn(&mut Variables) -> &mut Option<Vec<f64>>;

/// Optional series in extraction order: client name, solver name, field.
const OPTIONAL: [(&str, &str, Slot); 8] = [
    ("temperature", CELL_TEMPERATURE, |v| &mut v.temperature),
    ("power", TERMINAL_POWER, |v| &mut v.power),
    ("resistance", TERMINAL_RESISTANCE, |v| &mut v.resistance),
    ("electrolyte_potential", ELECTROLYTE_POTENTIAL, |v| &mut v.electrolyte_potential),
    ("negative_potential", NEGATIVE_POTENTIAL, |v| &mut v.negative_potential),
    ("positive_potential", POSITIVE_POTENTIAL, |v| &mut v.positive_potential),
    ("negative_concentration", NEGATIVE_SURFACE_CONCENTRATION, |v| &mut v.negative_concentration),
    ("positive_concentration", POSITIVE_SURFACE_CONCENTRATION, |v| &mut v.positive_concentration),
];

fn required(
    solution: &dyn Solution,
    name: &'static str,
    expected: Option<usize>,
) -> Result<Vec<f64>, ExtractionError> {
    let series = solution
        .get(name)
        .map_err(|source| ExtractionError::Missing { name, source })?;
    if series.is_empty() {
        return Err(ExtractionError::Empty { name });
    }
    if let Some(expected) = expected
        && series.len() != expected
    {
        return Err(ExtractionError::Misaligned {
            name,
            expected,
            actual: series.len(),
        });
    }
    ensure_all_finite(series, name).map_err(|source| ExtractionError::Invalid { name, source })?;
    Ok(series.to_vec())
}

fn extract_required(solution: &dyn Solution) -> Result<Variables, ExtractionError> {
    let time = required(solution, TIME, None)?;
    let n = Some(time.len());
    let voltage = required(solution, TERMINAL_VOLTAGE, n)?;
    let current = required(solution, CURRENT, n)?;
    let soc = required(solution, DISCHARGE_CAPACITY, n)?;
    Ok(Variables::required(time, voltage, current, soc))
}

fn optional(solution: &dyn Solution, name: &str, expected: usize) -> Option<Vec<f64>> {
    match solution.try_get(name) {
        Some(series) if series.len() == expected => Some(series.to_vec()),
        Some(series) => {
            tracing::debug!(
                variable = name,
                samples = series.len(),
                expected,
                "optional variable misaligned; omitted"
            );
            None
        }
        None => None,
    }
}

fn attach_optional(variables: &mut Variables, solution: &dyn Solution) {
    let n = variables.time.len();
    for (_, name, slot) in OPTIONAL {
        *slot(variables) = optional(solution, name, n);
    }
}

/// Scalar aggregates of the required series.
pub fn summarize(variables: &Variables) -> Summary {
    let last = |s: &[f64]| s.last().copied().unwrap_or(0.0);
    let delivered: Vec<f64> = variables
        .voltage
        .iter()
        .zip(&variables.current)
        .map(|(v, i)| v * i.abs())
        .collect();
    let energy_delivered = trapezoid(&delivered, &variables.time).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "energy integral unavailable");
        0.0
    });
    Summary {
        final_voltage: last(&variables.voltage),
        average_voltage: mean(&variables.voltage),
        total_capacity: last(&variables.soc),
        simulation_time: last(&variables.time),
        energy_delivered,
    }
}

fn metadata(variables: &Variables, extraction_error: Option<String>) -> ResultMetadata {
    let time = &variables.time;
    ResultMetadata {
        total_points: time.len(),
        time_range: [
            time.first().copied().unwrap_or(0.0),
            time.last().copied().unwrap_or(0.0),
        ],
        extraction_error,
    }
}

/// Deterministic placeholder returned when extraction fails.
pub fn fallback(requested_duration_s: f64, cause: &str) -> SimulationResult {
    let variables = Variables::required(
        vec![0.0, requested_duration_s],
        vec![4.0, 3.0],
        vec![1.0, 1.0],
        vec![0.0, 1.0],
    );
    SimulationResult {
        summary: summarize(&variables),
        metadata: metadata(&variables, Some(cause.to_string())),
        variables,
    }
}

/// Normalize a solution. Never fails: a missing or malformed required
/// series yields [`fallback`] with `extraction_error` set.
pub fn extract(solution: &dyn Solution, requested_duration_s: f64) -> SimulationResult {
    match extract_required(solution) {
        Ok(mut variables) => {
            attach_optional(&mut variables, solution);
            SimulationResult {
                summary: summarize(&variables),
                metadata: metadata(&variables, None),
                variables,
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "result extraction degraded to fallback");
            fallback(requested_duration_s, &e.to_string())
        }
    }
}
