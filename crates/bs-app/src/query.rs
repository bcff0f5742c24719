//! Query helpers for extracting data from stored runs.

use bs_results::{RunManifest, RunStatus, SimulationResult, Summary};
use serde::Serialize;

use crate::error::{AppError, AppResult};

/// Summary of a run's metadata and data.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: String,
    pub status: RunStatus,
    pub timestamp: String,
    pub request: String,
    pub time_range: Option<(f64, f64)>,
    pub record_count: usize,
    pub variables: Vec<&'static str>,
    pub summary: Option<Summary>,
    pub degraded: bool,
}

/// Get run summary from a manifest and its stored result, if any.
pub fn run_summary(manifest: &RunManifest, result: Option<&SimulationResult>) -> RunSummary {
    let request = &manifest.request;
    RunSummary {
        run_id: manifest.run_id.clone(),
        status: manifest.status,
        timestamp: manifest.timestamp.clone(),
        request: format!(
            "{} / {} / {} / {}",
            request.battery_type, request.model, request.parameter_set, request.experiment_type
        ),
        time_range: result.map(|r| (r.metadata.time_range[0], r.metadata.time_range[1])),
        record_count: result.map_or(0, |r| r.metadata.total_points),
        variables: result.map(list_variables).unwrap_or_default(),
        summary: result.map(|r| r.summary),
        degraded: result.is_some_and(SimulationResult::is_degraded),
    }
}

/// List all variable names present in a result.
pub fn list_variables(result: &SimulationResult) -> Vec<&'static str> {
    result.variables.names()
}

/// Extract `(time, value)` pairs for one variable.
pub fn extract_series(result: &SimulationResult, variable: &str) -> AppResult<Vec<(f64, f64)>> {
    let values = result.variables.get(variable).ok_or_else(|| {
        AppError::InvalidInput(format!(
            "Unknown variable: {} (available: {})",
            variable,
            list_variables(result).join(", ")
        ))
    })?;

    Ok(result
        .variables
        .time
        .iter()
        .copied()
        .zip(values.iter().copied())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bs_results::{CanonicalRequest, fallback};
    use std::collections::BTreeMap;

    fn manifest() -> RunManifest {
        RunManifest {
            run_id: "r1".to_string(),
            timestamp: "2024-01-01T00:00:00+00:00".to_string(),
            request: CanonicalRequest {
                battery_type: "lithium-ion".to_string(),
                model: "SPM".to_string(),
                parameter_set: "Chen2020".to_string(),
                experiment_type: "constant_current".to_string(),
                parameters: BTreeMap::new(),
            },
            protocol: vec![],
            status: RunStatus::Degraded,
            execution_time_s: 0.1,
            engine: "test".to_string(),
            error_message: None,
        }
    }

    #[test]
    fn summary_reflects_result() {
        let result = fallback(120.0, "missing current");
        let summary = run_summary(&manifest(), Some(&result));
        assert_eq!(summary.time_range, Some((0.0, 120.0)));
        assert_eq!(summary.record_count, 2);
        assert!(summary.degraded);
        assert_eq!(summary.variables, vec!["time", "voltage", "current", "soc"]);
        assert_eq!(summary.request, "lithium-ion / SPM / Chen2020 / constant_current");

        let bare = run_summary(&manifest(), None);
        assert_eq!(bare.record_count, 0);
        assert!(bare.variables.is_empty());
        assert!(!bare.degraded);
    }

    #[test]
    fn series_pairs_with_time() {
        let result = fallback(60.0, "x");
        let series = extract_series(&result, "voltage").unwrap();
        assert_eq!(series, vec![(0.0, 4.0), (60.0, 3.0)]);
        let err = extract_series(&result, "temperature").unwrap_err();
        assert!(err.to_string().contains("available: time"));
    }
}
