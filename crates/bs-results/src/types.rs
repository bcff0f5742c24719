//! Result data types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type RunId = String;

/// Client-facing series, one entry per solver time sample.
///
/// Optional series are present only when the solution offered them aligned
/// with `time`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variables {
    pub time: Vec<f64>,
    pub voltage: Vec<f64>,
    pub current: Vec<f64>,
    pub soc: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resistance: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub electrolyte_potential: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negative_potential: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub positive_potential: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negative_concentration: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub positive_concentration: Option<Vec<f64>>,
}

impl Variables {
    pub fn required(time: Vec<f64>, voltage: Vec<f64>, current: Vec<f64>, soc: Vec<f64>) -> Self {
        Self {
            time,
            voltage,
            current,
            soc,
            temperature: None,
            power: None,
            resistance: None,
            electrolyte_potential: None,
            negative_potential: None,
            positive_potential: None,
            negative_concentration: None,
            positive_concentration: None,
        }
    }

    /// Present series by client-facing name, required first.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &[f64])> {
        let required = [
            ("time", Some(&self.time)),
            ("voltage", Some(&self.voltage)),
            ("current", Some(&self.current)),
            ("soc", Some(&self.soc)),
        ];
        let optional = [
            ("temperature", self.temperature.as_ref()),
            ("power", self.power.as_ref()),
            ("resistance", self.resistance.as_ref()),
            ("electrolyte_potential", self.electrolyte_potential.as_ref()),
            ("negative_potential", self.negative_potential.as_ref()),
            ("positive_potential", self.positive_potential.as_ref()),
            ("negative_concentration", self.negative_concentration.as_ref()),
            ("positive_concentration", self.positive_concentration.as_ref()),
        ];
        required
            .into_iter()
            .chain(optional)
            .filter_map(|(name, series)| series.map(|s| (name, s.as_slice())))
    }

    pub fn get(&self, name: &str) -> Option<&[f64]> {
        self.iter().find(|(n, _)| *n == name).map(|(_, s)| s)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.iter().map(|(n, _)| n).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub final_voltage: f64,
    pub average_voltage: f64,
    pub total_capacity: f64,
    pub simulation_time: f64,
    pub energy_delivered: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultMetadata {
    pub total_points: usize,
    pub time_range: [f64; 2],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extraction_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub variables: Variables,
    pub summary: Summary,
    pub metadata: ResultMetadata,
}

impl SimulationResult {
    /// True when extraction fell back to the placeholder result.
    pub fn is_degraded(&self) -> bool {
        self.metadata.extraction_error.is_some()
    }
}

/// The request fields that determine a run's outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRequest {
    pub battery_type: String,
    pub model: String,
    pub parameter_set: String,
    pub experiment_type: String,
    pub parameters: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Completed,
    Degraded,
    Failed,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    pub run_id: RunId,
    pub timestamp: String,
    pub request: CanonicalRequest,
    pub protocol: Vec<String>,
    pub status: RunStatus,
    pub execution_time_s: f64,
    pub engine: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}
