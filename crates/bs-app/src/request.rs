//! Incoming simulation request.

use bs_params::ParameterOverrides;
use bs_results::SimulationTemplate;
use serde::Deserialize;

pub const DEFAULT_BATTERY_TYPE: &str = "lithium-ion";
pub const DEFAULT_MODEL: &str = "SPM";
pub const DEFAULT_PARAMETER_SET: &str = "Chen2020";
pub const DEFAULT_EXPERIMENT_TYPE: &str = "constant_current";

/// One simulation request. Every field is optional on the wire.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationRequest {
    pub battery_type: String,
    pub model: String,
    pub parameter_set: String,
    pub experiment_type: String,
    pub parameters: ParameterOverrides,
}

impl Default for SimulationRequest {
    fn default() -> Self {
        Self {
            battery_type: DEFAULT_BATTERY_TYPE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            parameter_set: DEFAULT_PARAMETER_SET.to_string(),
            experiment_type: DEFAULT_EXPERIMENT_TYPE.to_string(),
            parameters: ParameterOverrides::default(),
        }
    }
}

impl SimulationRequest {
    pub fn new(
        battery_type: impl Into<String>,
        model: impl Into<String>,
        parameter_set: impl Into<String>,
        experiment_type: impl Into<String>,
    ) -> Self {
        Self {
            battery_type: battery_type.into(),
            model: model.into(),
            parameter_set: parameter_set.into(),
            experiment_type: experiment_type.into(),
            parameters: ParameterOverrides::default(),
        }
    }

    pub fn with_parameters(mut self, parameters: ParameterOverrides) -> Self {
        self.parameters = parameters;
        self
    }
}

impl From<&SimulationTemplate> for SimulationRequest {
    fn from(template: &SimulationTemplate) -> Self {
        Self::new(
            &template.battery_type,
            &template.model,
            &template.parameter_set,
            &template.experiment_type,
        )
        .with_parameters(ParameterOverrides::Flat(template.parameters.clone()))
    }
}
