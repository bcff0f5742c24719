//! Read-only registry views for the catalog endpoints.

use std::collections::BTreeMap;

use bs_protocol::experiment_types;
use bs_registry::{ParameterCategory, Registry};
use serde::Serialize;

use crate::error::AppResult;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelInfo {
    pub key: String,
    pub description: String,
}

/// One chemistry as listed by the model catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChemistryInfo {
    pub name: String,
    pub description: String,
    pub models: Vec<ModelInfo>,
    pub parameter_sets: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelCatalog {
    pub battery_types: BTreeMap<String, ChemistryInfo>,
    pub experiment_types: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine: Option<String>,
}

/// Every chemistry with its models, presets and the experiment types.
pub fn model_catalog() -> ModelCatalog {
    let battery_types = Registry::builtin()
        .chemistries()
        .map(|profile| {
            let chemistry = profile.chemistry;
            let models = profile
                .models()
                .iter()
                .map(|factory| ModelInfo {
                    key: factory.key().to_string(),
                    description: factory.kind.description().to_string(),
                })
                .collect();
            let info = ChemistryInfo {
                name: chemistry.display_name().to_string(),
                description: chemistry.description().to_string(),
                models,
                parameter_sets: profile
                    .parameter_set_keys()
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
            };
            (chemistry.id().to_string(), info)
        })
        .collect();

    ModelCatalog {
        battery_types,
        experiment_types: experiment_types()
            .into_iter()
            .map(|(key, name)| (key.to_string(), name.to_string()))
            .collect(),
        engine: None,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterEntry {
    pub value: f64,
    #[serde(rename = "type")]
    pub value_type: &'static str,
    pub category: &'static str,
}

/// A preset flattened for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterInfo {
    pub battery_type: String,
    pub model: String,
    pub parameter_set: String,
    pub parameters: BTreeMap<String, ParameterEntry>,
}

/// Category label for names outside the default categories.
pub const UNCATEGORIZED: &str = "preset";

/// Flattened preset values. The model is resolved too, so a pair the
/// registry would reject for simulation is rejected here as well.
pub fn parameter_info(chemistry: &str, model: &str, parameter_set: &str) -> AppResult<ParameterInfo> {
    let registry = Registry::builtin();
    let factory = registry.resolve_model(chemistry, model)?;
    let preset = registry.resolve_parameter_set(chemistry, parameter_set)?;

    let parameters = preset
        .iter()
        .map(|(name, value)| {
            let category = ParameterCategory::of(name).map_or(UNCATEGORIZED, ParameterCategory::id);
            let entry = ParameterEntry {
                value,
                value_type: "float",
                category,
            };
            (name.to_string(), entry)
        })
        .collect();

    Ok(ParameterInfo {
        battery_type: factory.chemistry.id().to_string(),
        model: factory.key().to_string(),
        parameter_set: preset.key.to_string(),
        parameters,
    })
}
