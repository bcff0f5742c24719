//! Read-only registry of chemistries, model factories, and parameter presets.
//!
//! Built once from the static catalog and shared by every request. Lookups
//! never hand out mutable access: models are fresh instances and parameter
//! values are independent clones.

use crate::catalog::{model_catalog, preset_catalog};
use crate::chemistry::Chemistry;
use crate::error::{RegistryError, RegistryResult};
use crate::model::ModelFactory;
use crate::preset::{ParameterSet, ParameterValues};
use std::sync::OnceLock;

/// Everything registered for one chemistry.
#[derive(Debug, Clone)]
pub struct ChemistryProfile {
    pub chemistry: Chemistry,
    models: Vec<ModelFactory>,
    parameter_sets: Vec<ParameterSet>,
}

impl ChemistryProfile {
    pub fn models(&self) -> &[ModelFactory] {
        &self.models
    }

    pub fn parameter_sets(&self) -> &[ParameterSet] {
        &self.parameter_sets
    }

    pub fn model_keys(&self) -> Vec<&'static str> {
        self.models.iter().map(ModelFactory::key).collect()
    }

    pub fn parameter_set_keys(&self) -> Vec<&'static str> {
        self.parameter_sets.iter().map(|set| set.key).collect()
    }

    pub fn model(&self, key: &str) -> Option<&ModelFactory> {
        self.models.iter().find(|factory| factory.key() == key)
    }

    pub fn parameter_set(&self, key: &str) -> Option<&ParameterSet> {
        self.parameter_sets.iter().find(|set| set.key == key)
    }
}

#[derive(Debug, Clone)]
pub struct Registry {
    profiles: Vec<ChemistryProfile>,
}

static BUILTIN: OnceLock<Registry> = OnceLock::new();

impl Registry {
    /// The built-in registry, constructed on first use.
    pub fn builtin() -> &'static Registry {
        BUILTIN.get_or_init(Registry::from_catalog)
    }

    /// Build a registry from the static catalog tables.
    pub fn from_catalog() -> Self {
        let profiles = Chemistry::ALL
            .into_iter()
            .map(|chemistry| ChemistryProfile {
                chemistry,
                models: model_catalog()
                    .iter()
                    .filter(|entry| entry.chemistry == chemistry)
                    .map(|entry| ModelFactory::new(entry.chemistry, entry.kind, entry.options))
                    .collect(),
                parameter_sets: preset_catalog()
                    .iter()
                    .filter(|entry| entry.chemistry == chemistry)
                    .map(|entry| {
                        ParameterSet::from_template(
                            entry.chemistry,
                            entry.key,
                            entry.description,
                            entry.values,
                        )
                    })
                    .collect(),
            })
            .collect();
        Self { profiles }
    }

    pub fn chemistries(&self) -> impl Iterator<Item = &ChemistryProfile> {
        self.profiles.iter()
    }

    pub fn profile(&self, chemistry: Chemistry) -> Option<&ChemistryProfile> {
        self.profiles
            .iter()
            .find(|profile| profile.chemistry == chemistry)
    }

    pub fn resolve_chemistry(&self, id: &str) -> RegistryResult<&ChemistryProfile> {
        Chemistry::from_id(id)
            .and_then(|chemistry| self.profile(chemistry))
            .ok_or_else(|| RegistryError::UnsupportedChemistry {
                chemistry: id.to_string(),
            })
    }

    /// Factory for `(chemistry, model)`; call [`ModelFactory::build`] for a
    /// fresh model instance.
    pub fn resolve_model(&self, chemistry: &str, model: &str) -> RegistryResult<ModelFactory> {
        let profile = self.resolve_chemistry(chemistry)?;
        profile
            .model(model)
            .copied()
            .ok_or_else(|| RegistryError::UnsupportedModel {
                chemistry: chemistry.to_string(),
                model: model.to_string(),
            })
    }

    /// The shared, read-only preset. Use [`Registry::clone_parameter_set`]
    /// for request-local values.
    pub fn resolve_parameter_set(
        &self,
        chemistry: &str,
        parameter_set: &str,
    ) -> RegistryResult<&ParameterSet> {
        let profile = self.resolve_chemistry(chemistry)?;
        profile
            .parameter_set(parameter_set)
            .ok_or_else(|| RegistryError::UnsupportedParameterSet {
                chemistry: chemistry.to_string(),
                parameter_set: parameter_set.to_string(),
            })
    }

    /// Independent copy of the named preset's values.
    pub fn clone_parameter_set(
        &self,
        chemistry: &str,
        parameter_set: &str,
    ) -> RegistryResult<ParameterValues> {
        self.resolve_parameter_set(chemistry, parameter_set)
            .map(ParameterValues::from_preset)
    }
}
