//! Template and custom parameter set operations on the service.

use bs_params::validate;
use bs_results::{CustomParameterSet, LibraryStore, SimulationTemplate, timestamp_now};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::error::{AppError, AppResult};
use crate::request::SimulationRequest;
use crate::service::SimulationService;

impl SimulationService {
    pub fn library(&self) -> Option<&LibraryStore> {
        self.library.as_ref()
    }

    fn require_library(&self) -> AppResult<&LibraryStore> {
        self.library
            .as_ref()
            .ok_or_else(|| AppError::Config {
                message: "no library directory configured".to_string(),
            })
    }

    /// Saved templates, sorted by name. Empty without a library.
    pub fn templates(&self) -> AppResult<Vec<SimulationTemplate>> {
        match &self.library {
            Some(library) => Ok(library.list_templates()?),
            None => Ok(Vec::new()),
        }
    }

    pub fn template(&self, name: &str) -> AppResult<SimulationTemplate> {
        Ok(self.require_library()?.load_template(name)?)
    }

    /// Store `template` after checking that it would run. Fields are
    /// rewritten to their canonical spelling.
    pub fn save_template(&self, mut template: SimulationTemplate) -> AppResult<SimulationTemplate> {
        let library = self.require_library()?;
        let prepared = self.prepare(&SimulationRequest::from(&template))?;
        let canonical = prepared.canonical();
        template.battery_type = canonical.battery_type.clone();
        template.model = canonical.model.clone();
        template.parameter_set = canonical.parameter_set.clone();
        template.experiment_type = canonical.experiment_type.clone();
        template.created_at = timestamp_now();
        library.save_template(&template)?;
        tracing::info!(name = %template.name, "template saved");
        Ok(template)
    }

    pub fn delete_template(&self, name: &str) -> AppResult<()> {
        self.require_library()?.delete_template(name)?;
        tracing::info!(name, "template deleted");
        Ok(())
    }

    /// The request a saved template stands for.
    pub fn template_request(&self, name: &str) -> AppResult<SimulationRequest> {
        Ok(SimulationRequest::from(&self.template(name)?))
    }

    /// Saved custom parameter sets, sorted by name. Empty without a library.
    pub fn parameter_sets(&self) -> AppResult<Vec<CustomParameterSet>> {
        match &self.library {
            Some(library) => Ok(library.list_parameter_sets()?),
            None => Ok(Vec::new()),
        }
    }

    pub fn parameter_set(&self, name: &str) -> AppResult<CustomParameterSet> {
        Ok(self.require_library()?.load_parameter_set(name)?)
    }

    /// Store a custom set. The base must be a built-in preset of the set's
    /// chemistry and the name must not shadow one. Values are stored after
    /// coercion and clamping.
    pub fn save_parameter_set(&self, mut set: CustomParameterSet) -> AppResult<CustomParameterSet> {
        let library = self.require_library()?;
        let chemistry = self.registry.resolve_chemistry(&set.battery_type)?.chemistry;
        let base = self
            .registry
            .resolve_parameter_set(chemistry.id(), &set.base_parameter_set)?;
        if self
            .registry
            .resolve_parameter_set(chemistry.id(), &set.name)
            .is_ok()
        {
            return Err(AppError::InvalidInput(format!(
                "'{}' is a built-in parameter set",
                set.name
            )));
        }

        let raw: BTreeMap<String, Value> = set
            .custom_parameters
            .iter()
            .map(|(name, value)| (name.clone(), Value::from(*value)))
            .collect();
        set.custom_parameters = validate(&raw)?;
        set.battery_type = chemistry.id().to_string();
        set.base_parameter_set = base.key.to_string();
        set.created_at = timestamp_now();
        library.save_parameter_set(&set)?;
        tracing::info!(name = %set.name, base = base.key, "custom parameter set saved");
        Ok(set)
    }

    pub fn delete_parameter_set(&self, name: &str) -> AppResult<()> {
        self.require_library()?.delete_parameter_set(name)?;
        tracing::info!(name, "custom parameter set deleted");
        Ok(())
    }
}
