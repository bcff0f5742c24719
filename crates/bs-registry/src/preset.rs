//! Parameter presets and the request-local parameter container.

use crate::category::{ParameterCategory, default_template};
use crate::chemistry::Chemistry;
use std::collections::BTreeMap;

/// Named, immutable collection of default parameter values.
///
/// Owned by the registry and shared across requests; never mutated after
/// construction. Requests work on a [`ParameterValues`] clone.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSet {
    pub chemistry: Chemistry,
    pub key: &'static str,
    pub description: &'static str,
    values: BTreeMap<String, f64>,
}

impl ParameterSet {
    /// Build a preset from the category template plus preset-specific values.
    pub fn from_template(
        chemistry: Chemistry,
        key: &'static str,
        description: &'static str,
        specific: &[(&str, f64)],
    ) -> Self {
        let mut values = default_template();
        for (name, value) in specific {
            values.insert((*name).to_string(), *value);
        }
        Self {
            chemistry,
            key,
            description,
            values,
        }
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Values grouped by presentation category; names outside every category
    /// are returned under `None`.
    pub fn grouped(&self) -> BTreeMap<Option<ParameterCategory>, BTreeMap<String, f64>> {
        let mut groups: BTreeMap<Option<ParameterCategory>, BTreeMap<String, f64>> =
            BTreeMap::new();
        for (name, value) in &self.values {
            groups
                .entry(ParameterCategory::of(name))
                .or_default()
                .insert(name.clone(), *value);
        }
        groups
    }
}

/// Request-local, mutable parameter values cloned from a preset.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParameterValues {
    values: BTreeMap<String, f64>,
}

impl ParameterValues {
    pub fn from_preset(preset: &ParameterSet) -> Self {
        Self {
            values: preset.values.clone(),
        }
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Insert or replace a value, returning the previous one.
    pub fn set(&mut self, name: impl Into<String>, value: f64) -> Option<f64> {
        self.values.insert(name.into(), value)
    }

    /// Replace a value only when the name already exists.
    pub fn update_existing(&mut self, name: &str, value: f64) -> bool {
        match self.values.get_mut(name) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }
}
