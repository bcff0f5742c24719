//! The Solver Engine collaborator boundary.

use crate::cancel::CancelToken;
use crate::error::{EngineError, EngineResult};
use bs_protocol::ExperimentProtocol;
use bs_registry::{BatteryModel, ParameterValues};
use std::collections::BTreeMap;
use std::fmt;

/// Name of the shared time axis every series is aligned to.
pub const TIME_VARIABLE: &str = crate::variables::TIME;

/// Solver output queried by variable name.
pub trait Solution: Send + fmt::Debug {
    fn variable_names(&self) -> Vec<String>;

    /// Series for `name`, one entry per time sample.
    fn get(&self, name: &str) -> EngineResult<&[f64]>;

    fn try_get(&self, name: &str) -> Option<&[f64]> {
        self.get(name).ok()
    }

    fn contains(&self, name: &str) -> bool {
        self.get(name).is_ok()
    }
}

/// Numerical backend that turns a model, parameter values and a protocol
/// into a [`Solution`].
pub trait SolverEngine: Send + Sync {
    /// Stable identifier (name and version) recorded with every run.
    fn id(&self) -> &str;

    fn solve(
        &self,
        model: &dyn BatteryModel,
        values: &ParameterValues,
        protocol: &ExperimentProtocol,
        cancel: &CancelToken,
    ) -> EngineResult<Box<dyn Solution>>;
}

/// A solution held as named columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TabularSolution {
    columns: BTreeMap<String, Vec<f64>>,
}

impl TabularSolution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, series: Vec<f64>) {
        self.columns.insert(name.into(), series);
    }

    pub fn with(mut self, name: impl Into<String>, series: Vec<f64>) -> Self {
        self.insert(name, series);
        self
    }

    pub fn len(&self) -> usize {
        self.columns.get(TIME_VARIABLE).map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Solution for TabularSolution {
    fn variable_names(&self) -> Vec<String> {
        self.columns.keys().cloned().collect()
    }

    fn get(&self, name: &str) -> EngineResult<&[f64]> {
        self.columns
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| EngineError::UnknownVariable {
                name: name.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tabular_lookup() {
        let solution = TabularSolution::new()
            .with(TIME_VARIABLE, vec![0.0, 1.0])
            .with("Current [A]", vec![1.0, 1.0]);
        assert_eq!(solution.len(), 2);
        assert_eq!(solution.get("Current [A]").unwrap(), &[1.0, 1.0]);
        assert!(solution.try_get("Terminal power [W]").is_none());
        assert!(matches!(
            solution.get("Terminal power [W]"),
            Err(EngineError::UnknownVariable { .. })
        ));
        assert_eq!(solution.variable_names(), vec!["Current [A]", "Time [s]"]);
    }
}
