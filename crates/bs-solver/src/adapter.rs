//! Packages a model, request-local parameters and a protocol for the engine.

use crate::cancel::CancelToken;
use crate::engine::{Solution, SolverEngine};
use crate::error::{EngineError, SolverFailure, SolverResult};
use bs_protocol::ExperimentProtocol;
use bs_registry::{ModelFactory, ParameterSet, ParameterValues};
use serde::Serialize;
use std::collections::BTreeMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

/// Diagnostic trace serialized into [`SolverFailure::diagnostic`].
#[derive(Debug, Serialize)]
struct DiagnosticTrace<'a> {
    engine: &'a str,
    chemistry: &'a str,
    model: &'a str,
    parameter_set: &'a str,
    protocol: Vec<String>,
    applied_overrides: &'a BTreeMap<String, f64>,
    cause: String,
}

/// Copy `preset` into request-local values and apply the overrides whose
/// names the preset already defines. Returns the values and the overrides
/// that were applied.
pub fn prepare_values(
    preset: &ParameterSet,
    overrides: &BTreeMap<String, f64>,
) -> (ParameterValues, BTreeMap<String, f64>) {
    let mut values = ParameterValues::from_preset(preset);
    let mut applied = BTreeMap::new();
    for (name, value) in overrides {
        if values.update_existing(name, *value) {
            applied.insert(name.clone(), *value);
        } else {
            tracing::trace!(parameter = %name, "override not defined by preset; not applied");
        }
    }
    (values, applied)
}

#[derive(Clone)]
pub struct SolverAdapter {
    engine: Arc<dyn SolverEngine>,
}

impl std::fmt::Debug for SolverAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolverAdapter")
            .field("engine", &self.engine.id())
            .finish()
    }
}

impl SolverAdapter {
    pub fn new(engine: Arc<dyn SolverEngine>) -> Self {
        Self { engine }
    }

    pub fn engine_id(&self) -> &str {
        self.engine.id()
    }

    /// Run one solve. The shared preset is never mutated.
    pub fn run(
        &self,
        factory: &ModelFactory,
        preset: &ParameterSet,
        overrides: &BTreeMap<String, f64>,
        protocol: &ExperimentProtocol,
        cancel: &CancelToken,
    ) -> SolverResult<Box<dyn Solution>> {
        let (values, applied) = prepare_values(preset, overrides);
        let model = factory.build();

        tracing::debug!(
            engine = self.engine.id(),
            model = %model.name(),
            parameter_set = preset.key,
            applied = applied.len(),
            steps = protocol.len(),
            "invoking solver engine"
        );

        let outcome = catch_unwind(AssertUnwindSafe(|| {
            self.engine.solve(model.as_ref(), &values, protocol, cancel)
        }))
        .unwrap_or_else(|panic| {
            let message = panic
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "engine panicked".to_string());
            Err(EngineError::Backend { message })
        });

        outcome.map_err(|cause| {
            let trace = DiagnosticTrace {
                engine: self.engine.id(),
                chemistry: factory.chemistry.id(),
                model: factory.key(),
                parameter_set: preset.key,
                protocol: protocol.instructions(),
                applied_overrides: &applied,
                cause: cause.to_string(),
            };
            let diagnostic = serde_json::to_string(&trace)
                .unwrap_or_else(|e| format!("{{\"cause\":\"{cause}\",\"trace_error\":\"{e}\"}}"));
            tracing::error!(%diagnostic, "solver engine failed");
            SolverFailure::new(cause, diagnostic)
        })
    }
}
