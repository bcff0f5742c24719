use bs_protocol::{ExperimentKnobs, ExperimentProtocol, ExperimentType, build};
use bs_registry::{BatteryModel, ParameterValues, Registry};
use bs_solver::{
    CancelToken, EngineError, EngineResult, Solution, SolverAdapter, SolverEngine,
    TIME_VARIABLE, TabularSolution,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

/// Echoes the ambient temperature it was given as a one-sample series.
struct EchoEngine;

impl SolverEngine for EchoEngine {
    fn id(&self) -> &str {
        "echo"
    }

    fn solve(
        &self,
        _model: &dyn BatteryModel,
        values: &ParameterValues,
        _protocol: &ExperimentProtocol,
        cancel: &CancelToken,
    ) -> EngineResult<Box<dyn Solution>> {
        cancel.check()?;
        let temperature = values
            .get("Ambient temperature [K]")
            .ok_or(EngineError::MissingParameter {
                name: "Ambient temperature [K]".into(),
            })?;
        Ok(Box::new(
            TabularSolution::new()
                .with(TIME_VARIABLE, vec![0.0])
                .with("X-averaged cell temperature [K]", vec![temperature]),
        ))
    }
}

struct FailingEngine;

impl SolverEngine for FailingEngine {
    fn id(&self) -> &str {
        "failing"
    }

    fn solve(
        &self,
        _model: &dyn BatteryModel,
        _values: &ParameterValues,
        _protocol: &ExperimentProtocol,
        _cancel: &CancelToken,
    ) -> EngineResult<Box<dyn Solution>> {
        Err(EngineError::Numerical {
            what: "step size underflow".into(),
        })
    }
}

struct PanickingEngine;

impl SolverEngine for PanickingEngine {
    fn id(&self) -> &str {
        "panicking"
    }

    fn solve(
        &self,
        _model: &dyn BatteryModel,
        _values: &ParameterValues,
        _protocol: &ExperimentProtocol,
        _cancel: &CancelToken,
    ) -> EngineResult<Box<dyn Solution>> {
        panic!("singular matrix");
    }
}

fn protocol() -> ExperimentProtocol {
    build(ExperimentType::ConstantCurrent, &ExperimentKnobs::default()).unwrap()
}

fn overrides(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

#[test]
fn overrides_reach_the_engine_without_touching_the_preset() {
    let registry = Registry::builtin();
    let factory = registry.resolve_model("lithium-ion", "SPM").unwrap();
    let preset = registry.resolve_parameter_set("lithium-ion", "Chen2020").unwrap();
    let adapter = SolverAdapter::new(Arc::new(EchoEngine));

    let solution = adapter
        .run(
            &factory,
            preset,
            &overrides(&[("Ambient temperature [K]", 320.0)]),
            &protocol(),
            &CancelToken::new(),
        )
        .unwrap();
    assert_eq!(solution.get("X-averaged cell temperature [K]").unwrap(), &[320.0]);
    assert_eq!(preset.get("Ambient temperature [K]"), Some(298.15));
}

#[test]
fn engine_failure_is_wrapped_with_a_json_trace() {
    let registry = Registry::builtin();
    let factory = registry.resolve_model("lead-acid", "LOQS").unwrap();
    let preset = registry.resolve_parameter_set("lead-acid", "Sulzer2019").unwrap();
    let adapter = SolverAdapter::new(Arc::new(FailingEngine));

    let failure = adapter
        .run(
            &factory,
            preset,
            &overrides(&[("C-rate", 2.0)]),
            &protocol(),
            &CancelToken::new(),
        )
        .unwrap_err();
    assert!(!failure.is_timeout());
    assert!(matches!(failure.cause, EngineError::Numerical { .. }));

    let trace: serde_json::Value = serde_json::from_str(&failure.diagnostic).unwrap();
    assert_eq!(trace["engine"], "failing");
    assert_eq!(trace["chemistry"], "lead-acid");
    assert_eq!(trace["model"], "LOQS");
    assert_eq!(trace["parameter_set"], "Sulzer2019");
    assert_eq!(
        trace["protocol"][0],
        "Discharge at 1C for 1.0 hours or until 2.5V"
    );
    assert!(trace["cause"].as_str().unwrap().contains("step size underflow"));
}

#[test]
fn expired_deadline_is_a_timeout_failure() {
    let registry = Registry::builtin();
    let factory = registry.resolve_model("lithium-ion", "DFN").unwrap();
    let preset = registry.resolve_parameter_set("lithium-ion", "Chen2020").unwrap();
    let adapter = SolverAdapter::new(Arc::new(EchoEngine));
    let cancel = CancelToken::with_timeout(Duration::ZERO);

    let failure = adapter
        .run(&factory, preset, &BTreeMap::new(), &protocol(), &cancel)
        .unwrap_err();
    assert!(failure.is_timeout());
}

#[test]
fn engine_panic_becomes_a_failure() {
    let registry = Registry::builtin();
    let factory = registry.resolve_model("lithium-ion", "SPM").unwrap();
    let preset = registry.resolve_parameter_set("lithium-ion", "Chen2020").unwrap();
    let adapter = SolverAdapter::new(Arc::new(PanickingEngine));

    let failure = adapter
        .run(&factory, preset, &BTreeMap::new(), &protocol(), &CancelToken::new())
        .unwrap_err();
    assert_eq!(
        failure.cause,
        EngineError::Backend {
            message: "singular matrix".into()
        }
    );
}
