mod common;

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::Ordering;

use bs_app::{ErrorCode, RunStage, ServiceConfig, SimulationRequest, SimulationService};
use bs_params::ParameterOverrides;
use bs_results::RunStatus;
use common::{EchoAmbientEngine, IncompleteEngine, service, temp_runs_dir};
use serde_json::json;

fn flat(pairs: &[(&str, serde_json::Value)]) -> ParameterOverrides {
    ParameterOverrides::Flat(
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect::<BTreeMap<_, _>>(),
    )
}

#[test]
fn chen2020_two_c_discharge_end_to_end() {
    let service = SimulationService::with_reference_engine(ServiceConfig::default()).unwrap();
    let request = SimulationRequest::new("lithium-ion", "SPM", "Chen2020", "constant_current")
        .with_parameters(flat(&[
            ("C-rate", json!(2)),
            ("Simulation duration [s]", json!(1800)),
        ]));

    let mut stages = Vec::new();
    let mut record = |event: bs_app::RunProgressEvent| stages.push(event.stage);
    let response = service.simulate(&request, Some(&mut record)).unwrap();

    assert_eq!(
        response.protocol,
        vec!["Discharge at 2C for 0.5 hours or until 2.5V".to_string()]
    );
    let result = &response.result;
    assert!(!result.is_degraded());
    assert_eq!(response.status, RunStatus::Completed);
    assert!(result.summary.simulation_time <= 1800.0 + 1e-9);
    assert!(result.summary.energy_delivered > 0.0);
    assert_eq!(result.metadata.total_points, result.variables.time.len());
    assert_eq!(result.variables.voltage.len(), result.variables.time.len());
    assert!(result.variables.temperature.is_some());
    assert_eq!(response.run_id.len(), 64);
    assert!(!response.loaded_from_cache);

    assert_eq!(
        stages,
        vec![
            RunStage::Received,
            RunStage::Validated,
            RunStage::ProtocolBuilt,
            RunStage::Solving,
            RunStage::Solved,
            RunStage::Normalized,
            RunStage::Responded,
        ]
    );
}

#[test]
fn every_experiment_type_runs_on_the_reference_engine() {
    let service = SimulationService::with_reference_engine(ServiceConfig::default()).unwrap();
    for experiment in [
        "constant_current",
        "constant_voltage",
        "cccv",
        "current_function",
        "power_function",
        "resistance_function",
    ] {
        let request = SimulationRequest::new("lithium-ion", "DFN", "Chen2020", experiment)
            .with_parameters(flat(&[("Simulation duration [s]", json!(600))]));
        let response = service
            .simulate(&request, None)
            .unwrap_or_else(|e| panic!("{experiment}: {e}"));
        assert!(!response.protocol.is_empty(), "{experiment}");
    }
}

#[test]
fn lead_acid_needs_its_own_cut_off() {
    let service = SimulationService::with_reference_engine(ServiceConfig::default()).unwrap();
    let defaults = SimulationRequest::new("lead-acid", "LOQS", "Sulzer2019", "constant_current");

    // The 2.5 V default cut-off is above a lead-acid cell's voltage, so the
    // discharge ends before it starts: one resting sample at t = 0.
    let response = service.simulate(&defaults, None).unwrap();
    assert_eq!(
        response.protocol,
        vec!["Discharge at 1C for 1.0 hours or until 2.5V".to_string()]
    );
    let result = &response.result;
    assert!(!result.is_degraded());
    assert_eq!(result.metadata.total_points, 1);
    assert_eq!(result.variables.time, vec![0.0]);
    assert_eq!(result.variables.current, vec![0.0]);
    assert!((result.variables.voltage[0] - 2.15).abs() < 1e-9);
    assert_eq!(result.summary.energy_delivered, 0.0);

    let with_cut_off = defaults.with_parameters(flat(&[("Voltage cut-off [V]", json!(1.75))]));
    let response = service.simulate(&with_cut_off, None).unwrap();
    assert_eq!(
        response.protocol,
        vec!["Discharge at 1C for 1.0 hours or until 1.75V".to_string()]
    );
    let result = &response.result;
    assert!(result.metadata.total_points > 100);
    assert!(result.summary.simulation_time > 1800.0);
    assert!(result.summary.final_voltage >= 1.75 - 1e-6);
    assert!(result.summary.energy_delivered > 0.0);
    assert!(result.variables.positive_concentration.is_none());
}

#[test]
fn validation_errors_stop_before_the_engine() {
    let engine = Arc::new(EchoAmbientEngine::default());
    let service = service(engine.clone(), ServiceConfig::default());

    let request = SimulationRequest::default().with_parameters(flat(&[("C-rate", json!("fast"))]));
    let err = service.simulate(&request, None).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidParameterValue);
    assert_eq!(err.status(), 400);
    assert!(err.public_message().contains("C-rate"));

    let request = SimulationRequest::new("lead-acid", "SPM", "Sulzer2019", "constant_current");
    let err = service.simulate(&request, None).unwrap_err();
    assert_eq!(err.code(), ErrorCode::UnsupportedModel);

    let request = SimulationRequest::new("lithium-ion", "SPM", "Sulzer2019", "constant_current");
    let err = service.simulate(&request, None).unwrap_err();
    assert_eq!(err.code(), ErrorCode::UnsupportedParameterSet);

    let request = SimulationRequest::new("lithium-ion", "SPM", "Chen2020", "resistance_function")
        .with_parameters(flat(&[("Current function [A]", json!(0))]));
    let err = service.simulate(&request, None).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidParameterValue);

    assert_eq!(engine.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn unknown_experiment_type_runs_constant_current() {
    let service = SimulationService::with_reference_engine(ServiceConfig::default()).unwrap();
    let known = service
        .simulate(&SimulationRequest::default(), None)
        .unwrap();
    let unknown = service
        .simulate(
            &SimulationRequest::new("lithium-ion", "SPM", "Chen2020", "galvanostatic_pulse"),
            None,
        )
        .unwrap();
    assert_eq!(known.protocol, unknown.protocol);
    assert_eq!(known.run_id, unknown.run_id);
}

#[test]
fn missing_required_series_degrades_but_succeeds() {
    let service = service(Arc::new(IncompleteEngine), ServiceConfig::default());
    let request = SimulationRequest::default()
        .with_parameters(flat(&[("Simulation duration [s]", json!(900))]));
    let response = service.simulate(&request, None).unwrap();
    assert_eq!(response.status, RunStatus::Degraded);
    assert_eq!(response.result.variables.time, vec![0.0, 900.0]);
    assert!(response.result.metadata.extraction_error.is_some());
}

#[test]
fn completed_runs_are_served_from_cache() {
    let engine = Arc::new(EchoAmbientEngine::default());
    let config = ServiceConfig {
        runs_dir: Some(temp_runs_dir("bs_app_cache_hits")),
        ..ServiceConfig::default()
    };
    let service = service(engine.clone(), config);
    let request = SimulationRequest::default().with_parameters(flat(&[("C-rate", json!(0.5))]));

    let first = service.simulate(&request, None).unwrap();
    assert!(!first.loaded_from_cache);

    let mut stages = Vec::new();
    let mut record = |event: bs_app::RunProgressEvent| stages.push(event.stage);
    let second = service.simulate(&request, Some(&mut record)).unwrap();
    assert!(second.loaded_from_cache);
    assert_eq!(first.run_id, second.run_id);
    assert_eq!(first.result, second.result);
    assert_eq!(engine.calls.load(Ordering::SeqCst), 1);
    assert!(stages.contains(&RunStage::LoadingCachedResult));
    assert!(!stages.contains(&RunStage::Solving));

    let runs = service.list_runs().unwrap();
    assert_eq!(runs.len(), 1);
    let (manifest, result) = service.load_run(&first.run_id).unwrap();
    assert_eq!(manifest.status, RunStatus::Completed);
    assert_eq!(manifest.request.parameters["C-rate"], 0.5);
    assert!(result.is_some());
}

#[test]
fn cache_can_be_disabled() {
    let engine = Arc::new(EchoAmbientEngine::default());
    let config = ServiceConfig {
        runs_dir: Some(temp_runs_dir("bs_app_cache_disabled")),
        use_cache: false,
        ..ServiceConfig::default()
    };
    let service = service(engine.clone(), config);
    service.simulate(&SimulationRequest::default(), None).unwrap();
    let again = service.simulate(&SimulationRequest::default(), None).unwrap();
    assert!(!again.loaded_from_cache);
    assert_eq!(engine.calls.load(Ordering::SeqCst), 2);
}

#[test]
fn degraded_runs_are_not_reused() {
    let config = ServiceConfig {
        runs_dir: Some(temp_runs_dir("bs_app_degraded_not_cached")),
        ..ServiceConfig::default()
    };
    let service = service(Arc::new(IncompleteEngine), config);
    service.simulate(&SimulationRequest::default(), None).unwrap();
    let again = service.simulate(&SimulationRequest::default(), None).unwrap();
    assert!(!again.loaded_from_cache);
    assert_eq!(again.status, RunStatus::Degraded);
}

#[test]
fn unknown_run_is_not_found() {
    let service = SimulationService::with_reference_engine(ServiceConfig::default()).unwrap();
    assert!(service.list_runs().unwrap().is_empty());
    let err = service.load_run("nope").unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotFound);
}
