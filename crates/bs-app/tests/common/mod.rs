#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use bs_app::{ServiceConfig, SimulationService};
use bs_protocol::ExperimentProtocol;
use bs_registry::{BatteryModel, ParameterValues};
use bs_solver::variables::{CELL_TEMPERATURE, CURRENT, DISCHARGE_CAPACITY, TERMINAL_VOLTAGE, TIME};
use bs_solver::{CancelToken, EngineResult, Solution, SolverEngine, TabularSolution};

pub fn temp_runs_dir(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(name);
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

pub fn service(engine: Arc<dyn SolverEngine>, config: ServiceConfig) -> SimulationService {
    SimulationService::new(config, engine).unwrap()
}

/// Echoes the ambient temperature it was handed as the temperature series,
/// after a short pause so concurrent solves overlap.
#[derive(Debug, Default)]
pub struct EchoAmbientEngine {
    pub calls: AtomicUsize,
    pub in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

impl SolverEngine for EchoAmbientEngine {
    fn id(&self) -> &str {
        "echo-ambient"
    }

    fn solve(
        &self,
        _model: &dyn BatteryModel,
        values: &ParameterValues,
        _protocol: &ExperimentProtocol,
        _cancel: &CancelToken,
    ) -> EngineResult<Box<dyn Solution>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        std::thread::sleep(Duration::from_millis(50));
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let ambient = values.get("Ambient temperature [K]").unwrap_or(f64::NAN);
        Ok(Box::new(
            TabularSolution::new()
                .with(TIME, vec![0.0, 1.0])
                .with(TERMINAL_VOLTAGE, vec![4.0, 3.9])
                .with(CURRENT, vec![1.0, 1.0])
                .with(DISCHARGE_CAPACITY, vec![0.0, 0.001])
                .with(CELL_TEMPERATURE, vec![ambient, ambient]),
        ))
    }
}

/// Returns a solution without a current series.
#[derive(Debug)]
pub struct IncompleteEngine;

impl SolverEngine for IncompleteEngine {
    fn id(&self) -> &str {
        "incomplete"
    }

    fn solve(
        &self,
        _model: &dyn BatteryModel,
        _values: &ParameterValues,
        _protocol: &ExperimentProtocol,
        _cancel: &CancelToken,
    ) -> EngineResult<Box<dyn Solution>> {
        Ok(Box::new(
            TabularSolution::new()
                .with(TIME, vec![0.0, 5.0])
                .with(TERMINAL_VOLTAGE, vec![4.0, 3.9]),
        ))
    }
}

/// Polls its cancellation token until it fires or `limit` passes.
#[derive(Debug)]
pub struct SlowEngine {
    pub limit: Duration,
}

impl SolverEngine for SlowEngine {
    fn id(&self) -> &str {
        "slow"
    }

    fn solve(
        &self,
        _model: &dyn BatteryModel,
        _values: &ParameterValues,
        _protocol: &ExperimentProtocol,
        cancel: &CancelToken,
    ) -> EngineResult<Box<dyn Solution>> {
        let started = Instant::now();
        while started.elapsed() < self.limit {
            cancel.check()?;
            std::thread::sleep(Duration::from_millis(5));
        }
        Ok(Box::new(TabularSolution::new()))
    }
}
