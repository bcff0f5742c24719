//! Request pipeline: registry lookup, validation, protocol, solve,
//! normalization, and run history.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use bs_params::validate;
use bs_protocol::{ExperimentKnobs, ExperimentProtocol, ExperimentType, build};
use bs_registry::{Chemistry, ModelFactory, ParameterSet, Registry, RegistryError};
use bs_results::{
    CanonicalRequest, CustomParameterSet, LibraryStore, RunManifest, RunStatus, RunStore,
    SimulationResult, compute_run_id, extract, timestamp_now,
};
use bs_sim::ReferenceEngine;
use bs_solver::{CancelToken, EngineError, SolverAdapter, SolverEngine};
use serde::Serialize;
use serde_json::Value;

use crate::catalog::{self, ModelCatalog};
use crate::config::ServiceConfig;
use crate::error::{AppError, AppResult};
use crate::pool::WorkerPool;
use crate::progress::{RunProgressEvent, RunStage};
use crate::request::SimulationRequest;

/// Outcome of one simulate call.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationResponse {
    pub run_id: String,
    pub protocol: Vec<String>,
    pub timestamp: String,
    pub status: RunStatus,
    pub execution_time_s: f64,
    pub loaded_from_cache: bool,
    pub result: SimulationResult,
}

type ProgressCallback<'a> = Option<&'a mut dyn FnMut(RunProgressEvent)>;

fn emit_progress(
    progress_cb: &mut ProgressCallback<'_>,
    stage: RunStage,
    started: Instant,
    message: Option<String>,
) {
    let elapsed_wall_s = started.elapsed().as_secs_f64();
    tracing::debug!(?stage, elapsed_wall_s, "pipeline stage");
    if let Some(cb) = progress_cb.as_deref_mut() {
        cb(RunProgressEvent::stage(stage, elapsed_wall_s, message));
    }
}

/// A request that passed lookup, validation and protocol construction.
pub(crate) struct PreparedRun<'r> {
    factory: ModelFactory,
    preset: &'r ParameterSet,
    overrides: BTreeMap<String, f64>,
    knobs: ExperimentKnobs,
    protocol: ExperimentProtocol,
    canonical: CanonicalRequest,
}

impl PreparedRun<'_> {
    pub(crate) fn canonical(&self) -> &CanonicalRequest {
        &self.canonical
    }
}

/// Shared simulation service behind the CLI and the HTTP server.
///
/// Cloning is cheap; clones share the engine, the worker pool and the store.
#[derive(Debug, Clone)]
pub struct SimulationService {
    pub(crate) registry: &'static Registry,
    adapter: SolverAdapter,
    pool: WorkerPool,
    store: Option<RunStore>,
    pub(crate) library: Option<LibraryStore>,
    config: Arc<ServiceConfig>,
}

impl SimulationService {
    pub fn new(config: ServiceConfig, engine: Arc<dyn SolverEngine>) -> AppResult<Self> {
        config.validate()?;
        let store = match &config.runs_dir {
            Some(dir) => Some(RunStore::new(dir.clone())?),
            None => None,
        };
        let library = match &config.library_dir {
            Some(dir) => Some(LibraryStore::new(dir.clone())?),
            None => None,
        };
        tracing::info!(
            engine = engine.id(),
            workers = config.workers,
            solve_timeout_s = config.solve_timeout_s,
            runs_dir = ?config.runs_dir,
            library_dir = ?config.library_dir,
            "simulation service ready"
        );
        Ok(Self {
            registry: Registry::builtin(),
            adapter: SolverAdapter::new(engine),
            pool: WorkerPool::new(config.workers, config.solve_timeout()),
            store,
            library,
            config: Arc::new(config),
        })
    }

    /// Service backed by the built-in reference engine configured from `config.engine`.
    pub fn with_reference_engine(config: ServiceConfig) -> AppResult<Self> {
        let engine = ReferenceEngine::new(config.engine.clone())?;
        Self::new(config, Arc::new(engine))
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn engine_id(&self) -> &str {
        self.adapter.engine_id()
    }

    pub fn store(&self) -> Option<&RunStore> {
        self.store.as_ref()
    }

    /// Registry and experiment catalog, tagged with the engine in use.
    pub fn catalog(&self) -> ModelCatalog {
        let mut catalog = catalog::model_catalog();
        catalog.engine = Some(self.engine_id().to_string());
        catalog
    }

    /// Run the pipeline on the calling thread with a deadline token.
    pub fn simulate(
        &self,
        request: &SimulationRequest,
        progress_cb: ProgressCallback<'_>,
    ) -> AppResult<SimulationResponse> {
        let cancel = CancelToken::with_timeout(self.config.solve_timeout());
        self.run_pipeline(request, &cancel, progress_cb)
    }

    /// Run the pipeline on the bounded worker pool.
    pub async fn simulate_async(&self, request: SimulationRequest) -> AppResult<SimulationResponse> {
        let service = self.clone();
        self.pool
            .run(move |cancel| service.run_pipeline(&request, cancel, None))
            .await
    }

    /// Pipeline with an externally owned cancellation token.
    pub fn run_pipeline(
        &self,
        request: &SimulationRequest,
        cancel: &CancelToken,
        mut progress_cb: ProgressCallback<'_>,
    ) -> AppResult<SimulationResponse> {
        let started = Instant::now();
        emit_progress(&mut progress_cb, RunStage::Received, started, None);

        let prepared = self.prepare(request)?;
        emit_progress(
            &mut progress_cb,
            RunStage::Validated,
            started,
            Some(format!("{} override(s) validated", prepared.overrides.len())),
        );
        emit_progress(
            &mut progress_cb,
            RunStage::ProtocolBuilt,
            started,
            Some(format!("{} step(s)", prepared.protocol.len())),
        );

        let run_id = compute_run_id(&prepared.canonical, self.engine_id());

        if let Some(cached) = self.load_cached(&run_id, &mut progress_cb, started) {
            emit_progress(&mut progress_cb, RunStage::Responded, started, None);
            return Ok(cached);
        }

        emit_progress(&mut progress_cb, RunStage::Solving, started, None);
        let solved = self.adapter.run(
            &prepared.factory,
            prepared.preset,
            &prepared.overrides,
            &prepared.protocol,
            cancel,
        );
        let solution = match solved {
            Ok(solution) => solution,
            Err(failure) => {
                emit_progress(
                    &mut progress_cb,
                    RunStage::SolverFailed,
                    started,
                    Some(failure.to_string()),
                );
                let status = match failure.cause {
                    EngineError::Cancelled => RunStatus::Cancelled,
                    _ => RunStatus::Failed,
                };
                let manifest = self.manifest(
                    &run_id,
                    &prepared,
                    status,
                    started,
                    Some(failure.to_string()),
                );
                self.persist(&manifest, None);
                return Err(failure.into());
            }
        };
        emit_progress(&mut progress_cb, RunStage::Solved, started, None);

        let result = extract(solution.as_ref(), prepared.knobs.duration_s);
        let status = if result.is_degraded() {
            RunStatus::Degraded
        } else {
            RunStatus::Completed
        };
        emit_progress(
            &mut progress_cb,
            RunStage::Normalized,
            started,
            result.metadata.extraction_error.clone(),
        );

        let manifest = self.manifest(&run_id, &prepared, status, started, None);
        if self.store.is_some() {
            emit_progress(&mut progress_cb, RunStage::SavingResults, started, None);
            self.persist(&manifest, Some(&result));
        }

        tracing::info!(
            run_id = %run_id,
            status = ?status,
            points = result.metadata.total_points,
            execution_time_s = manifest.execution_time_s,
            "simulation finished"
        );
        emit_progress(&mut progress_cb, RunStage::Responded, started, None);

        Ok(SimulationResponse {
            run_id,
            protocol: manifest.protocol,
            timestamp: manifest.timestamp,
            status,
            execution_time_s: manifest.execution_time_s,
            loaded_from_cache: false,
            result,
        })
    }

    /// Lookup, validation and protocol construction. Nothing here touches
    /// the engine.
    pub(crate) fn prepare(&self, request: &SimulationRequest) -> AppResult<PreparedRun<'static>> {
        let registry: &'static Registry = self.registry;
        let factory = registry.resolve_model(&request.battery_type, &request.model)?;
        let (preset, custom) = self.resolve_preset(factory.chemistry, &request.parameter_set)?;

        // Request overrides win over the custom set's values.
        let mut raw: BTreeMap<String, Value> = custom
            .as_ref()
            .map(|set| {
                set.custom_parameters
                    .iter()
                    .map(|(name, value)| (name.clone(), Value::from(*value)))
                    .collect()
            })
            .unwrap_or_default();
        raw.extend(request.parameters.clone().flatten());
        let overrides = validate(&raw)?;

        let experiment = ExperimentType::parse_or_default(&request.experiment_type);
        let knobs = ExperimentKnobs::from_overrides(&overrides);
        let protocol = build(experiment, &knobs)?;

        let canonical = CanonicalRequest {
            battery_type: factory.chemistry.id().to_string(),
            model: factory.key().to_string(),
            parameter_set: custom
                .as_ref()
                .map_or(preset.key, |set| set.name.as_str())
                .to_string(),
            experiment_type: experiment.key().to_string(),
            parameters: overrides.clone(),
        };

        Ok(PreparedRun {
            factory,
            preset,
            overrides,
            knobs,
            protocol,
            canonical,
        })
    }

    /// Built-in preset for `key`, or the base preset of a saved custom set
    /// of the same chemistry.
    fn resolve_preset(
        &self,
        chemistry: Chemistry,
        key: &str,
    ) -> AppResult<(&'static ParameterSet, Option<CustomParameterSet>)> {
        let registry: &'static Registry = self.registry;
        let err = match registry.resolve_parameter_set(chemistry.id(), key) {
            Ok(preset) => return Ok((preset, None)),
            Err(err @ RegistryError::UnsupportedParameterSet { .. }) => err,
            Err(err) => return Err(err.into()),
        };
        let Some(library) = self.library.as_ref().filter(|l| l.has_parameter_set(key)) else {
            return Err(err.into());
        };
        let set = library.load_parameter_set(key)?;
        if set.battery_type != chemistry.id() {
            return Err(err.into());
        }
        let base = registry.resolve_parameter_set(chemistry.id(), &set.base_parameter_set)?;
        tracing::debug!(custom = key, base = base.key, "resolved custom parameter set");
        Ok((base, Some(set)))
    }

    /// A stored completed run for `run_id`, when caching is on.
    fn load_cached(
        &self,
        run_id: &str,
        progress_cb: &mut ProgressCallback<'_>,
        started: Instant,
    ) -> Option<SimulationResponse> {
        let store = self.store.as_ref().filter(|_| self.config.use_cache)?;
        emit_progress(progress_cb, RunStage::CheckingCache, started, None);
        if !store.has_result(run_id) {
            return None;
        }

        let loaded = store
            .load_manifest(run_id)
            .and_then(|manifest| Ok((store.load_result(run_id)?, manifest)));
        match loaded {
            Ok((result, manifest)) if manifest.status == RunStatus::Completed => {
                emit_progress(
                    progress_cb,
                    RunStage::LoadingCachedResult,
                    started,
                    Some("Loaded cached run".to_string()),
                );
                tracing::debug!(run_id, "serving cached run");
                Some(SimulationResponse {
                    run_id: manifest.run_id,
                    protocol: manifest.protocol,
                    timestamp: manifest.timestamp,
                    status: manifest.status,
                    execution_time_s: started.elapsed().as_secs_f64(),
                    loaded_from_cache: true,
                    result,
                })
            }
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(run_id, error = %e, "cached run unreadable; solving again");
                None
            }
        }
    }

    fn manifest(
        &self,
        run_id: &str,
        prepared: &PreparedRun<'_>,
        status: RunStatus,
        started: Instant,
        error_message: Option<String>,
    ) -> RunManifest {
        RunManifest {
            run_id: run_id.to_string(),
            timestamp: timestamp_now(),
            request: prepared.canonical.clone(),
            protocol: prepared.protocol.instructions(),
            status,
            execution_time_s: started.elapsed().as_secs_f64(),
            engine: self.engine_id().to_string(),
            error_message,
        }
    }

    /// Save a finished run. Store failures are logged, never returned.
    fn persist(&self, manifest: &RunManifest, result: Option<&SimulationResult>) {
        if let Some(store) = &self.store
            && let Err(e) = store.save_run(manifest, result)
        {
            tracing::warn!(run_id = %manifest.run_id, error = %e, "failed to save run");
        }
    }

    /// Stored runs, newest first. Empty when run history is disabled.
    pub fn list_runs(&self) -> AppResult<Vec<RunManifest>> {
        match &self.store {
            Some(store) => Ok(store.list_runs()?),
            None => Ok(Vec::new()),
        }
    }

    /// Manifest and, when one was stored, the result of a run.
    pub fn load_run(&self, run_id: &str) -> AppResult<(RunManifest, Option<SimulationResult>)> {
        let store = self
            .store
            .as_ref()
            .ok_or_else(|| AppError::RunNotFound(run_id.to_string()))?;
        let manifest = store.load_manifest(run_id)?;
        let result = if store.has_result(run_id) {
            Some(store.load_result(run_id)?)
        } else {
            None
        };
        Ok((manifest, result))
    }
}
