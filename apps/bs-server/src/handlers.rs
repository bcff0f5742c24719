//! Route handlers.

use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State},
};
use bs_app::{
    CustomParameterSet, ModelCatalog, ParameterInfo, SimulationRequest, SimulationTemplate,
    parameter_info,
};
use bs_results::{RunManifest, SimulationResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::AppState;
use crate::error::ApiError;

#[derive(Debug, Serialize)]
pub struct SimulateResponse {
    pub success: bool,
    pub data: SimulationResult,
    pub run_id: String,
    pub protocol: Vec<String>,
    pub timestamp: String,
    pub request_id: Uuid,
}

/// `POST /simulate`. An empty body runs the default request.
pub async fn simulate(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SimulateResponse>, ApiError> {
    let request_id = Uuid::new_v4();
    let request: SimulationRequest = if body.iter().all(u8::is_ascii_whitespace) {
        SimulationRequest::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| {
            tracing::warn!(%request_id, error = %e, "malformed simulate body");
            ApiError::bad_request(format!("Malformed request body: {e}"), request_id)
        })?
    };
    run_request(&state, request, request_id).await
}

async fn run_request(
    state: &AppState,
    request: SimulationRequest,
    request_id: Uuid,
) -> Result<Json<SimulateResponse>, ApiError> {
    tracing::info!(
        %request_id,
        battery_type = %request.battery_type,
        model = %request.model,
        parameter_set = %request.parameter_set,
        experiment_type = %request.experiment_type,
        "simulate"
    );

    let response = state
        .service
        .simulate_async(request)
        .await
        .map_err(|e| ApiError::from_app(e, request_id))?;

    Ok(Json(SimulateResponse {
        success: true,
        data: response.result,
        run_id: response.run_id,
        protocol: response.protocol,
        timestamp: response.timestamp,
        request_id,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ParametersQuery {
    pub battery_type: String,
    pub model: String,
    pub parameter_set: String,
}

impl Default for ParametersQuery {
    fn default() -> Self {
        let request = SimulationRequest::default();
        Self {
            battery_type: request.battery_type,
            model: request.model,
            parameter_set: request.parameter_set,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ParametersResponse {
    pub success: bool,
    #[serde(flatten)]
    pub info: ParameterInfo,
}

/// `GET /parameters`
pub async fn parameters(
    Query(query): Query<ParametersQuery>,
) -> Result<Json<ParametersResponse>, ApiError> {
    let info = parameter_info(&query.battery_type, &query.model, &query.parameter_set)?;
    Ok(Json(ParametersResponse {
        success: true,
        info,
    }))
}

#[derive(Debug, Serialize)]
pub struct ModelsResponse {
    pub success: bool,
    pub data: ModelCatalog,
}

/// `GET /models`
pub async fn models(State(state): State<AppState>) -> Json<ModelsResponse> {
    Json(ModelsResponse {
        success: true,
        data: state.service.catalog(),
    })
}

#[derive(Debug, Serialize)]
pub struct RunsResponse {
    pub success: bool,
    pub data: Vec<RunManifest>,
}

/// `GET /runs`
pub async fn runs(State(state): State<AppState>) -> Result<Json<RunsResponse>, ApiError> {
    let data = state.service.list_runs()?;
    Ok(Json(RunsResponse {
        success: true,
        data,
    }))
}

#[derive(Debug, Serialize)]
pub struct RunDetail {
    pub manifest: RunManifest,
    pub result: Option<SimulationResult>,
}

#[derive(Debug, Serialize)]
pub struct RunResponse {
    pub success: bool,
    pub data: RunDetail,
}

/// `GET /runs/:run_id`
pub async fn run(
    State(state): State<AppState>,
    Path(run_id): Path<String>,
) -> Result<Json<RunResponse>, ApiError> {
    let (manifest, result) = state.service.load_run(&run_id)?;
    Ok(Json(RunResponse {
        success: true,
        data: RunDetail { manifest, result },
    }))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub engine: String,
    pub version: &'static str,
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        engine: state.service.engine_id().to_string(),
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub success: bool,
    pub data: Vec<T>,
}

#[derive(Debug, Serialize)]
pub struct EntryResponse<T> {
    pub success: bool,
    pub data: T,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub success: bool,
    pub deleted: String,
}

fn parse_body<T: serde::de::DeserializeOwned>(body: &Bytes, request_id: Uuid) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| {
        tracing::warn!(%request_id, error = %e, "malformed library body");
        ApiError::bad_request(format!("Malformed request body: {e}"), request_id)
    })
}

/// `GET /templates`
pub async fn templates(
    State(state): State<AppState>,
) -> Result<Json<ListResponse<SimulationTemplate>>, ApiError> {
    Ok(Json(ListResponse {
        success: true,
        data: state.service.templates()?,
    }))
}

/// `POST /templates`
pub async fn save_template(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<EntryResponse<SimulationTemplate>>, ApiError> {
    let request_id = Uuid::new_v4();
    let template: SimulationTemplate = parse_body(&body, request_id)?;
    let data = state
        .service
        .save_template(template)
        .map_err(|e| ApiError::from_app(e, request_id))?;
    Ok(Json(EntryResponse {
        success: true,
        data,
    }))
}

/// `GET /templates/:name`
pub async fn template(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<EntryResponse<SimulationTemplate>>, ApiError> {
    Ok(Json(EntryResponse {
        success: true,
        data: state.service.template(&name)?,
    }))
}

/// `DELETE /templates/:name`
pub async fn delete_template(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<DeletedResponse>, ApiError> {
    state.service.delete_template(&name)?;
    Ok(Json(DeletedResponse {
        success: true,
        deleted: name,
    }))
}

/// `POST /templates/:name/simulate`
pub async fn simulate_template(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<SimulateResponse>, ApiError> {
    let request_id = Uuid::new_v4();
    let request = state
        .service
        .template_request(&name)
        .map_err(|e| ApiError::from_app(e, request_id))?;
    run_request(&state, request, request_id).await
}

/// `GET /parameter-sets`
pub async fn parameter_sets(
    State(state): State<AppState>,
) -> Result<Json<ListResponse<CustomParameterSet>>, ApiError> {
    Ok(Json(ListResponse {
        success: true,
        data: state.service.parameter_sets()?,
    }))
}

/// `POST /parameter-sets`
pub async fn save_parameter_set(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<EntryResponse<CustomParameterSet>>, ApiError> {
    let request_id = Uuid::new_v4();
    let set: CustomParameterSet = parse_body(&body, request_id)?;
    let data = state
        .service
        .save_parameter_set(set)
        .map_err(|e| ApiError::from_app(e, request_id))?;
    Ok(Json(EntryResponse {
        success: true,
        data,
    }))
}

/// `GET /parameter-sets/:name`
pub async fn parameter_set(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<EntryResponse<CustomParameterSet>>, ApiError> {
    Ok(Json(EntryResponse {
        success: true,
        data: state.service.parameter_set(&name)?,
    }))
}

/// `DELETE /parameter-sets/:name`
pub async fn delete_parameter_set(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<DeletedResponse>, ApiError> {
    state.service.delete_parameter_set(&name)?;
    Ok(Json(DeletedResponse {
        success: true,
        deleted: name,
    }))
}
