//! bs-server: JSON HTTP API over the batsim service layer.

pub mod error;
pub mod handlers;

use axum::{
    Router,
    routing::{get, post},
};
use bs_app::SimulationService;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub service: SimulationService,
}

impl AppState {
    pub fn new(service: SimulationService) -> Self {
        Self { service }
    }
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/simulate", post(handlers::simulate))
        .route("/parameters", get(handlers::parameters))
        .route("/models", get(handlers::models))
        .route("/runs", get(handlers::runs))
        .route("/runs/:run_id", get(handlers::run))
        .route(
            "/templates",
            get(handlers::templates).post(handlers::save_template),
        )
        .route(
            "/templates/:name",
            get(handlers::template).delete(handlers::delete_template),
        )
        .route("/templates/:name/simulate", post(handlers::simulate_template))
        .route(
            "/parameter-sets",
            get(handlers::parameter_sets).post(handlers::save_parameter_set),
        )
        .route(
            "/parameter-sets/:name",
            get(handlers::parameter_set).delete(handlers::delete_parameter_set),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
