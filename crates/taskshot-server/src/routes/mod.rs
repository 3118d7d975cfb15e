pub mod health;
pub mod screenshots;

use std::sync::Arc;

use axum::{http::StatusCode, Json, Router};
use serde_json::{json, Value};
use taskshot_service::{LocalService, ServiceError};
use tower_http::cors::CorsLayer;

pub struct InnerAppState {
    pub service: LocalService,
}

pub type AppState = Arc<InnerAppState>;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(health::routes())
        .merge(screenshots::routes())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub(crate) fn to_error(e: ServiceError) -> (StatusCode, Json<Value>) {
    let status = match &e {
        ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
        ServiceError::Forbidden(_) => StatusCode::FORBIDDEN,
        ServiceError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(json!({ "error": e.to_string() })))
}
