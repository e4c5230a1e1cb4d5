//! HTTP handlers for the weather dosha endpoints

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State, rejection::PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, ValidationError};
use crate::models::WeatherDosha;
use crate::pipeline::DoshaPipeline;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<DoshaPipeline>,
}

/// Error body, `{"detail": "..."}`
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub detail: String,
}

/// Liveness body
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub cache_size: usize,
}

impl IntoResponse for PipelineError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = ApiError {
            detail: self.user_message(),
        };
        (status, Json(body)).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/weather/{location}", get(get_weather_dosha))
        .route("/health", get(health))
        .with_state(state)
}

async fn get_weather_dosha(
    State(state): State<AppState>,
    location: Result<Path<String>, PathRejection>,
) -> Result<Json<WeatherDosha>, PipelineError> {
    // a segment that does not decode to UTF-8 is a malformed location
    let Path(location) = location.map_err(|rejection| {
        tracing::debug!("Rejected location path: {}", rejection);
        ValidationError::InvalidFormat
    })?;
    let result = state.pipeline.handle(&location).await?;
    Ok(Json(result))
}

async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "healthy".to_string(),
        cache_size: state.pipeline.cache().len(),
    })
}
