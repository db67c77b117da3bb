use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::error::{AppError, ErrorBody};
use crate::state::AppState;

#[derive(Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    #[schema(example = true)]
    pub success: bool,
    #[schema(example = "ok")]
    pub status: &'static str,
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Health",
    operation_id = "welcome",
    summary = "Welcome message",
    responses((status = 200, description = "Plain-text greeting", body = String)),
)]
pub async fn welcome() -> &'static str {
    "Welcome to the PawTrack API"
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    operation_id = "health",
    summary = "Liveness probe",
    description = "Returns 200 when the service is up and the store answers a ping.",
    responses(
        (status = 200, description = "Healthy", body = HealthResponse),
        (status = 500, description = "Store unreachable (STORE_ERROR)", body = ErrorBody),
    ),
)]
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, AppError> {
    state.db.ping().await?;
    Ok(Json(HealthResponse {
        success: true,
        status: "ok",
    }))
}
