use axum::{extract::State, http::StatusCode, Json};
use common::types::Health;
use tracing::warn;

use crate::state::AppState;

#[derive(utoipa::ToSchema)]
pub struct HealthDoc {
    /// UP or DOWN
    pub status: String,
    /// UP or DOWN
    pub database: String,
}

#[utoipa::path(
    get, path = "/health", tag = "Health",
    responses(
        (status = 200, description = "Service and database are up", body = HealthDoc),
        (status = 503, description = "Database unreachable", body = HealthDoc)
    )
)]
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<Health>) {
    match state.db.ping().await {
        Ok(()) => (StatusCode::OK, Json(Health::up())),
        Err(e) => {
            warn!(error = %e, "database ping failed");
            (StatusCode::SERVICE_UNAVAILABLE, Json(Health::database_down()))
        }
    }
}
