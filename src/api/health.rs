use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::infrastructure::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/health",
    responses(
        (status = 200, description = "Service is healthy")
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let (status, database) = match state.db().ping().await {
        Ok(()) => ("healthy", "connected"),
        Err(_) => ("degraded", "unavailable"),
    };

    Json(json!({
        "status": status,
        "database": database,
        "version": env!("CARGO_PKG_VERSION")
    }))
}
