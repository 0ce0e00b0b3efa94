/// Health check endpoint
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "database": "connected",
///   "migrations": "up_to_date"
/// }
/// ```
///
/// Always 200; `status` is `degraded` when the database does not answer or
/// the schema is behind.

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Json};
use projectflow_shared::db::{migrations::get_migration_status, pool::health_check as ping};
use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Application version
    pub version: String,

    /// Database status
    pub database: String,

    /// Schema status: `up_to_date`, `pending` or `unknown`
    pub migrations: String,
}

/// Health check handler
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    let connected = ping(&state.db).await.is_ok();

    let migrations = if connected {
        match get_migration_status(&state.db).await {
            Ok(status) if status.is_up_to_date => "up_to_date",
            Ok(_) => "pending",
            Err(_) => "unknown",
        }
    } else {
        "unknown"
    };

    let healthy = connected && migrations == "up_to_date";

    Ok(Json(HealthResponse {
        status: if healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: if connected { "connected" } else { "disconnected" }.to_string(),
        migrations: migrations.to_string(),
    }))
}
