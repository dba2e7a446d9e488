//! Service banner and health check endpoints.
//!
//! # Endpoints
//!
//! - `GET /` - Service banner
//! - `GET /health` - Health check with database connectivity

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

/// Service banner response
#[derive(Debug, Serialize, Deserialize)]
pub struct RootResponse {
    /// Welcome message
    pub message: String,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Application version
    pub version: String,

    /// Database status
    pub database: String,
}

/// Service banner handler
///
/// # Example
///
/// ```text
/// GET /
/// ```
///
/// Response:
/// ```json
/// {
///   "message": "taskhub API is running"
/// }
/// ```
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "taskhub API is running".to_string(),
    })
}

/// Health check handler
///
/// Returns service health status including database connectivity. The
/// endpoint itself always answers 200; a broken database shows up as
/// `"database": "disconnected"`.
///
/// # Example
///
/// ```text
/// GET /health
/// ```
///
/// Response:
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "database": "connected"
/// }
/// ```
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    // Check database connectivity
    let database_status = match taskhub_shared::db::health_check(&state.db).await {
        Ok(_) => "connected",
        Err(_) => "disconnected",
    };

    Ok(Json(HealthResponse {
        status: if database_status == "connected" {
            "healthy".to_string()
        } else {
            "degraded".to_string()
        },
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: database_status.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_root_banner() {
        let Json(body) = root().await;
        assert_eq!(body.message, "taskhub API is running");
    }
}
