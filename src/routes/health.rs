//! Liveness endpoint
//!
//! Reports the running version and the size of the compiled-in entitlement
//! tables, so a deploy with a changed plan matrix is visible from outside.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::entitlements::{Plan, FEATURE_REQUIREMENTS};
use crate::ApiState;

/// Service liveness and loaded entitlement table sizes
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Always `healthy` while the process serves requests
    pub status: String,
    /// Crate version of the running binary
    pub version: String,
    /// Number of subscription plans with asset quotas
    pub plans: usize,
    /// Number of gated feature keys
    pub features: usize,
    /// Time of the check (RFC 3339)
    pub timestamp: String,
}

/// Health check
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check(State(state): State<Arc<ApiState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".into(),
        version: state.version.clone(),
        plans: Plan::ALL.len(),
        features: FEATURE_REQUIREMENTS.len(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
