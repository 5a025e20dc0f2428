//! Plan-gated product endpoints
//!
//! Each route sits behind a [`FeatureGate`]. The handlers only acknowledge
//! the request; feeds, inference and simulations are produced elsewhere.

use axum::{
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::entitlements::features;
use crate::middleware::FeatureGate;
use crate::models::*;
use crate::ApiState;

/// Feature routes, each behind the gate for its feature
pub fn router(upgrade_url: &str) -> Router<Arc<ApiState>> {
    let gated = |feature: &'static str, routes: Router<Arc<ApiState>>| {
        FeatureGate::new(feature, upgrade_url).guard(routes)
    };

    Router::new()
        .merge(gated(
            features::BASIC_THREAT_FEED,
            Router::new().route("/threats/feed", get(threat_feed)),
        ))
        .merge(gated(
            features::REAL_AI_INFERENCE,
            Router::new().route("/ai/inference", post(submit_inference)),
        ))
        .merge(gated(
            features::ATTACK_SIMULATION,
            Router::new().route("/simulations", get(list_simulations)),
        ))
        .merge(gated(
            features::CUSTOM_KERNELS,
            Router::new().route("/kernels", post(submit_kernel)),
        ))
}

fn ack(feature: &str, status: JobStatus, principal: AuthenticatedPrincipal) -> FeatureAck {
    FeatureAck {
        id: Uuid::new_v4(),
        feature: feature.to_string(),
        status,
        requested_by: principal.id,
        accepted_at: chrono::Utc::now(),
    }
}

/// Threat feed access
#[utoipa::path(
    get,
    path = "/api/threats/feed",
    responses(
        (status = 200, description = "Feed available", body = FeatureAck),
        (status = 401, description = "No authenticated principal", body = GateRejection)
    ),
    tag = "features"
)]
pub async fn threat_feed(Extension(principal): Extension<AuthenticatedPrincipal>) -> Json<FeatureAck> {
    Json(ack(features::BASIC_THREAT_FEED, JobStatus::Available, principal))
}

/// Submit an AI inference job
#[utoipa::path(
    post,
    path = "/api/ai/inference",
    responses(
        (status = 202, description = "Inference accepted", body = FeatureAck),
        (status = 401, description = "No authenticated principal", body = GateRejection),
        (status = 403, description = "Plan does not include AI inference", body = GateRejection)
    ),
    tag = "features"
)]
pub async fn submit_inference(
    Extension(principal): Extension<AuthenticatedPrincipal>,
) -> (StatusCode, Json<FeatureAck>) {
    (
        StatusCode::ACCEPTED,
        Json(ack(features::REAL_AI_INFERENCE, JobStatus::Accepted, principal)),
    )
}

/// Attack simulation catalog access
#[utoipa::path(
    get,
    path = "/api/simulations",
    responses(
        (status = 200, description = "Simulations available", body = FeatureAck),
        (status = 403, description = "Plan does not include attack simulation", body = GateRejection)
    ),
    tag = "features"
)]
pub async fn list_simulations(
    Extension(principal): Extension<AuthenticatedPrincipal>,
) -> Json<FeatureAck> {
    Json(ack(features::ATTACK_SIMULATION, JobStatus::Available, principal))
}

/// Submit a custom detection kernel
#[utoipa::path(
    post,
    path = "/api/kernels",
    responses(
        (status = 202, description = "Kernel accepted", body = FeatureAck),
        (status = 403, description = "Plan does not include custom kernels", body = GateRejection)
    ),
    tag = "features"
)]
pub async fn submit_kernel(
    Extension(principal): Extension<AuthenticatedPrincipal>,
) -> (StatusCode, Json<FeatureAck>) {
    (
        StatusCode::ACCEPTED,
        Json(ack(features::CUSTOM_KERNELS, JobStatus::Accepted, principal)),
    )
}
