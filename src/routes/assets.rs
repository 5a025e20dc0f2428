//! Monitored asset endpoints

use axum::{http::StatusCode, routing::post, Extension, Json, Router};
use std::sync::Arc;
use uuid::Uuid;

use crate::middleware::AssetGate;
use crate::models::*;
use crate::ApiState;

/// Asset routes, guarded by `gate`
pub fn router(gate: AssetGate) -> Router<Arc<ApiState>> {
    gate.guard(Router::new().route("/assets", post(create_asset)))
}

/// Register a monitored asset
#[utoipa::path(
    post,
    path = "/api/assets",
    request_body = AssetCreate,
    responses(
        (status = 201, description = "Asset created", body = Asset),
        (status = 401, description = "No authenticated principal", body = GateRejection),
        (status = 403, description = "Plan asset limit reached", body = GateRejection)
    ),
    tag = "assets"
)]
pub async fn create_asset(
    Extension(principal): Extension<AuthenticatedPrincipal>,
    Json(input): Json<AssetCreate>,
) -> (StatusCode, Json<Asset>) {
    let asset = Asset {
        id: Uuid::new_v4(),
        name: input.name,
        kind: input.kind,
        owner: principal.id,
        created_at: chrono::Utc::now(),
    };

    tracing::info!(asset = %asset.id, owner = %asset.owner, "Asset registered");
    (StatusCode::CREATED, Json(asset))
}
