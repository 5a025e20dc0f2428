//! Plan limits lookup endpoints

use axum::{extract::Path, routing::get, Extension, Json, Router};
use std::sync::Arc;

use crate::entitlements::{self, PlanLimits};
use crate::error::GateError;
use crate::models::{AuthenticatedPrincipal, GateRejection, UserLimits};
use crate::ApiState;

/// Limits lookup routes
pub fn router() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/plans/:plan/limits", get(get_plan_limits))
        .route("/user/limits", get(get_user_limits))
}

/// Limits of a plan
///
/// Unknown plan names resolve to no features and a zero asset quota.
#[utoipa::path(
    get,
    path = "/api/plans/{plan}/limits",
    params(("plan" = String, Path, description = "Plan name: free, pro, plus or enterprise")),
    responses((status = 200, description = "Plan limits", body = PlanLimits)),
    tag = "limits"
)]
pub async fn get_plan_limits(Path(plan): Path<String>) -> Json<PlanLimits> {
    Json(entitlements::limits_for_key(&plan))
}

/// Limits of the calling user
#[utoipa::path(
    get,
    path = "/api/user/limits",
    responses(
        (status = 200, description = "Caller's plan limits", body = UserLimits),
        (status = 401, description = "No authenticated principal", body = GateRejection)
    ),
    tag = "limits"
)]
pub async fn get_user_limits(
    principal: Option<Extension<AuthenticatedPrincipal>>,
) -> Result<Json<UserLimits>, GateError> {
    let Extension(principal) = principal.ok_or(GateError::AuthRequired)?;

    Ok(Json(UserLimits {
        plan: principal.plan,
        assets_count: principal.assets_count,
        limits: entitlements::limits_for(principal.plan),
    }))
}
