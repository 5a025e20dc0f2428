//! Plan gates
//!
//! Two interceptors guard product routes:
//!
//! - [`feature_gate`] admits callers whose plan includes a named feature.
//! - [`asset_limit_gate`] admits asset creation while the caller is below the
//!   plan's asset quota.
//!
//! Both only read the [`AuthenticatedPrincipal`] attached by the auth layer
//! and the static tables in [`crate::entitlements`]. A rejection ends the
//! request with a [`GateError`]; an admitted request reaches the next handler
//! unchanged.

use axum::{
    body::{self, Body, Bytes},
    extract::{Request, State},
    middleware::{from_fn_with_state, Next},
    response::Response,
    Router,
};
use serde_json::Value;
use std::sync::Arc;

use crate::entitlements::{self, Plan};
use crate::error::GateError;
use crate::models::AuthenticatedPrincipal;

/// Decide whether `principal` may use `feature`
pub fn authorize(
    feature: &str,
    principal: Option<&AuthenticatedPrincipal>,
    upgrade_url: &str,
) -> Result<(), GateError> {
    let principal = principal.ok_or(GateError::AuthRequired)?;

    if entitlements::is_entitled(principal.plan, feature) {
        return Ok(());
    }

    Err(GateError::FeatureRestricted {
        feature: feature.to_string(),
        user_plan: principal.plan,
        required_plan: entitlements::required_plan(feature),
        upgrade_url: upgrade_url.to_string(),
    })
}

/// Decide whether `principal` may add an asset while holding `requested` assets
pub fn check_asset_limit(
    principal: Option<&AuthenticatedPrincipal>,
    requested: u64,
    upgrade_url: &str,
) -> Result<(), GateError> {
    let principal = principal.ok_or(GateError::AuthRequired)?;
    let limit = entitlements::asset_limit(principal.plan);

    if limit.allows(requested) {
        return Ok(());
    }

    Err(GateError::AssetLimitExceeded {
        limit: limit.as_i64(),
        user_plan: principal.plan,
        upgrade_url: upgrade_url.to_string(),
    })
}

/// Route state for [`feature_gate`]
#[derive(Debug, Clone)]
pub struct FeatureGate {
    feature: &'static str,
    upgrade_url: Arc<str>,
}

impl FeatureGate {
    /// Gate on `feature`, pointing denied callers at `upgrade_url`
    pub fn new(feature: &'static str, upgrade_url: &str) -> Self {
        Self {
            feature,
            upgrade_url: Arc::from(upgrade_url),
        }
    }

    /// Put every route of `router` behind this gate
    pub fn guard<S>(self, router: Router<S>) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        router.route_layer(from_fn_with_state(self, feature_gate))
    }
}

/// Admit the request only if the principal's plan includes the gate's feature
pub async fn feature_gate(
    State(gate): State<FeatureGate>,
    req: Request,
    next: Next,
) -> Result<Response, GateError> {
    let principal = req.extensions().get::<AuthenticatedPrincipal>();

    match authorize(gate.feature, principal, &gate.upgrade_url) {
        Ok(()) => {
            tracing::debug!(feature = gate.feature, "Feature allowed");
            Ok(next.run(req).await)
        }
        Err(e) => {
            log_denial(&e, principal.map(|p| p.plan));
            Err(e)
        }
    }
}

/// Route state for [`asset_limit_gate`]
#[derive(Debug, Clone)]
pub struct AssetGate {
    upgrade_url: Arc<str>,
    max_body_bytes: usize,
}

impl AssetGate {
    /// Gate asset creation, buffering at most `max_body_bytes` of body
    pub fn new(upgrade_url: &str, max_body_bytes: usize) -> Self {
        Self {
            upgrade_url: Arc::from(upgrade_url),
            max_body_bytes,
        }
    }

    /// Put every route of `router` behind this gate
    pub fn guard<S>(self, router: Router<S>) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        router.route_layer(from_fn_with_state(self, asset_limit_gate))
    }
}

/// `assetsCount` from a JSON object body
///
/// Bodies that are not a JSON object, and objects without the field (or with
/// `null`), yield `None`. A field that is present but not a non-negative
/// integer is rejected.
fn requested_asset_count(body: &Bytes) -> Result<Option<u64>, GateError> {
    let Ok(Value::Object(fields)) = serde_json::from_slice::<Value>(body) else {
        return Ok(None);
    };

    match fields.get("assetsCount") {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value.as_u64().map(Some).ok_or_else(|| {
            GateError::InvalidBody(format!(
                "assetsCount must be a non-negative integer, got {value}"
            ))
        }),
    }
}

/// Admit the request only while the requested asset count is below the plan quota
pub async fn asset_limit_gate(
    State(gate): State<AssetGate>,
    req: Request,
    next: Next,
) -> Result<Response, GateError> {
    let Some(principal) = req.extensions().get::<AuthenticatedPrincipal>().cloned() else {
        let err = GateError::AuthRequired;
        log_denial(&err, None);
        return Err(err);
    };

    // The body is buffered so the count can be read and then handed on intact
    let (parts, body) = req.into_parts();
    let bytes = body::to_bytes(body, gate.max_body_bytes)
        .await
        .map_err(|e| GateError::InvalidBody(e.to_string()))?;

    let requested = match requested_asset_count(&bytes) {
        Ok(count) => count.unwrap_or(principal.assets_count),
        Err(e) => {
            log_denial(&e, Some(principal.plan));
            return Err(e);
        }
    };

    if let Err(e) = check_asset_limit(Some(&principal), requested, &gate.upgrade_url) {
        log_denial(&e, Some(principal.plan));
        return Err(e);
    }

    tracing::debug!(plan = %principal.plan, requested, "Asset creation allowed");
    Ok(next.run(Request::from_parts(parts, Body::from(bytes))).await)
}

fn log_denial(err: &GateError, plan: Option<Plan>) {
    match err {
        GateError::FeatureRestricted { feature, required_plan, .. } => tracing::info!(
            feature = %feature,
            plan = ?plan,
            required_plan = %required_plan,
            "Feature restricted"
        ),
        GateError::AssetLimitExceeded { limit, .. } => tracing::info!(
            plan = ?plan,
            limit,
            "Asset limit exceeded"
        ),
        _ => tracing::info!(code = ?err.code(), "Request rejected"),
    }
}
