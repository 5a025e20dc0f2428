//! SOC Dashboard API - Plan Entitlement Gating
//!
//! Server-side gating for the SOC dashboard's subscription plans.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                         SOC GATE API                             │
//! │                                                                  │
//! │   request ──► attach_principal ──► router ──► route gate ──► handler
//! │               (bearer JWT)                    │                  │
//! │                                               ├─ FeatureGate     │
//! │                                               └─ AssetGate       │
//! │                                                                  │
//! │  ┌────────────────────────┐   ┌──────────────────────────────┐   │
//! │  │  FEATURE_REQUIREMENTS  │   │  asset_limit(plan)           │   │
//! │  │  feature → {plans}     │   │  free 3 | pro 10 | plus 50   │   │
//! │  │                        │   │  enterprise unlimited        │   │
//! │  └────────────────────────┘   └──────────────────────────────┘   │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rejections carry a JSON body with a machine-readable `code`
//! (`AUTH_REQUIRED`, `FEATURE_RESTRICTED`, `ASSET_LIMIT_EXCEEDED`) and an
//! upgrade hint.

#![warn(missing_docs)]

pub mod config;
pub mod entitlements;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;

use axum::{middleware::from_fn_with_state, routing::get, Json, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;

pub use config::GateConfig;
pub use entitlements::{AssetLimit, Plan, PlanLimits};
pub use error::GateError;
pub use middleware::auth::TokenKeys;
pub use models::*;

/// API state
pub struct ApiState {
    /// API version
    pub version: String,
    /// Loaded service configuration
    pub config: GateConfig,
    /// Principal token signing material
    pub tokens: TokenKeys,
}

impl ApiState {
    /// Build state from configuration, deriving the token keys from its secret
    pub fn new(config: GateConfig) -> Self {
        let tokens = TokenKeys::from_secret(config.jwt_secret.as_bytes(), config.token_ttl_hours);
        Self {
            version: env!("CARGO_PKG_VERSION").into(),
            config,
            tokens,
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "SOC Gate API",
        version = "1.0.0",
        description = "Subscription plan entitlement gating for the SOC dashboard",
        license(name = "Apache-2.0")
    ),
    paths(
        routes::health::health_check,
        routes::limits::get_plan_limits,
        routes::limits::get_user_limits,
        routes::assets::create_asset,
        routes::features::threat_feed,
        routes::features::submit_inference,
        routes::features::list_simulations,
        routes::features::submit_kernel,
    ),
    components(
        schemas(
            GateRejection, RejectionCode,
            Plan, PlanLimits, UserLimits,
            Asset, AssetCreate, AssetKind,
            FeatureAck, JobStatus,
            routes::health::HealthResponse
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "limits", description = "Plan quota and feature lookup"),
        (name = "assets", description = "Monitored assets (quota gated)"),
        (name = "features", description = "Plan-gated product features")
    )
)]
pub struct ApiDoc;

/// Build the API router
pub fn build_router(state: ApiState) -> Router {
    let state = Arc::new(state);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/api-docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .nest("/api", api_routes(&state.config))
        .layer(from_fn_with_state(state.clone(), middleware::attach_principal))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

fn api_routes(config: &GateConfig) -> Router<Arc<ApiState>> {
    let asset_gate = middleware::AssetGate::new(&config.upgrade_url, config.max_body_bytes);

    Router::new()
        .merge(routes::limits::router())
        .merge(routes::assets::router(asset_gate))
        .merge(routes::features::router(&config.upgrade_url))
}
