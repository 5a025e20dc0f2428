//! API Models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entitlements::{Plan, PlanLimits};

/// Caller identity attached to the request by the auth layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedPrincipal {
    /// User id
    pub id: String,
    /// Login name
    pub username: String,
    /// Subscription plan
    pub plan: Plan,
    /// Assets the user currently monitors
    pub assets_count: u64,
}

/// Machine-readable rejection codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RejectionCode {
    /// No authenticated principal (401)
    AuthRequired,
    /// Plan lacks the feature (403)
    FeatureRestricted,
    /// Asset quota reached (403)
    AssetLimitExceeded,
    /// Body could not be read (400)
    InvalidRequestBody,
}

/// Body returned when a gate short-circuits a request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GateRejection {
    /// Human-readable reason
    pub error: String,
    /// Machine-readable reason
    pub code: RejectionCode,
    /// Feature that was refused
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feature: Option<String>,
    /// Caller's plan
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_plan: Option<Plan>,
    /// Cheapest plan that unlocks the feature
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_plan: Option<Plan>,
    /// Asset quota of the caller's plan
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_limit: Option<i64>,
    /// Where to upgrade
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upgrade_url: Option<String>,
}

// ============ Limits ============

/// Limits of the calling user
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserLimits {
    /// Caller's plan
    pub plan: Plan,
    /// Assets the caller currently monitors
    pub assets_count: u64,
    /// What the plan allows
    pub limits: PlanLimits,
}

// ============ Assets ============

/// Asset creation request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssetCreate {
    /// Display name
    pub name: String,
    /// Asset category
    pub kind: AssetKind,
    /// Assets the caller already monitors
    #[serde(default)]
    pub assets_count: Option<u64>,
}

/// Asset category
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Server,
    Workstation,
    Network,
    Cloud,
    Application,
}

/// Monitored asset
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    /// Asset id
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Asset category
    pub kind: AssetKind,
    /// Id of the registering user
    pub owner: String,
    /// Registration time
    pub created_at: DateTime<Utc>,
}

// ============ Gated jobs ============

/// Acknowledgement for work accepted behind a feature gate
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeatureAck {
    /// Job id
    pub id: Uuid,
    /// Feature key the request was admitted under
    pub feature: String,
    /// Job state
    pub status: JobStatus,
    /// Id of the requesting user
    pub requested_by: String,
    /// Admission time
    pub accepted_at: DateTime<Utc>,
}

/// State of gated work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Queued for processing
    Accepted,
    /// Ready to read
    Available,
}
