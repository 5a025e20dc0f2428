//! Plan Entitlements and Feature Gating Tables
//!
//! Static plan → feature and plan → asset quota mappings. Both tables are
//! compile-time constants; nothing mutates them at runtime.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Subscription plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    /// Entry tier
    Free,
    /// AI inference and the live threat map
    Pro,
    /// Attack simulation, analytics and API access
    Plus,
    /// Every feature, unlimited assets
    Enterprise,
}

impl Plan {
    /// Every plan, narrowest entitlements first
    pub const ALL: [Plan; 4] = [Plan::Free, Plan::Pro, Plan::Plus, Plan::Enterprise];

    /// Wire name of the plan
    pub fn as_str(&self) -> &'static str {
        match self {
            Plan::Free => "free",
            Plan::Pro => "pro",
            Plan::Plus => "plus",
            Plan::Enterprise => "enterprise",
        }
    }

    /// Display name used in user-facing messages
    pub fn display_name(&self) -> &'static str {
        match self {
            Plan::Free => "Free",
            Plan::Pro => "Pro",
            Plan::Plus => "Plus",
            Plan::Enterprise => "Enterprise",
        }
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown plan name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown plan: {0}")]
pub struct UnknownPlan(pub String);

impl FromStr for Plan {
    type Err = UnknownPlan;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(Plan::Free),
            "pro" => Ok(Plan::Pro),
            "plus" => Ok(Plan::Plus),
            "enterprise" => Ok(Plan::Enterprise),
            other => Err(UnknownPlan(other.to_string())),
        }
    }
}

/// Gated feature keys
pub mod features {
    #![allow(missing_docs)]

    pub const BASIC_THREAT_FEED: &str = "basic-threat-feed";
    pub const GAMIFIED_LEARNING: &str = "gamified-learning";
    pub const REAL_AI_INFERENCE: &str = "real-ai-inference";
    pub const LIVE_THREAT_MAP: &str = "live-threat-map";
    pub const ATTACK_SIMULATION: &str = "attack-simulation";
    pub const ADVANCED_ANALYTICS: &str = "advanced-analytics";
    pub const API_ACCESS: &str = "api-access";
    pub const CUSTOM_KERNELS: &str = "custom-kernels";
    pub const DEDICATED_SUPPORT: &str = "dedicated-support";
}

use Plan::*;

/// Feature → plans allowed to use it. Every entry lists at least one plan.
pub static FEATURE_REQUIREMENTS: &[(&str, &[Plan])] = &[
    (features::BASIC_THREAT_FEED, &[Free, Pro, Plus, Enterprise]),
    (features::GAMIFIED_LEARNING, &[Free, Pro, Plus, Enterprise]),
    (features::REAL_AI_INFERENCE, &[Pro, Plus, Enterprise]),
    (features::LIVE_THREAT_MAP, &[Pro, Plus, Enterprise]),
    (features::ATTACK_SIMULATION, &[Plus, Enterprise]),
    (features::ADVANCED_ANALYTICS, &[Plus, Enterprise]),
    (features::API_ACCESS, &[Plus, Enterprise]),
    (features::CUSTOM_KERNELS, &[Enterprise]),
    (features::DEDICATED_SUPPORT, &[Enterprise]),
];

/// Upgrade targets in the order they are suggested
pub const UPGRADE_ORDER: [Plan; 3] = [Pro, Plus, Enterprise];

/// Monitored-asset quota for a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "i64", try_from = "i64")]
pub enum AssetLimit {
    /// At most this many assets
    Limited(u32),
    /// No quota; sent as `-1`
    Unlimited,
}

impl AssetLimit {
    /// Wire value of the unlimited quota
    pub const UNLIMITED_SENTINEL: i64 = -1;

    /// Whether `count` existing assets leave room for one more
    pub fn allows(&self, count: u64) -> bool {
        match self {
            AssetLimit::Unlimited => true,
            AssetLimit::Limited(max) => count < u64::from(*max),
        }
    }

    /// Integer form used on the wire
    pub fn as_i64(&self) -> i64 {
        match self {
            AssetLimit::Limited(max) => i64::from(*max),
            AssetLimit::Unlimited => Self::UNLIMITED_SENTINEL,
        }
    }
}

impl From<AssetLimit> for i64 {
    fn from(limit: AssetLimit) -> Self {
        limit.as_i64()
    }
}

impl TryFrom<i64> for AssetLimit {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if value == Self::UNLIMITED_SENTINEL {
            return Ok(AssetLimit::Unlimited);
        }
        u32::try_from(value)
            .map(AssetLimit::Limited)
            .map_err(|_| format!("invalid asset limit: {value}"))
    }
}

/// Asset quota per plan
pub fn asset_limit(plan: Plan) -> AssetLimit {
    match plan {
        Free => AssetLimit::Limited(3),
        Pro => AssetLimit::Limited(10),
        Plus => AssetLimit::Limited(50),
        Enterprise => AssetLimit::Unlimited,
    }
}

/// Plans allowed to use `feature`; empty for keys not in the table
pub fn allowed_plans(feature: &str) -> &'static [Plan] {
    FEATURE_REQUIREMENTS
        .iter()
        .find(|(key, _)| *key == feature)
        .map(|(_, plans)| *plans)
        .unwrap_or(&[])
}

/// Whether `plan` may use `feature`
pub fn is_entitled(plan: Plan, feature: &str) -> bool {
    allowed_plans(feature).contains(&plan)
}

/// Cheapest plan that unlocks `feature`, falling back to Pro
pub fn required_plan(feature: &str) -> Plan {
    let allowed = allowed_plans(feature);
    UPGRADE_ORDER
        .into_iter()
        .find(|plan| allowed.contains(plan))
        .unwrap_or(Pro)
}

/// Quota and feature list for a plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlanLimits {
    /// Maximum monitored assets, -1 for unlimited
    #[schema(value_type = i64)]
    pub max_assets: AssetLimit,
    /// Feature keys the plan unlocks, in table order
    pub features: Vec<String>,
}

impl PlanLimits {
    /// Limits for an unrecognised plan: nothing is granted
    pub fn none() -> Self {
        Self {
            max_assets: AssetLimit::Limited(0),
            features: Vec::new(),
        }
    }
}

/// Quota and unlocked features of `plan`
pub fn limits_for(plan: Plan) -> PlanLimits {
    PlanLimits {
        max_assets: asset_limit(plan),
        features: FEATURE_REQUIREMENTS
            .iter()
            .filter(|(_, plans)| plans.contains(&plan))
            .map(|(key, _)| key.to_string())
            .collect(),
    }
}

/// Limits for a plan given by name
pub fn limits_for_key(plan: &str) -> PlanLimits {
    match plan.parse::<Plan>() {
        Ok(plan) => limits_for(plan),
        Err(_) => PlanLimits::none(),
    }
}
