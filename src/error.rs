//! Error types for the SOC gate

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::entitlements::Plan;
use crate::models::{GateRejection, RejectionCode};

/// Request rejected by a gate
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GateError {
    /// No principal attached to the request
    #[error("Authentication required")]
    AuthRequired,

    /// Caller's plan does not include the feature
    #[error("This feature requires {} plan or higher", .required_plan.display_name())]
    FeatureRestricted {
        /// Requested feature key
        feature: String,
        /// Caller's plan
        user_plan: Plan,
        /// Cheapest plan that unlocks the feature
        required_plan: Plan,
        /// Where to upgrade
        upgrade_url: String,
    },

    /// Caller already holds as many assets as the plan allows
    #[error("Asset limit reached for {} plan ({} assets)", .user_plan.display_name(), .limit)]
    AssetLimitExceeded {
        /// Quota of the caller's plan
        limit: i64,
        /// Caller's plan
        user_plan: Plan,
        /// Where to upgrade
        upgrade_url: String,
    },

    /// Request body could not be read
    #[error("invalid request body: {0}")]
    InvalidBody(String),
}

impl GateError {
    /// Machine-readable code for the rejection body
    pub fn code(&self) -> RejectionCode {
        match self {
            GateError::AuthRequired => RejectionCode::AuthRequired,
            GateError::FeatureRestricted { .. } => RejectionCode::FeatureRestricted,
            GateError::AssetLimitExceeded { .. } => RejectionCode::AssetLimitExceeded,
            GateError::InvalidBody(_) => RejectionCode::InvalidRequestBody,
        }
    }

    /// HTTP status of the rejection
    pub fn status(&self) -> StatusCode {
        match self {
            GateError::AuthRequired => StatusCode::UNAUTHORIZED,
            GateError::FeatureRestricted { .. } | GateError::AssetLimitExceeded { .. } => {
                StatusCode::FORBIDDEN
            }
            GateError::InvalidBody(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Structured body sent to the caller
    pub fn rejection(&self) -> GateRejection {
        let mut body = GateRejection {
            error: self.to_string(),
            code: self.code(),
            feature: None,
            user_plan: None,
            required_plan: None,
            current_limit: None,
            upgrade_url: None,
        };

        match self {
            GateError::FeatureRestricted { feature, user_plan, required_plan, upgrade_url } => {
                body.feature = Some(feature.clone());
                body.user_plan = Some(*user_plan);
                body.required_plan = Some(*required_plan);
                body.upgrade_url = Some(upgrade_url.clone());
            }
            GateError::AssetLimitExceeded { limit, user_plan, upgrade_url } => {
                body.current_limit = Some(*limit);
                body.user_plan = Some(*user_plan);
                body.upgrade_url = Some(upgrade_url.clone());
            }
            GateError::AuthRequired | GateError::InvalidBody(_) => {}
        }

        body
    }
}

impl IntoResponse for GateError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.rejection())).into_response()
    }
}

/// Token issuing/verification failure
#[derive(Error, Debug)]
pub enum AuthError {
    /// Encoding, signature or expiry failure
    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    /// Expiry timestamp does not fit the claim
    #[error("token expiry out of range")]
    InvalidExpiry,
}

/// Configuration loading failure
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid JSON for [`crate::GateConfig`]
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is out of range
    #[error("invalid config: {0}")]
    Invalid(String),
}
