//! Authentication middleware
//!
//! Resolves the caller from a bearer JWT and attaches an
//! [`AuthenticatedPrincipal`] to the request. Requests without a valid token
//! pass through untouched; the gates downstream decide what that means.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::entitlements::Plan;
use crate::error::AuthError;
use crate::models::AuthenticatedPrincipal;
use crate::ApiState;

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    /// User id
    pub sub: String,
    /// Login name
    pub username: String,
    /// Subscription plan
    pub plan: Plan,
    /// Assets the user monitored when the token was issued
    pub assets_count: u64,
    /// Expiry (unix seconds)
    pub exp: usize,
}

impl From<Claims> for AuthenticatedPrincipal {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            username: claims.username,
            plan: claims.plan,
            assets_count: claims.assets_count,
        }
    }
}

/// HS256 signing material
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_hours: i64,
}

impl TokenKeys {
    /// Keys for `secret`; issued tokens live `ttl_hours`
    pub fn from_secret(secret: &[u8], ttl_hours: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl_hours,
        }
    }

    /// Issue a token carrying `principal`
    pub fn create_token(&self, principal: &AuthenticatedPrincipal) -> Result<String, AuthError> {
        let expiration = chrono::Utc::now()
            .checked_add_signed(chrono::Duration::hours(self.ttl_hours))
            .ok_or(AuthError::InvalidExpiry)?
            .timestamp();

        let claims = Claims {
            sub: principal.id.clone(),
            username: principal.username.clone(),
            plan: principal.plan,
            assets_count: principal.assets_count,
            exp: usize::try_from(expiration).map_err(|_| AuthError::InvalidExpiry)?,
        };

        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    /// Check signature and expiry, returning the claims
    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        let token_data = decode::<Claims>(token, &self.decoding, &Validation::default())?;
        Ok(token_data.claims)
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Attach the principal named by a valid bearer token, if any
pub async fn attach_principal(
    State(state): State<Arc<ApiState>>,
    mut req: Request,
    next: Next,
) -> Response {
    let verified = bearer_token(req.headers()).map(|token| state.tokens.verify_token(token));

    match verified {
        Some(Ok(claims)) => {
            tracing::debug!(user = %claims.sub, plan = %claims.plan, "Principal attached");
            req.extensions_mut().insert(AuthenticatedPrincipal::from(claims));
        }
        Some(Err(e)) => tracing::debug!(error = %e, "Bearer token rejected"),
        None => {}
    }

    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn principal(plan: Plan) -> AuthenticatedPrincipal {
        AuthenticatedPrincipal {
            id: "user_123".into(),
            username: "analyst".into(),
            plan,
            assets_count: 4,
        }
    }

    #[test]
    fn test_token_round_trip() {
        let keys = TokenKeys::from_secret(b"test-secret", 1);
        let token = keys.create_token(&principal(Plan::Plus)).unwrap();

        let claims = keys.verify_token(&token).unwrap();
        assert_eq!(AuthenticatedPrincipal::from(claims), principal(Plan::Plus));
    }

    #[test]
    fn test_token_wrong_secret() {
        let issuer = TokenKeys::from_secret(b"issuer-secret", 1);
        let verifier = TokenKeys::from_secret(b"other-secret", 1);
        let token = issuer.create_token(&principal(Plan::Pro)).unwrap();

        assert!(matches!(verifier.verify_token(&token), Err(AuthError::Token(_))));
    }

    #[test]
    fn test_bearer_token_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(bearer_token(&headers), Some("abc.def"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcg=="));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), None);
    }
}
