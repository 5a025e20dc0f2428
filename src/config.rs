//! Gate Configuration

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Environment variable naming the config file
pub const CONFIG_PATH_ENV: &str = "SOC_GATE_CONFIG";
/// Environment variable overriding the JWT secret
pub const JWT_SECRET_ENV: &str = "SOC_GATE_JWT_SECRET";

const DEFAULT_CONFIG_PATH: &str = "/etc/soc-gate/config.json";
const MAX_TOKEN_TTL_HOURS: i64 = 24 * 365;

/// Service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Listen address
    pub listen_addr: String,
    /// HS256 secret for principal tokens
    pub jwt_secret: String,
    /// Lifetime of issued tokens
    pub token_ttl_hours: i64,
    /// Where denied callers are sent to upgrade
    pub upgrade_url: String,
    /// Largest request body the asset gate will buffer
    pub max_body_bytes: usize,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".into(),
            jwt_secret: "soc-gate-dev-secret-change-in-production".into(),
            token_ttl_hours: 8,
            upgrade_url: "/pricing".into(),
            max_body_bytes: 64 * 1024,
        }
    }
}

impl GateConfig {
    /// Load from file
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Load from `SOC_GATE_CONFIG`, with `SOC_GATE_JWT_SECRET` overriding the secret
    pub fn from_env() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into());
        Self::from_parts(&path, std::env::var(JWT_SECRET_ENV).ok())
    }

    /// Load `path`, falling back to defaults when the file is missing, then
    /// apply `secret_override` and validate
    pub fn from_parts(path: &str, secret_override: Option<String>) -> Result<Self, ConfigError> {
        let mut config = match Self::load(path) {
            Ok(config) => config,
            Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path = %path, "Config not found, using defaults");
                Self::default()
            }
            Err(e) => return Err(e),
        };

        if let Some(secret) = secret_override {
            config.jwt_secret = secret;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject values the service cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.is_empty() {
            return Err(ConfigError::Invalid("jwt_secret must not be empty".into()));
        }
        if !(1..=MAX_TOKEN_TTL_HOURS).contains(&self.token_ttl_hours) {
            return Err(ConfigError::Invalid(format!(
                "token_ttl_hours must be between 1 and {MAX_TOKEN_TTL_HOURS}"
            )));
        }
        if self.max_body_bytes == 0 {
            return Err(ConfigError::Invalid("max_body_bytes must be positive".into()));
        }
        Ok(())
    }
}
