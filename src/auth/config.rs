//! Authentication configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_TOKEN_TTL_SECS: i64 = 3600 * 24;

/// Authentication configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// JWT secret for HS256. Supports `env:VAR_NAME` indirection.
    /// REQUIRED: there is no default secret.
    pub jwt_secret: Option<String>,

    /// Lifetime of issued tokens in seconds.
    pub token_ttl_secs: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
        }
    }
}

impl AuthConfig {
    /// Resolve the JWT secret, expanding `env:VAR_NAME` syntax.
    pub fn resolve_jwt_secret(&self) -> Result<Option<String>, ConfigValidationError> {
        match &self.jwt_secret {
            None => Ok(None),
            Some(value) => {
                if let Some(var_name) = value.strip_prefix("env:") {
                    match std::env::var(var_name) {
                        Ok(secret) if !secret.is_empty() => Ok(Some(secret)),
                        Ok(_) => Err(ConfigValidationError::EnvVarEmpty(var_name.to_string())),
                        Err(_) => Err(ConfigValidationError::EnvVarNotFound(var_name.to_string())),
                    }
                } else {
                    Ok(Some(value.clone()))
                }
            }
        }
    }

    /// Validate the configuration and return the resolved secret.
    pub fn validated_secret(&self) -> Result<String, ConfigValidationError> {
        let secret = self
            .resolve_jwt_secret()?
            .ok_or(ConfigValidationError::MissingJwtSecret)?;

        if secret == "dev-secret-change-in-production" {
            return Err(ConfigValidationError::InsecureJwtSecret);
        }
        if secret.len() < 32 {
            return Err(ConfigValidationError::JwtSecretTooShort);
        }

        Ok(secret)
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigValidationError {
    /// JWT secret is required.
    #[error(
        "JWT secret is required. Set USERGATE_AUTH__JWT_SECRET or auth.jwt_secret in the config file."
    )]
    MissingJwtSecret,

    /// JWT secret is a known insecure default value.
    #[error("JWT secret cannot be the default insecure value. Configure a real secret.")]
    InsecureJwtSecret,

    /// JWT secret is too short (minimum 32 characters).
    #[error("JWT secret must be at least 32 characters long.")]
    JwtSecretTooShort,

    /// Environment variable not found (for `env:VAR_NAME` syntax).
    #[error("environment variable '{0}' not found (referenced via env:{0} in config)")]
    EnvVarNotFound(String),

    /// Environment variable is empty (for `env:VAR_NAME` syntax).
    #[error("environment variable '{0}' is empty (referenced via env:{0} in config)")]
    EnvVarEmpty(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_config_default() {
        let config = AuthConfig::default();
        assert!(config.jwt_secret.is_none());
        assert_eq!(config.token_ttl_secs, 3600 * 24);
    }

    #[test]
    fn test_validated_secret_missing() {
        let config = AuthConfig::default();
        assert_eq!(
            config.validated_secret().unwrap_err(),
            ConfigValidationError::MissingJwtSecret
        );
    }

    #[test]
    fn test_validated_secret_insecure() {
        let config = AuthConfig {
            jwt_secret: Some("dev-secret-change-in-production".to_string()),
            ..AuthConfig::default()
        };
        assert_eq!(
            config.validated_secret().unwrap_err(),
            ConfigValidationError::InsecureJwtSecret
        );
    }

    #[test]
    fn test_validated_secret_too_short() {
        let config = AuthConfig {
            jwt_secret: Some("tooshort".to_string()),
            ..AuthConfig::default()
        };
        assert_eq!(
            config.validated_secret().unwrap_err(),
            ConfigValidationError::JwtSecretTooShort
        );
    }

    #[test]
    fn test_validated_secret_ok() {
        let config = AuthConfig {
            jwt_secret: Some("a-very-long-and-secure-jwt-secret-over-32-chars".to_string()),
            ..AuthConfig::default()
        };
        assert!(config.validated_secret().is_ok());
    }

    #[test]
    fn test_resolve_jwt_secret_literal() {
        let config = AuthConfig {
            jwt_secret: Some("my-literal-secret".to_string()),
            ..AuthConfig::default()
        };
        assert_eq!(
            config.resolve_jwt_secret().unwrap(),
            Some("my-literal-secret".to_string())
        );
    }

    #[test]
    fn test_resolve_jwt_secret_env_var() {
        // SAFETY: test-only environment variable with a unique name
        unsafe {
            std::env::set_var(
                "USERGATE_TEST_JWT_SECRET_1",
                "secret-from-env-var-at-least-32-chars",
            );
        }

        let config = AuthConfig {
            jwt_secret: Some("env:USERGATE_TEST_JWT_SECRET_1".to_string()),
            ..AuthConfig::default()
        };
        assert_eq!(
            config.resolve_jwt_secret().unwrap(),
            Some("secret-from-env-var-at-least-32-chars".to_string())
        );

        // SAFETY: cleaning up test environment variable
        unsafe {
            std::env::remove_var("USERGATE_TEST_JWT_SECRET_1");
        }
    }

    #[test]
    fn test_resolve_jwt_secret_env_var_not_found() {
        let config = AuthConfig {
            jwt_secret: Some("env:USERGATE_NONEXISTENT_VAR_1".to_string()),
            ..AuthConfig::default()
        };
        assert_eq!(
            config.resolve_jwt_secret().unwrap_err(),
            ConfigValidationError::EnvVarNotFound("USERGATE_NONEXISTENT_VAR_1".to_string())
        );
    }
}
