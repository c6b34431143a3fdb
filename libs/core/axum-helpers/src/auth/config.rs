use core_config::{ConfigError, Environment, FromEnv};

const DEV_SECRET: &str = "dev_secret";
const MIN_PRODUCTION_SECRET_LEN: usize = 32;

/// Secret used to verify HS256 tokens.
///
/// Loaded from `JWT_SECRET`. Outside production a missing secret falls back to
/// `dev_secret` with a warning; in production it is required and must be at
/// least 32 characters.
#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }
}

impl FromEnv for JwtConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let environment = Environment::from_env();

        let secret = match std::env::var("JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ if environment.is_production() => {
                return Err(ConfigError::MissingEnvVar("JWT_SECRET".to_string()));
            }
            _ => {
                tracing::warn!("JWT_SECRET is not set, using the development default");
                DEV_SECRET.to_string()
            }
        };

        if environment.is_production() && secret.len() < MIN_PRODUCTION_SECRET_LEN {
            return Err(ConfigError::ParseError {
                key: "JWT_SECRET".to_string(),
                details: format!(
                    "must be at least {} characters in production (got {}). Generate one with: openssl rand -base64 32",
                    MIN_PRODUCTION_SECRET_LEN,
                    secret.len()
                ),
            });
        }

        Ok(Self { secret })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_env_development_default() {
        temp_env::with_vars_unset(["JWT_SECRET", "APP_ENV"], || {
            let config = JwtConfig::from_env().unwrap();
            assert_eq!(config.secret, "dev_secret");
        });
    }

    #[test]
    fn test_from_env_development_short_secret_allowed() {
        temp_env::with_vars(
            [("JWT_SECRET", Some("short")), ("APP_ENV", None)],
            || {
                assert_eq!(JwtConfig::from_env().unwrap().secret, "short");
            },
        );
    }

    #[test]
    fn test_from_env_production_requires_secret() {
        temp_env::with_vars(
            [("JWT_SECRET", None), ("APP_ENV", Some("production"))],
            || {
                let err = JwtConfig::from_env().unwrap_err();
                assert!(err.to_string().contains("JWT_SECRET"));
            },
        );
    }

    #[test]
    fn test_from_env_production_rejects_short_secret() {
        temp_env::with_vars(
            [("JWT_SECRET", Some("short")), ("APP_ENV", Some("production"))],
            || {
                let err = JwtConfig::from_env().unwrap_err();
                assert!(err.to_string().contains("32 characters"));
            },
        );
    }

    #[test]
    fn test_from_env_production_valid() {
        temp_env::with_vars(
            [
                ("JWT_SECRET", Some("this-is-a-valid-secret-with-32-chars!")),
                ("APP_ENV", Some("production")),
            ],
            || {
                assert!(JwtConfig::from_env().is_ok());
            },
        );
    }
}
