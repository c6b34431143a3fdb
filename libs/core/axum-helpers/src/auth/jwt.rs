use super::config::JwtConfig;
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use strum::{Display, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;

/// Default token lifetime for [`JwtAuth::create_token`] (1 day).
pub const ACCESS_TOKEN_TTL: i64 = 86_400;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

/// Claims carried by an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    /// User id
    pub sub: String,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
}

/// HS256 signer and verifier.
#[derive(Clone)]
pub struct JwtAuth {
    secret: Arc<str>,
}

impl JwtAuth {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            secret: Arc::from(config.secret.as_str()),
        }
    }

    /// Issue a token. Used by tests and tooling; the public API never issues tokens.
    pub fn create_token(
        &self,
        user_id: Uuid,
        role: Role,
        ttl_seconds: i64,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = JwtClaims {
            sub: user_id.to_string(),
            role,
            exp: (now + Duration::seconds(ttl_seconds)).timestamp(),
            iat: now.timestamp(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
    }

    /// Check signature and expiry, then decode.
    pub fn verify_token(&self, token: &str) -> Result<JwtClaims, jsonwebtoken::errors::Error> {
        let token_data = decode::<JwtClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn auth(secret: &str) -> JwtAuth {
        JwtAuth::new(&JwtConfig::new(secret))
    }

    #[test]
    fn test_create_and_verify() {
        let auth = auth("test-secret");
        let user_id = Uuid::now_v7();

        let token = auth.create_token(user_id, Role::Admin, 60).unwrap();
        let claims = auth.verify_token(&token).unwrap();

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.role, Role::Admin);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_verify_rejects_other_secret() {
        let token = auth("one").create_token(Uuid::now_v7(), Role::User, 60).unwrap();
        assert!(auth("two").verify_token(&token).is_err());
    }

    #[test]
    fn test_verify_rejects_expired() {
        let auth = auth("test-secret");
        let token = auth.create_token(Uuid::now_v7(), Role::User, -3600).unwrap();
        assert!(auth.verify_token(&token).is_err());
    }

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_value(Role::Admin).unwrap(), "admin");
        assert_eq!(Role::from_str("user").unwrap(), Role::User);
        assert_eq!(Role::User.to_string(), "user");
    }
}
