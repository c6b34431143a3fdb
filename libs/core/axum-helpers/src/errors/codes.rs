//! Generic error codes shared by every domain.
//!
//! Domain errors carry their own codes (`CATEGORY_DUPLICATE`, `CART_PRODUCT_NOT_FOUND`, ...)
//! inside a [`Fault`](super::Fault). The codes here cover failures raised before a request
//! reaches a domain service: extraction, authentication, and unclassified server errors.
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! let code = ErrorCode::AuthRequired;
//! assert_eq!(code.as_str(), "AUTH_REQUIRED");
//! assert_eq!(code.default_message(), "Authentication required");
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Request body failed field validation
    ValidationError,

    /// Path or query parameter is not a UUID
    InvalidUuid,

    /// Body is not JSON or does not match the expected shape
    InvalidJson,

    /// No route or resource matched
    NotFound,

    /// No bearer token on a protected route
    AuthRequired,

    /// Token signature, expiry or subject is invalid
    AuthInvalidToken,

    /// Authenticated, but the role is not allowed
    AuthForbidden,

    /// Unclassified server failure
    SystemError,

    ServiceUnavailable,
}

impl ErrorCode {
    /// SCREAMING_SNAKE_CASE identifier sent to clients in the `code` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::InvalidUuid => "INVALID_UUID",
            Self::InvalidJson => "INVALID_JSON",
            Self::NotFound => "NOT_FOUND",
            Self::AuthRequired => "AUTH_REQUIRED",
            Self::AuthInvalidToken => "AUTH_INVALID_TOKEN",
            Self::AuthForbidden => "AUTH_FORBIDDEN",
            Self::SystemError => "SYSTEM_ERROR",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
        }
    }

    pub fn default_message(&self) -> &'static str {
        match self {
            Self::ValidationError => "Validation failed",
            Self::InvalidUuid => "Invalid UUID format",
            Self::InvalidJson => "Invalid JSON body",
            Self::NotFound => "The requested resource was not found",
            Self::AuthRequired => "Authentication required",
            Self::AuthInvalidToken => "Invalid or expired token",
            Self::AuthForbidden => "Insufficient permissions",
            Self::SystemError => "Internal Server Error",
            Self::ServiceUnavailable => "Service is temporarily unavailable",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_str_matches_serde() {
        for code in [
            ErrorCode::ValidationError,
            ErrorCode::InvalidUuid,
            ErrorCode::AuthInvalidToken,
            ErrorCode::SystemError,
        ] {
            let serialized = serde_json::to_value(code).unwrap();
            assert_eq!(serialized, code.as_str());
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(ErrorCode::AuthForbidden.to_string(), "AUTH_FORBIDDEN");
    }

    #[test]
    fn test_auth_messages() {
        assert_eq!(
            ErrorCode::AuthInvalidToken.default_message(),
            "Invalid or expired token"
        );
        assert_eq!(
            ErrorCode::AuthForbidden.default_message(),
            "Insufficient permissions"
        );
    }
}
