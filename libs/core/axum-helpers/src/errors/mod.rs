pub mod codes;
pub mod handlers;
pub mod responses;

pub use codes::ErrorCode;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Error as UuidError;
use validator::ValidationErrors;

/// Body of every error response.
///
/// ```json
/// {
///   "code": "CATEGORY_DUPLICATE",
///   "message": "Slug already exists",
///   "details": { "fieldErrors": { "slug": ["Slug already exists"] } }
/// }
/// ```
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Machine-readable identifier, e.g. `CART_INSUFFICIENT_QUANTITY`
    pub code: String,
    pub message: String,
    /// Structured context such as `fieldErrors` or `missingFields`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

/// A classified failure: a stable code, a client-facing message and optional details.
///
/// Domain error enums build one of these per variant and wrap it in the
/// [`AppError`] variant that carries the right status.
#[derive(Debug, Clone, PartialEq)]
pub struct Fault {
    pub code: &'static str,
    pub message: String,
    pub details: Option<Value>,
}

impl Fault {
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn from_code(code: ErrorCode) -> Self {
        Self::new(code.as_str(), code.default_message())
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Attach `{"fieldErrors": {field: [message]}}` using this fault's message.
    pub fn with_field_error(self, field: &str) -> Self {
        let details = json!({ "fieldErrors": { field: [self.message.clone()] } });
        self.with_details(details)
    }
}

impl std::fmt::Display for Fault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// `sort_order` -> `sortOrder`, matching the camelCase request bodies.
fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Flatten validator output into `{"fieldErrors": {field: [message, ...]}}`.
///
/// Field names are camelCased. Rules without a custom message fall back to
/// their rule code (`length`, `range`, ...).
pub fn field_errors(errors: &ValidationErrors) -> Value {
    let fields: Map<String, Value> = errors
        .field_errors()
        .iter()
        .map(|(field, errs)| {
            let messages: Vec<Value> = errs
                .iter()
                .map(|err| {
                    Value::String(
                        err.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| err.code.to_string()),
                    )
                })
                .collect();
            (camel_case(field), Value::Array(messages))
        })
        .collect();

    json!({ "fieldErrors": fields })
}

/// Application error type that renders as an [`ErrorResponse`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),

    #[error("UUID error: {0}")]
    UuidError(#[from] UuidError),

    #[error("Bad Request: {0}")]
    BadRequest(Fault),

    #[error("Unauthorized: {0}")]
    Unauthorized(Fault),

    #[error("Forbidden: {0}")]
    Forbidden(Fault),

    #[error("Not Found: {0}")]
    NotFound(Fault),

    #[error("Conflict: {0}")]
    Conflict(Fault),

    #[error("Unprocessable Entity: {0}")]
    UnprocessableEntity(Fault),

    /// The detail is logged and never sent to the client.
    #[error("Internal Server Error: {0}")]
    InternalServerError(String),

    #[error("Service Unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::JsonExtractorRejection(e) => e.status(),
            AppError::ValidationError(_) | AppError::UuidError(_) | AppError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let fault = match self {
            AppError::JsonExtractorRejection(e) => {
                tracing::warn!(error_code = ErrorCode::InvalidJson.as_str(), "JSON extraction error: {:?}", e);
                Fault::new(ErrorCode::InvalidJson.as_str(), e.body_text())
            }
            AppError::ValidationError(e) => {
                tracing::info!(error_code = ErrorCode::ValidationError.as_str(), "Validation error: {:?}", e);
                Fault::from_code(ErrorCode::ValidationError).with_details(field_errors(&e))
            }
            AppError::UuidError(e) => {
                tracing::warn!(error_code = ErrorCode::InvalidUuid.as_str(), "UUID error: {:?}", e);
                Fault::from_code(ErrorCode::InvalidUuid)
            }
            AppError::BadRequest(fault)
            | AppError::NotFound(fault)
            | AppError::Conflict(fault)
            | AppError::UnprocessableEntity(fault) => {
                tracing::info!(error_code = fault.code, status = status.as_u16(), "{}", fault.message);
                fault
            }
            AppError::Unauthorized(fault) | AppError::Forbidden(fault) => {
                tracing::warn!(error_code = fault.code, status = status.as_u16(), "{}", fault.message);
                fault
            }
            AppError::InternalServerError(detail) => {
                tracing::error!(error_code = ErrorCode::SystemError.as_str(), "Internal server error: {}", detail);
                Fault::from_code(ErrorCode::SystemError)
            }
            AppError::ServiceUnavailable(detail) => {
                tracing::warn!(error_code = ErrorCode::ServiceUnavailable.as_str(), "Service unavailable: {}", detail);
                Fault::from_code(ErrorCode::ServiceUnavailable)
            }
        };

        let body = Json(ErrorResponse {
            code: fault.code.to_string(),
            message: fault.message,
            details: fault.details,
        });

        (status, body).into_response()
    }
}
