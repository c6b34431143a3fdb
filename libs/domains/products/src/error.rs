use axum::response::{IntoResponse, Response};
use axum_helpers::{AppError, Fault};
use domain_categories::CategoryError;
use domain_users::UserError;
use serde_json::{Value, json};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("User not found")]
    UserNotFound,

    #[error("User account is locked")]
    UserLocked,

    #[error("Profile incomplete. Please complete your profile before selling.")]
    ProfileIncomplete {
        reason: Option<String>,
        missing_fields: Vec<String>,
    },

    /// Carries `{"fieldErrors": {...}}`
    #[error("Validation failed")]
    Validation(Value),

    #[error("Page and limit must be positive numbers")]
    InvalidPagination,

    #[error("Category not found")]
    CategoryNotFound,

    #[error("Product not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),
}

pub type ProductResult<T> = Result<T, ProductError>;

impl ProductError {
    pub fn code(&self) -> &'static str {
        match self {
            ProductError::UserNotFound => "PRODUCT_USER_NOT_FOUND",
            ProductError::UserLocked => "PRODUCT_USER_LOCKED",
            ProductError::ProfileIncomplete { .. } => "PROFILE_INCOMPLETE",
            ProductError::Validation(_) | ProductError::InvalidPagination => {
                "PRODUCT_VALIDATION_ERROR"
            }
            ProductError::CategoryNotFound => "PRODUCT_CATEGORY_NOT_FOUND",
            ProductError::NotFound => "PRODUCT_NOT_FOUND",
            ProductError::Database(_) => "SYSTEM_ERROR",
        }
    }
}

impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        let fault = Fault::new(err.code(), err.to_string());
        match err {
            ProductError::UserNotFound | ProductError::CategoryNotFound | ProductError::NotFound => {
                AppError::NotFound(fault)
            }
            ProductError::UserLocked => AppError::Forbidden(fault),
            ProductError::ProfileIncomplete {
                reason,
                missing_fields,
            } => AppError::BadRequest(fault.with_details(json!({
                "reason": reason,
                "missingFields": missing_fields,
            }))),
            ProductError::Validation(details) => AppError::BadRequest(fault.with_details(details)),
            ProductError::InvalidPagination => AppError::BadRequest(fault),
            ProductError::Database(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for ProductError {
    fn from(err: mongodb::error::Error) -> Self {
        ProductError::Database(err.to_string())
    }
}

// Collaborator lookups only fail on storage errors
impl From<UserError> for ProductError {
    fn from(err: UserError) -> Self {
        ProductError::Database(err.to_string())
    }
}

impl From<CategoryError> for ProductError {
    fn from(err: CategoryError) -> Self {
        ProductError::Database(err.to_string())
    }
}
