use axum::response::{IntoResponse, Response};
use axum_helpers::{AppError, Fault};
use serde_json::{Value, json};
use thiserror::Error;

/// Unique constraint on the categories store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueConstraint {
    Slug,
    /// (parentId, name)
    ParentName,
}

#[derive(Debug, Error)]
pub enum CategoryError {
    /// Carries `{"fieldErrors": {...}}`
    #[error("Validation failed")]
    InvalidInput(Value),

    #[error("Parent category not found")]
    ParentNotFound,

    #[error("Parent category is not active")]
    ParentInactive,

    #[error("Maximum category level (3) exceeded")]
    MaxLevelExceeded,

    #[error("Category with this name already exists in the same parent")]
    DuplicateName,

    #[error("Slug already exists")]
    DuplicateSlug,

    /// Raised by the store; the service turns it into `DuplicateSlug` or `DuplicateName`
    #[error("Category already exists")]
    DuplicateKey(UniqueConstraint),

    #[error("Database error: {0}")]
    Database(String),
}

pub type CategoryResult<T> = Result<T, CategoryError>;

pub const DUPLICATE_NAME_FIELD_ERROR: &str = "Tên danh mục đã tồn tại trong cùng danh mục cha";
pub const DUPLICATE_SLUG_FIELD_ERROR: &str = "Slug đã tồn tại";

impl CategoryError {
    pub fn code(&self) -> &'static str {
        match self {
            CategoryError::InvalidInput(_) => "CATEGORY_INVALID_INPUT",
            CategoryError::ParentNotFound => "CATEGORY_PARENT_NOT_FOUND",
            CategoryError::ParentInactive => "CATEGORY_PARENT_INACTIVE",
            CategoryError::MaxLevelExceeded => "CATEGORY_MAX_LEVEL_EXCEEDED",
            CategoryError::DuplicateName
            | CategoryError::DuplicateSlug
            | CategoryError::DuplicateKey(_) => "CATEGORY_DUPLICATE",
            CategoryError::Database(_) => "SYSTEM_ERROR",
        }
    }

    /// Single-field `InvalidInput`
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        CategoryError::InvalidInput(json!({ "fieldErrors": { field: [message.into()] } }))
    }
}

fn duplicate_details(field: &str, message: &str) -> Value {
    json!({ "fieldErrors": { field: [message] } })
}

impl From<CategoryError> for AppError {
    fn from(err: CategoryError) -> Self {
        let fault = Fault::new(err.code(), err.to_string());
        match err {
            CategoryError::InvalidInput(details) => {
                AppError::UnprocessableEntity(fault.with_details(details))
            }
            CategoryError::ParentNotFound => AppError::NotFound(fault),
            CategoryError::ParentInactive | CategoryError::MaxLevelExceeded => {
                AppError::UnprocessableEntity(fault)
            }
            CategoryError::DuplicateName
            | CategoryError::DuplicateKey(UniqueConstraint::ParentName) => AppError::Conflict(
                fault.with_details(duplicate_details("name", DUPLICATE_NAME_FIELD_ERROR)),
            ),
            CategoryError::DuplicateSlug | CategoryError::DuplicateKey(UniqueConstraint::Slug) => {
                AppError::Conflict(
                    fault.with_details(duplicate_details("slug", DUPLICATE_SLUG_FIELD_ERROR)),
                )
            }
            CategoryError::Database(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for CategoryError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for CategoryError {
    fn from(err: mongodb::error::Error) -> Self {
        CategoryError::Database(err.to_string())
    }
}
