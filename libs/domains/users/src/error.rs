use axum::response::{IntoResponse, Response};
use axum_helpers::{AppError, Fault};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found")]
    UserNotFound,

    #[error("{0}")]
    Validation(String),

    #[error("Shipping address not found")]
    ShippingAddressNotFound,

    #[error("Database error: {0}")]
    Database(String),
}

pub type UserResult<T> = Result<T, UserError>;

impl UserError {
    pub fn code(&self) -> &'static str {
        match self {
            UserError::UserNotFound => "PROFILE_USER_NOT_FOUND",
            UserError::Validation(_) => "PROFILE_VALIDATION_ERROR",
            UserError::ShippingAddressNotFound => "SHIPPING_ADDRESS_NOT_FOUND",
            UserError::Database(_) => "SYSTEM_ERROR",
        }
    }
}

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        let fault = Fault::new(err.code(), err.to_string());
        match err {
            UserError::UserNotFound | UserError::ShippingAddressNotFound => AppError::NotFound(fault),
            UserError::Validation(_) => AppError::BadRequest(fault),
            UserError::Database(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for UserError {
    fn from(err: mongodb::error::Error) -> Self {
        UserError::Database(err.to_string())
    }
}
