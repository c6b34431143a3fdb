use axum::response::{IntoResponse, Response};
use axum_helpers::{AppError, Fault};
use domain_products::ProductError;
use domain_users::UserError;
use thiserror::Error;

pub const QUANTITY_TOO_LOW: &str = "Quantity must be at least 1";
pub const PRODUCT_ID_REQUIRED: &str = "Product ID is required";

#[derive(Debug, Error)]
pub enum CartError {
    #[error("User not found")]
    UserNotFound,

    #[error("Product not found")]
    ProductNotFound,

    #[error("Product is not available")]
    ProductUnavailable,

    #[error("{0}")]
    Validation(String),

    #[error("Insufficient product quantity")]
    InsufficientQuantity,

    #[error("Cart not found")]
    CartNotFound,

    #[error("Item not found in cart")]
    ItemNotFound,

    #[error("Database error: {0}")]
    Database(String),
}

pub type CartResult<T> = Result<T, CartError>;

impl CartError {
    pub fn code(&self) -> &'static str {
        match self {
            CartError::UserNotFound => "CART_USER_NOT_FOUND",
            CartError::ProductNotFound => "CART_PRODUCT_NOT_FOUND",
            CartError::ProductUnavailable => "CART_PRODUCT_UNAVAILABLE",
            CartError::InsufficientQuantity => "CART_INSUFFICIENT_QUANTITY",
            CartError::Validation(_) | CartError::CartNotFound | CartError::ItemNotFound => {
                "CART_VALIDATION_ERROR"
            }
            CartError::Database(_) => "SYSTEM_ERROR",
        }
    }
}

impl From<CartError> for AppError {
    fn from(err: CartError) -> Self {
        let fault = Fault::new(err.code(), err.to_string());
        match err {
            CartError::UserNotFound
            | CartError::ProductNotFound
            | CartError::CartNotFound
            | CartError::ItemNotFound => AppError::NotFound(fault),
            CartError::ProductUnavailable
            | CartError::Validation(_)
            | CartError::InsufficientQuantity => AppError::BadRequest(fault),
            CartError::Database(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for CartError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for CartError {
    fn from(err: mongodb::error::Error) -> Self {
        CartError::Database(err.to_string())
    }
}

impl From<UserError> for CartError {
    fn from(err: UserError) -> Self {
        CartError::Database(err.to_string())
    }
}

impl From<ProductError> for CartError {
    fn from(err: ProductError) -> Self {
        CartError::Database(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_codes_and_statuses() {
        let cases = [
            (CartError::UserNotFound, "CART_USER_NOT_FOUND", StatusCode::NOT_FOUND),
            (CartError::ProductNotFound, "CART_PRODUCT_NOT_FOUND", StatusCode::NOT_FOUND),
            (
                CartError::ProductUnavailable,
                "CART_PRODUCT_UNAVAILABLE",
                StatusCode::BAD_REQUEST,
            ),
            (
                CartError::Validation(QUANTITY_TOO_LOW.to_string()),
                "CART_VALIDATION_ERROR",
                StatusCode::BAD_REQUEST,
            ),
            (
                CartError::InsufficientQuantity,
                "CART_INSUFFICIENT_QUANTITY",
                StatusCode::BAD_REQUEST,
            ),
            (CartError::CartNotFound, "CART_VALIDATION_ERROR", StatusCode::NOT_FOUND),
            (CartError::ItemNotFound, "CART_VALIDATION_ERROR", StatusCode::NOT_FOUND),
            (
                CartError::Database("down".to_string()),
                "SYSTEM_ERROR",
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, code, status) in cases {
            assert_eq!(err.code(), code);
            assert_eq!(AppError::from(err).status(), status);
        }
    }

    #[test]
    fn test_validation_message_is_passed_through() {
        assert_eq!(
            CartError::Validation(QUANTITY_TOO_LOW.to_string()).to_string(),
            "Quantity must be at least 1"
        );
    }
}
