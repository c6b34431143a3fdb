//! JSON extractor with automatic validation using the validator crate.

use crate::errors::AppError;
use axum::{
    extract::{FromRequest, Json, Request},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use validator::Validate;

/// JSON body that has passed `Validate`.
///
/// Malformed JSON becomes `INVALID_JSON`; rule violations become 400
/// `VALIDATION_ERROR` with `details.fieldErrors`.
///
/// ```ignore
/// use axum::{Router, routing::post};
/// use axum_helpers::extractors::ValidatedJson;
/// use serde::Deserialize;
/// use validator::Validate;
///
/// #[derive(Deserialize, Validate)]
/// struct AddItem {
///     #[validate(range(min = 1, message = "Quantity must be at least 1"))]
///     quantity: i64,
/// }
///
/// async fn add_item(ValidatedJson(payload): ValidatedJson<AddItem>) -> String {
///     format!("Adding {}", payload.quantity)
/// }
///
/// let app = Router::new().route("/cart/items", post(add_item));
/// ```
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::from(e).into_response())?;

        data.validate()
            .map_err(|e| AppError::from(e).into_response())?;

        Ok(ValidatedJson(data))
    }
}
