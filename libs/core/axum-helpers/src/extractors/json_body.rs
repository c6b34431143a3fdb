//! JSON extractor whose rejection uses the shared error body.

use crate::errors::AppError;
use axum::{
    extract::{FromRequest, Json, Request},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;

/// `axum::Json` with rejections rendered as `INVALID_JSON` instead of plain text.
///
/// For payloads whose rules live in the service, e.g. profile updates that
/// report `PROFILE_VALIDATION_ERROR`.
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        Json::<T>::from_request(req, state)
            .await
            .map(|Json(data)| JsonBody(data))
            .map_err(|e| AppError::from(e).into_response())
    }
}
