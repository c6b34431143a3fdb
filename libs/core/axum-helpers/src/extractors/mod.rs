//! Custom extractors for Axum handlers.
//!
//! Every rejection renders as an [`ErrorResponse`](crate::errors::ErrorResponse).

pub mod json_body;
pub mod uuid_path;
pub mod validated_json;

pub use json_body::JsonBody;
pub use uuid_path::UuidPath;
pub use validated_json::ValidatedJson;
