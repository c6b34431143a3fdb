//! # Axum Helpers
//!
//! Shared building blocks for the marketplace HTTP layer.
//!
//! - **[`auth`]**: JWT verification, [`AuthUser`] and role guards
//! - **[`server`]**: router assembly with OpenAPI UIs, health checks, graceful shutdown
//! - **[`http`]**: CORS and security headers
//! - **[`errors`]**: `{code, message, details}` error responses
//! - **[`extractors`]**: UUID path and validated JSON extractors
//!
//! ```ignore
//! use axum_helpers::server::{create_production_app, create_router, health_router};
//!
//! let router = create_router::<ApiDoc>(api_routes).await?;
//! let app = router.merge(health_router(app_info!()));
//! create_production_app(app, &config.server, Duration::from_secs(30), async {}).await?;
//! ```

pub mod auth;
pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;

pub use auth::{
    AuthUser, JwtAuth, JwtClaims, JwtConfig, Role, jwt_auth_middleware, require_role,
};

pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, create_production_app, create_router,
    health_router, run_health_checks, shutdown_signal,
};

pub use http::{cors_layer_from_env, create_cors_layer, security_headers};

pub use errors::{AppError, ErrorCode, ErrorResponse, Fault, field_errors};

pub use extractors::{JsonBody, UuidPath, ValidatedJson};
