//! Bearer-token authentication and role-based authorization.
//!
//! Tokens are HS256 JWTs issued elsewhere; this service only verifies them.
//!
//! ```ignore
//! use axum::middleware::from_fn_with_state;
//! use axum_helpers::auth::{JwtAuth, JwtConfig, Role, jwt_auth_middleware, require_role};
//! use core_config::FromEnv;
//!
//! let auth = JwtAuth::new(&JwtConfig::from_env()?);
//!
//! let admin = Router::new()
//!     .route("/categories", post(create_category))
//!     .route_layer(from_fn_with_state(Role::Admin, require_role))
//!     .route_layer(from_fn_with_state(auth, jwt_auth_middleware));
//! ```

pub mod config;
pub mod jwt;
pub mod middleware;

pub use config::JwtConfig;
pub use jwt::{ACCESS_TOKEN_TTL, JwtAuth, JwtClaims, Role};
pub use middleware::{AuthUser, jwt_auth_middleware, require_role};
