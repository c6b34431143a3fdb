use super::jwt::{JwtAuth, Role};
use crate::errors::{AppError, ErrorCode, Fault};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

/// Identity of the caller, placed in request extensions by [`jwt_auth_middleware`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub role: Role,
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .copied()
            .ok_or_else(|| AppError::Unauthorized(Fault::from_code(ErrorCode::AuthRequired)))
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Verify the `Authorization: Bearer <jwt>` header and insert an [`AuthUser`].
///
/// Missing header: 401 `AUTH_REQUIRED`. Bad signature, expiry or a non-UUID
/// subject: 401 `AUTH_INVALID_TOKEN`.
pub async fn jwt_auth_middleware(
    State(auth): State<JwtAuth>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(token) = bearer_token(&headers) else {
        tracing::debug!("No bearer token in Authorization header");
        return Err(AppError::Unauthorized(Fault::from_code(ErrorCode::AuthRequired)));
    };

    let invalid = || AppError::Unauthorized(Fault::from_code(ErrorCode::AuthInvalidToken));

    let claims = auth.verify_token(token).map_err(|e| {
        tracing::debug!("JWT verification failed: {}", e);
        invalid()
    })?;

    let user_id = Uuid::parse_str(&claims.sub).map_err(|_| {
        tracing::debug!(sub = %claims.sub, "JWT subject is not a UUID");
        invalid()
    })?;

    request.extensions_mut().insert(AuthUser {
        user_id,
        role: claims.role,
    });

    Ok(next.run(request).await)
}

/// Allow only callers whose role equals the state value. Layer it inside
/// [`jwt_auth_middleware`] so an [`AuthUser`] is already present.
pub async fn require_role(
    State(required): State<Role>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = request
        .extensions()
        .get::<AuthUser>()
        .copied()
        .ok_or_else(|| AppError::Unauthorized(Fault::from_code(ErrorCode::AuthRequired)))?;

    if user.role != required {
        tracing::info!(user_id = %user.user_id, role = %user.role, required = %required, "Role check failed");
        return Err(AppError::Forbidden(Fault::from_code(ErrorCode::AuthForbidden)));
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::JwtConfig;
    use axum::{
        Router, body::Body, http::StatusCode, middleware::from_fn_with_state, routing::get,
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn app(auth: JwtAuth) -> Router {
        Router::new()
            .route(
                "/admin",
                get(|user: AuthUser| async move { user.user_id.to_string() })
                    .route_layer(from_fn_with_state(Role::Admin, require_role)),
            )
            .route("/me", get(|user: AuthUser| async move { user.role.to_string() }))
            .route_layer(from_fn_with_state(auth, jwt_auth_middleware))
    }

    async fn call(app: Router, uri: &str, token: Option<&str>) -> (StatusCode, String) {
        let mut builder = axum::http::Request::builder().uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let response = app.oneshot(builder.body(Body::empty()).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_missing_token() {
        let auth = JwtAuth::new(&JwtConfig::new("secret"));
        let (status, body) = call(app(auth), "/me", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("AUTH_REQUIRED"));
    }

    #[tokio::test]
    async fn test_invalid_token() {
        let auth = JwtAuth::new(&JwtConfig::new("secret"));
        let (status, body) = call(app(auth), "/me", Some("not-a-jwt")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("AUTH_INVALID_TOKEN"));
        assert!(body.contains("Invalid or expired token"));
    }

    #[tokio::test]
    async fn test_valid_token_sets_auth_user() {
        let auth = JwtAuth::new(&JwtConfig::new("secret"));
        let token = auth.create_token(Uuid::now_v7(), Role::User, 60).unwrap();
        let (status, body) = call(app(auth), "/me", Some(&token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "user");
    }

    #[tokio::test]
    async fn test_wrong_role_is_forbidden() {
        let auth = JwtAuth::new(&JwtConfig::new("secret"));
        let token = auth.create_token(Uuid::now_v7(), Role::User, 60).unwrap();
        let (status, body) = call(app(auth), "/admin", Some(&token)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert!(body.contains("AUTH_FORBIDDEN"));
    }

    #[tokio::test]
    async fn test_admin_role_passes() {
        let auth = JwtAuth::new(&JwtConfig::new("secret"));
        let user_id = Uuid::now_v7();
        let token = auth.create_token(user_id, Role::Admin, 60).unwrap();
        let (status, body) = call(app(auth), "/admin", Some(&token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, user_id.to_string());
    }
}
