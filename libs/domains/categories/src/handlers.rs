//! HTTP handlers for the categories API

use axum::{
    Json, Router,
    extract::{Query, State, rejection::JsonRejection},
    http::StatusCode,
    middleware::from_fn_with_state,
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    AppError, AuthUser, JwtAuth, Role,
    errors::responses::{
        ConflictResponse, ForbiddenResponse, InternalServerErrorResponse, NotFoundResponse,
        UnauthorizedResponse, UnprocessableEntityResponse,
    },
    jwt_auth_middleware, require_role,
};
use serde_json::json;
use std::sync::Arc;
use utoipa::OpenApi;
use uuid::Uuid;

use crate::error::CategoryError;
use crate::models::{Category, CategoryFilter, CategoryQuery, CreateCategory, PublicCategory};
use crate::repository::CategoryRepository;
use crate::service::CategoryService;

/// OpenAPI documentation for the categories API
#[derive(OpenApi)]
#[openapi(
    paths(create_category, list_categories, list_public_categories),
    components(
        schemas(Category, PublicCategory, CreateCategory, CategoryQuery),
        responses(
            NotFoundResponse,
            ConflictResponse,
            UnprocessableEntityResponse,
            UnauthorizedResponse,
            ForbiddenResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Categories", description = "Category hierarchy endpoints")
    )
)]
pub struct ApiDoc;

type SharedService<R> = Arc<CategoryService<R>>;

/// Admin routes (`GET /`, `POST /`) and the unauthenticated `GET /public`.
pub struct CategoryRoutes {
    pub admin: Router,
    pub public: Router,
}

pub fn routes<R: CategoryRepository + 'static>(
    service: CategoryService<R>,
    auth: JwtAuth,
) -> CategoryRoutes {
    let shared_service = Arc::new(service);

    let admin = Router::new()
        .route("/", get(list_categories).post(create_category))
        .route_layer(from_fn_with_state(Role::Admin, require_role))
        .route_layer(from_fn_with_state(auth, jwt_auth_middleware))
        .with_state(shared_service.clone());

    let public = Router::new()
        .route("/public", get(list_public_categories))
        .with_state(shared_service);

    CategoryRoutes { admin, public }
}

fn parse_parent_id(raw: Option<&str>) -> Result<Option<Uuid>, AppError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => Ok(Some(Uuid::parse_str(value)?)),
    }
}

fn parse_is_active(raw: Option<&str>) -> Option<bool> {
    match raw {
        Some("true") => Some(true),
        Some("false") => Some(false),
        _ => None,
    }
}

/// Create a category (admin)
#[utoipa::path(
    post,
    path = "",
    tag = "Categories",
    security(("bearer_auth" = [])),
    request_body = CreateCategory,
    responses(
        (status = 201, description = "Category created", body = Category),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 422, response = UnprocessableEntityResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_category<R: CategoryRepository>(
    State(service): State<SharedService<R>>,
    user: AuthUser,
    payload: Result<Json<CreateCategory>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    // Shape errors (unknown field, wrong type) are 422 like rule violations
    let input = match payload {
        Ok(Json(input)) => input,
        Err(JsonRejection::JsonDataError(e)) => {
            let details = json!({ "fieldErrors": { "body": [e.body_text()] } });
            return Err(CategoryError::InvalidInput(details).into());
        }
        Err(rejection) => return Err(rejection.into()),
    };

    let category = service.create_category(user.user_id, input).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// List categories (admin). Absent `parentId` lists roots.
#[utoipa::path(
    get,
    path = "",
    tag = "Categories",
    security(("bearer_auth" = [])),
    params(CategoryQuery),
    responses(
        (status = 200, description = "Categories", body = Vec<Category>),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_categories<R: CategoryRepository>(
    State(service): State<SharedService<R>>,
    Query(query): Query<CategoryQuery>,
) -> Result<Json<Vec<Category>>, AppError> {
    let filter = CategoryFilter {
        is_active: parse_is_active(query.is_active.as_deref()),
        parent_id: parse_parent_id(query.parent_id.as_deref())?,
    };
    let categories = service.list_categories(filter).await?;
    Ok(Json(categories))
}

/// Active categories, no authentication
#[utoipa::path(
    get,
    path = "/public",
    tag = "Categories",
    params(
        ("parentId" = Option<String>, Query, description = "Parent category ID; omit for roots")
    ),
    responses(
        (status = 200, description = "Active categories", body = Vec<PublicCategory>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_public_categories<R: CategoryRepository>(
    State(service): State<SharedService<R>>,
    Query(query): Query<CategoryQuery>,
) -> Result<Json<Vec<PublicCategory>>, AppError> {
    let parent_id = parse_parent_id(query.parent_id.as_deref())?;
    let categories = service.list_public_categories(parent_id).await?;
    Ok(Json(categories))
}
