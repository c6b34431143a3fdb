//! HTTP handlers for the cart API

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    middleware::from_fn_with_state,
    routing::{get, post, put},
};
use axum_helpers::{
    AppError, AuthUser, JwtAuth, Role, UuidPath,
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, ForbiddenResponse,
        InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
    },
    jwt_auth_middleware, require_role,
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::{CartError, PRODUCT_ID_REQUIRED};
use crate::models::{AddItem, CartLine, CartProduct, CartView, UpdateItem};
use crate::repository::CartRepository;
use crate::service::CartService;

/// OpenAPI documentation for the cart API
#[derive(OpenApi)]
#[openapi(
    paths(get_cart, clear_cart, add_item, update_item, remove_item),
    components(
        schemas(CartView, CartLine, CartProduct, AddItem, UpdateItem),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            UnauthorizedResponse,
            ForbiddenResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Cart", description = "Shopping cart of the authenticated user")
    )
)]
pub struct ApiDoc;

type SharedService<R> = Arc<CartService<R>>;

/// Cart routes. Every route requires a `user` token.
pub fn router<R: CartRepository + 'static>(service: CartService<R>, auth: JwtAuth) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(get_cart).delete(clear_cart))
        .route("/items", post(add_item))
        .route("/items/{productId}", put(update_item).delete(remove_item))
        .route_layer(from_fn_with_state(Role::User, require_role))
        .route_layer(from_fn_with_state(auth, jwt_auth_middleware))
        .with_state(shared_service)
}

/// Unwrap a JSON body; type errors are cart validation errors
fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    match payload {
        Ok(Json(value)) => Ok(value),
        Err(JsonRejection::JsonDataError(e)) => Err(CartError::Validation(e.body_text()).into()),
        Err(rejection) => Err(rejection.into()),
    }
}

/// The caller's cart with live product data
#[utoipa::path(
    get,
    path = "",
    tag = "Cart",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Cart", body = CartView),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_cart<R: CartRepository>(
    State(service): State<SharedService<R>>,
    user: AuthUser,
) -> Result<Json<CartView>, AppError> {
    let cart = service.get_cart(user.user_id).await?;
    Ok(Json(cart))
}

#[utoipa::path(
    delete,
    path = "",
    tag = "Cart",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Empty cart", body = CartView),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn clear_cart<R: CartRepository>(
    State(service): State<SharedService<R>>,
    user: AuthUser,
) -> Result<Json<CartView>, AppError> {
    let cart = service.clear_cart(user.user_id).await?;
    Ok(Json(cart))
}

/// Add a product; quantity defaults to 1
#[utoipa::path(
    post,
    path = "/items",
    tag = "Cart",
    security(("bearer_auth" = [])),
    request_body = AddItem,
    responses(
        (status = 200, description = "Updated cart", body = CartView),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn add_item<R: CartRepository>(
    State(service): State<SharedService<R>>,
    user: AuthUser,
    payload: Result<Json<AddItem>, JsonRejection>,
) -> Result<Json<CartView>, AppError> {
    let input = body(payload)?;
    let product_id = input
        .product_id
        .ok_or_else(|| CartError::Validation(PRODUCT_ID_REQUIRED.to_string()))?;

    let cart = service
        .add_item(user.user_id, product_id, input.quantity.unwrap_or(1))
        .await?;
    Ok(Json(cart))
}

#[utoipa::path(
    put,
    path = "/items/{productId}",
    tag = "Cart",
    security(("bearer_auth" = [])),
    params(
        ("productId" = String, Path, description = "Product ID")
    ),
    request_body = UpdateItem,
    responses(
        (status = 200, description = "Updated cart", body = CartView),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_item<R: CartRepository>(
    State(service): State<SharedService<R>>,
    user: AuthUser,
    UuidPath(product_id): UuidPath,
    payload: Result<Json<UpdateItem>, JsonRejection>,
) -> Result<Json<CartView>, AppError> {
    let input = body(payload)?;
    // A missing quantity fails the minimum check
    let quantity = input.quantity.unwrap_or(0);

    let cart = service
        .update_item(user.user_id, product_id, quantity)
        .await?;
    Ok(Json(cart))
}

#[utoipa::path(
    delete,
    path = "/items/{productId}",
    tag = "Cart",
    security(("bearer_auth" = [])),
    params(
        ("productId" = String, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Updated cart", body = CartView),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn remove_item<R: CartRepository>(
    State(service): State<SharedService<R>>,
    user: AuthUser,
    UuidPath(product_id): UuidPath,
) -> Result<Json<CartView>, AppError> {
    let cart = service.remove_item(user.user_id, product_id).await?;
    Ok(Json(cart))
}
