//! HTTP handlers for the products API

use axum::{
    Json, Router,
    extract::{Query, State, rejection::JsonRejection},
    http::StatusCode,
    middleware::from_fn_with_state,
    response::IntoResponse,
    routing::{get, post},
};
use axum_helpers::{
    AppError, AuthUser, JwtAuth, Role, UuidPath,
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, ForbiddenResponse,
        InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
    },
    jwt_auth_middleware, require_role,
};
use serde_json::json;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::ProductError;
use crate::models::{
    CreateProduct, Gender, MyProducts, PageQuery, Pagination, Product, ProductCondition,
    ProductPage, ProductStatus, ProductView,
};
use crate::repository::ProductRepository;
use crate::service::ProductService;

/// OpenAPI documentation for the products API
#[derive(OpenApi)]
#[openapi(
    paths(
        create_product,
        get_my_products,
        list_products,
        get_products_by_category,
        get_product,
    ),
    components(
        schemas(
            Product, ProductView, CreateProduct, ProductCondition, ProductStatus, Gender,
            ProductPage, Pagination, MyProducts
        ),
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
        (name = "Products", description = "Product listings")
    )
)]
pub struct ApiDoc;

type SharedService<R> = Arc<ProductService<R>>;

/// Seller routes need a `user` token; the catalogue routes are public.
pub fn router<R: ProductRepository + 'static>(service: ProductService<R>, auth: JwtAuth) -> Router {
    let shared_service = Arc::new(service);

    let seller = Router::new()
        .route("/", post(create_product))
        .route("/my-products", get(get_my_products))
        .route_layer(from_fn_with_state(Role::User, require_role))
        .route_layer(from_fn_with_state(auth, jwt_auth_middleware));

    let catalogue = Router::new()
        .route("/", get(list_products))
        .route("/category/{categoryId}", get(get_products_by_category))
        .route("/{id}", get(get_product));

    seller.merge(catalogue).with_state(shared_service)
}

/// Create a product listing
#[utoipa::path(
    post,
    path = "",
    tag = "Products",
    security(("bearer_auth" = [])),
    request_body = CreateProduct,
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_product<R: ProductRepository>(
    State(service): State<SharedService<R>>,
    user: AuthUser,
    payload: Result<Json<CreateProduct>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let input = match payload {
        Ok(Json(input)) => input,
        Err(JsonRejection::JsonDataError(e)) => {
            let details = json!({ "fieldErrors": { "body": [e.body_text()] } });
            return Err(ProductError::Validation(details).into());
        }
        Err(rejection) => return Err(rejection.into()),
    };

    let product = service.create_product(user.user_id, input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// The caller's own listings, any status
#[utoipa::path(
    get,
    path = "/my-products",
    tag = "Products",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller's products", body = MyProducts),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_my_products<R: ProductRepository>(
    State(service): State<SharedService<R>>,
    user: AuthUser,
) -> Result<Json<MyProducts>, AppError> {
    let products = service.get_my_products(user.user_id).await?;
    Ok(Json(products))
}

/// Approved and available products, newest first
#[utoipa::path(
    get,
    path = "",
    tag = "Products",
    params(PageQuery),
    responses(
        (status = 200, description = "Page of products", body = ProductPage),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<R: ProductRepository>(
    State(service): State<SharedService<R>>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ProductPage>, AppError> {
    let page = service.get_all_products(query.page(), query.limit()).await?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/category/{categoryId}",
    tag = "Products",
    params(
        ("categoryId" = String, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Listed products in the category", body = Vec<Product>),
        (status = 400, response = BadRequestUuidResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_products_by_category<R: ProductRepository>(
    State(service): State<SharedService<R>>,
    UuidPath(category_id): UuidPath,
) -> Result<Json<Vec<Product>>, AppError> {
    let products = service.get_products_by_category(category_id).await?;
    Ok(Json(products))
}

/// A single listed product
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = String, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product", body = ProductView),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product<R: ProductRepository>(
    State(service): State<SharedService<R>>,
    UuidPath(id): UuidPath,
) -> Result<Json<ProductView>, AppError> {
    let product = service.get_product_by_id(id).await?;
    Ok(Json(product))
}
