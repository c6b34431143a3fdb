//! HTTP handlers for the profile API

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    middleware::from_fn_with_state,
    response::IntoResponse,
    routing::{get, post, put},
};
use axum_helpers::{
    AuthUser, JsonBody, JwtAuth, UuidPath,
    errors::responses::{
        BadRequestUuidResponse, InternalServerErrorResponse, NotFoundResponse,
        UnauthorizedResponse,
    },
    jwt_auth_middleware,
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::UserResult;
use crate::models::{
    Agreements, AgreementsPatch, BuyEligibility, Completion, ContactMethods, ContactMethodsPatch,
    CreateShippingAddress, DeleteResult, PaymentMethods, PaymentMethodsPatch, Profile,
    ProfileAddress, ProfileView, SellEligibility, SellerInfo, ShippingAddress, UpdateBasicInfo,
    UpdateSellerInfo, UpdateShippingAddress,
};
use crate::repository::{ShippingAddressRepository, UserRepository};
use crate::service::ProfileService;

/// OpenAPI documentation for the profile API
#[derive(OpenApi)]
#[openapi(
    paths(
        get_profile,
        update_basic_info,
        update_seller_info,
        add_shipping_address,
        update_shipping_address,
        delete_shipping_address,
        check_can_sell,
        check_can_buy,
    ),
    components(
        schemas(
            ProfileView, Profile, ProfileAddress, SellerInfo, ContactMethods, PaymentMethods,
            Agreements, ShippingAddress, Completion, SellEligibility, BuyEligibility,
            DeleteResult, UpdateBasicInfo, UpdateSellerInfo, ContactMethodsPatch,
            PaymentMethodsPatch, AgreementsPatch, CreateShippingAddress, UpdateShippingAddress
        ),
        responses(
            NotFoundResponse,
            BadRequestUuidResponse,
            UnauthorizedResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Profile", description = "Profile, seller info and shipping addresses")
    )
)]
pub struct ApiDoc;

type SharedService<U, A> = Arc<ProfileService<U, A>>;

/// Profile routes. Every route requires an authenticated caller of any role.
pub fn router<U, A>(service: ProfileService<U, A>, auth: JwtAuth) -> Router
where
    U: UserRepository + 'static,
    A: ShippingAddressRepository + 'static,
{
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(get_profile))
        .route("/basic-info", put(update_basic_info))
        .route("/seller-info", put(update_seller_info))
        .route("/shipping-addresses", post(add_shipping_address))
        .route(
            "/shipping-addresses/{addressId}",
            put(update_shipping_address).delete(delete_shipping_address),
        )
        .route("/check-sell", get(check_can_sell))
        .route("/check-buy", get(check_can_buy))
        .route_layer(from_fn_with_state(auth, jwt_auth_middleware))
        .with_state(shared_service)
}

/// Profile with shipping addresses, seller info and completion score
#[utoipa::path(
    get,
    path = "",
    tag = "Profile",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current profile", body = ProfileView),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_profile<U: UserRepository, A: ShippingAddressRepository>(
    State(service): State<SharedService<U, A>>,
    user: AuthUser,
) -> UserResult<Json<ProfileView>> {
    let view = service.get_profile(user.user_id).await?;
    Ok(Json(view))
}

/// Replace name, phone, avatar and address
#[utoipa::path(
    put,
    path = "/basic-info",
    tag = "Profile",
    security(("bearer_auth" = [])),
    request_body = UpdateBasicInfo,
    responses(
        (status = 200, description = "Profile updated", body = Profile),
        (status = 400, description = "Missing required fields"),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_basic_info<U: UserRepository, A: ShippingAddressRepository>(
    State(service): State<SharedService<U, A>>,
    user: AuthUser,
    JsonBody(input): JsonBody<UpdateBasicInfo>,
) -> UserResult<Json<Profile>> {
    let profile = service.update_basic_info(user.user_id, input).await?;
    Ok(Json(profile))
}

/// Merge seller info
#[utoipa::path(
    put,
    path = "/seller-info",
    tag = "Profile",
    security(("bearer_auth" = [])),
    request_body = UpdateSellerInfo,
    responses(
        (status = 200, description = "Seller info updated", body = SellerInfo),
        (status = 400, description = "Agreements not accepted"),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_seller_info<U: UserRepository, A: ShippingAddressRepository>(
    State(service): State<SharedService<U, A>>,
    user: AuthUser,
    JsonBody(input): JsonBody<UpdateSellerInfo>,
) -> UserResult<Json<SellerInfo>> {
    let info = service.update_seller_info(user.user_id, input).await?;
    Ok(Json(info))
}

#[utoipa::path(
    post,
    path = "/shipping-addresses",
    tag = "Profile",
    security(("bearer_auth" = [])),
    request_body = CreateShippingAddress,
    responses(
        (status = 201, description = "Shipping address created", body = ShippingAddress),
        (status = 400, description = "Missing required fields"),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn add_shipping_address<U: UserRepository, A: ShippingAddressRepository>(
    State(service): State<SharedService<U, A>>,
    user: AuthUser,
    JsonBody(input): JsonBody<CreateShippingAddress>,
) -> UserResult<impl IntoResponse> {
    let address = service.add_shipping_address(user.user_id, input).await?;
    Ok((StatusCode::CREATED, Json(address)))
}

#[utoipa::path(
    put,
    path = "/shipping-addresses/{addressId}",
    tag = "Profile",
    security(("bearer_auth" = [])),
    params(
        ("addressId" = Uuid, Path, description = "Shipping address ID")
    ),
    request_body = UpdateShippingAddress,
    responses(
        (status = 200, description = "Shipping address updated", body = ShippingAddress),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_shipping_address<U: UserRepository, A: ShippingAddressRepository>(
    State(service): State<SharedService<U, A>>,
    user: AuthUser,
    UuidPath(address_id): UuidPath,
    JsonBody(input): JsonBody<UpdateShippingAddress>,
) -> UserResult<Json<ShippingAddress>> {
    let address = service
        .update_shipping_address(user.user_id, address_id, input)
        .await?;
    Ok(Json(address))
}

#[utoipa::path(
    delete,
    path = "/shipping-addresses/{addressId}",
    tag = "Profile",
    security(("bearer_auth" = [])),
    params(
        ("addressId" = Uuid, Path, description = "Shipping address ID")
    ),
    responses(
        (status = 200, description = "Shipping address deleted", body = DeleteResult),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_shipping_address<U: UserRepository, A: ShippingAddressRepository>(
    State(service): State<SharedService<U, A>>,
    user: AuthUser,
    UuidPath(address_id): UuidPath,
) -> UserResult<Json<DeleteResult>> {
    let result = service
        .delete_shipping_address(user.user_id, address_id)
        .await?;
    Ok(Json(result))
}

/// Whether the caller may list products for sale
#[utoipa::path(
    get,
    path = "/check-sell",
    tag = "Profile",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Sell eligibility", body = SellEligibility),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn check_can_sell<U: UserRepository, A: ShippingAddressRepository>(
    State(service): State<SharedService<U, A>>,
    user: AuthUser,
) -> UserResult<Json<SellEligibility>> {
    let result = service.check_can_sell(user.user_id).await?;
    Ok(Json(result))
}

/// Whether the caller may place orders
#[utoipa::path(
    get,
    path = "/check-buy",
    tag = "Profile",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Buy eligibility", body = BuyEligibility),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn check_can_buy<U: UserRepository, A: ShippingAddressRepository>(
    State(service): State<SharedService<U, A>>,
    user: AuthUser,
) -> UserResult<Json<BuyEligibility>> {
    let result = service.check_can_buy(user.user_id).await?;
    Ok(Json(result))
}
