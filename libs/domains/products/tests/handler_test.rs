//! Handler tests for the products API
//!
//! In-memory stores for products, users and categories; real JWTs.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use axum_helpers::{JwtAuth, JwtConfig, Role};
use chrono::Utc;
use domain_categories::{Category, CategoryRepository, InMemoryCategoryRepository};
use domain_products::*;
use domain_users::models::{Agreements, ProfileAddress};
use domain_users::{InMemoryUserRepository, Profile, SellerInfo, User, UserRepository};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use test_utils::TestDataBuilder;
use tower::ServiceExt; // For oneshot()
use uuid::Uuid;

const SECRET: &str = "products-handler-test-secret-0123456789";

// Helper to parse JSON response body
async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

struct TestApp {
    router: Router,
    auth: JwtAuth,
    users: InMemoryUserRepository,
    seller_token: String,
    category_id: Uuid,
}

fn complete_seller(email: String) -> User {
    let mut user = User::new(email, Role::User);
    user.profile = Some(Profile {
        full_name: Some("Le Van C".to_string()),
        phone: Some("0911111111".to_string()),
        address: Some(ProfileAddress {
            province: Some("Đà Nẵng".to_string()),
            district: Some("Hải Châu".to_string()),
            ward: Some("Thạch Thang".to_string()),
            street: None,
        }),
        ..Default::default()
    });
    user.seller_info = Some(SellerInfo {
        shop_name: Some("C shop".to_string()),
        trading_area: Some("Đà Nẵng".to_string()),
        agreements: Agreements {
            terms_accepted: true,
            no_prohibited_items: true,
        },
        ..Default::default()
    });
    user
}

async fn setup(test_name: &str) -> TestApp {
    let builder = TestDataBuilder::from_test_name(test_name);

    let users = InMemoryUserRepository::new();
    let mut seller = complete_seller(format!("{}@example.com", builder.name("seller", "a")));
    seller.id = builder.user_id();
    users.insert(seller).await.unwrap();

    let categories = InMemoryCategoryRepository::new();
    let now = Utc::now();
    let category = categories
        .insert(Category {
            id: Uuid::now_v7(),
            name: "Jackets".to_string(),
            slug: "jackets".to_string(),
            parent_id: None,
            level: 0,
            path: "jackets".to_string(),
            description: None,
            is_active: true,
            sort_order: 0,
            created_by: builder.other_user_id(),
            created_at: now,
            updated_at: now,
        })
        .await
        .unwrap();

    let auth = JwtAuth::new(&JwtConfig::new(SECRET));
    let seller_token = auth
        .create_token(builder.user_id(), Role::User, 3600)
        .unwrap();

    let service = ProductService::new(
        InMemoryProductRepository::new(),
        Arc::new(users.clone()),
        Arc::new(categories),
    );

    TestApp {
        router: handlers::router(service, auth.clone()),
        auth,
        users,
        seller_token,
        category_id: category.id,
    }
}

fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }

    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

fn product_body(category_id: Uuid) -> Value {
    json!({
        "title": "Leather jacket",
        "categoryId": category_id,
        "price": 1200000,
        "condition": "very-good",
        "images": ["https://cdn.example.com/jacket.jpg"],
        "gender": "unisex"
    })
}

#[tokio::test]
async fn test_create_requires_user_token() {
    let app = setup("products_requires_token").await;

    let response = app
        .router
        .clone()
        .oneshot(request("POST", "/", None, Some(product_body(app.category_id))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let admin_token = app
        .auth
        .create_token(Uuid::now_v7(), Role::Admin, 3600)
        .unwrap();
    let response = app
        .router
        .oneshot(request(
            "POST",
            "/",
            Some(&admin_token),
            Some(product_body(app.category_id)),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_create_then_browse() {
    let app = setup("products_create_browse").await;

    let response = app
        .router
        .clone()
        .oneshot(request(
            "POST",
            "/",
            Some(&app.seller_token),
            Some(product_body(app.category_id)),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created: Value = json_body(response.into_body()).await;
    assert_eq!(created["status"], "approved");
    assert_eq!(created["isAvailable"], true);
    assert_eq!(created["quantity"], 1);
    let id = created["_id"].as_str().unwrap().to_string();

    let response = app
        .router
        .clone()
        .oneshot(request("GET", &format!("/{}", id), None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let view: Value = json_body(response.into_body()).await;
    assert_eq!(view["categoryName"], "Jackets");
    assert!(view["sellerEmail"].as_str().unwrap().ends_with("@example.com"));

    let response = app
        .router
        .clone()
        .oneshot(request("GET", "/?page=1&limit=9", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let page: Value = json_body(response.into_body()).await;
    assert_eq!(page["products"].as_array().unwrap().len(), 1);
    assert_eq!(page["pagination"]["total"], 1);
    assert_eq!(page["pagination"]["totalPages"], 1);

    let response = app
        .router
        .clone()
        .oneshot(request(
            "GET",
            &format!("/category/{}", app.category_id),
            None,
            None,
        ))
        .await
        .unwrap();
    let in_category: Vec<Value> = json_body(response.into_body()).await;
    assert_eq!(in_category.len(), 1);

    let response = app
        .router
        .oneshot(request("GET", "/my-products", Some(&app.seller_token), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let mine: Value = json_body(response.into_body()).await;
    assert_eq!(mine["total"], 1);
}

#[tokio::test]
async fn test_incomplete_profile_returns_details() {
    let app = setup("products_incomplete_profile").await;

    let bare = app
        .users
        .insert(User::new("bare@example.com", Role::User))
        .await
        .unwrap();
    let token = app.auth.create_token(bare.id, Role::User, 3600).unwrap();

    let response = app
        .router
        .oneshot(request(
            "POST",
            "/",
            Some(&token),
            Some(product_body(app.category_id)),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["code"], "PROFILE_INCOMPLETE");
    assert_eq!(body["details"]["reason"], "PROFILE_INCOMPLETE");
    assert!(body["details"]["missingFields"].is_array());
}

#[tokio::test]
async fn test_fair_condition_without_defects_is_rejected() {
    let app = setup("products_fair_condition").await;

    let mut body = product_body(app.category_id);
    body["condition"] = json!("fair");

    let response = app
        .router
        .oneshot(request("POST", "/", Some(&app.seller_token), Some(body)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["code"], "PRODUCT_VALIDATION_ERROR");
    assert!(body["details"]["fieldErrors"]["defects"].is_array());
}

#[tokio::test]
async fn test_unknown_category_returns_404() {
    let app = setup("products_unknown_category").await;

    let response = app
        .router
        .oneshot(request(
            "POST",
            "/",
            Some(&app.seller_token),
            Some(product_body(Uuid::now_v7())),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["code"], "PRODUCT_CATEGORY_NOT_FOUND");
}

#[tokio::test]
async fn test_invalid_paging_and_ids() {
    let app = setup("products_invalid_paging").await;

    let response = app
        .router
        .clone()
        .oneshot(request("GET", "/?page=-1", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["message"], "Page and limit must be positive numbers");

    let response = app
        .router
        .clone()
        .oneshot(request("GET", "/not-a-uuid", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["code"], "INVALID_UUID");

    let response = app
        .router
        .oneshot(request("GET", &format!("/{}", Uuid::now_v7()), None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["code"], "PRODUCT_NOT_FOUND");
}
