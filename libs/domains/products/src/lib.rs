//! Products Domain
//!
//! Second-hand listings created by sellers whose profile passes the sell
//! check. Listings are approved on creation; the public catalogue shows only
//! approved, available products.
//!
//! Reads of users and categories go through `domain_users::UserRepository`
//! and `domain_categories::CategoryRepository`, injected as trait objects.
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use axum_helpers::{JwtAuth, JwtConfig};
//! use domain_categories::MongoCategoryRepository;
//! use domain_products::{handlers, MongoProductRepository, ProductService};
//! use domain_users::MongoUserRepository;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = mongodb::Client::with_uri_str("mongodb://localhost:27017").await?;
//! let db = client.database("marketplace");
//!
//! let repository = MongoProductRepository::new(&db);
//! repository.init_indexes().await?;
//!
//! let service = ProductService::new(
//!     repository,
//!     Arc::new(MongoUserRepository::new(&db)),
//!     Arc::new(MongoCategoryRepository::new(&db)),
//! );
//! let auth = JwtAuth::new(&JwtConfig::new("a-secret-of-at-least-32-characters!!"));
//! let router = handlers::router(service, auth);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

pub use error::{ProductError, ProductResult};
pub use handlers::ApiDoc;
pub use models::{
    CreateProduct, Gender, MyProducts, Pagination, Product, ProductCondition, ProductPage,
    ProductStatus, ProductView,
};
pub use self::mongodb::MongoProductRepository;
pub use repository::{InMemoryProductRepository, ProductRepository};
pub use service::ProductService;
