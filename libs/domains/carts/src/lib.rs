//! Carts Domain
//!
//! One cart per user holding `{productId, quantity}` lines. Reads attach a
//! live snapshot of each product and drop lines whose product is no longer
//! approved and available, saving the pruned cart.
//!
//! Quantities are checked against the product's stock when written. Nothing
//! is reserved, so two buyers can each hold the last unit.
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use axum_helpers::{JwtAuth, JwtConfig};
//! use domain_carts::{handlers, CartService, MongoCartRepository};
//! use domain_products::MongoProductRepository;
//! use domain_users::MongoUserRepository;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = mongodb::Client::with_uri_str("mongodb://localhost:27017").await?;
//! let db = client.database("marketplace");
//!
//! let repository = MongoCartRepository::new(&db);
//! repository.init_indexes().await?;
//!
//! let service = CartService::new(
//!     repository,
//!     Arc::new(MongoUserRepository::new(&db)),
//!     Arc::new(MongoProductRepository::new(&db)),
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

pub use error::{CartError, CartResult};
pub use handlers::ApiDoc;
pub use models::{AddItem, Cart, CartItem, CartLine, CartProduct, CartView, UpdateItem};
pub use self::mongodb::MongoCartRepository;
pub use repository::{CartRepository, InMemoryCartRepository};
pub use service::CartService;
