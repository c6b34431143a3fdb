//! Categories Domain
//!
//! Hierarchical categories up to four levels deep (0 to 3). Each category
//! stores its level and materialized path (`shoes/sneakers`), derived from
//! the parent at creation time.
//!
//! Slugs are unique and probed as `slug`, `slug-1`, ... before insert. Two
//! racing creates can still collide; the store's unique indexes decide and
//! the loser gets a 409 `CATEGORY_DUPLICATE`.
//!
//! # Usage
//!
//! ```rust,no_run
//! use axum_helpers::{JwtAuth, JwtConfig};
//! use domain_categories::{handlers, CategoryService, MongoCategoryRepository};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = mongodb::Client::with_uri_str("mongodb://localhost:27017").await?;
//! let repository = MongoCategoryRepository::new(&client.database("marketplace"));
//! repository.init_indexes().await?;
//!
//! let auth = JwtAuth::new(&JwtConfig::new("a-secret-of-at-least-32-characters!!"));
//! let routes = handlers::routes(CategoryService::new(repository), auth);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;
pub mod slug;

pub use error::{CategoryError, CategoryResult, UniqueConstraint};
pub use handlers::{ApiDoc, CategoryRoutes};
pub use models::{Category, CategoryFilter, CreateCategory, PublicCategory};
pub use self::mongodb::MongoCategoryRepository;
pub use repository::{CategoryRepository, InMemoryCategoryRepository};
pub use service::CategoryService;
