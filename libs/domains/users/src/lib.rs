//! Users Domain
//!
//! User accounts are provisioned by the identity service. This crate reads them,
//! edits their profile and seller info, keeps their shipping addresses and
//! derives buy/sell eligibility.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← /profile endpoints (JWT required)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← ProfileService + pure eligibility rules
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← UserRepository, ShippingAddressRepository
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use axum_helpers::{JwtAuth, JwtConfig};
//! use domain_users::{
//!     handlers, MongoShippingAddressRepository, MongoUserRepository, ProfileService,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = mongodb::Client::with_uri_str("mongodb://localhost:27017").await?;
//! let db = client.database("marketplace");
//!
//! let service = ProfileService::new(
//!     MongoUserRepository::new(&db),
//!     MongoShippingAddressRepository::new(&db),
//! );
//! let auth = JwtAuth::new(&JwtConfig::new("a-secret-of-at-least-32-characters!!"));
//! let router = handlers::router(service, auth);
//! # Ok(())
//! # }
//! ```

pub mod eligibility;
pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

pub use error::{UserError, UserResult};
pub use handlers::ApiDoc;
pub use models::{
    BuyEligibility, Completion, Profile, ProfileView, SellEligibility, SellerInfo,
    ShippingAddress, User,
};
pub use self::mongodb::{MongoShippingAddressRepository, MongoUserRepository};
pub use repository::{
    InMemoryShippingAddressRepository, InMemoryUserRepository, ShippingAddressRepository,
    UserRepository,
};
pub use service::ProfileService;
