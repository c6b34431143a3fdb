//! API routes
//!
//! Domain routers are mounted under `/v1`; `create_router` adds the `/api` prefix.

pub mod cart;
pub mod categories;
pub mod health;
pub mod products;
pub mod profile;

use axum::Router;
use mongodb::Database;

use crate::state::AppState;

pub fn routes(state: &AppState) -> Router {
    let categories = categories::routes(state);

    let v1 = Router::new()
        .nest("/admin/categories", categories.admin)
        .nest("/categories", categories.combined)
        .nest("/products", products::router(state))
        .nest("/cart", cart::router(state))
        .nest("/profile", profile::router(state));

    Router::new()
        .nest("/v1", v1)
        .merge(health::router(state.clone()))
}

/// Create every collection's indexes before serving.
pub async fn init_indexes(db: &Database) -> eyre::Result<()> {
    profile::init_indexes(db).await?;
    categories::init_indexes(db).await?;
    products::init_indexes(db).await?;
    cart::init_indexes(db).await?;
    Ok(())
}
