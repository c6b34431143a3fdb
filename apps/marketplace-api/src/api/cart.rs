//! Shopping cart routes

use axum::Router;
use domain_carts::{CartService, MongoCartRepository, handlers};
use domain_products::MongoProductRepository;
use domain_users::MongoUserRepository;
use mongodb::Database;
use std::sync::Arc;

use crate::state::AppState;

pub fn router(state: &AppState) -> Router {
    let service = CartService::new(
        MongoCartRepository::new(&state.db),
        Arc::new(MongoUserRepository::new(&state.db)),
        Arc::new(MongoProductRepository::new(&state.db)),
    );

    handlers::router(service, state.auth.clone())
}

pub async fn init_indexes(db: &Database) -> eyre::Result<()> {
    MongoCartRepository::new(db).init_indexes().await?;
    Ok(())
}
