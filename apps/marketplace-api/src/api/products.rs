//! Product catalogue and seller listing routes

use axum::Router;
use domain_categories::MongoCategoryRepository;
use domain_products::{MongoProductRepository, ProductService, handlers};
use domain_users::MongoUserRepository;
use mongodb::Database;
use std::sync::Arc;

use crate::state::AppState;

pub fn router(state: &AppState) -> Router {
    let service = ProductService::new(
        MongoProductRepository::new(&state.db),
        Arc::new(MongoUserRepository::new(&state.db)),
        Arc::new(MongoCategoryRepository::new(&state.db)),
    );

    handlers::router(service, state.auth.clone())
}

pub async fn init_indexes(db: &Database) -> eyre::Result<()> {
    MongoProductRepository::new(db).init_indexes().await?;
    Ok(())
}
