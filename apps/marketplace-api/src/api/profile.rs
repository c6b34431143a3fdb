//! Profile, seller info and shipping address routes

use axum::Router;
use domain_users::{
    MongoShippingAddressRepository, MongoUserRepository, ProfileService, handlers,
};
use mongodb::Database;

use crate::state::AppState;

pub fn router(state: &AppState) -> Router {
    let service = ProfileService::new(
        MongoUserRepository::new(&state.db),
        MongoShippingAddressRepository::new(&state.db),
    );

    handlers::router(service, state.auth.clone())
}

pub async fn init_indexes(db: &Database) -> eyre::Result<()> {
    MongoUserRepository::new(db).init_indexes().await?;
    MongoShippingAddressRepository::new(db).init_indexes().await?;
    Ok(())
}
