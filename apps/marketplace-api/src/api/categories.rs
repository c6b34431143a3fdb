//! Category hierarchy routes

use axum::Router;
use domain_categories::{CategoryService, MongoCategoryRepository, handlers};
use mongodb::Database;

use crate::state::AppState;

pub struct Routes {
    /// `/admin/categories`
    pub admin: Router,
    /// `/categories`: the admin routes plus `GET /public`
    pub combined: Router,
}

pub fn routes(state: &AppState) -> Routes {
    let service = CategoryService::new(MongoCategoryRepository::new(&state.db));
    let routes = handlers::routes(service, state.auth.clone());

    Routes {
        combined: routes.admin.clone().merge(routes.public),
        admin: routes.admin,
    }
}

pub async fn init_indexes(db: &Database) -> eyre::Result<()> {
    MongoCategoryRepository::new(db).init_indexes().await?;
    Ok(())
}
