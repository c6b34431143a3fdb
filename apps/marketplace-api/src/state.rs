//! Shared application state handed to the route builders.

use axum_helpers::JwtAuth;
use mongodb::{Client, Database};

#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    /// Cloneable handle over the driver's connection pool
    pub mongo_client: Client,
    pub db: Database,
    /// Token verifier shared by every protected router
    pub auth: JwtAuth,
}
