//! Readiness check

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use axum_helpers::server::{HealthCheckFuture, run_health_checks};
use serde_json::Value;

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ready", get(readiness_check))
        .with_state(state)
}

/// 200 when MongoDB answers a ping, 503 otherwise
async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let checks: Vec<(&str, HealthCheckFuture<'_>)> = vec![(
        "mongodb",
        Box::pin(async {
            let status = database::mongodb::check_health_detailed(&state.mongo_client).await;
            if status.healthy {
                Ok(())
            } else {
                Err(status.message.unwrap_or_else(|| "ping failed".to_string()))
            }
        }),
    )];

    run_health_checks(checks).await
}
