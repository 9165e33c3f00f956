pub mod billing;

use axum::{Router, routing::get};
use serde::Serialize;

use crate::adapters::http::{app_state::AppState, envelope::ApiEnvelope};

pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/billing", billing::router())
        .route("/health", get(health))
        .method_not_allowed_fallback(billing::method_not_allowed)
}

#[derive(Serialize)]
struct Health {
    status: &'static str,
}

async fn health() -> ApiEnvelope<Health> {
    ApiEnvelope::ok(Health { status: "ok" }, "Service is healthy")
}
