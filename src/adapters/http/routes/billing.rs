use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::Response,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    adapters::http::{
        app_error_impl::error_resp, app_state::AppState, auth::CurrentUser, envelope::ApiEnvelope,
    },
    app_error::{AppError, AppResult, ErrorCode},
    domain::entities::{
        plan::Plan,
        subscription::{Subscription, SubscriptionStatus},
    },
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/checkout", post(create_checkout))
        .route("/cancel", post(cancel_subscription))
        .route("/portal", post(create_portal_session))
        .route("/subscription", get(get_subscription))
        .method_not_allowed_fallback(method_not_allowed)
}

pub async fn method_not_allowed() -> Response {
    error_resp(
        StatusCode::METHOD_NOT_ALLOWED,
        ErrorCode::MethodNotAllowed,
        "Method not allowed".to_string(),
    )
}

fn invalid_body(rejection: JsonRejection) -> AppError {
    AppError::InvalidPayload(format!("Invalid request body: {}", rejection.body_text()))
}

// ============================================================================
// POST /checkout
// ============================================================================

#[derive(Debug, Deserialize)]
struct CheckoutPayload {
    plan: String,
}

#[derive(Debug, Serialize)]
struct UrlResponse {
    url: String,
}

async fn create_checkout(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    payload: Result<Json<CheckoutPayload>, JsonRejection>,
) -> AppResult<ApiEnvelope<UrlResponse>> {
    let Json(payload) = payload.map_err(invalid_body)?;

    let outcome = app_state
        .checkout_use_cases
        .create_checkout(&user, &payload.plan)
        .await?;

    let message = if outcome.reused {
        "Existing checkout session returned"
    } else {
        "Checkout session created"
    };
    Ok(ApiEnvelope::ok(UrlResponse { url: outcome.url }, message))
}

// ============================================================================
// POST /cancel
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CancelPayload {
    subscription_id: String,
}

async fn cancel_subscription(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    payload: Result<Json<CancelPayload>, JsonRejection>,
) -> AppResult<ApiEnvelope<()>> {
    let Json(payload) = payload.map_err(invalid_body)?;
    let subscription_id = Uuid::parse_str(payload.subscription_id.trim())
        .map_err(|_| AppError::InvalidPayload("subscriptionId must be a UUID".into()))?;

    app_state
        .cancellation_use_cases
        .cancel_trial(&user, subscription_id)
        .await?;

    Ok(ApiEnvelope::message(
        "Trial cancellation requested. Your subscription will end shortly.",
    ))
}

// ============================================================================
// POST /portal
// ============================================================================

async fn create_portal_session(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<ApiEnvelope<UrlResponse>> {
    let url = app_state
        .portal_use_cases
        .create_portal_session(user.id)
        .await?;
    Ok(ApiEnvelope::ok(UrlResponse { url }, "Portal session created"))
}

// ============================================================================
// GET /subscription
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SubscriptionSummary {
    id: Uuid,
    plan: Plan,
    status: SubscriptionStatus,
    trial_consumed: bool,
    trial_remaining_days: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<Subscription> for SubscriptionSummary {
    fn from(sub: Subscription) -> Self {
        Self {
            id: sub.id,
            plan: sub.plan,
            status: sub.status,
            trial_consumed: sub.trial_consumed,
            trial_remaining_days: sub.trial_remaining_days,
            created_at: sub.created_at,
            updated_at: sub.updated_at,
        }
    }
}

async fn get_subscription(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<ApiEnvelope<Option<SubscriptionSummary>>> {
    let latest = app_state
        .subscription_registry
        .get_latest_subscription(user.id)
        .await?;
    let message = if latest.is_some() {
        "Subscription found"
    } else {
        "No subscription"
    };
    Ok(ApiEnvelope::ok(latest.map(SubscriptionSummary::from), message))
}
