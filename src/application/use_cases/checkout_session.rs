use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    app_error::AppResult,
    domain::entities::{checkout_session::CheckoutSession, plan::Plan},
};

// ============================================================================
// Input Types
// ============================================================================

#[derive(Debug, Clone)]
pub struct CreateCheckoutSessionInput {
    pub user_id: Uuid,
    pub plan: Plan,
    pub session_id: String,
    pub checkout_url: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl CreateCheckoutSessionInput {
    /// Build an insert for a session created at `now`, expiring one TTL later.
    pub fn new(
        user_id: Uuid,
        plan: Plan,
        session_id: String,
        checkout_url: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            plan,
            session_id,
            checkout_url,
            created_at: now,
            expires_at: CheckoutSession::expiry_for(now),
        }
    }
}

// ============================================================================
// Repository Traits
// ============================================================================

#[async_trait]
pub trait CheckoutSessionRepo: Send + Sync {
    /// Most recently created ACTIVE session for (user, plan), expired or not.
    async fn get_latest_active(
        &self,
        user_id: Uuid,
        plan: Plan,
    ) -> AppResult<Option<CheckoutSession>>;

    /// Insert a new ACTIVE session row.
    async fn create(&self, input: &CreateCheckoutSessionInput) -> AppResult<CheckoutSession>;

    /// Flip ACTIVE sessions whose expiry is at or before `now` to EXPIRED.
    async fn expire_stale(&self, now: DateTime<Utc>) -> AppResult<u64>;
}

// ============================================================================
// Store
// ============================================================================

/// Tracks outstanding checkout sessions per (user, plan).
#[derive(Clone)]
pub struct CheckoutSessionStore {
    repo: Arc<dyn CheckoutSessionRepo>,
}

impl CheckoutSessionStore {
    pub fn new(repo: Arc<dyn CheckoutSessionRepo>) -> Self {
        Self { repo }
    }

    /// Return the session the caller may reuse, if any.
    ///
    /// Expiry is judged at read time only; an expired row is treated as absent
    /// and left untouched.
    #[instrument(skip(self))]
    pub async fn find_reusable_session(
        &self,
        user_id: Uuid,
        plan: Plan,
        now: DateTime<Utc>,
    ) -> AppResult<Option<CheckoutSession>> {
        let latest = self.repo.get_latest_active(user_id, plan).await?;
        Ok(latest.filter(|session| {
            let reusable = session.is_reusable_at(now);
            if !reusable {
                tracing::debug!(
                    session_id = %session.session_id,
                    expires_at = %session.expires_at,
                    "Latest checkout session has expired"
                );
            }
            reusable
        }))
    }

    /// Persist a new session. Does not deduplicate.
    #[instrument(skip(self, input), fields(user_id = %input.user_id, plan = %input.plan))]
    pub async fn record_session(
        &self,
        input: &CreateCheckoutSessionInput,
    ) -> AppResult<CheckoutSession> {
        self.repo.create(input).await
    }

    /// Background reconciliation: mark stale ACTIVE sessions as EXPIRED.
    #[instrument(skip(self))]
    pub async fn expire_stale(&self, now: DateTime<Utc>) -> AppResult<u64> {
        self.repo.expire_stale(now).await
    }
}
