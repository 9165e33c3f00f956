use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use strum::Display;
use uuid::Uuid;

use super::plan::Plan;

/// How long a provider checkout link stays reusable after creation.
pub const CHECKOUT_SESSION_TTL_HOURS: i64 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, Display)]
#[sqlx(type_name = "checkout_session_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckoutSessionStatus {
    Active,
    Completed,
    Expired,
    Inactive,
}

/// A provider checkout attempt recorded for deduplication.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutSession {
    pub id: Uuid,
    pub user_id: Uuid,
    pub plan: Plan,
    /// Provider-assigned session id.
    pub session_id: String,
    pub checkout_url: String,
    pub status: CheckoutSessionStatus,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl CheckoutSession {
    /// Expiry for a session created at `created_at`.
    pub fn expiry_for(created_at: DateTime<Utc>) -> DateTime<Utc> {
        created_at + Duration::hours(CHECKOUT_SESSION_TTL_HOURS)
    }

    /// A session may be handed back to a caller only while it is ACTIVE and
    /// has not yet reached its expiry.
    pub fn is_reusable_at(&self, now: DateTime<Utc>) -> bool {
        self.status == CheckoutSessionStatus::Active && self.expires_at > now
    }
}
