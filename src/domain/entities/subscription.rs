use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::app_error::{AppError, AppResult};

use super::plan::Plan;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "subscription_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionStatus {
    Active,
    Pending,
    Cancelled,
    Paused,
    Trialing,
    Unpaid,
}

impl SubscriptionStatus {
    /// Every status except `Cancelled`.
    pub const NON_TERMINAL: [SubscriptionStatus; 5] = [
        SubscriptionStatus::Active,
        SubscriptionStatus::Trialing,
        SubscriptionStatus::Pending,
        SubscriptionStatus::Unpaid,
        SubscriptionStatus::Paused,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Active => "ACTIVE",
            SubscriptionStatus::Pending => "PENDING",
            SubscriptionStatus::Cancelled => "CANCELLED",
            SubscriptionStatus::Paused => "PAUSED",
            SubscriptionStatus::Trialing => "TRIALING",
            SubscriptionStatus::Unpaid => "UNPAID",
        }
    }

    /// Map a payment provider subscription status onto the internal status.
    ///
    /// Unknown strings are an error rather than a default: guessing a status
    /// here would silently corrupt billing state.
    pub fn from_provider(raw: &str) -> AppResult<Self> {
        match raw {
            "trialing" => Ok(SubscriptionStatus::Trialing),
            "active" => Ok(SubscriptionStatus::Active),
            "past_due" | "unpaid" => Ok(SubscriptionStatus::Unpaid),
            "canceled" | "incomplete_expired" => Ok(SubscriptionStatus::Cancelled),
            "incomplete" => Ok(SubscriptionStatus::Pending),
            "paused" => Ok(SubscriptionStatus::Paused),
            other => Err(AppError::UnknownProviderStatus(other.to_string())),
        }
    }

    /// Returns true while the subscription still occupies the user's single
    /// subscription slot.
    pub fn is_non_terminal(&self) -> bool {
        !matches!(self, SubscriptionStatus::Cancelled)
    }
}

impl std::fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Free-function form of [`SubscriptionStatus::from_provider`].
pub fn map_provider_status(raw: &str) -> AppResult<SubscriptionStatus> {
    SubscriptionStatus::from_provider(raw)
}

/// A user's relationship to a paid plan.
///
/// Rows are written by the provider event feed; this crate only reads them.
#[derive(Debug, Clone, Serialize)]
pub struct Subscription {
    pub id: Uuid,
    pub user_id: Uuid,
    pub plan: Plan,
    pub status: SubscriptionStatus,
    pub provider_customer_id: Option<String>,
    pub provider_subscription_id: Option<String>,
    pub trial_consumed: bool,
    pub trial_remaining_days: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Subscription {
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }
}
