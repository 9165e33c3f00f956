use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use crate::{
    app_error::AppResult,
    domain::entities::{
        payment_provider::PaymentProvider, plan::Plan, trial_allowance::TrialAllowance,
    },
};

// ============================================================================
// Port Types - Provider-agnostic domain types
// ============================================================================

/// Unique identifier for a customer in a payment provider
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CustomerId(pub String);

impl CustomerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CustomerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a subscription in a payment provider
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SubscriptionId(pub String);

impl SubscriptionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// URLs for checkout redirects
#[derive(Debug, Clone)]
pub struct CheckoutUrls {
    pub success_url: String,
    pub cancel_url: String,
}

/// Everything the provider needs to open a subscription checkout.
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    pub user_id: Uuid,
    /// Billing identity shown on the provider's checkout page.
    pub email: String,
    pub plan: Plan,
    /// Provider price id resolved for `plan`.
    pub price_id: String,
    pub quantity: u32,
    /// Zero means no trial configuration is sent at all.
    pub trial: TrialAllowance,
    pub urls: CheckoutUrls,
}

/// Result of creating a checkout session.
///
/// Both fields are optional because providers have been observed to answer
/// without them; the caller decides whether that is acceptable.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutResult {
    pub session_id: Option<String>,
    pub checkout_url: Option<String>,
}

/// Result of cancelling a subscription
#[derive(Debug, Clone, Serialize)]
pub struct CancellationResult {
    /// Raw provider status reported after the cancellation
    pub status: String,
}

/// Result of creating a customer portal session
#[derive(Debug, Clone, Serialize)]
pub struct PortalSession {
    pub url: String,
}

// ============================================================================
// Payment Provider Port
// ============================================================================

/// Payment provider port - abstracts the provider operations this engine needs.
///
/// Implementations are constructed once at startup and injected; there is no
/// process-wide client.
#[async_trait]
pub trait PaymentProviderPort: Send + Sync {
    /// Get the provider type
    fn provider(&self) -> PaymentProvider;

    /// Create a hosted checkout session for a new subscription.
    async fn create_checkout(&self, request: &CheckoutRequest) -> AppResult<CheckoutResult>;

    /// Cancel a subscription immediately.
    async fn cancel_subscription(
        &self,
        subscription_id: &SubscriptionId,
    ) -> AppResult<CancellationResult>;

    /// Create a hosted account-management session for an existing customer.
    async fn create_portal_session(
        &self,
        customer_id: &CustomerId,
        return_url: &str,
    ) -> AppResult<PortalSession>;
}
