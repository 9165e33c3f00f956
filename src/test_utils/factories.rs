//! Test data factories.
//!
//! Each factory returns a complete, valid object. Use the closure parameter to
//! override specific fields.

use chrono::Utc;
use uuid::Uuid;

use crate::{
    application::{
        jwt::AuthenticatedUser, ports::payment_provider::CheckoutUrls,
        use_cases::checkout::PricingConfig,
    },
    domain::entities::{
        checkout_session::{CheckoutSession, CheckoutSessionStatus},
        plan::Plan,
        subscription::{Subscription, SubscriptionStatus},
    },
};

/// Create an ACTIVE monthly subscription linked to the provider.
pub fn create_test_subscription(
    user_id: Uuid,
    overrides: impl FnOnce(&mut Subscription),
) -> Subscription {
    let now = Utc::now();
    let id = Uuid::new_v4();
    let mut sub = Subscription {
        id,
        user_id,
        plan: Plan::Monthly,
        status: SubscriptionStatus::Active,
        provider_customer_id: Some(format!("cus_test_{}", user_id.simple())),
        provider_subscription_id: Some(format!("sub_test_{}", id.simple())),
        trial_consumed: false,
        trial_remaining_days: 0,
        created_at: now,
        updated_at: now,
    };
    overrides(&mut sub);
    sub
}

/// Create a fresh ACTIVE checkout session that expires in 24 hours.
pub fn create_test_checkout_session(
    user_id: Uuid,
    plan: Plan,
    overrides: impl FnOnce(&mut CheckoutSession),
) -> CheckoutSession {
    let now = Utc::now();
    let session_id = format!("cs_test_{}", Uuid::new_v4().simple());
    let mut session = CheckoutSession {
        id: Uuid::new_v4(),
        user_id,
        plan,
        checkout_url: format!("https://checkout.example/{}", session_id),
        session_id,
        status: CheckoutSessionStatus::Active,
        created_at: now,
        expires_at: CheckoutSession::expiry_for(now),
    };
    overrides(&mut session);
    session
}

/// A distinct authenticated user per call.
pub fn test_user() -> AuthenticatedUser {
    AuthenticatedUser {
        id: Uuid::new_v4(),
        email: "user@example.com".to_string(),
    }
}

pub fn test_pricing() -> PricingConfig {
    PricingConfig::new(
        Some("price_monthly".to_string()),
        Some("price_yearly".to_string()),
    )
}

pub fn test_urls() -> CheckoutUrls {
    CheckoutUrls {
        success_url: "https://app.example/billing/success?session_id={CHECKOUT_SESSION_ID}"
            .to_string(),
        cancel_url: "https://app.example/billing/cancel".to_string(),
    }
}
