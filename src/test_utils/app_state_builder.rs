//! Test app state builder for HTTP-level testing.
//!
//! `TestAppStateBuilder` creates an `AppState` backed by in-memory repos and a
//! recording payment provider, wired the same way as production.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderValue;
use secrecy::SecretString;

use crate::{
    adapters::http::app_state::AppState,
    application::{jwt, jwt::AuthenticatedUser, use_cases::checkout::PricingConfig},
    domain::entities::{
        checkout_session::CheckoutSession, payment_provider::PaymentProvider,
        subscription::Subscription,
    },
    infra::{config::AppConfig, setup::build_app_state},
    test_utils::{
        InMemoryCheckoutSessionRepo, InMemorySubscriptionRepo, MockPaymentProvider, test_pricing,
    },
};

pub const TEST_JWT_SECRET: &str = "test-jwt-secret-test-jwt-secret-0123";

/// Handles onto the mocks behind a built `AppState`.
pub struct TestMocks {
    pub subscriptions: Arc<InMemorySubscriptionRepo>,
    pub sessions: Arc<InMemoryCheckoutSessionRepo>,
    pub provider: Arc<MockPaymentProvider>,
}

pub struct TestAppStateBuilder {
    subscriptions: Vec<Subscription>,
    sessions: Vec<CheckoutSession>,
    pricing: PricingConfig,
}

impl Default for TestAppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestAppStateBuilder {
    pub fn new() -> Self {
        Self {
            subscriptions: Vec::new(),
            sessions: Vec::new(),
            pricing: test_pricing(),
        }
    }

    pub fn with_subscription(mut self, subscription: Subscription) -> Self {
        self.subscriptions.push(subscription);
        self
    }

    pub fn with_session(mut self, session: CheckoutSession) -> Self {
        self.sessions.push(session);
        self
    }

    pub fn with_pricing(mut self, pricing: PricingConfig) -> Self {
        self.pricing = pricing;
        self
    }

    pub fn build(self) -> AppState {
        self.build_with_mocks().0
    }

    pub fn build_with_mocks(self) -> (AppState, TestMocks) {
        let subscriptions = Arc::new(InMemorySubscriptionRepo::with_subscriptions(
            self.subscriptions,
        ));
        let sessions = Arc::new(InMemoryCheckoutSessionRepo::with_sessions(self.sessions));
        let provider = Arc::new(MockPaymentProvider::new());

        let app_state = build_app_state(
            test_config(self.pricing),
            subscriptions.clone(),
            sessions.clone(),
            provider.clone(),
        );

        (
            app_state,
            TestMocks {
                subscriptions,
                sessions,
                provider,
            },
        )
    }
}

pub fn test_config(pricing: PricingConfig) -> AppConfig {
    AppConfig {
        jwt_secret: SecretString::from(TEST_JWT_SECRET.to_string()),
        app_origin: "https://app.example".parse().expect("valid test origin"),
        cors_origin: HeaderValue::from_static("http://localhost:3000"),
        bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
        database_url: "postgres://localhost/billing_test".to_string(),
        payment_provider: PaymentProvider::Dummy,
        stripe_secret_key: None,
        pricing,
        provider_timeout: Duration::from_secs(1),
        session_expiry_interval: Duration::from_secs(60),
    }
}

/// `Authorization` header value for `user`, signed with the test secret.
pub fn bearer_for(user: &AuthenticatedUser) -> String {
    let token = jwt::issue(
        user.id,
        &user.email,
        &SecretString::from(TEST_JWT_SECRET.to_string()),
        time::Duration::minutes(5),
    )
    .expect("token issues");
    format!("Bearer {}", token)
}
