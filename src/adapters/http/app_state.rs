use std::sync::Arc;

use crate::{
    infra::config::AppConfig,
    use_cases::{
        cancellation::CancellationUseCases, checkout::CheckoutUseCases,
        checkout_session::CheckoutSessionStore, portal::PortalUseCases,
        subscription::SubscriptionRegistry,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub checkout_use_cases: Arc<CheckoutUseCases>,
    pub cancellation_use_cases: Arc<CancellationUseCases>,
    pub portal_use_cases: Arc<PortalUseCases>,
    pub subscription_registry: Arc<SubscriptionRegistry>,
    /// Used by the background expiry pass.
    pub checkout_sessions: Arc<CheckoutSessionStore>,
}
