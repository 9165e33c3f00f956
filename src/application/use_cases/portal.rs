use std::sync::Arc;

use tracing::instrument;
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult},
    application::{
        ports::payment_provider::{CustomerId, PaymentProviderPort},
        use_cases::subscription::SubscriptionRegistry,
    },
};

/// Hands out provider-hosted billing management links.
#[derive(Clone)]
pub struct PortalUseCases {
    subscriptions: SubscriptionRegistry,
    provider: Arc<dyn PaymentProviderPort>,
    return_url: String,
}

impl PortalUseCases {
    pub fn new(
        subscriptions: SubscriptionRegistry,
        provider: Arc<dyn PaymentProviderPort>,
        return_url: String,
    ) -> Self {
        Self {
            subscriptions,
            provider,
            return_url,
        }
    }

    /// The latest subscription decides the customer, whatever its status.
    #[instrument(skip(self))]
    pub async fn create_portal_session(&self, user_id: Uuid) -> AppResult<String> {
        let customer_id = self
            .subscriptions
            .get_latest_subscription(user_id)
            .await?
            .and_then(|s| s.provider_customer_id)
            .filter(|id| !id.is_empty())
            .ok_or(AppError::NoBillingAccount)?;

        let session = self
            .provider
            .create_portal_session(&CustomerId::new(customer_id), &self.return_url)
            .await?;

        Ok(session.url)
    }
}
