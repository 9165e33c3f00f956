use async_trait::async_trait;
use url::Url;
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult},
    application::ports::payment_provider::{
        CancellationResult, CheckoutRequest, CheckoutResult, CustomerId, PaymentProviderPort,
        PortalSession, SubscriptionId,
    },
    domain::entities::payment_provider::PaymentProvider,
};

/// Local payment provider for development without provider credentials.
///
/// Nothing leaves the process. Checkout links point back at the app itself.
#[derive(Clone)]
pub struct DummyPaymentClient {
    app_origin: Url,
}

impl DummyPaymentClient {
    pub fn new(app_origin: Url) -> Self {
        Self { app_origin }
    }

    fn app_url(&self, path: &str) -> String {
        format!("{}/{}", self.app_origin.as_str().trim_end_matches('/'), path)
    }
}

#[async_trait]
impl PaymentProviderPort for DummyPaymentClient {
    fn provider(&self) -> PaymentProvider {
        PaymentProvider::Dummy
    }

    async fn create_checkout(&self, request: &CheckoutRequest) -> AppResult<CheckoutResult> {
        let session_id = format!("dummy_cs_{}", Uuid::new_v4().simple());
        tracing::info!(
            session_id = %session_id,
            plan = %request.plan,
            trial = %request.trial,
            "Dummy checkout session created"
        );
        Ok(CheckoutResult {
            checkout_url: Some(self.app_url(&format!(
                "billing/dummy-checkout?session_id={}",
                session_id
            ))),
            session_id: Some(session_id),
        })
    }

    async fn cancel_subscription(
        &self,
        subscription_id: &SubscriptionId,
    ) -> AppResult<CancellationResult> {
        tracing::info!(subscription_id = %subscription_id, "Dummy subscription cancelled");
        Ok(CancellationResult {
            status: "canceled".to_string(),
        })
    }

    async fn create_portal_session(
        &self,
        customer_id: &CustomerId,
        return_url: &str,
    ) -> AppResult<PortalSession> {
        let mut url = Url::parse(&self.app_url("billing/dummy-portal"))
            .map_err(|e| AppError::Internal(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("customer", customer_id.as_str())
            .append_pair("return_url", return_url);
        Ok(PortalSession { url: url.into() })
    }
}
