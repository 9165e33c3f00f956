use async_trait::async_trait;

use crate::{
    app_error::AppResult,
    application::ports::payment_provider::{
        CancellationResult, CheckoutRequest, CheckoutResult, CustomerId, PaymentProviderPort,
        PortalSession, SubscriptionId,
    },
    domain::entities::payment_provider::PaymentProvider,
    infra::stripe_client::StripeClient,
};

/// Adapter that wraps StripeClient to implement PaymentProviderPort.
#[derive(Clone)]
pub struct StripePaymentAdapter {
    client: StripeClient,
}

impl StripePaymentAdapter {
    pub fn new(client: StripeClient) -> Self {
        Self { client }
    }

    /// Flatten a checkout request into Stripe's bracketed form encoding.
    ///
    /// Trial settings are only sent for a non-zero allowance, and a trial
    /// without a payment method ends in cancellation instead of a paid
    /// subscription.
    fn checkout_params(request: &CheckoutRequest) -> Vec<(String, String)> {
        let user_id = request.user_id.to_string();
        let trial_days = request.trial.as_days().to_string();

        let mut params: Vec<(String, String)> = vec![
            ("mode".into(), "subscription".into()),
            ("customer_email".into(), request.email.clone()),
            ("line_items[0][price]".into(), request.price_id.clone()),
            ("line_items[0][quantity]".into(), request.quantity.to_string()),
            ("success_url".into(), request.urls.success_url.clone()),
            ("cancel_url".into(), request.urls.cancel_url.clone()),
            ("client_reference_id".into(), user_id.clone()),
        ];

        for prefix in ["metadata", "subscription_data[metadata]"] {
            params.push((format!("{}[user_id]", prefix), user_id.clone()));
            params.push((format!("{}[plan]", prefix), request.plan.to_string()));
            params.push((format!("{}[trial_days]", prefix), trial_days.clone()));
        }

        if request.trial.is_granted() {
            params.push(("subscription_data[trial_period_days]".into(), trial_days));
            params.push((
                "subscription_data[trial_settings][end_behavior][missing_payment_method]".into(),
                "cancel".into(),
            ));
            params.push(("payment_method_collection".into(), "if_required".into()));
        }

        params
    }
}

#[async_trait]
impl PaymentProviderPort for StripePaymentAdapter {
    fn provider(&self) -> PaymentProvider {
        PaymentProvider::Stripe
    }

    async fn create_checkout(&self, request: &CheckoutRequest) -> AppResult<CheckoutResult> {
        let session = self
            .client
            .create_checkout_session(&Self::checkout_params(request))
            .await?;

        Ok(CheckoutResult {
            session_id: session.id,
            checkout_url: session.url,
        })
    }

    async fn cancel_subscription(
        &self,
        subscription_id: &SubscriptionId,
    ) -> AppResult<CancellationResult> {
        let sub = self.client.cancel_subscription(subscription_id.as_str()).await?;
        tracing::debug!(subscription_id = %sub.id, status = %sub.status, "Stripe subscription cancelled");
        Ok(CancellationResult { status: sub.status })
    }

    async fn create_portal_session(
        &self,
        customer_id: &CustomerId,
        return_url: &str,
    ) -> AppResult<PortalSession> {
        let session = self
            .client
            .create_portal_session(customer_id.as_str(), return_url)
            .await?;
        Ok(PortalSession { url: session.url })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::entities::{plan::Plan, trial_allowance::TrialAllowance},
        test_utils::test_urls,
    };
    use uuid::Uuid;

    fn request(trial: TrialAllowance) -> CheckoutRequest {
        CheckoutRequest {
            user_id: Uuid::new_v4(),
            email: "a@example.com".to_string(),
            plan: Plan::Yearly,
            price_id: "price_y".to_string(),
            quantity: 1,
            trial,
            urls: test_urls(),
        }
    }

    fn get<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
        params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn builds_subscription_checkout_with_trial() {
        let req = request(TrialAllowance::days(5));
        let params = StripePaymentAdapter::checkout_params(&req);

        assert_eq!(get(&params, "mode"), Some("subscription"));
        assert_eq!(get(&params, "customer_email"), Some("a@example.com"));
        assert_eq!(get(&params, "line_items[0][price]"), Some("price_y"));
        assert_eq!(get(&params, "line_items[0][quantity]"), Some("1"));
        assert_eq!(get(&params, "subscription_data[trial_period_days]"), Some("5"));
        assert_eq!(
            get(
                &params,
                "subscription_data[trial_settings][end_behavior][missing_payment_method]"
            ),
            Some("cancel")
        );
        assert_eq!(get(&params, "payment_method_collection"), Some("if_required"));
        assert_eq!(get(&params, "metadata[plan]"), Some("YEARLY"));
        assert_eq!(
            get(&params, "subscription_data[metadata][user_id]"),
            Some(req.user_id.to_string().as_str())
        );
    }

    #[test]
    fn zero_trial_sends_no_trial_configuration() {
        let params = StripePaymentAdapter::checkout_params(&request(TrialAllowance::NONE));

        assert!(get(&params, "subscription_data[trial_period_days]").is_none());
        assert!(get(&params, "payment_method_collection").is_none());
        assert!(
            !params
                .iter()
                .any(|(k, _)| k.starts_with("subscription_data[trial_settings]"))
        );
        assert_eq!(get(&params, "metadata[trial_days]"), Some("0"));
    }
}
