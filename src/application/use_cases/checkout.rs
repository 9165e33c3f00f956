use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::instrument;

use crate::{
    app_error::{AppError, AppResult},
    application::{
        jwt::AuthenticatedUser,
        ports::payment_provider::{CheckoutRequest, CheckoutUrls, PaymentProviderPort},
        use_cases::{
            checkout_session::{CheckoutSessionStore, CreateCheckoutSessionInput},
            subscription::SubscriptionRegistry,
        },
    },
    domain::entities::{
        plan::Plan,
        trial_allowance::{TrialAllowance, compute_trial_days},
    },
};

/// Provider price ids per plan, as loaded from configuration.
#[derive(Debug, Clone, Default)]
pub struct PricingConfig {
    pub monthly_price_id: Option<String>,
    pub yearly_price_id: Option<String>,
}

impl PricingConfig {
    pub fn new(monthly_price_id: Option<String>, yearly_price_id: Option<String>) -> Self {
        let clean = |id: Option<String>| id.filter(|s| !s.trim().is_empty());
        Self {
            monthly_price_id: clean(monthly_price_id),
            yearly_price_id: clean(yearly_price_id),
        }
    }

    /// Price id for `plan`. Both ids must be configured: a half-configured
    /// deployment fails every plan, not just the missing one.
    pub fn resolve(&self, plan: Plan) -> AppResult<&str> {
        let (Some(monthly), Some(yearly)) = (&self.monthly_price_id, &self.yearly_price_id) else {
            tracing::error!(
                monthly_configured = self.monthly_price_id.is_some(),
                yearly_configured = self.yearly_price_id.is_some(),
                "Plan pricing is incomplete"
            );
            return Err(AppError::MisconfiguredPricing);
        };
        Ok(match plan {
            Plan::Monthly => monthly.as_str(),
            Plan::Yearly => yearly.as_str(),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckoutOutcome {
    pub url: String,
    /// True when an earlier, still-valid session was handed back.
    pub reused: bool,
    /// Trial granted to a newly created session; `None` when reused.
    pub trial: Option<TrialAllowance>,
}

/// Decides between reusing a checkout link, refusing, or opening a new
/// provider checkout with the right trial.
#[derive(Clone)]
pub struct CheckoutUseCases {
    sessions: CheckoutSessionStore,
    subscriptions: SubscriptionRegistry,
    provider: Arc<dyn PaymentProviderPort>,
    pricing: PricingConfig,
    urls: CheckoutUrls,
}

impl CheckoutUseCases {
    pub fn new(
        sessions: CheckoutSessionStore,
        subscriptions: SubscriptionRegistry,
        provider: Arc<dyn PaymentProviderPort>,
        pricing: PricingConfig,
        urls: CheckoutUrls,
    ) -> Self {
        Self {
            sessions,
            subscriptions,
            provider,
            pricing,
            urls,
        }
    }

    /// Reads here are independent; two concurrent calls for the same user and
    /// plan may both create provider sessions. The partial unique index on
    /// active sessions turns the second insert into a logged failure.
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn create_checkout(
        &self,
        user: &AuthenticatedUser,
        raw_plan: &str,
    ) -> AppResult<CheckoutOutcome> {
        let plan = Plan::parse(raw_plan)?;
        let price_id = self.pricing.resolve(plan)?;

        if let Some(session) = self
            .sessions
            .find_reusable_session(user.id, plan, Utc::now())
            .await?
        {
            tracing::info!(
                session_id = %session.session_id,
                plan = %plan,
                "Reusing existing checkout session"
            );
            return Ok(CheckoutOutcome {
                url: session.checkout_url,
                reused: true,
                trial: None,
            });
        }

        let last_cancelled = self
            .subscriptions
            .get_last_cancelled_subscription(user.id)
            .await?;
        let trial = compute_trial_days(last_cancelled.as_ref());

        if let Some(existing) = self.subscriptions.get_active_subscription(user.id).await? {
            tracing::info!(
                subscription_id = %existing.id,
                status = %existing.status,
                "Checkout refused: user already has a subscription"
            );
            return Err(AppError::AlreadySubscribed);
        }

        let request = CheckoutRequest {
            user_id: user.id,
            email: user.email.clone(),
            plan,
            price_id: price_id.to_string(),
            quantity: 1,
            trial,
            urls: self.urls.clone(),
        };

        let result = self.provider.create_checkout(&request).await?;
        let (Some(session_id), Some(checkout_url)) = (result.session_id, result.checkout_url) else {
            return Err(AppError::ProviderError(
                "Checkout session response is missing its id or url".into(),
            ));
        };

        let input = CreateCheckoutSessionInput::new(
            user.id,
            plan,
            session_id.clone(),
            checkout_url.clone(),
            Utc::now(),
        );
        if let Err(e) = self.sessions.record_session(&input).await {
            // The provider session exists already; the user keeps the link.
            tracing::error!(
                session_id = %session_id,
                error = ?e,
                "Failed to record checkout session"
            );
        }

        tracing::info!(
            session_id = %session_id,
            plan = %plan,
            trial = %trial,
            provider = %self.provider.provider(),
            "Created checkout session"
        );

        Ok(CheckoutOutcome {
            url: checkout_url,
            reused: false,
            trial: Some(trial),
        })
    }
}
