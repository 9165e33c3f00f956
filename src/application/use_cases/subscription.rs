use std::sync::Arc;

use async_trait::async_trait;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult},
    application::ports::payment_provider::{PaymentProviderPort, SubscriptionId},
    domain::entities::subscription::{Subscription, SubscriptionStatus, map_provider_status},
};

// ============================================================================
// Repository Traits
// ============================================================================

#[async_trait]
pub trait SubscriptionRepo: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Subscription>>;

    /// All of the user's subscriptions whose status is not CANCELLED.
    async fn list_non_terminal_by_user(&self, user_id: Uuid) -> AppResult<Vec<Subscription>>;

    /// Most recently created subscription for the user with the given status.
    async fn get_last_by_user_and_status(
        &self,
        user_id: Uuid,
        status: SubscriptionStatus,
    ) -> AppResult<Option<Subscription>>;

    /// Most recently created subscription for the user, any status.
    async fn get_latest_by_user(&self, user_id: Uuid) -> AppResult<Option<Subscription>>;
}

// ============================================================================
// Registry
// ============================================================================

/// Read side of the user's subscription records plus self-service trial
/// cancellation.
///
/// The registry never writes `Subscription.status`; the provider event feed
/// owns that column.
#[derive(Clone)]
pub struct SubscriptionRegistry {
    repo: Arc<dyn SubscriptionRepo>,
    provider: Arc<dyn PaymentProviderPort>,
}

impl SubscriptionRegistry {
    pub fn new(repo: Arc<dyn SubscriptionRepo>, provider: Arc<dyn PaymentProviderPort>) -> Self {
        Self { repo, provider }
    }

    /// The user's single non-terminal subscription, if any.
    ///
    /// More than one is an integrity violation and is refused rather than
    /// resolved.
    #[instrument(skip(self))]
    pub async fn get_active_subscription(&self, user_id: Uuid) -> AppResult<Option<Subscription>> {
        let mut subs = self.repo.list_non_terminal_by_user(user_id).await?;
        match subs.len() {
            0 => Ok(None),
            1 => Ok(subs.pop()),
            count => {
                tracing::error!(
                    user_id = %user_id,
                    count,
                    ids = ?subs.iter().map(|s| s.id).collect::<Vec<_>>(),
                    "User has more than one non-terminal subscription"
                );
                Err(AppError::MultipleActiveSubscriptions)
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn get_last_cancelled_subscription(
        &self,
        user_id: Uuid,
    ) -> AppResult<Option<Subscription>> {
        self.repo
            .get_last_by_user_and_status(user_id, SubscriptionStatus::Cancelled)
            .await
    }

    #[instrument(skip(self))]
    pub async fn get_latest_subscription(&self, user_id: Uuid) -> AppResult<Option<Subscription>> {
        self.repo.get_latest_by_user(user_id).await
    }

    /// Ask the provider to cancel a subscription that is still in its trial.
    ///
    /// Local status is left alone; the CANCELLED transition arrives later
    /// through the provider event feed.
    #[instrument(skip(self))]
    pub async fn cancel_trialing_subscription(
        &self,
        subscription_id: Uuid,
        user_id: Uuid,
    ) -> AppResult<()> {
        let sub = self
            .repo
            .get_by_id(subscription_id)
            .await?
            .ok_or(AppError::NotFound)?;

        if !sub.is_owned_by(user_id) {
            tracing::warn!(
                subscription_id = %subscription_id,
                owner_id = %sub.user_id,
                "Cancellation attempted by non-owner"
            );
            return Err(AppError::Forbidden);
        }

        if sub.status != SubscriptionStatus::Trialing {
            return Err(AppError::InvalidState(format!(
                "Only trialing subscriptions can be cancelled here (current status: {})",
                sub.status
            )));
        }

        let provider_sub_id = sub.provider_subscription_id.as_deref().ok_or_else(|| {
            AppError::InvalidState("Subscription is not linked to the payment provider".into())
        })?;

        let result = self
            .provider
            .cancel_subscription(&SubscriptionId::new(provider_sub_id))
            .await?;

        match map_provider_status(&result.status) {
            Ok(status) => tracing::info!(
                subscription_id = %subscription_id,
                provider = %self.provider.provider(),
                provider_status = %status,
                "Trial cancellation accepted by provider"
            ),
            Err(e) => tracing::warn!(
                subscription_id = %subscription_id,
                error = %e,
                "Provider returned an unrecognised status after cancellation"
            ),
        }

        Ok(())
    }
}
