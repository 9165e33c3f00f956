use tracing::instrument;
use uuid::Uuid;

use crate::{
    app_error::AppResult, application::jwt::AuthenticatedUser,
    application::use_cases::subscription::SubscriptionRegistry,
};

/// Self-service cancellation of a subscription that is still trialing.
#[derive(Clone)]
pub struct CancellationUseCases {
    subscriptions: SubscriptionRegistry,
}

impl CancellationUseCases {
    pub fn new(subscriptions: SubscriptionRegistry) -> Self {
        Self { subscriptions }
    }

    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn cancel_trial(
        &self,
        user: &AuthenticatedUser,
        subscription_id: Uuid,
    ) -> AppResult<()> {
        self.subscriptions
            .cancel_trialing_subscription(subscription_id, user.id)
            .await
    }
}
