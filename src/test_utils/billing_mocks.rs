//! In-memory mock implementations for the billing repository traits and the
//! payment provider port.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult},
    application::{
        ports::payment_provider::{
            CancellationResult, CheckoutRequest, CheckoutResult, CustomerId, PaymentProviderPort,
            PortalSession, SubscriptionId,
        },
        use_cases::{
            checkout_session::{CheckoutSessionRepo, CreateCheckoutSessionInput},
            subscription::SubscriptionRepo,
        },
    },
    domain::entities::{
        checkout_session::{CheckoutSession, CheckoutSessionStatus},
        payment_provider::PaymentProvider,
        plan::Plan,
        subscription::{Subscription, SubscriptionStatus},
    },
};

// ============================================================================
// InMemorySubscriptionRepo
// ============================================================================

#[derive(Default)]
pub struct InMemorySubscriptionRepo {
    pub subscriptions: Mutex<HashMap<Uuid, Subscription>>,
}

impl InMemorySubscriptionRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_subscriptions(subscriptions: Vec<Subscription>) -> Self {
        let map = subscriptions.into_iter().map(|s| (s.id, s)).collect();
        Self {
            subscriptions: Mutex::new(map),
        }
    }

    pub fn insert(&self, subscription: Subscription) {
        self.subscriptions
            .lock()
            .unwrap()
            .insert(subscription.id, subscription);
    }

    pub fn get(&self, id: Uuid) -> Option<Subscription> {
        self.subscriptions.lock().unwrap().get(&id).cloned()
    }
}

#[async_trait]
impl SubscriptionRepo for InMemorySubscriptionRepo {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Subscription>> {
        Ok(self.get(id))
    }

    async fn list_non_terminal_by_user(&self, user_id: Uuid) -> AppResult<Vec<Subscription>> {
        let mut subs: Vec<Subscription> = self
            .subscriptions
            .lock()
            .unwrap()
            .values()
            .filter(|s| s.user_id == user_id && s.status.is_non_terminal())
            .cloned()
            .collect();
        subs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(subs)
    }

    async fn get_last_by_user_and_status(
        &self,
        user_id: Uuid,
        status: SubscriptionStatus,
    ) -> AppResult<Option<Subscription>> {
        Ok(self
            .subscriptions
            .lock()
            .unwrap()
            .values()
            .filter(|s| s.user_id == user_id && s.status == status)
            .max_by_key(|s| s.created_at)
            .cloned())
    }

    async fn get_latest_by_user(&self, user_id: Uuid) -> AppResult<Option<Subscription>> {
        Ok(self
            .subscriptions
            .lock()
            .unwrap()
            .values()
            .filter(|s| s.user_id == user_id)
            .max_by_key(|s| s.created_at)
            .cloned())
    }
}

// ============================================================================
// InMemoryCheckoutSessionRepo
// ============================================================================

/// Mirrors the Postgres adapter, including the unique index on ACTIVE
/// sessions per (user, plan).
#[derive(Default)]
pub struct InMemoryCheckoutSessionRepo {
    pub sessions: Mutex<HashMap<Uuid, CheckoutSession>>,
    fail_inserts: AtomicBool,
}

impl InMemoryCheckoutSessionRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sessions(sessions: Vec<CheckoutSession>) -> Self {
        let map = sessions.into_iter().map(|s| (s.id, s)).collect();
        Self {
            sessions: Mutex::new(map),
            fail_inserts: AtomicBool::new(false),
        }
    }

    pub fn insert(&self, session: CheckoutSession) {
        self.sessions.lock().unwrap().insert(session.id, session);
    }

    pub fn get(&self, id: Uuid) -> Option<CheckoutSession> {
        self.sessions.lock().unwrap().get(&id).cloned()
    }

    pub fn all(&self) -> Vec<CheckoutSession> {
        let mut sessions: Vec<CheckoutSession> =
            self.sessions.lock().unwrap().values().cloned().collect();
        sessions.sort_by_key(|s| s.created_at);
        sessions
    }

    pub fn count(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }

    /// Make every subsequent `create` fail as if the database were down.
    pub fn fail_inserts(&self) {
        self.fail_inserts.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl CheckoutSessionRepo for InMemoryCheckoutSessionRepo {
    async fn get_latest_active(
        &self,
        user_id: Uuid,
        plan: Plan,
    ) -> AppResult<Option<CheckoutSession>> {
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .values()
            .filter(|s| {
                s.user_id == user_id && s.plan == plan && s.status == CheckoutSessionStatus::Active
            })
            .max_by_key(|s| s.created_at)
            .cloned())
    }

    async fn create(&self, input: &CreateCheckoutSessionInput) -> AppResult<CheckoutSession> {
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(AppError::Database("Database operation failed".into()));
        }

        let mut sessions = self.sessions.lock().unwrap();
        for existing in sessions.values_mut() {
            if existing.user_id == input.user_id
                && existing.plan == input.plan
                && existing.status == CheckoutSessionStatus::Active
                && existing.expires_at <= input.created_at
            {
                existing.status = CheckoutSessionStatus::Expired;
            }
        }
        let conflict = sessions.values().any(|s| {
            s.user_id == input.user_id
                && s.plan == input.plan
                && s.status == CheckoutSessionStatus::Active
        });
        if conflict {
            return Err(AppError::Database("Duplicate record".into()));
        }

        let session = CheckoutSession {
            id: Uuid::new_v4(),
            user_id: input.user_id,
            plan: input.plan,
            session_id: input.session_id.clone(),
            checkout_url: input.checkout_url.clone(),
            status: CheckoutSessionStatus::Active,
            created_at: input.created_at,
            expires_at: input.expires_at,
        };
        sessions.insert(session.id, session.clone());
        Ok(session)
    }

    async fn expire_stale(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let mut count = 0;
        for session in self.sessions.lock().unwrap().values_mut() {
            if session.status == CheckoutSessionStatus::Active && session.expires_at <= now {
                session.status = CheckoutSessionStatus::Expired;
                count += 1;
            }
        }
        Ok(count)
    }
}

// ============================================================================
// MockPaymentProvider
// ============================================================================

/// Records every call and answers with synthetic ids.
#[derive(Default)]
pub struct MockPaymentProvider {
    checkout_calls: AtomicUsize,
    cancel_calls: AtomicUsize,
    portal_calls: AtomicUsize,
    last_checkout: Mutex<Option<CheckoutRequest>>,
    last_cancelled: Mutex<Option<String>>,
    last_portal_return_url: Mutex<Option<String>>,
    failure: Mutex<Option<String>>,
    omit_checkout_url: AtomicBool,
    cancel_status: Mutex<Option<String>>,
    checkout_delay: Mutex<Option<std::time::Duration>>,
}

impl MockPaymentProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with `ProviderError(message)`.
    pub fn fail_with(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_string());
    }

    /// Answer checkout requests with a session id but no URL.
    pub fn omit_checkout_url(&self) {
        self.omit_checkout_url.store(true, Ordering::SeqCst);
    }

    /// Hold each checkout call open for `delay` before answering.
    pub fn delay_checkout(&self, delay: std::time::Duration) {
        *self.checkout_delay.lock().unwrap() = Some(delay);
    }

    /// Status string reported by `cancel_subscription` (default `canceled`).
    pub fn cancel_status(&self, status: &str) {
        *self.cancel_status.lock().unwrap() = Some(status.to_string());
    }

    pub fn checkout_calls(&self) -> usize {
        self.checkout_calls.load(Ordering::SeqCst)
    }

    pub fn cancel_calls(&self) -> usize {
        self.cancel_calls.load(Ordering::SeqCst)
    }

    pub fn portal_calls(&self) -> usize {
        self.portal_calls.load(Ordering::SeqCst)
    }

    pub fn last_checkout(&self) -> Option<CheckoutRequest> {
        self.last_checkout.lock().unwrap().clone()
    }

    pub fn last_cancelled(&self) -> Option<String> {
        self.last_cancelled.lock().unwrap().clone()
    }

    pub fn last_portal_return_url(&self) -> Option<String> {
        self.last_portal_return_url.lock().unwrap().clone()
    }

    fn check_failure(&self) -> AppResult<()> {
        match self.failure.lock().unwrap().as_ref() {
            Some(msg) => Err(AppError::ProviderError(msg.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl PaymentProviderPort for MockPaymentProvider {
    fn provider(&self) -> PaymentProvider {
        PaymentProvider::Dummy
    }

    async fn create_checkout(&self, request: &CheckoutRequest) -> AppResult<CheckoutResult> {
        self.checkout_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.checkout_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.check_failure()?;
        *self.last_checkout.lock().unwrap() = Some(request.clone());

        let session_id = format!("cs_mock_{}", Uuid::new_v4().simple());
        let checkout_url = if self.omit_checkout_url.load(Ordering::SeqCst) {
            None
        } else {
            Some(format!("https://checkout.mock/{}", session_id))
        };
        Ok(CheckoutResult {
            session_id: Some(session_id),
            checkout_url,
        })
    }

    async fn cancel_subscription(
        &self,
        subscription_id: &SubscriptionId,
    ) -> AppResult<CancellationResult> {
        self.cancel_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        *self.last_cancelled.lock().unwrap() = Some(subscription_id.as_str().to_string());
        let status = self
            .cancel_status
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| "canceled".to_string());
        Ok(CancellationResult { status })
    }

    async fn create_portal_session(
        &self,
        customer_id: &CustomerId,
        return_url: &str,
    ) -> AppResult<PortalSession> {
        self.portal_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        *self.last_portal_return_url.lock().unwrap() = Some(return_url.to_string());
        Ok(PortalSession {
            url: format!("https://portal.mock/{}", customer_id),
        })
    }
}
