use crate::{
    adapters::http::app_state::AppState,
    application::ports::payment_provider::PaymentProviderPort,
    domain::entities::payment_provider::PaymentProvider,
    infra::{
        config::AppConfig, dummy_payment_client::DummyPaymentClient, postgres_persistence,
        stripe_client::StripeClient, stripe_payment_adapter::StripePaymentAdapter,
    },
    use_cases::{
        cancellation::CancellationUseCases,
        checkout::CheckoutUseCases,
        checkout_session::{CheckoutSessionRepo, CheckoutSessionStore},
        portal::PortalUseCases,
        subscription::{SubscriptionRegistry, SubscriptionRepo},
    },
};
use std::fs::File;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub async fn init_app_state() -> anyhow::Result<AppState> {
    let config = AppConfig::from_env();

    let postgres_arc = Arc::new(postgres_persistence(&config.database_url).await?);
    let provider = payment_provider(&config)?;

    tracing::info!(
        provider = provider.provider().display_name(),
        "Payment provider configured"
    );

    Ok(build_app_state(
        config,
        postgres_arc.clone() as Arc<dyn SubscriptionRepo>,
        postgres_arc as Arc<dyn CheckoutSessionRepo>,
        provider,
    ))
}

/// Construct the provider selected by `PAYMENT_PROVIDER`.
pub fn payment_provider(config: &AppConfig) -> anyhow::Result<Arc<dyn PaymentProviderPort>> {
    match config.payment_provider {
        PaymentProvider::Stripe => {
            let Some(secret_key) = config.stripe_secret_key.clone() else {
                anyhow::bail!("STRIPE_SECRET_KEY is required when PAYMENT_PROVIDER=stripe");
            };
            let client = StripeClient::new(secret_key, config.provider_timeout)?;
            Ok(Arc::new(StripePaymentAdapter::new(client)))
        }
        PaymentProvider::Dummy => {
            tracing::warn!("Using the dummy payment provider; no real payments will be taken");
            Ok(Arc::new(DummyPaymentClient::new(config.app_origin.clone())))
        }
    }
}

/// Wire repositories and the provider into the use cases.
pub fn build_app_state(
    config: AppConfig,
    subscription_repo: Arc<dyn SubscriptionRepo>,
    session_repo: Arc<dyn CheckoutSessionRepo>,
    provider: Arc<dyn PaymentProviderPort>,
) -> AppState {
    let sessions = CheckoutSessionStore::new(session_repo);
    let registry = SubscriptionRegistry::new(subscription_repo, provider.clone());

    let checkout_use_cases = CheckoutUseCases::new(
        sessions.clone(),
        registry.clone(),
        provider.clone(),
        config.pricing.clone(),
        config.checkout_urls(),
    );
    let cancellation_use_cases = CancellationUseCases::new(registry.clone());
    let portal_use_cases =
        PortalUseCases::new(registry.clone(), provider, config.portal_return_url());

    AppState {
        config: Arc::new(config),
        checkout_use_cases: Arc::new(checkout_use_cases),
        cancellation_use_cases: Arc::new(cancellation_use_cases),
        portal_use_cases: Arc::new(portal_use_cases),
        subscription_registry: Arc::new(registry),
        checkout_sessions: Arc::new(sessions),
    }
}

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "subscription_billing=debug,tower_http=debug".into());

    // Console (pretty logs)
    let console_layer = fmt::layer().with_target(false).with_level(true).pretty();

    // File (structured JSON logs), skipped when the file cannot be created
    let json_layer = match File::create("app.log") {
        Ok(file) => Some(
            fmt::layer()
                .json()
                .with_writer(file)
                .with_current_span(true)
                .with_span_list(true),
        ),
        Err(e) => {
            eprintln!("app.log unavailable, logging to console only: {e}");
            None
        }
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(json_layer)
        .try_init()
        .ok();
}
