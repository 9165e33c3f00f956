use std::net::SocketAddr;
use std::time::Duration;

use axum::http::HeaderValue;
use env_helpers::{get_env, get_env_default};
use secrecy::SecretString;
use url::Url;

use crate::{
    application::{ports::payment_provider::CheckoutUrls, use_cases::checkout::PricingConfig},
    domain::entities::payment_provider::PaymentProvider,
};

pub struct AppConfig {
    pub jwt_secret: SecretString,
    /// Base URL of the web app; every redirect target hangs off it.
    pub app_origin: Url,
    pub cors_origin: HeaderValue,
    pub bind_addr: SocketAddr,
    pub database_url: String,
    pub payment_provider: PaymentProvider,
    /// Only required when `payment_provider` is Stripe.
    pub stripe_secret_key: Option<SecretString>,
    pub pricing: PricingConfig,
    /// Upper bound for every outbound provider call.
    pub provider_timeout: Duration,
    pub session_expiry_interval: Duration,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let jwt_secret: SecretString = SecretString::new(get_env::<String>("JWT_SECRET").into());
        let app_origin: Url = get_env("APP_ORIGIN");
        let cors_origin: HeaderValue =
            get_env_default("CORS_ORIGIN", String::from("http://localhost:3000"))
                .parse()
                .expect("CORS_ORIGIN must be a valid header value");
        let bind_addr: SocketAddr = get_env_default(
            "BIND_ADDR",
            SocketAddr::from(([127, 0, 0, 1], 3001)),
        );
        let database_url: String = get_env("DATABASE_URL");

        let payment_provider: PaymentProvider =
            get_env_default("PAYMENT_PROVIDER", String::from("stripe"))
                .parse()
                .expect("PAYMENT_PROVIDER must be 'stripe' or 'dummy'");
        let stripe_secret_key = optional_env("STRIPE_SECRET_KEY").map(|k| SecretString::new(k.into()));

        // Missing price ids are reported per request, not at startup.
        let pricing = PricingConfig::new(
            optional_env("STRIPE_PRICE_MONTHLY"),
            optional_env("STRIPE_PRICE_YEARLY"),
        );

        let provider_timeout_secs: u64 = get_env_default("PROVIDER_TIMEOUT_SECS", 10);
        let session_expiry_interval_secs: u64 = get_env_default("SESSION_EXPIRY_INTERVAL_SECS", 300);

        Self {
            jwt_secret,
            app_origin,
            cors_origin,
            bind_addr,
            database_url,
            payment_provider,
            stripe_secret_key,
            pricing,
            provider_timeout: Duration::from_secs(provider_timeout_secs),
            session_expiry_interval: Duration::from_secs(session_expiry_interval_secs.max(1)),
        }
    }

    /// Where the provider sends the user after checkout. The provider fills
    /// in `{CHECKOUT_SESSION_ID}` itself.
    pub fn checkout_urls(&self) -> CheckoutUrls {
        CheckoutUrls {
            success_url: format!(
                "{}?session_id={{CHECKOUT_SESSION_ID}}",
                self.app_url("billing/success")
            ),
            cancel_url: self.app_url("billing/cancel"),
        }
    }

    pub fn portal_return_url(&self) -> String {
        self.app_url("billing")
    }

    fn app_url(&self, path: &str) -> String {
        format!("{}/{}", self.app_origin.as_str().trim_end_matches('/'), path)
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
