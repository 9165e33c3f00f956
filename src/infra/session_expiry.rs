use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, error, info};

use crate::use_cases::checkout_session::CheckoutSessionStore;

/// Periodically flips ACTIVE checkout sessions past their expiry to EXPIRED.
///
/// Read paths already ignore expired sessions; this only keeps stored status
/// in step with reality.
pub async fn run_session_expiry_loop(store: Arc<CheckoutSessionStore>, every: Duration) {
    let mut ticker = interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!(
        "Checkout session expiry started (every {}s)",
        every.as_secs()
    );

    loop {
        ticker.tick().await;
        expire_once(&store).await;
    }
}

/// One reconciliation pass. Errors are logged; the loop keeps going.
pub async fn expire_once(store: &CheckoutSessionStore) -> u64 {
    match store.expire_stale(Utc::now()).await {
        Ok(0) => {
            debug!("No stale checkout sessions");
            0
        }
        Ok(count) => {
            info!(count, "Expired stale checkout sessions");
            count
        }
        Err(e) => {
            error!(error = ?e, "Failed to expire stale checkout sessions");
            0
        }
    }
}
