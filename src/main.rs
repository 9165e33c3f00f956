use dotenvy::dotenv;
use tracing::info;

use subscription_billing::infra::{
    app::create_app, session_expiry::run_session_expiry_loop, setup::{init_app_state, init_tracing},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing();

    let app_state = init_app_state().await?;

    let bind_addr = app_state.config.bind_addr;
    let expiry_interval = app_state.config.session_expiry_interval;

    let app = create_app(app_state.clone());

    // Spawn checkout session expiry background task
    let checkout_sessions = app_state.checkout_sessions.clone();
    tokio::spawn(async move {
        run_session_expiry_loop(checkout_sessions, expiry_interval).await;
    });

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    info!("Billing service listening at {}", &listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
