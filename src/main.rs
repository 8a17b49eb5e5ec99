mod config;
mod routes;
mod services;
mod state;

use std::sync::Arc;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let gate = config::GateConfig::from_env().expect("gate configuration");
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()
        .expect("invalid PORT");

    let api = services::subscription::HttpSubscriptionClient::new(gate.api_url.clone(), gate.api_timeout)
        .expect("HTTP client init failed");

    tracing::info!(
        api_url = %gate.api_url,
        admin_users = gate.admin_users.len(),
        timeout_secs = gate.api_timeout.as_secs(),
        "subscription gate configured"
    );

    let state = state::AppState::new(Arc::new(api), gate.admin_users);

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "subgate listening");
    axum::serve(listener, app).await.expect("server failed");
}
