//! payflow HTTP Server
//!
//! Axum-based server exposing the two payment endpoints and serving the
//! WASM frontend.

mod handlers;
mod routes;
mod state;

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use payflow_payments::{PaymentService, RazorpayClient, RazorpayConfig};

use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();

    // Credentials are read once; handlers report their absence per request
    let config = RazorpayConfig::from_env();

    if config.is_configured() {
        tracing::info!(currency = %config.currency, api = %config.api_base, "Razorpay configured");
    } else {
        tracing::warn!("Razorpay not configured - order creation will fail");
        tracing::warn!("  Set RAZORPAY_KEY_ID and RAZORPAY_KEY_SECRET in .env");
    }

    let gateway = Arc::new(RazorpayClient::from_config(&config));
    let state = AppState::new(PaymentService::new(config, gateway));

    let static_dir = std::env::var("STATIC_DIR").unwrap_or_else(|_| "static".into());
    let app = routes::router(state, &static_dir);

    // Start server
    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("payflow server running on http://{}", addr);
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health             - Health check");
    tracing::info!("  POST /api/create-order   - Create Razorpay order");
    tracing::info!("  POST /api/verify-payment - Verify payment signature");

    axum::serve(listener, app).await?;

    Ok(())
}
