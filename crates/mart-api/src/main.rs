//! # Village Mart RS
//!
//! Checkout and delivery API for the Village Mart storefront.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export RAZORPAY_KEY_ID=rzp_test_...
//! export RAZORPAY_KEY_SECRET=...
//!
//! # Run the server
//! village-mart
//! ```

use mart_api::{routes, state::AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    // Print banner
    print_banner();

    // Initialize application state
    let state = AppState::new()?;

    let addr = state.config.socket_addr();
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    info!("Delivery zones loaded: {}", state.zones.len());
    info!(
        "Razorpay mode: {}",
        if state.razorpay.config().is_live_mode() {
            "live"
        } else {
            "test"
        }
    );

    // Create router
    let app = routes::create_router(state);

    // Start server
    info!("🛒 Village Mart starting on http://{}", addr);

    if !is_prod {
        info!("📝 Health: http://{}/health", addr);
        info!("💳 Create order: POST http://{}/payment/create-order", addr);
        info!("🔏 Verify: POST http://{}/payment/verify", addr);
        info!("🚚 Pincode check: POST http://{}/check-pincode", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn print_banner() {
    println!(
        r#"
  🛒 Village Mart RS 🛒
  ━━━━━━━━━━━━━━━━━━━━━━━
  Checkout & delivery engine
  Version: {}

"#,
        env!("CARGO_PKG_VERSION")
    );
}
