//! # Routes
//!
//! Axum router configuration for the checkout API.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - Payment:
///   - POST /payment/create-order - Mint a provider order
///   - POST /payment/verify - Verify a completed payment signature
///
/// - Delivery:
///   - POST /check-pincode - Delivery serviceability for a location code
///
/// - Health:
///   - GET / and GET /health
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - the storefront is served from its own origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let payment_routes = Router::new()
        .route("/create-order", post(handlers::create_order))
        .route("/verify", post(handlers::verify_payment));

    Router::new()
        // Health check at root
        .route("/health", get(handlers::health))
        .route("/", get(handlers::health))
        // Payment endpoints
        .nest("/payment", payment_routes)
        // Delivery serviceability
        .route("/check-pincode", post(handlers::check_pincode))
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        // State
        .with_state(state)
}
