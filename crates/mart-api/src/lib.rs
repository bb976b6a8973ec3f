//! # mart-api
//!
//! HTTP API layer for village-mart-rs.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - REST endpoints for order creation, payment verification, and
//!   delivery serviceability
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | POST | `/payment/create-order` | Mint a provider order |
//! | POST | `/payment/verify` | Verify a payment signature |
//! | POST | `/check-pincode` | Delivery serviceability lookup |

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
