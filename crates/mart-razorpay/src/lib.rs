//! # mart-razorpay
//!
//! Razorpay payment integration for village-mart-rs.
//!
//! This crate provides:
//!
//! 1. **RazorpayClient** - Orders API client
//!    - Mints one provider order per checkout attempt
//!    - Auto-capture enabled
//! 2. **HostedCheckout** - gateway adapter over the hosted widget
//!    - One terminal outcome per open: completed, dismissed, or failed
//!    - Double callback invocations are swallowed
//! 3. **SignatureVerifier** - payment-completion authenticity check
//!    - HMAC-SHA256 over `order_id|payment_id`, constant-time compare
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use mart_razorpay::{RazorpayClient, SignatureVerifier};
//!
//! // Create client from environment
//! let client = RazorpayClient::from_env()?;
//!
//! // Mint a provider order (amount in paise)
//! let intent = client.create_order(22900, Currency::INR, "order_abc").await?;
//!
//! // Later, verify the completed payment
//! let verifier = SignatureVerifier::from_config(client.config());
//! let paid = verifier.verify(&payment_id, &order_id, &signature);
//! ```

pub mod config;
pub mod gateway;
pub mod orders;
pub mod signature;

// Re-exports
pub use config::{RazorpayConfig, SignatureMode};
pub use gateway::{
    CheckoutOptions, CompletionHandle, HostedCheckout, StorefrontProfile, WidgetLauncher,
    WidgetTheme,
};
pub use orders::RazorpayClient;
pub use signature::{compute_signature, SignatureVerifier};
