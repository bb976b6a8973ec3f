//! # mart-core
//!
//! Core types and traits for the village-mart checkout engine.
//!
//! This crate provides:
//! - `CartStore` and `CartItem` for shopper cart state with durable
//!   persistence and change notification
//! - `CheckoutFlow` for the checkout state machine (order creation,
//!   gateway hand-off, payment verification)
//! - `CheckoutGateway` and `OrderService` traits for the provider seams
//! - `ZoneDirectory` for delivery-zone serviceability lookups
//! - `Currency` and integer amount helpers
//! - `CheckoutError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use mart_core::{CartStore, CheckoutFlow, ZoneCheck, ZoneDirectory};
//!
//! // Gate checkout on the shopper's delivery location
//! let terms = match zones.check("110001")? {
//!     ZoneCheck::Serviceable(terms) => terms,
//!     ZoneCheck::Unserviceable => return Err(...),
//! };
//!
//! // Run one checkout attempt
//! let flow = CheckoutFlow::new(cart, orders, gateway);
//! match flow.checkout(&terms).await? {
//!     CheckoutOutcome::Completed { payment_id, .. } => { /* route to confirmation */ }
//!     CheckoutOutcome::Cancelled => { /* cart untouched, shopper may retry */ }
//! }
//! ```

pub mod cart;
pub mod checkout;
pub mod error;
pub mod gateway;
pub mod money;
pub mod zone;

// Re-exports for convenience
pub use cart::{CartItem, CartProduct, CartSnapshot, CartStorage, CartStorageError, CartStore};
pub use checkout::{
    CheckoutFlow, CheckoutOutcome, CheckoutPhase, OrderDraft, OrderService, PaymentIntent,
    VerificationResult,
};
pub use error::{CheckoutError, CheckoutResult};
pub use gateway::{BoxedCheckoutGateway, CheckoutGateway, GatewayOutcome, GatewayResult};
pub use money::{format_amount, Currency};
pub use zone::{validate_pincode, DeliveryTerms, DeliveryZone, ZoneCheck, ZoneDirectory};
