//! # Checkout Gateway Trait
//!
//! Seam between the checkout flow and a payment provider's hosted widget.
//! An implementation presents the provider checkout for a payment intent
//! and resolves with exactly one terminal outcome per `open` call:
//! a completed payment, an explicit dismissal by the shopper, or an error
//! (widget failed to load, SDK missing, malformed intent).

use crate::checkout::PaymentIntent;
use crate::error::CheckoutResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Normalized result of a completed widget interaction, consumed exactly
/// once by the verification step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayResult {
    /// Provider-assigned payment identifier
    pub payment_id: String,

    /// Provider order identifier the payment settles
    pub order_id: String,

    /// Provider signature over (order id, payment id)
    pub signature: String,
}

/// Terminal outcome of one widget interaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayOutcome {
    /// The shopper completed payment in the widget
    Completed(GatewayResult),

    /// The shopper dismissed the widget without paying
    Dismissed,
}

/// Core trait for payment widget adapters.
#[async_trait]
pub trait CheckoutGateway: Send + Sync {
    /// Present the provider checkout for `intent` and wait for its single
    /// terminal outcome. A malformed intent (missing key or provider
    /// order id) is rejected before the widget is opened; load and
    /// initialization failures reject the call.
    async fn open(&self, intent: &PaymentIntent) -> CheckoutResult<GatewayOutcome>;

    /// Provider name (for logging)
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a shared gateway (dynamic dispatch)
pub type BoxedCheckoutGateway = Arc<dyn CheckoutGateway>;
