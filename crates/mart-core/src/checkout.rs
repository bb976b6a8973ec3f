//! # Checkout Flow
//!
//! The checkout state machine. One attempt moves through
//! `Idle → CreatingOrder → AwaitingGateway → Verifying` and lands on
//! `Completed`, `Failed`, or `Cancelled`. Every failure is terminal for
//! that attempt; there are no automatic retries, and the shopper may
//! start a fresh attempt once the previous one has settled.
//!
//! The cart is cleared in exactly one place: after the verification
//! round-trip reports a valid signature. A dismissal or any failure
//! leaves the cart untouched so checkout can be retried.

use crate::cart::CartStore;
use crate::error::{CheckoutError, CheckoutResult};
use crate::gateway::{CheckoutGateway, GatewayOutcome, GatewayResult};
use crate::money::Currency;
use crate::zone::DeliveryTerms;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

/// What the shopper is about to be charged, minted from the cart at
/// checkout time. Amount is in integer major units; scaling to the
/// smallest currency unit happens once, at the order-creation boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDraft {
    /// Order total including any delivery fee, in major units
    pub amount: i64,

    /// Settlement currency
    pub currency: Currency,

    /// Receipt reference handed to the provider
    pub receipt: String,

    /// When this attempt was started
    pub created_at: DateTime<Utc>,
}

impl OrderDraft {
    /// Mint a draft with a fresh receipt reference
    pub fn new(amount: i64, currency: Currency) -> Self {
        Self {
            amount,
            currency,
            receipt: format!("order_{}", Uuid::new_v4().simple()),
            created_at: Utc::now(),
        }
    }
}

/// Provider-issued handle for a not-yet-completed charge. Owned by one
/// checkout attempt and discarded with it; a stale intent is never
/// carried into a later attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentIntent {
    /// Provider order identifier
    pub order_id: String,

    /// Public key/handle the widget is opened with
    pub key: String,

    /// Amount in the smallest currency unit (paise)
    pub amount: i64,

    /// Settlement currency
    pub currency: Currency,
}

impl PaymentIntent {
    /// An intent missing its key or order id cannot open the widget and
    /// fails the attempt outright.
    pub fn ensure_usable(&self) -> CheckoutResult<()> {
        if self.key.is_empty() {
            return Err(CheckoutError::InvalidIntent(
                "order-creation response is missing the key".to_string(),
            ));
        }
        if self.order_id.is_empty() {
            return Err(CheckoutError::InvalidIntent(
                "order-creation response is missing the order id".to_string(),
            ));
        }
        if self.amount <= 0 {
            return Err(CheckoutError::InvalidIntent(format!(
                "non-positive amount {}",
                self.amount
            )));
        }
        Ok(())
    }
}

/// Verdict from the remote verification endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationResult {
    pub valid: bool,
    pub payment_id: String,
    pub order_id: String,
}

/// Remote collaborator that mints payment intents and verifies completed
/// payments. Implemented over HTTP by `mart-client`; stubbed in tests.
#[async_trait]
pub trait OrderService: Send + Sync {
    /// Ask the remote endpoint to mint a payment intent for the draft
    async fn create_order(&self, draft: &OrderDraft) -> CheckoutResult<PaymentIntent>;

    /// Ask the remote endpoint to verify a completed payment's signature
    async fn verify_payment(&self, result: &GatewayResult) -> CheckoutResult<VerificationResult>;
}

/// Phases of one checkout attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutPhase {
    Idle,
    CreatingOrder,
    AwaitingGateway,
    Verifying,
    Completed,
    Failed,
    Cancelled,
}

impl CheckoutPhase {
    /// An attempt is underway; a second one must not start
    pub fn is_in_flight(&self) -> bool {
        matches!(
            self,
            CheckoutPhase::CreatingOrder
                | CheckoutPhase::AwaitingGateway
                | CheckoutPhase::Verifying
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            CheckoutPhase::Completed | CheckoutPhase::Failed | CheckoutPhase::Cancelled
        )
    }
}

impl Default for CheckoutPhase {
    fn default() -> Self {
        CheckoutPhase::Idle
    }
}

/// How a settled attempt ended (errors are reported through `Err`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// Payment verified; the cart has been cleared
    Completed { payment_id: String, order_id: String },

    /// The shopper dismissed the widget; the cart is untouched
    Cancelled,
}

/// The checkout orchestrator. Owns the phase of the current attempt and
/// drives the cart, the order service, and the gateway through one
/// attempt at a time.
pub struct CheckoutFlow {
    cart: Arc<CartStore>,
    orders: Arc<dyn OrderService>,
    gateway: Arc<dyn CheckoutGateway>,
    currency: Currency,
    phase: Mutex<CheckoutPhase>,
}

impl CheckoutFlow {
    pub fn new(
        cart: Arc<CartStore>,
        orders: Arc<dyn OrderService>,
        gateway: Arc<dyn CheckoutGateway>,
    ) -> Self {
        Self {
            cart,
            orders,
            gateway,
            currency: Currency::INR,
            phase: Mutex::new(CheckoutPhase::Idle),
        }
    }

    /// Builder: settle in a different currency
    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    /// Phase of the current (or last) attempt
    pub async fn phase(&self) -> CheckoutPhase {
        *self.phase.lock().await
    }

    /// Run one checkout attempt against the given delivery terms.
    ///
    /// Rejected up front with `CheckoutInFlight` while another attempt is
    /// underway, and with `EmptyCart` (without leaving `Idle`) when there
    /// is nothing to buy. Delivery terms come from a serviceable zone
    /// check, which is what gates checkout on the location code.
    pub async fn checkout(&self, terms: &DeliveryTerms) -> CheckoutResult<CheckoutOutcome> {
        {
            let mut phase = self.phase.lock().await;
            if phase.is_in_flight() {
                return Err(CheckoutError::CheckoutInFlight);
            }
            if self.cart.is_empty() {
                *phase = CheckoutPhase::Idle;
                return Err(CheckoutError::EmptyCart);
            }
            *phase = CheckoutPhase::CreatingOrder;
        }

        let result = self.run_attempt(terms).await;

        let mut phase = self.phase.lock().await;
        *phase = match &result {
            Ok(CheckoutOutcome::Completed { .. }) => CheckoutPhase::Completed,
            Ok(CheckoutOutcome::Cancelled) => CheckoutPhase::Cancelled,
            Err(_) => CheckoutPhase::Failed,
        };
        result
    }

    async fn run_attempt(&self, terms: &DeliveryTerms) -> CheckoutResult<CheckoutOutcome> {
        let subtotal = self.cart.total_price();
        let delivery_fee = terms.fee_for_order(subtotal);
        let draft = OrderDraft::new(subtotal + delivery_fee, self.currency);

        info!(
            amount = draft.amount,
            delivery_fee,
            receipt = %draft.receipt,
            "creating payment order"
        );

        let intent = self.orders.create_order(&draft).await?;
        intent.ensure_usable()?;

        // The provider must quote exactly the drafted amount in minor
        // units; any drift is a financial discrepancy, not a rounding
        // detail to paper over.
        let expected_minor = self.currency.to_minor_units(draft.amount);
        if intent.amount != expected_minor {
            return Err(CheckoutError::InvalidIntent(format!(
                "provider quoted {} minor units, expected {}",
                intent.amount, expected_minor
            )));
        }

        self.set_phase(CheckoutPhase::AwaitingGateway).await;

        match self.gateway.open(&intent).await? {
            GatewayOutcome::Dismissed => {
                info!(order_id = %intent.order_id, "checkout dismissed by shopper");
                Ok(CheckoutOutcome::Cancelled)
            }
            GatewayOutcome::Completed(gateway_result) => {
                self.set_phase(CheckoutPhase::Verifying).await;

                let verdict = self.orders.verify_payment(&gateway_result).await?;
                if !verdict.valid {
                    warn!(payment_id = %verdict.payment_id, "payment signature rejected");
                    return Err(CheckoutError::VerificationFailed(
                        "payment signature rejected".to_string(),
                    ));
                }

                self.cart.clear();
                info!(
                    payment_id = %verdict.payment_id,
                    order_id = %verdict.order_id,
                    "payment verified, cart cleared"
                );
                Ok(CheckoutOutcome::Completed {
                    payment_id: verdict.payment_id,
                    order_id: verdict.order_id,
                })
            }
        }
    }

    async fn set_phase(&self, phase: CheckoutPhase) {
        *self.phase.lock().await = phase;
    }
}
