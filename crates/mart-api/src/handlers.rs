//! # Request Handlers
//!
//! Axum request handlers for the checkout API. Remote failures are
//! logged with full detail server-side; clients only ever see a fixed
//! message and a stable error code.

use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use mart_core::{CheckoutError, Currency, ZoneCheck};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Create-order request
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    /// Order total in integer major units (rupees). Deserialized loosely
    /// so a missing, non-numeric, or fractional amount is a 400, not a
    /// deserialization rejection.
    #[serde(default)]
    pub amount: Option<serde_json::Value>,
    /// ISO currency code, defaults to INR
    #[serde(default)]
    pub currency: Option<String>,
    /// Receipt reference for the provider order
    #[serde(default)]
    pub receipt: Option<String>,
}

/// Create-order response; `amount` is in the smallest currency unit
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponse {
    pub success: bool,
    pub order_id: String,
    pub amount: i64,
    pub currency: String,
    pub key: String,
}

/// Verify request; all three fields are required
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    #[serde(default)]
    pub payment_id: Option<String>,
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub signature: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    pub success: bool,
    pub payment_id: String,
    pub order_id: String,
}

#[derive(Debug, Deserialize)]
pub struct PincodeRequest {
    #[serde(default)]
    pub pincode: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PincodeAvailable {
    pub available: bool,
    pub delivery_days: u32,
    pub delivery_fee: i64,
    pub free_above: i64,
}

#[derive(Debug, Serialize)]
pub struct PincodeUnavailable {
    pub available: bool,
    pub error: String,
}

/// Error body: a fixed message plus a stable machine-readable code
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub code: &'static str,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: &'static str) -> Self {
        Self {
            success: false,
            error: error.into(),
            code,
        }
    }
}

fn bad_request(message: &str, code: &'static str) -> (StatusCode, Json<ErrorResponse>) {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(message, code)))
}

/// Map an internal failure to a client response without leaking detail
fn upstream_failure(err: &CheckoutError, message: &str) -> (StatusCode, Json<ErrorResponse>) {
    let status = StatusCode::from_u16(err.status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ErrorResponse::new(message, err.client_code())))
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "village-mart",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Mint a provider order for the drafted amount. The major-to-minor
/// scaling happens exactly once, here, before the provider call.
#[instrument(skip(state, request))]
pub async fn create_order(
    State(state): State<AppState>,
    Json(request): Json<CreateOrderRequest>,
) -> Result<Json<CreateOrderResponse>, (StatusCode, Json<ErrorResponse>)> {
    let amount = match request.amount.as_ref().and_then(serde_json::Value::as_i64) {
        Some(amount) if amount >= 1 => amount,
        _ => return Err(bad_request("Invalid amount", "validation_error")),
    };

    let currency = match request.currency.as_deref() {
        None | Some("") => Currency::INR,
        Some(code) => Currency::parse(code)
            .ok_or_else(|| bad_request("Unsupported currency", "validation_error"))?,
    };

    let receipt = request
        .receipt
        .filter(|r| !r.is_empty())
        .unwrap_or_else(|| "village_mart_order".to_string());

    let amount_minor = currency.to_minor_units(amount);

    info!(amount, amount_minor, %currency, "creating payment order");

    let intent = state
        .razorpay
        .create_order(amount_minor, currency, &receipt)
        .await
        .map_err(|err| {
            error!("Order creation failed: {}", err);
            upstream_failure(&err, "Failed to create payment order")
        })?;

    Ok(Json(CreateOrderResponse {
        success: true,
        order_id: intent.order_id,
        amount: intent.amount,
        currency: currency.as_str().to_string(),
        key: intent.key,
    }))
}

/// Verify a completed payment's signature. This is the gate that decides
/// "paid"; a missing field and a bad signature are both definite
/// rejections, not retries.
#[instrument(skip(state, request))]
pub async fn verify_payment(
    State(state): State<AppState>,
    Json(request): Json<VerifyRequest>,
) -> Result<Json<VerifyResponse>, (StatusCode, Json<ErrorResponse>)> {
    let required = |value: Option<String>| value.filter(|v| !v.is_empty());

    let (Some(payment_id), Some(order_id), Some(signature)) = (
        required(request.payment_id),
        required(request.order_id),
        required(request.signature),
    ) else {
        error!("Missing required payment verification parameters");
        return Err(bad_request(
            "Missing required payment parameters",
            "validation_error",
        ));
    };

    info!(%payment_id, %order_id, "payment verification attempt");

    if !state.verifier.verify(&payment_id, &order_id, &signature) {
        error!(%payment_id, "Payment verification failed: invalid signature");
        return Err(bad_request("Invalid payment signature", "verification_failed"));
    }

    info!(%payment_id, "Payment verified successfully");

    Ok(Json(VerifyResponse {
        success: true,
        payment_id,
        order_id,
    }))
}

/// Delivery serviceability for a location code. Malformed codes are a
/// 400 validation failure; unknown codes are a normal "not available".
#[instrument(skip(state, request), fields(pincode = %request.pincode))]
pub async fn check_pincode(
    State(state): State<AppState>,
    Json(request): Json<PincodeRequest>,
) -> Response {
    match state.zones.check(&request.pincode) {
        Err(_) => (
            StatusCode::BAD_REQUEST,
            Json(PincodeUnavailable {
                available: false,
                error: "Invalid pincode. Please enter a 6-digit code.".to_string(),
            }),
        )
            .into_response(),
        Ok(ZoneCheck::Serviceable(terms)) => Json(PincodeAvailable {
            available: true,
            delivery_days: terms.lead_time_days,
            delivery_fee: terms.fee,
            free_above: terms.free_above,
        })
        .into_response(),
        Ok(ZoneCheck::Unserviceable) => Json(PincodeUnavailable {
            available: false,
            error: "Delivery not available to this pincode.".to_string(),
        })
        .into_response(),
    }
}
