//! # Storefront API Client
//!
//! HTTP client for the storefront's checkout endpoints: order creation,
//! payment verification, and the delivery-zone pincode check. Implements
//! the `OrderService` seam the checkout flow is driven through.

use async_trait::async_trait;
use mart_core::{
    CheckoutError, CheckoutResult, Currency, DeliveryTerms, GatewayResult, OrderDraft,
    OrderService, PaymentIntent, VerificationResult, ZoneCheck,
};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

/// Client for the storefront checkout API
pub struct ApiClient {
    base_url: String,
    client: Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self { base_url, client }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Check delivery serviceability for a location code. A malformed
    /// code is a validation failure; an unknown or switched-off zone is
    /// the normal `Unserviceable` answer.
    #[instrument(skip(self))]
    pub async fn check_pincode(&self, pincode: &str) -> CheckoutResult<ZoneCheck> {
        let response = self
            .client
            .post(self.url("/check-pincode"))
            .json(&PincodeRequest { pincode })
            .send()
            .await
            .map_err(|e| CheckoutError::Network(e.to_string()))?;

        let status = response.status();
        let body: PincodeResponse = response
            .json()
            .await
            .map_err(|e| CheckoutError::Serialization(e.to_string()))?;

        if status == StatusCode::BAD_REQUEST {
            return Err(CheckoutError::validation(
                "pincode",
                body.error
                    .unwrap_or_else(|| "malformed location code".to_string()),
            ));
        }
        if !status.is_success() {
            return Err(CheckoutError::Network(format!(
                "pincode check failed: HTTP {status}"
            )));
        }

        if !body.available {
            return Ok(ZoneCheck::Unserviceable);
        }

        match (body.delivery_days, body.delivery_fee, body.free_above) {
            (Some(lead_time_days), Some(fee), Some(free_above)) => {
                debug!(pincode, lead_time_days, fee, "zone serviceable");
                Ok(ZoneCheck::Serviceable(DeliveryTerms {
                    lead_time_days,
                    fee,
                    free_above,
                }))
            }
            _ => Err(CheckoutError::Serialization(
                "serviceable response missing delivery terms".to_string(),
            )),
        }
    }
}

#[async_trait]
impl OrderService for ApiClient {
    #[instrument(skip(self, draft), fields(amount = draft.amount, receipt = %draft.receipt))]
    async fn create_order(&self, draft: &OrderDraft) -> CheckoutResult<PaymentIntent> {
        let request = CreateOrderRequest {
            amount: draft.amount,
            currency: draft.currency.as_str(),
            receipt: &draft.receipt,
        };

        let response = self
            .client
            .post(self.url("/payment/create-order"))
            .json(&request)
            .send()
            .await
            .map_err(|e| CheckoutError::Network(e.to_string()))?;

        let status = response.status();
        let body: CreateOrderResponse = response
            .json()
            .await
            .map_err(|e| CheckoutError::Serialization(e.to_string()))?;

        if !status.is_success() || !body.success {
            let message = body
                .error
                .unwrap_or_else(|| "Failed to create payment order".to_string());
            error!("order creation failed: HTTP {status}: {message}");
            return Err(if status == StatusCode::BAD_REQUEST {
                CheckoutError::validation("amount", message)
            } else {
                CheckoutError::Provider {
                    provider: "payment-api".to_string(),
                    message,
                }
            });
        }

        // Missing fields surface as an unusable intent, which the
        // checkout flow rejects without opening the widget.
        Ok(PaymentIntent {
            order_id: body.order_id.unwrap_or_default(),
            key: body.key.unwrap_or_default(),
            amount: body.amount.unwrap_or_default(),
            currency: body
                .currency
                .as_deref()
                .and_then(Currency::parse)
                .unwrap_or(draft.currency),
        })
    }

    #[instrument(skip(self, result), fields(payment_id = %result.payment_id))]
    async fn verify_payment(&self, result: &GatewayResult) -> CheckoutResult<VerificationResult> {
        let request = VerifyRequest {
            payment_id: &result.payment_id,
            order_id: &result.order_id,
            signature: &result.signature,
        };

        let response = self
            .client
            .post(self.url("/payment/verify"))
            .json(&request)
            .send()
            .await
            .map_err(|e| CheckoutError::Network(e.to_string()))?;

        let status = response.status();
        let body: VerifyResponse = response
            .json()
            .await
            .map_err(|e| CheckoutError::Serialization(e.to_string()))?;

        if status.is_success() && body.success {
            return Ok(VerificationResult {
                valid: true,
                payment_id: body.payment_id.unwrap_or_else(|| result.payment_id.clone()),
                order_id: body.order_id.unwrap_or_else(|| result.order_id.clone()),
            });
        }

        // The endpoint answers 400 when it rejects the signature; that is
        // a definite "not paid", distinct from not being able to ask.
        if status == StatusCode::BAD_REQUEST {
            error!(
                "payment verification rejected: {}",
                body.error.as_deref().unwrap_or("invalid signature")
            );
            return Ok(VerificationResult {
                valid: false,
                payment_id: result.payment_id.clone(),
                order_id: result.order_id.clone(),
            });
        }

        Err(CheckoutError::VerificationFailed(format!(
            "verification endpoint returned HTTP {status}"
        )))
    }
}

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Debug, Serialize)]
struct CreateOrderRequest<'a> {
    amount: i64,
    currency: &'a str,
    receipt: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateOrderResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    order_id: Option<String>,
    #[serde(default)]
    amount: Option<i64>,
    #[serde(default)]
    currency: Option<String>,
    #[serde(default)]
    key: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VerifyRequest<'a> {
    payment_id: &'a str,
    order_id: &'a str,
    signature: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VerifyResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    payment_id: Option<String>,
    #[serde(default)]
    order_id: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct PincodeRequest<'a> {
    pincode: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PincodeResponse {
    #[serde(default)]
    available: bool,
    #[serde(default)]
    delivery_days: Option<u32>,
    #[serde(default)]
    delivery_fee: Option<i64>,
    #[serde(default)]
    free_above: Option<i64>,
    #[serde(default)]
    error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn draft(amount: i64) -> OrderDraft {
        OrderDraft::new(amount, Currency::INR)
    }

    fn payment() -> GatewayResult {
        GatewayResult {
            payment_id: "pay_29QQoUBi66xm2f".into(),
            order_id: "order_9nQpF3xTf".into(),
            signature: "deadbeef".into(),
        }
    }

    #[tokio::test]
    async fn test_create_order_returns_scaled_intent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/payment/create-order"))
            .and(body_partial_json(json!({"amount": 250, "currency": "INR"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "orderId": "order_9nQpF3xTf",
                "amount": 25000,
                "currency": "INR",
                "key": "rzp_test_gGgY5VEwsyhoK2"
            })))
            .mount(&server)
            .await;

        let intent = ApiClient::new(server.uri())
            .create_order(&draft(250))
            .await
            .unwrap();

        assert_eq!(intent.order_id, "order_9nQpF3xTf");
        assert_eq!(intent.amount, 25000);
        assert_eq!(intent.currency, Currency::INR);
        assert!(intent.ensure_usable().is_ok());
    }

    #[tokio::test]
    async fn test_create_order_rejected_amount_is_validation() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/payment/create-order"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "success": false,
                "error": "Invalid amount"
            })))
            .mount(&server)
            .await;

        let err = ApiClient::new(server.uri())
            .create_order(&draft(0))
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_create_order_missing_key_yields_unusable_intent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/payment/create-order"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "orderId": "order_9nQpF3xTf",
                "amount": 25000,
                "currency": "INR"
            })))
            .mount(&server)
            .await;

        let intent = ApiClient::new(server.uri())
            .create_order(&draft(250))
            .await
            .unwrap();
        assert!(intent.ensure_usable().is_err());
    }

    #[tokio::test]
    async fn test_verify_payment_valid() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/payment/verify"))
            .and(body_partial_json(json!({
                "paymentId": "pay_29QQoUBi66xm2f",
                "orderId": "order_9nQpF3xTf"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "paymentId": "pay_29QQoUBi66xm2f",
                "orderId": "order_9nQpF3xTf"
            })))
            .mount(&server)
            .await;

        let verdict = ApiClient::new(server.uri())
            .verify_payment(&payment())
            .await
            .unwrap();
        assert!(verdict.valid);
        assert_eq!(verdict.payment_id, "pay_29QQoUBi66xm2f");
    }

    #[tokio::test]
    async fn test_verify_payment_rejected_signature_is_invalid_not_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/payment/verify"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "success": false,
                "error": "Invalid payment signature"
            })))
            .mount(&server)
            .await;

        let verdict = ApiClient::new(server.uri())
            .verify_payment(&payment())
            .await
            .unwrap();
        assert!(!verdict.valid);
    }

    #[tokio::test]
    async fn test_verify_payment_server_error_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/payment/verify"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({
                "success": false,
                "error": "Internal server error"
            })))
            .mount(&server)
            .await;

        let err = ApiClient::new(server.uri())
            .verify_payment(&payment())
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::VerificationFailed(_)));
    }

    #[tokio::test]
    async fn test_check_pincode_serviceable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/check-pincode"))
            .and(body_partial_json(json!({"pincode": "110001"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "available": true,
                "deliveryDays": 3,
                "deliveryFee": 29,
                "freeAbove": 499
            })))
            .mount(&server)
            .await;

        let check = ApiClient::new(server.uri())
            .check_pincode("110001")
            .await
            .unwrap();
        assert_eq!(
            check,
            ZoneCheck::Serviceable(DeliveryTerms {
                lead_time_days: 3,
                fee: 29,
                free_above: 499,
            })
        );
    }

    #[tokio::test]
    async fn test_check_pincode_unserviceable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/check-pincode"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "available": false,
                "error": "Delivery not available to this pincode."
            })))
            .mount(&server)
            .await;

        let check = ApiClient::new(server.uri())
            .check_pincode("560001")
            .await
            .unwrap();
        assert_eq!(check, ZoneCheck::Unserviceable);
    }

    #[tokio::test]
    async fn test_check_pincode_malformed_is_validation() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/check-pincode"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "available": false,
                "error": "Invalid pincode. Please enter a 6-digit code."
            })))
            .mount(&server)
            .await;

        let err = ApiClient::new(server.uri())
            .check_pincode("12-456")
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::Validation { .. }));
    }
}
