//! # Razorpay Orders API
//!
//! Client for minting provider orders ahead of the widget hand-off.
//! One order per checkout attempt, auto-capture enabled.

use crate::config::RazorpayConfig;
use mart_core::{CheckoutError, CheckoutResult, Currency, PaymentIntent};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

/// Razorpay Orders API client
pub struct RazorpayClient {
    config: RazorpayConfig,
    client: Client,
}

impl RazorpayClient {
    /// Create a new client over a resolved config
    pub fn new(config: RazorpayConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    /// Create from environment variables
    pub fn from_env() -> CheckoutResult<Self> {
        let config = RazorpayConfig::from_env()?;
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &RazorpayConfig {
        &self.config
    }

    /// Mint a provider order for `amount_minor` (smallest currency unit)
    /// and return the payment intent the widget is opened with.
    #[instrument(skip(self), fields(receipt = %receipt))]
    pub async fn create_order(
        &self,
        amount_minor: i64,
        currency: Currency,
        receipt: &str,
    ) -> CheckoutResult<PaymentIntent> {
        if amount_minor <= 0 {
            return Err(CheckoutError::validation(
                "amount",
                "order amount must be positive",
            ));
        }

        let request = RazorpayOrderRequest {
            amount: amount_minor,
            currency: currency.as_str(),
            receipt,
            payment_capture: 1,
        };

        debug!(amount = amount_minor, %currency, "creating Razorpay order");

        let url = format!("{}/v1/orders", self.config.api_base_url);
        let response = self
            .client
            .post(&url)
            .basic_auth(&self.config.key_id, Some(&self.config.key_secret))
            .json(&request)
            .send()
            .await
            .map_err(|e| CheckoutError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CheckoutError::Network(e.to_string()))?;

        if !status.is_success() {
            error!("Razorpay API error: status={}, body={}", status, body);

            if let Ok(error_response) = serde_json::from_str::<RazorpayErrorResponse>(&body) {
                return Err(CheckoutError::Provider {
                    provider: "razorpay".to_string(),
                    message: error_response.error.description,
                });
            }

            return Err(CheckoutError::Provider {
                provider: "razorpay".to_string(),
                message: format!("HTTP {}: {}", status, body),
            });
        }

        let order: RazorpayOrder = serde_json::from_str(&body).map_err(|e| {
            CheckoutError::Serialization(format!("Failed to parse Razorpay response: {}", e))
        })?;

        info!(
            "Created Razorpay order: id={}, amount={}",
            order.id, order.amount
        );

        Ok(PaymentIntent {
            order_id: order.id,
            key: self.config.key_id.clone(),
            amount: order.amount,
            currency,
        })
    }
}

// =============================================================================
// Razorpay API Types
// =============================================================================

#[derive(Debug, Serialize)]
struct RazorpayOrderRequest<'a> {
    amount: i64,
    currency: &'a str,
    receipt: &'a str,
    payment_capture: u8,
}

#[derive(Debug, Deserialize)]
struct RazorpayOrder {
    id: String,
    amount: i64,
    #[serde(default)]
    currency: Option<String>,
    #[serde(default)]
    receipt: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RazorpayErrorResponse {
    error: RazorpayError,
}

#[derive(Debug, Deserialize)]
struct RazorpayError {
    #[serde(default)]
    code: Option<String>,
    description: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> RazorpayClient {
        let config = RazorpayConfig::new("rzp_test_gGgY5VEwsyhoK2", "secret")
            .unwrap()
            .with_api_base_url(server.uri());
        RazorpayClient::new(config)
    }

    #[tokio::test]
    async fn test_create_order_mints_intent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/orders"))
            .and(body_partial_json(json!({
                "amount": 22900,
                "currency": "INR",
                "payment_capture": 1
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "order_9nQpF3xTf",
                "amount": 22900,
                "currency": "INR",
                "receipt": "order_abc",
                "status": "created"
            })))
            .mount(&server)
            .await;

        let intent = client_for(&server)
            .create_order(22900, Currency::INR, "order_abc")
            .await
            .unwrap();

        assert_eq!(intent.order_id, "order_9nQpF3xTf");
        assert_eq!(intent.key, "rzp_test_gGgY5VEwsyhoK2");
        assert_eq!(intent.amount, 22900);
        assert!(intent.ensure_usable().is_ok());
    }

    #[tokio::test]
    async fn test_provider_error_is_mapped() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/orders"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": {
                    "code": "BAD_REQUEST_ERROR",
                    "description": "amount exceeds maximum amount allowed"
                }
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .create_order(22900, Currency::INR, "order_abc")
            .await
            .unwrap_err();

        match err {
            CheckoutError::Provider { provider, message } => {
                assert_eq!(provider, "razorpay");
                assert!(message.contains("maximum amount"));
            }
            other => panic!("expected provider error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_positive_amount_rejected_before_any_call() {
        let server = MockServer::start().await;
        let err = client_for(&server)
            .create_order(0, Currency::INR, "order_abc")
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::Validation { .. }));
        // No expectations mounted: a request would have 404'd into a
        // provider error instead of a validation error.
    }
}
