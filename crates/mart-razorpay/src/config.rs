//! # Razorpay Configuration
//!
//! Configuration management for the Razorpay integration.
//! All secrets are loaded from environment variables, once, at startup.

use mart_core::CheckoutError;
use std::env;

/// How payment signatures are treated. Resolved once when the config is
/// built and immutable afterwards; nothing in request handling can flip
/// it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureMode {
    /// Real HMAC verification (the default, and the only mode a live key
    /// can run in)
    Enforced,

    /// Accept any signature. Only constructible over a test key, for
    /// driving the flow without provider credentials.
    AcceptAll,
}

impl Default for SignatureMode {
    fn default() -> Self {
        SignatureMode::Enforced
    }
}

/// Razorpay API configuration
#[derive(Debug, Clone)]
pub struct RazorpayConfig {
    /// Key id (rzp_test_... or rzp_live_...), handed to the widget
    pub key_id: String,

    /// Key secret, held server-side only; signs and verifies payments
    pub key_secret: String,

    /// API base URL (for testing/mocking)
    pub api_base_url: String,

    /// Signature treatment, fixed at construction
    pub signature_mode: SignatureMode,
}

impl RazorpayConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `RAZORPAY_KEY_ID`
    /// - `RAZORPAY_KEY_SECRET`
    ///
    /// Optional:
    /// - `RAZORPAY_ACCEPT_ALL_SIGNATURES=1` (test keys only; refused
    ///   outright when the key id is a live key)
    pub fn from_env() -> Result<Self, CheckoutError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let key_id = env::var("RAZORPAY_KEY_ID").map_err(|_| {
            CheckoutError::Configuration("RAZORPAY_KEY_ID not set".to_string())
        })?;

        let key_secret = env::var("RAZORPAY_KEY_SECRET").map_err(|_| {
            CheckoutError::Configuration("RAZORPAY_KEY_SECRET not set".to_string())
        })?;

        let accept_all = env::var("RAZORPAY_ACCEPT_ALL_SIGNATURES")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let config = Self::new(key_id, key_secret)?;

        if accept_all {
            config.with_signature_mode(SignatureMode::AcceptAll)
        } else {
            Ok(config)
        }
    }

    /// Create config with explicit values (signatures enforced)
    pub fn new(
        key_id: impl Into<String>,
        key_secret: impl Into<String>,
    ) -> Result<Self, CheckoutError> {
        let key_id = key_id.into();
        let key_secret = key_secret.into();

        if !key_id.starts_with("rzp_test_") && !key_id.starts_with("rzp_live_") {
            return Err(CheckoutError::Configuration(
                "RAZORPAY_KEY_ID must start with rzp_test_ or rzp_live_".to_string(),
            ));
        }

        if key_secret.is_empty() {
            return Err(CheckoutError::Configuration(
                "RAZORPAY_KEY_SECRET must not be empty".to_string(),
            ));
        }

        Ok(Self {
            key_id,
            key_secret,
            api_base_url: "https://api.razorpay.com".to_string(),
            signature_mode: SignatureMode::Enforced,
        })
    }

    /// Check if using a test key
    pub fn is_test_mode(&self) -> bool {
        self.key_id.starts_with("rzp_test_")
    }

    /// Check if using a live key
    pub fn is_live_mode(&self) -> bool {
        self.key_id.starts_with("rzp_live_")
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Builder: set the signature mode. `AcceptAll` over a live key is a
    /// configuration error, not a warning.
    pub fn with_signature_mode(
        mut self,
        mode: SignatureMode,
    ) -> Result<Self, CheckoutError> {
        if mode == SignatureMode::AcceptAll && self.is_live_mode() {
            return Err(CheckoutError::Configuration(
                "RAZORPAY_ACCEPT_ALL_SIGNATURES cannot be enabled with a live key".to_string(),
            ));
        }
        self.signature_mode = mode;
        Ok(self)
    }
}
