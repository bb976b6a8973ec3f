//! # Checkout Error Types
//!
//! Typed error handling for the village-mart checkout engine.
//! All checkout operations return `Result<T, CheckoutError>`.

use thiserror::Error;

/// Core error type for all checkout operations
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Configuration errors (missing keys, invalid config)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Malformed input at a boundary, rejected before any side effect
    #[error("Invalid {field}: {message}")]
    Validation { field: String, message: String },

    /// Checkout requested against an empty cart
    #[error("Cart is empty")]
    EmptyCart,

    /// A second checkout was requested while one is already in flight
    #[error("A checkout attempt is already in progress")]
    CheckoutInFlight,

    /// Order-creation response is unusable (missing key/order id, bad amount)
    #[error("Invalid payment intent: {0}")]
    InvalidIntent(String),

    /// Payment widget failed to load or initialize
    #[error("Gateway error: {0}")]
    Gateway(String),

    /// Signature mismatch or a failed verification round-trip
    #[error("Payment verification failed: {0}")]
    VerificationFailed(String),

    /// Payment provider API error
    #[error("Provider error [{provider}]: {message}")]
    Provider { provider: String, message: String },

    /// Network/HTTP error communicating with a remote collaborator
    #[error("Network error: {0}")]
    Network(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CheckoutError {
    /// Shorthand for a boundary validation failure
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        CheckoutError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Returns true if the shopper may sensibly retry the same attempt
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CheckoutError::Network(_)
                | CheckoutError::Gateway(_)
                | CheckoutError::Provider { .. }
        )
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            CheckoutError::Configuration(_) => 500,
            CheckoutError::Validation { .. } => 400,
            CheckoutError::EmptyCart => 400,
            CheckoutError::CheckoutInFlight => 409,
            CheckoutError::InvalidIntent(_) => 502,
            CheckoutError::Gateway(_) => 502,
            CheckoutError::VerificationFailed(_) => 400,
            CheckoutError::Provider { .. } => 502,
            CheckoutError::Network(_) => 503,
            CheckoutError::Serialization(_) => 500,
            CheckoutError::Internal(_) => 500,
        }
    }

    /// Stable machine-readable code, safe to hand to clients.
    /// Server-side failure classes map to a fixed code with no detail.
    pub fn client_code(&self) -> &'static str {
        match self {
            CheckoutError::Configuration(_) => "configuration_error",
            CheckoutError::Validation { .. } => "validation_error",
            CheckoutError::EmptyCart => "empty_cart",
            CheckoutError::CheckoutInFlight => "checkout_in_flight",
            CheckoutError::InvalidIntent(_) => "invalid_intent",
            CheckoutError::Gateway(_) => "gateway_error",
            CheckoutError::VerificationFailed(_) => "verification_failed",
            CheckoutError::Provider { .. } => "provider_error",
            CheckoutError::Network(_) => "network_error",
            CheckoutError::Serialization(_) => "serialization_error",
            CheckoutError::Internal(_) => "internal_error",
        }
    }
}

/// Result type alias for checkout operations
pub type CheckoutResult<T> = Result<T, CheckoutError>;
