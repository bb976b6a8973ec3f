//! # Payment Signature Verification
//!
//! Razorpay signs a completed payment with an HMAC-SHA256 over
//! `"{order_id}|{payment_id}"` keyed by the key secret. This check is the
//! sole authenticity gate for "payment succeeded", so the comparison is
//! constant-time and the verifier never panics or errors: anything
//! malformed simply fails verification.

use crate::config::{RazorpayConfig, SignatureMode};

/// Compute the hex HMAC-SHA256 signature for an (order id, payment id)
/// pair with the given secret.
pub fn compute_signature(secret: &str, order_id: &str, payment_id: &str) -> String {
    use hmac::{Hmac, Mac};
    use sha2::Sha256;

    type HmacSha256 = Hmac<Sha256>;

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(order_id.as_bytes());
    mac.update(b"|");
    mac.update(payment_id.as_bytes());
    let result = mac.finalize();
    hex::encode(result.into_bytes())
}

fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes()
        .zip(b.bytes())
        .fold(0, |acc, (x, y)| acc | (x ^ y))
        == 0
}

/// Verifier for payment-completion signatures. Pure: same inputs, same
/// answer, no side effects.
#[derive(Debug, Clone)]
pub struct SignatureVerifier {
    secret: String,
    mode: SignatureMode,
}

impl SignatureVerifier {
    /// Verifier with real verification enforced
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            mode: SignatureMode::Enforced,
        }
    }

    /// Verifier taking its secret and mode from the resolved config
    pub fn from_config(config: &RazorpayConfig) -> Self {
        Self {
            secret: config.key_secret.clone(),
            mode: config.signature_mode,
        }
    }

    pub fn mode(&self) -> SignatureMode {
        self.mode
    }

    /// Check that `signature` is the legitimate provider signature for
    /// this payment. Returns `false`, never an error, when any input
    /// is empty.
    pub fn verify(&self, payment_id: &str, order_id: &str, signature: &str) -> bool {
        if self.mode == SignatureMode::AcceptAll {
            return true;
        }

        if payment_id.is_empty() || order_id.is_empty() || signature.is_empty() {
            return false;
        }

        let expected = compute_signature(&self.secret, order_id, payment_id);
        constant_time_compare(signature, &expected)
    }
}
