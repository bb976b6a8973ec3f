//! # Application State
//!
//! Shared state for the Axum application: resolved configuration, the
//! delivery-zone directory, the Razorpay client, and the signature
//! verifier. Everything here is built once at startup; nothing in
//! request handling can reconfigure it.

use mart_core::ZoneDirectory;
use mart_razorpay::{RazorpayClient, RazorpayConfig, SignatureMode, SignatureVerifier};
use std::sync::Arc;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            environment: std::env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> std::net::SocketAddr {
        format!("{}:{}", self.host, self.port)
            .parse()
            .expect("Invalid socket address")
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Application config
    pub config: AppConfig,
    /// Delivery-zone directory
    pub zones: Arc<ZoneDirectory>,
    /// Razorpay Orders API client
    pub razorpay: Arc<RazorpayClient>,
    /// Payment signature verifier
    pub verifier: Arc<SignatureVerifier>,
}

impl AppState {
    /// Build state from the environment
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();

        let razorpay_config = RazorpayConfig::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to configure Razorpay: {}", e))?;

        // A deployed instance must never run with verification switched
        // off, whatever the key type says.
        if config.is_production() && razorpay_config.signature_mode == SignatureMode::AcceptAll {
            anyhow::bail!("refusing to start: signature verification is disabled in production");
        }

        let zones = load_zone_directory()?;

        Ok(Self::assemble(config, zones, razorpay_config))
    }

    /// Build state from explicit parts (tests, embedding)
    pub fn assemble(
        config: AppConfig,
        zones: ZoneDirectory,
        razorpay_config: RazorpayConfig,
    ) -> Self {
        let verifier = SignatureVerifier::from_config(&razorpay_config);
        Self {
            config,
            zones: Arc::new(zones),
            razorpay: Arc::new(RazorpayClient::new(razorpay_config)),
            verifier: Arc::new(verifier),
        }
    }
}

/// Load the zone directory from config file
fn load_zone_directory() -> anyhow::Result<ZoneDirectory> {
    let config_paths = [
        "config/zones.toml",
        "../config/zones.toml",
        "../../config/zones.toml",
    ];

    for path in config_paths {
        if let Ok(content) = std::fs::read_to_string(path) {
            let zones = ZoneDirectory::from_toml(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path, e))?;
            tracing::info!("Loaded {} delivery zones from {}", zones.len(), path);
            return Ok(zones);
        }
    }

    // Every pincode resolves "not serviceable" against an empty directory
    tracing::warn!("No zone directory found, using empty directory");
    Ok(ZoneDirectory::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_config_defaults() {
        std::env::remove_var("HOST");
        std::env::remove_var("PORT");
        std::env::remove_var("ENVIRONMENT");

        let config = AppConfig::from_env();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert!(!config.is_production());
    }

    #[test]
    fn test_socket_addr() {
        let config = AppConfig {
            host: "0.0.0.0".to_string(),
            port: 3000,
            environment: "test".to_string(),
        };

        let addr = config.socket_addr();
        assert_eq!(addr.to_string(), "0.0.0.0:3000");
    }
}
