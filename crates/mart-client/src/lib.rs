//! # mart-client
//!
//! Shopper-side I/O for village-mart-rs: the durable cart file behind
//! `CartStore`, and the HTTP client that drives checkout against the
//! storefront API.
//!
//! ## Example
//!
//! ```rust,ignore
//! use mart_client::{ApiClient, FileCartStorage};
//! use mart_core::{CartStore, CheckoutFlow, ZoneCheck};
//! use std::sync::Arc;
//!
//! let cart = Arc::new(CartStore::with_storage(Box::new(
//!     FileCartStorage::new("~/.village-mart/cart.json"),
//! )));
//! let api = Arc::new(ApiClient::new("http://localhost:8080"));
//!
//! // Delivery gate: only a serviceable zone yields checkout terms
//! let terms = match api.check_pincode("110001").await? {
//!     ZoneCheck::Serviceable(terms) => terms,
//!     ZoneCheck::Unserviceable => return Ok(()),
//! };
//!
//! let flow = CheckoutFlow::new(cart, api, gateway);
//! flow.checkout(&terms).await?;
//! ```

pub mod api;
pub mod storage;

// Re-exports
pub use api::ApiClient;
pub use storage::FileCartStorage;
