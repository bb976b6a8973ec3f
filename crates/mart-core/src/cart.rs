//! # Cart Store
//!
//! The shopper's cart as an explicit store object: single source of truth
//! for selected items, derived totals, durable persistence, and a
//! subscribe/notify channel for anything rendering the cart.
//!
//! Totals are always recomputed from the item list; they are never stored
//! independently, so they cannot drift from the items.

use serde::{Deserialize, Serialize};
use std::sync::{PoisonError, RwLock};
use thiserror::Error;
use tokio::sync::watch;
use tracing::warn;

/// A line in the cart. Prices are integer major units (rupees);
/// `discount_price` takes precedence over `price` when present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// Product identifier, unique per product
    pub id: String,

    /// Display name
    pub name: String,

    /// Base unit price
    pub price: i64,

    /// Discounted unit price, if the product is on offer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_price: Option<i64>,

    /// Image reference
    pub image: String,

    /// Quantity, always >= 1 (a zero-quantity item is removed, not kept)
    pub quantity: u32,

    /// Source product slug
    pub slug: String,
}

impl CartItem {
    /// Unit price the shopper actually pays
    pub fn effective_price(&self) -> i64 {
        self.discount_price.unwrap_or(self.price)
    }

    /// Line total at the effective price
    pub fn line_total(&self) -> i64 {
        self.effective_price() * i64::from(self.quantity)
    }
}

/// What a product page hands to the cart; the store owns the quantity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartProduct {
    pub id: String,
    pub name: String,
    pub price: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_price: Option<i64>,
    pub image: String,
    pub slug: String,
}

impl CartProduct {
    fn into_item(self) -> CartItem {
        CartItem {
            id: self.id,
            name: self.name,
            price: self.price,
            discount_price: self.discount_price,
            image: self.image,
            quantity: 1,
            slug: self.slug,
        }
    }
}

/// Immutable view published to subscribers after every mutation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSnapshot {
    pub items: Vec<CartItem>,
    pub total_items: u32,
    pub total_price: i64,
}

/// Errors from the durable storage surface
#[derive(Debug, Error)]
pub enum CartStorageError {
    #[error("storage read failed: {0}")]
    Read(String),

    #[error("storage write failed: {0}")]
    Write(String),

    #[error("persisted cart is corrupt: {0}")]
    Corrupt(String),
}

/// Durable key-value surface holding the serialized item list.
/// A file on disk, a browser storage bridge, anything with load/save.
pub trait CartStorage: Send + Sync {
    /// Load the persisted item list. An absent payload is `Ok(vec![])`.
    fn load(&self) -> Result<Vec<CartItem>, CartStorageError>;

    /// Persist the full item list, replacing whatever was there.
    fn save(&self, items: &[CartItem]) -> Result<(), CartStorageError>;
}

/// The cart store. Mutations persist the full item list and notify
/// subscribers; storage failures are logged, never fatal.
pub struct CartStore {
    items: RwLock<Vec<CartItem>>,
    storage: Option<Box<dyn CartStorage>>,
    changes: watch::Sender<CartSnapshot>,
}

impl CartStore {
    /// Create an empty, unpersisted store (tests, previews)
    pub fn new() -> Self {
        let (changes, _) = watch::channel(CartSnapshot::default());
        Self {
            items: RwLock::new(Vec::new()),
            storage: None,
            changes,
        }
    }

    /// Create a store backed by durable storage, reloading any persisted
    /// items. A failed read or corrupt payload degrades to an empty cart.
    pub fn with_storage(storage: Box<dyn CartStorage>) -> Self {
        let mut items = match storage.load() {
            Ok(items) => items,
            Err(err) => {
                warn!("failed to reload cart, starting empty: {err}");
                Vec::new()
            }
        };
        // Quantity >= 1 is a store invariant; drop any persisted rows that
        // no longer satisfy it rather than rejecting the whole payload.
        items.retain(|item| item.quantity >= 1);

        let snapshot = Self::snapshot_of(&items);
        let (changes, _) = watch::channel(snapshot);
        Self {
            items: RwLock::new(items),
            storage: Some(storage),
            changes,
        }
    }

    /// Add a product: same id increments quantity by 1, otherwise the
    /// product is inserted with quantity 1. Always succeeds.
    pub fn add_item(&self, product: CartProduct) {
        self.mutate(|items| {
            if let Some(existing) = items.iter_mut().find(|item| item.id == product.id) {
                existing.quantity += 1;
            } else {
                items.push(product.into_item());
            }
        });
    }

    /// Remove an item; a no-op when the id is not present
    pub fn remove_item(&self, id: &str) {
        self.mutate(|items| {
            items.retain(|item| item.id != id);
        });
    }

    /// Set an item's quantity. A quantity of zero or below removes the
    /// item; that is deliberate policy, not an error.
    pub fn update_quantity(&self, id: &str, quantity: i64) {
        self.mutate(|items| {
            if quantity <= 0 {
                items.retain(|item| item.id != id);
            } else if let Some(existing) = items.iter_mut().find(|item| item.id == id) {
                existing.quantity = quantity as u32;
            }
        });
    }

    /// Empty the store
    pub fn clear(&self) {
        self.mutate(Vec::clear);
    }

    /// Current items (cloned snapshot)
    pub fn items(&self) -> Vec<CartItem> {
        self.read().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Number of distinct products
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Sum of quantities
    pub fn total_items(&self) -> u32 {
        self.read().iter().map(|item| item.quantity).sum()
    }

    /// Sum of effective-price line totals
    pub fn total_price(&self) -> i64 {
        self.read().iter().map(CartItem::line_total).sum()
    }

    /// Sum of base-price line totals, ignoring discounts
    pub fn original_total_price(&self) -> i64 {
        self.read()
            .iter()
            .map(|item| item.price * i64::from(item.quantity))
            .sum()
    }

    /// How much the shopper is saving across the cart
    pub fn total_discount(&self) -> i64 {
        self.original_total_price() - self.total_price()
    }

    /// Subscribe to mutations. The receiver observes the snapshot current
    /// at subscription time, then every later change.
    pub fn subscribe(&self) -> watch::Receiver<CartSnapshot> {
        self.changes.subscribe()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Vec<CartItem>> {
        self.items.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn mutate<F>(&self, apply: F)
    where
        F: FnOnce(&mut Vec<CartItem>),
    {
        let snapshot = {
            let mut items = self.items.write().unwrap_or_else(PoisonError::into_inner);
            apply(&mut items);
            Self::snapshot_of(&items)
        };

        if let Some(storage) = &self.storage {
            if let Err(err) = storage.save(&snapshot.items) {
                warn!("failed to persist cart: {err}");
            }
        }

        self.changes.send_replace(snapshot);
    }

    fn snapshot_of(items: &[CartItem]) -> CartSnapshot {
        CartSnapshot {
            items: items.to_vec(),
            total_items: items.iter().map(|item| item.quantity).sum(),
            total_price: items.iter().map(CartItem::line_total).sum(),
        }
    }
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new()
    }
}
