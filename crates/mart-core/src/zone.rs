//! # Delivery Zones
//!
//! Serviceability lookup for delivery location codes (Indian PIN codes).
//! The directory is loaded from `config/zones.toml` and queried by exact
//! match; there is no partial or fuzzy matching.
//!
//! Two distinct non-success outcomes: a malformed code is a validation
//! failure rejected before any lookup, while an unknown-but-well-formed
//! code is the normal "not serviceable" answer.

use crate::error::{CheckoutError, CheckoutResult};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Validate the shape of a delivery location code: exactly six ASCII
/// digits with a nonzero leading digit (PIN codes never start with 0).
pub fn validate_pincode(code: &str) -> CheckoutResult<()> {
    let bytes = code.as_bytes();
    let well_formed = bytes.len() == 6
        && bytes.iter().all(|b| b.is_ascii_digit())
        && bytes.first() != Some(&b'0');

    if well_formed {
        Ok(())
    } else {
        Err(CheckoutError::validation(
            "pincode",
            "must be a 6-digit code with a nonzero leading digit",
        ))
    }
}

fn default_true() -> bool {
    true
}

/// A delivery zone record, read-only from the checkout engine's view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryZone {
    /// Location code this record covers
    pub pincode: String,

    /// Village or locality name
    pub village: String,

    /// Administrative district
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,

    /// Whether delivery is currently offered here
    #[serde(default = "default_true")]
    pub serviceable: bool,

    /// Delivery lead time in days
    pub delivery_days: u32,

    /// Delivery fee in major units
    pub delivery_fee: i64,

    /// Order total at which the delivery fee is waived
    pub free_above: i64,
}

impl DeliveryZone {
    pub fn terms(&self) -> DeliveryTerms {
        DeliveryTerms {
            lead_time_days: self.delivery_days,
            fee: self.delivery_fee,
            free_above: self.free_above,
        }
    }
}

/// Delivery terms for a serviceable zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryTerms {
    pub lead_time_days: u32,
    pub fee: i64,
    pub free_above: i64,
}

impl DeliveryTerms {
    /// Fee actually charged for an order of `order_total`: waived once
    /// the total reaches the free-delivery threshold.
    pub fn fee_for_order(&self, order_total: i64) -> i64 {
        if order_total >= self.free_above {
            0
        } else {
            self.fee
        }
    }
}

/// Outcome of a serviceability check for a well-formed code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneCheck {
    Serviceable(DeliveryTerms),
    Unserviceable,
}

/// Zone directory (loaded from config)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ZoneDirectory {
    pub zones: Vec<DeliveryZone>,
}

impl ZoneDirectory {
    /// Create an empty directory
    pub fn new() -> Self {
        Self { zones: Vec::new() }
    }

    /// Add a zone record
    pub fn add(&mut self, zone: DeliveryZone) {
        self.zones.push(zone);
    }

    /// Find a zone record by exact location code
    pub fn get(&self, pincode: &str) -> Option<&DeliveryZone> {
        self.zones.iter().find(|zone| zone.pincode == pincode)
    }

    /// Check serviceability for a location code. Malformed codes are
    /// rejected before any lookup; unknown well-formed codes and zones
    /// marked unserviceable both resolve to `Unserviceable`.
    pub fn check(&self, code: &str) -> CheckoutResult<ZoneCheck> {
        validate_pincode(code)?;

        match self.get(code) {
            Some(zone) if zone.serviceable => {
                debug!(pincode = %zone.pincode, village = %zone.village, "zone serviceable");
                Ok(ZoneCheck::Serviceable(zone.terms()))
            }
            _ => Ok(ZoneCheck::Unserviceable),
        }
    }

    /// Load a directory from TOML
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}
