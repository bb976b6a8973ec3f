//! # File-backed Cart Storage
//!
//! The durable key-value surface behind `CartStore`: one JSON file
//! holding the serialized item list. An absent file is an empty cart;
//! a corrupt file is reported as such and the store degrades to empty.

use mart_core::{CartItem, CartStorage, CartStorageError};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Cart persistence at a single JSON file path
pub struct FileCartStorage {
    path: PathBuf,
}

impl FileCartStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CartStorage for FileCartStorage {
    fn load(&self) -> Result<Vec<CartItem>, CartStorageError> {
        let payload = match fs::read_to_string(&self.path) {
            Ok(payload) => payload,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no persisted cart");
                return Ok(Vec::new());
            }
            Err(err) => return Err(CartStorageError::Read(err.to_string())),
        };

        serde_json::from_str(&payload).map_err(|err| CartStorageError::Corrupt(err.to_string()))
    }

    fn save(&self, items: &[CartItem]) -> Result<(), CartStorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|err| CartStorageError::Write(err.to_string()))?;
        }

        let payload = serde_json::to_string(items)
            .map_err(|err| CartStorageError::Write(err.to_string()))?;
        fs::write(&self.path, payload).map_err(|err| CartStorageError::Write(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mart_core::{CartProduct, CartStore};
    use uuid::Uuid;

    fn scratch_path() -> PathBuf {
        std::env::temp_dir().join(format!("mart-cart-{}.json", Uuid::new_v4().simple()))
    }

    fn product(id: &str, price: i64) -> CartProduct {
        CartProduct {
            id: id.to_string(),
            name: format!("Product {id}"),
            price,
            discount_price: None,
            image: format!("/images/{id}.jpg"),
            slug: format!("product-{id}"),
        }
    }

    #[test]
    fn test_cart_survives_reload() {
        let path = scratch_path();

        {
            let cart = CartStore::with_storage(Box::new(FileCartStorage::new(&path)));
            cart.add_item(product("rice-5kg", 350));
            cart.add_item(product("rice-5kg", 350));
            cart.add_item(product("dal-1kg", 120));
        }

        let reloaded = CartStore::with_storage(Box::new(FileCartStorage::new(&path)));
        assert_eq!(reloaded.total_items(), 3);
        assert_eq!(reloaded.total_price(), 2 * 350 + 120);

        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_missing_file_is_empty_cart() {
        let storage = FileCartStorage::new(scratch_path());
        assert_eq!(storage.load().unwrap(), Vec::new());
    }

    #[test]
    fn test_corrupt_payload_reported_and_store_degrades() {
        let path = scratch_path();
        fs::write(&path, "{not json").unwrap();

        let storage = FileCartStorage::new(&path);
        assert!(matches!(
            storage.load(),
            Err(CartStorageError::Corrupt(_))
        ));

        // The store treats that as an empty cart, not a fatal error
        let cart = CartStore::with_storage(Box::new(FileCartStorage::new(&path)));
        assert!(cart.is_empty());

        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_clear_persists_empty_list() {
        let path = scratch_path();

        let cart = CartStore::with_storage(Box::new(FileCartStorage::new(&path)));
        cart.add_item(product("rice-5kg", 350));
        cart.clear();

        let reloaded = CartStore::with_storage(Box::new(FileCartStorage::new(&path)));
        assert!(reloaded.is_empty());

        fs::remove_file(&path).ok();
    }
}
