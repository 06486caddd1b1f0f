//! The cart store.
//!
//! A mapping from menu-entry id to a positive quantity, held in the
//! session. Persistence is an explicit boundary: handlers call
//! [`Cart::load`] at the top and [`Cart::save`] after mutating. Writes are
//! whole-map and last-writer-wins; concurrent tabs are not coordinated.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::models::session_keys;

/// Client-held selection of menu entries and quantities, prior to order
/// submission.
///
/// Invariant: no entry ever holds a quantity of zero or less - mutations
/// that would reach zero delete the entry instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: BTreeMap<String, u32>,
}

impl Cart {
    /// Load the cart from the session, discarding any malformed entry.
    ///
    /// A missing or unreadable cart rehydrates as empty; individual entries
    /// that are not positive integers are dropped.
    pub async fn load(session: &Session) -> Self {
        let raw: Option<BTreeMap<String, serde_json::Value>> =
            session.get(session_keys::CART).await.ok().flatten();

        let mut items = BTreeMap::new();
        if let Some(raw) = raw {
            for (key, value) in raw {
                if let Some(quantity) = value.as_u64()
                    && quantity > 0
                    && let Ok(quantity) = u32::try_from(quantity)
                {
                    items.insert(key, quantity);
                }
            }
        }
        Self { items }
    }

    /// Persist the full map to the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store rejects the write.
    pub async fn save(&self, session: &Session) -> Result<(), tower_sessions::session::Error> {
        session.insert(session_keys::CART, &self.items).await
    }

    /// Increment the entry's quantity by 1, creating it at 1 if absent.
    pub fn add(&mut self, entry_id: &str) {
        *self.items.entry(entry_id.to_string()).or_insert(0) += 1;
    }

    /// Decrement the entry's quantity; the entry is deleted when it would
    /// reach zero.
    pub fn remove(&mut self, entry_id: &str) {
        match self.items.get_mut(entry_id) {
            Some(quantity) if *quantity > 1 => *quantity -= 1,
            Some(_) => {
                self.items.remove(entry_id);
            }
            None => {}
        }
    }

    /// Set an entry's quantity directly; zero (or less, at call sites that
    /// parse signed input) deletes the entry.
    pub fn set_quantity(&mut self, entry_id: &str, quantity: u32) {
        if quantity == 0 {
            self.items.remove(entry_id);
        } else {
            self.items.insert(entry_id.to_string(), quantity);
        }
    }

    /// Empty the map.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Stored quantity for an entry, or 0.
    #[must_use]
    pub fn quantity(&self, entry_id: &str) -> u32 {
        self.items.get(entry_id).copied().unwrap_or(0)
    }

    /// Sum of all quantities.
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.items.values().sum()
    }

    /// Whether the cart holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate over `(entry_id, quantity)` pairs in id order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, u32)> {
        self.items.iter().map(|(id, qty)| (id.as_str(), *qty))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_add_creates_and_increments() {
        let mut cart = Cart::default();
        cart.add("11");
        cart.add("11");
        cart.add("12");
        assert_eq!(cart.quantity("11"), 2);
        assert_eq!(cart.quantity("12"), 1);
        assert_eq!(cart.total_items(), 3);
    }

    #[test]
    fn test_remove_decrements_then_deletes() {
        let mut cart = Cart::default();
        cart.add("11");
        cart.add("11");
        cart.remove("11");
        assert_eq!(cart.quantity("11"), 1);
        cart.remove("11");
        assert_eq!(cart.quantity("11"), 0);
        assert!(cart.is_empty());
        // Removing an absent entry is a no-op
        cart.remove("11");
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_zero_deletes_entry() {
        let mut cart = Cart::default();
        cart.set_quantity("11", 4);
        assert_eq!(cart.quantity("11"), 4);
        cart.set_quantity("11", 0);
        assert_eq!(cart.quantity("11"), 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_absent_entry_reads_zero() {
        let cart = Cart::default();
        assert_eq!(cart.quantity("does-not-exist"), 0);
    }

    #[test]
    fn test_total_matches_sum_under_interleaving() {
        // Any interleaving of add/remove keeps total == sum of quantities,
        // never negative
        let mut cart = Cart::default();
        let ops: &[(&str, bool)] = &[
            ("1", true),
            ("2", true),
            ("1", true),
            ("3", false), // remove of absent id
            ("2", false),
            ("2", false), // remove past zero
            ("1", true),
            ("1", false),
        ];
        for (id, is_add) in ops {
            if *is_add {
                cart.add(id);
            } else {
                cart.remove(id);
            }
        }
        let sum: u32 = cart.entries().map(|(_, qty)| qty).sum();
        assert_eq!(cart.total_items(), sum);
        assert_eq!(cart.quantity("1"), 2);
        assert_eq!(cart.quantity("2"), 0);
    }

    #[test]
    fn test_serde_shape_matches_storage_format() {
        let mut cart = Cart::default();
        cart.set_quantity("11", 2);
        cart.set_quantity("12", 1);
        // Persisted form is the bare id -> quantity map
        let json = serde_json::to_value(&cart).unwrap();
        assert_eq!(json, serde_json::json!({"11": 2, "12": 1}));

        let reloaded: Cart = serde_json::from_value(json).unwrap();
        assert_eq!(reloaded, cart);
    }

    #[tokio::test]
    async fn test_session_round_trip() {
        use tower_sessions::{MemoryStore, Session};

        let store = MemoryStore::default();
        let session = Session::new(None, std::sync::Arc::new(store), None);

        let mut cart = Cart::default();
        cart.add("11");
        cart.set_quantity("12", 3);
        cart.save(&session).await.unwrap();

        let reloaded = Cart::load(&session).await;
        assert_eq!(reloaded, cart);
    }

    #[tokio::test]
    async fn test_rehydration_discards_invalid_entries() {
        use tower_sessions::{MemoryStore, Session};

        let store = MemoryStore::default();
        let session = Session::new(None, std::sync::Arc::new(store), None);

        // Simulate a corrupted persisted map: negative, zero, and
        // non-numeric quantities must be dropped on load
        session
            .insert(
                session_keys::CART,
                serde_json::json!({"11": 2, "12": 0, "13": -4, "14": "two"}),
            )
            .await
            .unwrap();

        let cart = Cart::load(&session).await;
        assert_eq!(cart.quantity("11"), 2);
        assert_eq!(cart.total_items(), 2);
    }
}
