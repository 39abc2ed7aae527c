//! The cart ledger.
//!
//! Raw state is a mapping from item id to a positive quantity, kept in
//! insertion order. Everything else (lines, subtotal, tax, total) is
//! derived on read from that mapping plus the static catalog, so no stored
//! aggregate can ever disagree with the counts it came from.
//!
//! The ledger persists its full state after every mutation, overwriting the
//! record under [`CART_KEY`]. Restoring from a malformed record yields an
//! empty cart; a stored id that has left the catalog joins as a zero-price
//! "Unknown" placeholder instead of dropping the line or failing.

use std::fmt;

use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{MapAccess, Visitor},
    ser::SerializeMap,
};

use crate::{
    catalog,
    config::{Config, TaxPolicy},
    error::AppError,
    storage::{self, CART_KEY, Store},
    utils::round2,
};

/// Item id to positive quantity, insertion ordered.
///
/// Never stores a quantity of zero or below: decrementing to zero deletes
/// the key, and non-positive entries are dropped on load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartState {
    items: Vec<(String, u32)>,
}

impl CartState {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn quantity(&self, id: &str) -> u32 {
        self.items
            .iter()
            .find(|(stored, _)| stored == id)
            .map_or(0, |(_, qty)| *qty)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.items.iter().map(|(id, qty)| (id.as_str(), *qty))
    }

    fn add(&mut self, id: &str, qty: u32) {
        match self.items.iter_mut().find(|(stored, _)| stored == id) {
            Some((_, stored_qty)) => *stored_qty += qty,
            None => self.items.push((id.to_string(), qty)),
        }
    }

    fn remove(&mut self, id: &str) {
        if let Some(pos) = self.items.iter().position(|(stored, _)| stored == id) {
            let (_, qty) = &mut self.items[pos];
            if *qty <= 1 {
                self.items.remove(pos);
            } else {
                *qty -= 1;
            }
        }
    }

    fn clear(&mut self) {
        self.items.clear();
    }
}

// Serialized as a JSON object in insertion order, matching the stored
// shape: { "m1": 2, "m2": 1 }.
impl Serialize for CartState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.items.len()))?;
        for (id, qty) in &self.items {
            map.serialize_entry(id, qty)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for CartState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CartStateVisitor;

        impl<'de> Visitor<'de> for CartStateVisitor {
            type Value = CartState;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of item ids to quantities")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<CartState, A::Error> {
                let mut items = Vec::with_capacity(access.size_hint().unwrap_or(0));

                while let Some((id, qty)) = access.next_entry::<String, u32>()? {
                    if qty > 0 {
                        items.push((id, qty));
                    }
                }

                Ok(CartState { items })
            }
        }

        deserializer.deserialize_map(CartStateVisitor)
    }
}

/// One cart row, joined against the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub qty: u32,
    pub subtotal: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Totals {
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
}

/// Derive totals from a set of lines under the configured tax policy.
pub fn totals(lines: &[CartLine], config: &Config) -> Totals {
    let subtotal: f64 = lines.iter().map(|line| line.subtotal).sum();

    let tax = match config.tax_policy {
        TaxPolicy::Rounded => round2(subtotal * config.tax_rate),
        TaxPolicy::Unrounded => subtotal * config.tax_rate,
    };

    Totals {
        subtotal,
        tax,
        total: subtotal + tax,
    }
}

/// Owns the cart state and the store it persists to.
pub struct CartLedger<S: Store> {
    state: CartState,
    store: S,
}

impl<S: Store> CartLedger<S> {
    /// Restore from `store`, degrading to an empty cart on anything
    /// unreadable.
    pub fn open(store: S) -> Self {
        let state = storage::load_or_default(&store, CART_KEY);
        Self { state, store }
    }

    pub fn state(&self) -> &CartState {
        &self.state
    }

    /// Increment `id` by one, creating it at 1.
    pub fn add(&mut self, id: &str) -> Result<(), AppError> {
        self.add_many(id, 1)
    }

    /// Increment `id` by `qty`. A quantity below 1 is clamped to 1, never
    /// rejected. No upper bound.
    pub fn add_many(&mut self, id: &str, qty: u32) -> Result<(), AppError> {
        self.state.add(id, qty.max(1));
        self.persist()
    }

    /// Decrement `id` by one, deleting the key when it reaches zero.
    /// Removing an absent id leaves the cart unchanged.
    pub fn remove(&mut self, id: &str) -> Result<(), AppError> {
        self.state.remove(id);
        self.persist()
    }

    pub fn clear(&mut self) -> Result<(), AppError> {
        self.state.clear();
        self.persist()
    }

    /// One line per stored item, in insertion order, joined against the
    /// catalog by id. Unknown ids become zero-price placeholders.
    pub fn lines(&self) -> Vec<CartLine> {
        self.state
            .iter()
            .map(|(id, qty)| match catalog::find(id) {
                Some(entry) => CartLine {
                    id: entry.id.to_string(),
                    name: entry.name.to_string(),
                    price: entry.price,
                    qty,
                    subtotal: qty as f64 * entry.price,
                },
                None => CartLine {
                    id: id.to_string(),
                    name: "Unknown".to_string(),
                    price: 0.0,
                    qty,
                    subtotal: 0.0,
                },
            })
            .collect()
    }

    pub fn totals(&self, config: &Config) -> Totals {
        totals(&self.lines(), config)
    }

    fn persist(&mut self) -> Result<(), AppError> {
        storage::persist(&mut self.store, CART_KEY, &self.state)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn ledger() -> CartLedger<MemoryStore> {
        CartLedger::open(MemoryStore::new())
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_add_and_remove() {
        let mut cart = ledger();

        cart.add("m1").unwrap();
        cart.add("m1").unwrap();
        assert_eq!(cart.state().quantity("m1"), 2);

        cart.remove("m1").unwrap();
        assert_eq!(cart.state().quantity("m1"), 1);

        // Hitting zero deletes the key entirely.
        cart.remove("m1").unwrap();
        assert_eq!(cart.state().quantity("m1"), 0);
        assert!(cart.state().is_empty());
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut cart = ledger();

        cart.remove("m1").unwrap();
        assert!(cart.state().is_empty());

        cart.add("m2").unwrap();
        cart.remove("m1").unwrap();
        assert_eq!(cart.state().quantity("m2"), 1);
        assert_eq!(cart.state().len(), 1);
    }

    #[test]
    fn test_no_stored_quantity_below_one() {
        let mut cart = ledger();

        cart.add("m1").unwrap();
        for _ in 0..5 {
            cart.remove("m1").unwrap();
        }
        cart.add("m2").unwrap();
        cart.remove("m3").unwrap();

        for (_, qty) in cart.state().iter() {
            assert!(qty >= 1);
        }
    }

    #[test]
    fn test_quantity_clamped_to_one() {
        let mut cart = ledger();

        cart.add_many("m1", 0).unwrap();
        assert_eq!(cart.state().quantity("m1"), 1);

        cart.add_many("m1", 3).unwrap();
        assert_eq!(cart.state().quantity("m1"), 4);
    }

    #[test]
    fn test_worked_example() {
        let mut cart = ledger();
        let config = Config::default();

        cart.add("m1").unwrap();
        cart.add("m1").unwrap();
        cart.add("m2").unwrap();

        let lines = cart.lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].id, "m1");
        assert_eq!(lines[0].qty, 2);
        assert!(close(lines[0].subtotal, 23.0));
        assert_eq!(lines[1].id, "m2");
        assert_eq!(lines[1].qty, 1);
        assert!(close(lines[1].subtotal, 13.0));

        let totals = cart.totals(&config);
        assert!(close(totals.subtotal, 36.0));
        assert!(close(totals.tax, 2.97));
        assert!(close(totals.total, 38.97));
    }

    #[test]
    fn test_total_is_subtotal_plus_tax() {
        let mut cart = ledger();

        cart.add("m4").unwrap();
        cart.add("m7").unwrap();
        cart.add("m8").unwrap();

        for policy in [TaxPolicy::Rounded, TaxPolicy::Unrounded] {
            let config = Config {
                tax_policy: policy,
                ..Config::default()
            };
            let totals = cart.totals(&config);

            assert_eq!(totals.total, totals.subtotal + totals.tax);
        }
    }

    #[test]
    fn test_unrounded_policy_keeps_precision() {
        let mut cart = ledger();
        cart.add("m1").unwrap();
        cart.add("m1").unwrap();
        cart.add("m2").unwrap();

        let config = Config {
            tax_policy: TaxPolicy::Unrounded,
            ..Config::default()
        };
        let totals = cart.totals(&config);

        assert!(close(totals.tax, 36.0 * 0.0825));
    }

    #[test]
    fn test_clear() {
        let mut cart = ledger();
        let config = Config::default();

        cart.add("m1").unwrap();
        cart.add("m5").unwrap();
        cart.clear().unwrap();

        assert!(cart.lines().is_empty());
        let totals = cart.totals(&config);
        assert_eq!(totals.subtotal, 0.0);
        assert_eq!(totals.tax, 0.0);
        assert_eq!(totals.total, 0.0);
    }

    #[test]
    fn test_derivation_is_idempotent() {
        let mut cart = ledger();
        let config = Config::default();

        cart.add("m3").unwrap();
        cart.add("m6").unwrap();
        cart.add("m3").unwrap();

        assert_eq!(cart.lines(), cart.lines());
        assert_eq!(cart.totals(&config), cart.totals(&config));
    }

    #[test]
    fn test_unknown_id_is_zero_price_placeholder() {
        let mut cart = ledger();
        let config = Config::default();

        cart.add("m1").unwrap();
        cart.add("retired-item").unwrap();

        let lines = cart.lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].name, "Unknown");
        assert_eq!(lines[1].price, 0.0);
        assert_eq!(lines[1].subtotal, 0.0);

        // The placeholder contributes zero, totals stay consistent.
        let totals = cart.totals(&config);
        assert!(close(totals.subtotal, 11.5));
    }

    #[test]
    fn test_persists_and_restores_in_insertion_order() {
        let mut store = MemoryStore::new();

        {
            let mut cart = CartLedger::open(&mut store);
            cart.add("m2").unwrap();
            cart.add("m1").unwrap();
            cart.add("m2").unwrap();
        }

        let cart = CartLedger::open(&mut store);
        let ids: Vec<_> = cart.state().iter().map(|(id, _)| id.to_string()).collect();

        assert_eq!(ids, ["m2", "m1"]);
        assert_eq!(cart.state().quantity("m2"), 2);
        assert_eq!(cart.state().quantity("m1"), 1);
    }

    #[test]
    fn test_corrupt_record_restores_empty() {
        let mut store = MemoryStore::new();
        store.write(CART_KEY, "}{ definitely not json").unwrap();

        let cart = CartLedger::open(store);

        assert!(cart.state().is_empty());
    }

    #[test]
    fn test_stored_zero_quantity_is_dropped() {
        let mut store = MemoryStore::new();
        store.write(CART_KEY, r#"{"m1":2,"m2":0}"#).unwrap();

        let cart = CartLedger::open(store);

        assert_eq!(cart.state().quantity("m1"), 2);
        assert_eq!(cart.state().len(), 1);
    }
}
