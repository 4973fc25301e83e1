//! # Cart Module
//!
//! The bill being built at the counter.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Aggregator Operations                           │
//! │                                                                         │
//! │  User Action              Operation                  Cart Change        │
//! │  ───────────              ─────────                  ───────────        │
//! │                                                                         │
//! │  Pick item ──────────────► add_to_bill() ──────────► LineAdded /        │
//! │                                                      QuantityChanged    │
//! │                                                                         │
//! │  Type quantity ──────────► apply_quantity_input() ─► QuantityChanged    │
//! │                            (bad text ignored)                           │
//! │                                                                         │
//! │  Click remove ───────────► remove_bill_item() ─────► LineRemoved        │
//! │                                                                         │
//! │  Cancel / finalized ─────► clear() ────────────────► Cleared            │
//! │                                                                         │
//! │  Every change: revision += 1, then every subscriber is called with      │
//! │  the change and the cart as it now stands.                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - At most one line per item id (re-adding bumps the quantity)
//! - Quantities coming through [`CartAggregator::apply_quantity_input`]
//!   are always positive
//! - [`CartAggregator::update_bill_item_quantity`] does not clamp; the
//!   finalizer rejects non-positive lines before committing anything

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::CatalogItem;
use crate::validation::parse_quantity_input;

// =============================================================================
// Cart Line
// =============================================================================

/// A catalog item selected for the bill.
///
/// The item is a frozen copy taken when the line was created: its stock
/// quantity is what the commit decrements from, and its price is what the
/// invoice shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Snapshot of the catalog item.
    #[serde(flatten)]
    pub item: CatalogItem,

    /// Units on the bill.
    pub bill_quantity: i64,

    /// When the line was first added.
    pub added_at: DateTime<Utc>,
}

impl CartLine {
    fn new(item: &CatalogItem) -> Self {
        CartLine {
            item: item.clone(),
            bill_quantity: 1,
            added_at: Utc::now(),
        }
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.item.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.item.name
    }

    #[inline]
    pub fn unit_price(&self) -> Money {
        self.item.price
    }

    /// Stock known when the line was created.
    #[inline]
    pub fn stock(&self) -> i64 {
        self.item.quantity
    }

    /// Unit price × bill quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.item.price * self.bill_quantity
    }

    /// Stock left once this line is committed.
    #[inline]
    pub fn remaining_stock(&self) -> i64 {
        self.item.quantity.saturating_sub(self.bill_quantity)
    }

    /// The record sent to the backend when this line is committed.
    pub fn committed_item(&self) -> CatalogItem {
        self.item.with_quantity(self.remaining_stock())
    }
}

// =============================================================================
// Cart
// =============================================================================

/// Read-only view of the bill.
///
/// Each mutation through [`CartAggregator`] produces a new revision, so
/// observers can tell two states apart without comparing lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
    revision: u64,
}

impl Cart {
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Looks up the line for an item id.
    pub fn line(&self, item_id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.id() == item_id)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Monotonic change counter, starting at 0 for a fresh cart.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// `Σ price × bill_quantity`, recomputed on every call.
    pub fn total(&self) -> Money {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Sum of bill quantities across lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines
            .iter()
            .fold(0i64, |sum, line| sum.saturating_add(line.bill_quantity))
    }

    fn position(&self, item_id: &str) -> Option<usize> {
        self.lines.iter().position(|line| line.id() == item_id)
    }
}

// =============================================================================
// Change Notification
// =============================================================================

/// What a cart mutation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartChange {
    /// A new line was created with quantity 1.
    LineAdded { item_id: String },

    /// An existing line's quantity was overwritten or incremented.
    QuantityChanged {
        item_id: String,
        previous: i64,
        current: i64,
    },

    /// A line was removed.
    LineRemoved { item_id: String },

    /// Every line was dropped.
    Cleared,
}

/// Handle returned by [`CartAggregator::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn Fn(&CartChange, &Cart) + Send + Sync>;

// =============================================================================
// Cart Aggregator
// =============================================================================

/// Owns the cart and applies every mutation to it.
///
/// ## Example
/// ```rust
/// use stockroom_core::{CartAggregator, CatalogItem, Money};
///
/// let pen = CatalogItem::new("p1", "Pen", 10, Money::from_cents(500));
/// let mut cart = CartAggregator::new();
///
/// cart.add_to_bill(&pen);
/// cart.apply_quantity_input("p1", "4");
/// cart.apply_quantity_input("p1", "abc"); // ignored
///
/// assert_eq!(cart.line("p1").unwrap().bill_quantity, 4);
/// assert_eq!(cart.calculate_total(), Money::from_cents(2000));
/// ```
#[derive(Default)]
pub struct CartAggregator {
    cart: Cart,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl CartAggregator {
    /// Creates an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    // -------------------------------------------------------------------------
    // Mutations
    // -------------------------------------------------------------------------

    /// Adds one unit of `item` to the bill.
    ///
    /// An existing line for the same id gets `bill_quantity += 1`; otherwise
    /// a new line with quantity 1 is appended. No stock bound is applied.
    pub fn add_to_bill(&mut self, item: &CatalogItem) {
        let change = match self.cart.position(&item.id) {
            Some(index) => {
                let line = &mut self.cart.lines[index];
                let previous = line.bill_quantity;
                line.bill_quantity = line.bill_quantity.saturating_add(1);
                CartChange::QuantityChanged {
                    item_id: item.id.clone(),
                    previous,
                    current: line.bill_quantity,
                }
            }
            None => {
                self.cart.lines.push(CartLine::new(item));
                CartChange::LineAdded {
                    item_id: item.id.clone(),
                }
            }
        };

        self.commit(change);
    }

    /// Like [`add_to_bill`](Self::add_to_bill), but refuses items with no
    /// stock, the way the bill view disables their add button.
    pub fn try_add_to_bill(&mut self, item: &CatalogItem) -> CoreResult<()> {
        if !item.is_in_stock() {
            return Err(CoreError::OutOfStock {
                id: item.id.clone(),
                name: item.name.clone(),
            });
        }

        self.add_to_bill(item);
        Ok(())
    }

    /// Removes the line for `item_id`. Unknown ids are ignored.
    pub fn remove_bill_item(&mut self, item_id: &str) {
        if let Some(index) = self.cart.position(item_id) {
            self.cart.lines.remove(index);
            self.commit(CartChange::LineRemoved {
                item_id: item_id.to_string(),
            });
        }
    }

    /// Overwrites the bill quantity of a line.
    ///
    /// Any integer is accepted, including values above stock or below 1.
    /// Unknown ids and unchanged values are no-ops.
    pub fn update_bill_item_quantity(&mut self, item_id: &str, new_quantity: i64) {
        let Some(index) = self.cart.position(item_id) else {
            return;
        };

        let line = &mut self.cart.lines[index];
        let previous = line.bill_quantity;
        if previous == new_quantity {
            return;
        }
        line.bill_quantity = new_quantity;

        self.commit(CartChange::QuantityChanged {
            item_id: item_id.to_string(),
            previous,
            current: new_quantity,
        });
    }

    /// Applies the raw text of a quantity input control.
    ///
    /// Non-numeric, empty and non-positive text leaves the previous value
    /// in effect. Returns whether the new value was applied.
    pub fn apply_quantity_input(&mut self, item_id: &str, raw: &str) -> bool {
        if self.cart.position(item_id).is_none() {
            return false;
        }

        match parse_quantity_input(raw) {
            Ok(quantity) => {
                self.update_bill_item_quantity(item_id, quantity);
                true
            }
            Err(_) => false,
        }
    }

    /// Drops every line (bill cancelled or finalized).
    pub fn clear(&mut self) {
        if self.cart.lines.is_empty() {
            return;
        }

        self.cart.lines.clear();
        self.commit(CartChange::Cleared);
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    /// `Σ price × bill_quantity` over all lines.
    pub fn calculate_total(&self) -> Money {
        self.cart.total()
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn lines(&self) -> &[CartLine] {
        self.cart.lines()
    }

    pub fn line(&self, item_id: &str) -> Option<&CartLine> {
        self.cart.line(item_id)
    }

    pub fn len(&self) -> usize {
        self.cart.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    pub fn total_quantity(&self) -> i64 {
        self.cart.total_quantity()
    }

    pub fn revision(&self) -> u64 {
        self.cart.revision()
    }

    // -------------------------------------------------------------------------
    // Subscriptions
    // -------------------------------------------------------------------------

    /// Registers a listener called after every mutation.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: Fn(&CartChange, &Cart) + Send + Sync + 'static,
    {
        self.next_subscription += 1;
        let id = SubscriptionId(self.next_subscription);
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a listener. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    fn commit(&mut self, change: CartChange) {
        self.cart.revision += 1;
        for (_, listener) in &self.listeners {
            listener(&change, &self.cart);
        }
    }
}

impl fmt::Debug for CartAggregator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartAggregator")
            .field("cart", &self.cart)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn item(id: &str, stock: i64, cents: i64) -> CatalogItem {
        CatalogItem::new(id, format!("Item {id}"), stock, Money::from_cents(cents))
    }

    #[test]
    fn test_repeated_add_keeps_one_line() {
        let pen = item("a", 10, 500);
        let mut cart = CartAggregator::new();

        for _ in 0..7 {
            cart.add_to_bill(&pen);
        }

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.line("a").unwrap().bill_quantity, 7);
    }

    #[test]
    fn test_add_does_not_bound_by_stock() {
        let scarce = item("a", 1, 500);
        let mut cart = CartAggregator::new();
        cart.add_to_bill(&scarce);
        cart.add_to_bill(&scarce);
        assert_eq!(cart.line("a").unwrap().bill_quantity, 2);
    }

    #[test]
    fn test_try_add_rejects_out_of_stock() {
        let empty = item("z", 0, 500);
        let mut cart = CartAggregator::new();

        let err = cart.try_add_to_bill(&empty).unwrap_err();
        assert!(matches!(err, CoreError::OutOfStock { .. }));
        assert!(cart.is_empty());
        assert_eq!(cart.revision(), 0);
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let mut cart = CartAggregator::new();
        cart.add_to_bill(&item("a", 5, 100));
        let before = cart.cart().clone();

        cart.remove_bill_item("missing");

        assert_eq!(cart.cart(), &before);
    }

    #[test]
    fn test_remove_existing_line() {
        let mut cart = CartAggregator::new();
        cart.add_to_bill(&item("a", 5, 100));
        cart.add_to_bill(&item("b", 5, 100));

        cart.remove_bill_item("a");

        let ids: Vec<&str> = cart.lines().iter().map(CartLine::id).collect();
        assert_eq!(ids, vec!["b"]);
    }

    #[test]
    fn test_calculate_total() {
        let mut cart = CartAggregator::new();
        assert_eq!(cart.calculate_total(), Money::zero());

        cart.add_to_bill(&item("a", 10, 1000));
        cart.update_bill_item_quantity("a", 3);
        assert_eq!(cart.calculate_total(), Money::from_cents(3000));

        cart.add_to_bill(&item("b", 10, 2000));
        assert_eq!(cart.calculate_total(), Money::from_cents(5000));
        assert_eq!(cart.total_quantity(), 4);
    }

    #[test]
    fn test_update_quantity_is_unclamped() {
        let mut cart = CartAggregator::new();
        cart.add_to_bill(&item("a", 3, 100));

        cart.update_bill_item_quantity("a", 50);
        assert_eq!(cart.line("a").unwrap().bill_quantity, 50);

        cart.update_bill_item_quantity("a", 0);
        assert_eq!(cart.line("a").unwrap().bill_quantity, 0);

        cart.update_bill_item_quantity("missing", 4);
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_quantity_input_falls_back_on_bad_text() {
        let mut cart = CartAggregator::new();
        cart.add_to_bill(&item("a", 10, 100));

        assert!(cart.apply_quantity_input("a", "6"));
        assert!(!cart.apply_quantity_input("a", ""));
        assert!(!cart.apply_quantity_input("a", "abc"));
        assert!(!cart.apply_quantity_input("a", "0"));
        assert!(!cart.apply_quantity_input("a", "-3"));
        assert!(!cart.apply_quantity_input("missing", "2"));

        assert_eq!(cart.line("a").unwrap().bill_quantity, 6);
    }

    #[test]
    fn test_huge_quantity_input_keeps_previous_value() {
        let mut cart = CartAggregator::new();
        cart.add_to_bill(&item("a", 10, 1990));

        assert!(!cart.apply_quantity_input("a", "9223372036854775807"));
        assert_eq!(cart.line("a").unwrap().bill_quantity, 1);
        assert_eq!(cart.calculate_total(), Money::from_cents(1990));
    }

    #[test]
    fn test_unclamped_quantity_total_saturates() {
        let mut cart = CartAggregator::new();
        cart.add_to_bill(&item("a", 10, 1990));
        cart.add_to_bill(&item("b", 10, 500));

        cart.update_bill_item_quantity("a", i64::MAX);

        assert_eq!(cart.calculate_total(), Money::from_cents(i64::MAX));
        assert_eq!(cart.total_quantity(), i64::MAX);
    }

    #[test]
    fn test_clear_empties_cart() {
        let mut cart = CartAggregator::new();
        cart.add_to_bill(&item("a", 10, 100));
        cart.add_to_bill(&item("b", 10, 100));

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.calculate_total(), Money::zero());
    }

    #[test]
    fn test_revision_tracks_mutations() {
        let mut cart = CartAggregator::new();
        assert_eq!(cart.revision(), 0);

        cart.add_to_bill(&item("a", 10, 100));
        cart.add_to_bill(&item("a", 10, 100));
        assert_eq!(cart.revision(), 2);

        // no-ops leave the revision alone
        cart.remove_bill_item("missing");
        cart.update_bill_item_quantity("a", 2);
        assert_eq!(cart.revision(), 2);

        cart.clear();
        cart.clear();
        assert_eq!(cart.revision(), 3);
    }

    #[test]
    fn test_subscribers_see_changes() {
        let seen: Arc<Mutex<Vec<(CartChange, Money)>>> = Arc::new(Mutex::new(Vec::new()));
        let mut cart = CartAggregator::new();

        let sink = Arc::clone(&seen);
        let id = cart.subscribe(move |change, state| {
            sink.lock().unwrap().push((change.clone(), state.total()));
        });

        cart.add_to_bill(&item("a", 10, 250));
        cart.add_to_bill(&item("a", 10, 250));
        cart.remove_bill_item("a");

        assert!(cart.unsubscribe(id));
        assert!(!cart.unsubscribe(id));
        cart.add_to_bill(&item("b", 10, 100));

        let seen = seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![
                (
                    CartChange::LineAdded {
                        item_id: "a".to_string()
                    },
                    Money::from_cents(250)
                ),
                (
                    CartChange::QuantityChanged {
                        item_id: "a".to_string(),
                        previous: 1,
                        current: 2
                    },
                    Money::from_cents(500)
                ),
                (
                    CartChange::LineRemoved {
                        item_id: "a".to_string()
                    },
                    Money::zero()
                ),
            ]
        );
    }

    #[test]
    fn test_committed_item_carries_decremented_stock() {
        let mut cart = CartAggregator::new();
        cart.add_to_bill(&item("a", 10, 100).with_category("Office"));
        cart.update_bill_item_quantity("a", 4);

        let committed = cart.line("a").unwrap().committed_item();
        assert_eq!(committed.quantity, 6);
        assert_eq!(committed.category, "Office");
    }

    #[test]
    fn test_line_serializes_flat() {
        let mut cart = CartAggregator::new();
        cart.add_to_bill(&item("a", 10, 250));
        cart.add_to_bill(&item("a", 10, 250));

        let value = serde_json::to_value(&cart.lines()[0]).unwrap();
        assert_eq!(value["id"], "a");
        assert_eq!(value["quantity"], 10);
        assert_eq!(value["bill_quantity"], 2);
        assert_eq!(value["price"], 250);
    }
}
