//! # Inventory Summary
//!
//! Dashboard figures over a catalog snapshot.
//!
//! ```text
//!   units in stock   Σ quantity
//!   stock value      Σ quantity × price
//!   low stock        items with quantity < LOW_STOCK_THRESHOLD
//! ```

use serde::Serialize;

use crate::money::Money;
use crate::types::CatalogItem;
use crate::LOW_STOCK_THRESHOLD;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct InventorySummary {
    /// Number of distinct items.
    pub item_count: usize,

    /// Units on hand across all items.
    pub total_units: i64,

    /// Stock valued at the current unit prices.
    pub total_value: Money,

    /// Items below [`LOW_STOCK_THRESHOLD`].
    pub low_stock_count: usize,
}

impl InventorySummary {
    pub fn from_items<'a, I>(items: I) -> Self
    where
        I: IntoIterator<Item = &'a CatalogItem>,
    {
        items
            .into_iter()
            .fold(InventorySummary::default(), |mut summary, item| {
                summary.item_count += 1;
                summary.total_units = summary.total_units.saturating_add(item.quantity);
                summary.total_value += item.price * item.quantity;
                if is_low_stock(item) {
                    summary.low_stock_count += 1;
                }
                summary
            })
    }
}

/// Sold-out items count as low stock too.
#[inline]
pub fn is_low_stock(item: &CatalogItem) -> bool {
    item.quantity < LOW_STOCK_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_of_catalog() {
        let items = vec![
            CatalogItem::new("a", "Blue Pen", 25, Money::from_cents(500)),
            CatalogItem::new("b", "Notebook", 19, Money::from_cents(1990)),
            CatalogItem::new("c", "Stapler", 0, Money::from_cents(12000)),
        ];

        let summary = InventorySummary::from_items(&items);

        assert_eq!(summary.item_count, 3);
        assert_eq!(summary.total_units, 44);
        assert_eq!(summary.total_value, Money::from_cents(25 * 500 + 19 * 1990));
        assert_eq!(summary.low_stock_count, 2);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let at = CatalogItem::new("a", "Tape", LOW_STOCK_THRESHOLD, Money::from_cents(100));
        let below = at.with_quantity(LOW_STOCK_THRESHOLD - 1);

        assert!(!is_low_stock(&at));
        assert!(is_low_stock(&below));
    }

    #[test]
    fn test_empty_catalog() {
        assert_eq!(
            InventorySummary::from_items(&Vec::<CatalogItem>::new()),
            InventorySummary::default()
        );
    }
}
