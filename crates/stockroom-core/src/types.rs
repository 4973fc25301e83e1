//! # Domain Types
//!
//! Core domain types used throughout Stockroom.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  CatalogItem    │   │    Product      │   │     Order       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (opaque)    │   │  id (opaque)    │   │  id (opaque)    │       │
//! │  │  name           │   │  name           │   │  name, category │       │
//! │  │  quantity       │   │  category       │   │  bill_quantity  │       │
//! │  │  price          │   │  image          │   │  price          │       │
//! │  │  description    │   └─────────────────┘   │  created_at     │       │
//! │  │  category       │                         └─────────────────┘       │
//! │  └────────┬────────┘                                                    │
//! │           │ snapshot                                                    │
//! │  ┌────────▼────────┐                                                    │
//! │  │    Catalog      │  read-only copy of the backend's item list         │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every identifier is the opaque string the backend assigned. The client
//! never mints ids for stored records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::money::Money;
use crate::table::{SearchFilter, SearchScope};
use crate::validation::{validate_item_name, validate_price, validate_stock_quantity};

// =============================================================================
// Catalog Item
// =============================================================================

/// A stocked inventory item as known to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Backend identifier.
    pub id: String,

    /// Display name shown in the bill and on the invoice.
    pub name: String,

    /// Units in stock (never negative on the backend).
    pub quantity: i64,

    /// Unit price.
    pub price: Money,

    /// Free-text description.
    pub description: String,

    /// Category label.
    pub category: String,

    /// Image URL hosted by a third party, if any.
    pub image: Option<String>,
}

impl CatalogItem {
    /// Creates an item with empty description and category.
    pub fn new(id: impl Into<String>, name: impl Into<String>, quantity: i64, price: Money) -> Self {
        CatalogItem {
            id: id.into(),
            name: name.into(),
            quantity,
            price,
            description: String::new(),
            category: String::new(),
            image: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the category label.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Returns a copy of this item carrying a different stock quantity.
    ///
    /// This is the payload of a stock commit: the whole record with the
    /// decremented quantity.
    pub fn with_quantity(&self, quantity: i64) -> Self {
        CatalogItem {
            quantity,
            ..self.clone()
        }
    }

    /// Items with nothing in stock are listed but cannot be billed.
    #[inline]
    pub fn is_in_stock(&self) -> bool {
        self.quantity > 0
    }
}

// =============================================================================
// Catalog Snapshot
// =============================================================================

/// Read-only snapshot of the backend's item list.
///
/// Refreshed on demand (view mount, after a finalized bill). Never mutated
/// locally: stock only changes on the server.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<CatalogItem>,
    fetched_at: Option<DateTime<Utc>>,
}

impl Catalog {
    /// Creates a snapshot from a freshly fetched item list.
    pub fn new(items: Vec<CatalogItem>) -> Self {
        Catalog {
            items,
            fetched_at: Some(Utc::now()),
        }
    }

    /// Replaces the snapshot contents.
    pub fn replace(&mut self, items: Vec<CatalogItem>) {
        self.items = items;
        self.fetched_at = Some(Utc::now());
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    /// Looks up an item by id.
    pub fn get(&self, id: &str) -> Option<&CatalogItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Narrows the selectable list by a case-insensitive substring of the name.
    ///
    /// Empty or whitespace-only terms select everything.
    pub fn filter_by_name(&self, term: &str) -> Vec<&CatalogItem> {
        SearchFilter::new(term, SearchScope::Name).apply(&self.items)
    }

    /// When this snapshot was taken (None for an empty default snapshot).
    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// =============================================================================
// Item Draft
// =============================================================================

/// Fields of an inventory item before the backend has assigned an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDraft {
    pub name: String,
    pub description: String,
    pub quantity: i64,
    pub price: Money,
    pub category: String,
    pub image: Option<String>,
}

impl ItemDraft {
    /// Checks the fields the add/edit forms require.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_item_name(&self.name)?;
        validate_stock_quantity(self.quantity)?;
        validate_price(self.price)?;
        Ok(())
    }
}

// =============================================================================
// Product
// =============================================================================

/// An entry of the admin product catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub category: String,
    pub image: Option<String>,
}

/// Fields of a product before the backend has assigned an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    pub category: String,
    pub image: Option<String>,
}

impl ProductDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_item_name(&self.name)?;
        if self.category.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "category".to_string(),
            });
        }
        Ok(())
    }
}

// =============================================================================
// Order
// =============================================================================

/// One committed bill line as recorded by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub name: String,
    pub category: String,
    pub bill_quantity: i64,
    pub price: Money,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Unit price × billed quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.price * self.bill_quantity
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::new(vec![
            CatalogItem::new("1", "Blue Pen", 10, Money::from_cents(1500)),
            CatalogItem::new("2", "Notebook", 0, Money::from_cents(4000)),
            CatalogItem::new("3", "pencil box", 4, Money::from_cents(9900)),
        ])
    }

    #[test]
    fn test_with_quantity_keeps_other_fields() {
        let item = CatalogItem::new("1", "Blue Pen", 10, Money::from_cents(1500))
            .with_category("Stationery")
            .with_description("0.7mm");

        let updated = item.with_quantity(7);
        assert_eq!(updated.quantity, 7);
        assert_eq!(updated.name, "Blue Pen");
        assert_eq!(updated.category, "Stationery");
        assert_eq!(updated.description, "0.7mm");
        assert_eq!(item.quantity, 10);
    }

    #[test]
    fn test_is_in_stock() {
        let catalog = catalog();
        assert!(catalog.get("1").unwrap().is_in_stock());
        assert!(!catalog.get("2").unwrap().is_in_stock());
    }

    #[test]
    fn test_catalog_filter_by_name_is_case_insensitive() {
        let catalog = catalog();
        let hits: Vec<&str> = catalog
            .filter_by_name("PEN")
            .iter()
            .map(|item| item.id.as_str())
            .collect();
        assert_eq!(hits, vec!["1", "3"]);

        assert_eq!(catalog.filter_by_name("").len(), 3);
        assert!(catalog.filter_by_name("stapler").is_empty());
    }

    #[test]
    fn test_default_catalog_has_no_timestamp() {
        let mut catalog = Catalog::default();
        assert!(catalog.fetched_at().is_none());
        catalog.replace(vec![]);
        assert!(catalog.fetched_at().is_some());
    }

    #[test]
    fn test_item_draft_validation() {
        let mut draft = ItemDraft {
            name: "Stapler".to_string(),
            description: String::new(),
            quantity: 3,
            price: Money::from_cents(12000),
            category: "Office".to_string(),
            image: None,
        };
        assert!(draft.validate().is_ok());

        draft.quantity = -1;
        assert!(draft.validate().is_err());

        draft.quantity = 3;
        draft.name = "  ".to_string();
        assert!(draft.validate().is_err());
    }

    #[test]
    fn test_order_line_total() {
        let order = Order {
            id: "o1".to_string(),
            name: "Blue Pen".to_string(),
            category: "Stationery".to_string(),
            bill_quantity: 4,
            price: Money::from_cents(1500),
            created_at: Utc::now(),
        };
        assert_eq!(order.line_total(), Money::from_cents(6000));
    }
}
