//! # Invoice Module
//!
//! The invoice model, derived from the cart at the moment a bill is
//! finalized. Rendering to PDF lives in `stockroom-billing`; this module
//! only decides what the document says.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ Invoice                                      │
//! │ No. 3F2A9C1B        2026-10-19 14:02 UTC     │
//! │                                              │
//! │ Item        Quantity    Price      Total     │
//! │ Blue Pen    2           5.00       10.00     │
//! │ Notebook    1           20.00      20.00     │
//! │                                              │
//! │ Total: 30.00                                 │
//! └──────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::cart::{Cart, CartLine};
use crate::money::Money;

/// Document header.
pub const INVOICE_TITLE: &str = "Invoice";

/// Table column headers, in order.
pub const INVOICE_COLUMNS: [&str; 4] = ["Item", "Quantity", "Price", "Total"];

// =============================================================================
// Invoice Row
// =============================================================================

/// One table row: a committed cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceRow {
    pub name: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub line_total: Money,
}

impl InvoiceRow {
    pub fn from_line(line: &CartLine) -> Self {
        InvoiceRow {
            name: line.name().to_string(),
            quantity: line.bill_quantity,
            unit_price: line.unit_price(),
            line_total: line.line_total(),
        }
    }

    /// Cell texts in [`INVOICE_COLUMNS`] order.
    pub fn cells(&self) -> [String; 4] {
        [
            self.name.clone(),
            self.quantity.to_string(),
            self.unit_price.to_string(),
            self.line_total.to_string(),
        ]
    }
}

// =============================================================================
// Invoice
// =============================================================================

/// A finalized bill, ready to be rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    /// Unique invoice id.
    pub id: Uuid,

    /// When the bill was finalized.
    pub issued_at: DateTime<Utc>,

    /// One row per cart line, in cart order.
    pub rows: Vec<InvoiceRow>,

    /// Grand total.
    pub total: Money,
}

impl Invoice {
    /// Builds an invoice from committed cart lines.
    pub fn from_lines(lines: &[CartLine]) -> Self {
        let rows: Vec<InvoiceRow> = lines.iter().map(InvoiceRow::from_line).collect();
        let total = rows.iter().map(|row| row.line_total).sum();

        Invoice {
            id: Uuid::new_v4(),
            issued_at: Utc::now(),
            rows,
            total,
        }
    }

    pub fn from_cart(cart: &Cart) -> Self {
        Self::from_lines(cart.lines())
    }

    /// Short human-facing number: the first 8 hex digits of the id.
    pub fn number(&self) -> String {
        let simple = self.id.simple().to_string();
        simple[..8].to_ascii_uppercase()
    }

    /// `invoice-<number>.pdf`.
    pub fn file_name(&self) -> String {
        format!("invoice-{}.pdf", self.number())
    }

    /// Line under the title: number and issue time.
    pub fn subtitle(&self) -> String {
        format!(
            "No. {}    {}",
            self.number(),
            self.issued_at.format("%Y-%m-%d %H:%M UTC")
        )
    }

    /// Trailing total line, with an optional currency label.
    pub fn total_line(&self, currency: &str) -> String {
        if currency.trim().is_empty() {
            format!("Total: {}", self.total)
        } else {
            format!("Total: {} {}", currency.trim(), self.total)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartAggregator;
    use crate::types::CatalogItem;

    fn two_line_cart() -> CartAggregator {
        let mut cart = CartAggregator::new();
        let a = CatalogItem::new("A", "Blue Pen", 10, Money::from_cents(500));
        let b = CatalogItem::new("B", "Notebook", 4, Money::from_cents(2000));
        cart.add_to_bill(&a);
        cart.add_to_bill(&a);
        cart.add_to_bill(&b);
        cart
    }

    #[test]
    fn test_invoice_rows_follow_cart_order() {
        let cart = two_line_cart();
        let invoice = Invoice::from_cart(cart.cart());

        assert_eq!(invoice.rows.len(), 2);
        assert_eq!(
            invoice.rows[0].cells(),
            [
                "Blue Pen".to_string(),
                "2".to_string(),
                "5.00".to_string(),
                "10.00".to_string()
            ]
        );
        assert_eq!(invoice.rows[1].name, "Notebook");
        assert_eq!(invoice.total, Money::from_cents(3000));
    }

    #[test]
    fn test_total_line() {
        let invoice = Invoice::from_cart(two_line_cart().cart());
        assert_eq!(invoice.total_line(""), "Total: 30.00");
        assert_eq!(invoice.total_line("Rs"), "Total: Rs 30.00");
    }

    #[test]
    fn test_file_name_uses_number() {
        let invoice = Invoice::from_lines(&[]);
        let number = invoice.number();

        assert_eq!(number.len(), 8);
        assert!(number.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(invoice.file_name(), format!("invoice-{number}.pdf"));
        assert!(invoice.is_empty());
    }
}
