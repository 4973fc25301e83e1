//! # PDF Documents
//!
//! Renders tabular documents (invoices, inventory reports) with `lopdf`.
//!
//! ## Page Layout (A4, points)
//! ```text
//!   y
//!  842 ┌────────────────────────────────────────────────┐
//!  790 │ Invoice                          (F2, 20pt)    │
//!  770 │ No. 3F2A9C1B    2026-10-19 14:02 UTC   (10pt)  │
//!  740 │ Item          Quantity   Price      Total (F2) │
//!  734 │ ────────────────────────────────────────────── │
//!  720 │ Blue Pen      2          5.00       10.00      │
//!  702 │ Notebook      1          20.00      20.00      │
//!      │ ...  rows_per_page rows, 18pt apart            │
//!      │ Total: 30.00                     (last page)   │
//!   40 │                               Page 1 of 2      │
//!    0 └────────────────────────────────────────────────┘
//!      50                                             545  x
//! ```
//!
//! The title and column headers repeat on every page. Text uses the
//! standard Helvetica fonts, so characters outside Latin-1 print as `?`.

use chrono::{DateTime, Utc};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, StringFormat, Stream};
use stockroom_client::InvoiceSettings;
use stockroom_core::{CatalogItem, Invoice, INVOICE_COLUMNS, INVOICE_TITLE};

use crate::error::BillingResult;

pub const PAGE_WIDTH: i64 = 595;
pub const PAGE_HEIGHT: i64 = 842;

const MARGIN_LEFT: i64 = 50;
const MARGIN_RIGHT: i64 = 545;
const TITLE_Y: i64 = 790;
const SUBTITLE_Y: i64 = 770;
const HEADER_Y: i64 = 740;
const RULE_Y: i64 = 734;
const FIRST_ROW_Y: i64 = 720;
const ROW_HEIGHT: i64 = 18;
const PAGE_NUMBER_Y: i64 = 40;

/// Rows that fit between the header rule and the page footer.
pub const MAX_ROWS_PER_PAGE: usize = 34;

/// Title of the inventory export.
pub const REPORT_TITLE: &str = "Inventory Report";

// =============================================================================
// Document Style
// =============================================================================

/// Presentation settings shared by every rendered document.
#[derive(Debug, Clone)]
pub struct DocumentStyle {
    /// Label printed before the grand total ("" for none).
    pub currency: String,

    /// Rows per page, capped at [`MAX_ROWS_PER_PAGE`].
    pub rows_per_page: usize,
}

impl Default for DocumentStyle {
    fn default() -> Self {
        DocumentStyle {
            currency: String::new(),
            rows_per_page: 30,
        }
    }
}

impl From<&InvoiceSettings> for DocumentStyle {
    fn from(settings: &InvoiceSettings) -> Self {
        DocumentStyle {
            currency: settings.currency.clone(),
            rows_per_page: settings.rows_per_page,
        }
    }
}

impl DocumentStyle {
    fn effective_rows_per_page(&self) -> usize {
        self.rows_per_page.clamp(1, MAX_ROWS_PER_PAGE)
    }
}

// =============================================================================
// Table Document
// =============================================================================

/// A table column: header text, left edge and how many characters fit.
#[derive(Debug, Clone)]
pub struct Column {
    pub title: String,
    pub x: i64,
    pub max_chars: usize,
}

impl Column {
    pub fn new(title: &str, x: i64, max_chars: usize) -> Self {
        Column {
            title: title.to_string(),
            x,
            max_chars,
        }
    }
}

/// A titled table with an optional trailing line.
#[derive(Debug, Clone)]
pub struct TableDocument {
    pub title: String,
    pub subtitle: Option<String>,
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<String>>,
    /// Printed under the last row on the last page.
    pub footer: Option<String>,
}

impl TableDocument {
    /// Pages needed for the rows (at least one, even when empty).
    pub fn page_count(&self, rows_per_page: usize) -> usize {
        self.rows.len().div_ceil(rows_per_page.max(1)).max(1)
    }

    /// Renders the document to PDF bytes.
    pub fn render(&self, style: &DocumentStyle) -> BillingResult<Vec<u8>> {
        let per_page = style.effective_rows_per_page();

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let regular = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let bold = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => regular,
                "F2" => bold,
            },
        });

        let empty: &[Vec<String>] = &[];
        let chunks: Vec<&[Vec<String>]> = if self.rows.is_empty() {
            vec![empty]
        } else {
            self.rows.chunks(per_page).collect()
        };
        let page_count = chunks.len();

        let mut kids: Vec<Object> = Vec::with_capacity(page_count);
        for (index, rows) in chunks.into_iter().enumerate() {
            let content = Content {
                operations: self.page_operations(rows, index + 1, page_count),
            };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
            });
            kids.push(page_id.into());
        }

        let media_box: Vec<Object> = vec![0_i64.into(), 0_i64.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()];
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count as i64,
            "MediaBox" => media_box,
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)?;
        Ok(bytes)
    }

    fn page_operations(&self, rows: &[Vec<String>], page: usize, page_count: usize) -> Vec<Operation> {
        let mut ops = Vec::new();

        push_text(&mut ops, "F2", 20, MARGIN_LEFT, TITLE_Y, &self.title);
        if let Some(subtitle) = &self.subtitle {
            push_text(&mut ops, "F1", 10, MARGIN_LEFT, SUBTITLE_Y, subtitle);
        }

        for column in &self.columns {
            push_text(&mut ops, "F2", 11, column.x, HEADER_Y, &column.title);
        }
        push_rule(&mut ops, RULE_Y);

        let mut y = FIRST_ROW_Y;
        for row in rows {
            for (column, cell) in self.columns.iter().zip(row) {
                push_text(&mut ops, "F1", 10, column.x, y, &fit(cell, column.max_chars));
            }
            y -= ROW_HEIGHT;
        }

        if page == page_count {
            if let Some(footer) = &self.footer {
                push_rule(&mut ops, y + ROW_HEIGHT / 2);
                push_text(&mut ops, "F2", 12, MARGIN_LEFT, y - 6, footer);
            }
        }

        if page_count > 1 {
            let label = format!("Page {page} of {page_count}");
            push_text(&mut ops, "F1", 9, MARGIN_RIGHT - 60, PAGE_NUMBER_Y, &label);
        }

        ops
    }
}

fn push_text(ops: &mut Vec<Operation>, font: &str, size: i64, x: i64, y: i64, text: &str) {
    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new("Tf", vec![font.into(), size.into()]));
    ops.push(Operation::new("Td", vec![x.into(), y.into()]));
    ops.push(Operation::new("Tj", vec![pdf_string(text)]));
    ops.push(Operation::new("ET", vec![]));
}

fn push_rule(ops: &mut Vec<Operation>, y: i64) {
    ops.push(Operation::new("w", vec![1_i64.into()]));
    ops.push(Operation::new("m", vec![MARGIN_LEFT.into(), y.into()]));
    ops.push(Operation::new("l", vec![MARGIN_RIGHT.into(), y.into()]));
    ops.push(Operation::new("S", vec![]));
}

/// Latin-1 bytes for the standard fonts; anything else becomes `?`.
fn pdf_string(text: &str) -> Object {
    let bytes = text
        .chars()
        .map(|c| {
            if (c as u32) < 256 && !c.is_control() {
                c as u8
            } else {
                b'?'
            }
        })
        .collect();
    Object::String(bytes, StringFormat::Literal)
}

/// Shortens text that would run into the next column.
fn fit(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{kept}...")
}

// =============================================================================
// Invoice
// =============================================================================

/// Lays out an invoice: [Item, Quantity, Price, Total] plus "Total: X".
pub fn invoice_document(invoice: &Invoice, currency: &str) -> TableDocument {
    let xs = [MARGIN_LEFT, 290, 380, 470];
    let widths = [40, 12, 14, 14];

    TableDocument {
        title: INVOICE_TITLE.to_string(),
        subtitle: Some(invoice.subtitle()),
        columns: INVOICE_COLUMNS
            .iter()
            .zip(xs.iter().zip(widths))
            .map(|(title, (x, width))| Column::new(title, *x, width))
            .collect(),
        rows: invoice.rows.iter().map(|row| row.cells().to_vec()).collect(),
        footer: Some(invoice.total_line(currency)),
    }
}

pub fn render_invoice(invoice: &Invoice, style: &DocumentStyle) -> BillingResult<Vec<u8>> {
    invoice_document(invoice, &style.currency).render(style)
}

// =============================================================================
// Inventory Report
// =============================================================================

/// Lays out the inventory table: [Name, Quantity, Description].
pub fn inventory_report_document(items: &[&CatalogItem], generated_at: DateTime<Utc>) -> TableDocument {
    TableDocument {
        title: REPORT_TITLE.to_string(),
        subtitle: Some(format!(
            "{} items    {}",
            items.len(),
            generated_at.format("%Y-%m-%d %H:%M UTC")
        )),
        columns: vec![
            Column::new("Name", MARGIN_LEFT, 34),
            Column::new("Quantity", 250, 10),
            Column::new("Description", 330, 38),
        ],
        rows: items
            .iter()
            .map(|item| {
                vec![
                    item.name.clone(),
                    item.quantity.to_string(),
                    item.description.clone(),
                ]
            })
            .collect(),
        footer: None,
    }
}

pub fn render_inventory_report(
    items: &[&CatalogItem],
    generated_at: DateTime<Utc>,
    style: &DocumentStyle,
) -> BillingResult<Vec<u8>> {
    inventory_report_document(items, generated_at).render(style)
}

/// `inventory-report-YYYYMMDD-HHMM.pdf`.
pub fn report_file_name(generated_at: DateTime<Utc>) -> String {
    format!("inventory-report-{}.pdf", generated_at.format("%Y%m%d-%H%M"))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom_core::{CartAggregator, Money};

    fn sample_invoice() -> Invoice {
        let mut cart = CartAggregator::new();
        let a = CatalogItem::new("A", "Blue Pen", 10, Money::from_cents(500));
        let b = CatalogItem::new("B", "Notebook", 4, Money::from_cents(2000));
        cart.add_to_bill(&a);
        cart.add_to_bill(&a);
        cart.add_to_bill(&b);
        Invoice::from_cart(cart.cart())
    }

    #[test]
    fn test_invoice_document_layout() {
        let doc = invoice_document(&sample_invoice(), "");
        let titles: Vec<&str> = doc.columns.iter().map(|c| c.title.as_str()).collect();

        assert_eq!(doc.title, "Invoice");
        assert_eq!(titles, vec!["Item", "Quantity", "Price", "Total"]);
        assert_eq!(doc.rows.len(), 2);
        assert_eq!(doc.footer.as_deref(), Some("Total: 30.00"));
    }

    #[test]
    fn test_rendered_invoice_parses_back() {
        let bytes = render_invoice(&sample_invoice(), &DocumentStyle::default()).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));

        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);

        let text = doc.extract_text(&[1]).unwrap();
        assert!(text.contains("Invoice"));
        assert!(text.contains("Notebook"));
        assert!(text.contains("Total: 30.00"));
    }

    #[test]
    fn test_long_tables_paginate() {
        let items: Vec<CatalogItem> = (0..75)
            .map(|i| CatalogItem::new(i.to_string(), format!("Item {i}"), i, Money::zero()))
            .collect();
        let refs: Vec<&CatalogItem> = items.iter().collect();

        let style = DocumentStyle {
            rows_per_page: 30,
            ..DocumentStyle::default()
        };
        let bytes = render_inventory_report(&refs, Utc::now(), &style).unwrap();

        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 3);
    }

    #[test]
    fn test_rows_per_page_is_capped() {
        let style = DocumentStyle {
            rows_per_page: 500,
            ..DocumentStyle::default()
        };
        assert_eq!(style.effective_rows_per_page(), MAX_ROWS_PER_PAGE);

        let doc = inventory_report_document(&[], Utc::now());
        assert_eq!(doc.page_count(30), 1);
        assert!(doc.render(&style).is_ok());
    }

    #[test]
    fn test_text_helpers() {
        assert_eq!(fit("Stapler", 10), "Stapler");
        assert_eq!(fit("Industrial stapler deluxe", 10), "Industr...");

        match pdf_string("Café ☕") {
            Object::String(bytes, _) => assert_eq!(bytes, b"Caf\xe9 ?".to_vec()),
            other => panic!("unexpected object {other:?}"),
        }
    }

    #[test]
    fn test_report_file_name() {
        use chrono::TimeZone;
        let at = Utc.with_ymd_and_hms(2026, 10, 19, 14, 2, 0).unwrap();
        assert_eq!(report_file_name(at), "inventory-report-20261019-1402.pdf");
    }
}
