//! # stockroom-core: Pure Business Logic for Stockroom
//!
//! This crate holds every rule of the billing counter that can be expressed
//! without touching the network or the disk.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stockroom Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    stockroom CLI (apps/cli)                     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │    stockroom-billing: BillFinalizer, PDF invoices               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │    stockroom-client: REST backend, session, config             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ stockroom-core (THIS CRATE) ★                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │   table   │  │   │
//! │  │   │CatalogItem│  │   Money   │  │CartAggreg.│  │ Paginator │  │   │
//! │  │   │  Product  │  │           │  │ CartLine  │  │  Search   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐                  │   │
//! │  │   │  invoice  │  │  orders   │  │ validation│                  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘                  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO FILES                                │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (CatalogItem, Product, Order)
//! - [`money`] - Money type with integer arithmetic
//! - [`cart`] - The bill cart and its change notifications
//! - [`table`] - Search filtering and pagination for list views
//! - [`invoice`] - Invoice model derived from a cart snapshot
//! - [`orders`] - Recent order grouping
//! - [`summary`] - Stock totals for the dashboard view
//! - [`validation`] - Input validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use stockroom_core::{CartAggregator, CatalogItem, Money};
//!
//! let item = CatalogItem::new("a1", "Notebook", 12, Money::from_cents(1000));
//!
//! let mut cart = CartAggregator::new();
//! cart.add_to_bill(&item);
//! cart.add_to_bill(&item);
//! cart.add_to_bill(&item);
//!
//! assert_eq!(cart.calculate_total(), Money::from_cents(3000));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod invoice;
pub mod money;
pub mod orders;
pub mod summary;
pub mod table;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartAggregator, CartChange, CartLine, SubscriptionId};
pub use error::{CoreError, CoreResult, ValidationError};
pub use invoice::{Invoice, InvoiceRow, INVOICE_COLUMNS, INVOICE_TITLE};
pub use money::Money;
pub use orders::{group_orders_by_minute, OrderGroup};
pub use summary::{is_low_stock, InventorySummary};
pub use table::{Page, Paginator, SearchFilter, SearchScope, Searchable, TableState};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Rows shown per page in list views unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Order groups shown per page in the recent orders view.
pub const ORDER_GROUPS_PER_PAGE: usize = 5;

/// Largest quantity a bill line accepts from typed input.
pub const MAX_BILL_QUANTITY: i64 = 99_999;

/// Stock level below which an item counts as running low.
pub const LOW_STOCK_THRESHOLD: i64 = 20;
