//! # stockroom-billing: Bill Finalization
//!
//! Commits a cart to the backend one line at a time, then issues the
//! invoice. Also renders the inventory report, which shares the invoice's
//! table layout.
//!
//! ## Module Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     stockroom-billing Modules                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  finalizer      │  │  pdf            │  │  sink                   │ │
//! │  │  BillFinalizer  │─►│  TableDocument  │─►│  InvoiceSink            │ │
//! │  │  FinalizeReport │  │  DocumentStyle  │  │  FileInvoiceSink        │ │
//! │  └────────┬────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │           │                                                             │
//! │  ┌────────▼────────┐  ┌─────────────────┐                              │
//! │  │  notify         │  │  error          │                              │
//! │  │  Notifier       │  │  BillingError   │                              │
//! │  └─────────────────┘  └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod finalizer;
pub mod notify;
pub mod pdf;
pub mod sink;

pub use error::{BillingError, BillingResult};
pub use finalizer::{BillFinalizer, FinalizeReport, FinalizerOptions, FINALIZED_MESSAGE};
pub use notify::{Notice, NoticeLevel, Notifier, TracingNotifier};
pub use pdf::{
    render_inventory_report, render_invoice, report_file_name, DocumentStyle, TableDocument,
};
pub use sink::{FileInvoiceSink, InvoiceSink};
