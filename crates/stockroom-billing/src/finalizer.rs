//! # Bill Finalizer
//!
//! Turns the current cart into committed stock levels and an invoice.
//!
//! ## Finalize Flow
//! ```text
//!  finalize(cart, session, catalog)
//!      │
//!      ├─ cart empty / already running ──────────► Err (no side effects)
//!      │
//!      ├─ check every line (qty ≥ 1, stock if clamping) ─► Err + error notice
//!      │
//!      ├─ for each line, in order, one at a time:
//!      │      commit_stock_update(item.quantity − bill_qty)
//!      │      └─ refused / failed ──► Err + "Failed to update quantity for X"
//!      │                              cart untouched, no invoice
//!      │
//!      ├─ render invoice PDF ──► sink.save()      (failure: warning only)
//!      ├─ clear cart
//!      ├─ fetch_catalog(scope) ──► catalog        (failure: warning only)
//!      ├─ "Bill finalized and inventory updated"
//!      └─ on_bill_finalized(&report)
//! ```
//!
//! Commits are never retried and never rolled back. When a later line
//! fails, the earlier ones stay committed and are listed on the error.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use stockroom_client::{InventoryApi, Session, StockCommit, StockroomConfig};
use stockroom_core::{CartAggregator, CartLine, Catalog, CoreError, Invoice, Money};
use tracing::{debug, info, warn};

use crate::error::{BillingError, BillingResult};
use crate::notify::{Notice, Notifier};
use crate::pdf::{render_invoice, DocumentStyle};
use crate::sink::InvoiceSink;

/// Shown once every line is committed.
pub const FINALIZED_MESSAGE: &str = "Bill finalized and inventory updated";

// =============================================================================
// Options and Report
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct FinalizerOptions {
    /// Refuse lines whose bill quantity exceeds the known stock.
    pub clamp_to_stock: bool,

    /// Catalog scope to refresh; the session's user id when unset.
    pub scope_id: Option<String>,

    pub style: DocumentStyle,
}

impl FinalizerOptions {
    pub fn from_config(config: &StockroomConfig) -> Self {
        FinalizerOptions {
            clamp_to_stock: config.clamp_to_stock(),
            scope_id: config.api.scope_id.clone(),
            style: DocumentStyle::from(&config.invoice),
        }
    }
}

/// What a successful finalize did.
#[derive(Debug, Clone)]
pub struct FinalizeReport {
    pub invoice: Invoice,

    /// Where the PDF was saved; `None` when rendering or saving failed.
    pub invoice_location: Option<String>,

    /// Committed item ids, in cart order.
    pub committed: Vec<String>,

    pub total: Money,

    /// False when the post-commit catalog reload failed.
    pub catalog_refreshed: bool,
}

type FinalizedHook = Box<dyn Fn(&FinalizeReport) + Send + Sync>;

// =============================================================================
// In-Flight Guard
// =============================================================================

/// Holds the in-flight flag for the duration of one finalize.
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightGuard { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

// =============================================================================
// Bill Finalizer
// =============================================================================

pub struct BillFinalizer {
    api: Arc<dyn InventoryApi>,
    sink: Arc<dyn InvoiceSink>,
    notifier: Arc<dyn Notifier>,
    options: FinalizerOptions,
    in_flight: AtomicBool,
    on_finalized: Option<FinalizedHook>,
}

impl std::fmt::Debug for BillFinalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BillFinalizer")
            .field("options", &self.options)
            .field("in_flight", &self.is_in_flight())
            .finish_non_exhaustive()
    }
}

impl BillFinalizer {
    pub fn new(
        api: Arc<dyn InventoryApi>,
        sink: Arc<dyn InvoiceSink>,
        notifier: Arc<dyn Notifier>,
        options: FinalizerOptions,
    ) -> Self {
        BillFinalizer {
            api,
            sink,
            notifier,
            options,
            in_flight: AtomicBool::new(false),
            on_finalized: None,
        }
    }

    /// Registers the callback run once after each successful finalize.
    pub fn on_bill_finalized<F>(mut self, hook: F) -> Self
    where
        F: Fn(&FinalizeReport) + Send + Sync + 'static,
    {
        self.on_finalized = Some(Box::new(hook));
        self
    }

    pub fn options(&self) -> &FinalizerOptions {
        &self.options
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Whether the finalize action should be offered for this cart.
    pub fn can_finalize(&self, cart: &CartAggregator) -> bool {
        !cart.is_empty() && !self.is_in_flight()
    }

    /// Commits every cart line, then issues the invoice and resets the cart.
    ///
    /// On error the cart is left exactly as it was.
    pub async fn finalize(
        &self,
        cart: &mut CartAggregator,
        session: &Session,
        catalog: &mut Catalog,
    ) -> BillingResult<FinalizeReport> {
        if cart.is_empty() {
            return Err(BillingError::EmptyCart);
        }
        let _guard = InFlightGuard::acquire(&self.in_flight).ok_or(BillingError::AlreadyInFlight)?;

        let lines: Vec<CartLine> = cart.lines().to_vec();
        if let Err(err) = self.check_lines(&lines, catalog) {
            self.notifier.notify(Notice::error(err.to_string()));
            return Err(err.into());
        }

        info!(lines = lines.len(), user = %session.user_id, "Finalizing bill");
        let committed = match self.commit_lines(&lines).await {
            Ok(committed) => committed,
            Err(err) => {
                if err.is_partial_commit() {
                    warn!(committed = ?err.committed_ids(), "Bill partially committed");
                }
                let name = match &err {
                    BillingError::CommitRejected { name, .. } | BillingError::CommitFailed { name, .. } => {
                        name.as_str()
                    }
                    _ => "",
                };
                self.notifier
                    .notify(Notice::error(format!("Failed to update quantity for {name}")));
                return Err(err);
            }
        };

        let invoice = Invoice::from_lines(&lines);
        let invoice_location = self.issue_invoice(&invoice).await;

        cart.clear();

        let catalog_refreshed = self.refresh_catalog(session, catalog).await;

        self.notifier.notify(Notice::success(FINALIZED_MESSAGE));
        info!(invoice = %invoice.number(), total = %invoice.total, "Bill finalized");

        let report = FinalizeReport {
            total: invoice.total,
            invoice,
            invoice_location,
            committed,
            catalog_refreshed,
        };
        if let Some(hook) = &self.on_finalized {
            hook(&report);
        }
        Ok(report)
    }

    fn check_lines(&self, lines: &[CartLine], catalog: &Catalog) -> Result<(), CoreError> {
        for line in lines {
            if line.bill_quantity < 1 {
                return Err(CoreError::NonPositiveQuantity {
                    name: line.name().to_string(),
                    quantity: line.bill_quantity,
                });
            }

            if self.options.clamp_to_stock {
                let available = catalog
                    .get(line.id())
                    .map(|item| item.quantity)
                    .unwrap_or_else(|| line.stock());
                if line.bill_quantity > available {
                    return Err(CoreError::InsufficientStock {
                        name: line.name().to_string(),
                        available,
                        requested: line.bill_quantity,
                    });
                }
            }
        }
        Ok(())
    }

    /// One request per line; the next starts only after the previous answered.
    async fn commit_lines(&self, lines: &[CartLine]) -> BillingResult<Vec<String>> {
        let mut committed = Vec::with_capacity(lines.len());

        for line in lines {
            let commit = StockCommit::from_line(line);
            debug!(
                item_id = %line.id(),
                bill_quantity = line.bill_quantity,
                updated_quantity = commit.item.quantity,
                "Committing stock update"
            );

            match self.api.commit_stock_update(&commit).await {
                Ok(ack) if ack.success => committed.push(line.id().to_string()),
                Ok(ack) => {
                    return Err(BillingError::CommitRejected {
                        item_id: line.id().to_string(),
                        name: line.name().to_string(),
                        message: ack.message.unwrap_or_else(|| "update refused".to_string()),
                        committed,
                    });
                }
                Err(source) => {
                    return Err(BillingError::CommitFailed {
                        item_id: line.id().to_string(),
                        name: line.name().to_string(),
                        source,
                        committed,
                    });
                }
            }
        }

        Ok(committed)
    }

    async fn issue_invoice(&self, invoice: &Invoice) -> Option<String> {
        let saved = match render_invoice(invoice, &self.options.style) {
            Ok(pdf) => self.sink.save(&invoice.file_name(), &pdf).await,
            Err(err) => Err(err),
        };

        match saved {
            Ok(location) => Some(location),
            Err(err) => {
                warn!(invoice = %invoice.number(), error = %err, "Invoice not saved");
                self.notifier
                    .notify(Notice::warning(format!("Stock updated, but the invoice was not saved: {err}")));
                None
            }
        }
    }

    async fn refresh_catalog(&self, session: &Session, catalog: &mut Catalog) -> bool {
        let scope = session.scope_id(self.options.scope_id.as_deref());
        match self.api.fetch_catalog(scope).await {
            Ok(items) => {
                debug!(count = items.len(), "Catalog refreshed");
                catalog.replace(items);
                true
            }
            Err(err) => {
                warn!(error = %err, "Catalog refresh failed after finalize");
                self.notifier.notify(Notice::warning(
                    "Inventory updated, but the item list could not be reloaded",
                ));
                false
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
