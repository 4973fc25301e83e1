//! # Inventory API Seam
//!
//! The two backend calls the bill workflow depends on, behind a trait so
//! the finalizer can run against the real backend or a test double.
//!
//! ```text
//! ┌──────────────────┐   fetch_catalog(scope)      ┌──────────────────┐
//! │  BillFinalizer   │ ──────────────────────────► │  dyn             │
//! │  (billing crate) │   commit_stock_update(line) │  InventoryApi    │
//! │                  │ ──────────────────────────► │                  │
//! └──────────────────┘                             └────────┬─────────┘
//!                                                           │
//!                                        ┌──────────────────┴──────┐
//!                                        │ HttpBackend (reqwest)   │
//!                                        │ test fakes              │
//!                                        └─────────────────────────┘
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use stockroom_core::validation::{
    validate_display_name, validate_email, validate_otp, validate_password,
};
use stockroom_core::{CartLine, CatalogItem, ValidationError};

use crate::error::ClientResult;
use crate::wire::Ack;

// =============================================================================
// Stock Commit
// =============================================================================

/// One bill line as sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockCommit {
    /// The item carrying its stock after this sale.
    pub item: CatalogItem,

    /// Units sold.
    pub bill_quantity: i64,
}

impl StockCommit {
    /// `updated_quantity = catalog_quantity − bill_quantity`.
    pub fn from_line(line: &CartLine) -> Self {
        StockCommit {
            item: line.committed_item(),
            bill_quantity: line.bill_quantity,
        }
    }
}

// =============================================================================
// Inventory API
// =============================================================================

/// Backend operations used by the bill workflow.
///
/// Implementations must not retry [`commit_stock_update`]: a commit that
/// reached the backend but whose response was lost would otherwise be
/// applied twice.
///
/// [`commit_stock_update`]: InventoryApi::commit_stock_update
#[async_trait]
pub trait InventoryApi: Send + Sync {
    /// Reads the current item list for a scope.
    async fn fetch_catalog(&self, scope_id: &str) -> ClientResult<Vec<CatalogItem>>;

    /// Writes one decremented stock level.
    ///
    /// `Ok(ack)` with `ack.success == false` is an explicit refusal;
    /// `Err` is a transport or protocol failure.
    async fn commit_stock_update(&self, commit: &StockCommit) -> ClientResult<Ack>;
}

// =============================================================================
// Signup Request
// =============================================================================

/// Everything the `verify` step needs to create an account.
#[derive(Debug, Clone)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub otp: String,
}

impl SignupRequest {
    /// Applies the signup form rules.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_display_name(&self.name)?;
        validate_email(&self.email)?;
        validate_password(&self.password)?;
        validate_otp(&self.otp)?;
        Ok(())
    }
}
