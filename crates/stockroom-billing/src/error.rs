//! # Billing Error Types
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Billing Error Categories                           │
//! │                                                                         │
//! │  Guard (nothing happened)     Pre-commit (nothing sent)                 │
//! │  ├── EmptyCart                ├── Core(NonPositiveQuantity)             │
//! │  └── AlreadyInFlight          └── Core(InsufficientStock)               │
//! │                                                                         │
//! │  Commit (earlier lines may be committed)                                │
//! │  ├── CommitRejected  - backend answered success = false                 │
//! │  └── CommitFailed    - transport / protocol error                       │
//! │                                                                         │
//! │  Document                                                               │
//! │  ├── Render          - PDF could not be built                           │
//! │  └── Io              - invoice could not be written                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use stockroom_client::ClientError;
use stockroom_core::CoreError;
use thiserror::Error;

/// Result type alias for billing operations.
pub type BillingResult<T> = Result<T, BillingError>;

#[derive(Debug, Error)]
pub enum BillingError {
    // =========================================================================
    // Guard
    // =========================================================================
    /// Finalize was called on an empty cart.
    #[error("The bill is empty")]
    EmptyCart,

    /// Another finalize is still committing.
    #[error("A bill is already being finalized")]
    AlreadyInFlight,

    // =========================================================================
    // Pre-commit
    // =========================================================================
    /// A line failed the checks run before any request is sent.
    #[error(transparent)]
    Core(#[from] CoreError),

    // =========================================================================
    // Commit
    // =========================================================================
    /// The backend refused a line.
    #[error("Failed to update quantity for {name}: {message}")]
    CommitRejected {
        item_id: String,
        name: String,
        message: String,
        /// Ids committed before this line, in cart order.
        committed: Vec<String>,
    },

    /// A line's request did not complete.
    #[error("Failed to update quantity for {name}")]
    CommitFailed {
        item_id: String,
        name: String,
        #[source]
        source: ClientError,
        /// Ids committed before this line, in cart order.
        committed: Vec<String>,
    },

    // =========================================================================
    // Document
    // =========================================================================
    /// PDF construction failed.
    #[error("Failed to render document: {0}")]
    Render(String),

    /// Writing a document failed.
    #[error("Failed to save document: {0}")]
    Io(#[from] std::io::Error),
}

impl From<lopdf::Error> for BillingError {
    fn from(err: lopdf::Error) -> Self {
        BillingError::Render(err.to_string())
    }
}

impl BillingError {
    /// Item ids already committed when the finalize stopped.
    pub fn committed_ids(&self) -> &[String] {
        match self {
            BillingError::CommitRejected { committed, .. }
            | BillingError::CommitFailed { committed, .. } => committed,
            _ => &[],
        }
    }

    /// True when the backend holds some, but not all, of the bill.
    pub fn is_partial_commit(&self) -> bool {
        !self.committed_ids().is_empty()
    }

    /// True for calls that should never have been made (action disabled).
    pub fn is_guard(&self) -> bool {
        matches!(self, BillingError::EmptyCart | BillingError::AlreadyInFlight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_failure_message_names_item() {
        let err = BillingError::CommitFailed {
            item_id: "b".into(),
            name: "Notebook".into(),
            source: ClientError::Timeout,
            committed: vec!["a".into()],
        };
        assert_eq!(err.to_string(), "Failed to update quantity for Notebook");
        assert_eq!(err.committed_ids(), ["a".to_string()]);
        assert!(err.is_partial_commit());
    }

    #[test]
    fn test_guard_errors() {
        assert!(BillingError::EmptyCart.is_guard());
        assert!(BillingError::AlreadyInFlight.is_guard());
        assert!(!BillingError::EmptyCart.is_partial_commit());
    }

    #[test]
    fn test_core_error_passes_through() {
        let err: BillingError = CoreError::NonPositiveQuantity {
            name: "Pen".into(),
            quantity: 0,
        }
        .into();
        assert_eq!(err.to_string(), "Quantity for Pen must be at least 1 (got 0)");
    }
}
