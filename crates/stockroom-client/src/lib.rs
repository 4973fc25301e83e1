//! # stockroom-client: Backend Client for Stockroom
//!
//! Everything that crosses the network lives here.
//!
//! ## Module Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      stockroom-client Modules                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  api            │  │  http           │  │  wire                   │ │
//! │  │  InventoryApi   │◄─│  HttpBackend    │─►│  Envelope, WireItem,    │ │
//! │  │  StockCommit    │  │  (reqwest)      │  │  WireOrder, Ack         │ │
//! │  └─────────────────┘  └────────┬────────┘  └─────────────────────────┘ │
//! │                                │                                        │
//! │  ┌─────────────────┐  ┌────────▼────────┐  ┌─────────────────────────┐ │
//! │  │  config         │  │  session        │  │  error                  │ │
//! │  │  StockroomConfig│  │  SessionStore   │  │  ClientError            │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,no_run
//! use stockroom_client::{HttpBackend, InventoryApi, StockroomConfig};
//!
//! # async fn run() -> stockroom_client::ClientResult<()> {
//! let config = StockroomConfig::load(None)?;
//! let backend = HttpBackend::from_config(&config)?;
//!
//! let session = backend.login("owner@shop.in", "hunter22").await?;
//! let items = backend.fetch_catalog(&session.user_id).await?;
//! println!("{} items in stock", items.len());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod http;
pub mod session;
pub mod wire;

pub use api::{InventoryApi, SignupRequest, StockCommit};
pub use config::{ApiSettings, BillingSettings, InvoiceSettings, StockroomConfig, TableSettings};
pub use error::{ClientError, ClientResult};
pub use http::HttpBackend;
pub use session::{Session, SessionStore};
pub use wire::Ack;
