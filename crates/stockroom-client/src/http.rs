//! # HTTP Backend
//!
//! `reqwest` client for the inventory backend.
//!
//! ## Routes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Operation              Method  Route               Body                │
//! │  ─────────              ──────  ─────               ────                │
//! │  signup                 POST    signup              {email}             │
//! │  verify                 POST    verify              {name,email,pw,otp} │
//! │  login                  POST    login               {email,password}    │
//! │  logout                 POST    logout              -                   │
//! │  fetch_catalog          POST    fetchAll-item       {userId}            │
//! │  commit_stock_update    POST    orders              item + billQuantity │
//! │  add_item               POST    add-item            new item            │
//! │  edit_item              POST    edit-item           item                │
//! │  delete_item            POST    delete-item         {_id}               │
//! │  fetch_products         GET     fetchAll-products   -                   │
//! │  add_product            POST    add-product         new product         │
//! │  delete_product         POST    delete-product      {_id}               │
//! │  fetch_orders           POST    fetch-orders        {userId}            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The backend keeps its login session in a cookie, so the client is built
//! with a cookie store and must be reused across calls.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use stockroom_core::validation::validate_email;
use stockroom_core::{CatalogItem, ItemDraft, Order, Product, ProductDraft, ValidationError};
use tracing::{debug, info, warn};
use url::Url;

use crate::api::{InventoryApi, SignupRequest, StockCommit};
use crate::config::{ApiSettings, StockroomConfig};
use crate::error::{ClientError, ClientResult};
use crate::session::{Session, SessionStore};
use crate::wire::{
    Ack, Envelope, WireAuthResponse, WireCredentials, WireId, WireItem, WireList,
    WireNewItem, WireNewProduct, WireOrder, WireProduct, WireScope, WireSignup, WireStockCommit,
};

// =============================================================================
// Http Backend
// =============================================================================

/// Backend client with a cookie jar and an explicit session.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: Url,
    sessions: SessionStore,
}

impl HttpBackend {
    /// Builds a client for the configured backend.
    pub fn new(api: &ApiSettings) -> ClientResult<Self> {
        let mut base_url = Url::parse(&api.base_url)?;
        // join() replaces the last segment unless the path ends with '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder()
            .cookie_store(true)
            .connect_timeout(api.connect_timeout())
            .timeout(api.request_timeout())
            .build()?;

        debug!(base_url = %base_url, "HTTP backend ready");

        Ok(HttpBackend {
            client,
            base_url,
            sessions: SessionStore::new(),
        })
    }

    pub fn from_config(config: &StockroomConfig) -> ClientResult<Self> {
        Self::new(&config.api)
    }

    /// The session slot filled by login/verify and cleared by logout.
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // =========================================================================
    // Request Plumbing
    // =========================================================================

    fn url(&self, route: &str) -> ClientResult<Url> {
        Ok(self.base_url.join(route)?)
    }

    async fn post<B, R>(&self, route: &str, body: Option<&B>) -> ClientResult<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.url(route)?;
        debug!(%url, "POST");

        let mut request = self.client.post(url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        Self::read_body(route, response).await
    }

    async fn get<R>(&self, route: &str) -> ClientResult<R>
    where
        R: DeserializeOwned,
    {
        let url = self.url(route)?;
        debug!(%url, "GET");

        let response = self.client.get(url).send().await?;
        Self::read_body(route, response).await
    }

    /// Decodes a response body, turning HTTP failures into errors that
    /// carry the backend's own message when it sent one.
    async fn read_body<R>(route: &str, response: Response) -> ClientResult<R>
    where
        R: DeserializeOwned,
    {
        let status = response.status();
        let bytes = response.bytes().await?;

        if status.is_success() {
            return Ok(serde_json::from_slice(&bytes)?);
        }

        let message = serde_json::from_slice::<Envelope<serde_json::Value>>(&bytes)
            .ok()
            .and_then(|envelope| envelope.message)
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });

        warn!(route, status = status.as_u16(), %message, "Backend returned an error status");

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(ClientError::Unauthorized(message))
            }
            _ => Err(ClientError::Http {
                status: status.as_u16(),
                message,
            }),
        }
    }

    /// Sends a mutation and returns the backend's message.
    async fn mutate<B>(&self, route: &str, body: &B, fallback: &str) -> ClientResult<String>
    where
        B: Serialize + ?Sized,
    {
        let envelope: Envelope<serde_json::Value> = self.post(route, Some(body)).await?;
        let message = envelope.message.clone();
        envelope.into_result(route)?;
        Ok(message.unwrap_or_else(|| fallback.to_string()))
    }

    async fn require_session(&self) -> ClientResult<Session> {
        self.sessions.require().await
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Asks the backend to email a one-time password.
    pub async fn signup(&self, email: &str) -> ClientResult<String> {
        validate_email(email)?;
        info!(email, "Requesting signup OTP");
        self.mutate("signup", &WireSignup { email: email.trim() }, "OTP sent")
            .await
    }

    /// Completes signup with the emailed OTP and starts a session.
    pub async fn verify(&self, request: &SignupRequest) -> ClientResult<Session> {
        request.validate()?;

        let body = WireCredentials {
            name: Some(request.name.trim()),
            email: request.email.trim(),
            password: &request.password,
            otp: Some(request.otp.trim()),
        };

        let response: WireAuthResponse = self.post("verify", Some(&body)).await?;
        let session = response.into_session(request.email.trim(), "verify")?;

        info!(user_id = %session.user_id, "Account verified");
        self.sessions.start(session.clone()).await;
        Ok(session)
    }

    /// Logs in and starts a session.
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<Session> {
        validate_email(email)?;
        if password.is_empty() {
            return Err(ValidationError::Required {
                field: "password".to_string(),
            }
            .into());
        }

        let body = WireCredentials {
            name: None,
            email: email.trim(),
            password,
            otp: None,
        };

        let response: WireAuthResponse = self.post("login", Some(&body)).await?;
        let session = response.into_session(email.trim(), "login")?;

        info!(user_id = %session.user_id, admin = session.is_admin, "Logged in");
        self.sessions.start(session.clone()).await;
        Ok(session)
    }

    /// Logs out. The local session ends even if the request fails.
    pub async fn logout(&self) -> ClientResult<()> {
        let result: ClientResult<Envelope<serde_json::Value>> =
            self.post::<(), _>("logout", None).await;
        let ended = self.sessions.end().await;

        if let Some(session) = ended {
            info!(user_id = %session.user_id, "Logged out");
        }

        result?.into_result("logout")?;
        Ok(())
    }

    // =========================================================================
    // Items
    // =========================================================================

    /// Reads the item list for a scope.
    pub async fn fetch_items(&self, scope_id: &str) -> ClientResult<Vec<CatalogItem>> {
        let envelope: Envelope<WireList<WireItem>> = self
            .post("fetchAll-item", Some(&WireScope { user_id: scope_id }))
            .await?;
        let items: Vec<CatalogItem> = envelope
            .into_result("fetchAll-item")?
            .map(|list| list.data)
            .unwrap_or_default()
            .into_iter()
            .map(CatalogItem::from)
            .collect();

        debug!(scope_id, count = items.len(), "Fetched catalog");
        Ok(items)
    }

    /// Creates an item owned by the logged-in user.
    pub async fn add_item(&self, draft: &ItemDraft) -> ClientResult<String> {
        draft.validate()?;
        let session = self.require_session().await?;

        info!(name = %draft.name, "Adding item");
        self.mutate("add-item", &WireNewItem::new(draft, &session.user_id), "Item added")
            .await
    }

    /// Overwrites an item record.
    pub async fn edit_item(&self, item: &CatalogItem) -> ClientResult<String> {
        if item.quantity < 0 {
            return Err(ValidationError::OutOfRange {
                field: "quantity".to_string(),
                min: 0,
                max: i64::MAX,
            }
            .into());
        }

        info!(item_id = %item.id, "Editing item");
        self.mutate("edit-item", &WireItem::from(item), "Item updated")
            .await
    }

    pub async fn delete_item(&self, item_id: &str) -> ClientResult<String> {
        info!(item_id, "Deleting item");
        self.mutate("delete-item", &WireId { id: item_id }, "Item deleted")
            .await
    }

    // =========================================================================
    // Products
    // =========================================================================

    pub async fn fetch_products(&self) -> ClientResult<Vec<Product>> {
        let envelope: Envelope<WireList<WireProduct>> = self.get("fetchAll-products").await?;
        Ok(envelope
            .into_result("fetchAll-products")?
            .map(|list| list.data)
            .unwrap_or_default()
            .into_iter()
            .map(Product::from)
            .collect())
    }

    pub async fn add_product(&self, draft: &ProductDraft) -> ClientResult<String> {
        draft.validate()?;
        info!(name = %draft.name, "Adding product");
        self.mutate("add-product", &WireNewProduct::from(draft), "Product added")
            .await
    }

    pub async fn delete_product(&self, product_id: &str) -> ClientResult<String> {
        info!(product_id, "Deleting product");
        self.mutate("delete-product", &WireId { id: product_id }, "Product deleted")
            .await
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Reads the order history for a scope.
    pub async fn fetch_orders(&self, scope_id: &str) -> ClientResult<Vec<Order>> {
        let envelope: Envelope<Vec<WireOrder>> = self
            .post("fetch-orders", Some(&WireScope { user_id: scope_id }))
            .await?;
        Ok(envelope
            .into_result("fetch-orders")?
            .unwrap_or_default()
            .into_iter()
            .map(Order::from)
            .collect())
    }
}

// =============================================================================
// InventoryApi
// =============================================================================

#[async_trait]
impl InventoryApi for HttpBackend {
    async fn fetch_catalog(&self, scope_id: &str) -> ClientResult<Vec<CatalogItem>> {
        self.fetch_items(scope_id).await
    }

    async fn commit_stock_update(&self, commit: &StockCommit) -> ClientResult<Ack> {
        let url = self.url("orders")?;
        let body = WireStockCommit {
            item: WireItem::from(&commit.item),
            bill_quantity: commit.bill_quantity,
        };

        debug!(
            item_id = %commit.item.id,
            updated_quantity = commit.item.quantity,
            bill_quantity = commit.bill_quantity,
            "Committing stock update"
        );

        let response = self.client.post(url).json(&body).send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let message = serde_json::from_slice::<Ack>(&bytes)
                .ok()
                .and_then(|ack| ack.message)
                .unwrap_or_else(|| "session expired".to_string());
            return Err(ClientError::Unauthorized(message));
        }

        // An envelope on a failure status is still an explicit refusal.
        match serde_json::from_slice::<Ack>(&bytes) {
            Ok(mut ack) => {
                if !status.is_success() {
                    ack.success = false;
                }
                Ok(ack)
            }
            Err(_) if !status.is_success() => Err(ClientError::Http {
                status: status.as_u16(),
                message: status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
