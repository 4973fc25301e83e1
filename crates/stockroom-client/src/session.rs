//! # Session Context
//!
//! The logged-in user, held explicitly instead of in ambient global state.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Session Lifecycle                              │
//! │                                                                         │
//! │   login / verify ──► SessionStore::start(Session)                      │
//! │                               │                                         │
//! │                               ▼                                         │
//! │          &Session passed to fetch_catalog, finalize, fetch_orders       │
//! │                               │                                         │
//! │                               ▼                                         │
//! │   logout ──────────► SessionStore::end() (even if the request failed)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The backend's cookie lives in the HTTP client's jar; this type only
//! carries what the client needs to scope its requests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{ClientError, ClientResult};

/// The authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Backend user id. Also the default catalog scope.
    pub user_id: String,

    pub email: String,

    /// Display name, when the backend sent one.
    pub name: Option<String>,

    /// Admin users manage the product catalogue.
    pub is_admin: bool,

    /// When the session was established.
    pub started_at: DateTime<Utc>,
}

impl Session {
    pub fn new(user_id: impl Into<String>, email: impl Into<String>) -> Self {
        Session {
            user_id: user_id.into(),
            email: email.into(),
            name: None,
            is_admin: false,
            started_at: Utc::now(),
        }
    }

    /// Catalog scope for this user, unless the config overrides it.
    pub fn scope_id<'a>(&'a self, configured: Option<&'a str>) -> &'a str {
        configured.unwrap_or(&self.user_id)
    }

    /// Name for greetings: display name, else the email.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.email)
    }
}

/// Shared holder for the current session.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    current: Arc<RwLock<Option<Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces any existing session.
    pub async fn start(&self, session: Session) {
        *self.current.write().await = Some(session);
    }

    /// Tears down the session, returning it if there was one.
    pub async fn end(&self) -> Option<Session> {
        self.current.write().await.take()
    }

    pub async fn current(&self) -> Option<Session> {
        self.current.read().await.clone()
    }

    /// The current session, or [`ClientError::NotLoggedIn`].
    pub async fn require(&self) -> ClientResult<Session> {
        self.current().await.ok_or(ClientError::NotLoggedIn)
    }

    pub async fn is_logged_in(&self) -> bool {
        self.current.read().await.is_some()
    }
}
