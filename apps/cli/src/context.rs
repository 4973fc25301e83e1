//! Shared state for one CLI invocation.

use std::sync::Arc;

use anyhow::{bail, Context};
use stockroom_client::{HttpBackend, Session, StockroomConfig};
use tracing::debug;

use crate::console::Console;

/// Password source for non-interactive use.
pub const PASSWORD_ENV: &str = "STOCKROOM_PASSWORD";

pub struct AppContext {
    pub config: StockroomConfig,
    pub backend: Arc<HttpBackend>,
    email_override: Option<String>,
}

impl AppContext {
    pub fn new(config: StockroomConfig, email_override: Option<String>) -> anyhow::Result<Self> {
        let backend = HttpBackend::from_config(&config).context("Failed to build the HTTP client")?;
        debug!(base_url = %backend.base_url(), "Backend client ready");

        Ok(AppContext {
            config,
            backend: Arc::new(backend),
            email_override,
        })
    }

    /// `--email`, then `api.email`.
    pub fn configured_email(&self) -> Option<&str> {
        self.email_override.as_deref().or(self.config.api.email.as_deref())
    }

    pub async fn email(&self, console: &mut Console) -> anyhow::Result<String> {
        if let Some(email) = self.configured_email() {
            return Ok(email.to_string());
        }
        match console.prompt("Email: ").await? {
            Some(email) if !email.is_empty() => Ok(email),
            _ => bail!("An email is required (use --email or api.email)"),
        }
    }

    pub async fn password(&self, console: &mut Console) -> anyhow::Result<String> {
        if let Ok(password) = std::env::var(PASSWORD_ENV) {
            return Ok(password);
        }
        match console.prompt("Password: ").await? {
            Some(password) => Ok(password),
            None => bail!("A password is required (set {PASSWORD_ENV})"),
        }
    }

    /// Logs in with the configured account; the backend keeps the cookie.
    pub async fn login(&self, console: &mut Console) -> anyhow::Result<Session> {
        let email = self.email(console).await?;
        let password = self.password(console).await?;
        let session = self.backend.login(&email, &password).await?;
        Ok(session)
    }

    /// Catalog scope for this session.
    pub fn scope<'a>(&'a self, session: &'a Session) -> &'a str {
        session.scope_id(self.config.api.scope_id.as_deref())
    }
}
