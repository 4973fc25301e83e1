//! # Stockroom Configuration
//!
//! Configuration for the backend client, invoices, billing policy and list
//! views.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     STOCKROOM_BASE_URL=https://api.example.com                         │
//! │     STOCKROOM_EMAIL=owner@shop.in                                      │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/stockroom/stockroom.toml (Linux)                         │
//! │     ~/Library/Application Support/com.stockroom.stockroom/... (macOS)  │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # stockroom.toml
//! [api]
//! base_url = "https://inventory.example.com/api"
//! email = "owner@shop.in"
//! connect_timeout_secs = 10
//! request_timeout_secs = 30
//!
//! [invoice]
//! output_dir = "/home/owner/invoices"
//! currency = "Rs"
//! rows_per_page = 30
//!
//! [billing]
//! clamp_to_stock = false
//!
//! [table]
//! per_page = 5
//! ```
//!
//! The account password is never read from or written to the file.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{ClientError, ClientResult};

// =============================================================================
// API Settings
// =============================================================================

/// How to reach the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Base URL every route is joined onto.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Account used by commands that log in on the user's behalf.
    #[serde(default)]
    pub email: Option<String>,

    /// Catalog scope sent with `fetchAll-item`. Defaults to the logged-in
    /// user's id when unset.
    #[serde(default)]
    pub scope_id: Option<String>,

    /// TCP connect timeout (seconds).
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Whole-request timeout (seconds).
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: default_base_url(),
            email: None,
            scope_id: None,
            connect_timeout_secs: default_connect_timeout(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl ApiSettings {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

// =============================================================================
// Invoice Settings
// =============================================================================

/// Where and how invoices are written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceSettings {
    /// Directory invoices and reports are saved to (created on demand).
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Label printed before amounts on the total line ("" for none).
    #[serde(default)]
    pub currency: String,

    /// Table rows per PDF page before a page break.
    #[serde(default = "default_rows_per_page")]
    pub rows_per_page: usize,
}

fn default_output_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "stockroom", "stockroom")
        .map(|dirs| dirs.data_dir().join("invoices"))
        .unwrap_or_else(|| PathBuf::from("invoices"))
}

fn default_rows_per_page() -> usize {
    30
}

impl Default for InvoiceSettings {
    fn default() -> Self {
        InvoiceSettings {
            output_dir: default_output_dir(),
            currency: String::new(),
            rows_per_page: default_rows_per_page(),
        }
    }
}

// =============================================================================
// Billing Settings
// =============================================================================

/// Bill finalize policy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BillingSettings {
    /// Reject bill lines above the stock in the catalog snapshot before
    /// committing anything. Off by default: the backend decides.
    #[serde(default)]
    pub clamp_to_stock: bool,
}

// =============================================================================
// Table Settings
// =============================================================================

/// List view settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSettings {
    /// Rows per page.
    #[serde(default = "default_per_page")]
    pub per_page: usize,
}

fn default_per_page() -> usize {
    stockroom_core::DEFAULT_PAGE_SIZE
}

impl Default for TableSettings {
    fn default() -> Self {
        TableSettings {
            per_page: default_per_page(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete Stockroom configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StockroomConfig {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub invoice: InvoiceSettings,

    #[serde(default)]
    pub billing: BillingSettings,

    #[serde(default)]
    pub table: TableSettings,
}

impl StockroomConfig {
    /// Creates a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (stockroom.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ClientResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ClientResult<PathBuf> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ClientError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ClientError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| ClientError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Config saved");
        Ok(path)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ClientResult<()> {
        let url = Url::parse(&self.api.base_url)?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ClientError::InvalidUrl(format!(
                "Base URL must start with http:// or https://, got: {}",
                self.api.base_url
            )));
        }

        if self.api.connect_timeout_secs == 0 || self.api.request_timeout_secs == 0 {
            return Err(ClientError::InvalidConfig(
                "timeouts must be greater than 0".into(),
            ));
        }

        if self.table.per_page == 0 {
            return Err(ClientError::InvalidConfig(
                "per_page must be greater than 0".into(),
            ));
        }

        if self.invoice.rows_per_page == 0 {
            return Err(ClientError::InvalidConfig(
                "rows_per_page must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies `STOCKROOM_*` environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key lookup.
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("STOCKROOM_BASE_URL") {
            debug!(url = %url, "Overriding base URL from environment");
            self.api.base_url = url;
        }

        if let Some(email) = lookup("STOCKROOM_EMAIL") {
            self.api.email = Some(email);
        }

        if let Some(scope) = lookup("STOCKROOM_SCOPE_ID") {
            self.api.scope_id = Some(scope);
        }

        if let Some(secs) = lookup("STOCKROOM_REQUEST_TIMEOUT_SECS") {
            match secs.parse::<u64>() {
                Ok(s) => self.api.request_timeout_secs = s,
                Err(_) => warn!(value = %secs, "Ignoring non-numeric request timeout"),
            }
        }

        if let Some(dir) = lookup("STOCKROOM_INVOICE_DIR") {
            debug!(dir = %dir, "Overriding invoice directory from environment");
            self.invoice.output_dir = PathBuf::from(dir);
        }

        if let Some(currency) = lookup("STOCKROOM_CURRENCY") {
            self.invoice.currency = currency;
        }

        if let Some(flag) = lookup("STOCKROOM_CLAMP_TO_STOCK") {
            match flag.to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.billing.clamp_to_stock = true,
                "0" | "false" | "no" | "off" => self.billing.clamp_to_stock = false,
                _ => warn!(value = %flag, "Unknown clamp_to_stock value in environment"),
            }
        }

        if let Some(per_page) = lookup("STOCKROOM_PER_PAGE") {
            if let Ok(n) = per_page.parse::<usize>() {
                self.table.per_page = n;
            }
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "stockroom", "stockroom")
            .map(|dirs| dirs.config_dir().join("stockroom.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    pub fn base_url(&self) -> &str {
        &self.api.base_url
    }

    pub fn clamp_to_stock(&self) -> bool {
        self.billing.clamp_to_stock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = StockroomConfig::default();
        assert_eq!(config.api.base_url, "http://localhost:5000");
        assert_eq!(config.table.per_page, 5);
        assert!(!config.billing.clamp_to_stock);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = StockroomConfig::default();

        config.api.base_url = "ftp://files.example.com".to_string();
        assert!(config.validate().unwrap_err().is_config_error());

        config.api.base_url = "not a url".to_string();
        assert!(config.validate().is_err());

        config.api.base_url = "https://api.example.com".to_string();
        config.table.per_page = 0;
        assert!(config.validate().is_err());

        config.table.per_page = 10;
        config.api.request_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("STOCKROOM_BASE_URL", "https://shop.example.com/api"),
            ("STOCKROOM_EMAIL", "owner@shop.in"),
            ("STOCKROOM_CLAMP_TO_STOCK", "yes"),
            ("STOCKROOM_PER_PAGE", "20"),
            ("STOCKROOM_REQUEST_TIMEOUT_SECS", "soon"),
        ]);

        let mut config = StockroomConfig::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.api.base_url, "https://shop.example.com/api");
        assert_eq!(config.api.email.as_deref(), Some("owner@shop.in"));
        assert!(config.billing.clamp_to_stock);
        assert_eq!(config.table.per_page, 20);
        assert_eq!(config.api.request_timeout_secs, 30);
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stockroom.toml");
        std::fs::write(
            &path,
            "[api]\nbase_url = \"https://inventory.example.com\"\n\n[billing]\nclamp_to_stock = true\n",
        )
        .unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let config: StockroomConfig = toml::from_str(&contents).unwrap();

        assert_eq!(config.api.base_url, "https://inventory.example.com");
        assert_eq!(config.api.request_timeout_secs, 30);
        assert!(config.billing.clamp_to_stock);
        assert_eq!(config.invoice.rows_per_page, 30);
    }

    #[test]
    fn test_save_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("stockroom.toml");

        let mut config = StockroomConfig::default();
        config.invoice.currency = "Rs".to_string();
        let saved = config.save(Some(path.clone())).unwrap();
        assert_eq!(saved, path);

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("[api]"));
        assert!(text.contains("[invoice]"));

        let loaded: StockroomConfig = toml::from_str(&text).unwrap();
        assert_eq!(loaded.invoice.currency, "Rs");
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stockroom.toml");
        std::fs::write(&path, "[api\nbase_url = ").unwrap();

        let err = StockroomConfig::load(Some(path)).unwrap_err();
        assert!(err.is_config_error());
    }
}
