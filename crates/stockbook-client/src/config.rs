//! # Client Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     STOCKBOOK_URL=https://books.example.com                            │
//! │     STOCKBOOK_TOKEN=…  STOCKBOOK_DB_PREFIX=…  STOCKBOOK_SECTION=…       │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/stockbook/stockbook.toml (Linux)                         │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [backend]
//! url = "https://books.example.com"
//! timeout_secs = 30
//!
//! [session]
//! db_prefix = "sharma"
//! section = "hosiery"
//!
//! [display]
//! currency_symbol = "₹"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use stockbook_core::Money;
use tracing::{debug, info, warn};
use url::Url;

use crate::context::RequestContext;
use crate::error::{ClientError, ClientResult};

// =============================================================================
// Backend Settings
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendSettings {
    /// Base URL of the REST backend.
    #[serde(default = "default_url")]
    pub url: String,

    /// Per-request timeout (seconds).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for BackendSettings {
    fn default() -> Self {
        BackendSettings {
            url: default_url(),
            timeout_secs: default_timeout(),
        }
    }
}

// =============================================================================
// Session Settings
// =============================================================================

/// Who is calling and against which books.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Bearer token. Usually supplied through `STOCKBOOK_TOKEN`.
    #[serde(default, skip_serializing)]
    pub token: Option<String>,

    /// Database prefix selecting the company's books.
    #[serde(default)]
    pub db_prefix: String,

    /// Current business section, if the backend partitions by section.
    #[serde(default)]
    pub section: Option<String>,
}

// =============================================================================
// Display Settings
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplaySettings {
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

fn default_currency_symbol() -> String {
    "₹".to_string()
}

impl Default for DisplaySettings {
    fn default() -> Self {
        DisplaySettings {
            currency_symbol: default_currency_symbol(),
        }
    }
}

// =============================================================================
// Main Client Configuration
// =============================================================================

/// Complete client configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub backend: BackendSettings,

    #[serde(default)]
    pub session: SessionSettings,

    #[serde(default)]
    pub display: DisplaySettings,
}

impl ClientConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (stockbook.toml)
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

    /// Validates the configuration.
    pub fn validate(&self) -> ClientResult<()> {
        let url = Url::parse(&self.backend.url)?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ClientError::InvalidConfig(format!(
                "backend url must be http or https, got: {}",
                self.backend.url
            )));
        }

        if self.backend.timeout_secs == 0 {
            return Err(ClientError::InvalidConfig(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("STOCKBOOK_URL") {
            debug!(url = %url, "Overriding backend URL from environment");
            self.backend.url = url;
        }

        if let Ok(timeout) = std::env::var("STOCKBOOK_TIMEOUT_SECS") {
            match timeout.parse::<u64>() {
                Ok(t) => self.backend.timeout_secs = t,
                Err(_) => warn!(timeout = %timeout, "Ignoring invalid STOCKBOOK_TIMEOUT_SECS"),
            }
        }

        if let Ok(token) = std::env::var("STOCKBOOK_TOKEN") {
            self.session.token = Some(token);
        }

        if let Ok(prefix) = std::env::var("STOCKBOOK_DB_PREFIX") {
            debug!(db_prefix = %prefix, "Overriding db prefix from environment");
            self.session.db_prefix = prefix;
        }

        if let Ok(section) = std::env::var("STOCKBOOK_SECTION") {
            self.session.section = Some(section);
        }

        if let Ok(symbol) = std::env::var("STOCKBOOK_CURRENCY_SYMBOL") {
            self.display.currency_symbol = symbol;
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "stockbook", "stockbook")
            .map(|dirs| dirs.config_dir().join("stockbook.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.backend.timeout_secs)
    }

    /// Builds the request context every backend call carries.
    pub fn request_context(&self) -> ClientResult<RequestContext> {
        let mut ctx = RequestContext::new(Url::parse(&self.backend.url)?, &self.session.db_prefix);
        if let Some(token) = &self.session.token {
            ctx = ctx.with_token(token);
        }
        if let Some(section) = &self.session.section {
            ctx = ctx.with_section(section);
        }
        Ok(ctx)
    }

    /// Formats money for display with the configured symbol.
    ///
    /// ## Example
    /// ```rust
    /// use rust_decimal::Decimal;
    /// use stockbook_client::ClientConfig;
    /// use stockbook_core::Money;
    ///
    /// let config = ClientConfig::default();
    /// assert_eq!(config.format_currency(Money::new(Decimal::from(1180))), "₹1180.00");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        if amount.is_negative() {
            format!("-{}{}", self.display.currency_symbol, amount.abs())
        } else {
            format!("{}{}", self.display.currency_symbol, amount)
        }
    }
}
