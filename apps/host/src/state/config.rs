//! # Configuration State
//!
//! Stores host configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`BILLSPLIT_*`)
//! 2. Defaults (this file)
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no mutex needed.
//!
//! ## Who Reads What
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  db_path ─────────── host startup (history database)                   │
//! │  currency_symbol ─── front end (display only)                          │
//! │  import ──────────── external AI bill source (never the engine)        │
//! │  payment ─────────── front end (payment QR codes)                      │
//! │  history_limit ───── list_history command                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Saved bills shown in the history list unless configured otherwise.
pub const DEFAULT_HISTORY_LIMIT: u32 = 20;

const DEFAULT_IMPORT_MODEL: &str = "gemini-2.0-flash";

/// Host configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigState {
    /// History database path. `None` means the platform data directory.
    pub db_path: Option<PathBuf>,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// Settings for an external AI bill reader
    pub import: ImportConfig,

    /// Payee details for settling up
    pub payment: PaymentConfig,

    /// How many saved bills `list_history` returns
    pub history_limit: u32,
}

/// Credentials for an AI vision bill source.
///
/// Only handed to a [`billsplit_core::BillSource`] implementation that
/// talks to an external service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportConfig {
    /// Never serialized back to the front end.
    #[serde(skip_serializing, default)]
    pub api_key: Option<String>,

    pub model: String,
}

impl ImportConfig {
    /// True when an API key was provided.
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}

/// Payee shown on the payment QR code.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentConfig {
    pub upi_id: Option<String>,
    pub payee_name: Option<String>,
}

impl PaymentConfig {
    /// True when there is somewhere to send money.
    pub fn is_configured(&self) -> bool {
        self.upi_id.as_deref().is_some_and(|id| !id.trim().is_empty())
    }
}

impl Default for ConfigState {
    /// Returns default configuration suitable for development.
    ///
    /// ## Default Values
    /// - Database: platform data directory
    /// - Currency: ₹
    /// - Import: no API key
    /// - Payment: not configured
    /// - History: 20 entries
    fn default() -> Self {
        ConfigState {
            db_path: None,
            currency_symbol: "₹".to_string(),
            import: ImportConfig {
                api_key: None,
                model: DEFAULT_IMPORT_MODEL.to_string(),
            },
            payment: PaymentConfig::default(),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl ConfigState {
    /// Creates a new ConfigState from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `BILLSPLIT_DB_PATH`: History database file
    /// - `BILLSPLIT_CURRENCY_SYMBOL`: Display symbol
    /// - `BILLSPLIT_IMPORT_API_KEY`, `BILLSPLIT_IMPORT_MODEL`: AI bill reader
    /// - `BILLSPLIT_PAYEE_UPI_ID`, `BILLSPLIT_PAYEE_NAME`: Payment QR payee
    /// - `BILLSPLIT_HISTORY_LIMIT`: History list length (e.g., "50")
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup.
    ///
    /// Blank values are ignored. An unparsable history limit keeps the
    /// default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = ConfigState::default();

        if let Some(path) = get("BILLSPLIT_DB_PATH") {
            config.db_path = Some(PathBuf::from(path));
        }

        if let Some(symbol) = get("BILLSPLIT_CURRENCY_SYMBOL") {
            config.currency_symbol = symbol;
        }

        config.import.api_key = get("BILLSPLIT_IMPORT_API_KEY");
        if let Some(model) = get("BILLSPLIT_IMPORT_MODEL") {
            config.import.model = model;
        }

        config.payment.upi_id = get("BILLSPLIT_PAYEE_UPI_ID");
        config.payment.payee_name = get("BILLSPLIT_PAYEE_NAME");

        if let Some(limit) = get("BILLSPLIT_HISTORY_LIMIT") {
            if let Ok(limit) = limit.trim().parse::<u32>() {
                config.history_limit = limit;
            }
        }

        config
    }
}
