//! # Application Configuration
//!
//! Configuration for the services layer.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     TAVSHIL_DB_PATH=/data/tavshil.db                                   │
//! │     TAVSHIL_SHIPPING_AGOROT=2500                                       │
//! │     TAVSHIL_COMMISSION_BPS=500                                         │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/tavshil/config.toml (Linux)                              │
//! │     ~/Library/Application Support/dev.tavshil.app/config.toml (macOS)  │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     shipping ₪25, commission 5%, polling 5s/30s                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # config.toml
//! [database]
//! path = "./tavshil.db"
//!
//! [pricing]
//! shipping_cost_agorot = 2500
//! commission_rate_bps = 500
//!
//! [polling]
//! orders_secs = 5
//! session_secs = 30
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, warn};

use tavshil_core::{COMMISSION_RATE_BPS, SHIPPING_COST};

// =============================================================================
// Config Sections
// =============================================================================

/// Database section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig {
            path: PathBuf::from("./tavshil.db"),
        }
    }
}

/// Pricing section.
///
/// The commission rate configured here is read once per checkout and
/// pinned on the created order; changing it never rewrites history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Flat delivery fee in agorot.
    pub shipping_cost_agorot: i64,
    /// Platform commission in basis points (500 = 5%).
    pub commission_rate_bps: u32,
}

impl Default for PricingConfig {
    fn default() -> Self {
        PricingConfig {
            shipping_cost_agorot: SHIPPING_COST.agorot(),
            commission_rate_bps: COMMISSION_RATE_BPS,
        }
    }
}

/// Polling cadence section, in seconds.
///
/// The platform polls instead of pushing; these drive the refresh tasks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    /// Order/cart list refresh.
    pub orders_secs: u64,
    /// Current-identity refresh.
    pub session_secs: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        PollingConfig {
            orders_secs: 5,
            session_secs: 30,
        }
    }
}

// =============================================================================
// AppConfig
// =============================================================================

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub pricing: PricingConfig,
    pub polling: PollingConfig,
}

impl AppConfig {
    /// Loads configuration: file (if present) layered under env overrides.
    pub fn load() -> Self {
        let mut config = Self::from_file().unwrap_or_default();
        config.apply_env_overrides();
        config
    }

    /// Reads the TOML config file from the platform config directory.
    fn from_file() -> Option<Self> {
        let path = Self::config_file_path()?;
        let raw = std::fs::read_to_string(&path).ok()?;

        match toml::from_str(&raw) {
            Ok(config) => {
                debug!(path = %path.display(), "Loaded config file");
                Some(config)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Ignoring malformed config file");
                None
            }
        }
    }

    /// Platform config file location.
    pub fn config_file_path() -> Option<PathBuf> {
        let dirs = directories::ProjectDirs::from("dev", "tavshil", "tavshil")?;
        Some(dirs.config_dir().join("config.toml"))
    }

    /// Applies `TAVSHIL_*` environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("TAVSHIL_DB_PATH") {
            self.database.path = PathBuf::from(path);
        }
        if let Some(value) = env_parse::<i64>("TAVSHIL_SHIPPING_AGOROT") {
            self.pricing.shipping_cost_agorot = value;
        }
        if let Some(value) = env_parse::<u32>("TAVSHIL_COMMISSION_BPS") {
            self.pricing.commission_rate_bps = value;
        }
        if let Some(value) = env_parse::<u64>("TAVSHIL_POLL_ORDERS_SECS") {
            self.polling.orders_secs = value;
        }
        if let Some(value) = env_parse::<u64>("TAVSHIL_POLL_SESSION_SECS") {
            self.polling.session_secs = value;
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    match std::env::var(key) {
        Ok(raw) => match raw.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(key, %raw, "Ignoring unparsable environment override");
                None
            }
        },
        Err(_) => None,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
