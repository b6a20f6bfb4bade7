//! Bootstrap configuration loading
//!
//! Resolution priority, highest first:
//! 1. Command-line arguments
//! 2. Environment variables (`OAGG_*`)
//! 3. TOML config file
//! 4. Compiled defaults
//!
//! A missing config file at the default location is not fatal: compiled
//! defaults are used. A file that exists but cannot be
//! parsed is a `Config` error.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default HTTP port for oagg-svc
pub const DEFAULT_PORT: u16 = 5731;

/// Default wall-clock budget for the whole enrichment phase
pub const DEFAULT_BRANCH_BUDGET_MS: u64 = 2000;

/// Default per-request timeout for upstream HTTP calls
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 1500;

/// Bootstrap configuration loaded from TOML file
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TomlConfig {
    /// Interface the HTTP server binds to
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub aggregator: AggregatorSection,

    #[serde(default)]
    pub upstream: UpstreamSection,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

/// Fan-out tuning
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AggregatorSection {
    /// Deadline for all enrichment branches together, in milliseconds
    #[serde(default = "default_branch_budget_ms")]
    pub branch_budget_ms: u64,

    /// Abort branches still running at the deadline (otherwise they are detached)
    #[serde(default = "default_cancel_on_timeout")]
    pub cancel_on_timeout: bool,
}

/// Base URLs of the upstream services
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct UpstreamSection {
    #[serde(default = "default_upstream_url")]
    pub order_url: String,
    #[serde(default = "default_upstream_url")]
    pub offer_url: String,
    #[serde(default = "default_upstream_url")]
    pub product_url: String,
    #[serde(default = "default_upstream_url")]
    pub image_url: String,

    /// Per-request timeout in milliseconds
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_branch_budget_ms() -> u64 {
    DEFAULT_BRANCH_BUDGET_MS
}

fn default_cancel_on_timeout() -> bool {
    true
}

fn default_upstream_url() -> String {
    "http://127.0.0.1:8080".to_string()
}

fn default_request_timeout_ms() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_MS
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            logging: LoggingConfig::default(),
            aggregator: AggregatorSection::default(),
            upstream: UpstreamSection::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

impl Default for AggregatorSection {
    fn default() -> Self {
        Self {
            branch_budget_ms: default_branch_budget_ms(),
            cancel_on_timeout: default_cancel_on_timeout(),
        }
    }
}

impl Default for UpstreamSection {
    fn default() -> Self {
        Self {
            order_url: default_upstream_url(),
            offer_url: default_upstream_url(),
            product_url: default_upstream_url(),
            image_url: default_upstream_url(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl AggregatorSection {
    pub fn branch_budget(&self) -> Duration {
        Duration::from_millis(self.branch_budget_ms)
    }
}

impl UpstreamSection {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl TomlConfig {
    /// Apply overrides on top of the file/default values
    pub fn apply(&mut self, overrides: &ConfigOverrides) {
        if let Some(bind_address) = &overrides.bind_address {
            self.bind_address = bind_address.clone();
        }
        if let Some(port) = overrides.port {
            self.port = port;
        }
        if let Some(level) = &overrides.log_level {
            self.logging.level = level.clone();
        }
        if let Some(budget) = overrides.branch_budget_ms {
            self.aggregator.branch_budget_ms = budget;
        }
        if let Some(cancel) = overrides.cancel_on_timeout {
            self.aggregator.cancel_on_timeout = cancel;
        }
        if let Some(url) = &overrides.order_url {
            self.upstream.order_url = url.clone();
        }
        if let Some(url) = &overrides.offer_url {
            self.upstream.offer_url = url.clone();
        }
        if let Some(url) = &overrides.product_url {
            self.upstream.product_url = url.clone();
        }
        if let Some(url) = &overrides.image_url {
            self.upstream.image_url = url.clone();
        }
    }

    /// Reject values the service cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.aggregator.branch_budget_ms == 0 {
            return Err(Error::Config(
                "aggregator.branch_budget_ms must be greater than 0".to_string(),
            ));
        }
        if self.upstream.request_timeout_ms == 0 {
            return Err(Error::Config(
                "upstream.request_timeout_ms must be greater than 0".to_string(),
            ));
        }

        let urls = [
            ("order_url", &self.upstream.order_url),
            ("offer_url", &self.upstream.offer_url),
            ("product_url", &self.upstream.product_url),
            ("image_url", &self.upstream.image_url),
        ];
        for (key, url) in urls {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(Error::Config(format!(
                    "upstream.{} must be an http(s) URL, got '{}'",
                    key, url
                )));
            }
        }

        Ok(())
    }
}

/// Values supplied by the command line or the environment
///
/// `None` leaves the lower-priority value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub bind_address: Option<String>,
    pub port: Option<u16>,
    pub log_level: Option<String>,
    pub branch_budget_ms: Option<u64>,
    pub cancel_on_timeout: Option<bool>,
    pub order_url: Option<String>,
    pub offer_url: Option<String>,
    pub product_url: Option<String>,
    pub image_url: Option<String>,
}

impl ConfigOverrides {
    /// Read `OAGG_*` environment variables
    ///
    /// Unparseable numeric/boolean values are left unset. One note per
    /// rejected variable is returned alongside, for the caller to log once
    /// logging is up.
    pub fn from_env() -> (Self, Vec<String>) {
        fn var(name: &str) -> Option<String> {
            std::env::var(name).ok().filter(|v| !v.trim().is_empty())
        }

        fn parsed<T: std::str::FromStr>(name: &str, notes: &mut Vec<String>) -> Option<T> {
            let raw = var(name)?;
            match raw.trim().parse::<T>() {
                Ok(value) => Some(value),
                Err(_) => {
                    notes.push(format!("Ignoring invalid value '{}' for {}", raw, name));
                    None
                }
            }
        }

        let mut notes = Vec::new();
        let overrides = Self {
            bind_address: var("OAGG_BIND_ADDRESS"),
            port: parsed("OAGG_PORT", &mut notes),
            log_level: var("OAGG_LOG_LEVEL"),
            branch_budget_ms: parsed("OAGG_BRANCH_BUDGET_MS", &mut notes),
            cancel_on_timeout: parsed("OAGG_CANCEL_ON_TIMEOUT", &mut notes),
            order_url: var("OAGG_ORDER_URL"),
            offer_url: var("OAGG_OFFER_URL"),
            product_url: var("OAGG_PRODUCT_URL"),
            image_url: var("OAGG_IMAGE_URL"),
        };

        (overrides, notes)
    }

    /// Fill unset fields from `lower`, keeping `self` where set
    pub fn or(self, lower: ConfigOverrides) -> ConfigOverrides {
        ConfigOverrides {
            bind_address: self.bind_address.or(lower.bind_address),
            port: self.port.or(lower.port),
            log_level: self.log_level.or(lower.log_level),
            branch_budget_ms: self.branch_budget_ms.or(lower.branch_budget_ms),
            cancel_on_timeout: self.cancel_on_timeout.or(lower.cancel_on_timeout),
            order_url: self.order_url.or(lower.order_url),
            offer_url: self.offer_url.or(lower.offer_url),
            product_url: self.product_url.or(lower.product_url),
            image_url: self.image_url.or(lower.image_url),
        }
    }
}

/// Platform config file location (`<config dir>/oagg/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("oagg").join("config.toml"))
}

/// Parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Write a TOML config file, creating parent directories as needed
pub fn write_toml_config(config: &TomlConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Config file that `resolve_config` will read, if any
///
/// An explicit path is returned as-is (it must exist). Otherwise the default
/// location is used when present.
pub fn locate_config_file(explicit_path: Option<&Path>) -> Option<PathBuf> {
    match explicit_path {
        Some(path) => Some(path.to_path_buf()),
        None => default_config_path().filter(|path| path.exists()),
    }
}

/// Resolve the full bootstrap configuration
///
/// An explicitly requested file must exist. The default location may be
/// absent, in which case compiled defaults are used.
pub fn resolve_config(
    explicit_path: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<TomlConfig> {
    let mut config = match locate_config_file(explicit_path) {
        Some(path) => {
            if !path.exists() {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            load_toml_config(&path)?
        }
        None => TomlConfig::default(),
    };

    config.apply(overrides);
    config.validate()?;
    Ok(config)
}
