//! CLI configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use cartsync_client::{ClientConfig, RetryPolicy};
use cartsync_commerce::cart::{
    ShippingPolicy, CART_KEY, DEFAULT_FLAT_SHIPPING_COST, DEFAULT_FREE_SHIPPING_THRESHOLD,
};
use cartsync_commerce::money::Currency;
use serde::{Deserialize, Serialize};

/// Name of the config file looked up from the working directory upward.
pub const CONFIG_FILE_NAME: &str = "cartsync.toml";

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "CARTSYNC_CONFIG";

/// CLI configuration file. Every field has a default.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CartsyncConfig {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub shipping: ShippingConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub display: DisplayConfig,
}

impl CartsyncConfig {
    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
    }
}

/// Where the cart record lives.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorageConfig {
    /// Directory for the file store. Relative paths resolve against the
    /// working directory; unset means the per-user data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    /// Key of the cart record.
    #[serde(default = "default_cart_key")]
    pub cart_key: String,
}

fn default_cart_key() -> String {
    CART_KEY.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            cart_key: default_cart_key(),
        }
    }
}

/// Shipping fee settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShippingConfig {
    #[serde(default = "default_flat_shipping_cost")]
    pub flat_shipping_cost: u64,

    #[serde(default = "default_free_shipping_threshold")]
    pub free_shipping_threshold: u64,
}

fn default_flat_shipping_cost() -> u64 {
    DEFAULT_FLAT_SHIPPING_COST
}

fn default_free_shipping_threshold() -> u64 {
    DEFAULT_FREE_SHIPPING_THRESHOLD
}

impl Default for ShippingConfig {
    fn default() -> Self {
        Self {
            flat_shipping_cost: default_flat_shipping_cost(),
            free_shipping_threshold: default_free_shipping_threshold(),
        }
    }
}

impl ShippingConfig {
    pub fn policy(&self) -> ShippingPolicy {
        ShippingPolicy::new(self.flat_shipping_cost, self.free_shipping_threshold)
    }
}

/// Storefront connection settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Sent as `X-CSRFToken`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub csrf_token: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retries for GET requests.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000/".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_max_retries() -> u32 {
    2
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            csrf_token: None,
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

impl ApiConfig {
    pub fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::new(self.base_url.clone())
            .with_timeout(Duration::from_secs(self.timeout_secs))
            .with_retry(RetryPolicy::new(self.max_retries));
        if let Some(token) = &self.csrf_token {
            config = config.with_csrf_token(token.clone());
        }
        config
    }
}

/// Output settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DisplayConfig {
    #[serde(default)]
    pub currency: Currency,
}

/// Generate a default cartsync.toml config file.
pub fn generate_default_config() -> String {
    format!(
        r#"# cartsync configuration

[storage]
# data_dir = ".cartsync"
cart_key = "{CART_KEY}"

[shipping]
flat_shipping_cost = {DEFAULT_FLAT_SHIPPING_COST}
free_shipping_threshold = {DEFAULT_FREE_SHIPPING_THRESHOLD}

[api]
base_url = "{base_url}"
# csrf_token = ""
timeout_secs = {timeout}
max_retries = {retries}

[display]
currency = "IRT"
"#,
        base_url = default_base_url(),
        timeout = default_timeout_secs(),
        retries = default_max_retries(),
    )
}
