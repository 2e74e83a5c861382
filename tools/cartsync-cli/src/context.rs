//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use cartsync_client::StorefrontClient;
use cartsync_commerce::cart::CartStore;
use cartsync_store::FileStorage;

use crate::config::{CartsyncConfig, CONFIG_ENV_VAR, CONFIG_FILE_NAME};
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CartsyncConfig,
    /// File the configuration came from, if any.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from the given config file, `CARTSYNC_CONFIG`, or the
    /// nearest `cartsync.toml` above the working directory.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let explicit = config_path
            .map(PathBuf::from)
            .or_else(|| std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from));

        let (config, config_path) = match explicit {
            Some(path) => {
                let path = resolve(&cwd, &path);
                (CartsyncConfig::load(&path)?, Some(path))
            }
            None => match Self::find_config(&cwd) {
                Some(path) => (CartsyncConfig::load(&path)?, Some(path)),
                None => (CartsyncConfig::default(), None),
            },
        };
        tracing::debug!(config = ?config_path, "loaded configuration");

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    /// Find the config file in the directory tree.
    fn find_config(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(CONFIG_FILE_NAME))
            .find(|path| path.is_file())
    }

    /// Directory of the file store.
    pub fn data_dir(&self) -> PathBuf {
        match &self.config.storage.data_dir {
            Some(dir) => resolve(&self.cwd, dir),
            None => dirs_path().join("cartsync"),
        }
    }

    /// Open the file-backed cart store.
    pub fn open_store(&self) -> Result<CartStore<FileStorage>> {
        let dir = self.data_dir();
        let storage = FileStorage::open(&dir)
            .with_context(|| format!("Failed to open cart storage at {}", dir.display()))?;
        CartStore::with_key(storage, self.config.storage.cart_key.clone())
            .context("Failed to open cart store")
    }

    /// Build the storefront client.
    pub fn client(&self) -> Result<StorefrontClient> {
        StorefrontClient::new(self.config.api.client_config())
            .context("Failed to create storefront client")
    }
}

fn resolve(cwd: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

/// Get the platform-specific data directory.
fn dirs_path() -> PathBuf {
    if let Some(home) = std::env::var_os("HOME") {
        PathBuf::from(home).join(".local").join("share")
    } else {
        std::env::temp_dir()
    }
}
