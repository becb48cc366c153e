//! # CLI Configuration
//!
//! Where the storefront API lives and where the cart is stored.
//!
//! ## Load Order (later overrides earlier)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Defaults             http://localhost:3333, 10 s, @RocketShoes:cart │
//! │  2. config.toml          --config PATH, or the platform config dir      │
//! │  3. Environment          ROCKETSHOES_API_URL                            │
//! │                          ROCKETSHOES_REQUEST_TIMEOUT_SECS               │
//! │                          ROCKETSHOES_DB_PATH                            │
//! │                          ROCKETSHOES_STORAGE_KEY                        │
//! │  4. validate()                                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example `config.toml`
//! ```toml
//! [api]
//! base_url = "https://api.rocketshoes.example"
//! request_timeout_secs = 5
//!
//! [storage]
//! database_path = "/var/lib/rocketshoes/cart.db"
//! key = "@RocketShoes:cart"
//! ```

use directories::ProjectDirs;
use rocketshoes_api::config::{DEFAULT_BASE_URL, DEFAULT_REQUEST_TIMEOUT};
use rocketshoes_api::ApiConfig;
use rocketshoes_cart::StoreConfig;
use rocketshoes_core::CART_STORAGE_KEY;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Could not determine a data directory; set ROCKETSHOES_DB_PATH")]
    NoDataDir,
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Sections
// =============================================================================

/// Storefront API settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSection {
    pub base_url: String,
    pub request_timeout_secs: u64,
}

impl Default for ApiSection {
    fn default() -> Self {
        ApiSection {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT.as_secs(),
        }
    }
}

/// Local storage settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSection {
    /// SQLite file; the platform data dir is used when unset.
    pub database_path: Option<PathBuf>,

    /// Key the cart is stored under.
    pub key: String,
}

impl Default for StorageSection {
    fn default() -> Self {
        StorageSection {
            database_path: None,
            key: CART_STORAGE_KEY.to_string(),
        }
    }
}

/// Complete CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiSection,
    pub storage: StorageSection,
}

// =============================================================================
// Loading
// =============================================================================

impl AppConfig {
    /// Loads configuration from file, environment, and defaults.
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        Self::load_with(
            config_path.or_else(Self::default_config_path),
            |name| std::env::var(name).ok(),
        )
    }

    /// [`load`](Self::load) with an explicit file and environment lookup.
    pub fn load_with(
        config_path: Option<PathBuf>,
        env: impl Fn(&str) -> Option<String>,
    ) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path {
            if path.exists() {
                info!(?path, "Loading config from file");
                config = Self::from_file(&path)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides(env);
        config.validate()?;

        Ok(config)
    }

    fn from_file(path: &Path) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&contents)?)
    }

    fn apply_env_overrides(&mut self, env: impl Fn(&str) -> Option<String>) {
        if let Some(url) = env("ROCKETSHOES_API_URL") {
            debug!(url = %url, "Overriding API URL from environment");
            self.api.base_url = url;
        }

        if let Some(secs) = env("ROCKETSHOES_REQUEST_TIMEOUT_SECS") {
            match secs.parse::<u64>() {
                Ok(secs) => self.api.request_timeout_secs = secs,
                Err(_) => warn!(value = %secs, "Ignoring non-numeric request timeout"),
            }
        }

        if let Some(path) = env("ROCKETSHOES_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.storage.database_path = Some(PathBuf::from(path));
        }

        if let Some(key) = env("ROCKETSHOES_STORAGE_KEY") {
            self.storage.key = key;
        }
    }

    /// Checks the values that would only fail later, at first use.
    pub fn validate(&self) -> ConfigResult<()> {
        let url = self.api.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "api.base_url must be an http(s) URL, got '{url}'"
            )));
        }

        if self.api.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "api.request_timeout_secs must be at least 1".into(),
            ));
        }

        if self.storage.key.trim().is_empty() {
            return Err(ConfigError::Invalid("storage.key must not be empty".into()));
        }

        Ok(())
    }

    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("com", "rocketshoes", "cart")
    }

    fn default_config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
    }

    // =========================================================================
    // Derived settings
    // =========================================================================

    /// The SQLite file to open.
    pub fn database_path(&self) -> ConfigResult<PathBuf> {
        if let Some(path) = &self.storage.database_path {
            return Ok(path.clone());
        }

        Self::project_dirs()
            .map(|dirs| dirs.data_dir().join("rocketshoes.db"))
            .ok_or(ConfigError::NoDataDir)
    }

    pub fn api_config(&self) -> ApiConfig {
        ApiConfig::new(self.api.base_url.trim())
            .request_timeout(Duration::from_secs(self.api.request_timeout_secs))
    }

    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            storage_key: self.storage.key.clone(),
            ..StoreConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::load_with(None, no_env).unwrap();

        assert_eq!(config.api.base_url, "http://localhost:3333");
        assert_eq!(config.api.request_timeout_secs, 10);
        assert_eq!(config.storage.key, "@RocketShoes:cart");
        assert_eq!(config.store_config().storage_key, "@RocketShoes:cart");
    }

    #[test]
    fn test_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[api]\nbase_url = \"https://shop.example\"").unwrap();

        let config = AppConfig::load_with(Some(file.path().to_path_buf()), no_env).unwrap();

        assert_eq!(config.api.base_url, "https://shop.example");
        assert_eq!(config.api.request_timeout_secs, 10);
        assert_eq!(config.storage, StorageSection::default());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config =
            AppConfig::load_with(Some(dir.path().join("absent.toml")), no_env).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_env_overrides_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[api]\nbase_url = \"https://shop.example\"\nrequest_timeout_secs = 3"
        )
        .unwrap();

        let env: HashMap<&str, &str> = [
            ("ROCKETSHOES_API_URL", "http://127.0.0.1:9000"),
            ("ROCKETSHOES_DB_PATH", "/tmp/cart.db"),
            ("ROCKETSHOES_STORAGE_KEY", "@RocketShoes:cart:dev"),
        ]
        .into_iter()
        .collect();

        let config = AppConfig::load_with(Some(file.path().to_path_buf()), |name| {
            env.get(name).map(|v| v.to_string())
        })
        .unwrap();

        assert_eq!(config.api.base_url, "http://127.0.0.1:9000");
        assert_eq!(config.api.request_timeout_secs, 3);
        assert_eq!(
            config.database_path().unwrap(),
            PathBuf::from("/tmp/cart.db")
        );
        assert_eq!(config.storage.key, "@RocketShoes:cart:dev");
        assert_eq!(
            config.api_config().request_timeout,
            Duration::from_secs(3)
        );
    }

    #[test]
    fn test_bad_timeout_env_ignored() {
        let config = AppConfig::load_with(None, |name| {
            (name == "ROCKETSHOES_REQUEST_TIMEOUT_SECS").then(|| "soon".to_string())
        })
        .unwrap();
        assert_eq!(config.api.request_timeout_secs, 10);
    }

    #[test]
    fn test_validation() {
        let mut config = AppConfig::default();
        config.api.base_url = "localhost:3333".into();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = AppConfig::default();
        config.api.request_timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.storage.key = "  ".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[api\nbase_url = ").unwrap();

        let err = AppConfig::load_with(Some(file.path().to_path_buf()), no_env).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_toml_round_trip() {
        let toml_str = toml::to_string_pretty(&AppConfig::default()).unwrap();
        assert!(toml_str.contains("[api]"));
        assert!(toml_str.contains("[storage]"));
    }
}
