//! # Sync Configuration
//!
//! Configuration of the backend clients and the local cache.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     WARDEN_BACKEND_URL=https://backend.internal:443                    │
//! │     WARDEN_API_KEY=...                                                 │
//! │     WARDEN_CACHE_PATH=/var/lib/warden/profiles.pb                      │
//! │     WARDEN_BIND_SET=192.0.2.0/24,2001:db8::/32                         │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/warden/warden.toml (Linux)                               │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # warden.toml
//! [backend]
//! endpoint = "https://backend.internal:443"
//! api_key = "secret"
//! connect_timeout_secs = 10
//! request_timeout_secs = 30
//! sync_timeout_secs = 300
//!
//! [cache]
//! path = "/var/lib/warden/profiles.pb"
//!
//! [network]
//! bind_set = ["192.0.2.0/24", "2001:db8::/32"]
//!
//! [remote_kv]
//! ttl_secs = 3600
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use warden_core::{BindSet, IpPrefix};

use crate::error::{SyncError, SyncResult};

// =============================================================================
// Backend Settings
// =============================================================================

/// Connection to the business-logic backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendSettings {
    /// gRPC endpoint, `http://` or `https://`.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// API key sent as a bearer token. Unset means unauthenticated calls.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Connection timeout (seconds).
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Deadline of unary calls (seconds).
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Deadline of a whole profile sync, stream included (seconds).
    #[serde(default = "default_sync_timeout")]
    pub sync_timeout_secs: u64,
}

fn default_endpoint() -> String {
    "http://localhost:50051".to_string()
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_request_timeout() -> u64 {
    30
}

fn default_sync_timeout() -> u64 {
    300
}

impl Default for BackendSettings {
    fn default() -> Self {
        BackendSettings {
            endpoint: default_endpoint(),
            api_key: None,
            connect_timeout_secs: default_connect_timeout(),
            request_timeout_secs: default_request_timeout(),
            sync_timeout_secs: default_sync_timeout(),
        }
    }
}

impl BackendSettings {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn sync_timeout(&self) -> Duration {
        Duration::from_secs(self.sync_timeout_secs)
    }
}

// =============================================================================
// Cache, Network and Remote KV Settings
// =============================================================================

/// Location of the profile cache file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_cache_path")]
    pub path: PathBuf,
}

fn default_cache_path() -> PathBuf {
    directories::ProjectDirs::from("com", "warden", "warden")
        .map(|dirs| dirs.data_dir().join("profiles.pb"))
        .unwrap_or_else(|| PathBuf::from("profiles.pb"))
}

impl Default for CacheSettings {
    fn default() -> Self {
        CacheSettings {
            path: default_cache_path(),
        }
    }
}

/// Addresses the DNS service listens on.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkSettings {
    /// Networks dedicated device IPs must fall into.
    #[serde(default)]
    pub bind_set: BindSet,
}

/// Remote key/value store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteKvSettings {
    /// Time-to-live of written keys (seconds).
    #[serde(default = "default_kv_ttl")]
    pub ttl_secs: u64,
}

fn default_kv_ttl() -> u64 {
    3600
}

impl Default for RemoteKvSettings {
    fn default() -> Self {
        RemoteKvSettings {
            ttl_secs: default_kv_ttl(),
        }
    }
}

impl RemoteKvSettings {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete Warden sync configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WardenConfig {
    #[serde(default)]
    pub backend: BackendSettings,

    #[serde(default)]
    pub cache: CacheSettings,

    #[serde(default)]
    pub network: NetworkSettings,

    #[serde(default)]
    pub remote_kv: RemoteKvSettings,
}

impl WardenConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (warden.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> SyncResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading warden config from file");
                let contents = std::fs::read_to_string(&path)
                    .map_err(|e| SyncError::ConfigLoadFailed(format!("{}: {e}", path.display())))?;
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
            warn!("Failed to load warden config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> SyncResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| SyncError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| SyncError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| SyncError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Warden config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> SyncResult<()> {
        let url = url::Url::parse(&self.backend.endpoint)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(SyncError::InvalidUrl(format!(
                "Backend URL must start with http:// or https://, got: {}",
                self.backend.endpoint
            )));
        }

        if self.backend.request_timeout_secs == 0 || self.backend.sync_timeout_secs == 0 {
            return Err(SyncError::InvalidConfig(
                "timeouts must be greater than 0".into(),
            ));
        }

        if self.cache.path.as_os_str().is_empty() {
            return Err(SyncError::InvalidConfig("cache path must not be empty".into()));
        }

        if self.remote_kv.ttl_secs == 0 {
            return Err(SyncError::InvalidConfig(
                "remote_kv.ttl_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("WARDEN_BACKEND_URL") {
            debug!(url = %url, "Overriding backend URL from environment");
            self.backend.endpoint = url;
        }

        if let Ok(key) = std::env::var("WARDEN_API_KEY") {
            self.backend.api_key = Some(key);
        }

        if let Ok(path) = std::env::var("WARDEN_CACHE_PATH") {
            debug!(path = %path, "Overriding cache path from environment");
            self.cache.path = PathBuf::from(path);
        }

        if let Ok(set) = std::env::var("WARDEN_BIND_SET") {
            match parse_bind_set(&set) {
                Ok(bind_set) => self.network.bind_set = bind_set,
                Err(e) => warn!(value = %set, error = %e, "Ignoring invalid bind set in environment"),
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "warden", "warden")
            .map(|dirs| dirs.config_dir().join("warden.toml"))
    }
}

/// Parses a comma-separated list of prefixes.
pub fn parse_bind_set(s: &str) -> SyncResult<BindSet> {
    s.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| {
            p.parse::<IpPrefix>()
                .map_err(|e| SyncError::InvalidConfig(format!("bind set: {e}")))
        })
        .collect()
}
