//! Configuration types for the console runtime.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Backend API configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the REST backend (without the `/v1` prefix).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Serve images through the same-origin `/media` proxy.
    #[serde(default = "default_image_via_proxy")]
    pub image_via_proxy: bool,
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_image_via_proxy() -> bool {
    true
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            image_via_proxy: default_image_via_proxy(),
        }
    }
}

impl ApiConfig {
    /// Get the request timeout as a Duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate API configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(format!(
                "api.base_url must start with http:// or https:// (got {:?})",
                self.base_url
            ));
        }
        if self.timeout_secs == 0 {
            return Err("api.timeout_secs cannot be 0".to_string());
        }
        Ok(())
    }
}

/// Editor autosave configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Quiet period after the last edit before a draft is saved.
    #[serde(default = "default_autosave_delay_ms")]
    pub autosave_delay_ms: u64,
}

fn default_autosave_delay_ms() -> u64 {
    300
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            autosave_delay_ms: default_autosave_delay_ms(),
        }
    }
}

impl EditorConfig {
    pub fn autosave_delay(&self) -> Duration {
        Duration::from_millis(self.autosave_delay_ms)
    }
}

/// Resource cache configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CacheConfig {
    /// How long an entry without subscribers is kept before eviction.
    #[serde(default = "default_gc_grace_secs")]
    pub gc_grace_secs: u64,
    /// Interval between eviction sweeps.
    #[serde(default = "default_gc_interval_secs")]
    pub gc_interval_secs: u64,
}

fn default_gc_grace_secs() -> u64 {
    60
}

fn default_gc_interval_secs() -> u64 {
    30
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            gc_grace_secs: default_gc_grace_secs(),
            gc_interval_secs: default_gc_interval_secs(),
        }
    }
}

impl CacheConfig {
    pub fn gc_grace(&self) -> Duration {
        Duration::from_secs(self.gc_grace_secs)
    }

    pub fn gc_interval(&self) -> Duration {
        Duration::from_secs(self.gc_interval_secs)
    }
}

/// Durable state configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StateConfig {
    /// File holding tokens, filters and preferences.
    /// Defaults to `$XDG_STATE_HOME/folio/state.json`.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Complete console configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ConsoleConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub editor: EditorConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub state: StateConfig,
}

impl ConsoleConfig {
    /// Validate every section.
    pub fn validate(&self) -> crate::Result<()> {
        self.api.validate().map_err(crate::Error::InvalidConfig)?;
        if self.editor.autosave_delay_ms == 0 {
            return Err(crate::Error::InvalidConfig(
                "editor.autosave_delay_ms cannot be 0".to_string(),
            ));
        }
        // tokio::time::interval panics on a zero period
        if self.cache.gc_interval_secs == 0 {
            return Err(crate::Error::InvalidConfig(
                "cache.gc_interval_secs cannot be 0".to_string(),
            ));
        }
        Ok(())
    }
}
