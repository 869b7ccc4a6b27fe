use anyhow::{Context, Result, anyhow, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{provider::ProviderId, tile::MAX_ZOOM};

/// Configuration for a single provider (e.g., API key).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub api_key: String,
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// default_station = "KMOJOPLI144"
/// listen = ["127.0.0.1:5000"]
///
/// [providers.wunderground]
/// api_key = "..."
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Station used by `/weather` when no `stationId` is given.
    pub default_station: String,

    /// weather.com postal key for the daily forecast, e.g. "64804:US".
    pub postal_key: String,

    pub map_zoom: u8,
    pub request_timeout_secs: u64,

    /// Path of the chat message log.
    pub chat_log: PathBuf,

    /// Addresses the HTTP server binds, all serving the same routes.
    pub listen: Vec<String>,

    pub providers: HashMap<String, ProviderConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_station: "KMOJOPLI144".to_string(),
            postal_key: "64804:US".to_string(),
            map_zoom: 3,
            request_timeout_secs: 10,
            chat_log: PathBuf::from("chat_messages.json"),
            listen: vec!["127.0.0.1:5000".to_string(), "0.0.0.0:10000".to_string()],
            providers: HashMap::new(),
        }
    }
}

impl Config {
    /// Load config from `path`, or return defaults if it doesn't exist yet.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "station-weather", "weather-server")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Override API keys from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|name| std::env::var(name).ok());
    }

    /// Override API keys using `lookup` in place of the process environment.
    pub fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        for id in ProviderId::all() {
            if let Some(key) = lookup(id.api_key_env()).filter(|k| !k.trim().is_empty()) {
                let api_key = key.trim().to_string();
                self.providers.insert(id.as_str().to_string(), ProviderConfig { api_key });
            }
        }
    }

    /// Set or replace a provider API key.
    pub fn upsert_provider_api_key(&mut self, provider_id: ProviderId, api_key: String) {
        self.providers.insert(provider_id.as_str().to_string(), ProviderConfig { api_key });
    }

    /// Returns API key for a provider, if present.
    pub fn provider_api_key(&self, provider_id: ProviderId) -> Option<&str> {
        self.providers
            .get(provider_id.as_str())
            .map(|cfg| cfg.api_key.as_str())
            .filter(|key| !key.is_empty())
    }

    pub fn is_provider_configured(&self, provider_id: ProviderId) -> bool {
        self.provider_api_key(provider_id).is_some()
    }

    /// API key for a provider that the server cannot run without.
    pub fn require_api_key(&self, provider_id: ProviderId) -> Result<&str> {
        self.provider_api_key(provider_id).ok_or_else(|| {
            anyhow!(
                "No API key configured for provider '{provider_id}'.\n\
                 Hint: set {} or run `weather-server configure {provider_id}`.",
                provider_id.api_key_env()
            )
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Reject settings the server cannot start with.
    pub fn validate(&self) -> Result<()> {
        if self.map_zoom > MAX_ZOOM {
            bail!("map_zoom must be at most {MAX_ZOOM}, got {}", self.map_zoom);
        }
        if self.request_timeout_secs == 0 {
            bail!("request_timeout_secs must be positive");
        }
        if self.listen.is_empty() {
            bail!("at least one listen address is required");
        }
        if self.default_station.trim().is_empty() {
            bail!("default_station must not be empty");
        }
        Ok(())
    }
}
