//! Application configuration management.
//!
//! Configuration is stored at `~/.config/cogniwell/config.json` and can be
//! overridden per process with `COGNIWELL_ORIGIN` and `COGNIWELL_TIMEOUT_MS`.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::api::{ClientConfig, DEFAULT_TIMEOUT_MS};

/// Application name used for config/data directory paths
pub const APP_NAME: &str = "cogniwell";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Credential file name used by the file store
const CREDENTIALS_FILE: &str = "credentials.json";

/// Origin used when nothing is configured (local development backend)
pub const DEFAULT_ORIGIN: &str = "http://localhost:8000";

const ORIGIN_ENV: &str = "COGNIWELL_ORIGIN";
const TIMEOUT_ENV: &str = "COGNIWELL_TIMEOUT_MS";

/// Where the session credential is kept between runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    #[default]
    Keyring,
    File,
}

impl FromStr for StoreKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "keyring" => Ok(StoreKind::Keyring),
            "file" => Ok(StoreKind::File),
            other => Err(format!("unknown store '{}', expected keyring or file", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    pub origin: Option<String>,
    pub timeout_ms: Option<u64>,
    #[serde(default)]
    pub store: StoreKind,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Read settings from `path`; a missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            Ok(serde_json::from_str(&contents).context("Failed to parse config file")?)
        } else {
            Ok(Self::default())
        }
    }

    /// Persist to the default location and return where it went.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        Ok(())
    }

    /// Apply environment overrides on top of the file settings.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(
            std::env::var(ORIGIN_ENV).ok(),
            std::env::var(TIMEOUT_ENV).ok(),
        )
    }

    fn apply_overrides(&mut self, origin: Option<String>, timeout_ms: Option<String>) -> Result<()> {
        if let Some(origin) = origin.filter(|o| !o.trim().is_empty()) {
            self.origin = Some(origin);
        }
        if let Some(raw) = timeout_ms {
            let timeout = raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("{} must be a number of milliseconds", TIMEOUT_ENV))?;
            self.timeout_ms = Some(timeout);
        }
        Ok(())
    }

    pub fn origin(&self) -> Result<Url> {
        let raw = self.origin.as_deref().unwrap_or(DEFAULT_ORIGIN);
        let origin = Url::parse(raw).with_context(|| format!("Invalid origin: {}", raw))?;
        if !matches!(origin.scheme(), "http" | "https") {
            anyhow::bail!("Origin must use http or https: {}", raw);
        }
        Ok(origin)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS))
    }

    pub fn client_config(&self) -> Result<ClientConfig> {
        Ok(ClientConfig::new(self.origin()?).with_timeout(self.timeout()))
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn credentials_path(&self) -> Result<PathBuf> {
        let data_dir =
            dirs::data_dir().ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME).join(CREDENTIALS_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.origin().unwrap().as_str(), "http://localhost:8000/");
        assert_eq!(config.timeout(), Duration::from_millis(30_000));
        assert_eq!(config.store, StoreKind::Keyring);

        let client = config.client_config().unwrap();
        assert_eq!(client.timeout, Duration::from_millis(30_000));
        assert_eq!(
            client.default_headers.get("content-type").unwrap(),
            "application/json"
        );
    }

    #[test]
    fn test_overrides() {
        let mut config = Config::default();
        config
            .apply_overrides(Some("https://cogniwell.example".into()), Some("5000".into()))
            .unwrap();
        assert_eq!(config.origin().unwrap().scheme(), "https");
        assert_eq!(config.timeout(), Duration::from_secs(5));

        assert!(config.apply_overrides(None, Some("soon".into())).is_err());
    }

    #[test]
    fn test_blank_origin_override_ignored() {
        let mut config = Config {
            origin: Some("http://backend:8000".into()),
            ..Config::default()
        };
        config.apply_overrides(Some("  ".into()), None).unwrap();
        assert_eq!(config.origin.as_deref(), Some("http://backend:8000"));
    }

    #[test]
    fn test_origin_scheme_checked() {
        let config = Config {
            origin: Some("ftp://files.example".into()),
            ..Config::default()
        };
        assert!(config.origin().is_err());
    }

    #[test]
    fn test_config_json_shape() {
        let config: Config =
            serde_json::from_str(r#"{"origin": "http://localhost:9000", "store": "file"}"#).unwrap();
        assert_eq!(config.store, StoreKind::File);
        assert_eq!(config.timeout_ms, None);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);

        assert_eq!(Config::load_from(&path).unwrap(), Config::default());

        let config = Config {
            origin: Some("https://cogniwell.example".into()),
            timeout_ms: Some(10_000),
            store: "file".parse().unwrap(),
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);

        assert!("vault".parse::<StoreKind>().is_err());
    }
}
