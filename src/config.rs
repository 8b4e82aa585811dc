// src/config.rs

use crate::core::models::ScanType;
use crate::core::monitor::MonitorSettings;
use crate::logging;
use color_eyre::eyre::{Result, WrapErr, eyre};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://web-vulnery.onrender.com";
pub const CONFIG_FILE: &str = "config.toml";

pub const ENV_API_URL: &str = "SCAN_CONSOLE_API_URL";
pub const ENV_API_PREFIX: &str = "SCAN_CONSOLE_API_PREFIX";
pub const ENV_DOWNLOAD_DIR: &str = "SCAN_CONSOLE_DOWNLOAD_DIR";
pub const ENV_SCAN_TYPE: &str = "SCAN_CONSOLE_SCAN_TYPE";

/// Client settings, layered as defaults < `config.toml` < environment.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    /// Path prefix in front of every endpoint. Empty targets the
    /// un-prefixed service variant.
    pub api_prefix: String,
    pub poll_interval_ms: u64,
    pub health_interval_secs: u64,
    /// Consecutive failed polls before the monitor reports degraded connectivity.
    pub degraded_after: u32,
    pub request_timeout_secs: Option<u64>,
    pub download_dir: Option<PathBuf>,
    /// Wire name of the scan type preselected in the form (`basico`, `vuln`, ...).
    pub default_scan_type: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_prefix: "/api".to_string(),
            poll_interval_ms: 1000,
            health_interval_secs: 30,
            degraded_after: 5,
            request_timeout_secs: None,
            download_dir: None,
            default_scan_type: ScanType::Basic.to_string(),
        }
    }
}

impl ClientConfig {
    /// Loads the configuration from the standard config directory and the
    /// process environment.
    pub fn load() -> Result<Self> {
        let path = logging::get_config_dir().join(CONFIG_FILE);
        Self::load_from(&path, |key| std::env::var(key).ok())
    }

    /// Loads from an explicit file path with a pluggable environment lookup.
    /// A missing file is not an error.
    pub fn load_from<F>(path: &Path, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = if path.exists() {
            let raw = std::fs::read_to_string(path)
                .wrap_err_with(|| format!("Failed to read config file {}", path.display()))?;
            debug!(path = %path.display(), "Loaded config file.");
            toml::from_str::<ClientConfig>(&raw)
                .wrap_err_with(|| format!("Failed to parse config file {}", path.display()))?
        } else {
            ClientConfig::default()
        };

        if let Some(url) = env(ENV_API_URL) {
            config.base_url = url;
        }
        if let Some(prefix) = env(ENV_API_PREFIX) {
            config.api_prefix = prefix;
        }
        if let Some(dir) = env(ENV_DOWNLOAD_DIR) {
            config.download_dir = Some(PathBuf::from(dir));
        }
        if let Some(scan_type) = env(ENV_SCAN_TYPE) {
            config.default_scan_type = scan_type;
        }

        config.validate()?;
        info!(base_url = %config.base_url, prefix = %config.api_prefix, "Client configuration ready.");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.base_url)
            .wrap_err_with(|| format!("Invalid base_url '{}'", self.base_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(eyre!("base_url must be http or https, got '{}'", url.scheme()));
        }
        if self.poll_interval_ms == 0 {
            return Err(eyre!("poll_interval_ms must be greater than zero"));
        }
        if self.health_interval_secs == 0 {
            return Err(eyre!("health_interval_secs must be greater than zero"));
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn health_interval(&self) -> Duration {
        Duration::from_secs(self.health_interval_secs)
    }

    pub fn monitor_settings(&self) -> MonitorSettings {
        MonitorSettings { period: self.poll_interval(), degraded_after: self.degraded_after.max(1) }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn download_dir(&self) -> PathBuf {
        self.download_dir
            .clone()
            .unwrap_or_else(|| logging::get_data_dir().join("downloads"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClientConfig::load_from(&dir.path().join("absent.toml"), no_env).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.poll_interval(), Duration::from_secs(1));
        assert_eq!(config.request_timeout(), None);
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(
            &path,
            "base_url = \"http://localhost:5001\"\napi_prefix = \"\"\npoll_interval_ms = 250\n",
        )
        .unwrap();

        let config = ClientConfig::load_from(&path, no_env).unwrap();
        assert_eq!(config.base_url, "http://localhost:5001");
        assert_eq!(config.api_prefix, "");
        assert_eq!(config.poll_interval_ms, 250);
        assert_eq!(config.health_interval_secs, 30);
    }

    #[test]
    fn environment_wins_over_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "base_url = \"http://from-file:1\"\n").unwrap();

        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_API_URL, "http://from-env:2"),
            (ENV_DOWNLOAD_DIR, "/tmp/reports"),
        ]);
        let config =
            ClientConfig::load_from(&path, |key| env.get(key).map(|v| v.to_string())).unwrap();
        assert_eq!(config.base_url, "http://from-env:2");
        assert_eq!(config.download_dir(), PathBuf::from("/tmp/reports"));
    }

    #[test]
    fn default_scan_type_comes_from_file_or_env() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        assert_eq!(ClientConfig::load_from(&path, no_env).unwrap().default_scan_type, "basico");

        std::fs::write(&path, "default_scan_type = \"vuln\"\n").unwrap();
        assert_eq!(ClientConfig::load_from(&path, no_env).unwrap().default_scan_type, "vuln");

        let config = ClientConfig::load_from(&path, |key| {
            (key == ENV_SCAN_TYPE).then(|| "rapido".to_string())
        })
        .unwrap();
        assert_eq!(config.default_scan_type, "rapido");
    }

    #[test]
    fn invalid_url_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let result = ClientConfig::load_from(&dir.path().join("x.toml"), |key| {
            (key == ENV_API_URL).then(|| "not a url".to_string())
        });
        assert!(result.is_err());

        let ftp = ClientConfig { base_url: "ftp://host".to_string(), ..ClientConfig::default() };
        assert!(ftp.validate().is_err());
    }
}
