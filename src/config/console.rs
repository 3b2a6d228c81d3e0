// src/config/console.rs
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_CONFIG_PATH: &str = "KCDB_CONSOLE_CONFIG";
pub const ENV_BASE_URL: &str = "KCDB_BASE_URL";
pub const ENV_STATUS_INTERVAL: &str = "KCDB_STATUS_INTERVAL_SECS";
pub const ENV_REQUEST_TIMEOUT: &str = "KCDB_REQUEST_TIMEOUT_SECS";

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";
pub const DEFAULT_TOML_PATH: &str = "config/console.toml";
pub const DEFAULT_JSON_PATH: &str = "config/console.json";

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
fn default_status_interval_secs() -> u64 {
    23
}
fn default_request_timeout_secs() -> u64 {
    10
}
fn default_connect_timeout_secs() -> u64 {
    4
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// Root of the kcdb HTTP API, without trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Period of the ingestion status refresh while the sources page is open.
    #[serde(default = "default_status_interval_secs")]
    pub status_interval_secs: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            status_interval_secs: default_status_interval_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl ConsoleConfig {
    /// Load from an explicit path. Supports TOML or JSON formats.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading console config from {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let cfg = parse_config(&content, ext.as_str())
            .with_context(|| format!("parsing console config {}", path.display()))?;
        Ok(cfg.sanitized())
    }

    /// Load using env var + fallbacks, then apply env overrides:
    /// 1) $KCDB_CONSOLE_CONFIG
    /// 2) config/console.toml
    /// 3) config/console.json
    /// 4) built-in defaults
    pub fn load_default() -> Result<Self> {
        let base = match std::env::var(ENV_CONFIG_PATH) {
            Ok(p) => {
                let pb = PathBuf::from(p);
                if !pb.exists() {
                    return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
                }
                Self::load_from(&pb)?
            }
            Err(_) => {
                let toml_p = PathBuf::from(DEFAULT_TOML_PATH);
                let json_p = PathBuf::from(DEFAULT_JSON_PATH);
                if toml_p.exists() {
                    Self::load_from(&toml_p)?
                } else if json_p.exists() {
                    Self::load_from(&json_p)?
                } else {
                    Self::default()
                }
            }
        };
        Ok(base.with_env_overrides())
    }

    /// `KCDB_BASE_URL` / `KCDB_STATUS_INTERVAL_SECS` / `KCDB_REQUEST_TIMEOUT_SECS`
    /// win over file values. Unparsable numbers are ignored.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(ENV_BASE_URL) {
            if !url.trim().is_empty() {
                self.base_url = url.trim().to_string();
            }
        }
        if let Some(v) = parse_secs_env(std::env::var(ENV_STATUS_INTERVAL).ok()) {
            self.status_interval_secs = v;
        }
        if let Some(v) = parse_secs_env(std::env::var(ENV_REQUEST_TIMEOUT).ok()) {
            self.request_timeout_secs = v;
        }
        self.sanitized()
    }

    fn sanitized(mut self) -> Self {
        self.base_url = self.base_url.trim().trim_end_matches('/').to_string();
        if self.base_url.is_empty() {
            self.base_url = default_base_url();
        }
        if self.status_interval_secs == 0 {
            self.status_interval_secs = default_status_interval_secs();
        }
        if self.request_timeout_secs == 0 {
            self.request_timeout_secs = default_request_timeout_secs();
        }
        if self.connect_timeout_secs == 0 {
            self.connect_timeout_secs = default_connect_timeout_secs();
        }
        self
    }

    pub fn status_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.status_interval_secs)
    }
}

fn parse_secs_env(raw: Option<String>) -> Option<u64> {
    raw.and_then(|s| s.trim().parse::<u64>().ok())
}

fn parse_config(s: &str, hint_ext: &str) -> Result<ConsoleConfig> {
    if hint_ext == "json" {
        return Ok(serde_json::from_str(s)?);
    }
    // TOML first, JSON as a fallback for extensionless files.
    match toml::from_str::<ConsoleConfig>(s) {
        Ok(v) => Ok(v),
        Err(toml_err) => serde_json::from_str(s)
            .map_err(|_| anyhow!("unsupported console config format: {toml_err}")),
    }
}
