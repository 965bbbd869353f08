use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub bind: String,
    pub api_base_url: String,
    pub radio_browser_url: String,
    pub site_url: String,
    pub site_name: String,
    pub catalog_ttl_secs: u64,
    pub session_idle_secs: u64,
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:3000".to_string(),
            api_base_url: "https://lfaftechapi-7nrb.onrender.com/api".to_string(),
            radio_browser_url: "https://api.radio-browser.info".to_string(),
            site_url: "https://turadio.lat".to_string(),
            site_name: "TuRadio.lat".to_string(),
            catalog_ttl_secs: 3600,
            session_idle_secs: 86_400,
            request_timeout_secs: 15,
        }
    }
}

impl AppConfig {
    /// Reads the config file (missing file means defaults), then applies
    /// environment overrides and validates the result.
    pub fn load() -> Result<Self> {
        let mut config = match config_path() {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: PathBuf) -> Result<Self> {
        let bytes = match fs::read(&path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e).with_context(|| format!("Failed to read config: {path:?}")),
        };
        let text = String::from_utf8_lossy(&bytes);
        toml::from_str(&text).with_context(|| format!("Invalid config TOML: {path:?}"))
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| var(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        if let Some(v) = non_empty("TURADIO_API_URL") {
            self.api_base_url = v;
        }
        if let Some(v) = non_empty("TURADIO_BIND") {
            self.bind = v;
        }
        if let Some(v) = non_empty("TURADIO_SITE_URL") {
            self.site_url = v;
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.bind_addr()?;
        for (name, value) in [
            ("api_base_url", &self.api_base_url),
            ("radio_browser_url", &self.radio_browser_url),
            ("site_url", &self.site_url),
        ] {
            Url::parse(value).with_context(|| format!("Invalid {name}: {value}"))?;
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.bind
            .parse()
            .with_context(|| format!("Invalid bind address: {}", self.bind))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn catalog_ttl(&self) -> Duration {
        Duration::from_secs(self.catalog_ttl_secs)
    }

    pub fn session_idle(&self) -> Duration {
        Duration::from_secs(self.session_idle_secs)
    }

    /// Absolute URL on the public site for a local path.
    pub fn absolute(&self, path: &str) -> String {
        format!("{}{path}", self.site_url.trim_end_matches('/'))
    }
}

fn config_path() -> Option<PathBuf> {
    if let Some(explicit) = std::env::var_os("TURADIO_CONFIG") {
        return Some(PathBuf::from(explicit));
    }
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
    Some(base.join("turadio").join("config.toml"))
}
