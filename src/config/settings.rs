//! Settings structures for Vinted-RS configuration

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Prefix shared by every environment variable the client reads
pub const ENV_PREFIX: &str = "VINTED_API_";

/// Main settings structure, loadable from `settings.yml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub outgoing: OutgoingSettings,
    pub vinted: VintedSettings,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = serde_yaml::from_str(&content)?;
        Ok(settings)
    }

    /// Merge with environment variables (VINTED_API_* prefix)
    pub fn merge_env(&mut self) {
        self.merge_vars(std::env::vars());
    }

    fn merge_vars<I>(&mut self, vars: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, val) in vars {
            let Some(name) = key.strip_prefix(ENV_PREFIX) else {
                continue;
            };

            if name == "HTTPS_PROXY" {
                self.outgoing.proxies.https = Some(val);
            } else if let Some(domain) = name.strip_suffix("_COOKIE") {
                if !domain.is_empty() && !val.is_empty() {
                    let domain = domain.to_lowercase().replace('_', ".");
                    self.vinted.cookies.insert(domain, val);
                }
            }
        }
    }
}

/// Outgoing request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutgoingSettings {
    /// Per-request timeout in seconds
    pub request_timeout: f64,
    /// Pool max size
    pub pool_maxsize: usize,
    /// Verify SSL certificates
    pub verify_ssl: bool,
    /// Proxy settings
    pub proxies: ProxySettings,
}

impl Default for OutgoingSettings {
    fn default() -> Self {
        Self {
            request_timeout: 10.0,
            pool_maxsize: 20,
            verify_ssl: true,
            proxies: ProxySettings::default(),
        }
    }
}

/// Proxy settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxySettings {
    pub http: Option<String>,
    pub https: Option<String>,
    pub all: Option<String>,
}

/// Marketplace and session settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VintedSettings {
    /// Site root; `{domain}` is replaced by the region code
    pub base_url: String,
    /// Cookie carrying the session token
    pub session_cookie_name: String,
    /// Seconds a session cookie stays usable (none = until rejected)
    pub session_ttl: Option<u64>,
    /// Pre-provisioned session tokens by region domain
    pub cookies: HashMap<String, String>,
}

impl Default for VintedSettings {
    fn default() -> Self {
        Self {
            base_url: "https://www.vinted.{domain}".to_string(),
            session_cookie_name: "_vinted_fr_session".to_string(),
            session_ttl: Some(60),
            cookies: HashMap::new(),
        }
    }
}

impl VintedSettings {
    /// Site root for a region domain, without trailing slash
    pub fn base_url_for(&self, domain: &str) -> String {
        self.base_url
            .replace("{domain}", domain)
            .trim_end_matches('/')
            .to_string()
    }

    /// Pre-provisioned session token for a domain
    pub fn preset_cookie(&self, domain: &str) -> Option<&str> {
        self.cookies.get(domain).map(String::as_str)
    }
}
