//! Client configuration.
//!
//! Every field has a default pointing at the public Mojang hosts, so an
//! empty TOML document is a valid configuration. Tests point both base URLs
//! at the mock server.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ApiError;

pub const DEFAULT_API_BASE_URL: &str = "https://api.mojang.com";
pub const DEFAULT_STATUS_BASE_URL: &str = "https://status.mojang.com";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub status_base_url: String,
    pub timeout_seconds: u64,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            status_base_url: DEFAULT_STATUS_BASE_URL.to_string(),
            timeout_seconds: 10,
            user_agent: concat!("mojang-core/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientConfig {
    /// Point both the API and the status host at `base_url`.
    pub fn single_host(base_url: &str) -> Self {
        Self {
            api_base_url: base_url.to_string(),
            status_base_url: base_url.to_string(),
            ..Self::default()
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ApiError> {
        let config: Self =
            toml::from_str(content).map_err(|e| ApiError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config.normalized())
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ApiError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ApiError::Config(format!("reading {}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        self.api_url()?;
        self.status_url()?;
        if self.timeout_seconds == 0 {
            return Err(ApiError::Config(
                "timeout_seconds must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Parsed base URL of the profile API.
    pub fn api_url(&self) -> Result<Url, ApiError> {
        parse_base_url("api_base_url", &self.api_base_url)
    }

    /// Parsed base URL of the status host.
    pub fn status_url(&self) -> Result<Url, ApiError> {
        parse_base_url("status_base_url", &self.status_base_url)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Strip trailing slashes from the base URLs.
    pub(crate) fn normalized(mut self) -> Self {
        self.api_base_url = self.api_base_url.trim_end_matches('/').to_string();
        self.status_base_url = self.status_base_url.trim_end_matches('/').to_string();
        self
    }
}

/// Parse `raw` as an absolute http(s) URL with a host.
fn parse_base_url(field: &str, raw: &str) -> Result<Url, ApiError> {
    let url = Url::parse(raw)
        .map_err(|e| ApiError::Config(format!("{field}: invalid URL {raw:?}: {e}")))?;
    match url.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(ApiError::Config(format!(
                "{field}: unsupported URL scheme {scheme:?}"
            )))
        }
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(ApiError::Config(format!("{field}: URL {raw:?} has no host")));
    }
    Ok(url)
}
