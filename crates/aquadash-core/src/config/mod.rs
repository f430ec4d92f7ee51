mod poller;
mod upstream;

pub use poller::{OverlapPolicy, PollerConfig};
pub use upstream::{UpstreamConfig, STATS_PATH};

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::error::{DashError, Result};

/// Default config file name.
pub const DEFAULT_CONFIG_FILE: &str = "aquadash.toml";

/// Root configuration for the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DashConfig {
    /// Status endpoint configuration.
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// Poll loop configuration.
    #[serde(default)]
    pub poller: PollerConfig,

    /// Served page configuration.
    #[serde(default)]
    pub frontend: FrontendConfig,
}

impl DashConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| DashError::Config(format!("Failed to read config file: {}", e)))?;

        let config = Self::parse_toml(&content)?;
        tracing::debug!(path = %path.as_ref().display(), "Loaded configuration");
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let content = substitute_env_vars(content);

        let config: Self = toml::from_str(&content)
            .map_err(|e| DashError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to TOML, as written by `aquadash init`.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| DashError::Serialization(format!("Failed to encode config: {}", e)))
    }

    /// Check values serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.poller.interval_ms == 0 {
            return Err(DashError::Config(
                "poller.interval_ms must be greater than zero".to_string(),
            ));
        }

        if self.upstream.request_timeout_ms == 0 {
            return Err(DashError::Config(
                "upstream.request_timeout_ms must be greater than zero".to_string(),
            ));
        }

        let url = &self.upstream.url;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(DashError::Config(format!(
                "upstream.url must be an http(s) URL, got '{}'",
                url
            )));
        }

        self.frontend.listen_addr()?;
        Ok(())
    }
}

/// Configuration of the served page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrontendConfig {
    /// Address the dashboard listens on.
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Template source file. The embedded template is used when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_path: Option<PathBuf>,

    /// Page title.
    #[serde(default = "default_title")]
    pub title: String,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            template_path: None,
            title: default_title(),
        }
    }
}

impl FrontendConfig {
    /// Parsed listen address.
    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|e| {
            DashError::Config(format!(
                "frontend.listen '{}' is not a socket address: {}",
                self.listen, e
            ))
        })
    }
}

fn default_listen() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_title() -> String {
    "Aquachain Proxy".to_string()
}

/// Substitute environment variables in the format ${VAR_NAME}.
fn substitute_env_vars(content: &str) -> String {
    let Ok(re) = regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}") else {
        return content.to_string();
    };

    let mut result = content.to_string();
    for cap in re.captures_iter(content) {
        let var_name = &cap[1];
        match std::env::var(var_name) {
            Ok(value) => result = result.replace(&cap[0], &value),
            Err(_) => tracing::warn!(var = var_name, "Config references unset environment variable"),
        }
    }

    result
}
