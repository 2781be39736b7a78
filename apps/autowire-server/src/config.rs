//! Layered application configuration:
//! defaults -> YAML file (if given) -> environment (`AUTOWIRE__*`) -> CLI overrides.

use std::net::SocketAddr;
use std::path::Path;

use autowire::DiscoveryConfig;
use autowire_http::HttpConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Yaml},
};
use serde::{Deserialize, Serialize};

/// Environment variable prefix; nested keys are separated by `__`.
pub const ENV_PREFIX: &str = "AUTOWIRE__";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `EnvFilter` directive; `RUST_LOG` takes precedence when set.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: LogFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub server: HttpConfig,
    pub discovery: DiscoveryConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load the layered configuration.
    ///
    /// # Errors
    /// Returns an error if a layer cannot be parsed into `AppConfig`.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        let config = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;
        Ok(config)
    }

    /// Apply `--port` and `-v` on top of the loaded layers.
    ///
    /// # Errors
    /// Returns an error if a port override is given and `server.bind_addr`
    /// is not a socket address.
    pub fn apply_cli_overrides(&mut self, port: Option<u16>, verbose: u8) -> anyhow::Result<()> {
        if let Some(port) = port {
            let mut addr: SocketAddr = self.server.bind_addr.parse().map_err(|e| {
                anyhow::anyhow!("invalid server.bind_addr '{}': {e}", self.server.bind_addr)
            })?;
            addr.set_port(port);
            self.server.bind_addr = addr.to_string();
        }

        let level = match verbose {
            0 => None,
            1 => Some("info"),
            2 => Some("debug"),
            _ => Some("trace"),
        };
        if let Some(level) = level {
            level.clone_into(&mut self.logging.level);
        }
        Ok(())
    }
}
