use serde::{Deserialize, Serialize};
use std::path::Path;

use super::dns::DnsConfig;
use super::errors::ConfigError;
use super::logging::LoggingConfig;
use super::overrides::OverrideConfig;
use super::server::ServerConfig;
use crate::{InterfaceId, OverrideTable};

const DEFAULT_CONFIG_PATHS: [&str; 2] = ["splitdns.toml", "/etc/splitdns/config.toml"];

/// Main configuration structure for splitdns
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Server configuration (port, extra listen addresses)
    #[serde(default)]
    pub server: ServerConfig,

    /// Upstream forwarding configuration
    #[serde(default)]
    pub dns: DnsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Local answers, matched in this order
    #[serde(default)]
    pub overrides: Vec<OverrideConfig>,
}

impl Config {
    /// Load configuration from file
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. splitdns.toml in current directory
    /// 3. /etc/splitdns/config.toml
    ///
    /// Unlike most settings, there is no usable default: without overrides
    /// there is no interface to listen on, so a missing file is an error.
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::get_config_path() {
                Some(path) => Self::from_file(&path)?,
                None => return Err(ConfigError::NotFound(DEFAULT_CONFIG_PATHS.join(", "))),
            },
        };

        config.apply_cli_overrides(cli_overrides);
        config.normalize_overrides();
        Ok(config)
    }

    /// Load configuration from a specific file
    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply command-line overrides to configuration
    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(port) = overrides.dns_port {
            self.server.dns_port = port;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        if !overrides.upstream_servers.is_empty() {
            self.dns.upstream_servers = overrides.upstream_servers;
        }
    }

    /// Make every override domain fully qualified
    fn normalize_overrides(&mut self) {
        for entry in &mut self.overrides {
            entry.domain = entry.fqdn();
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.dns_port == 0 {
            return Err(ConfigError::Validation("DNS port cannot be 0".to_string()));
        }

        if self.dns.query_timeout == 0 {
            return Err(ConfigError::Validation(
                "query_timeout must be at least 1 second".to_string(),
            ));
        }

        self.dns.parsed_upstreams()?;
        OverrideTable::from_config(&self.overrides)?;

        if self.listen_interfaces()?.is_empty() {
            return Err(ConfigError::Validation(
                "No interfaces to listen on: add overrides or server.listen_addresses".to_string(),
            ));
        }

        Ok(())
    }

    /// Interfaces to bind: every interface named by an override, then the
    /// extra listen addresses, without duplicates.
    pub fn listen_interfaces(&self) -> Result<Vec<InterfaceId>, ConfigError> {
        let mut interfaces = OverrideTable::from_config(&self.overrides)?.interfaces();

        for addr in &self.server.listen_addresses {
            let interface: InterfaceId = addr.parse().map_err(|_| {
                ConfigError::Validation(format!(
                    "Invalid listen address '{}': expected an IP address",
                    addr
                ))
            })?;
            if interface.is_unspecified() {
                return Err(ConfigError::Validation(format!(
                    "Invalid listen address '{}': wildcard addresses cannot identify an interface",
                    addr
                )));
            }
            if !interfaces.contains(&interface) {
                interfaces.push(interface);
            }
        }

        Ok(interfaces)
    }

    /// Get the path to the configuration file being used
    pub fn get_config_path() -> Option<String> {
        DEFAULT_CONFIG_PATHS
            .iter()
            .find(|path| Path::new(path).exists())
            .map(|path| path.to_string())
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub dns_port: Option<u16>,
    pub log_level: Option<String>,
    pub upstream_servers: Vec<String>,
}
