use serde::{Deserialize, Serialize};
use std::net::IpAddr;

use crate::{InterfaceId, OverrideEntry};

use super::errors::ConfigError;

/// One `[[overrides]]` entry as written in the configuration file.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct OverrideConfig {
    pub domain: String,

    pub interface: String,

    pub response_ip: String,
}

impl OverrideConfig {
    pub fn new(
        domain: impl Into<String>,
        interface: impl Into<String>,
        response_ip: impl Into<String>,
    ) -> Self {
        Self {
            domain: domain.into(),
            interface: interface.into(),
            response_ip: response_ip.into(),
        }
    }

    /// Domain with the trailing root label, as it appears in a DNS question.
    pub fn fqdn(&self) -> String {
        let domain = self.domain.trim();
        if domain.ends_with('.') {
            domain.to_string()
        } else {
            format!("{}.", domain)
        }
    }

    pub fn to_entry(&self) -> Result<OverrideEntry, ConfigError> {
        if self.domain.trim().trim_end_matches('.').is_empty() {
            return Err(ConfigError::Validation(
                "Override has an empty domain".to_string(),
            ));
        }

        let interface: InterfaceId = self.interface.parse().map_err(|_| {
            ConfigError::Validation(format!(
                "Override for '{}' has invalid interface '{}': expected an IP address",
                self.domain, self.interface
            ))
        })?;

        if interface.is_unspecified() {
            return Err(ConfigError::Validation(format!(
                "Override for '{}' has wildcard interface '{}': use the interface's own address",
                self.domain, self.interface
            )));
        }

        let response_address: IpAddr = self.response_ip.trim().parse().map_err(|_| {
            ConfigError::Validation(format!(
                "Override for '{}' has invalid response_ip '{}'",
                self.domain, self.response_ip
            ))
        })?;

        Ok(OverrideEntry::new(self.fqdn(), interface, response_address))
    }
}
