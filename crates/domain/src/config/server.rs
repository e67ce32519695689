use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_dns_port")]
    pub dns_port: u16,

    /// Interfaces to serve in addition to the ones named by overrides.
    /// Queries arriving there are always forwarded.
    #[serde(default)]
    pub listen_addresses: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            dns_port: default_dns_port(),
            listen_addresses: vec![],
        }
    }
}

fn default_dns_port() -> u16 {
    53
}
