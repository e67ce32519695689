use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::UpstreamAddr;

use super::errors::ConfigError;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DnsConfig {
    /// Upstream resolvers, tried in this order.
    #[serde(default = "default_upstream_servers")]
    pub upstream_servers: Vec<String>,

    /// Per-attempt timeout in seconds.
    #[serde(default = "default_query_timeout")]
    pub query_timeout: u64,
}

impl DnsConfig {
    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout)
    }

    pub fn parsed_upstreams(&self) -> Result<Vec<UpstreamAddr>, ConfigError> {
        self.upstream_servers
            .iter()
            .map(|server| {
                server
                    .parse::<UpstreamAddr>()
                    .map_err(|e| ConfigError::Validation(e.to_string()))
            })
            .collect()
    }
}

impl Default for DnsConfig {
    fn default() -> Self {
        Self {
            upstream_servers: default_upstream_servers(),
            query_timeout: default_query_timeout(),
        }
    }
}

fn default_upstream_servers() -> Vec<String> {
    vec!["8.8.8.8:53".to_string(), "1.1.1.1:53".to_string()]
}

fn default_query_timeout() -> u64 {
    3
}
