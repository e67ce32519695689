use crate::DomainError;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::sync::Arc;

pub const DEFAULT_DNS_PORT: u16 = 53;

/// Address of an upstream resolver that may or may not be resolved to an IP.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UpstreamAddr {
    Resolved(SocketAddr),
    Unresolved { hostname: Arc<str>, port: u16 },
}

impl UpstreamAddr {
    pub fn socket_addr(&self) -> Option<SocketAddr> {
        match self {
            UpstreamAddr::Resolved(addr) => Some(*addr),
            UpstreamAddr::Unresolved { .. } => None,
        }
    }

    pub fn port(&self) -> u16 {
        match self {
            UpstreamAddr::Resolved(addr) => addr.port(),
            UpstreamAddr::Unresolved { port, .. } => *port,
        }
    }

    pub fn is_unresolved(&self) -> bool {
        matches!(self, UpstreamAddr::Unresolved { .. })
    }

    /// Returns (hostname, port) if this address is unresolved.
    pub fn unresolved_parts(&self) -> Option<(&str, u16)> {
        match self {
            UpstreamAddr::Unresolved { hostname, port } => Some((hostname, *port)),
            UpstreamAddr::Resolved(_) => None,
        }
    }
}

impl fmt::Display for UpstreamAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpstreamAddr::Resolved(addr) => write!(f, "{}", addr),
            UpstreamAddr::Unresolved { hostname, port } => write!(f, "{}:{}", hostname, port),
        }
    }
}

fn parse_host_port(s: &str) -> Option<(&str, u16)> {
    if s.starts_with('[') {
        let end = s.find(']')?;
        let host = &s[1..end];
        let rest = &s[end + 1..];
        let port_str = rest.strip_prefix(':')?;
        let port = port_str.parse::<u16>().ok()?;
        Some((host, port))
    } else {
        let (host, port_str) = s.rsplit_once(':')?;
        let port = port_str.parse::<u16>().ok()?;
        Some((host, port))
    }
}

fn is_valid_hostname(host: &str) -> bool {
    !host.is_empty()
        && host.len() <= 253
        && host
            .split('.')
            .filter(|label| !label.is_empty())
            .all(|label| {
                label.len() <= 63
                    && label
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
            })
}

impl FromStr for UpstreamAddr {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().strip_prefix("udp://").unwrap_or(s.trim());

        if let Ok(addr) = s.parse::<SocketAddr>() {
            return Ok(UpstreamAddr::Resolved(addr));
        }
        if let Ok(ip) = s.parse::<IpAddr>() {
            return Ok(UpstreamAddr::Resolved(SocketAddr::new(ip, DEFAULT_DNS_PORT)));
        }
        if let Some((host, port)) = parse_host_port(s) {
            if host.parse::<IpAddr>().is_err() && is_valid_hostname(host) {
                return Ok(UpstreamAddr::Unresolved {
                    hostname: host.into(),
                    port,
                });
            }
        }
        Err(DomainError::InvalidUpstream(format!(
            "Invalid upstream address '{}'. Expected IP:PORT, [IPv6]:PORT, HOSTNAME:PORT or IP",
            s
        )))
    }
}
