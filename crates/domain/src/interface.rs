use crate::DomainError;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

/// Identifier of a local network interface, expressed as the address the
/// listener is bound to.
///
/// The address is stored in canonical form: an IPv4-mapped IPv6 address
/// (`::ffff:10.0.0.1`) collapses to its IPv4 form, so the identifier written
/// in configuration and the one observed on a socket compare equal regardless
/// of how either side spelled it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InterfaceId(IpAddr);

impl InterfaceId {
    pub fn new(addr: IpAddr) -> Self {
        Self(addr.to_canonical())
    }

    /// Interface a datagram arrived on, from the socket's local address.
    pub fn from_local_addr(addr: SocketAddr) -> Self {
        Self::new(addr.ip())
    }

    pub fn addr(&self) -> IpAddr {
        self.0
    }

    pub fn is_unspecified(&self) -> bool {
        self.0.is_unspecified()
    }
}

impl From<IpAddr> for InterfaceId {
    fn from(addr: IpAddr) -> Self {
        Self::new(addr)
    }
}

impl FromStr for InterfaceId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let bare = trimmed
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .unwrap_or(trimmed);

        bare.parse::<IpAddr>()
            .map(Self::new)
            .map_err(|_| DomainError::InvalidIpAddress(format!("'{}' is not an interface address", s)))
    }
}

impl fmt::Display for InterfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
