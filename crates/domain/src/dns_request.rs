use super::InterfaceId;
use std::net::SocketAddr;
use std::sync::Arc;

/// A single question as seen by the resolver: the queried name and the local
/// interface the datagram arrived on.
#[derive(Debug, Clone)]
pub struct DnsRequest {
    pub domain: Arc<str>,
    pub interface: InterfaceId,
    pub client: SocketAddr,
}

impl DnsRequest {
    pub fn new(domain: impl Into<Arc<str>>, interface: InterfaceId, client: SocketAddr) -> Self {
        Self {
            domain: domain.into(),
            interface,
            client,
        }
    }
}
