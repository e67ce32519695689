//! UDP Transport for DNS queries (RFC 1035 §4.2.1)
//!
//! Messages are sent as-is (no framing). Datagrams whose ID does not match
//! the outstanding query are discarded and the socket keeps listening, so a
//! stray or spoofed packet cannot complete the exchange.
//!
//! The transport itself has no deadline: the caller wraps `send` in a timeout.

use splitdns_domain::DomainError;
use std::io::ErrorKind;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use tokio::net::UdpSocket;
use tracing::{debug, warn};

/// Maximum UDP DNS response size with EDNS(0)
const MAX_UDP_RESPONSE_SIZE: usize = 4096;

/// DNS over UDP transport
pub struct UdpTransport {
    server_addr: SocketAddr,
}

impl UdpTransport {
    pub fn new(server_addr: SocketAddr) -> Self {
        Self { server_addr }
    }

    /// Send a query and return the first reply carrying `query_id`
    pub async fn send(&self, message_bytes: &[u8], query_id: u16) -> Result<Vec<u8>, DomainError> {
        // Bind to ephemeral port (0 = OS assigns)
        let bind_addr = if self.server_addr.is_ipv4() {
            SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))
        } else {
            SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0))
        };

        let socket = UdpSocket::bind(bind_addr)
            .await
            .map_err(|e| DomainError::IoError(format!("Failed to bind UDP socket: {}", e)))?;

        socket
            .connect(self.server_addr)
            .await
            .map_err(|e| self.map_io_error(e))?;

        let bytes_sent = socket
            .send(message_bytes)
            .await
            .map_err(|e| self.map_io_error(e))?;

        debug!(
            server = %self.server_addr,
            bytes_sent = bytes_sent,
            "UDP query sent"
        );

        let mut recv_buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];

        loop {
            let bytes_received = socket
                .recv(&mut recv_buf)
                .await
                .map_err(|e| self.map_io_error(e))?;

            if bytes_received < 2 {
                warn!(server = %self.server_addr, "Ignoring runt UDP response");
                continue;
            }

            let response_id = u16::from_be_bytes([recv_buf[0], recv_buf[1]]);
            if response_id != query_id {
                warn!(
                    server = %self.server_addr,
                    expected = query_id,
                    received = response_id,
                    "Ignoring UDP response with mismatched ID"
                );
                continue;
            }

            recv_buf.truncate(bytes_received);

            debug!(
                server = %self.server_addr,
                bytes_received = bytes_received,
                "UDP response received"
            );

            return Ok(recv_buf);
        }
    }

    fn map_io_error(&self, e: std::io::Error) -> DomainError {
        let server = self.server_addr.to_string();
        match e.kind() {
            ErrorKind::ConnectionRefused => DomainError::TransportConnectionRefused { server },
            ErrorKind::ConnectionReset => DomainError::TransportConnectionReset { server },
            ErrorKind::TimedOut => DomainError::TransportTimeout { server },
            _ => DomainError::IoError(format!("UDP exchange with {} failed: {}", server, e)),
        }
    }
}
