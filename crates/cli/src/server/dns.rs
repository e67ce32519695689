use splitdns_domain::{DomainError, InterfaceId};
use splitdns_infrastructure::dns::DnsServerHandler;
use socket2::{Domain, Protocol, Socket, Type};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::UdpSocket;
use tracing::{debug, error, info};

const RECV_BUFFER_SIZE: usize = 4096;

/// Bind one UDP socket per interface. Any failure aborts startup.
pub fn bind_listeners(interfaces: &[InterfaceId], port: u16) -> anyhow::Result<Vec<UdpSocket>> {
    interfaces
        .iter()
        .map(|interface| {
            let bind_addr = SocketAddr::new(interface.addr(), port);
            let socket = create_udp_socket(bind_addr)
                .map_err(|e| anyhow::anyhow!("Failed to bind DNS listener on {}: {}", bind_addr, e))?;
            info!(bind_address = %bind_addr, "DNS listener bound");
            Ok(socket)
        })
        .collect()
}

/// Serve queries arriving on `socket` until the task is aborted.
///
/// Each datagram is handled on its own task so a slow upstream never blocks
/// other clients.
pub async fn run_udp_listener(socket: Arc<UdpSocket>, handler: Arc<DnsServerHandler>) {
    let mut recv_buf = [0u8; RECV_BUFFER_SIZE];

    loop {
        let (len, client) = match socket.recv_from(&mut recv_buf).await {
            Ok(received) => received,
            Err(e) => {
                error!(error = %e, "UDP recv error");
                continue;
            }
        };

        let local_addr = match socket.local_addr() {
            Ok(addr) => addr,
            Err(e) => {
                let err = DomainError::LocalAddressUnavailable(e.to_string());
                error!(client = %client, error = %err, "Dropping query");
                continue;
            }
        };

        let query: Arc<[u8]> = Arc::from(&recv_buf[..len]);
        let handler = Arc::clone(&handler);
        let socket = Arc::clone(&socket);

        tokio::spawn(async move {
            let Some(response) = handler.handle_raw_udp(&query, client, local_addr).await else {
                return;
            };
            match socket.send_to(&response, client).await {
                Ok(sent) => debug!(client = %client, bytes = sent, "Reply sent"),
                Err(e) => error!(client = %client, error = %e, "Failed to send reply"),
            }
        });
    }
}

fn create_udp_socket(bind_addr: SocketAddr) -> std::io::Result<UdpSocket> {
    let domain = if bind_addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))?;
    if bind_addr.is_ipv6() {
        socket.set_only_v6(true)?;
    }
    socket.bind(&bind_addr.into())?;
    socket.set_nonblocking(true)?;

    let std_socket: std::net::UdpSocket = socket.into();
    UdpSocket::from_std(std_socket)
}
