use super::message_builder::MessageBuilder;
use super::response_parser::ResponseParser;
use crate::dns::transport::UdpTransport;
use async_trait::async_trait;
use hickory_proto::rr::{Record, RecordType};
use splitdns_application::ports::UpstreamExchange;
use splitdns_domain::{DomainError, UpstreamAddr};
use std::net::SocketAddr;
use tracing::debug;

/// Sends one A query to one upstream server over UDP.
///
/// Hostname upstreams are resolved on every exchange, inside the caller's
/// deadline.
#[derive(Debug, Default)]
pub struct UdpForwarder;

impl UdpForwarder {
    pub fn new() -> Self {
        Self
    }

    async fn resolve(server: &UpstreamAddr) -> Result<SocketAddr, DomainError> {
        if let Some(addr) = server.socket_addr() {
            return Ok(addr);
        }

        let (hostname, port) = server
            .unresolved_parts()
            .ok_or_else(|| DomainError::InvalidUpstream(server.to_string()))?;

        tokio::net::lookup_host((hostname, port))
            .await
            .map_err(|e| {
                DomainError::InvalidUpstream(format!("Cannot resolve {}: {}", hostname, e))
            })?
            .next()
            .ok_or_else(|| {
                DomainError::InvalidUpstream(format!("{} resolved to no addresses", hostname))
            })
    }
}

#[async_trait]
impl UpstreamExchange for UdpForwarder {
    async fn exchange(
        &self,
        server: &UpstreamAddr,
        domain: &str,
    ) -> Result<Vec<Record>, DomainError> {
        let server_addr = Self::resolve(server).await?;
        let query = MessageBuilder::build_query(domain, RecordType::A)?;

        let transport = UdpTransport::new(server_addr);
        let response_bytes = transport.send(&query.bytes, query.id).await?;
        let parsed = ResponseParser::parse(&response_bytes, &query.question)?;

        debug!(
            server = %server_addr,
            domain = %domain,
            rcode = ResponseParser::rcode_to_status(parsed.rcode),
            answers = parsed.answers.len(),
            truncated = parsed.truncated,
            "Upstream exchange complete"
        );

        Ok(parsed.answers)
    }
}
