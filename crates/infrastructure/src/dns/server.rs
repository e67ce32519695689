use crate::dns::response_builder::ResponseBuilder;
use hickory_proto::op::{Message, MessageType};
use splitdns_application::use_cases::ResolveQueryUseCase;
use splitdns_domain::{DnsRequest, DomainError, InterfaceId};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Turns one raw client datagram into reply bytes.
///
/// Returns `None` when the datagram must be dropped without a reply.
pub struct DnsServerHandler {
    use_case: Arc<ResolveQueryUseCase>,
}

impl DnsServerHandler {
    pub fn new(use_case: Arc<ResolveQueryUseCase>) -> Self {
        Self { use_case }
    }

    pub async fn handle_raw_udp(
        &self,
        query_buf: &[u8],
        client: SocketAddr,
        local_addr: SocketAddr,
    ) -> Option<Vec<u8>> {
        let start = Instant::now();

        let query = match Message::from_vec(query_buf) {
            Ok(message) => message,
            Err(e) => {
                debug!(client = %client, error = %e, "Dropping unparseable datagram");
                return None;
            }
        };

        if query.message_type() != MessageType::Query {
            debug!(client = %client, id = query.id(), "Dropping non-query message");
            return None;
        }

        let Some(question) = query.queries().first() else {
            warn!(client = %client, id = query.id(), "Query without question, replying FORMERR");
            return self.encode(&query, &ResponseBuilder::format_error(&query));
        };

        let interface = InterfaceId::from_local_addr(local_addr);
        if interface.is_unspecified() {
            let err = DomainError::LocalAddressUnavailable(local_addr.to_string());
            error!(client = %client, error = %err, "Dropping query");
            return None;
        }

        let domain = question.name().to_ascii();
        info!(
            domain = %domain,
            record_type = ?question.query_type(),
            client = %client,
            interface = %interface,
            "DNS query received"
        );

        let request = DnsRequest::new(domain, interface, client);
        let resolution = self.use_case.execute(&request).await;

        debug!(
            domain = %request.domain,
            outcome = resolution.outcome.as_str(),
            answers = resolution.answers.len(),
            upstream = ?resolution.upstream_server,
            elapsed_us = start.elapsed().as_micros() as u64,
            "Sending response"
        );

        let reply = ResponseBuilder::reply(&query, resolution.answers);
        self.encode(&query, &reply)
    }

    fn encode(&self, query: &Message, reply: &Message) -> Option<Vec<u8>> {
        match ResponseBuilder::encode(query, reply) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                error!(id = query.id(), error = %e, "Failed to encode reply");
                None
            }
        }
    }
}
