//! Reply construction for client queries.
//!
//! Every reply mirrors the query header (ID, opcode, RD), sets QR and RA, and
//! echoes only the first question. Queries carrying an OPT record get one back
//! (RFC 6891 §6.1.1).

use hickory_proto::op::{Edns, Message, MessageType, ResponseCode};
use hickory_proto::rr::Record;
use splitdns_domain::DomainError;
use tracing::warn;

/// Largest reply a client accepts without EDNS(0) (RFC 1035 §4.2.1)
pub const MIN_UDP_PAYLOAD: usize = 512;

/// UDP payload size advertised in our own OPT record
pub const EDNS_PAYLOAD: u16 = 1232;

pub struct ResponseBuilder;

impl ResponseBuilder {
    /// NOERROR reply carrying `answers`
    pub fn reply(query: &Message, answers: Vec<Record>) -> Message {
        let mut reply = Self::header_for(query, ResponseCode::NoError);
        reply.add_answers(answers);
        reply
    }

    pub fn format_error(query: &Message) -> Message {
        Self::header_for(query, ResponseCode::FormErr)
    }

    /// Serialize `reply`, falling back to an empty TC reply when it does not
    /// fit the payload size the client advertised.
    pub fn encode(query: &Message, reply: &Message) -> Result<Vec<u8>, DomainError> {
        let bytes = Self::serialize(reply)?;
        let limit = Self::max_payload(query);

        if bytes.len() <= limit {
            return Ok(bytes);
        }

        warn!(
            size = bytes.len(),
            limit = limit,
            answers = reply.answers().len(),
            "Reply exceeds client payload size, sending truncated"
        );

        let mut truncated = Self::header_for(query, reply.response_code());
        truncated.set_truncated(true);
        Self::serialize(&truncated)
    }

    /// UDP payload size the client can receive
    pub fn max_payload(query: &Message) -> usize {
        query
            .extensions()
            .as_ref()
            .map(|edns| usize::from(edns.max_payload()).max(MIN_UDP_PAYLOAD))
            .unwrap_or(MIN_UDP_PAYLOAD)
    }

    fn header_for(query: &Message, code: ResponseCode) -> Message {
        let mut reply = Message::new();
        reply
            .set_id(query.id())
            .set_message_type(MessageType::Response)
            .set_op_code(query.op_code())
            .set_recursion_desired(query.recursion_desired())
            .set_recursion_available(true)
            .set_response_code(code);

        if let Some(question) = query.queries().first() {
            reply.add_query(question.clone());
        }
        if query.extensions().is_some() {
            let mut edns = Edns::new();
            edns.set_max_payload(EDNS_PAYLOAD);
            reply.set_edns(edns);
        }
        reply
    }

    fn serialize(message: &Message) -> Result<Vec<u8>, DomainError> {
        message.to_vec().map_err(|e| {
            DomainError::InvalidDnsResponse(format!("Failed to serialize reply: {}", e))
        })
    }
}
