//! DNS Message Builder
//!
//! Constructs upstream query messages in wire format using `hickory-proto`.

use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::rr::{Name, RecordType};
use splitdns_domain::DomainError;

/// An encoded upstream query together with what the reply must match
#[derive(Debug, Clone)]
pub struct QueryMessage {
    pub id: u16,
    pub question: Query,
    pub bytes: Vec<u8>,
}

/// Builds DNS query messages in wire format
pub struct MessageBuilder;

impl MessageBuilder {
    /// Build a DNS query message
    ///
    /// Creates a standard recursive query with:
    /// - Random ID for request/response matching
    /// - RD (Recursion Desired) flag set
    /// - Single question section, class IN
    pub fn build_query(domain: &str, record_type: RecordType) -> Result<QueryMessage, DomainError> {
        let name = Name::from_ascii(domain).map_err(|e| {
            DomainError::InvalidDomainName(format!("Invalid domain '{}': {}", domain, e))
        })?;

        let id = fastrand::u16(..);
        let question = Query::query(name, record_type);

        let mut message = Message::new();
        message
            .set_id(id)
            .set_message_type(MessageType::Query)
            .set_op_code(OpCode::Query)
            .set_recursion_desired(true);
        message.add_query(question.clone());

        let bytes = Self::serialize_message(&message)?;
        Ok(QueryMessage {
            id,
            question,
            bytes,
        })
    }

    /// Serialize a Message to wire format bytes
    pub fn serialize_message(message: &Message) -> Result<Vec<u8>, DomainError> {
        message.to_vec().map_err(|e| {
            DomainError::InvalidDnsResponse(format!("Failed to serialize DNS message: {}", e))
        })
    }
}
