use hickory_proto::op::{Message, MessageType, Query, ResponseCode};
use hickory_proto::rr::Record;
use splitdns_domain::DomainError;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct DnsResponse {
    pub rcode: ResponseCode,

    pub truncated: bool,

    /// Answer section exactly as received, every record type included
    pub answers: Vec<Record>,
}

pub struct ResponseParser;

impl ResponseParser {
    /// Parse an upstream reply to `question`.
    ///
    /// The reply must be a response and must echo the question that was
    /// asked; a matching ID alone is not enough.
    pub fn parse(response_bytes: &[u8], question: &Query) -> Result<DnsResponse, DomainError> {
        let message = Message::from_vec(response_bytes).map_err(|e| {
            DomainError::InvalidDnsResponse(format!("Failed to parse DNS response: {}", e))
        })?;

        if message.message_type() != MessageType::Response {
            return Err(DomainError::InvalidDnsResponse(
                "Upstream message is not a response".to_string(),
            ));
        }

        match message.queries().first() {
            Some(echoed) if echoed == question => {}
            echoed => {
                return Err(DomainError::InvalidDnsResponse(format!(
                    "Response question {:?} does not match query for {} {}",
                    echoed.map(|q| q.name().to_ascii()),
                    question.name(),
                    question.query_type()
                )));
            }
        }

        let rcode = message.response_code();
        let truncated = message.truncated();

        debug!(
            rcode = ?rcode,
            answers = message.answers().len(),
            truncated = truncated,
            "DNS response parsed"
        );

        Ok(DnsResponse {
            rcode,
            truncated,
            answers: message.answers().to_vec(),
        })
    }

    pub fn rcode_to_status(rcode: ResponseCode) -> &'static str {
        match rcode {
            ResponseCode::NoError => "NOERROR",
            ResponseCode::NXDomain => "NXDOMAIN",
            ResponseCode::ServFail => "SERVFAIL",
            ResponseCode::Refused => "REFUSED",
            ResponseCode::NotImp => "NOTIMP",
            ResponseCode::FormErr => "FORMERR",
            _ => "UNKNOWN",
        }
    }
}
