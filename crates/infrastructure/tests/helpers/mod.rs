#![allow(dead_code)]
mod dns_server_mock;

pub use dns_server_mock::{MockDnsServer, MockMode};

use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::rr::{Name, RecordType};

pub fn build_query(id: u16, domain: &str, record_type: RecordType) -> Vec<u8> {
    let mut message = Message::new();
    message
        .set_id(id)
        .set_message_type(MessageType::Query)
        .set_op_code(OpCode::Query)
        .set_recursion_desired(true);
    message.add_query(Query::query(Name::from_ascii(domain).unwrap(), record_type));
    message.to_vec().unwrap()
}
