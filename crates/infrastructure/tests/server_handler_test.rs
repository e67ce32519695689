mod helpers;

use helpers::{build_query, MockDnsServer, MockMode};
use hickory_proto::op::{Message, MessageType, OpCode, ResponseCode};
use hickory_proto::rr::{RData, RecordType};
use splitdns_application::services::UpstreamForwarder;
use splitdns_application::use_cases::ResolveQueryUseCase;
use splitdns_domain::{OverrideEntry, OverrideTable, UpstreamAddr};
use splitdns_infrastructure::dns::{DnsServerHandler, UdpForwarder};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};

const TIMEOUT: Duration = Duration::from_millis(300);

fn client() -> SocketAddr {
    "192.168.1.77:40000".parse().unwrap()
}

fn on(interface: &str) -> SocketAddr {
    SocketAddr::new(interface.parse().unwrap(), 53)
}

fn handler(upstreams: Vec<UpstreamAddr>) -> DnsServerHandler {
    let table = OverrideTable::new(vec![OverrideEntry::new(
        "a.example.",
        "10.0.0.1".parse().unwrap(),
        IpAddr::V4(Ipv4Addr::new(192, 168, 1, 5)),
    )]);
    let forwarder = UpstreamForwarder::new(Arc::new(UdpForwarder::new()), TIMEOUT);
    let use_case = ResolveQueryUseCase::new(Arc::new(table), upstreams.into(), forwarder);
    DnsServerHandler::new(Arc::new(use_case))
}

async fn ask(
    handler: &DnsServerHandler,
    id: u16,
    domain: &str,
    interface: &str,
) -> Message {
    let query = build_query(id, domain, RecordType::A);
    let reply = handler
        .handle_raw_udp(&query, client(), on(interface))
        .await
        .expect("query should be answered");
    Message::from_vec(&reply).unwrap()
}

fn assert_correlated(reply: &Message, id: u16, domain: &str) {
    assert_eq!(reply.id(), id);
    assert_eq!(reply.message_type(), MessageType::Response);
    assert_eq!(reply.op_code(), OpCode::Query);
    assert!(reply.recursion_desired());
    assert_eq!(reply.response_code(), ResponseCode::NoError);
    assert_eq!(reply.queries().len(), 1);
    assert_eq!(reply.queries()[0].name().to_ascii(), domain);
}

#[tokio::test]
async fn test_override_on_matching_interface() {
    let upstream = MockDnsServer::start(MockMode::Answer {
        ip: Ipv4Addr::new(93, 184, 216, 34),
        ttl: 42,
    })
    .await
    .unwrap();
    let handler = handler(vec![UpstreamAddr::Resolved(upstream.addr())]);

    let reply = ask(&handler, 0x1001, "a.example.", "10.0.0.1").await;

    assert_correlated(&reply, 0x1001, "a.example.");
    assert_eq!(reply.answers().len(), 1);
    assert_eq!(reply.answers()[0].ttl(), 300);
    assert_eq!(
        reply.answers()[0].data(),
        &RData::A(Ipv4Addr::new(192, 168, 1, 5).into())
    );
    assert_eq!(upstream.query_count(), 0);
}

#[tokio::test]
async fn test_other_interface_gets_upstream_answer_verbatim() {
    let upstream = MockDnsServer::start(MockMode::Answer {
        ip: Ipv4Addr::new(93, 184, 216, 34),
        ttl: 42,
    })
    .await
    .unwrap();
    let handler = handler(vec![UpstreamAddr::Resolved(upstream.addr())]);

    let reply = ask(&handler, 0x1002, "a.example.", "10.0.0.2").await;

    assert_correlated(&reply, 0x1002, "a.example.");
    assert_eq!(reply.answers().len(), 1);
    assert_eq!(reply.answers()[0].ttl(), 42);
    assert_eq!(
        reply.answers()[0].data(),
        &RData::A(Ipv4Addr::new(93, 184, 216, 34).into())
    );
    assert_eq!(upstream.query_count(), 1);
}

#[tokio::test]
async fn test_silent_first_server_second_answers() {
    let silent = MockDnsServer::start(MockMode::Silent).await.unwrap();
    let answering = MockDnsServer::start(MockMode::Answer {
        ip: Ipv4Addr::new(10, 9, 8, 7),
        ttl: 600,
    })
    .await
    .unwrap();
    let handler = handler(vec![
        UpstreamAddr::Resolved(silent.addr()),
        UpstreamAddr::Resolved(answering.addr()),
    ]);

    let reply = ask(&handler, 0x1003, "b.example.", "10.0.0.1").await;

    assert_correlated(&reply, 0x1003, "b.example.");
    assert_eq!(reply.answers().len(), 1);
    assert_eq!(reply.answers()[0].ttl(), 600);
    assert_eq!(silent.query_count(), 1);
    assert_eq!(answering.query_count(), 1);
}

#[tokio::test]
async fn test_all_upstreams_silent_gives_empty_noerror() {
    let first = MockDnsServer::start(MockMode::Silent).await.unwrap();
    let second = MockDnsServer::start(MockMode::Silent).await.unwrap();
    let handler = handler(vec![
        UpstreamAddr::Resolved(first.addr()),
        UpstreamAddr::Resolved(second.addr()),
    ]);

    let start = Instant::now();
    let reply = ask(&handler, 0x1004, "d.example.", "10.0.0.1").await;

    assert_correlated(&reply, 0x1004, "d.example.");
    assert!(reply.answers().is_empty());
    assert!(start.elapsed() < TIMEOUT * 2 + Duration::from_millis(500));
}

#[tokio::test]
async fn test_no_upstreams_gives_empty_noerror() {
    let handler = handler(vec![]);

    let reply = ask(&handler, 0x1005, "e.example.", "10.0.0.9").await;

    assert_correlated(&reply, 0x1005, "e.example.");
    assert!(reply.answers().is_empty());
}

#[tokio::test]
async fn test_query_without_question_gets_formerr() {
    let handler = handler(vec![]);
    let mut query = Message::new();
    query.set_id(0x2001).set_message_type(MessageType::Query);

    let reply = handler
        .handle_raw_udp(&query.to_vec().unwrap(), client(), on("10.0.0.1"))
        .await
        .unwrap();
    let reply = Message::from_vec(&reply).unwrap();

    assert_eq!(reply.id(), 0x2001);
    assert_eq!(reply.response_code(), ResponseCode::FormErr);
    assert!(reply.answers().is_empty());
}

#[tokio::test]
async fn test_malformed_datagram_is_dropped() {
    let handler = handler(vec![]);

    let reply = handler
        .handle_raw_udp(&[0xde, 0xad, 0xbe], client(), on("10.0.0.1"))
        .await;

    assert!(reply.is_none());
}

#[tokio::test]
async fn test_response_messages_are_dropped() {
    let handler = handler(vec![]);
    let mut bytes = build_query(0x3001, "a.example.", RecordType::A);
    bytes[2] |= 0x80;

    let reply = handler.handle_raw_udp(&bytes, client(), on("10.0.0.1")).await;

    assert!(reply.is_none());
}

#[tokio::test]
async fn test_unspecified_local_address_is_dropped() {
    let handler = handler(vec![]);
    let query = build_query(0x4001, "a.example.", RecordType::A);

    let reply = handler
        .handle_raw_udp(&query, client(), on("0.0.0.0"))
        .await;

    assert!(reply.is_none());
}

#[tokio::test]
async fn test_ipv4_mapped_local_address_matches_override() {
    let handler = handler(vec![]);

    let reply = ask(&handler, 0x5001, "a.example.", "::ffff:10.0.0.1").await;

    assert_eq!(reply.answers().len(), 1);
    assert_eq!(reply.answers()[0].ttl(), 300);
}

#[tokio::test]
async fn test_override_domain_match_is_exact() {
    let handler = handler(vec![]);

    let reply = ask(&handler, 0x6001, "www.a.example.", "10.0.0.1").await;

    assert!(reply.answers().is_empty());
}
