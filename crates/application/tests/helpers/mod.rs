#![allow(dead_code)]

use async_trait::async_trait;
use hickory_proto::rr::rdata::A;
use hickory_proto::rr::{Name, RData, Record};
use splitdns_application::ports::UpstreamExchange;
use splitdns_domain::{DomainError, UpstreamAddr};
use std::collections::HashMap;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone)]
pub enum MockBehavior {
    Answer(Vec<Record>),
    Empty,
    Fail(DomainError),
    Hang,
}

/// Upstream exchange that replays canned behaviour per server and records
/// every server it was asked to contact.
#[derive(Clone, Default)]
pub struct MockUpstreamExchange {
    behaviors: Arc<Mutex<HashMap<String, MockBehavior>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockUpstreamExchange {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, server: &UpstreamAddr, behavior: MockBehavior) {
        self.behaviors
            .lock()
            .unwrap()
            .insert(server.to_string(), behavior);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl UpstreamExchange for MockUpstreamExchange {
    async fn exchange(
        &self,
        server: &UpstreamAddr,
        _domain: &str,
    ) -> Result<Vec<Record>, DomainError> {
        self.calls.lock().unwrap().push(server.to_string());

        let behavior = self.behaviors.lock().unwrap().get(&server.to_string()).cloned();

        match behavior {
            Some(MockBehavior::Answer(records)) => Ok(records),
            Some(MockBehavior::Empty) => Ok(vec![]),
            Some(MockBehavior::Fail(e)) => Err(e),
            Some(MockBehavior::Hang) => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(vec![])
            }
            None => Err(DomainError::TransportConnectionRefused {
                server: server.to_string(),
            }),
        }
    }
}

pub fn upstream(addr: &str) -> UpstreamAddr {
    addr.parse().unwrap()
}

pub fn a_record(name: &str, ip: [u8; 4], ttl: u32) -> Record {
    Record::from_rdata(
        Name::from_ascii(name).unwrap(),
        ttl,
        RData::A(A(Ipv4Addr::from(ip))),
    )
}

pub fn client() -> SocketAddr {
    "192.168.1.100:40000".parse().unwrap()
}
