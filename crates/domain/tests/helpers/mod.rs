#![allow(dead_code)]
use splitdns_domain::{InterfaceId, OverrideEntry, OverrideTable};
use std::net::IpAddr;

pub fn iface(addr: &str) -> InterfaceId {
    addr.parse().unwrap()
}

pub fn ip(addr: &str) -> IpAddr {
    addr.parse().unwrap()
}

pub struct OverrideTableBuilder {
    entries: Vec<OverrideEntry>,
}

impl OverrideTableBuilder {
    pub fn new() -> Self {
        Self { entries: vec![] }
    }

    pub fn entry(mut self, domain: &str, interface: &str, address: &str) -> Self {
        self.entries
            .push(OverrideEntry::new(domain, iface(interface), ip(address)));
        self
    }

    pub fn build(self) -> OverrideTable {
        OverrideTable::new(self.entries)
    }
}
