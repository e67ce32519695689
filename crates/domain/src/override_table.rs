//! Local answers keyed by (domain, interface).
//!
//! The table is built once from configuration and only read afterwards, so it
//! is shared across listener tasks behind a plain `Arc` with no locking.

use crate::config::{ConfigError, OverrideConfig};
use crate::InterfaceId;
use std::collections::HashSet;
use std::net::IpAddr;
use std::sync::Arc;

/// TTL carried by every locally answered record.
pub const LOCAL_ANSWER_TTL: u32 = 300;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideEntry {
    pub domain: Arc<str>,
    pub interface: InterfaceId,
    pub response_address: IpAddr,
}

impl OverrideEntry {
    pub fn new(domain: impl Into<Arc<str>>, interface: InterfaceId, response_address: IpAddr) -> Self {
        Self {
            domain: domain.into(),
            interface,
            response_address,
        }
    }

    pub fn matches(&self, domain: &str, interface: InterfaceId) -> bool {
        self.interface == interface && self.domain.as_ref() == domain
    }
}

#[derive(Debug, Clone, Default)]
pub struct OverrideTable {
    entries: Vec<OverrideEntry>,
}

impl OverrideTable {
    pub fn new(entries: Vec<OverrideEntry>) -> Self {
        Self { entries }
    }

    pub fn from_config(overrides: &[OverrideConfig]) -> Result<Self, ConfigError> {
        let entries = overrides
            .iter()
            .map(OverrideConfig::to_entry)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(entries))
    }

    /// Address of the first entry, in load order, whose domain matches exactly
    /// and whose interface is the one the query arrived on.
    pub fn lookup(&self, domain: &str, interface: InterfaceId) -> Option<IpAddr> {
        self.entries
            .iter()
            .find(|entry| entry.matches(domain, interface))
            .map(|entry| entry.response_address)
    }

    /// Distinct interfaces named by the entries, in load order.
    pub fn interfaces(&self) -> Vec<InterfaceId> {
        let mut seen = HashSet::new();
        self.entries
            .iter()
            .map(|entry| entry.interface)
            .filter(|interface| seen.insert(*interface))
            .collect()
    }

    /// Entries that can never be returned because an earlier entry has the
    /// same (domain, interface) pair.
    pub fn shadowed(&self) -> Vec<&OverrideEntry> {
        let mut seen = HashSet::new();
        self.entries
            .iter()
            .filter(|entry| !seen.insert((Arc::clone(&entry.domain), entry.interface)))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OverrideEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
