//! splitdns domain layer
pub mod config;
pub mod dns_request;
pub mod errors;
pub mod interface;
pub mod override_table;
pub mod upstream;

pub use config::{CliOverrides, Config, ConfigError, OverrideConfig};
pub use dns_request::DnsRequest;
pub use errors::DomainError;
pub use interface::InterfaceId;
pub use override_table::{OverrideEntry, OverrideTable, LOCAL_ANSWER_TTL};
pub use upstream::{UpstreamAddr, DEFAULT_DNS_PORT};
