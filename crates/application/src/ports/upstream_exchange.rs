use async_trait::async_trait;
use hickory_proto::rr::Record;
use splitdns_domain::{DomainError, UpstreamAddr};

/// A single question/answer round trip with one upstream resolver.
#[async_trait]
pub trait UpstreamExchange: Send + Sync {
    /// Ask `server` for the A records of `domain` and return the answer
    /// section as received. No retries; the caller bounds the duration.
    async fn exchange(&self, server: &UpstreamAddr, domain: &str)
        -> Result<Vec<Record>, DomainError>;
}
