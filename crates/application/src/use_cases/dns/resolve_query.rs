use crate::services::UpstreamForwarder;
use hickory_proto::rr::rdata::{A, AAAA};
use hickory_proto::rr::{Name, RData, Record};
use splitdns_domain::{DnsRequest, DomainError, OverrideTable, UpstreamAddr, LOCAL_ANSWER_TTL};
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionOutcome {
    LocalAnswer,
    ForwardedAnswer,
    NoAnswer,
}

impl ResolutionOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LocalAnswer => "LOCAL_ANSWER",
            Self::ForwardedAnswer => "FORWARDED_ANSWER",
            Self::NoAnswer => "NO_ANSWER",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Resolution {
    pub outcome: ResolutionOutcome,
    pub answers: Vec<Record>,
    pub upstream_server: Option<String>,
}

impl Resolution {
    fn no_answer() -> Self {
        Self {
            outcome: ResolutionOutcome::NoAnswer,
            answers: vec![],
            upstream_server: None,
        }
    }
}

/// Decides, per query, between the local override table and the upstream
/// servers.
///
/// Holds only the immutable configuration snapshot, so one instance is shared
/// by every listener and every in-flight query.
pub struct ResolveQueryUseCase {
    overrides: Arc<OverrideTable>,
    upstreams: Arc<[UpstreamAddr]>,
    forwarder: UpstreamForwarder,
}

impl ResolveQueryUseCase {
    pub fn new(
        overrides: Arc<OverrideTable>,
        upstreams: Arc<[UpstreamAddr]>,
        forwarder: UpstreamForwarder,
    ) -> Self {
        Self {
            overrides,
            upstreams,
            forwarder,
        }
    }

    /// Never fails: a query the engine cannot answer gets an empty answer set.
    pub async fn execute(&self, request: &DnsRequest) -> Resolution {
        let start = Instant::now();

        if let Some(address) = self.overrides.lookup(&request.domain, request.interface) {
            match local_record(&request.domain, address) {
                Ok(record) => {
                    info!(
                        domain = %request.domain,
                        interface = %request.interface,
                        client = %request.client,
                        address = %address,
                        "Answering from local override"
                    );
                    return Resolution {
                        outcome: ResolutionOutcome::LocalAnswer,
                        answers: vec![record],
                        upstream_server: None,
                    };
                }
                Err(e) => {
                    warn!(domain = %request.domain, error = %e, "Cannot build local answer");
                    return Resolution::no_answer();
                }
            }
        }

        info!(
            domain = %request.domain,
            interface = %request.interface,
            client = %request.client,
            "No local override, querying upstream servers"
        );

        match self.forwarder.forward(&request.domain, &self.upstreams).await {
            Ok(answer) => {
                info!(
                    domain = %request.domain,
                    server = %answer.server,
                    answers = answer.records.len(),
                    attempts = answer.attempts,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Upstream answer obtained"
                );
                Resolution {
                    outcome: ResolutionOutcome::ForwardedAnswer,
                    answers: answer.records,
                    upstream_server: Some(answer.server.to_string()),
                }
            }
            Err(e) => {
                warn!(
                    domain = %request.domain,
                    error = %e,
                    servers = self.upstreams.len(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Failed to get upstream answer"
                );
                Resolution::no_answer()
            }
        }
    }
}

fn local_record(domain: &str, address: IpAddr) -> Result<Record, DomainError> {
    let name = Name::from_ascii(domain)
        .map_err(|e| DomainError::InvalidDomainName(format!("{}: {}", domain, e)))?;
    let rdata = match address {
        IpAddr::V4(ipv4) => RData::A(A(ipv4)),
        IpAddr::V6(ipv6) => RData::AAAA(AAAA(ipv6)),
    };
    Ok(Record::from_rdata(name, LOCAL_ANSWER_TTL, rdata))
}
