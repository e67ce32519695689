use crate::ports::UpstreamExchange;
use hickory_proto::rr::Record;
use splitdns_domain::{DomainError, UpstreamAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Result of one bounded attempt against one upstream server.
#[derive(Debug, Clone)]
pub enum AttemptOutcome {
    Answered(Vec<Record>),
    Empty,
    Failed(DomainError),
}

/// First non-empty answer of a forwarding pass.
#[derive(Debug, Clone)]
pub struct UpstreamAnswer {
    pub records: Vec<Record>,
    pub server: UpstreamAddr,
    /// 1-based position of the answering server in the list.
    pub attempts: usize,
}

/// Walks the upstream list once, in order, and stops at the first server that
/// returns at least one answer record.
///
/// Every attempt is bounded by `attempt_timeout`; there is no overall
/// deadline, so a full pass takes at most `servers.len() * attempt_timeout`.
/// Failed and empty attempts only advance the walk; the caller sees
/// `DomainError::NoAnswerAvailable` once the list is exhausted.
pub struct UpstreamForwarder {
    exchange: Arc<dyn UpstreamExchange>,
    attempt_timeout: Duration,
}

impl UpstreamForwarder {
    pub fn new(exchange: Arc<dyn UpstreamExchange>, attempt_timeout: Duration) -> Self {
        Self {
            exchange,
            attempt_timeout,
        }
    }

    pub fn attempt_timeout(&self) -> Duration {
        self.attempt_timeout
    }

    pub async fn attempt(&self, server: &UpstreamAddr, domain: &str) -> AttemptOutcome {
        match tokio::time::timeout(self.attempt_timeout, self.exchange.exchange(server, domain))
            .await
        {
            Err(_) => AttemptOutcome::Failed(DomainError::TransportTimeout {
                server: server.to_string(),
            }),
            Ok(Err(e)) => AttemptOutcome::Failed(e),
            Ok(Ok(records)) if records.is_empty() => AttemptOutcome::Empty,
            Ok(Ok(records)) => AttemptOutcome::Answered(records),
        }
    }

    pub async fn forward(
        &self,
        domain: &str,
        servers: &[UpstreamAddr],
    ) -> Result<UpstreamAnswer, DomainError> {
        if servers.is_empty() {
            debug!(domain = %domain, "No upstream servers configured");
            return Err(DomainError::NoAnswerAvailable);
        }
        debug!(strategy = "failover", servers = servers.len(), domain = %domain, "Trying sequentially");

        for (index, server) in servers.iter().enumerate() {
            let start = Instant::now();
            match self.attempt(server, domain).await {
                AttemptOutcome::Answered(records) => {
                    debug!(
                        server = %server,
                        answers = records.len(),
                        latency_ms = start.elapsed().as_millis() as u64,
                        position = index,
                        "Server responded"
                    );
                    return Ok(UpstreamAnswer {
                        records,
                        server: server.clone(),
                        attempts: index + 1,
                    });
                }
                AttemptOutcome::Empty => {
                    debug!(server = %server, position = index, domain = %domain, "Empty answer, trying next server");
                }
                AttemptOutcome::Failed(e) => {
                    warn!(server = %server, error = %e, position = index, "Failing over");
                }
            }
        }

        Err(DomainError::NoAnswerAvailable)
    }
}
