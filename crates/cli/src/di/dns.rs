use splitdns_application::services::UpstreamForwarder;
use splitdns_application::use_cases::ResolveQueryUseCase;
use splitdns_domain::{Config, InterfaceId, OverrideTable, UpstreamAddr};
use splitdns_infrastructure::dns::{DnsServerHandler, UdpForwarder};
use std::sync::Arc;
use tracing::{info, warn};

/// Everything the listeners share, built once from the validated config.
pub struct DnsServices {
    pub handler: Arc<DnsServerHandler>,
    pub interfaces: Vec<InterfaceId>,
}

impl DnsServices {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let overrides = Arc::new(OverrideTable::from_config(&config.overrides)?);
        Self::warn_shadowed(&overrides);

        let upstreams: Arc<[UpstreamAddr]> = config.dns.parsed_upstreams()?.into();
        let forwarder =
            UpstreamForwarder::new(Arc::new(UdpForwarder::new()), config.dns.query_timeout());

        info!(
            overrides = overrides.len(),
            upstreams = upstreams.len(),
            attempt_timeout_ms = forwarder.attempt_timeout().as_millis() as u64,
            "Initializing DNS services"
        );

        let use_case = ResolveQueryUseCase::new(overrides, upstreams, forwarder);

        Ok(Self {
            handler: Arc::new(DnsServerHandler::new(Arc::new(use_case))),
            interfaces: config.listen_interfaces()?,
        })
    }

    fn warn_shadowed(overrides: &OverrideTable) {
        for entry in overrides.shadowed() {
            warn!(
                domain = %entry.domain,
                interface = %entry.interface,
                address = %entry.response_address,
                "Override is shadowed by an earlier entry and will never match"
            );
        }
    }
}
