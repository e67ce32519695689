use splitdns_domain::config::LogFormat;
use splitdns_domain::{CliOverrides, Config};
use std::io;
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

pub fn load_config(path: Option<&str>, cli_overrides: CliOverrides) -> anyhow::Result<Config> {
    let config = Config::load(path, cli_overrides)?;
    config.validate()?;
    Ok(config)
}

/// `RUST_LOG` wins over the configured level when set.
pub fn init_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format {
        LogFormat::Text => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(io::stdout))
            .init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(io::stdout))
            .init(),
    }
}

pub fn log_config_summary(config: &Config) {
    info!(
        port = config.server.dns_port,
        overrides = config.overrides.len(),
        upstreams = config.dns.upstream_servers.len(),
        query_timeout_s = config.dns.query_timeout,
        "Configuration loaded"
    );

    if config.dns.upstream_servers.is_empty() {
        warn!("No upstream servers configured, unmatched queries get empty answers");
    }
}
