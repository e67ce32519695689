use clap::Parser;
use splitdns_domain::CliOverrides;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{error, info};

mod bootstrap;
mod di;
mod server;

#[derive(Parser)]
#[command(name = "splitdns")]
#[command(version)]
#[command(about = "Split-horizon DNS responder: local answers per interface, upstream forwarding otherwise")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// DNS server port
    #[arg(short = 'd', long)]
    dns_port: Option<u16>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Upstream server, tried in the order given (repeatable)
    #[arg(short = 'u', long = "upstream", value_name = "ADDR")]
    upstream: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        dns_port: cli.dns_port,
        log_level: cli.log_level,
        upstream_servers: cli.upstream,
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;

    bootstrap::init_logging(&config);

    info!("Starting splitdns v{}", env!("CARGO_PKG_VERSION"));
    bootstrap::log_config_summary(&config);

    let dns_services = di::DnsServices::new(&config)?;

    // Bind everything before serving anything
    let sockets = server::bind_listeners(&dns_services.interfaces, config.server.dns_port)?;

    let mut listeners = JoinSet::new();
    for socket in sockets {
        let handler = Arc::clone(&dns_services.handler);
        listeners.spawn(server::run_udp_listener(Arc::new(socket), handler));
    }

    info!(listeners = listeners.len(), "DNS server ready");

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                error!(error = %e, "Failed to listen for shutdown signal");
            }
            info!("Shutdown signal received");
        }
        Some(result) = listeners.join_next() => {
            if let Err(e) = result {
                error!(error = %e, "DNS listener task failed");
            }
        }
    }

    listeners.shutdown().await;
    info!("Server shutdown complete");
    Ok(())
}
