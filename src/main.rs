use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use vitals::access::IpAccessGate;
use vitals::config::{build_registry, Config, LoggingConfig};
use vitals::health::Aggregator;
use vitals::probe::ProbeRegistry;
use vitals::server::{HealthEndpoint, Server};

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = Config::from_env()?;

    init_logging(&config.logging);

    info!("Starting vitals {}...", vitals::PKG_VERSION);
    config.log_summary();

    // Fail fast: a malformed allow-list entry or probe registration must
    // abort startup, never surface at request time.
    let gate = IpAccessGate::parse(&config.access.allow)?;
    let registry = build_registry(&config.probes)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async_main(config, gate, registry))
}

fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_new(&config.filter).unwrap_or_else(|_| EnvFilter::new("vitals=info"));

    if config.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn async_main(
    config: Config,
    gate: IpAccessGate,
    registry: ProbeRegistry,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let aggregator =
        Aggregator::new().with_overall_timeout(config.server.overall_timeout.as_duration());

    let endpoint = HealthEndpoint::new(
        config.server.route_prefix.clone(),
        gate,
        Arc::new(registry),
        aggregator,
    );

    let server = Server::bind(
        config.server.listen_addr,
        endpoint,
        config.server.trust_forwarded,
    )
    .await?;

    // Handle shutdown gracefully
    tokio::select! {
        result = server.run() => {
            if let Err(e) = result {
                eprintln!("Server error: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutting down...");
        }
    }

    Ok(())
}
