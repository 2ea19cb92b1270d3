use crate::args::Args;
use crate::granularity::{Granularity, QueryProfiles};
use anyhow::Context;
use axum::Router;
use clap::Parser;
use log::info;
use std::net::SocketAddr;
use std::sync::Arc;

mod args;
mod config;
mod error_code;
mod granularity;
mod logging;
mod model;
mod router;
mod service;
mod traffic;
mod validation;

#[tokio::main(flavor = "multi_thread", worker_threads = 4)]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize the logging system with the specified debug level
    logging::init(args.debug)?;
    log::debug!("debug mode enabled");

    let config = config::load_config(&args.config).context("Failed to load configuration")?;
    info!("Configuration loaded successfully");

    // set vnstat service executable
    service::vnstat_service::set_vnstat_executable(&config.vnstat.executable)?;

    // rule sets are resolved once, a bad declaration stops startup here
    let profiles =
        Arc::new(QueryProfiles::build().context("Failed to build request constraints")?);

    let prefix = &config.server.path_prefix;
    for granularity in Granularity::ALL {
        let constraints = &profiles.get(granularity).constraints;
        info!("Serving {} traffic at {}{}", granularity, prefix, granularity.path());
        log::debug!(
            "{} requests check fields {:?}",
            granularity,
            constraints.fields().collect::<Vec<_>>()
        );
    }

    let app = Router::new().nest(prefix, router::get_router(profiles));

    let listener = tokio::net::TcpListener::bind(config.server.to_socket_addr()?)
        .await
        .context("Failed to bind socket")?;
    info!("Listening on {}", config.server.to_socket_addr()?);

    // server
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .await
        .context("server failed to start")?;

    Ok(())
}
