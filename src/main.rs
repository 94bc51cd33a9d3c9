use std::sync::Arc;
use std::time::Duration;
use structopt::StructOpt;
use tokio::sync::mpsc;
use log::info;

use nearlink::init_logger;
use nearlink::config::Config;
use nearlink::registry::PeerIdentity;
use nearlink::service;
use nearlink::transport::simulated::SimulatedTransport;
use nearlink::transport::PeerTransport;

#[derive(Debug, StructOpt)]
#[structopt(name = "nearlink", about = "Ad-hoc local-network peer connectivity demo node")]
struct Opt {
    /// Path to the configuration file
    #[structopt(short, long, default_value = "nearlink.toml")]
    config: String,

    /// Override the display name from the config file
    #[structopt(long)]
    display_name: Option<String>,
}

#[tokio::main]
async fn main() {
    // Initialize logger
    init_logger();

    let opt = Opt::from_args();

    info!("Starting Nearlink node...");

    // Load configuration, generating a default file on first run
    Config::generate_default(&opt.config).expect("Failed to generate default config");
    let mut config = Config::load(&opt.config).expect("Failed to load config");

    if let Some(display_name) = opt.display_name {
        config.node.display_name = display_name;
    }

    info!(
        "Node '{}' on service type '{}'",
        config.node.display_name, config.discovery.service_type
    );

    // Wire the simulated transport with a couple of scripted neighbors
    let (event_tx, event_rx) = mpsc::channel(100);
    let transport = Arc::new(SimulatedTransport::new(event_tx));
    transport
        .add_nearby_peer(PeerIdentity::new("sim-1", "Living Room TV"))
        .await;
    transport
        .add_nearby_peer(PeerIdentity::new("sim-2", "Kitchen iPad"))
        .await;

    // Start the registry service
    let registry = service::start(
        transport.clone(),
        &config.registry,
        &config.discovery,
        event_rx,
    )
    .await;

    info!("Nearlink node started successfully");

    // Report membership until ctrl-c
    let reporter = registry.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(5));
        loop {
            interval.tick().await;
            info!(
                "{} peer(s) discovered, {} connected",
                reporter.discovered_count().await,
                reporter.connected_count().await
            );
        }
    });

    tokio::signal::ctrl_c().await.expect("Failed to listen for ctrl-c");
    info!("Shutting down Nearlink node...");
    transport.stop_discovery().await;
    transport.stop_advertising().await;
}
