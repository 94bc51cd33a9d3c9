// Registry service module
//
// Single consumer task between the transport's event stream and the
// registry; together with the registry's internal lock this serializes
// all membership mutations.

use std::sync::Arc;
use log::{info, warn};
use tokio::sync::mpsc;

use crate::config::{DiscoveryConfig, RegistryConfig};
use crate::registry::PeerRegistry;
use crate::transport::events::TransportEvent;
use crate::transport::PeerTransport;

/// Event pump draining transport events into the registry
pub struct RegistryService {
    /// The registry receiving the events
    registry: Arc<PeerRegistry>,

    /// Inbound transport events
    events: mpsc::Receiver<TransportEvent>,
}

impl RegistryService {
    /// Create a new registry service
    pub fn new(registry: Arc<PeerRegistry>, events: mpsc::Receiver<TransportEvent>) -> Self {
        Self { registry, events }
    }

    /// Run until the transport side of the channel closes
    pub async fn run(mut self) {
        info!("Peer registry service started");

        while let Some(event) = self.events.recv().await {
            self.registry.handle_event(event).await;
        }

        info!("Transport event channel closed, registry service stopping");
    }
}

/// Build the registry, bring up the transport, and spawn the event pump
///
/// Transport start failures are not fatal: the registry stays usable in a
/// degraded mode where peer lists simply stop updating.
pub async fn start(
    transport: Arc<dyn PeerTransport>,
    registry_config: &RegistryConfig,
    discovery_config: &DiscoveryConfig,
    events: mpsc::Receiver<TransportEvent>,
) -> Arc<PeerRegistry> {
    let registry = Arc::new(PeerRegistry::from_config(transport.clone(), registry_config));

    if discovery_config.auto_start_discovery {
        if let Err(e) = transport.start_discovery().await {
            warn!("Running without discovery, peer list will not update: {}", e);
        }
    }

    if discovery_config.auto_start_advertising {
        if let Err(e) = transport.start_advertising().await {
            warn!("Running without advertising, peers cannot find this device: {}", e);
        }
    }

    tokio::spawn(RegistryService::new(registry.clone(), events).run());

    registry
}
