//! In-process loopback transport
//!
//! Stands in for a real discovery/session transport: a scripted
//! neighborhood of peers, invites answered with Connecting -> Connected
//! transitions, and invitation delivery with a patience timeout. Used by
//! the demo binary and by tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use log::{debug, error, info, warn};
use tokio::sync::{mpsc, Mutex, RwLock};

use crate::registry::identity::PeerIdentity;
use crate::registry::state::ConnectionState;
use crate::transport::events::{InvitationResponder, TransportEvent};
use crate::transport::{InviteError, PeerTransport, TransportError};

/// Simulated peer transport
pub struct SimulatedTransport {
    /// Event channel into the registry service
    events: mpsc::Sender<TransportEvent>,

    /// Scripted nearby peers, by identifier
    neighborhood: RwLock<HashMap<String, PeerIdentity>>,

    /// Every invite issued through this transport, in order
    invites: Mutex<Vec<PeerIdentity>>,

    /// Whether discovery is running
    discovering: AtomicBool,

    /// Whether advertising is running
    advertising: AtomicBool,

    /// When false, start_discovery fails (simulated platform outage)
    discovery_available: bool,

    /// Whether scripted peers accept invites
    accept_invites: bool,
}

impl SimulatedTransport {
    /// Create a transport emitting events on the given channel
    pub fn new(events: mpsc::Sender<TransportEvent>) -> Self {
        Self {
            events,
            neighborhood: RwLock::new(HashMap::new()),
            invites: Mutex::new(Vec::new()),
            discovering: AtomicBool::new(false),
            advertising: AtomicBool::new(false),
            discovery_available: true,
            accept_invites: true,
        }
    }

    /// Make start_discovery fail
    pub fn with_discovery_unavailable(mut self) -> Self {
        self.discovery_available = false;
        self
    }

    /// Make scripted peers decline invites
    pub fn with_invites_declined(mut self) -> Self {
        self.accept_invites = false;
        self
    }

    /// Add a peer to the neighborhood, announcing it if discovery runs
    pub async fn add_nearby_peer(&self, peer: PeerIdentity) {
        self.neighborhood
            .write()
            .await
            .insert(peer.id().to_string(), peer.clone());

        if self.discovering.load(Ordering::SeqCst) {
            self.emit(TransportEvent::PeerFound(peer)).await;
        }
    }

    /// Remove a peer from the neighborhood, announcing the loss if
    /// discovery runs
    pub async fn drop_nearby_peer(&self, peer: &PeerIdentity) {
        self.neighborhood.write().await.remove(peer.id());

        if self.discovering.load(Ordering::SeqCst) {
            self.emit(TransportEvent::PeerLost(peer.clone())).await;
        }
    }

    /// Report a peer's session coming up
    pub async fn establish_session(&self, peer: &PeerIdentity) {
        self.emit(TransportEvent::StateChanged(
            peer.clone(),
            ConnectionState::Connecting,
        ))
        .await;
        self.emit(TransportEvent::StateChanged(
            peer.clone(),
            ConnectionState::Connected,
        ))
        .await;
    }

    /// Report a peer's session going down
    pub async fn disconnect(&self, peer: &PeerIdentity) {
        self.emit(TransportEvent::StateChanged(
            peer.clone(),
            ConnectionState::NotConnected,
        ))
        .await;
    }

    /// Re-announce the whole neighborhood
    ///
    /// Mirrors the redelivery observed on real platforms when the host
    /// app returns to the foreground.
    pub async fn reannounce(&self) {
        let peers: Vec<PeerIdentity> = self.neighborhood.read().await.values().cloned().collect();
        for peer in peers {
            self.emit(TransportEvent::PeerFound(peer)).await;
        }
    }

    /// Deliver an invitation from `from` and wait for the decision
    ///
    /// A responder dropped without a reply is a protocol violation on the
    /// registry side: implicit reject, logged, fatal in debug builds.
    pub async fn deliver_invitation(&self, from: &PeerIdentity, patience: Duration) -> bool {
        let (responder, decision) = InvitationResponder::new();
        self.emit(TransportEvent::InvitationReceived(from.clone(), responder))
            .await;

        match tokio::time::timeout(patience, decision).await {
            Ok(Ok(accept)) => accept,
            Ok(Err(_)) => {
                error!("Invitation responder for {} was dropped without a reply", from);
                debug_assert!(false, "invitation responder dropped without a reply");
                false
            }
            Err(_) => {
                warn!(
                    "No reply to invitation from {} within {:?}, treating as rejected",
                    from, patience
                );
                false
            }
        }
    }

    /// Invites issued so far, in order
    pub async fn issued_invites(&self) -> Vec<PeerIdentity> {
        self.invites.lock().await.clone()
    }

    async fn emit(&self, event: TransportEvent) {
        if self.events.send(event).await.is_err() {
            debug!("Transport event dropped: registry service is gone");
        }
    }
}

#[async_trait::async_trait]
impl PeerTransport for SimulatedTransport {
    async fn start_discovery(&self) -> Result<(), TransportError> {
        if !self.discovery_available {
            return Err(TransportError::DiscoveryStart(
                "simulated discovery outage".to_string(),
            ));
        }

        self.discovering.store(true, Ordering::SeqCst);
        info!("Simulated discovery started");

        // Everything already nearby is announced immediately
        self.reannounce().await;
        Ok(())
    }

    async fn stop_discovery(&self) {
        self.discovering.store(false, Ordering::SeqCst);
        debug!("Simulated discovery stopped");
    }

    async fn start_advertising(&self) -> Result<(), TransportError> {
        self.advertising.store(true, Ordering::SeqCst);
        info!("Simulated advertising started");
        Ok(())
    }

    async fn stop_advertising(&self) {
        self.advertising.store(false, Ordering::SeqCst);
        debug!("Simulated advertising stopped");
    }

    async fn invite(&self, peer: &PeerIdentity, timeout: Duration) -> Result<(), InviteError> {
        self.invites.lock().await.push(peer.clone());

        let nearby = self.neighborhood.read().await.contains_key(peer.id());
        if !nearby {
            // Nobody there to answer
            tokio::time::sleep(timeout).await;
            return Err(InviteError::TimedOut(
                peer.display_name().to_string(),
                timeout,
            ));
        }

        if !self.accept_invites {
            return Err(InviteError::Declined(peer.display_name().to_string()));
        }

        self.emit(TransportEvent::StateChanged(
            peer.clone(),
            ConnectionState::Connecting,
        ))
        .await;
        self.emit(TransportEvent::StateChanged(
            peer.clone(),
            ConnectionState::Connected,
        ))
        .await;
        Ok(())
    }

    async fn respond_to_invitation(&self, peer: &PeerIdentity, accept: bool) {
        info!(
            "Invitation from {} {}",
            peer,
            if accept { "accepted" } else { "rejected" }
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peer(id: &str, name: &str) -> PeerIdentity {
        PeerIdentity::new(id, name)
    }

    #[tokio::test]
    async fn discovery_announces_the_neighborhood() {
        let (tx, mut rx) = mpsc::channel(100);
        let transport = SimulatedTransport::new(tx);

        transport.add_nearby_peer(peer("a", "Peer A")).await;
        transport.start_discovery().await.unwrap();

        match rx.recv().await {
            Some(TransportEvent::PeerFound(p)) => assert_eq!(p.id(), "a"),
            other => panic!("Expected PeerFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn unavailable_discovery_fails_to_start() {
        let (tx, _rx) = mpsc::channel(100);
        let transport = SimulatedTransport::new(tx).with_discovery_unavailable();

        assert!(transport.start_discovery().await.is_err());
    }

    #[tokio::test]
    async fn invite_to_nearby_peer_connects() {
        let (tx, mut rx) = mpsc::channel(100);
        let transport = SimulatedTransport::new(tx);

        let b = peer("b", "Peer B");
        transport.add_nearby_peer(b.clone()).await;

        transport.invite(&b, Duration::from_secs(1)).await.unwrap();

        match rx.recv().await {
            Some(TransportEvent::StateChanged(p, state)) => {
                assert_eq!(p, b);
                assert_eq!(state, ConnectionState::Connecting);
            }
            other => panic!("Expected StateChanged, got {:?}", other),
        }
        match rx.recv().await {
            Some(TransportEvent::StateChanged(_, state)) => {
                assert_eq!(state, ConnectionState::Connected);
            }
            other => panic!("Expected StateChanged, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn invite_to_declining_peer_fails() {
        let (tx, _rx) = mpsc::channel(100);
        let transport = SimulatedTransport::new(tx).with_invites_declined();

        let b = peer("b", "Peer B");
        transport.add_nearby_peer(b.clone()).await;

        let result = transport.invite(&b, Duration::from_secs(1)).await;
        assert_eq!(result, Err(InviteError::Declined("Peer B".to_string())));
    }

    #[tokio::test]
    async fn unanswered_invitation_is_an_implicit_reject() {
        let (tx, mut rx) = mpsc::channel(100);
        let transport = SimulatedTransport::new(tx);
        let a = peer("a", "Peer A");

        // Nothing consumes the event, so no reply ever arrives
        let delivery = transport.deliver_invitation(&a, Duration::from_millis(20));
        let accepted = delivery.await;
        assert!(!accepted);

        // The event itself was still delivered
        match rx.recv().await {
            Some(TransportEvent::InvitationReceived(p, _)) => assert_eq!(p, a),
            other => panic!("Expected InvitationReceived, got {:?}", other),
        }
    }
}
