use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use log::{debug, info, warn, error};
use tokio::sync::RwLock;

use crate::config::RegistryConfig;
use crate::registry::identity::PeerIdentity;
use crate::registry::policy::{
    AcceptAll, AcceptancePolicy, DisplayNameInvitePolicy, InvitePolicy, NoAutoInvite, RejectAll,
};
use crate::registry::state::ConnectionState;
use crate::transport::events::{InvitationResponder, TransportEvent};
use crate::transport::{InviteError, PeerTransport};

/// Default time to wait for an invited peer to answer
pub const DEFAULT_INVITE_TIMEOUT: Duration = Duration::from_secs(20);

/// Discovered and connected peer sets, guarded together
///
/// One lock over both maps so a found-event can check the connected set
/// and record its invite decision atomically.
struct Membership {
    /// Peers currently visible via discovery, by identifier
    discovered: HashMap<String, PeerIdentity>,

    /// Peers with an active session, by identifier
    connected: HashMap<String, PeerIdentity>,
}

/// Registry for nearby and connected peers
///
/// The transport may redeliver "found" notifications for peers already
/// known (typical when the host app bounces between foreground and
/// background) and may repeat "connected" notifications; every mutating
/// handler here is idempotent so redelivery never corrupts the sets or
/// double-fires an invite.
pub struct PeerRegistry {
    /// Peer sets behind a single serialization boundary
    inner: RwLock<Membership>,

    /// Transport collaborator for invites and invitation replies
    transport: Arc<dyn PeerTransport>,

    /// Auto-invite decision for newly discovered peers
    invite_policy: Box<dyn InvitePolicy>,

    /// Accept/reject decision for incoming invitations
    acceptance_policy: Box<dyn AcceptancePolicy>,

    /// How long an invited peer has to answer
    invite_timeout: Duration,
}

impl PeerRegistry {
    /// Create a registry with default policies (no auto-invite, accept all)
    pub fn new(transport: Arc<dyn PeerTransport>) -> Self {
        Self {
            inner: RwLock::new(Membership {
                discovered: HashMap::new(),
                connected: HashMap::new(),
            }),
            transport,
            invite_policy: Box::new(NoAutoInvite),
            acceptance_policy: Box::new(AcceptAll),
            invite_timeout: DEFAULT_INVITE_TIMEOUT,
        }
    }

    /// Create a registry configured from `RegistryConfig`
    pub fn from_config(transport: Arc<dyn PeerTransport>, config: &RegistryConfig) -> Self {
        let mut registry = Self::new(transport);

        if !config.auto_invite_names.is_empty() {
            registry = registry.with_invite_policy(Box::new(DisplayNameInvitePolicy::new(
                config.auto_invite_names.iter().cloned(),
            )));
        }

        if !config.auto_accept {
            registry = registry.with_acceptance_policy(Box::new(RejectAll));
        }

        registry.with_invite_timeout(Duration::from_secs(config.invite_timeout_secs))
    }

    /// Set the auto-invite policy
    pub fn with_invite_policy(mut self, policy: Box<dyn InvitePolicy>) -> Self {
        self.invite_policy = policy;
        self
    }

    /// Set the invitation acceptance policy
    pub fn with_acceptance_policy(mut self, policy: Box<dyn AcceptancePolicy>) -> Self {
        self.acceptance_policy = policy;
        self
    }

    /// Set the invite timeout
    pub fn with_invite_timeout(mut self, timeout: Duration) -> Self {
        self.invite_timeout = timeout;
        self
    }

    /// Dispatch a transport event to the matching handler
    pub async fn handle_event(&self, event: TransportEvent) {
        match event {
            TransportEvent::PeerFound(peer) => self.on_peer_found(peer).await,
            TransportEvent::PeerLost(peer) => self.on_peer_lost(&peer).await,
            TransportEvent::StateChanged(peer, state) => {
                self.on_state_changed(peer, state).await
            }
            TransportEvent::InvitationReceived(peer, responder) => {
                self.on_invitation(peer, responder).await
            }
            TransportEvent::DiscoveryFailed(reason) => {
                error!("Discovery failed: {}", reason);
            }
            TransportEvent::AdvertisingFailed(reason) => {
                error!("Advertising failed: {}", reason);
            }
        }
    }

    /// Handle a discovery "found" notification
    pub async fn on_peer_found(&self, peer: PeerIdentity) {
        let invite = {
            let mut membership = self.inner.write().await;

            if membership.discovered.contains_key(peer.id()) {
                debug!("{} is already in the discovered set", peer);
                return;
            }

            membership.discovered.insert(peer.id().to_string(), peer.clone());
            info!("Discovered {}", peer);

            // Decide the auto-invite under the lock; the dedup above makes
            // the decision happen at most once per discovery lifetime
            self.invite_policy.should_invite(&peer)
                && !membership.connected.contains_key(peer.id())
        };

        if invite {
            let transport = self.transport.clone();
            let timeout = self.invite_timeout;
            let invitee = peer.clone();

            // Fire-and-forget: the outcome comes back as a StateChanged
            // event, or not at all
            tokio::spawn(async move {
                debug!("Auto-inviting {}", invitee);
                if let Err(e) = transport.invite(&invitee, timeout).await {
                    warn!("Auto-invite to {} abandoned: {}", invitee, e);
                }
            });
        }
    }

    /// Handle a discovery "lost" notification
    ///
    /// Only the discovered set is touched; an active session survives the
    /// peer dropping out of the discovery broadcast.
    pub async fn on_peer_lost(&self, peer: &PeerIdentity) {
        let mut membership = self.inner.write().await;

        if membership.discovered.remove(peer.id()).is_some() {
            info!("Lost {}", peer);
        } else {
            debug!("Lost notification for unknown peer {}", peer);
        }
    }

    /// Handle a session state transition
    pub async fn on_state_changed(&self, peer: PeerIdentity, state: ConnectionState) {
        let mut membership = self.inner.write().await;

        match state {
            ConnectionState::NotConnected => {
                if membership.connected.remove(peer.id()).is_some() {
                    info!("Disconnected from {}", peer);
                } else {
                    debug!("NotConnected notification for {} which was not connected", peer);
                }
            }
            ConnectionState::Connecting => {
                debug!("Connecting to {}", peer);
            }
            ConnectionState::Connected => {
                if membership.connected.contains_key(peer.id()) {
                    debug!("Duplicate Connected notification for {}", peer);
                    return;
                }
                info!("Connected to {}", peer);
                membership.connected.insert(peer.id().to_string(), peer);
            }
        }
    }

    /// Handle an incoming invitation
    ///
    /// A peer that already has a session with us is rejected outright;
    /// otherwise the acceptance policy decides. The responder is consumed
    /// here and never retained.
    pub async fn on_invitation(&self, peer: PeerIdentity, responder: InvitationResponder) {
        let already_connected = {
            let membership = self.inner.read().await;
            membership.connected.contains_key(peer.id())
        };

        let accept = if already_connected {
            debug!("Rejecting invitation from already-connected {}", peer);
            false
        } else {
            self.acceptance_policy.should_accept(&peer)
        };

        info!(
            "{} invitation from {}",
            if accept { "Accepting" } else { "Rejecting" },
            peer
        );
        responder.respond(accept);
    }

    /// Issue an explicit invite to a peer
    ///
    /// Unlike auto-invites, failures (timeout, decline) surface to the
    /// caller. Inviting a peer we are already connected to is a no-op.
    pub async fn invite(&self, peer: &PeerIdentity) -> Result<(), InviteError> {
        {
            let membership = self.inner.read().await;
            if membership.connected.contains_key(peer.id()) {
                debug!("{} is already connected, skipping invite", peer);
                return Ok(());
            }
        }

        self.transport.invite(peer, self.invite_timeout).await
    }

    /// Snapshot of the discovered set
    pub async fn list_discovered(&self) -> Vec<PeerIdentity> {
        let membership = self.inner.read().await;
        membership.discovered.values().cloned().collect()
    }

    /// Snapshot of the connected set
    pub async fn list_connected(&self) -> Vec<PeerIdentity> {
        let membership = self.inner.read().await;
        membership.connected.values().cloned().collect()
    }

    /// Number of currently discoverable peers
    pub async fn discovered_count(&self) -> usize {
        self.inner.read().await.discovered.len()
    }

    /// Number of currently connected peers
    pub async fn connected_count(&self) -> usize {
        self.inner.read().await.connected.len()
    }

    /// Check whether a peer currently has an active session
    pub async fn is_connected(&self, id: &str) -> bool {
        self.inner.read().await.connected.contains_key(id)
    }
}
