// Peer transport module
//
// The transport collaborator owns service advertisement/browsing, session
// establishment, framing, and encryption. The registry only sees the
// trait below and the event stream in `events`.

pub mod events;
pub mod simulated;

use std::time::Duration;

use crate::registry::identity::PeerIdentity;

/// Transport start error type
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Discovery could not be started
    #[error("Discovery could not be started: {0}")]
    DiscoveryStart(String),

    /// Advertising could not be started
    #[error("Advertising could not be started: {0}")]
    AdvertisingStart(String),
}

/// Invite error type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InviteError {
    /// The invited peer did not respond in time
    #[error("Invitation to {0} timed out after {1:?}")]
    TimedOut(String, Duration),

    /// The invited peer declined
    #[error("Invitation to {0} was declined")]
    Declined(String),

    /// Transport failure
    #[error("Transport failure: {0}")]
    Transport(String),
}

/// Interface to the peer transport collaborator
///
/// Session outcomes are not returned from these calls; they come back
/// asynchronously as `TransportEvent`s on the registry's event channel.
#[async_trait::async_trait]
pub trait PeerTransport: Send + Sync {
    /// Start browsing for nearby peers
    async fn start_discovery(&self) -> Result<(), TransportError>;

    /// Stop browsing for nearby peers
    async fn stop_discovery(&self);

    /// Start advertising this device to nearby peers
    async fn start_advertising(&self) -> Result<(), TransportError>;

    /// Stop advertising this device
    async fn stop_advertising(&self);

    /// Invite a peer to a session, waiting at most `timeout` for an answer
    async fn invite(&self, peer: &PeerIdentity, timeout: Duration) -> Result<(), InviteError>;

    /// Answer an invitation previously received from `peer`
    async fn respond_to_invitation(&self, peer: &PeerIdentity, accept: bool);
}
