use log::warn;
use tokio::sync::oneshot;

use crate::registry::identity::PeerIdentity;
use crate::registry::state::ConnectionState;

/// Events delivered by the transport to the registry
///
/// One closed enum instead of separate browser/advertiser/session
/// callback interfaces; the registry dispatches on it in one place.
#[derive(Debug)]
pub enum TransportEvent {
    /// A peer became visible via discovery broadcast
    PeerFound(PeerIdentity),

    /// A previously visible peer is no longer discoverable
    PeerLost(PeerIdentity),

    /// A peer's session state changed
    StateChanged(PeerIdentity, ConnectionState),

    /// A peer invited us to a session; answer via the responder
    InvitationReceived(PeerIdentity, InvitationResponder),

    /// Discovery stopped working; informational only
    DiscoveryFailed(String),

    /// Advertising stopped working; informational only
    AdvertisingFailed(String),
}

/// One-shot reply handle for an invitation
///
/// Consumed by `respond`, so a reply can be sent at most once. The
/// transport side waits on the paired receiver with a timeout and treats
/// a dropped responder as an implicit reject.
#[derive(Debug)]
pub struct InvitationResponder {
    tx: oneshot::Sender<bool>,
}

impl InvitationResponder {
    /// Create a responder and the receiver the transport waits on
    pub fn new() -> (Self, oneshot::Receiver<bool>) {
        let (tx, rx) = oneshot::channel();
        (Self { tx }, rx)
    }

    /// Send the accept/reject decision
    pub fn respond(self, accept: bool) {
        if self.tx.send(accept).is_err() {
            // Transport already gave up waiting
            warn!("Invitation reply ({}) arrived after the transport stopped listening", accept);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn responder_delivers_decision_once() {
        let (responder, rx) = InvitationResponder::new();
        responder.respond(true);
        assert!(rx.await.unwrap());
    }

    #[tokio::test]
    async fn dropped_responder_closes_the_channel() {
        let (responder, rx) = InvitationResponder::new();
        drop(responder);

        // The transport observes the drop as an error and rejects
        assert!(rx.await.is_err());
    }
}
