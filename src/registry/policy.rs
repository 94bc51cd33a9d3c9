//! Connection policies for the peer registry
//!
//! The registry never hardcodes which peers to invite or accept; both
//! decisions go through these traits so an application can plug in its
//! own rules.

use std::collections::HashSet;

use crate::registry::identity::PeerIdentity;

/// Decides whether a newly discovered peer should be invited automatically
pub trait InvitePolicy: Send + Sync {
    /// Return true to issue an invite for this peer
    fn should_invite(&self, peer: &PeerIdentity) -> bool;
}

/// Decides whether an incoming invitation should be accepted
pub trait AcceptancePolicy: Send + Sync {
    /// Return true to accept the invitation
    fn should_accept(&self, peer: &PeerIdentity) -> bool;
}

/// Never invites anyone; discovery is purely observational
pub struct NoAutoInvite;

impl InvitePolicy for NoAutoInvite {
    fn should_invite(&self, _peer: &PeerIdentity) -> bool {
        false
    }
}

/// Invites peers whose display name is on a configured allow list
pub struct DisplayNameInvitePolicy {
    names: HashSet<String>,
}

impl DisplayNameInvitePolicy {
    /// Create a policy from a list of display names
    pub fn new(names: impl IntoIterator<Item = String>) -> Self {
        Self {
            names: names.into_iter().collect(),
        }
    }
}

impl InvitePolicy for DisplayNameInvitePolicy {
    fn should_invite(&self, peer: &PeerIdentity) -> bool {
        self.names.contains(peer.display_name())
    }
}

/// Accepts every invitation
pub struct AcceptAll;

impl AcceptancePolicy for AcceptAll {
    fn should_accept(&self, _peer: &PeerIdentity) -> bool {
        true
    }
}

/// Rejects every invitation
pub struct RejectAll;

impl AcceptancePolicy for RejectAll {
    fn should_accept(&self, _peer: &PeerIdentity) -> bool {
        false
    }
}
